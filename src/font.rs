use crate::types::Pt;

/// The base-14 Helvetica family. Every document uses these four faces and
/// nothing else, so metrics are compiled in instead of loaded from font files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

// AFM advance widths (1/1000 em) for WinAnsi codes 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
];

const ASCENT: i32 = 718;
const DESCENT: i32 = -207;
const DEFAULT_WIDTH: u16 = 556;

impl StandardFont {
    pub fn pdf_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Helvetica" => Some(StandardFont::Helvetica),
            "Helvetica-Bold" => Some(StandardFont::HelveticaBold),
            "Helvetica-Oblique" => Some(StandardFont::HelveticaOblique),
            "Helvetica-BoldOblique" => Some(StandardFont::HelveticaBoldOblique),
            _ => None,
        }
    }

    pub fn variant(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    pub fn is_italic(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaOblique | StandardFont::HelveticaBoldOblique
        )
    }

    /// Merges inline `<b>`/`<i>` flags into this face.
    pub fn with_emphasis(self, bold: bool, italic: bool) -> Self {
        StandardFont::variant(self.is_bold() || bold, self.is_italic() || italic)
    }

    fn char_width(self, ch: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return table[(code - 32) as usize];
        }
        match ch {
            '\u{00A0}' => table[0],
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            '\u{00B0}' => 400,
            '\u{00D7}' => 584,
            _ => DEFAULT_WIDTH,
        }
    }

    pub fn string_width(self, size: Pt, text: &str) -> Pt {
        let mut units: i64 = 0;
        for ch in text.chars() {
            match winansi_fallback(ch) {
                Some(replacement) => {
                    units += replacement
                        .chars()
                        .map(|c| self.char_width(c) as i64)
                        .sum::<i64>();
                }
                None => units += self.char_width(ch) as i64,
            }
        }
        let milli = size.to_milli_i64() as i128 * units as i128;
        Pt::from_milli_i64((milli / 1000) as i64)
    }

    pub fn ascent(self, size: Pt) -> Pt {
        size.mul_ratio(ASCENT, 1000)
    }

    pub fn descent(self, size: Pt) -> Pt {
        size.mul_ratio(DESCENT, 1000)
    }
}

/// Baseline offset from the top of a line box that visually centers glyphs of `size`.
pub fn centered_baseline(line_height: Pt, size: Pt) -> Pt {
    line_height.mul_ratio(1, 2) + size.mul_ratio(ASCENT + DESCENT, 2000)
}

/// ASCII stand-ins for characters WinAnsi cannot encode.
pub(crate) fn winansi_fallback(ch: char) -> Option<&'static str> {
    match ch {
        '\u{2192}' => Some("->"),
        '\u{2190}' => Some("<-"),
        '\u{2265}' => Some(">="),
        '\u{2264}' => Some("<="),
        '\u{2212}' => Some("-"),
        '\u{2500}' => Some("-"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_afm_metrics() {
        let size = Pt::from_f32(10.0);
        // "Pop" = P(667) o(556) p(556)
        assert_eq!(
            StandardFont::Helvetica.string_width(size, "Pop"),
            Pt::from_f32(17.79)
        );
        // Bold "Top" = T(611) o(611) p(611)
        assert_eq!(
            StandardFont::HelveticaBold.string_width(size, "Top"),
            Pt::from_f32(18.33)
        );
        assert_eq!(
            StandardFont::HelveticaOblique.string_width(size, "Pop"),
            StandardFont::Helvetica.string_width(size, "Pop")
        );
    }

    #[test]
    fn arrow_is_measured_as_its_fallback() {
        let size = Pt::from_f32(9.0);
        assert_eq!(
            StandardFont::Helvetica.string_width(size, "a\u{2192}b"),
            StandardFont::Helvetica.string_width(size, "a->b")
        );
    }

    #[test]
    fn variants_round_trip_through_names() {
        for font in [
            StandardFont::Helvetica,
            StandardFont::HelveticaBold,
            StandardFont::HelveticaOblique,
            StandardFont::HelveticaBoldOblique,
        ] {
            assert_eq!(StandardFont::from_name(font.pdf_name()), Some(font));
            assert_eq!(StandardFont::variant(font.is_bold(), font.is_italic()), font);
        }
        assert_eq!(
            StandardFont::HelveticaBold.with_emphasis(false, true),
            StandardFont::HelveticaBoldOblique
        );
        assert_eq!(StandardFont::from_name("Times-Roman"), None);
    }

    #[test]
    fn baseline_sits_below_line_center() {
        let baseline = centered_baseline(Pt::from_f32(14.0), Pt::from_f32(10.0));
        assert!(baseline > Pt::from_f32(7.0));
        assert!(baseline < Pt::from_f32(14.0));
    }
}
