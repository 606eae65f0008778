use crate::error::{DocError, Result};
use crate::font::StandardFont;
use crate::types::{Color, Pt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
        }
    }
}

/// Visual attributes of a paragraph. Values are literal constants set once per document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub name: String,
    pub font: StandardFont,
    pub font_size: Pt,
    /// Baseline-to-baseline distance. `None` means 1.2 x font size.
    pub leading: Option<Pt>,
    pub text_color: Color,
    pub alignment: Alignment,
    pub space_before: Pt,
    pub space_after: Pt,
    pub left_indent: Pt,
    pub text_transform: TextTransform,
}

impl ParagraphStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            font: StandardFont::Helvetica,
            font_size: Pt::from_f32(10.0),
            leading: None,
            text_color: Color::BLACK,
            alignment: Alignment::Left,
            space_before: Pt::ZERO,
            space_after: Pt::ZERO,
            left_indent: Pt::ZERO,
            text_transform: TextTransform::None,
        }
    }

    /// A copy of `self` under a new name, the way styles inherit from a parent.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn resolved_leading(&self) -> Pt {
        self.leading.unwrap_or_else(|| self.font_size.mul_ratio(6, 5))
    }

    pub fn with_font(mut self, font: StandardFont) -> Self {
        self.font = font;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Pt::from_f32(size);
        self
    }

    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = Some(Pt::from_f32(leading));
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_space_before(mut self, space: f32) -> Self {
        self.space_before = Pt::from_f32(space);
        self
    }

    pub fn with_space_after(mut self, space: f32) -> Self {
        self.space_after = Pt::from_f32(space);
        self
    }

    pub fn with_left_indent(mut self, indent: f32) -> Self {
        self.left_indent = Pt::from_f32(indent);
        self
    }

    pub fn with_text_transform(mut self, transform: TextTransform) -> Self {
        self.text_transform = transform;
        self
    }
}

/// Ordered name -> style registry.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Vec<ParagraphStyle>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Normal` (Helvetica 10 on 12) and `BodyText` (Normal plus 6pt before).
    pub fn sample() -> Self {
        let normal = ParagraphStyle::new("Normal").with_leading(12.0);
        let body = normal.derive("BodyText").with_space_before(6.0);
        Self {
            styles: vec![normal, body],
        }
    }

    pub fn add(&mut self, style: ParagraphStyle) -> Result<()> {
        if self.contains(&style.name) {
            return Err(DocError::DuplicateStyle(style.name));
        }
        self.styles.push(style);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ParagraphStyle> {
        self.styles
            .iter()
            .find(|style| style.name == name)
            .ok_or_else(|| DocError::UnknownStyle(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut ParagraphStyle> {
        self.styles
            .iter_mut()
            .find(|style| style.name == name)
            .ok_or_else(|| DocError::UnknownStyle(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.iter().any(|style| style.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|style| style.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sheet_has_normal_and_body_text() {
        let sheet = StyleSheet::sample();
        let names: Vec<&str> = sheet.names().collect();
        assert_eq!(names, vec!["Normal", "BodyText"]);
        let body = sheet.get("BodyText").expect("body");
        assert_eq!(body.space_before, Pt::from_f32(6.0));
        assert_eq!(body.resolved_leading(), Pt::from_f32(12.0));
    }

    #[test]
    fn duplicate_and_unknown_names_are_errors() {
        let mut sheet = StyleSheet::sample();
        let err = sheet
            .add(ParagraphStyle::new("Normal"))
            .expect_err("duplicate");
        assert!(matches!(err, DocError::DuplicateStyle(name) if name == "Normal"));
        assert!(matches!(
            sheet.get("Heading9"),
            Err(DocError::UnknownStyle(name)) if name == "Heading9"
        ));
    }

    #[test]
    fn overrides_apply_in_place() {
        let mut sheet = StyleSheet::sample();
        {
            let body = sheet.get_mut("BodyText").expect("body");
            body.font_size = Pt::from_f32(10.5);
            body.alignment = Alignment::Justify;
        }
        let body = sheet.get("BodyText").expect("body");
        assert_eq!(body.alignment, Alignment::Justify);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn leading_defaults_to_font_size_ratio() {
        let style = ParagraphStyle::new("Label").with_font_size(20.0);
        assert_eq!(style.resolved_leading(), Pt::from_f32(24.0));
        assert_eq!(
            TextTransform::Uppercase.apply("Founding team"),
            "FOUNDING TEAM"
        );
    }
}
