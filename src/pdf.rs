use crate::canvas::{Command, Document, Page};
use crate::font::{self, StandardFont};
use crate::metrics::DocumentMetrics;
use crate::types::{Color, Pt};
use fixed::types::I32F32;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const RESOURCES_ID: usize = 3;
const FIRST_FONT_ID: usize = 4;

pub const PRODUCER: &str = concat!("poptop-docs ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Flate-compress page content streams.
    pub compress: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            compress: true,
            title: None,
            author: None,
            subject: None,
            creator: None,
        }
    }
}

pub fn document_to_pdf(document: &Document, options: &PdfOptions) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_pdf(document, options, &mut out, None)?;
    Ok(out)
}

/// Serializes `document` and records per-page content stream sizes into `metrics`.
pub fn document_to_pdf_with_metrics(
    document: &Document,
    options: &PdfOptions,
    metrics: &mut DocumentMetrics,
) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_pdf(document, options, &mut out, Some(metrics))?;
    Ok(out)
}

pub fn write_pdf<W: Write>(
    document: &Document,
    options: &PdfOptions,
    writer: W,
    mut metrics: Option<&mut DocumentMetrics>,
) -> io::Result<()> {
    let fonts = FontTable::collect(document);
    let page_count = document.pages.len();
    let first_page_obj = FIRST_FONT_ID + fonts.len();
    let info_id = first_page_obj + page_count * 2;
    let object_count = info_id + 1;

    let mut pdf = PdfStreamWriter::new(writer, object_count);
    pdf.write_bytes(b"%PDF-1.7\n")?;
    pdf.write_bytes(b"%\xE2\xE3\xCF\xD3\n")?;

    pdf.write_object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
    )?;
    let kids: Vec<String> = (0..page_count)
        .map(|idx| format!("{} 0 R", first_page_obj + idx * 2 + 1))
        .collect();
    pdf.write_object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    )?;
    pdf.write_object(RESOURCES_ID, &fonts.resources())?;
    for (idx, font) in fonts.iter().enumerate() {
        pdf.write_object(FIRST_FONT_ID + idx, &font_object(font.pdf_name()))?;
    }

    let page_height = document.page_size.height;
    let mut total_bytes = 0usize;
    for (idx, page) in document.pages.iter().enumerate() {
        let content_id = first_page_obj + idx * 2;
        let page_id = content_id + 1;
        let content = render_page(page, page_height, &fonts);
        let stream = if options.compress {
            compressed_stream(&flate_compress(content.as_bytes())?)
        } else {
            stream_object(content.as_bytes())
        };
        pdf.write_object_bytes(content_id, &stream)?;
        pdf.write_object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] /Resources {} 0 R /Contents {} 0 R >>",
                PAGES_ID,
                fmt_pt(document.page_size.width),
                fmt_pt(page_height),
                RESOURCES_ID,
                content_id
            ),
        )?;
        total_bytes += stream.len();
        if let Some(page_metrics) = metrics.as_deref_mut().and_then(|m| m.pages.get_mut(idx)) {
            page_metrics.content_bytes = stream.len();
        }
    }

    pdf.write_object(info_id, &info_object(options))?;

    let id = pdf.digest_hex();
    let xref_offset = pdf.offset;
    pdf.write_str(&format!("xref\n0 {}\n", object_count))?;
    pdf.write_str("0000000000 65535 f \n")?;
    for obj_id in 1..object_count {
        let entry = format!("{:010} 00000 n \n", pdf.offsets[obj_id]);
        pdf.write_str(&entry)?;
    }
    pdf.write_str(&format!(
        "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R /ID [<{}> <{}>] >>\nstartxref\n{}\n%%EOF\n",
        object_count, CATALOG_ID, info_id, id, id, xref_offset
    ))?;
    pdf.writer.flush()?;

    if let Some(metrics) = metrics {
        metrics.total_bytes = pdf.offset;
        log::debug!(
            "pdf: {} pages, {} content bytes, {} total bytes",
            page_count,
            total_bytes,
            pdf.offset
        );
    }
    Ok(())
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex_digest(Sha256::digest(bytes).as_slice())
}

fn hex_digest(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

struct PdfStreamWriter<W: Write> {
    writer: W,
    offset: usize,
    offsets: Vec<usize>,
    hasher: Sha256,
}

impl<W: Write> PdfStreamWriter<W> {
    fn new(writer: W, object_count: usize) -> Self {
        Self {
            writer,
            offset: 0,
            offsets: vec![0; object_count],
            hasher: Sha256::new(),
        }
    }

    fn write_object(&mut self, obj_id: usize, body: &str) -> io::Result<()> {
        self.write_object_bytes(obj_id, body.as_bytes())
    }

    fn write_object_bytes(&mut self, obj_id: usize, body: &[u8]) -> io::Result<()> {
        if let Some(slot) = self.offsets.get_mut(obj_id) {
            *slot = self.offset;
        }
        self.write_str(&format!("{} 0 obj\n", obj_id))?;
        self.write_bytes(body)?;
        self.write_bytes(b"\nendobj\n")
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.hasher.update(data);
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, data: &str) -> io::Result<()> {
        self.write_bytes(data.as_bytes())
    }

    /// Digest of everything written so far; the file identifier.
    fn digest_hex(&self) -> String {
        hex_digest(self.hasher.clone().finalize().as_slice())
    }
}

/// Fonts referenced by any page, in a stable order, each with a resource name.
struct FontTable {
    fonts: Vec<StandardFont>,
}

impl FontTable {
    fn collect(document: &Document) -> Self {
        let mut used = BTreeSet::new();
        for page in &document.pages {
            let mut current = StandardFont::Helvetica;
            let mut stack = Vec::new();
            for cmd in &page.commands {
                match cmd {
                    Command::SaveState => stack.push(current),
                    Command::RestoreState => {
                        if let Some(font) = stack.pop() {
                            current = font;
                        }
                    }
                    Command::SetFontName(font) => current = *font,
                    Command::DrawString { .. } => {
                        used.insert(current);
                    }
                    _ => {}
                }
            }
        }
        Self {
            fonts: used.into_iter().collect(),
        }
    }

    fn len(&self) -> usize {
        self.fonts.len()
    }

    fn iter(&self) -> impl Iterator<Item = &StandardFont> {
        self.fonts.iter()
    }

    fn resource_name(&self, font: StandardFont) -> Option<String> {
        self.fonts
            .iter()
            .position(|f| *f == font)
            .map(|idx| format!("F{}", idx + 1))
    }

    fn resources(&self) -> String {
        let entries: BTreeMap<String, usize> = self
            .fonts
            .iter()
            .enumerate()
            .map(|(idx, _)| (format!("F{}", idx + 1), FIRST_FONT_ID + idx))
            .collect();
        let fonts = entries
            .iter()
            .map(|(name, id)| format!("/{} {} 0 R", name, id))
            .collect::<Vec<_>>()
            .join(" ");
        format!("<< /Font << {} >> >>", fonts)
    }
}

#[derive(Clone, Copy)]
struct TextState {
    font: StandardFont,
    size: Pt,
}

fn render_page(page: &Page, page_height: Pt, fonts: &FontTable) -> String {
    let mut out = String::new();
    let mut state = TextState {
        font: StandardFont::Helvetica,
        size: Pt::from_f32(12.0),
    };
    let mut stack: Vec<TextState> = Vec::new();
    let flip = |y: Pt| fmt_pt(page_height - y);

    for cmd in &page.commands {
        match cmd {
            Command::SaveState => {
                stack.push(state);
                out.push_str("q\n");
            }
            Command::RestoreState => {
                if let Some(prev) = stack.pop() {
                    state = prev;
                }
                out.push_str("Q\n");
            }
            Command::Meta { .. } => {}
            Command::SetFillColor(color) => out.push_str(&color_to_pdf_fill(*color)),
            Command::SetStrokeColor(color) => out.push_str(&color_to_pdf_stroke(*color)),
            Command::SetLineWidth(width) => out.push_str(&format!("{} w\n", fmt_pt(*width))),
            Command::SetFontName(font) => state.font = *font,
            Command::SetFontSize(size) => state.size = *size,
            Command::ClipRect {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re W n\n",
                    fmt_pt(*x),
                    flip(*y + *height),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::ClipPath => out.push_str("W n\n"),
            Command::MoveTo { x, y } => {
                out.push_str(&format!("{} {} m\n", fmt_pt(*x), flip(*y)));
            }
            Command::LineTo { x, y } => {
                out.push_str(&format!("{} {} l\n", fmt_pt(*x), flip(*y)));
            }
            Command::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} {} {} c\n",
                    fmt_pt(*x1),
                    flip(*y1),
                    fmt_pt(*x2),
                    flip(*y2),
                    fmt_pt(*x),
                    flip(*y)
                ));
            }
            Command::ClosePath => out.push_str("h\n"),
            Command::Fill => out.push_str("f\n"),
            Command::Stroke => out.push_str("S\n"),
            Command::FillStroke => out.push_str("B\n"),
            Command::DrawRect {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re f\n",
                    fmt_pt(*x),
                    flip(*y + *height),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::DrawString { x, y, text } => {
                let Some(resource) = fonts.resource_name(state.font) else {
                    continue;
                };
                let encoded = encode_winansi_pdf_string(text);
                if encoded.replaced > 0 {
                    log::warn!(
                        "{} character(s) in {:?} have no WinAnsi encoding and were replaced with '?'",
                        encoded.replaced,
                        truncate_preview(text, 80)
                    );
                }
                if encoded.fallbacks > 0 {
                    log::debug!(
                        "{} character(s) in {:?} were drawn with ASCII fallbacks",
                        encoded.fallbacks,
                        truncate_preview(text, 80)
                    );
                }
                out.push_str("BT\n");
                out.push_str(&format!("/{} {} Tf\n", resource, fmt_pt(state.size)));
                out.push_str(&format!("{} {} Td\n", fmt_pt(*x), flip(*y)));
                out.push_str(&format!("({}) Tj\n", encoded.text));
                out.push_str("ET\n");
            }
        }
    }
    out
}

fn font_object(name: &str) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        name
    )
}

fn flate_compress(data: &[u8]) -> io::Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn stream_object(content: &[u8]) -> Vec<u8> {
    let mut out = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    out.extend_from_slice(content);
    out.extend_from_slice(b"\nendstream");
    out
}

fn compressed_stream(data: &[u8]) -> Vec<u8> {
    let mut out =
        format!("<< /Length {} /Filter /FlateDecode >>\nstream\n", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.extend_from_slice(b"\nendstream");
    out
}

fn info_object(options: &PdfOptions) -> String {
    let mut entries: Vec<String> = Vec::new();
    let fields = [
        ("Title", &options.title),
        ("Author", &options.author),
        ("Subject", &options.subject),
        ("Creator", &options.creator),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            entries.push(format!("/{} ({})", key, encode_winansi_pdf_string(value).text));
        }
    }
    entries.push(format!("/Producer ({})", escape_pdf_string(PRODUCER)));
    format!("<< {} >>", entries.join(" "))
}

fn escape_pdf_string(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

struct WinAnsiEncoded {
    text: String,
    replaced: usize,
    fallbacks: usize,
}

fn winansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{0000}'..='\u{007F}' => ch as u8,
        '\u{00A0}'..='\u{00FF}' => ch as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

fn push_winansi_byte(out: &mut String, byte: u8) {
    match byte {
        b'\\' => out.push_str("\\\\"),
        b'(' => out.push_str("\\("),
        b')' => out.push_str("\\)"),
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b if b < 0x20 || b >= 0x7f => out.push_str(&format!("\\{:03o}", b)),
        b => out.push(b as char),
    }
}

fn encode_winansi_pdf_string(input: &str) -> WinAnsiEncoded {
    let mut out = String::new();
    let mut replaced = 0usize;
    let mut fallbacks = 0usize;
    for ch in input.chars() {
        if let Some(byte) = winansi_byte(ch) {
            push_winansi_byte(&mut out, byte);
            continue;
        }
        if let Some(replacement) = font::winansi_fallback(ch) {
            for byte in replacement.bytes() {
                push_winansi_byte(&mut out, byte);
            }
            fallbacks += 1;
            continue;
        }
        replaced += 1;
        out.push('?');
    }
    WinAnsiEncoded {
        text: out,
        replaced,
        fallbacks,
    }
}

fn truncate_preview(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

fn fmt(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = I32F32::from_num(value);
    let scaled = (fixed * I32F32::from_num(1000)).round();
    let milli: i64 = scaled.to_num();
    format_milli(milli)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        format!("{}{}", sign, int_part)
    } else {
        let mut s = format!("{}{}.{:03}", sign, int_part, frac_part);
        while s.ends_with('0') {
            s.pop();
        }
        s
    }
}

fn fmt_pt(value: Pt) -> String {
    format_milli(value.to_milli_i64())
}

fn color_to_pdf_fill(color: Color) -> String {
    format!("{} {} {} rg\n", fmt(color.r), fmt(color.g), fmt(color.b))
}

fn color_to_pdf_stroke(color: Color) -> String {
    format!("{} {} {} RG\n", fmt(color.r), fmt(color.g), fmt(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::types::Size;

    fn sample_document() -> Document {
        let mut canvas = Canvas::new(Size::letter());
        canvas.set_fill_color(Color::from_rgb8(0x1a, 0x36, 0x5d));
        canvas.draw_rect(Pt::from_f32(72.0), Pt::from_f32(72.0), Pt::from_f32(100.0), Pt::from_f32(20.0));
        canvas.set_font(StandardFont::HelveticaBold, Pt::from_f32(14.0));
        canvas.draw_string(Pt::from_f32(72.0), Pt::from_f32(100.0), "Revenue (Y1) \u{2192} $1.2M");
        canvas.show_page();
        canvas.set_font(StandardFont::Helvetica, Pt::from_f32(9.0));
        canvas.draw_centred_string(Pt::from_f32(306.0), Pt::from_f32(756.0), "2");
        canvas.finish()
    }

    fn uncompressed(document: &Document) -> String {
        let options = PdfOptions {
            compress: false,
            ..PdfOptions::default()
        };
        let bytes = document_to_pdf(document, &options).expect("pdf");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn content_streams_flip_the_y_axis() {
        let text = uncompressed(&sample_document());
        assert!(text.starts_with("%PDF-1.7\n"));
        assert!(text.contains("0.102 0.212 0.365 rg\n"));
        // 792 - 72 - 20
        assert!(text.contains("72 700 100 20 re f\n"));
        assert!(text.contains("/F2 14 Tf\n72 692 Td\n(Revenue \\(Y1\\) -> $1.2M) Tj\n"));
        assert!(text.contains("/F1 9 Tf\n"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn compression_shrinks_content_streams() {
        let document = sample_document();
        let compressed = document_to_pdf(&document, &PdfOptions::default()).expect("pdf");
        let text = String::from_utf8_lossy(&compressed);
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(!text.contains(" Tj\n"));
        assert!(!uncompressed(&document).contains("/FlateDecode"));
    }

    #[test]
    fn compressed_content_inflates_to_the_page_operators() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let document = sample_document();
        let fonts = FontTable::collect(&document);
        let content = render_page(&document.pages[0], document.page_size.height, &fonts);
        let packed = flate_compress(content.as_bytes()).expect("compress");
        assert!(!packed.is_empty());
        let mut inflated = String::new();
        ZlibDecoder::new(packed.as_slice())
            .read_to_string(&mut inflated)
            .expect("inflate");
        assert_eq!(inflated, content);
    }

    #[test]
    fn output_is_deterministic_and_carries_an_id() {
        let document = sample_document();
        let options = PdfOptions {
            title: Some("Plan".to_string()),
            author: Some("Paul Giarrizzo".to_string()),
            ..PdfOptions::default()
        };
        let a = document_to_pdf(&document, &options).expect("pdf");
        let b = document_to_pdf(&document, &options).expect("pdf");
        assert_eq!(a, b);
        let text = String::from_utf8_lossy(&a);
        assert!(text.contains("/Title (Plan) /Author (Paul Giarrizzo) /Producer (poptop-docs"));
        let id_start = text.find("/ID [<").expect("id") + 6;
        assert_eq!(text[id_start..].find('>'), Some(64));
    }

    #[test]
    fn winansi_encoding_escapes_and_falls_back() {
        let encoded = encode_winansi_pdf_string("caf\u{00e9} \u{2022} \u{2265}3 \u{4e2d}");
        assert_eq!(encoded.text, "caf\\351 \\225 >=3 ?");
        assert_eq!(encoded.fallbacks, 1);
        assert_eq!(encoded.replaced, 1);
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = document_to_pdf(&sample_document(), &PdfOptions::default()).expect("pdf");
        let text = String::from_utf8_lossy(&bytes);
        let xref = text.rfind("xref\n").expect("xref");
        let entries: Vec<usize> = text[xref..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .filter_map(|line| line.get(0..10).and_then(|n| n.parse().ok()))
            .collect();
        assert!(!entries.is_empty());
        for (idx, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", idx + 1);
            assert!(bytes[*offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn metrics_receive_stream_sizes() {
        let document = sample_document();
        let mut metrics = DocumentMetrics {
            pages: vec![Default::default(), Default::default()],
            ..DocumentMetrics::default()
        };
        let bytes =
            document_to_pdf_with_metrics(&document, &PdfOptions::default(), &mut metrics).expect("pdf");
        assert_eq!(metrics.total_bytes, bytes.len());
        assert!(metrics.pages.iter().all(|page| page.content_bytes > 0));
    }
}
