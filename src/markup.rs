//! Inline rich-text markup for paragraphs.
//!
//! A deliberately small tag set: `<b>`, `<strong>`, `<i>`, `<em>`, `<br/>`,
//! `<font size=".." color="..">` and top-level `<para align="..">` blocks.

use crate::error::{DocError, Result};
use crate::style::Alignment;
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
    pub size: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text { text: String, style: RunStyle },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichBlock {
    /// `None` inherits the paragraph style's alignment.
    pub align: Option<Alignment>,
    pub inlines: Vec<Inline>,
}

impl RichBlock {
    fn is_blank(&self) -> bool {
        self.inlines.iter().all(|inline| match inline {
            Inline::Text { text, .. } => text.trim().is_empty(),
            Inline::LineBreak => false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OpenTag {
    Bold,
    Italic,
    Font,
    Para,
}

impl OpenTag {
    fn name(self) -> &'static str {
        match self {
            OpenTag::Bold => "b",
            OpenTag::Italic => "i",
            OpenTag::Font => "font",
            OpenTag::Para => "para",
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    blocks: Vec<RichBlock>,
    current: RichBlock,
    tags: Vec<(OpenTag, RunStyle)>,
    style: RunStyle,
    text: String,
}

pub fn parse(markup: &str) -> Result<Vec<RichBlock>> {
    let mut parser = Parser {
        src: markup,
        blocks: Vec::new(),
        current: RichBlock::default(),
        tags: Vec::new(),
        style: RunStyle::default(),
        text: String::new(),
    };
    parser.run()?;
    Ok(parser.blocks)
}

/// Escapes literal text so it survives [`parse`] unchanged.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn markup_error(offset: usize, message: impl Into<String>) -> DocError {
    DocError::Markup {
        offset,
        message: message.into(),
    }
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<()> {
        let src = self.src;
        let bytes = src.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'<' => {
                    let end = src[pos..]
                        .find('>')
                        .map(|rel| pos + rel)
                        .ok_or_else(|| markup_error(pos, "unterminated tag"))?;
                    self.tag(pos, &src[pos + 1..end])?;
                    pos = end + 1;
                }
                b'&' => {
                    let (ch, consumed) = self.entity(pos)?;
                    self.text.push(ch);
                    pos += consumed;
                }
                _ => {
                    let next = src[pos..]
                        .find(['<', '&'])
                        .map(|rel| pos + rel)
                        .unwrap_or(bytes.len());
                    self.text.push_str(&src[pos..next]);
                    pos = next;
                }
            }
        }
        if let Some((tag, _)) = self.tags.last() {
            return Err(markup_error(
                src.len(),
                format!("unclosed <{}>", tag.name()),
            ));
        }
        self.flush_text();
        self.end_block();
        Ok(())
    }

    fn entity(&self, start: usize) -> Result<(char, usize)> {
        let rest = &self.src[start..];
        let end = rest
            .find(';')
            .filter(|&idx| idx <= 10)
            .ok_or_else(|| markup_error(start, "bare '&' (use &amp;)"))?;
        let name = &rest[1..end];
        let ch = match name {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{00A0}',
            _ => {
                let code = name
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(|parsed| parsed.ok())
                    .and_then(char::from_u32);
                code.ok_or_else(|| markup_error(start, format!("unknown entity &{name};")))?
            }
        };
        Ok((ch, end + 1))
    }

    fn tag(&mut self, offset: usize, body: &str) -> Result<()> {
        let body = body.trim();
        if let Some(name) = body.strip_prefix('/') {
            return self.close(offset, name.trim());
        }
        let self_closing = body.ends_with('/');
        let body = body.trim_end_matches('/').trim();
        let (name, attrs) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => (body, ""),
        };
        let attrs = parse_attrs(offset, attrs)?;
        match name.to_ascii_lowercase().as_str() {
            "br" => {
                self.flush_text();
                self.current.inlines.push(Inline::LineBreak);
                Ok(())
            }
            _ if self_closing => Err(markup_error(offset, format!("<{name}/> is not allowed"))),
            "b" | "strong" => {
                self.open(OpenTag::Bold);
                self.style.bold = true;
                Ok(())
            }
            "i" | "em" => {
                self.open(OpenTag::Italic);
                self.style.italic = true;
                Ok(())
            }
            "font" => {
                let mut next = self.style;
                for (key, value) in attrs {
                    match key.as_str() {
                        "size" => {
                            let size = value
                                .parse::<f32>()
                                .ok()
                                .filter(|size| size.is_finite() && *size > 0.0)
                                .ok_or_else(|| {
                                    markup_error(offset, format!("invalid font size {value:?}"))
                                })?;
                            next.size = Some(size);
                        }
                        "color" => {
                            next.color = Some(Color::from_hex(&value).map_err(|_| {
                                markup_error(offset, format!("invalid font color {value:?}"))
                            })?);
                        }
                        "name" | "face" => {}
                        other => {
                            return Err(markup_error(
                                offset,
                                format!("unsupported font attribute {other:?}"),
                            ));
                        }
                    }
                }
                self.open(OpenTag::Font);
                self.style = next;
                Ok(())
            }
            "para" => {
                if !self.tags.is_empty() {
                    return Err(markup_error(offset, "<para> must not be nested"));
                }
                let mut align = None;
                for (key, value) in attrs {
                    if key == "align" {
                        align = Some(parse_alignment(offset, &value)?);
                    }
                }
                self.flush_text();
                self.end_block();
                self.current.align = align;
                self.open(OpenTag::Para);
                Ok(())
            }
            other => Err(markup_error(offset, format!("unknown tag <{other}>"))),
        }
    }

    fn open(&mut self, tag: OpenTag) {
        self.flush_text();
        self.tags.push((tag, self.style));
    }

    fn close(&mut self, offset: usize, name: &str) -> Result<()> {
        let expected = match name.to_ascii_lowercase().as_str() {
            "b" | "strong" => OpenTag::Bold,
            "i" | "em" => OpenTag::Italic,
            "font" => OpenTag::Font,
            "para" => OpenTag::Para,
            other => return Err(markup_error(offset, format!("unknown tag </{other}>"))),
        };
        match self.tags.pop() {
            Some((open, previous)) if open == expected => {
                self.flush_text();
                self.style = previous;
                if open == OpenTag::Para {
                    self.end_block();
                }
                Ok(())
            }
            Some((open, _)) => Err(markup_error(
                offset,
                format!("expected </{}>, found </{name}>", open.name()),
            )),
            None => Err(markup_error(offset, format!("unmatched </{name}>"))),
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.current.inlines.push(Inline::Text {
            text,
            style: self.style,
        });
    }

    fn end_block(&mut self) {
        let block = std::mem::take(&mut self.current);
        if !block.is_blank() {
            self.blocks.push(block);
        }
    }
}

fn parse_alignment(offset: usize, value: &str) -> Result<Alignment> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Ok(Alignment::Left),
        "center" | "centre" => Ok(Alignment::Center),
        "right" => Ok(Alignment::Right),
        "justify" => Ok(Alignment::Justify),
        other => Err(markup_error(offset, format!("invalid alignment {other:?}"))),
    }
}

fn parse_attrs(offset: usize, mut rest: &str) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(attrs);
        }
        let eq = rest
            .find('=')
            .ok_or_else(|| markup_error(offset, "attribute without value"))?;
        let key = rest[..eq].trim().to_ascii_lowercase();
        let after = rest[eq + 1..].trim_start();
        let quote = after
            .chars()
            .next()
            .filter(|ch| *ch == '"' || *ch == '\'')
            .ok_or_else(|| markup_error(offset, format!("unquoted value for {key:?}")))?;
        let close = after[1..]
            .find(quote)
            .ok_or_else(|| markup_error(offset, format!("unterminated value for {key:?}")))?;
        attrs.push((key, after[1..1 + close].to_string()));
        rest = &after[close + 2..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(block: &RichBlock) -> Vec<(&str, RunStyle)> {
        block
            .inlines
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text { text, style } => Some((text.as_str(), *style)),
                Inline::LineBreak => None,
            })
            .collect()
    }

    #[test]
    fn nested_emphasis_produces_styled_runs() {
        let blocks = parse("Plain <b>bold <i>both</i></b> tail").expect("parse");
        assert_eq!(blocks.len(), 1);
        let runs = texts(&blocks[0]);
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0].0, "Plain ");
        assert!(runs[1].1.bold && !runs[1].1.italic);
        assert!(runs[2].1.bold && runs[2].1.italic);
        assert_eq!(runs[3].1, RunStyle::default());
    }

    #[test]
    fn font_tag_sets_size_and_color() {
        let blocks =
            parse(r##"<font size="16" color="#1a365d"><b>$2.4M</b></font>"##).expect("parse");
        let runs = texts(&blocks[0]);
        assert_eq!(runs[0].1.size, Some(16.0));
        assert_eq!(runs[0].1.color, Color::from_hex("#1a365d").ok());
        assert!(runs[0].1.bold);
    }

    #[test]
    fn para_blocks_carry_alignment_and_split_the_text() {
        let blocks = parse(
            r#"<para align="center">First<br/>line</para><para align="right">Second</para>"#,
        )
        .expect("parse");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].align, Some(Alignment::Center));
        assert!(blocks[0].inlines.contains(&Inline::LineBreak));
        assert_eq!(blocks[1].align, Some(Alignment::Right));
    }

    #[test]
    fn entities_are_decoded() {
        let blocks = parse("R&amp;D &lt;tag&gt; &#39;q&#39; &quot;x&quot;").expect("parse");
        assert_eq!(texts(&blocks[0])[0].0, "R&D <tag> 'q' \"x\"");
        assert_eq!(parse(&escape("a<b & c")).expect("escaped")[0].inlines.len(), 1);
    }

    #[test]
    fn malformed_markup_reports_the_offset() {
        let err = parse("ok <b>bold</i>").expect_err("mismatch");
        assert!(matches!(err, DocError::Markup { offset: 10, .. }), "{err}");
        assert!(matches!(
            parse("<blink>x</blink>"),
            Err(DocError::Markup { offset: 0, .. })
        ));
        assert!(parse("<b>open").is_err());
        assert!(parse("fish & chips").is_err());
        assert!(parse(r#"<font color="navy">x</font>"#).is_err());
    }

    #[test]
    fn whitespace_only_blocks_are_dropped() {
        let blocks = parse("  <para align=\"left\">x</para>  ").expect("parse");
        assert_eq!(blocks.len(), 1);
    }
}
