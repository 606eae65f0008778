use crate::canvas::Canvas;
use crate::error::Result;
use crate::font::StandardFont;
use crate::markup::{self, Inline};
use crate::style::{Alignment, ParagraphStyle, TextTransform};
use crate::types::{Color, Pt, Size};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakBefore {
    Auto,
    /// Start a new page unless nothing has been placed on the current one.
    Page,
    /// Start a new page even when the current one is still empty.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakAfter {
    Auto,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakInside {
    Auto,
    Avoid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub break_before: BreakBefore,
    pub break_after: BreakAfter,
    pub break_inside: BreakInside,
    pub orphans: usize,
    pub widows: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            break_before: BreakBefore::Auto,
            break_after: BreakAfter::Auto,
            break_inside: BreakInside::Auto,
            orphans: 2,
            widows: 2,
        }
    }
}

impl Pagination {
    fn resolved_orphans(self) -> usize {
        self.orphans.max(1)
    }

    fn resolved_widows(self) -> usize {
        self.widows.max(1)
    }
}

pub trait Flowable: FlowableClone + Send + Sync {
    fn wrap(&self, avail_width: Pt, avail_height: Pt) -> Size;
    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)>;
    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, avail_height: Pt);

    fn pagination(&self) -> Pagination {
        Pagination::default()
    }

    fn space_before(&self) -> Pt {
        Pt::ZERO
    }

    fn space_after(&self) -> Pt {
        Pt::ZERO
    }

    // Break markers steer pagination but never count as page content.
    fn is_break_marker(&self) -> bool {
        false
    }

    fn debug_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub trait FlowableClone {
    fn clone_box(&self) -> Box<dyn Flowable>;
}

impl<T> FlowableClone for T
where
    T: 'static + Flowable + Clone,
{
    fn clone_box(&self) -> Box<dyn Flowable> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Flowable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Flowable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.debug_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    font: StandardFont,
    size: Pt,
    color: Color,
    width: Pt,
}

impl Segment {
    fn same_style(&self, other: &Segment) -> bool {
        self.font == other.font && self.size == other.size && self.color == other.color
    }
}

#[derive(Debug, Clone)]
enum Token {
    Word {
        segments: Vec<Segment>,
        width: Pt,
        max_size: Pt,
        // Width of a space set in the word's trailing style.
        trailing_space: Pt,
    },
    Break,
}

#[derive(Debug, Clone)]
struct TextBlock {
    align: Alignment,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cursor {
    block: usize,
    token: usize,
}

#[derive(Debug, Clone)]
struct LineLayout {
    block: usize,
    start: usize,
    end: usize,
    width: Pt,
    height: Pt,
    max_size: Pt,
    words: usize,
    align: Alignment,
    justify: bool,
}

#[derive(Debug, Default)]
struct LineCache {
    entries: Vec<(i64, Arc<Vec<LineLayout>>)>,
}

impl LineCache {
    fn get(&self, key: i64) -> Option<Arc<Vec<LineLayout>>> {
        self.entries
            .iter()
            .find_map(|(k, v)| if *k == key { Some(v.clone()) } else { None })
    }

    fn insert(&mut self, key: i64, value: Arc<Vec<LineLayout>>) {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, value));
        const MAX_ENTRIES: usize = 8;
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }
}

struct LineBuilder {
    block: usize,
    start: usize,
    width: Pt,
    max_size: Pt,
    words: usize,
    pending_space: Pt,
}

impl LineBuilder {
    fn new(block: usize, start: usize) -> Self {
        Self {
            block,
            start,
            width: Pt::ZERO,
            max_size: Pt::ZERO,
            words: 0,
            pending_space: Pt::ZERO,
        }
    }

    fn fits(&self, word_width: Pt, max_width: Pt) -> bool {
        self.words == 0 || self.width + self.pending_space + word_width <= max_width
    }

    fn push(&mut self, width: Pt, max_size: Pt, trailing_space: Pt) {
        if self.words > 0 {
            self.width += self.pending_space;
        }
        self.width += width;
        self.max_size = self.max_size.max(max_size);
        self.pending_space = trailing_space;
        self.words += 1;
    }
}

/// Styled, wrapped rich text.
#[derive(Debug, Clone)]
pub struct Paragraph {
    blocks: Arc<Vec<TextBlock>>,
    start: Cursor,
    end: Cursor,
    font_size: Pt,
    leading: Pt,
    left_indent: Pt,
    space_before: Pt,
    space_after: Pt,
    pagination: Pagination,
    layout_cache: Arc<Mutex<LineCache>>,
}

impl Paragraph {
    pub fn new(text: &str, style: &ParagraphStyle) -> Result<Self> {
        let rich = markup::parse(text)?;
        let mut blocks = Vec::with_capacity(rich.len());
        for block in rich {
            let mut tokens = Vec::new();
            let mut word: Vec<Segment> = Vec::new();
            for inline in block.inlines {
                match inline {
                    Inline::LineBreak => {
                        push_word(&mut tokens, &mut word);
                        tokens.push(Token::Break);
                    }
                    Inline::Text { text, style: run } => {
                        let font = style.font.with_emphasis(run.bold, run.italic);
                        let size = run.size.map(Pt::from_f32).unwrap_or(style.font_size);
                        let color = run.color.unwrap_or(style.text_color);
                        let text = match style.text_transform {
                            TextTransform::None => text,
                            other => other.apply(&text),
                        };
                        for ch in text.chars() {
                            if is_collapsible_space(ch) {
                                push_word(&mut tokens, &mut word);
                                continue;
                            }
                            match word.last_mut() {
                                Some(seg)
                                    if seg.font == font && seg.size == size && seg.color == color =>
                                {
                                    seg.text.push(ch)
                                }
                                _ => word.push(Segment {
                                    text: ch.to_string(),
                                    font,
                                    size,
                                    color,
                                    width: Pt::ZERO,
                                }),
                            }
                        }
                    }
                }
            }
            push_word(&mut tokens, &mut word);
            if !tokens.is_empty() {
                blocks.push(TextBlock {
                    align: block.align.unwrap_or(style.alignment),
                    tokens,
                });
            }
        }
        let end = Cursor {
            block: blocks.len().saturating_sub(1),
            token: blocks.last().map(|b| b.tokens.len()).unwrap_or(0),
        };
        Ok(Self {
            blocks: Arc::new(blocks),
            start: Cursor { block: 0, token: 0 },
            end,
            font_size: style.font_size,
            leading: style.resolved_leading(),
            left_indent: style.left_indent,
            space_before: style.space_before,
            space_after: style.space_after,
            pagination: Pagination::default(),
            layout_cache: Arc::new(Mutex::new(LineCache::default())),
        })
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// The words of this paragraph (or split part), space separated.
    pub fn plain_text(&self) -> String {
        let mut words = Vec::new();
        self.for_each_token(|_, token| {
            if let Token::Word { segments, .. } = token {
                words.push(
                    segments
                        .iter()
                        .map(|seg| seg.text.as_str())
                        .collect::<String>(),
                );
            }
        });
        words.join(" ")
    }

    pub fn line_count(&self, avail_width: Pt) -> usize {
        self.layout_lines(avail_width).len()
    }

    fn block_range(&self, block: usize) -> Option<(usize, usize)> {
        if block < self.start.block || block > self.end.block {
            return None;
        }
        let len = self.blocks.get(block)?.tokens.len();
        let first = if block == self.start.block {
            self.start.token
        } else {
            0
        };
        let last = if block == self.end.block {
            self.end.token.min(len)
        } else {
            len
        };
        (first < last).then_some((first, last))
    }

    fn for_each_token(&self, mut f: impl FnMut(usize, &Token)) {
        for (block_idx, block) in self.blocks.iter().enumerate() {
            if let Some((first, last)) = self.block_range(block_idx) {
                for token in &block.tokens[first..last] {
                    f(block_idx, token);
                }
            }
        }
    }

    fn line_height(&self, max_size: Pt) -> Pt {
        self.leading.max(max_size.mul_ratio(6, 5))
    }

    fn layout_lines(&self, avail_width: Pt) -> Arc<Vec<LineLayout>> {
        let max_width = (avail_width - self.left_indent).max(Pt::from_f32(1.0));
        let key = max_width.to_milli_i64();
        if let Ok(cache) = self.layout_cache.lock() {
            if let Some(lines) = cache.get(key) {
                return lines;
            }
        }
        let lines = Arc::new(self.compute_lines(max_width));
        if let Ok(mut cache) = self.layout_cache.lock() {
            cache.insert(key, lines.clone());
        }
        lines
    }

    fn compute_lines(&self, max_width: Pt) -> Vec<LineLayout> {
        let mut lines = Vec::new();
        for (block_idx, block) in self.blocks.iter().enumerate() {
            let Some((first, last)) = self.block_range(block_idx) else {
                continue;
            };
            let total = block.tokens.len();
            let mut builder = LineBuilder::new(block_idx, first);
            for idx in first..last {
                match &block.tokens[idx] {
                    Token::Break => {
                        lines.push(self.finish_line(&builder, block, idx + 1, true, total));
                        builder = LineBuilder::new(block_idx, idx + 1);
                    }
                    Token::Word {
                        width,
                        max_size,
                        trailing_space,
                        ..
                    } => {
                        if !builder.fits(*width, max_width) {
                            lines.push(self.finish_line(&builder, block, idx, false, total));
                            builder = LineBuilder::new(block_idx, idx);
                        }
                        builder.push(*width, *max_size, *trailing_space);
                    }
                }
            }
            if builder.words > 0 {
                lines.push(self.finish_line(&builder, block, last, false, total));
            }
        }
        lines
    }

    fn finish_line(
        &self,
        builder: &LineBuilder,
        block: &TextBlock,
        end: usize,
        forced: bool,
        block_len: usize,
    ) -> LineLayout {
        let max_size = if builder.words == 0 {
            self.font_size
        } else {
            builder.max_size
        };
        LineLayout {
            block: builder.block,
            start: builder.start,
            end,
            width: builder.width,
            height: self.line_height(max_size),
            max_size,
            words: builder.words,
            align: block.align,
            justify: block.align == Alignment::Justify && !forced && end < block_len,
        }
    }

    fn with_range(&self, start: Cursor, end: Cursor) -> Self {
        Self {
            blocks: self.blocks.clone(),
            start,
            end,
            layout_cache: Arc::new(Mutex::new(LineCache::default())),
            ..self.clone()
        }
    }

    fn draw_line(&self, canvas: &mut Canvas, line: &LineLayout, x: Pt, top: Pt, inner: Pt) {
        let Some(block) = self.blocks.get(line.block) else {
            return;
        };
        let baseline = top + line.height - line.max_size.mul_ratio(1, 5);
        let slack = (inner - line.width).max(Pt::ZERO);
        let gaps = line.words.saturating_sub(1) as i32;
        let (offset, extra) = match line.align {
            Alignment::Center => (slack.mul_ratio(1, 2), Pt::ZERO),
            Alignment::Right => (slack, Pt::ZERO),
            Alignment::Justify if line.justify && gaps > 0 => (Pt::ZERO, slack / gaps),
            _ => (Pt::ZERO, Pt::ZERO),
        };
        let mut pen = x + self.left_indent + offset;
        let mut run: Option<(Pt, Segment)> = None;
        let mut previous_space: Option<Pt> = None;
        for token in &block.tokens[line.start..line.end] {
            let Token::Word {
                segments,
                trailing_space,
                ..
            } = token
            else {
                continue;
            };
            if let Some(space) = previous_space {
                if extra > Pt::ZERO {
                    flush_run(canvas, run.take(), baseline);
                    pen += space + extra;
                } else {
                    if let Some((_, current)) = run.as_mut() {
                        current.text.push(' ');
                    }
                    pen += space;
                }
            }
            for seg in segments {
                match run.as_mut() {
                    Some((_, current)) if current.same_style(seg) => {
                        current.text.push_str(&seg.text)
                    }
                    _ => {
                        flush_run(canvas, run.take(), baseline);
                        run = Some((pen, seg.clone()));
                    }
                }
                pen += seg.width;
            }
            previous_space = Some(*trailing_space);
        }
        flush_run(canvas, run, baseline);
    }
}

fn is_collapsible_space(ch: char) -> bool {
    ch.is_whitespace() && ch != '\u{00A0}'
}

fn push_word(tokens: &mut Vec<Token>, word: &mut Vec<Segment>) {
    if word.is_empty() {
        return;
    }
    let mut segments = std::mem::take(word);
    for seg in &mut segments {
        seg.width = seg.font.string_width(seg.size, &seg.text);
    }
    let width = segments.iter().map(|seg| seg.width).sum();
    let max_size = segments
        .iter()
        .fold(Pt::ZERO, |acc, seg| acc.max(seg.size));
    let trailing_space = segments
        .last()
        .map(|seg| seg.font.string_width(seg.size, " "))
        .unwrap_or(Pt::ZERO);
    tokens.push(Token::Word {
        segments,
        width,
        max_size,
        trailing_space,
    });
}

fn flush_run(canvas: &mut Canvas, run: Option<(Pt, Segment)>, baseline: Pt) {
    let Some((x, seg)) = run else {
        return;
    };
    canvas.set_fill_color(seg.color);
    canvas.set_font(seg.font, seg.size);
    canvas.draw_string(x, baseline, seg.text);
}

impl Flowable for Paragraph {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        let lines = self.layout_lines(avail_width);
        Size {
            width: avail_width,
            height: lines.iter().map(|line| line.height).sum(),
        }
    }

    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        let lines = self.layout_lines(avail_width);
        if avail_height <= Pt::ZERO {
            return None;
        }
        let mut used = Pt::ZERO;
        let mut max_lines = 0;
        for line in lines.iter() {
            if used + line.height > avail_height {
                break;
            }
            used += line.height;
            max_lines += 1;
        }
        let total_lines = lines.len();
        if max_lines == 0 || max_lines >= total_lines {
            return None;
        }

        let orphans = self.pagination.resolved_orphans();
        let widows = self.pagination.resolved_widows();
        let mut split_at = max_lines;
        if split_at < orphans {
            return None;
        }
        if total_lines - split_at < widows {
            let adjusted = total_lines.saturating_sub(widows);
            if adjusted >= orphans {
                split_at = adjusted;
            } else {
                return None;
            }
        }
        if split_at == 0 || split_at >= total_lines {
            return None;
        }

        let boundary = &lines[split_at];
        let cut = Cursor {
            block: boundary.block,
            token: boundary.start,
        };
        let mut first = self.with_range(self.start, cut);
        first.space_after = Pt::ZERO;
        first.pagination.break_after = BreakAfter::Auto;
        let mut second = self.with_range(cut, self.end);
        second.space_before = Pt::ZERO;
        second.pagination.break_before = BreakBefore::Auto;
        Some((Box::new(first), Box::new(second)))
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, _avail_height: Pt) {
        let lines = self.layout_lines(avail_width);
        let inner = (avail_width - self.left_indent).max(Pt::ZERO);
        let mut top = y;
        for line in lines.iter() {
            self.draw_line(canvas, line, x, top, inner);
            top += line.height;
        }
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn space_before(&self) -> Pt {
        self.space_before
    }

    fn space_after(&self) -> Pt {
        self.space_after
    }

    fn debug_name(&self) -> &'static str {
        "Paragraph"
    }
}

#[derive(Debug, Clone)]
pub struct Spacer {
    height: Pt,
    pagination: Pagination,
}

impl Spacer {
    pub fn new(height: f32) -> Self {
        Self::new_pt(Pt::from_f32(height))
    }

    pub fn new_pt(height: Pt) -> Self {
        Self {
            height,
            pagination: Pagination::default(),
        }
    }
}

impl Flowable for Spacer {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        Size {
            width: avail_width,
            height: self.height.max(Pt::ZERO),
        }
    }

    fn split(
        &self,
        _avail_width: Pt,
        _avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        None
    }

    fn draw(&self, _canvas: &mut Canvas, _x: Pt, _y: Pt, _avail_width: Pt, _avail_height: Pt) {}

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn debug_name(&self) -> &'static str {
        "Spacer"
    }
}

/// Zero-height page break marker.
#[derive(Debug, Clone)]
pub struct PageBreak {
    pagination: Pagination,
}

impl PageBreak {
    pub fn new() -> Self {
        Self::with_break(BreakBefore::Page)
    }

    /// Breaks even when the current page has no content yet.
    pub fn hard() -> Self {
        Self::with_break(BreakBefore::Always)
    }

    fn with_break(break_before: BreakBefore) -> Self {
        Self {
            pagination: Pagination {
                break_before,
                ..Pagination::default()
            },
        }
    }
}

impl Default for PageBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl Flowable for PageBreak {
    fn wrap(&self, _avail_width: Pt, _avail_height: Pt) -> Size {
        Size::new(Pt::ZERO, Pt::ZERO)
    }

    fn split(
        &self,
        _avail_width: Pt,
        _avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        None
    }

    fn draw(&self, _canvas: &mut Canvas, _x: Pt, _y: Pt, _avail_width: Pt, _avail_height: Pt) {}

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn is_break_marker(&self) -> bool {
        true
    }

    fn debug_name(&self) -> &'static str {
        "PageBreak"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::types::Size as PageSize;

    fn body() -> ParagraphStyle {
        ParagraphStyle::new("Body").with_font_size(10.0).with_leading(14.0)
    }

    fn strings(canvas: Canvas) -> Vec<(Pt, Pt, String)> {
        let doc = canvas.finish();
        doc.pages[0]
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { x, y, text } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn words_wrap_greedily_at_the_available_width() {
        let para = Paragraph::new("alpha beta gamma delta", &body()).expect("para");
        let one_line = para.wrap(Pt::from_f32(500.0), Pt::from_f32(100.0));
        assert_eq!(one_line.height, Pt::from_f32(14.0));
        // "alpha beta" is about 48pt at 10pt Helvetica.
        assert_eq!(para.line_count(Pt::from_f32(60.0)), 2);
        let narrow = para.wrap(Pt::from_f32(60.0), Pt::from_f32(100.0));
        assert_eq!(narrow.height, Pt::from_f32(28.0));
    }

    #[test]
    fn styled_runs_are_merged_per_style() {
        let para = Paragraph::new("<b>Pop</b>Top rocks", &body()).expect("para");
        let mut canvas = Canvas::new(PageSize::letter());
        para.draw(
            &mut canvas,
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(400.0),
            Pt::from_f32(100.0),
        );
        let runs = strings(canvas);
        let texts: Vec<&str> = runs.iter().map(|(_, _, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["Pop", "Top rocks"]);
        assert_eq!(para.plain_text(), "PopTop rocks");
    }

    #[test]
    fn centered_lines_are_offset_by_half_the_slack() {
        let style = body().with_alignment(Alignment::Center);
        let para = Paragraph::new("Pop", &style).expect("para");
        let mut canvas = Canvas::new(PageSize::letter());
        para.draw(
            &mut canvas,
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(100.0),
            Pt::from_f32(100.0),
        );
        let runs = strings(canvas);
        let expected = (Pt::from_f32(100.0) - Pt::from_f32(17.79)).mul_ratio(1, 2);
        assert_eq!(runs[0].0, expected);
        // Baseline sits a fifth of the font size above the line bottom.
        assert_eq!(runs[0].1, Pt::from_f32(12.0));
    }

    #[test]
    fn justified_text_leaves_the_last_line_ragged() {
        let style = body().with_alignment(Alignment::Justify);
        let para = Paragraph::new("aa bb cc dd ee ff gg hh", &style).expect("para");
        let mut canvas = Canvas::new(PageSize::letter());
        para.draw(
            &mut canvas,
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(40.0),
            Pt::from_f32(200.0),
        );
        let runs = strings(canvas);
        // "aa bb cc" is 38.92pt wide, so the last word is pushed flush right.
        assert_eq!(runs[2].2, "cc");
        assert_eq!(runs[2].0, Pt::from_f32(28.88));
        let last = runs.last().expect("runs");
        assert_eq!(last.2, "gg hh");
        assert_eq!(last.0, Pt::ZERO);
    }

    #[test]
    fn line_breaks_force_new_lines() {
        let para = Paragraph::new("one<br/>two<br/><br/>three", &body()).expect("para");
        assert_eq!(para.line_count(Pt::from_f32(500.0)), 4);
    }

    #[test]
    fn larger_inline_sizes_grow_the_line() {
        let para = Paragraph::new(r#"<font size="20">Big</font> small"#, &body()).expect("para");
        let size = para.wrap(Pt::from_f32(500.0), Pt::from_f32(100.0));
        assert_eq!(size.height, Pt::from_f32(24.0));
    }

    #[test]
    fn uppercase_transform_applies_to_text() {
        let style = body().with_text_transform(TextTransform::Uppercase);
        let para = Paragraph::new("market size", &style).expect("para");
        assert_eq!(para.plain_text(), "MARKET SIZE");
    }

    #[test]
    fn split_respects_orphans_and_widows() {
        let text = "one<br/>two<br/>three<br/>four<br/>five";
        let para = Paragraph::new(text, &body()).expect("para");
        let width = Pt::from_f32(500.0);
        // One line of room is below the orphan minimum.
        assert!(para.split(width, Pt::from_f32(14.0)).is_none());
        // Four lines of room would strand a single widow; split after three.
        let (first, second) = para.split(width, Pt::from_f32(56.0)).expect("split");
        assert_eq!(first.wrap(width, Pt::from_f32(100.0)).height, Pt::from_f32(42.0));
        assert_eq!(second.wrap(width, Pt::from_f32(100.0)).height, Pt::from_f32(28.0));
    }

    #[test]
    fn split_continuation_reflows_at_a_new_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let para = Paragraph::new(text, &body().with_space_before(6.0)).expect("para");
        let narrow = Pt::from_f32(60.0);
        let (first, second) = para.split(narrow, Pt::from_f32(28.0)).expect("split");
        assert_eq!(first.space_before(), Pt::from_f32(6.0));
        assert_eq!(second.space_before(), Pt::ZERO);
        let wide = second.wrap(Pt::from_f32(500.0), Pt::from_f32(100.0));
        assert_eq!(wide.height, Pt::from_f32(14.0));
    }

    #[test]
    fn markup_errors_surface_from_the_constructor() {
        assert!(Paragraph::new("<b>unclosed", &body()).is_err());
    }

    #[test]
    fn page_breaks_are_markers() {
        assert!(PageBreak::new().is_break_marker());
        assert_eq!(PageBreak::new().pagination().break_before, BreakBefore::Page);
        assert_eq!(PageBreak::hard().pagination().break_before, BreakBefore::Always);
        assert!(!Spacer::new(5.0).is_break_marker());
    }
}
