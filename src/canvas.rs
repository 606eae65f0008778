use crate::font::StandardFont;
use crate::types::{Color, Pt, Rect, Size};

// Bezier control-point factor for quarter-circle corners.
const KAPPA: f32 = 0.552_284_75;

/// Drawing commands in top-left-origin page space. Text positions are baselines.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    // Non-rendered metadata used for page-aware reporting. Ignored by the PDF renderer.
    Meta {
        key: String,
        value: String,
    },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    SetFontName(StandardFont),
    SetFontSize(Pt),
    ClipRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    // Clip to the current path (W n). The current path is consumed.
    ClipPath,
    MoveTo {
        x: Pt,
        y: Pt,
    },
    LineTo {
        x: Pt,
        y: Pt,
    },
    CurveTo {
        x1: Pt,
        y1: Pt,
        x2: Pt,
        y2: Pt,
        x: Pt,
        y: Pt,
    },
    ClosePath,
    Fill,
    Stroke,
    FillStroke,
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
    DrawRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Concatenated text of every string drawn on the page, one entry per draw call.
    pub fn text_runs(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font_size: Pt,
    font: StandardFont,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font_size: Pt::from_f32(12.0),
            font: StandardFont::Helvetica,
        }
    }
}

pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    state_stack: Vec<GraphicsState>,
    current_state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::new(),
            state_stack: Vec::new(),
            current_state: GraphicsState::default(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn save_state(&mut self) {
        self.state_stack.push(self.current_state.clone());
        self.current.commands.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current_state = state;
            self.current.commands.push(Command::RestoreState);
        }
    }

    pub fn record_flowable_bounds(&mut self, rect: Rect) {
        let value = format!(
            "{},{},{},{}",
            rect.x.to_milli_i64(),
            rect.y.to_milli_i64(),
            rect.width.to_milli_i64(),
            rect.height.to_milli_i64()
        );
        self.current.commands.push(Command::Meta {
            key: crate::META_FLOWABLE_BOUNDS_KEY.to_string(),
            value,
        });
    }

    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.current.commands.push(Command::Meta {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.current_state.stroke_color == color {
            return;
        }
        self.current_state.stroke_color = color;
        self.current.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = if width < Pt::ZERO { Pt::ZERO } else { width };
        if self.current_state.line_width == width {
            return;
        }
        self.current_state.line_width = width;
        self.current.commands.push(Command::SetLineWidth(width));
    }

    pub fn set_font_name(&mut self, font: StandardFont) {
        if self.current_state.font == font {
            return;
        }
        self.current_state.font = font;
        self.current.commands.push(Command::SetFontName(font));
    }

    pub fn set_font_size(&mut self, size: Pt) {
        if self.current_state.font_size == size {
            return;
        }
        self.current_state.font_size = size;
        self.current.commands.push(Command::SetFontSize(size));
    }

    pub fn set_font(&mut self, font: StandardFont, size: Pt) {
        self.set_font_name(font);
        self.set_font_size(size);
    }

    /// Width of `text` in the current font and size.
    pub fn string_width(&self, text: &str) -> Pt {
        self.current_state
            .font
            .string_width(self.current_state.font_size, text)
    }

    pub fn clip_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.current.commands.push(Command::ClipRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn clip_path(&mut self) {
        self.current.commands.push(Command::ClipPath);
    }

    pub fn move_to(&mut self, x: Pt, y: Pt) {
        self.current.commands.push(Command::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: Pt, y: Pt) {
        self.current.commands.push(Command::LineTo { x, y });
    }

    pub fn curve_to(&mut self, x1: Pt, y1: Pt, x2: Pt, y2: Pt, x: Pt, y: Pt) {
        self.current.commands.push(Command::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    pub fn close_path(&mut self) {
        self.current.commands.push(Command::ClosePath);
    }

    pub fn fill(&mut self) {
        self.current.commands.push(Command::Fill);
    }

    pub fn stroke(&mut self) {
        self.current.commands.push(Command::Stroke);
    }

    pub fn fill_stroke(&mut self) {
        self.current.commands.push(Command::FillStroke);
    }

    pub fn line(&mut self, x1: Pt, y1: Pt, x2: Pt, y2: Pt) {
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.stroke();
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn draw_centred_string(&mut self, center_x: Pt, y: Pt, text: &str) {
        let width = self.string_width(text);
        self.draw_string(center_x - width.mul_ratio(1, 2), y, text);
    }

    pub fn draw_right_string(&mut self, right_x: Pt, y: Pt, text: &str) {
        let width = self.string_width(text);
        self.draw_string(right_x - width, y, text);
    }

    /// Filled rectangle in the current fill color.
    pub fn draw_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.current.commands.push(Command::DrawRect {
            x,
            y,
            width,
            height,
        });
    }

    /// Appends a closed rounded-rectangle path. The radius is capped at half the short side.
    pub fn rounded_rect_path(&mut self, x: Pt, y: Pt, width: Pt, height: Pt, radius: Pt) {
        let max_r = width.mul_ratio(1, 2).min(height.mul_ratio(1, 2));
        let r = radius.min(max_r);
        let right = x + width;
        let bottom = y + height;
        if r <= Pt::ZERO {
            self.move_to(x, y);
            self.line_to(right, y);
            self.line_to(right, bottom);
            self.line_to(x, bottom);
            self.close_path();
            return;
        }
        let c = r * KAPPA;

        self.move_to(x + r, y);
        self.line_to(right - r, y);
        self.curve_to(right - r + c, y, right, y + r - c, right, y + r);
        self.line_to(right, bottom - r);
        self.curve_to(
            right,
            bottom - r + c,
            right - r + c,
            bottom,
            right - r,
            bottom,
        );
        self.line_to(x + r, bottom);
        self.curve_to(x + r - c, bottom, x, bottom - r + c, x, bottom - r);
        self.line_to(x, y + r);
        self.curve_to(x, y + r - c, x + r - c, y, x + r, y);
        self.close_path();
    }

    pub fn round_rect(
        &mut self,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        radius: Pt,
        fill: bool,
        stroke: bool,
    ) {
        if !fill && !stroke {
            return;
        }
        self.rounded_rect_path(x, y, width, height, radius);
        match (fill, stroke) {
            (true, true) => self.fill_stroke(),
            (true, false) => self.fill(),
            _ => self.stroke(),
        }
    }

    pub fn show_page(&mut self) {
        let current = std::mem::replace(&mut self.current, Page::new());
        self.pages.push(current);
        self.state_stack.clear();
        self.current_state = GraphicsState::default();
    }

    /// Drops whatever was recorded on the current page without emitting it.
    pub fn discard_page(&mut self) {
        self.current = Page::new();
        self.state_stack.clear();
        self.current_state = GraphicsState::default();
    }

    pub fn current_command_count(&self) -> usize {
        self.current.commands.len()
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.commands.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }

    pub fn finish_without_show(self) -> Document {
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redundant_state_changes_are_elided() {
        let mut canvas = Canvas::new(Size::letter());
        canvas.set_fill_color(Color::WHITE);
        canvas.set_fill_color(Color::WHITE);
        canvas.set_font(StandardFont::Helvetica, Pt::from_f32(12.0));
        canvas.set_font(StandardFont::HelveticaBold, Pt::from_f32(12.0));
        assert_eq!(
            canvas.current.commands,
            vec![
                Command::SetFillColor(Color::WHITE),
                Command::SetFontName(StandardFont::HelveticaBold),
            ]
        );
    }

    #[test]
    fn restore_state_resets_elision_tracking() {
        let mut canvas = Canvas::new(Size::letter());
        canvas.save_state();
        canvas.set_fill_color(Color::WHITE);
        canvas.restore_state();
        canvas.set_fill_color(Color::WHITE);
        let fills = canvas
            .current
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetFillColor(_)))
            .count();
        assert_eq!(fills, 2);
    }

    #[test]
    fn centred_string_is_offset_by_half_its_width() {
        let mut canvas = Canvas::new(Size::letter());
        canvas.set_font(StandardFont::Helvetica, Pt::from_f32(10.0));
        canvas.draw_centred_string(Pt::from_f32(100.0), Pt::from_f32(50.0), "Pop");
        let Some(Command::DrawString { x, .. }) = canvas.current.commands.last() else {
            panic!("expected a string");
        };
        assert_eq!(*x, Pt::from_f32(100.0) - Pt::from_f32(17.79).mul_ratio(1, 2));
    }

    #[test]
    fn round_rect_emits_four_curves() {
        let mut canvas = Canvas::new(Size::letter());
        canvas.round_rect(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(100.0),
            Pt::from_f32(40.0),
            Pt::from_f32(5.0),
            true,
            false,
        );
        let curves = canvas
            .current
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::CurveTo { .. }))
            .count();
        assert_eq!(curves, 4);
        assert_eq!(canvas.current.commands.last(), Some(&Command::Fill));
    }

    #[test]
    fn finish_always_yields_at_least_one_page() {
        let doc = Canvas::new(Size::letter()).finish();
        assert_eq!(doc.pages.len(), 1);
    }
}
