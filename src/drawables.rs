//! Fixed-size flowables drawn with direct canvas calls.

use crate::canvas::Canvas;
use crate::error::{DocError, Result};
use crate::flowable::Flowable;
use crate::font::StandardFont;
use crate::theme;
use crate::types::{Color, Pt, Size, inch};

const BOX_RADIUS: f32 = 5.0;
const CARD_RADIUS: f32 = 3.0;
const CARD_BAR_WIDTH: f32 = 3.0;

fn dimension(name: &str, value: f32) -> Result<Pt> {
    if !value.is_finite() || value < 0.0 {
        return Err(DocError::InvalidDimensions(format!(
            "{name} must be a finite, non-negative length (got {value})"
        )));
    }
    Ok(Pt::from_f32(value))
}

fn no_split() -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
    None
}

/// A filled rounded rectangle with an optional centred caption.
#[derive(Debug, Clone)]
pub struct ColoredBox {
    width: Pt,
    height: Pt,
    color: Color,
    caption: String,
    caption_color: Color,
}

impl ColoredBox {
    pub fn new(width: f32, height: f32, color: Color) -> Result<Self> {
        Ok(Self {
            width: dimension("width", width)?,
            height: dimension("height", height)?,
            color,
            caption: String::new(),
            caption_color: Color::WHITE,
        })
    }

    pub fn with_caption(mut self, text: impl Into<String>, color: Color) -> Self {
        self.caption = text.into();
        self.caption_color = color;
        self
    }
}

impl Flowable for ColoredBox {
    fn wrap(&self, _avail_width: Pt, _avail_height: Pt) -> Size {
        Size::new(self.width, self.height)
    }

    fn split(&self, _w: Pt, _h: Pt) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        no_split()
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, _avail_width: Pt, _avail_height: Pt) {
        canvas.set_fill_color(self.color);
        canvas.round_rect(
            x,
            y,
            self.width,
            self.height,
            Pt::from_f32(BOX_RADIUS),
            true,
            false,
        );
        if self.caption.is_empty() {
            return;
        }
        let size = Pt::from_f32(10.0);
        canvas.set_fill_color(self.caption_color);
        canvas.set_font(StandardFont::HelveticaBold, size);
        let baseline = y + self.height.mul_ratio(1, 2) + size.mul_ratio(1, 3);
        canvas.draw_centred_string(x + self.width.mul_ratio(1, 2), baseline, &self.caption);
    }

    fn debug_name(&self) -> &'static str {
        "ColoredBox"
    }
}

/// Headline figure over a small uppercase label, with a gold accent bar.
#[derive(Debug, Clone)]
pub struct MetricCard {
    value: String,
    label: String,
    width: Pt,
    height: Pt,
}

impl MetricCard {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            width: inch(1.5),
            height: inch(0.8),
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Result<Self> {
        self.width = dimension("width", width)?;
        self.height = dimension("height", height)?;
        Ok(self)
    }
}

impl Flowable for MetricCard {
    fn wrap(&self, _avail_width: Pt, _avail_height: Pt) -> Size {
        Size::new(self.width, self.height)
    }

    fn split(&self, _w: Pt, _h: Pt) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        no_split()
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, _avail_width: Pt, _avail_height: Pt) {
        canvas.set_fill_color(theme::LIGHT);
        canvas.round_rect(
            x,
            y,
            self.width,
            self.height,
            Pt::from_f32(CARD_RADIUS),
            true,
            false,
        );
        canvas.set_fill_color(theme::SECONDARY);
        canvas.draw_rect(x, y, Pt::from_f32(CARD_BAR_WIDTH), self.height);

        let center = x + self.width.mul_ratio(1, 2);
        canvas.set_fill_color(theme::PRIMARY);
        canvas.set_font(StandardFont::HelveticaBold, Pt::from_f32(14.0));
        canvas.draw_centred_string(center, y + Pt::from_f32(25.0), &self.value);

        canvas.set_fill_color(theme::TEXT_LIGHT);
        canvas.set_font(StandardFont::Helvetica, Pt::from_f32(7.0));
        let label = self.label.to_uppercase();
        canvas.draw_centred_string(center, y + self.height - Pt::from_f32(8.0), &label);
    }

    fn debug_name(&self) -> &'static str {
        "MetricCard"
    }
}

/// Fixed-size flowables side by side, centred as a group.
#[derive(Debug, Clone)]
pub struct CardRow {
    items: Vec<Box<dyn Flowable>>,
    gap: Pt,
}

impl CardRow {
    pub fn new(items: Vec<Box<dyn Flowable>>, gap: f32) -> Result<Self> {
        Ok(Self {
            items,
            gap: dimension("gap", gap)?,
        })
    }

    fn item_sizes(&self, avail_width: Pt, avail_height: Pt) -> Vec<Size> {
        self.items
            .iter()
            .map(|item| item.wrap(avail_width, avail_height))
            .collect()
    }
}

impl Flowable for CardRow {
    fn wrap(&self, avail_width: Pt, avail_height: Pt) -> Size {
        let sizes = self.item_sizes(avail_width, avail_height);
        let gaps = self.gap * sizes.len().saturating_sub(1) as i32;
        Size::new(
            sizes.iter().map(|s| s.width).sum::<Pt>() + gaps,
            sizes.iter().map(|s| s.height).fold(Pt::ZERO, Pt::max),
        )
    }

    fn split(&self, _w: Pt, _h: Pt) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        no_split()
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, avail_height: Pt) {
        let total = self.wrap(avail_width, avail_height).width;
        let mut pen = x + (avail_width - total).max(Pt::ZERO).mul_ratio(1, 2);
        for (item, size) in self
            .items
            .iter()
            .zip(self.item_sizes(avail_width, avail_height))
        {
            item.draw(canvas, pen, y, size.width, size.height);
            pen += size.width + self.gap;
        }
    }

    fn debug_name(&self) -> &'static str {
        "CardRow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;

    fn record(flowable: &dyn Flowable, avail: f32) -> Vec<Command> {
        let mut canvas = Canvas::new(Size::letter());
        flowable.draw(
            &mut canvas,
            Pt::from_f32(10.0),
            Pt::from_f32(20.0),
            Pt::from_f32(avail),
            Pt::from_f32(500.0),
        );
        canvas.finish().pages.remove(0).commands
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        for (w, h) in [(-1.0, 10.0), (f32::NAN, 10.0), (10.0, f32::INFINITY)] {
            assert!(matches!(
                ColoredBox::new(w, h, theme::PRIMARY),
                Err(DocError::InvalidDimensions(_))
            ));
        }
        assert!(MetricCard::new("1", "x").with_size(-5.0, 10.0).is_err());
        assert!(ColoredBox::new(0.0, 0.0, theme::PRIMARY).is_ok());
    }

    #[test]
    fn colored_box_fills_a_rounded_rect_and_centres_its_caption() {
        let boxed = ColoredBox::new(100.0, 30.0, theme::PRIMARY)
            .expect("box")
            .with_caption("Go", Color::WHITE);
        let commands = record(&boxed, 400.0);
        assert!(commands.contains(&Command::Fill));
        assert!(!commands.contains(&Command::Stroke));
        let (x, y, text) = commands
            .iter()
            .find_map(|cmd| match cmd {
                Command::DrawString { x, y, text } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .expect("caption");
        assert_eq!(text, "Go");
        let width = StandardFont::HelveticaBold.string_width(Pt::from_f32(10.0), "Go");
        assert_eq!(x, Pt::from_f32(60.0) - width.mul_ratio(1, 2));
        assert_eq!(y, Pt::from_f32(35.0) + Pt::from_f32(10.0).mul_ratio(1, 3));
    }

    #[test]
    fn metric_card_draws_in_a_fixed_order() {
        let card = MetricCard::new("$2.4M", "Year 3 revenue");
        assert_eq!(
            card.wrap(Pt::ZERO, Pt::ZERO),
            Size::new(Pt::from_f32(108.0), Pt::from_f32(57.6))
        );
        let commands = record(&card, 400.0);
        let strings: Vec<(Pt, &str)> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { y, text, .. } => Some((*y, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(strings[0], (Pt::from_f32(45.0), "$2.4M"));
        assert_eq!(strings[1], (Pt::from_f32(69.6), "YEAR 3 REVENUE"));
        let bar = commands.iter().find_map(|cmd| match cmd {
            Command::DrawRect { width, height, .. } => Some((*width, *height)),
            _ => None,
        });
        assert_eq!(bar, Some((Pt::from_f32(3.0), Pt::from_f32(57.6))));
        let fills: Vec<Color> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::SetFillColor(color) => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![theme::LIGHT, theme::SECONDARY, theme::PRIMARY, theme::TEXT_LIGHT]
        );
    }

    #[test]
    fn card_rows_are_centred_with_gaps() {
        let cards: Vec<Box<dyn Flowable>> = vec![
            Box::new(MetricCard::new("1", "a")),
            Box::new(MetricCard::new("2", "b")),
        ];
        let row = CardRow::new(cards, 12.0).expect("row");
        assert_eq!(row.wrap(Pt::from_f32(400.0), Pt::ZERO).width, Pt::from_f32(228.0));
        let commands = record(&row, 400.0);
        let bars: Vec<Pt> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawRect { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        // (400 - 228) / 2 + 10 = 96
        assert_eq!(bars, vec![Pt::from_f32(96.0), Pt::from_f32(216.0)]);
    }
}
