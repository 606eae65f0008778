use crate::canvas::Canvas;
use crate::flowable::{BreakInside, Flowable};
use crate::types::{EdgeSizes, Pt, Rect};

pub enum AddResult {
    Placed,
    Split(Box<dyn Flowable>),
    Overflow(Box<dyn Flowable>),
}

/// A rectangular region that stacks flowables top-down.
pub struct Frame {
    rect: Rect,
    cursor_y: Pt,
    placed: usize,
}

impl Frame {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_y: Pt::ZERO,
            placed: 0,
        }
    }

    /// A frame inset by uniform padding.
    pub fn padded(rect: Rect, padding: f32) -> Self {
        Self::new(rect.inset(EdgeSizes::all(padding)))
    }

    pub fn remaining_height(&self) -> Pt {
        (self.rect.height - self.cursor_y).max(Pt::ZERO)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_empty(&self) -> bool {
        self.cursor_y <= Pt::ZERO
    }

    /// Number of content flowables (or split parts) drawn into this frame.
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    pub fn add(&mut self, flowable: Box<dyn Flowable>, canvas: &mut Canvas) -> AddResult {
        let avail_width = self.rect.width;
        // Space before is swallowed at the top of a frame.
        let gap = if self.is_empty() {
            Pt::ZERO
        } else {
            flowable.space_before()
        };
        let avail_height = self.remaining_height() - gap;
        if avail_height <= Pt::ZERO {
            return AddResult::Overflow(flowable);
        }

        let pagination = flowable.pagination();
        let size = flowable.wrap(avail_width, avail_height);
        if pagination.break_inside == BreakInside::Avoid
            && size.height > avail_height
            && size.height <= self.rect.height
            && !self.is_empty()
        {
            return AddResult::Overflow(flowable);
        }

        if size.height <= avail_height {
            self.place(&*flowable, canvas, gap, size.width, size.height);
            self.cursor_y += flowable.space_after();
            return AddResult::Placed;
        }

        if let Some((first, second)) = flowable.split(avail_width, avail_height) {
            let first_size = first.wrap(avail_width, avail_height);
            if first_size.height > Pt::ZERO && first_size.height <= avail_height {
                self.place(&*first, canvas, gap, first_size.width, first_size.height);
                return AddResult::Split(second);
            }
        }

        // Taller than a whole frame and unsplittable: place it anyway, clipped to the frame.
        if self.is_empty() {
            let y = self.rect.y + self.cursor_y;
            canvas.save_state();
            canvas.clip_rect(self.rect.x, y, avail_width, avail_height);
            flowable.draw(canvas, self.rect.x, y, avail_width, avail_height);
            canvas.restore_state();
            canvas.record_flowable_bounds(Rect::new(self.rect.x, y, avail_width, avail_height));
            log::warn!(
                "{} is taller than its frame ({} > {}pt) and was clipped",
                flowable.debug_name(),
                size.height.to_f32(),
                avail_height.to_f32()
            );
            self.cursor_y = self.rect.height;
            if !flowable.is_break_marker() {
                self.placed += 1;
            }
            return AddResult::Placed;
        }

        AddResult::Overflow(flowable)
    }

    fn place(&mut self, flowable: &dyn Flowable, canvas: &mut Canvas, gap: Pt, width: Pt, height: Pt) {
        let y = self.rect.y + self.cursor_y + gap;
        let avail_height = (self.remaining_height() - gap).max(Pt::ZERO);
        flowable.draw(canvas, self.rect.x, y, self.rect.width, avail_height);
        canvas.record_flowable_bounds(Rect::new(self.rect.x, y, width, height));
        self.cursor_y += gap + height;
        if !flowable.is_break_marker() && height > Pt::ZERO {
            self.placed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowable::{Pagination, Paragraph, Spacer};
    use crate::style::ParagraphStyle;
    use crate::types::Size;

    fn frame(height: f32) -> Frame {
        Frame::new(Rect::new(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::from_f32(height),
        ))
    }

    #[test]
    fn space_before_is_dropped_at_the_top_of_a_frame() {
        let style = ParagraphStyle::new("Body")
            .with_leading(12.0)
            .with_space_before(10.0)
            .with_space_after(4.0);
        let mut frame = frame(100.0);
        let mut canvas = Canvas::new(Size::letter());
        let para = Paragraph::new("first", &style).expect("para");
        assert!(matches!(
            frame.add(Box::new(para.clone()), &mut canvas),
            AddResult::Placed
        ));
        assert_eq!(frame.remaining_height(), Pt::from_f32(84.0));
        assert!(matches!(
            frame.add(Box::new(para), &mut canvas),
            AddResult::Placed
        ));
        assert_eq!(frame.remaining_height(), Pt::from_f32(58.0));
        assert_eq!(frame.placed_count(), 2);
    }

    #[test]
    fn unsplittable_overflow_moves_on() {
        let mut frame = frame(50.0);
        let mut canvas = Canvas::new(Size::letter());
        assert!(matches!(
            frame.add(Box::new(Spacer::new(30.0)), &mut canvas),
            AddResult::Placed
        ));
        assert!(matches!(
            frame.add(Box::new(Spacer::new(30.0)), &mut canvas),
            AddResult::Overflow(_)
        ));
    }

    #[test]
    fn oversize_flowable_on_empty_frame_is_clipped() {
        let mut frame = frame(50.0);
        let mut canvas = Canvas::new(Size::letter());
        assert!(matches!(
            frame.add(Box::new(Spacer::new(80.0)), &mut canvas),
            AddResult::Placed
        ));
        assert_eq!(frame.remaining_height(), Pt::ZERO);
        let doc = canvas.finish();
        assert!(doc.pages[0]
            .commands
            .iter()
            .any(|cmd| matches!(cmd, crate::canvas::Command::ClipRect { .. })));
    }

    #[test]
    fn paragraphs_split_across_frames() {
        let style = ParagraphStyle::new("Body").with_leading(10.0);
        let text = "a<br/>b<br/>c<br/>d<br/>e<br/>f";
        let para = Paragraph::new(text, &style).expect("para");
        let mut frame = frame(40.0);
        let mut canvas = Canvas::new(Size::letter());
        match frame.add(Box::new(para), &mut canvas) {
            AddResult::Split(rest) => {
                let rest_size = rest.wrap(Pt::from_f32(200.0), Pt::from_f32(100.0));
                assert_eq!(rest_size.height, Pt::from_f32(20.0));
            }
            _ => panic!("expected a split"),
        }
    }

    #[test]
    fn keep_together_moves_to_a_fresh_frame() {
        let style = ParagraphStyle::new("Body").with_leading(10.0);
        let para = Paragraph::new("a<br/>b<br/>c<br/>d", &style)
            .expect("para")
            .with_pagination(Pagination {
                break_inside: BreakInside::Avoid,
                ..Pagination::default()
            });
        let mut frame = frame(50.0);
        let mut canvas = Canvas::new(Size::letter());
        let _ = frame.add(Box::new(Spacer::new(20.0)), &mut canvas);
        assert!(matches!(
            frame.add(Box::new(para), &mut canvas),
            AddResult::Overflow(_)
        ));
    }
}
