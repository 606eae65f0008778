use crate::canvas::{Canvas, Document};
use crate::debug::DebugLogger;
use crate::doc_context::DocContext;
use crate::error::{DocError, Result};
use crate::flowable::{BreakAfter, BreakBefore, Flowable};
use crate::frame::{AddResult, Frame};
use crate::metrics::{DocumentMetrics, PageMetrics};
use crate::page_template::{OnPageCallback, PageTemplate};
use crate::types::{Margins, Size};
use serde_json::json;
use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

const FRAME_PADDING: f32 = 6.0;

pub struct DocTemplate {
    page_templates: Vec<PageTemplate>,
    story: Vec<Box<dyn Flowable>>,
    debug: Option<DebugLogger>,
    debug_context: String,
}

impl DocTemplate {
    pub fn new(page_templates: Vec<PageTemplate>) -> Self {
        Self {
            page_templates,
            story: Vec::new(),
            debug: None,
            debug_context: String::new(),
        }
    }

    /// First-page and later-page templates sharing one margin-inset frame.
    pub fn simple(
        page_size: Size,
        margins: Margins,
        on_first: Option<OnPageCallback>,
        on_later: Option<OnPageCallback>,
    ) -> Self {
        let content = margins.content_rect(page_size);
        let first = PageTemplate::new("First", page_size)
            .with_padded_frame(content, FRAME_PADDING)
            .with_on_page(on_first);
        let later = PageTemplate::new("Later", page_size)
            .with_padded_frame(content, FRAME_PADDING)
            .with_on_page(on_later);
        Self::new(vec![first, later])
    }

    pub(crate) fn with_debug(mut self, debug: DebugLogger, context: impl Into<String>) -> Self {
        self.debug = Some(debug);
        self.debug_context = context.into();
        self
    }

    pub fn add_flowable(&mut self, flowable: Box<dyn Flowable>) {
        self.story.push(flowable);
    }

    pub fn extend(&mut self, story: impl IntoIterator<Item = Box<dyn Flowable>>) {
        self.story.extend(story);
    }

    pub fn story_len(&self) -> usize {
        self.story.len()
    }

    pub fn build(self) -> Result<Document> {
        Ok(self.build_with_metrics()?.0)
    }

    pub fn build_with_metrics(self) -> Result<(Document, DocumentMetrics)> {
        if self.page_templates.is_empty() {
            return Err(DocError::MissingPageTemplate);
        }
        let mut story: VecDeque<Box<dyn Flowable>> = self.story.into_iter().collect();
        let mut pager = Paginator::start(&self.page_templates, self.debug, self.debug_context);

        while let Some(flowable) = story.pop_front() {
            let mut current = flowable;
            let mut continuation = false;
            loop {
                let name = current.debug_name();
                let pagination = current.pagination();
                if !continuation {
                    let wants_break = match pagination.break_before {
                        BreakBefore::Auto => false,
                        BreakBefore::Page => pager.placed_on_page || pager.frame_index > 0,
                        BreakBefore::Always => true,
                    };
                    if wants_break {
                        pager.next_page("break_before_page", name);
                    }
                }

                if pager.frame_index >= pager.frames.len() {
                    pager.next_page("frame_exhausted", name);
                }
                if pager.frames.is_empty() {
                    return Err(DocError::MissingPageTemplate);
                }

                let is_last_frame = pager.frame_index + 1 >= pager.frames.len();
                let fresh_page = !pager.placed_on_page;
                let frame_index = pager.frame_index;
                let frame_rect = pager.frames[frame_index].rect();
                let unplaceable = if fresh_page && is_last_frame {
                    let size = current.wrap(frame_rect.width, frame_rect.height);
                    Some(format!(
                        "{} size={}x{}pt frame={}x{}pt",
                        name,
                        size.width.to_f32(),
                        size.height.to_f32(),
                        frame_rect.width.to_f32(),
                        frame_rect.height.to_f32(),
                    ))
                } else {
                    None
                };

                let outcome = pager.frames[frame_index].add(current, &mut pager.canvas);
                pager.note_placement(frame_index);
                match outcome {
                    AddResult::Placed => {
                        if pagination.break_after == BreakAfter::Page {
                            pager.next_page("break_after_page", name);
                        }
                        break;
                    }
                    AddResult::Split(remaining) => {
                        continuation = true;
                        current = remaining;
                        pager.advance_frame("flowable_split", name);
                    }
                    AddResult::Overflow(remaining) => {
                        if fresh_page && is_last_frame {
                            return Err(DocError::UnplaceableFlowable(
                                unplaceable.unwrap_or_else(|| name.to_string()),
                            ));
                        }
                        current = remaining;
                        pager.advance_frame("frame_overflow", name);
                    }
                }
            }
        }

        Ok(pager.finish())
    }
}

/// Mutable pagination state for one build.
struct Paginator<'a> {
    templates: &'a [PageTemplate],
    canvas: Canvas,
    frames: Vec<Frame>,
    frame_index: usize,
    page_number: usize,
    placed_on_page: bool,
    page_flowables: usize,
    page_start: Instant,
    metrics: DocumentMetrics,
    debug: Option<DebugLogger>,
    debug_context: String,
    counters: BTreeMap<&'static str, u64>,
}

impl<'a> Paginator<'a> {
    fn start(templates: &'a [PageTemplate], debug: Option<DebugLogger>, debug_context: String) -> Self {
        let template = select_template(templates, 1);
        let mut pager = Self {
            templates,
            canvas: Canvas::new(template.page_size),
            frames: Vec::new(),
            frame_index: 0,
            page_number: 1,
            placed_on_page: false,
            page_flowables: 0,
            page_start: Instant::now(),
            metrics: DocumentMetrics::default(),
            debug,
            debug_context,
            counters: BTreeMap::new(),
        };
        pager.begin_page();
        pager
    }

    fn begin_page(&mut self) {
        let template = select_template(self.templates, self.page_number);
        self.frames = template.instantiate_frames();
        self.frame_index = 0;
        self.placed_on_page = false;
        self.page_flowables = 0;
        self.page_start = Instant::now();
        if let Some(callback) = template.on_page() {
            let context = DocContext::new(self.page_number, &template.name, template.page_size);
            callback(&mut self.canvas, &context);
        }
        self.canvas
            .meta(crate::META_PAGE_TEMPLATE_KEY, template.name.clone());
    }

    fn note_placement(&mut self, frame_index: usize) {
        let placed = self.frames[frame_index].placed_count();
        if placed > 0 && !self.placed_on_page {
            self.placed_on_page = true;
        }
        let total: usize = self.frames.iter().map(Frame::placed_count).sum();
        self.page_flowables = total;
    }

    /// Moves to the next frame, or to a new page once the last frame is used.
    fn advance_frame(&mut self, reason: &str, flowable: &str) {
        if self.frame_index + 1 < self.frames.len() {
            log::debug!(
                "page {}: {} ({}) leaves frame {}",
                self.page_number,
                reason,
                flowable,
                self.frame_index
            );
            if let Some(logger) = self.debug.as_ref() {
                logger.log_event(&json!({
                    "type": "layout.frame_advance",
                    "document": self.debug_context,
                    "reason": reason,
                    "page": self.page_number,
                    "frame_index": self.frame_index,
                    "flowable": flowable,
                }));
            }
            self.count("layout.frame_advance");
            self.frame_index += 1;
        } else {
            self.next_page(reason, flowable);
        }
    }

    fn log_break(&mut self, reason: &str, flowable: &str) {
        log::debug!(
            "page {}: {} ({}) in frame {}",
            self.page_number,
            reason,
            flowable,
            self.frame_index
        );
        if let Some(logger) = self.debug.as_ref() {
            logger.log_event(&json!({
                "type": "layout.page_break",
                "document": self.debug_context,
                "reason": reason,
                "from_page": self.page_number,
                "to_page": self.page_number + 1,
                "frame_index": self.frame_index,
                "flowable": flowable,
            }));
        }
        self.count("layout.page_break");
    }

    fn count(&mut self, key: &'static str) {
        let entry = self.counters.entry(key).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    fn next_page(&mut self, reason: &str, flowable: &str) {
        self.log_break(reason, flowable);
        self.emit_page();
        self.page_number += 1;
        self.begin_page();
    }

    fn emit_page(&mut self) {
        let elapsed = self.page_start.elapsed().as_secs_f64() * 1000.0;
        self.metrics.total_render_ms += elapsed;
        self.metrics.pages.push(PageMetrics {
            page_number: self.page_number,
            render_ms: elapsed,
            command_count: self.canvas.current_command_count(),
            flowable_count: self.page_flowables,
            content_bytes: 0,
        });
        self.canvas.show_page();
    }

    fn finish(mut self) -> (Document, DocumentMetrics) {
        // A trailing page that only carries its decorations is dropped.
        if self.placed_on_page || self.metrics.pages.is_empty() {
            self.emit_page();
        } else {
            self.canvas.discard_page();
            // The break into the dropped page did not produce one.
            if let Some(breaks) = self.counters.get_mut("layout.page_break") {
                *breaks = breaks.saturating_sub(1);
            }
        }
        self.counters
            .insert("layout.pages", self.metrics.pages.len() as u64);
        if let Some(logger) = self.debug.as_ref() {
            logger.emit_summary(&self.debug_context, &self.counters);
            logger.flush();
        }
        (self.canvas.finish_without_show(), self.metrics)
    }
}

fn select_template(page_templates: &[PageTemplate], page_number: usize) -> &PageTemplate {
    // page n -> templates[min(n-1, len-1)]; the last template repeats.
    let idx = page_number
        .saturating_sub(1)
        .min(page_templates.len().saturating_sub(1));
    &page_templates[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::flowable::{PageBreak, Paragraph, Spacer};
    use crate::style::ParagraphStyle;
    use crate::types::{Pt, Rect};
    use std::sync::Arc;

    fn numbered(label: &'static str) -> Option<OnPageCallback> {
        Some(Arc::new(move |canvas: &mut Canvas, ctx: &DocContext| {
            canvas.draw_string(
                Pt::ZERO,
                Pt::from_f32(10.0),
                format!("{label}{}", ctx.page_number),
            );
        }))
    }

    fn para(text: &str) -> Box<dyn Flowable> {
        let style = ParagraphStyle::new("Body").with_leading(12.0);
        Box::new(Paragraph::new(text, &style).expect("para"))
    }

    fn page_texts(doc: &Document) -> Vec<Vec<String>> {
        doc.pages
            .iter()
            .map(|page| page.text_runs().into_iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn missing_templates_is_an_error() {
        let doc = DocTemplate::new(Vec::new());
        assert!(matches!(doc.build(), Err(DocError::MissingPageTemplate)));
    }

    #[test]
    fn first_template_then_last_repeats() {
        let mut doc = DocTemplate::simple(
            Size::letter(),
            Margins::all_inches(0.75),
            numbered("first "),
            numbered("later "),
        );
        doc.add_flowable(para("one"));
        doc.add_flowable(Box::new(PageBreak::new()));
        doc.add_flowable(para("two"));
        doc.add_flowable(Box::new(PageBreak::new()));
        doc.add_flowable(para("three"));
        let doc = doc.build().expect("build");
        let texts = page_texts(&doc);
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0][0], "first 1");
        assert_eq!(texts[1][0], "later 2");
        assert_eq!(texts[2][0], "later 3");
    }

    #[test]
    fn soft_break_on_an_empty_page_is_ignored() {
        let mut doc = DocTemplate::simple(Size::letter(), Margins::all_inches(0.75), None, None);
        doc.add_flowable(Box::new(PageBreak::new()));
        doc.add_flowable(para("content"));
        doc.add_flowable(Box::new(PageBreak::new()));
        let doc = doc.build().expect("build");
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn hard_break_leaves_the_first_page_to_its_callback() {
        let mut doc = DocTemplate::simple(
            Size::letter(),
            Margins::all_inches(0.75),
            numbered("cover "),
            numbered("page "),
        );
        doc.add_flowable(Box::new(PageBreak::hard()));
        doc.add_flowable(para("body"));
        let doc = doc.build().expect("build");
        let texts = page_texts(&doc);
        assert_eq!(texts, vec![vec!["cover 1".to_string()], vec![
            "page 2".to_string(),
            "body".to_string()
        ]]);
    }

    #[test]
    fn long_stories_flow_onto_new_pages() {
        let template = PageTemplate::new("Only", Size::letter()).with_frame(Rect::new(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::from_f32(100.0),
        ));
        let mut doc = DocTemplate::new(vec![template]);
        for _ in 0..5 {
            doc.add_flowable(Box::new(Spacer::new(40.0)));
        }
        let (doc, metrics) = doc.build_with_metrics().expect("build");
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(metrics.pages.len(), 3);
        assert_eq!(metrics.flowable_count(), 5);
    }

    #[test]
    fn each_page_break_is_traced_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("trace.jsonl");
        let logger = DebugLogger::new(&path).expect("logger");

        let template = PageTemplate::new("Only", Size::letter()).with_frame(Rect::new(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::from_f32(100.0),
        ));
        let mut doc = DocTemplate::new(vec![template]).with_debug(logger, "narrow");
        for _ in 0..3 {
            doc.add_flowable(Box::new(Spacer::new(40.0)));
        }
        doc.add_flowable(para(&"word ".repeat(120)));
        let (doc, _) = doc.build_with_metrics().expect("build");

        let events: Vec<serde_json::Value> = std::fs::read_to_string(&path)
            .expect("read")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        let breaks: Vec<(u64, &str)> = events
            .iter()
            .filter(|e| e["type"] == "layout.page_break")
            .map(|e| (e["from_page"].as_u64().expect("from"), e["reason"].as_str().expect("reason")))
            .collect();
        assert_eq!(breaks.len(), doc.pages.len() - 1);
        assert!(breaks.iter().any(|(_, reason)| *reason == "flowable_split"));
        assert!(breaks.iter().any(|(_, reason)| *reason == "frame_overflow"));
        assert!(breaks.windows(2).all(|pair| pair[0].0 < pair[1].0));

        let summary = events
            .iter()
            .find(|e| e["type"] == "debug.summary")
            .expect("summary");
        assert_eq!(summary["context"], "narrow");
        assert_eq!(summary["counts"]["layout.page_break"], breaks.len() as u64);
        assert_eq!(summary["counts"]["layout.pages"], doc.pages.len() as u64);
    }

    #[test]
    fn oversize_content_on_a_fresh_page_is_clipped_not_lost() {
        let template = PageTemplate::new("Tiny", Size::letter()).with_frame(Rect::new(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::from_f32(30.0),
        ));
        let mut doc = DocTemplate::new(vec![template]);
        doc.add_flowable(Box::new(Spacer::new(80.0)));
        let doc = doc.build().expect("build");
        assert!(
            doc.pages[0]
                .commands
                .iter()
                .any(|cmd| matches!(cmd, Command::ClipRect { .. }))
        );
    }

    #[test]
    fn frameless_template_reports_unplaceable() {
        let template = PageTemplate::new("Empty", Size::letter()).with_frame(Rect::new(
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::ZERO,
        ));
        let mut doc = DocTemplate::new(vec![template]);
        doc.add_flowable(para("text"));
        assert!(matches!(
            doc.build(),
            Err(DocError::UnplaceableFlowable(_))
        ));
    }
}
