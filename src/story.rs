use crate::error::Result;
use crate::flowable::{Flowable, PageBreak, Paragraph, Spacer};
use crate::style::{ParagraphStyle, StyleSheet};

/// Accumulates the ordered flowables of one document, resolving paragraph
/// styles by name against a [`StyleSheet`].
pub struct StoryBuilder<'a> {
    styles: &'a StyleSheet,
    story: Vec<Box<dyn Flowable>>,
}

impl<'a> StoryBuilder<'a> {
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self {
            styles,
            story: Vec::new(),
        }
    }

    pub fn styles(&self) -> &'a StyleSheet {
        self.styles
    }

    pub fn style(&self, name: &str) -> Result<&'a ParagraphStyle> {
        self.styles.get(name)
    }

    /// A paragraph of inline markup in the named style.
    pub fn para(&mut self, style: &str, markup: &str) -> Result<&mut Self> {
        let style = self.styles.get(style)?;
        self.para_with(style, markup)
    }

    /// A paragraph in a style that is not registered in the sheet.
    pub fn para_with(&mut self, style: &ParagraphStyle, markup: &str) -> Result<&mut Self> {
        let paragraph = Paragraph::new(markup, style)?;
        Ok(self.push(paragraph))
    }

    /// A `•`-prefixed list item.
    pub fn bullet(&mut self, style: &str, markup: &str) -> Result<&mut Self> {
        self.para(style, &format!("\u{2022} {markup}"))
    }

    pub fn bullets<S: AsRef<str>>(&mut self, style: &str, items: &[S]) -> Result<&mut Self> {
        for item in items {
            self.bullet(style, item.as_ref())?;
        }
        Ok(self)
    }

    pub fn spacer(&mut self, height: f32) -> &mut Self {
        self.push(Spacer::new(height))
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.push(PageBreak::new())
    }

    /// A break that is honoured even on an empty page.
    pub fn hard_page_break(&mut self) -> &mut Self {
        self.push(PageBreak::hard())
    }

    pub fn push(&mut self, flowable: impl Flowable + 'static) -> &mut Self {
        self.story.push(Box::new(flowable));
        self
    }

    pub fn push_boxed(&mut self, flowable: Box<dyn Flowable>) -> &mut Self {
        self.story.push(flowable);
        self
    }

    pub fn len(&self) -> usize {
        self.story.len()
    }

    pub fn is_empty(&self) -> bool {
        self.story.is_empty()
    }

    pub fn finish(self) -> Vec<Box<dyn Flowable>> {
        self.story
    }
}
