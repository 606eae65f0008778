use crate::types::Size;

/// What a page callback knows about the page it decorates.
#[derive(Debug, Clone)]
pub struct DocContext {
    pub page_number: usize,
    pub template_name: String,
    pub page_size: Size,
}

impl DocContext {
    pub fn new(page_number: usize, template_name: impl Into<String>, page_size: Size) -> Self {
        Self {
            page_number,
            template_name: template_name.into(),
            page_size,
        }
    }
}
