mod canvas;
mod debug;
mod doc_context;
mod doc_template;
mod documents;
mod drawables;
mod error;
pub mod factories;
mod flowable;
mod font;
mod frame;
pub mod inspect;
pub mod markup;
mod metrics;
mod page_template;
pub mod pdf;
mod story;
mod style;
mod table;
pub mod theme;
mod types;

pub use canvas::{Canvas, Command, Document, Page};
use debug::DebugLogger;
pub use doc_context::DocContext;
pub use doc_template::DocTemplate;
pub use documents::{DocumentKind, PAGE_MARGIN_IN};
pub use drawables::{CardRow, ColoredBox, MetricCard};
pub use error::{DocError, Result};
pub use flowable::{
    BreakAfter, BreakBefore, BreakInside, Flowable, PageBreak, Pagination, Paragraph, Spacer,
};
pub use font::StandardFont;
pub use frame::{AddResult, Frame};
pub use metrics::{DocumentMetrics, PageMetrics};
pub use page_template::{FrameSpec, OnPageCallback, PageTemplate};
use pdf::PdfOptions;
pub use story::StoryBuilder;
pub use style::{Alignment, ParagraphStyle, StyleSheet, TextTransform};
pub use table::{Cell, Table, TableStyle, VAlign};
pub use types::{Color, EdgeSizes, Margins, Pt, Rect, Size, inch};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Meta key carrying `x,y,w,h` (milli-points) of each placed flowable.
pub const META_FLOWABLE_BOUNDS_KEY: &str = "poptop.flowable_bounds";
/// Meta key naming the page template a page was laid out with.
pub const META_PAGE_TEMPLATE_KEY: &str = "poptop.page_template";

const DEFAULT_AUTHOR: &str = "Paul Giarrizzo";
const DEFAULT_CREATOR: &str = "PopTop, LLC";

/// Lays out and serializes the PopTop documents into an output directory.
pub struct Renderer {
    output_dir: PathBuf,
    create_dirs: bool,
    verify: bool,
    pdf_options: PdfOptions,
    debug: Option<DebugLogger>,
}

#[derive(Debug, Clone)]
pub struct RendererBuilder {
    output_dir: PathBuf,
    create_dirs: bool,
    compress: bool,
    verify: bool,
    debug_log: Option<PathBuf>,
    author: Option<String>,
}

/// Bytes and layout metrics of one document, before anything touches disk.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
    pub metrics: DocumentMetrics,
    pub page_count: usize,
    pub render_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
    pub render_ms: f64,
    pub sha256: String,
    pub metrics: DocumentMetrics,
    pub verified: bool,
}

impl Renderer {
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_path(&self, kind: DocumentKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    pub fn render(&self, kind: DocumentKind) -> Result<RenderedDocument> {
        let started = Instant::now();
        let mut template = kind.assemble()?;
        if let Some(debug) = &self.debug {
            template = template.with_debug(debug.clone(), kind.slug());
        }
        let (document, mut metrics) = template.build_with_metrics()?;
        let options = PdfOptions {
            title: Some(kind.title().to_string()),
            subject: Some(kind.subject().to_string()),
            ..self.pdf_options.clone()
        };
        let bytes = pdf::document_to_pdf_with_metrics(&document, &options, &mut metrics)?;
        let page_count = document.pages.len();
        let render_ms = started.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "{kind}: laid out {} flowables on {page_count} pages",
            metrics.flowable_count()
        );
        Ok(RenderedDocument {
            kind,
            bytes,
            metrics,
            page_count,
            render_ms,
        })
    }

    pub fn write_document(&self, kind: DocumentKind) -> Result<BuildReport> {
        self.ensure_output_dir()?;
        let rendered = self.render(kind)?;
        let path = self.output_path(kind);
        std::fs::write(&path, &rendered.bytes)?;
        let verified = if self.verify {
            let written = std::fs::read(&path)?;
            inspect::verify_output(&written, rendered.page_count)?;
            true
        } else {
            false
        };
        if let Some(debug) = &self.debug {
            debug.flush();
        }
        log::info!(
            "wrote {} ({} pages, {} bytes, {:.1} ms)",
            path.display(),
            rendered.page_count,
            rendered.bytes.len(),
            rendered.render_ms
        );
        Ok(BuildReport {
            kind,
            sha256: pdf::sha256_hex(&rendered.bytes),
            path,
            pages: rendered.page_count,
            bytes: rendered.bytes.len(),
            render_ms: rendered.render_ms,
            metrics: rendered.metrics,
            verified,
        })
    }

    /// Builds every requested document in parallel. Reports keep the order of `kinds`.
    pub fn write_all(&self, kinds: &[DocumentKind]) -> Result<Vec<BuildReport>> {
        use rayon::prelude::*;

        self.ensure_output_dir()?;
        kinds
            .par_iter()
            .map(|kind| self.write_document(*kind))
            .collect()
    }

    fn ensure_output_dir(&self) -> Result<()> {
        if self.output_dir.is_dir() {
            return Ok(());
        }
        if !self.create_dirs {
            return Err(DocError::OutputDir(self.output_dir.clone()));
        }
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            create_dirs: false,
            compress: true,
            verify: false,
            debug_log: None,
            author: Some(DEFAULT_AUTHOR.to_string()),
        }
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Create the output directory instead of failing when it is missing.
    pub fn create_dirs(mut self, enabled: bool) -> Self {
        self.create_dirs = enabled;
        self
    }

    pub fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Re-parse each written file with lopdf and check its page count.
    pub fn verify(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }

    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_log = Some(path.into());
        self
    }

    pub fn author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn build(self) -> Result<Renderer> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(DocError::InvalidConfiguration(
                "output_dir must not be empty".to_string(),
            ));
        }
        let debug = match self.debug_log {
            Some(path) => Some(DebugLogger::new(path)?),
            None => None,
        };
        Ok(Renderer {
            output_dir: self.output_dir,
            create_dirs: self.create_dirs,
            verify: self.verify,
            pdf_options: PdfOptions {
                compress: self.compress,
                author: self.author,
                creator: Some(DEFAULT_CREATOR.to_string()),
                ..PdfOptions::default()
            },
            debug,
        })
    }
}
