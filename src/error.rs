use crate::inspect::PdfInspectError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("no page template available")]
    MissingPageTemplate,
    #[error("flowable cannot fit on any page: {0}")]
    UnplaceableFlowable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("unknown paragraph style {0:?}")]
    UnknownStyle(String),
    #[error("paragraph style {0:?} is already defined")]
    DuplicateStyle(String),
    #[error("markup error at byte {offset}: {message}")]
    Markup { offset: usize, message: String },
    #[error("output directory does not exist: {}", .0.display())]
    OutputDir(PathBuf),
    #[error("pdf verification failed: {0}")]
    Inspect(#[from] PdfInspectError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocError>;
