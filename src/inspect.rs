//! Read-back checks for generated files.
//!
//! Every document the renderer writes can be re-opened with `lopdf` to confirm
//! it parses, is unencrypted, and has the expected number of pages.

use lopdf::{Document as LoDocument, Object as LoObject};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PdfInspectErrorCode {
    PdfParseFailed,
    PdfEncryptedUnsupported,
    PdfEmptyOrNoPages,
    PdfPageCountMismatch,
    PdfIoError,
}

impl PdfInspectErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfInspectErrorCode::PdfParseFailed => "PDF_PARSE_FAILED",
            PdfInspectErrorCode::PdfEncryptedUnsupported => "PDF_ENCRYPTED_UNSUPPORTED",
            PdfInspectErrorCode::PdfEmptyOrNoPages => "PDF_EMPTY_OR_NO_PAGES",
            PdfInspectErrorCode::PdfPageCountMismatch => "PDF_PAGE_COUNT_MISMATCH",
            PdfInspectErrorCode::PdfIoError => "PDF_IO_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", code.as_str())]
pub struct PdfInspectError {
    pub code: PdfInspectErrorCode,
    pub message: String,
}

impl PdfInspectError {
    fn new(code: PdfInspectErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfInspectReport {
    pub pdf_version: String,
    pub page_count: usize,
    pub encrypted: bool,
    pub file_size_bytes: usize,
    pub title: Option<String>,
}

pub fn inspect_pdf_bytes(bytes: &[u8]) -> Result<PdfInspectReport, PdfInspectError> {
    let pdf = load(bytes)?;
    Ok(PdfInspectReport {
        pdf_version: pdf.version.clone(),
        page_count: pdf.get_pages().len(),
        encrypted: pdf.is_encrypted(),
        file_size_bytes: bytes.len(),
        title: info_title(&pdf),
    })
}

pub fn inspect_pdf_path(path: &Path) -> Result<PdfInspectReport, PdfInspectError> {
    let data = std::fs::read(path)
        .map_err(|err| PdfInspectError::new(PdfInspectErrorCode::PdfIoError, err.to_string()))?;
    inspect_pdf_bytes(&data)
}

/// Text shown on the 1-based `page_number`, as decoded by `lopdf`.
pub fn extract_page_text(bytes: &[u8], page_number: u32) -> Result<String, PdfInspectError> {
    let pdf = load(bytes)?;
    pdf.extract_text(&[page_number])
        .map_err(|err| PdfInspectError::new(PdfInspectErrorCode::PdfParseFailed, err.to_string()))
}

pub fn renderability_issues(report: &PdfInspectReport) -> Vec<PdfInspectErrorCode> {
    let mut issues = Vec::new();
    if report.encrypted {
        issues.push(PdfInspectErrorCode::PdfEncryptedUnsupported);
    }
    if report.page_count == 0 {
        issues.push(PdfInspectErrorCode::PdfEmptyOrNoPages);
    }
    issues
}

pub fn require_renderable(report: &PdfInspectReport) -> Result<(), PdfInspectError> {
    match renderability_issues(report).first() {
        Some(PdfInspectErrorCode::PdfEncryptedUnsupported) => Err(PdfInspectError::new(
            PdfInspectErrorCode::PdfEncryptedUnsupported,
            "encrypted pdf output is not supported",
        )),
        Some(PdfInspectErrorCode::PdfEmptyOrNoPages) => Err(PdfInspectError::new(
            PdfInspectErrorCode::PdfEmptyOrNoPages,
            "pdf has no pages",
        )),
        _ => Ok(()),
    }
}

/// Re-parses freshly written bytes and checks them against the page count the
/// layout engine produced.
pub fn verify_output(
    bytes: &[u8],
    expected_pages: usize,
) -> Result<PdfInspectReport, PdfInspectError> {
    let report = inspect_pdf_bytes(bytes)?;
    require_renderable(&report)?;
    if report.page_count != expected_pages {
        return Err(PdfInspectError::new(
            PdfInspectErrorCode::PdfPageCountMismatch,
            format!(
                "expected {} pages, parsed {}",
                expected_pages, report.page_count
            ),
        ));
    }
    Ok(report)
}

fn load(bytes: &[u8]) -> Result<LoDocument, PdfInspectError> {
    LoDocument::load_mem(bytes)
        .map_err(|err| PdfInspectError::new(PdfInspectErrorCode::PdfParseFailed, err.to_string()))
}

fn info_title(pdf: &LoDocument) -> Option<String> {
    let info_id = pdf.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = pdf.get_dictionary(info_id).ok()?;
    match info.get(b"Title").ok()? {
        LoObject::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
