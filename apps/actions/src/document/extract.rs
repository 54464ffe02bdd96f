//! Resume validator and text extractor.
//!
//! Checks run in a fixed order and stop at the first failure:
//! existence → size → sniffed format → page count → readable text → resume keywords.
//! Parser failures are split into encrypted documents and everything else.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::document::sniff::{declares_encryption, sniff, SniffedType};

/// Uploads above this size are rejected before any parsing happens.
pub const MAX_RESUME_BYTES: u64 = 2 * 1024 * 1024;

/// At least one of these must appear (case-insensitive) for a PDF to count as a resume.
pub const RESUME_KEYWORDS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "project",
    "summary",
    "profile",
    "certification",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("file is {size} bytes, limit is 2 MiB")]
    TooLarge { size: u64 },

    #[error("content is {0}, expected application/pdf")]
    WrongFormat(&'static str),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("document has no readable text")]
    UnreadableContent,

    #[error("document does not look like a resume")]
    NotAResume,

    #[error("document is encrypted")]
    Encrypted,

    #[error("parse error: {0}")]
    ParseError(String),
}

impl UploadError {
    /// The chat reply shown for this rejection.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NotFound(path) => format!("❌ File not found: {path}"),
            UploadError::TooLarge { .. } => {
                "❌ File too large. Please upload a PDF under 2MB.".to_string()
            }
            UploadError::WrongFormat(_) => {
                "❌ Uploaded file is not a valid PDF file. Only PDF resumes are supported."
                    .to_string()
            }
            UploadError::EmptyDocument => "❌ The uploaded PDF has no pages.".to_string(),
            UploadError::UnreadableContent => {
                "❌ The PDF appears empty or could not be read.".to_string()
            }
            UploadError::NotAResume => "❌ This PDF does not appear to be a resume. \
                Please upload a proper resume document."
                .to_string(),
            UploadError::Encrypted => {
                "❌ The PDF is encrypted/protected and cannot be processed.".to_string()
            }
            UploadError::ParseError(detail) => format!("❌ Error extracting PDF text: {detail}"),
        }
    }
}

/// Validates the file at `path` and returns its full extracted text.
pub async fn extract_resume_text(path: impl AsRef<Path>) -> Result<String, UploadError> {
    let path = path.as_ref();

    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) if m.is_file() => m,
        _ => return Err(UploadError::NotFound(path.display().to_string())),
    };

    if metadata.len() > MAX_RESUME_BYTES {
        return Err(UploadError::TooLarge {
            size: metadata.len(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| UploadError::ParseError(e.to_string()))?;

    validate_resume_bytes(bytes).await
}

/// Runs the size, format and content checks on an in-memory document.
pub async fn validate_resume_bytes(bytes: Vec<u8>) -> Result<String, UploadError> {
    let size = bytes.len() as u64;
    if size > MAX_RESUME_BYTES {
        return Err(UploadError::TooLarge { size });
    }

    let sniffed = sniff(&bytes);
    if sniffed != SniffedType::Pdf {
        return Err(UploadError::WrongFormat(sniffed.mime()));
    }

    // pdf-extract is CPU bound and can panic on malformed input.
    let pages = tokio::task::spawn_blocking(move || parse_pages(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF parser task failed: {e}");
            UploadError::ParseError("the document could not be parsed".to_string())
        })??;

    debug!("Parsed {} page(s), {} bytes", pages.len(), size);
    accept_pages(pages)
}

fn parse_pages(bytes: &[u8]) -> Result<Vec<String>, UploadError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| classify_parse_failure(bytes, &e.to_string()))
}

fn classify_parse_failure(bytes: &[u8], detail: &str) -> UploadError {
    let detail_lower = detail.to_lowercase();
    if detail_lower.contains("encrypt")
        || detail_lower.contains("decrypt")
        || declares_encryption(bytes)
    {
        UploadError::Encrypted
    } else {
        UploadError::ParseError(detail.to_string())
    }
}

/// Page-level checks: at least one page, some visible text, and a resume keyword.
/// Returns the pages concatenated in order with nothing else altered.
pub fn accept_pages(pages: Vec<String>) -> Result<String, UploadError> {
    if pages.is_empty() {
        return Err(UploadError::EmptyDocument);
    }

    let text = pages.concat();
    if text.trim().is_empty() {
        return Err(UploadError::UnreadableContent);
    }

    if !looks_like_resume(&text) {
        return Err(UploadError::NotAResume);
    }

    Ok(text)
}

pub fn looks_like_resume(text: &str) -> bool {
    let lower = text.to_lowercase();
    RESUME_KEYWORDS.iter().any(|k| lower.contains(k))
}
