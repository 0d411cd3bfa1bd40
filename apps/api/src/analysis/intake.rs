//! Text intake — accepts plain-text resumes and turns binary documents away.
//!
//! PDF/DOC parsing is not supported; callers are asked to paste the text instead.

use std::path::Path;

use thiserror::Error;

pub const PASTE_TEXT_MESSAGE: &str =
    "Binary formats (PDF, DOC) are not supported. Please paste your resume text instead.";

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];
const BINARY_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "rtf", "odt", "pages"];

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("{}", PASTE_TEXT_MESSAGE)]
    UnsupportedFormat { file_name: String },

    #[error("Input is too long: {actual} characters (limit {limit})")]
    TooLong { actual: usize, limit: usize },
}

/// Decodes an uploaded resume file as text, rejecting binary formats by extension or content.
pub fn read_uploaded_text(file_name: &str, bytes: &[u8]) -> Result<String, IntakeError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    let unsupported = || IntakeError::UnsupportedFormat {
        file_name: file_name.to_string(),
    };

    if let Some(ext) = extension.as_deref() {
        if BINARY_EXTENSIONS.contains(&ext) {
            return Err(unsupported());
        }
        if !TEXT_EXTENSIONS.contains(&ext) && looks_binary(bytes) {
            return Err(unsupported());
        }
    }

    if bytes.contains(&0) {
        return Err(unsupported());
    }

    let text = std::str::from_utf8(bytes).map_err(|_| unsupported())?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// PDF/Office magic numbers or bytes that are not UTF-8.
fn looks_binary(bytes: &[u8]) -> bool {
    const MAGIC: &[&[u8]] = &[
        b"%PDF",
        b"PK\x03\x04",
        b"\xD0\xCF\x11\xE0",
        b"{\\rtf",
    ];
    MAGIC.iter().any(|magic| bytes.starts_with(magic)) || std::str::from_utf8(bytes).is_err()
}

/// Enforces the configured character limit on submitted text.
pub fn check_length(text: &str, limit: usize) -> Result<(), IntakeError> {
    let actual = text.chars().count();
    if actual > limit {
        return Err(IntakeError::TooLong { actual, limit });
    }
    Ok(())
}
