//! Plain-text extraction for source documents.
//!
//! The index only ever sees UTF-8 text. This module turns a file on disk
//! into that text: PDFs go through `pdf-extract`, everything else is read
//! as UTF-8. Extraction failures are returned, never panicked on; the
//! loading pipeline logs them and skips the file.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF extraction failed for {path}: {message}")]
    Pdf { path: String, message: String },
    #[error("{path} is not valid UTF-8 text")]
    NotUtf8 { path: String },
}

/// Turns a source artifact into plain text.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Extension-dispatching extractor for local files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path).map_err(|e| ExtractError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let text = if is_pdf(path) {
            extract_pdf(path, &bytes)?
        } else {
            String::from_utf8(bytes).map_err(|_| ExtractError::NotUtf8 {
                path: path.display().to_string(),
            })?
        };
        Ok(text.trim().to_string())
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn extract_pdf(path: &Path, bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "\n\n  Meeting notes about the budget.  \n").unwrap();
        let text = FileExtractor.extract(&path).unwrap();
        assert_eq!(text, "Meeting notes about the budget.");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileExtractor
            .extract(Path::new("/nonexistent/file.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_invalid_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.PDF");
        std::fs::write(&path, b"not a valid pdf").unwrap();
        let err = FileExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf { .. }));
    }

    #[test]
    fn test_binary_text_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let err = FileExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::NotUtf8 { .. }));
    }
}
