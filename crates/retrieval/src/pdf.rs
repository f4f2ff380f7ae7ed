//! Document text extraction for the Q&A path.

use std::path::Path;

use riskcast_core::error::RetrievalError;
use tracing::debug;

/// Extract the text layer of a PDF held in memory.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, RetrievalError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| RetrievalError::Pdf(e.to_string()))
}

/// Read a document from disk. `.pdf` files go through PDF extraction;
/// anything else is read as UTF-8 text.
pub fn load_document_text(path: &Path) -> Result<String, RetrievalError> {
    let io_err = |e: std::io::Error| RetrievalError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        let bytes = std::fs::read(path).map_err(io_err)?;
        extract_pdf_text(&bytes)?
    } else {
        std::fs::read_to_string(path).map_err(io_err)?
    };
    debug!(path = %path.display(), chars = text.len(), "Loaded document text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "site survey complete").unwrap();
        assert_eq!(load_document_text(&path).unwrap(), "site survey complete");
    }

    #[test]
    fn garbage_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.PDF");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(load_document_text(&path), Err(RetrievalError::Pdf(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_document_text(Path::new("/nonexistent/doc.txt")).unwrap_err();
        assert!(matches!(err, RetrievalError::Io { .. }));
    }
}
