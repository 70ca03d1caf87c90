//! Source document precondition check.
//!
//! The source must be an existing, readable regular file before any engine
//! is probed or installed. Opening the file here turns permission problems
//! into a clear error instead of an engine traceback.

use crate::error::Html2PdfError;
use std::path::Path;
use tracing::debug;

/// Validate that `path` is a readable HTML file.
pub fn check_source(path: &Path) -> Result<(), Html2PdfError> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Html2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Html2PdfError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    if !meta.is_file() {
        return Err(Html2PdfError::SourceNotAFile {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Html2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Html2PdfError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved source document: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("guide.html");
        std::fs::write(&html, "<html><body>hi</body></html>").unwrap();
        check_source(&html).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_source(&dir.path().join("absent.html")).unwrap_err();
        assert!(matches!(err, Html2PdfError::SourceNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_source(dir.path()).unwrap_err();
        assert!(matches!(err, Html2PdfError::SourceNotAFile { .. }), "got {err:?}");
    }
}
