//! Error types for the guide-html2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Html2PdfError`] — **Fatal**: no PDF was produced (missing source
//!   document, both engines failed, output could not be moved into place).
//!   Returned as `Err(Html2PdfError)` from [`crate::convert()`].
//!
//! * [`EngineError`] — **Non-fatal** for the primary engine: WeasyPrint
//!   missing, failing to install, or failing to render only triggers the
//!   fallback. Each failure is recorded in
//!   [`crate::output::EngineAttempt`] so callers can see why a fallback
//!   happened even when the conversion succeeded.

use crate::engine::EngineKind;
use std::path::PathBuf;
use thiserror::Error;

/// Manual remedy printed when no engine could produce the PDF.
pub const MANUAL_REMEDY: &str = "Please install wkhtmltopdf or use browser print-to-PDF feature";

/// All fatal errors returned by the guide-html2pdf library.
#[derive(Debug, Error)]
pub enum Html2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source HTML file was not found at the given path.
    #[error("{path} not found!")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the source file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The source path exists but is a directory or other non-file.
    #[error("'{path}' is not a regular file")]
    SourceNotAFile { path: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Every engine was tried and none produced a PDF.
    #[error("{backup_error}\n{}", MANUAL_REMEDY)]
    AllEnginesFailed {
        primary_error: EngineError,
        backup_error: EngineError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The rendered PDF could not be moved to the output path.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Html2PdfError {
    /// Returns `true` when the failure happened before any engine ran.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::PermissionDenied { .. } | Self::SourceNotAFile { .. }
        )
    }
}

/// A non-fatal failure of a single engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine's library could not be imported and was not installed.
    #[error("{engine} is not available: {detail}")]
    Unavailable { engine: EngineKind, detail: String },

    /// Installing the engine's package failed.
    #[error("Failed to install {engine} (package '{package}'): {detail}")]
    InstallFailed {
        engine: EngineKind,
        package: &'static str,
        detail: String,
    },

    /// A native program the engine shells out to is missing.
    #[error("{engine} requires '{tool}', which was not found: {detail}")]
    NativeToolMissing {
        engine: EngineKind,
        tool: String,
        detail: String,
    },

    /// The engine ran and reported an error.
    #[error("{engine} failed to render: {detail}")]
    RenderFailed { engine: EngineKind, detail: String },

    /// The engine reported success but did not leave a usable PDF behind.
    #[error("{engine} produced no valid PDF: {detail}")]
    InvalidOutput { engine: EngineKind, detail: String },

    /// Staging the engine's output failed before the engine ran.
    #[error("Could not prepare output for {engine}: {source}")]
    Staging {
        engine: EngineKind,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// The engine this error belongs to.
    pub fn engine(&self) -> EngineKind {
        match self {
            Self::Unavailable { engine, .. }
            | Self::InstallFailed { engine, .. }
            | Self::NativeToolMissing { engine, .. }
            | Self::RenderFailed { engine, .. }
            | Self::InvalidOutput { engine, .. }
            | Self::Staging { engine, .. } => *engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_not_found_display() {
        let e = Html2PdfError::SourceNotFound {
            path: PathBuf::from("Portfolio-Content-Management-Guide.html"),
        };
        assert_eq!(
            e.to_string(),
            "Portfolio-Content-Management-Guide.html not found!"
        );
        assert!(e.is_precondition());
    }

    #[test]
    fn all_engines_failed_names_remedy() {
        let e = Html2PdfError::AllEnginesFailed {
            primary_error: EngineError::Unavailable {
                engine: EngineKind::WeasyPrint,
                detail: "No module named 'weasyprint'".into(),
            },
            backup_error: EngineError::NativeToolMissing {
                engine: EngineKind::Pdfkit,
                tool: "wkhtmltopdf".into(),
                detail: "No such file or directory".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("wkhtmltopdf"), "got: {msg}");
        assert!(msg.contains("print-to-PDF"), "got: {msg}");
        assert!(!e.is_precondition());
    }

    #[test]
    fn engine_error_reports_its_engine() {
        let e = EngineError::InstallFailed {
            engine: EngineKind::Pdfkit,
            package: "pdfkit",
            detail: "exit code 1".into(),
        };
        assert_eq!(e.engine(), EngineKind::Pdfkit);
        assert!(e.to_string().contains("pdfkit"));
    }
}
