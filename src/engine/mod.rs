//! HTML-to-PDF rendering engines.
//!
//! Each engine is an adapter over a Python library driven through
//! [`pip_auto::PythonEnv`]. The orchestrator in [`crate::convert`] only sees
//! the [`RenderEngine`] trait, so tests can swap in scripted engines and the
//! fallback order stays independent of how an engine renders.
//!
//! ```text
//! probe ──▶ install (if missing) ──▶ render ──▶ staged PDF
//! (import)  (pip install)           (python)
//! ```
//!
//! 1. [`weasyprint`] — primary engine, pure Python + system Pango.
//! 2. [`pdfkit`]     — backup engine, wraps the native `wkhtmltopdf` binary
//!    that this program never installs.

pub mod pdfkit;
pub mod weasyprint;

pub use pdfkit::PdfkitEngine;
pub use weasyprint::WeasyPrintEngine;

use crate::error::EngineError;
use std::fmt;
use std::path::Path;

/// The two engines the converter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// WeasyPrint (`pip install weasyprint`).
    WeasyPrint,
    /// pdfkit (`pip install pdfkit`) on top of `wkhtmltopdf`.
    Pdfkit,
}

impl EngineKind {
    /// Human-readable engine name used in console messages.
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::WeasyPrint => "WeasyPrint",
            EngineKind::Pdfkit => "pdfkit",
        }
    }

    /// pip distribution that provides the engine.
    pub fn package(self) -> &'static str {
        match self {
            EngineKind::WeasyPrint => "weasyprint",
            EngineKind::Pdfkit => "pdfkit",
        }
    }

    /// Python module probed to decide whether the engine is installed.
    pub fn module(self) -> &'static str {
        match self {
            EngineKind::WeasyPrint => "weasyprint",
            EngineKind::Pdfkit => "pdfkit",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An HTML-to-PDF backend.
///
/// All calls block until the underlying process finishes.
pub trait RenderEngine {
    /// Which engine this is.
    fn kind(&self) -> EngineKind;

    /// Returns `true` if the engine's library can be loaded right now.
    ///
    /// Probing must not have side effects on the host.
    fn is_available(&self) -> bool;

    /// Installs the engine's library into the host environment.
    ///
    /// Irreversible: nothing uninstalls the package afterwards.
    fn install(&self) -> Result<(), EngineError>;

    /// Renders `source` into a PDF written at `output`.
    ///
    /// `output` is a staging path; the caller validates it and moves it to
    /// the final location.
    fn render(&self, source: &Path, output: &Path) -> Result<(), EngineError>;
}

/// Maps a failed `pip install` to an [`EngineError::InstallFailed`].
fn install_error(engine: EngineKind, e: pip_auto::PipAutoError) -> EngineError {
    EngineError::InstallFailed {
        engine,
        package: engine.package(),
        detail: e.to_string(),
    }
}
