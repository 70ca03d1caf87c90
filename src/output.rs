//! Result types returned by a successful conversion.

use crate::engine::EngineKind;
use crate::error::EngineError;
use std::path::PathBuf;

/// What happened to one engine during a conversion.
#[derive(Debug)]
pub struct EngineAttempt {
    pub engine: EngineKind,
    /// Whether this attempt ran `pip install` (successfully or not).
    pub install_attempted: bool,
    /// `None` when the engine produced the PDF.
    pub error: Option<EngineError>,
}

impl EngineAttempt {
    pub(crate) fn new(engine: EngineKind) -> Self {
        Self {
            engine,
            install_attempted: false,
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// A successful conversion.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Engine that produced the PDF.
    pub engine: EngineKind,
    /// Final location of the PDF.
    pub output: PathBuf,
    /// Size of the written PDF in bytes.
    pub output_bytes: u64,
    /// Packages installed into the host environment during this run.
    pub installed_packages: Vec<&'static str>,
    /// Every engine tried, in order. The last entry succeeded.
    pub attempts: Vec<EngineAttempt>,
    /// Wall-clock time for the whole conversion.
    pub duration_ms: u64,
}

impl ConversionOutcome {
    /// `true` when the backup engine produced the PDF.
    pub fn used_fallback(&self) -> bool {
        self.attempts.len() > 1
    }
}
