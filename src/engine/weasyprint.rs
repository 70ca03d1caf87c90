//! Primary engine: WeasyPrint, run as `python -m weasyprint <html> <pdf>`.

use super::{install_error, EngineKind, RenderEngine};
use crate::error::EngineError;
use pip_auto::PythonEnv;
use std::path::Path;
use tracing::debug;

/// Renders through the `weasyprint` command-line module.
#[derive(Debug, Clone)]
pub struct WeasyPrintEngine {
    python: PythonEnv,
}

impl WeasyPrintEngine {
    pub fn new(python: PythonEnv) -> Self {
        Self { python }
    }
}

impl RenderEngine for WeasyPrintEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::WeasyPrint
    }

    fn is_available(&self) -> bool {
        match self.python.has_module(EngineKind::WeasyPrint.module()) {
            Ok(found) => found,
            Err(e) => {
                debug!("WeasyPrint probe failed: {e}");
                false
            }
        }
    }

    fn install(&self) -> Result<(), EngineError> {
        self.python
            .install(EngineKind::WeasyPrint.package())
            .map_err(|e| install_error(EngineKind::WeasyPrint, e))
    }

    fn render(&self, source: &Path, output: &Path) -> Result<(), EngineError> {
        self.python
            .run_module(
                EngineKind::WeasyPrint.module(),
                [source.as_os_str(), output.as_os_str()],
            )
            .map(|out| {
                if !out.stderr.trim().is_empty() {
                    debug!("weasyprint: {}", out.stderr.trim());
                }
            })
            .map_err(|e| EngineError::RenderFailed {
                engine: EngineKind::WeasyPrint,
                detail: e.to_string(),
            })
    }
}
