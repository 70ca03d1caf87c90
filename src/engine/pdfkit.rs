//! Backup engine: pdfkit driving the native `wkhtmltopdf` binary.
//!
//! pdfkit has no command-line entry point, so rendering runs a short inline
//! script. `wkhtmltopdf` is checked with `--version` first so a missing
//! binary is reported by name instead of as a Python traceback.

use super::{install_error, EngineKind, RenderEngine};
use crate::error::EngineError;
use pip_auto::PythonEnv;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Default name of the native renderer looked up on `PATH`.
pub const WKHTMLTOPDF: &str = "wkhtmltopdf";

/// `argv`: html, pdf, and optionally an explicit wkhtmltopdf path.
const RENDER_SCRIPT: &str = "\
import sys
import pdfkit
kwargs = {}
if len(sys.argv) > 3:
    kwargs['configuration'] = pdfkit.configuration(wkhtmltopdf=sys.argv[3])
pdfkit.from_file(sys.argv[1], sys.argv[2], **kwargs)
";

/// Renders with `pdfkit.from_file`.
#[derive(Debug, Clone)]
pub struct PdfkitEngine {
    python: PythonEnv,
    /// Explicit wkhtmltopdf binary; `None` means look it up on `PATH`.
    wkhtmltopdf: Option<PathBuf>,
}

impl PdfkitEngine {
    pub fn new(python: PythonEnv) -> Self {
        Self {
            python,
            wkhtmltopdf: None,
        }
    }

    /// Use a specific wkhtmltopdf binary instead of the one on `PATH`.
    pub fn with_wkhtmltopdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.wkhtmltopdf = Some(path.into());
        self
    }

    fn tool(&self) -> &Path {
        self.wkhtmltopdf
            .as_deref()
            .unwrap_or_else(|| Path::new(WKHTMLTOPDF))
    }

    /// Fails with [`EngineError::NativeToolMissing`] unless
    /// `wkhtmltopdf --version` runs.
    pub fn check_native_tool(&self) -> Result<(), EngineError> {
        let tool = self.tool();
        let missing = |detail: String| EngineError::NativeToolMissing {
            engine: EngineKind::Pdfkit,
            tool: tool.display().to_string(),
            detail,
        };

        let status = Command::new(tool)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| missing(e.to_string()))?;

        if status.success() {
            debug!("{} is available", tool.display());
            Ok(())
        } else {
            Err(missing(format!("'--version' exited with {status}")))
        }
    }
}

impl RenderEngine for PdfkitEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Pdfkit
    }

    fn is_available(&self) -> bool {
        match self.python.has_module(EngineKind::Pdfkit.module()) {
            Ok(found) => found,
            Err(e) => {
                debug!("pdfkit probe failed: {e}");
                false
            }
        }
    }

    fn install(&self) -> Result<(), EngineError> {
        self.python
            .install(EngineKind::Pdfkit.package())
            .map_err(|e| install_error(EngineKind::Pdfkit, e))
    }

    fn render(&self, source: &Path, output: &Path) -> Result<(), EngineError> {
        self.check_native_tool()?;

        let mut args = vec![source.as_os_str(), output.as_os_str()];
        if let Some(ref tool) = self.wkhtmltopdf {
            args.push(tool.as_os_str());
        }

        self.python
            .run_script("pdfkit.from_file", RENDER_SCRIPT, args)
            .map(|_| ())
            .map_err(|e| EngineError::RenderFailed {
                engine: EngineKind::Pdfkit,
                detail: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_native_tool_is_named() {
        let engine = PdfkitEngine::new(PythonEnv::from_interpreter("/nonexistent/python"))
            .with_wkhtmltopdf("/nonexistent/bin/wkhtmltopdf");

        match engine.render(Path::new("in.html"), Path::new("out.pdf")) {
            Err(EngineError::NativeToolMissing { tool, engine, .. }) => {
                assert_eq!(engine, EngineKind::Pdfkit);
                assert!(tool.ends_with("wkhtmltopdf"), "got {tool}");
            }
            other => panic!("expected NativeToolMissing, got {other:?}"),
        }
    }

    #[test]
    fn default_tool_is_looked_up_on_path() {
        let engine = PdfkitEngine::new(PythonEnv::from_interpreter("python3"));
        assert_eq!(engine.tool(), Path::new(WKHTMLTOPDF));
    }

    #[test]
    fn script_reads_paths_from_argv() {
        assert!(RENDER_SCRIPT.contains("sys.argv[1]"));
        assert!(RENDER_SCRIPT.contains("sys.argv[2]"));
        assert!(RENDER_SCRIPT.contains("pdfkit.from_file"));
    }
}
