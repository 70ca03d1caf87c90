//! The conversion orchestrator: primary engine, then backup engine.
//!
//! ```text
//! check source ──▶ WeasyPrint ──ok──▶ done
//!                   │ missing → pip install → probe again
//!                   │ any failure
//!                   ▼
//!                  pdfkit: pip install → wkhtmltopdf → done
//!                   │ any failure
//!                   ▼
//!                  AllEnginesFailed (+ manual remedy)
//! ```
//!
//! Engines never write the output path directly. Each one renders into a
//! temporary directory beside the output; the file is checked for the
//! `%PDF` magic and only then renamed over the output. A failed run leaves a
//! pre-existing output untouched.

use crate::config::ConversionConfig;
use crate::console::ConsoleProgressCallback;
use crate::engine::{PdfkitEngine, RenderEngine, WeasyPrintEngine};
use crate::error::{EngineError, Html2PdfError, MANUAL_REMEDY};
use crate::input;
use crate::output::{ConversionOutcome, EngineAttempt};
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use pip_auto::PythonEnv;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Runs the two-engine fallback chain for one source/output pair.
pub struct Converter {
    config: ConversionConfig,
    primary: Box<dyn RenderEngine>,
    backup: Box<dyn RenderEngine>,
}

/// A rendered PDF waiting in its staging directory.
struct StagedPdf {
    path: PathBuf,
    bytes: u64,
    // Removed (with any leftovers) when dropped.
    _dir: TempDir,
}

impl Converter {
    /// Build a converter from explicit engines.
    pub fn new(
        config: ConversionConfig,
        primary: Box<dyn RenderEngine>,
        backup: Box<dyn RenderEngine>,
    ) -> Self {
        Self {
            config,
            primary,
            backup,
        }
    }

    /// WeasyPrint first, pdfkit second, both through `python`.
    pub fn with_python(config: ConversionConfig, python: PythonEnv) -> Self {
        Self::new(
            config,
            Box::new(WeasyPrintEngine::new(python.clone())),
            Box::new(PdfkitEngine::new(python)),
        )
    }

    /// Like [`Converter::with_python`] with an interpreter from
    /// [`PythonEnv::locate`].
    pub fn with_default_engines(config: ConversionConfig) -> Self {
        Self::with_python(config, PythonEnv::locate())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert and fold the result into success/failure.
    ///
    /// Every outcome has already been reported through the progress
    /// callback and the log by the time this returns.
    pub fn run(&self) -> bool {
        match self.convert() {
            Ok(outcome) => {
                debug!(
                    "Converted with {} in {}ms ({} bytes)",
                    outcome.engine, outcome.duration_ms, outcome.output_bytes
                );
                true
            }
            Err(e) => {
                debug!("Conversion failed: {e}");
                false
            }
        }
    }

    /// Convert the source document, falling back to the backup engine.
    ///
    /// # Errors
    /// - Source missing, unreadable, or not a file (no engine is touched)
    /// - [`Html2PdfError::AllEnginesFailed`] when neither engine produced a
    ///   valid PDF
    /// - [`Html2PdfError::OutputWriteFailed`] when the finished PDF could
    ///   not be moved into place
    pub fn convert(&self) -> Result<ConversionOutcome, Html2PdfError> {
        let result = self.convert_inner();
        if let Err(ref e) = result {
            let cb = self.progress();
            match e {
                Html2PdfError::AllEnginesFailed { backup_error, .. } => {
                    cb.on_conversion_failed(&backup_error.to_string(), Some(MANUAL_REMEDY));
                }
                other => cb.on_conversion_failed(&other.to_string(), None),
            }
        }
        result
    }

    fn convert_inner(&self) -> Result<ConversionOutcome, Html2PdfError> {
        let start = Instant::now();
        let cb = self.progress();
        let source = &self.config.source;
        let output = &self.config.output;

        // ── Step 1: Precondition ─────────────────────────────────────────
        input::check_source(source)?;
        info!("Converting {} → {}", source.display(), output.display());
        cb.on_conversion_start(source, output);

        let mut installed = Vec::new();

        // ── Step 2: Primary engine ───────────────────────────────────────
        let mut primary_attempt = EngineAttempt::new(self.primary.kind());
        let primary_error = match self.try_primary(&mut primary_attempt, &mut installed) {
            Ok(staged) => {
                let output_bytes = self.persist(staged)?;
                return Ok(self.outcome(
                    start,
                    output_bytes,
                    installed,
                    vec![primary_attempt],
                ));
            }
            Err(e) => e,
        };

        warn!("{} failed: {primary_error}", self.primary.kind());
        cb.on_engine_failed(self.primary.kind(), &primary_error.to_string());

        // ── Step 3: Backup engine ────────────────────────────────────────
        info!(
            "Falling back from {} to {}",
            self.primary.kind(),
            self.backup.kind()
        );
        cb.on_fallback(self.primary.kind(), self.backup.kind());

        let mut backup_attempt = EngineAttempt::new(self.backup.kind());
        match self.try_backup(&mut backup_attempt, &mut installed) {
            Ok(staged) => {
                let output_bytes = self.persist(staged)?;
                primary_attempt.error = Some(primary_error);
                Ok(self.outcome(
                    start,
                    output_bytes,
                    installed,
                    vec![primary_attempt, backup_attempt],
                ))
            }
            Err(backup_error) => {
                warn!("{} failed: {backup_error}", self.backup.kind());
                cb.on_engine_failed(self.backup.kind(), &backup_error.to_string());
                Err(Html2PdfError::AllEnginesFailed {
                    primary_error,
                    backup_error,
                })
            }
        }
    }

    /// Probe; install and probe again if missing; render.
    fn try_primary(
        &self,
        attempt: &mut EngineAttempt,
        installed: &mut Vec<&'static str>,
    ) -> Result<StagedPdf, EngineError> {
        let engine = self.primary.as_ref();
        let kind = engine.kind();

        if !engine.is_available() {
            info!("{kind} not found");
            self.progress().on_engine_missing(kind);
            attempt.install_attempted = true;
            self.install(engine, installed)?;

            if !engine.is_available() {
                return Err(EngineError::Unavailable {
                    engine: kind,
                    detail: format!(
                        "'{}' still cannot be imported after installing '{}'",
                        kind.module(),
                        kind.package()
                    ),
                });
            }
        }

        self.render_staged(engine)
    }

    /// Install unconditionally, then render. pip treats an already
    /// installed package as a no-op.
    fn try_backup(
        &self,
        attempt: &mut EngineAttempt,
        installed: &mut Vec<&'static str>,
    ) -> Result<StagedPdf, EngineError> {
        let engine = self.backup.as_ref();
        attempt.install_attempted = true;
        self.install(engine, installed)?;
        self.render_staged(engine)
    }

    fn install(
        &self,
        engine: &dyn RenderEngine,
        installed: &mut Vec<&'static str>,
    ) -> Result<(), EngineError> {
        let kind = engine.kind();
        let package = kind.package();
        info!("Installing package '{package}' for {kind} (modifies the host environment)");
        self.progress().on_install_start(kind, package);
        engine.install()?;
        installed.push(package);
        self.progress().on_install_complete(kind, package);
        Ok(())
    }

    /// Render into a fresh staging directory and validate the result.
    fn render_staged(&self, engine: &dyn RenderEngine) -> Result<StagedPdf, EngineError> {
        let kind = engine.kind();
        let output = &self.config.output;
        let staging_err = |source: std::io::Error| EngineError::Staging {
            engine: kind,
            source,
        };

        let parent = output_dir(output);
        std::fs::create_dir_all(&parent).map_err(staging_err)?;
        let dir = tempfile::Builder::new()
            .prefix(".guide2pdf-")
            .tempdir_in(&parent)
            .map_err(staging_err)?;
        let file_name = output
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output.pdf"));
        let staged = dir.path().join(file_name);

        self.progress().on_render_start(kind);
        debug!("{kind} rendering into {}", staged.display());
        engine.render(&self.config.source, &staged)?;

        let bytes = validate_pdf(kind, &staged)?;
        Ok(StagedPdf {
            path: staged,
            bytes,
            _dir: dir,
        })
    }

    /// Move a validated PDF onto the output path.
    fn persist(&self, staged: StagedPdf) -> Result<u64, Html2PdfError> {
        let output = &self.config.output;
        std::fs::rename(&staged.path, output).map_err(|source| {
            Html2PdfError::OutputWriteFailed {
                path: output.clone(),
                source,
            }
        })?;
        Ok(staged.bytes)
    }

    fn outcome(
        &self,
        start: Instant,
        output_bytes: u64,
        installed_packages: Vec<&'static str>,
        attempts: Vec<EngineAttempt>,
    ) -> ConversionOutcome {
        let engine = attempts
            .last()
            .map(|a| a.engine)
            .unwrap_or_else(|| self.primary.kind());
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "PDF created with {engine}: {} ({output_bytes} bytes, {duration_ms}ms)",
            self.config.output.display()
        );
        self.progress()
            .on_conversion_complete(engine, &self.config.output);

        ConversionOutcome {
            engine,
            output: self.config.output.clone(),
            output_bytes,
            installed_packages,
            attempts,
            duration_ms,
        }
    }

    fn progress(&self) -> &dyn ConversionProgressCallback {
        match self.config.progress_callback {
            Some(ref cb) => cb.as_ref(),
            None => &NoopProgressCallback as &dyn ConversionProgressCallback,
        }
    }
}

/// Convert `config.source` to `config.output` with the default engines.
///
/// # Example
/// ```rust,no_run
/// use guide_html2pdf::{convert, ConversionConfig};
///
/// let outcome = convert(&ConversionConfig::default())?;
/// println!("{} via {}", outcome.output.display(), outcome.engine);
/// # Ok::<(), guide_html2pdf::Html2PdfError>(())
/// ```
pub fn convert(config: &ConversionConfig) -> Result<ConversionOutcome, Html2PdfError> {
    Converter::with_default_engines(config.clone()).convert()
}

/// Convert the guide in the working directory with the default engines,
/// printing each step to stdout.
///
/// Returns `true` when the PDF was written.
pub fn run() -> bool {
    let console = Arc::new(ConsoleProgressCallback::stdout());
    match ConversionConfig::builder()
        .progress_callback(console.clone())
        .build()
    {
        Ok(config) => Converter::with_default_engines(config).run(),
        Err(e) => {
            console.on_conversion_failed(&e.to_string(), None);
            false
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Directory the output lives in; `.` for a bare file name.
fn output_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check that `path` exists and starts with `%PDF`; return its size.
fn validate_pdf(engine: crate::engine::EngineKind, path: &Path) -> Result<u64, EngineError> {
    let invalid = |detail: String| EngineError::InvalidOutput { engine, detail };

    let mut f = std::fs::File::open(path)
        .map_err(|e| invalid(format!("no file at {}: {e}", path.display())))?;
    let bytes = f
        .metadata()
        .map_err(|e| invalid(e.to_string()))?
        .len();
    if bytes == 0 {
        return Err(invalid("output file is empty".into()));
    }

    let mut magic = [0u8; 4];
    if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(invalid(format!(
            "missing %PDF header (first bytes: {:?})",
            String::from_utf8_lossy(&magic)
        )));
    }

    Ok(bytes)
}
