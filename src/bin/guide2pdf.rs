//! CLI binary for guide-html2pdf.
//!
//! Converts `Portfolio-Content-Management-Guide.html` in the working
//! directory to `Portfolio-Content-Management-Guide.pdf`. A thin shim over
//! the library: the flags only control console output and logging.

use anyhow::{Context, Result};
use clap::Parser;
use guide_html2pdf::console::{
    error_line, failure_line, fallback_line, missing_line, render_line, success_line,
};
use guide_html2pdf::{
    ConversionConfig, ConversionProgressCallback, Converter, EngineKind, ProgressCallback,
    PythonEnv,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints status lines to stdout and spins an [indicatif] spinner on stderr
/// while pip or an engine is running.
struct CliProgressCallback {
    /// Spinner for the step in flight, if any.
    spinner: Mutex<Option<ProgressBar>>,
    show_spinner: bool,
    /// Suppress everything except the final failure.
    quiet: bool,
    /// Engine failures seen so far; the second one is worded "also failed".
    failures: AtomicUsize,
}

impl CliProgressCallback {
    fn new(show_spinner: bool, quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_spinner,
            quiet,
            failures: AtomicUsize::new(0),
        })
    }

    /// Print a status line without tearing the spinner.
    fn say(&self, line: String) {
        if self.quiet {
            return;
        }
        self.print(line);
    }

    fn print(&self, line: String) {
        match self.spinner.lock().ok().and_then(|s| s.clone()) {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn start_spinner(&self, prefix: &str, message: String) {
        if !self.show_spinner || self.quiet {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(prefix.to_string());
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(old) = slot.replace(bar) {
                old.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_engine_missing(&self, engine: EngineKind) {
        self.say(missing_line(engine));
    }

    fn on_install_start(&self, _engine: EngineKind, package: &str) {
        self.start_spinner("pip", format!("installing {package}…"));
    }

    fn on_install_complete(&self, _engine: EngineKind, package: &str) {
        self.stop_spinner();
        self.say(format!("  {} {}", green("✓"), dim(&format!("installed {package}"))));
    }

    fn on_render_start(&self, engine: EngineKind) {
        if let Some(line) = render_line(engine) {
            self.say(line);
        }
        self.start_spinner(engine.name(), "rendering…".to_string());
    }

    fn on_engine_failed(&self, engine: EngineKind, error: &str) {
        self.stop_spinner();
        let first = self.failures.fetch_add(1, Ordering::SeqCst) == 0;
        self.say(format!("{} {}", red("✗"), failure_line(engine, error, first)));
    }

    fn on_fallback(&self, _from: EngineKind, to: EngineKind) {
        self.say(format!("{} {}", cyan("◆"), fallback_line(to)));
    }

    fn on_conversion_complete(&self, _engine: EngineKind, output: &Path) {
        self.stop_spinner();
        self.say(bold(&success_line(output)));
    }

    fn on_conversion_failed(&self, error: &str, remedy: Option<&str>) {
        self.stop_spinner();
        match remedy {
            // Engine failures were already printed as they happened.
            Some(remedy) if !self.quiet => self.print(remedy.to_string()),
            Some(remedy) => self.print(format!("{}\n{remedy}", red(&error_line(error)))),
            None => self.print(red(&error_line(error))),
        }
    }
}

const AFTER_HELP: &str = r#"WHAT IT DOES:
  Reads  Portfolio-Content-Management-Guide.html  from the current directory
  Writes Portfolio-Content-Management-Guide.pdf   next to it

  1. WeasyPrint  — installed with pip if missing
  2. pdfkit      — installed with pip; needs the wkhtmltopdf binary on PATH

  Installing a package modifies your Python environment and is not undone.

ENVIRONMENT VARIABLES:
  PIP_AUTO_PYTHON   Python interpreter to use (default: python3, then python)
  RUST_LOG          Log filter for stderr diagnostics (e.g. debug)

IF BOTH ENGINES FAIL:
  Install wkhtmltopdf (https://wkhtmltopdf.org/downloads.html) and re-run,
  or open the HTML file in a browser and use Print → Save as PDF.
"#;

/// Convert the Portfolio Content Management Guide from HTML to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "guide2pdf",
    version,
    about = "Convert Portfolio-Content-Management-Guide.html to PDF",
    long_about = "Convert Portfolio-Content-Management-Guide.html in the current directory to \
Portfolio-Content-Management-Guide.pdf using WeasyPrint, falling back to pdfkit + wkhtmltopdf. \
Missing Python packages are installed with pip.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "GUIDE2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GUIDE2PDF_QUIET")]
    quiet: bool,

    /// Disable the spinner.
    #[arg(long, env = "GUIDE2PDF_NO_PROGRESS")]
    no_progress: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Status lines go to stdout through the callback; stderr logs are for
    // diagnosis only.
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let show_spinner = !cli.no_progress && !cli.verbose;
    let progress: ProgressCallback = CliProgressCallback::new(show_spinner, cli.quiet);

    let config = ConversionConfig::builder()
        .progress_callback(progress)
        .build()
        .context("Invalid configuration")?;

    let python = PythonEnv::locate();
    tracing::debug!("Python interpreter: {}", python.interpreter().display());

    // ── Run conversion ───────────────────────────────────────────────────
    let converter = Converter::with_python(config, python);
    Ok(if converter.run() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
