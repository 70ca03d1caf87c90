//! # guide-html2pdf
//!
//! Convert the Portfolio Content Management Guide from HTML to PDF with
//! whichever Python rendering engine the host can provide.
//!
//! ## Why two engines?
//!
//! Neither common HTML-to-PDF route works everywhere. WeasyPrint needs
//! Pango/Cairo system libraries; pdfkit needs the `wkhtmltopdf` binary. The
//! converter tries WeasyPrint first, installing it with pip when it is
//! missing, and falls back to pdfkit on any failure. Only when both fail
//! does the user have to act.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Input     source must exist and be readable
//!  ├─ 2. Primary   WeasyPrint  (probe → pip install → probe → render)
//!  ├─ 3. Backup    pdfkit      (pip install → wkhtmltopdf check → render)
//!  └─ 4. Output    %PDF check, atomic rename onto the output path
//! ```
//!
//! Installing a package changes the host's Python environment and is never
//! undone. Every install is logged at `warn` level and reported through
//! [`ConversionProgressCallback::on_install_start`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guide_html2pdf::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Portfolio-Content-Management-Guide.html → .pdf in the working directory
//!     let config = ConversionConfig::default();
//!     let outcome = convert(&config)?;
//!     eprintln!("{} written by {}", outcome.output.display(), outcome.engine);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `guide2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod console;
pub mod convert;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OUTPUT_FILE, SOURCE_FILE};
pub use console::ConsoleProgressCallback;
pub use convert::{convert, run, Converter};
pub use engine::{EngineKind, PdfkitEngine, RenderEngine, WeasyPrintEngine};
pub use error::{EngineError, Html2PdfError, MANUAL_REMEDY};
pub use output::{ConversionOutcome, EngineAttempt};
pub use pip_auto::PythonEnv;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
