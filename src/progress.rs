//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to hear
//! about each step of the fallback chain: probing, installing, rendering,
//! falling back, and the final outcome. The converter itself never prints;
//! [`crate::console::ConsoleProgressCallback`] and the `guide2pdf` binary
//! turn these events into console lines.
//!
//! # Example
//!
//! ```rust
//! use guide_html2pdf::{ConversionConfig, ConversionProgressCallback, EngineKind};
//! use std::sync::Arc;
//!
//! struct InstallLogger;
//!
//! impl ConversionProgressCallback for InstallLogger {
//!     fn on_install_start(&self, engine: EngineKind, package: &str) {
//!         eprintln!("installing {package} for {engine}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(InstallLogger) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::engine::EngineKind;
use std::path::Path;
use std::sync::Arc;

/// Called by the converter as it walks the engine fallback chain.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Calls arrive in order on the converting thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after the source document passed its precondition check.
    fn on_conversion_start(&self, source: &Path, output: &Path) {
        let _ = (source, output);
    }

    /// The engine's library could not be loaded; an install follows.
    fn on_engine_missing(&self, engine: EngineKind) {
        let _ = engine;
    }

    /// A package is about to be installed into the host environment.
    fn on_install_start(&self, engine: EngineKind, package: &str) {
        let _ = (engine, package);
    }

    /// The package installed successfully.
    fn on_install_complete(&self, engine: EngineKind, package: &str) {
        let _ = (engine, package);
    }

    /// The engine is about to render the source document.
    fn on_render_start(&self, engine: EngineKind) {
        let _ = engine;
    }

    /// The engine failed at some stage.
    ///
    /// # Arguments
    /// * `engine` — the engine that failed
    /// * `error`  — human-readable error description
    fn on_engine_failed(&self, engine: EngineKind, error: &str) {
        let _ = (engine, error);
    }

    /// The converter is moving from `from` to the backup engine `to`.
    fn on_fallback(&self, from: EngineKind, to: EngineKind) {
        let _ = (from, to);
    }

    /// The PDF is in place at `output`.
    fn on_conversion_complete(&self, engine: EngineKind, output: &Path) {
        let _ = (engine, output);
    }

    /// No PDF was produced.
    ///
    /// # Arguments
    /// * `error`  — what went wrong last
    /// * `remedy` — what the user can do about it, if anything
    fn on_conversion_failed(&self, error: &str, remedy: Option<&str>) {
        let _ = (error, remedy);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
