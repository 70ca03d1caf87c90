//! Human-readable console lines for conversion events.
//!
//! The line functions are shared by [`ConsoleProgressCallback`], which
//! [`crate::run()`] attaches, and by the `guide2pdf` binary's richer
//! callback, so both print the same wording.

use crate::engine::EngineKind;
use crate::progress::ConversionProgressCallback;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ── Line formatting ──────────────────────────────────────────────────────

pub fn missing_line(engine: EngineKind) -> String {
    format!("{engine} not found. Installing...")
}

/// Only the primary engine announces its render; pdfkit renders silently.
pub fn render_line(engine: EngineKind) -> Option<String> {
    match engine {
        EngineKind::WeasyPrint => Some("Generating PDF from HTML...".to_string()),
        EngineKind::Pdfkit => None,
    }
}

/// `first` is false once another engine has already failed.
pub fn failure_line(engine: EngineKind, error: &str, first: bool) -> String {
    if first {
        format!("Failed to install or use {engine}: {error}")
    } else {
        format!("{engine} also failed: {error}")
    }
}

pub fn fallback_line(to: EngineKind) -> String {
    format!("Trying alternative method with {to}...")
}

pub fn success_line(output: &Path) -> String {
    format!("✅ PDF created successfully: {}", output.display())
}

pub fn error_line(error: &str) -> String {
    format!("Error: {error}")
}

// ── Plain console callback ───────────────────────────────────────────────

/// Writes one uncoloured line per event to a sink, stdout by default.
///
/// Write errors are ignored: a closed stdout must not turn a good
/// conversion into a failed one.
pub struct ConsoleProgressCallback<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    failures: AtomicUsize,
}

impl ConsoleProgressCallback<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleProgressCallback<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            failures: AtomicUsize::new(0),
        }
    }

    /// Gives the sink back, e.g. to inspect a captured buffer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

impl<W: Write + Send> ConversionProgressCallback for ConsoleProgressCallback<W> {
    fn on_engine_missing(&self, engine: EngineKind) {
        self.line(&missing_line(engine));
    }

    fn on_render_start(&self, engine: EngineKind) {
        if let Some(line) = render_line(engine) {
            self.line(&line);
        }
    }

    fn on_engine_failed(&self, engine: EngineKind, error: &str) {
        let first = self.failures.fetch_add(1, Ordering::SeqCst) == 0;
        self.line(&failure_line(engine, error, first));
    }

    fn on_fallback(&self, _from: EngineKind, to: EngineKind) {
        self.line(&fallback_line(to));
    }

    fn on_conversion_complete(&self, _engine: EngineKind, output: &Path) {
        self.line(&success_line(output));
    }

    fn on_conversion_failed(&self, error: &str, remedy: Option<&str>) {
        match remedy {
            // The engine failures are already on screen.
            Some(remedy) => self.line(remedy),
            None => self.line(&error_line(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MANUAL_REMEDY;

    fn captured(cb: ConsoleProgressCallback<Vec<u8>>) -> String {
        String::from_utf8(cb.into_inner()).unwrap()
    }

    #[test]
    fn success_line_names_output() {
        let line = success_line(Path::new("Portfolio-Content-Management-Guide.pdf"));
        assert_eq!(
            line,
            "✅ PDF created successfully: Portfolio-Content-Management-Guide.pdf"
        );
    }

    #[test]
    fn only_weasyprint_announces_render() {
        assert_eq!(
            render_line(EngineKind::WeasyPrint).as_deref(),
            Some("Generating PDF from HTML...")
        );
        assert_eq!(render_line(EngineKind::Pdfkit), None);
    }

    #[test]
    fn fallback_transcript() {
        let cb = ConsoleProgressCallback::new(Vec::new());
        cb.on_engine_missing(EngineKind::WeasyPrint);
        cb.on_engine_failed(EngineKind::WeasyPrint, "pip exited 1");
        cb.on_fallback(EngineKind::WeasyPrint, EngineKind::Pdfkit);
        cb.on_render_start(EngineKind::Pdfkit);
        cb.on_engine_failed(EngineKind::Pdfkit, "wkhtmltopdf missing");
        cb.on_conversion_failed("wkhtmltopdf missing", Some(MANUAL_REMEDY));

        let expected = format!(
            "WeasyPrint not found. Installing...\n\
             Failed to install or use WeasyPrint: pip exited 1\n\
             Trying alternative method with pdfkit...\n\
             pdfkit also failed: wkhtmltopdf missing\n\
             {MANUAL_REMEDY}\n"
        );
        assert_eq!(captured(cb), expected);
    }

    #[test]
    fn precondition_failure_is_an_error_line() {
        let cb = ConsoleProgressCallback::new(Vec::new());
        cb.on_conversion_failed("guide.html not found!", None);
        assert_eq!(captured(cb), "Error: guide.html not found!\n");
    }
}
