//! Configuration for a guide conversion.
//!
//! The binary always converts the same two files, so the defaults of
//! [`ConversionConfig`] are the hardcoded [`SOURCE_FILE`] and
//! [`OUTPUT_FILE`] in the working directory. The builder exists for library
//! callers and tests that need to point at other paths or observe progress.

use crate::error::Html2PdfError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Source HTML document, relative to the working directory.
pub const SOURCE_FILE: &str = "Portfolio-Content-Management-Guide.html";

/// Output PDF document, relative to the working directory.
pub const OUTPUT_FILE: &str = "Portfolio-Content-Management-Guide.pdf";

/// Configuration for an HTML-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use guide_html2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .source("notes.html")
///     .output("notes.pdf")
///     .build()
///     .unwrap();
/// assert_eq!(config.output.to_str(), Some("notes.pdf"));
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// HTML document to convert. Default: [`SOURCE_FILE`].
    pub source: PathBuf,

    /// Where the PDF ends up. Default: [`OUTPUT_FILE`].
    ///
    /// Overwritten only after an engine produced a valid PDF.
    pub output: PathBuf,

    /// Optional progress callback for conversion events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(SOURCE_FILE),
            output: PathBuf::from(OUTPUT_FILE),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("source", &self.source)
            .field("output", &self.output)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source = path.into();
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Html2PdfError> {
        let c = &self.config;
        if c.source.as_os_str().is_empty() {
            return Err(Html2PdfError::InvalidConfig(
                "source path must not be empty".into(),
            ));
        }
        if c.output.as_os_str().is_empty() {
            return Err(Html2PdfError::InvalidConfig(
                "output path must not be empty".into(),
            ));
        }
        if c.source == c.output {
            return Err(Html2PdfError::InvalidConfig(format!(
                "source and output are the same file: {}",
                c.source.display()
            )));
        }
        let is_pdf = c
            .output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(Html2PdfError::InvalidConfig(format!(
                "output must have a .pdf extension, got {}",
                c.output.display()
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults_are_the_guide_files() {
        let c = ConversionConfig::default();
        assert_eq!(c.source, PathBuf::from("Portfolio-Content-Management-Guide.html"));
        assert_eq!(c.output, PathBuf::from("Portfolio-Content-Management-Guide.pdf"));
        assert!(c.progress_callback.is_none());
        ConversionConfig::builder().build().unwrap();
    }

    #[test]
    fn rejects_same_source_and_output() {
        let err = ConversionConfig::builder()
            .source("x.pdf")
            .output("x.pdf")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("same file"), "got: {err}");
    }

    #[test]
    fn rejects_non_pdf_output() {
        assert!(ConversionConfig::builder().output("out.html").build().is_err());
        assert!(ConversionConfig::builder().output("out").build().is_err());
        ConversionConfig::builder().output("OUT.PDF").build().unwrap();
    }

    #[test]
    fn rejects_empty_paths() {
        assert!(ConversionConfig::builder().source("").build().is_err());
        assert!(ConversionConfig::builder().output("").build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ConversionProgressCallback>"), "got: {dbg}");
    }
}
