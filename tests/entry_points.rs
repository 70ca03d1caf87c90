//! The public entry points: `run()`, `convert()` and the `guide2pdf` binary.
//!
//! Only the missing-source path is exercised here; it stops before any
//! Python engine runs, so these tests never touch the host's pip.

use guide_html2pdf::{convert, run, ConversionConfig, Html2PdfError, OUTPUT_FILE, SOURCE_FILE};

#[test]
fn run_without_source_returns_false_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // The only test in this binary that depends on the working directory.
    std::env::set_current_dir(dir.path()).unwrap();

    assert!(!run());
    assert!(!dir.path().join(OUTPUT_FILE).exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn convert_reports_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join(SOURCE_FILE);
    let config = ConversionConfig::builder()
        .source(&source)
        .output(dir.path().join(OUTPUT_FILE))
        .build()
        .unwrap();

    match convert(&config) {
        Err(e @ Html2PdfError::SourceNotFound { .. }) => {
            assert!(e.to_string().ends_with("not found!"), "got: {e}");
        }
        other => panic!("expected SourceNotFound, got {other:?}"),
    }
    assert!(!dir.path().join(OUTPUT_FILE).exists());
}

#[cfg(feature = "cli")]
#[test]
fn binary_prints_error_and_exits_nonzero_without_source() {
    let dir = tempfile::tempdir().unwrap();
    let out = std::process::Command::new(env!("CARGO_BIN_EXE_guide2pdf"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stdout.contains(&format!("Error: {SOURCE_FILE} not found!")),
        "stdout: {stdout}"
    );
    assert!(!dir.path().join(OUTPUT_FILE).exists());
}
