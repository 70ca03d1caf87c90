//! # pip-auto
//!
//! Probe for importable Python modules and install the missing ones with
//! `pip`, so that tools driving Python-backed renderers (WeasyPrint, pdfkit,
//! …) do not need a manual `pip install` step before first use.
//!
//! ## How it works
//!
//! 1. [`PythonEnv::locate`] picks an interpreter: `PIP_AUTO_PYTHON` if set,
//!    otherwise the first of `python3` / `python` that answers `--version`.
//! 2. [`PythonEnv::has_module`] runs `python -c "import <module>"`.
//! 3. [`PythonEnv::install`] runs `python -m pip install <package>`.
//!
//! Callers chain the probe and the install themselves and probe again
//! afterwards: a package can install cleanly and still fail to import.
//!
//! Every call blocks until the child process exits. There is no timeout:
//! a hung `pip` hangs the caller.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pip_auto::PythonEnv;
//!
//! let python = PythonEnv::locate();
//! if !python.has_module("weasyprint")? {
//!     python.install("weasyprint")?;
//! }
//! python.run_module("weasyprint", &["in.html", "out.pdf"])?;
//! # Ok::<(), pip_auto::PipAutoError>(())
//! ```
//!
//! ## Environment variable overrides
//!
//! - `PIP_AUTO_PYTHON` — path or name of the interpreter to use; skips
//!   discovery.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use thiserror::Error;
use tracing::{debug, info, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable that overrides interpreter discovery.
pub const PYTHON_ENV_VAR: &str = "PIP_AUTO_PYTHON";

/// Interpreter names tried in order by [`PythonEnv::locate`].
#[cfg(not(windows))]
pub const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];
#[cfg(windows)]
pub const INTERPRETER_CANDIDATES: &[&str] = &["python", "python3"];

/// Maximum number of trailing stderr characters kept in an error.
const STDERR_TAIL_CHARS: usize = 2000;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by pip-auto operations.
#[derive(Error, Debug)]
pub enum PipAutoError {
    /// A package or module name failed validation and was never passed to a
    /// subprocess.
    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    /// The interpreter could not be started at all.
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `pip install` ran and exited unsuccessfully.
    #[error("pip install {package} failed ({}): {stderr}", exit_label(.code))]
    InstallFailed {
        package: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A module or script run by the interpreter exited unsuccessfully.
    #[error("{what} failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        what: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Captured output of a successful interpreter run.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

// ── Name validation ──────────────────────────────────────────────────────────

/// Validates a pip distribution name (`weasyprint`, `python-dateutil`, …).
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted and the first
/// character must be alphanumeric, so a name can never be read as a pip
/// option.
pub fn validate_package_name(name: &str) -> Result<(), PipAutoError> {
    let ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(PipAutoError::InvalidName {
            kind: "package",
            name: name.to_string(),
        })
    }
}

/// Validates a dotted Python module path (`weasyprint`, `os.path`, …).
pub fn validate_module_name(name: &str) -> Result<(), PipAutoError> {
    let segment_ok = |seg: &str| {
        let mut chars = seg.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    if !name.is_empty() && name.split('.').all(segment_ok) {
        Ok(())
    } else {
        Err(PipAutoError::InvalidName {
            kind: "module",
            name: name.to_string(),
        })
    }
}

// ── Interpreter handle ───────────────────────────────────────────────────────

/// A Python interpreter used to probe, install and run modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonEnv {
    interpreter: PathBuf,
}

impl PythonEnv {
    /// Uses an explicit interpreter path or name. Nothing is checked until
    /// the first call.
    pub fn from_interpreter(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Finds an interpreter.
    ///
    /// - `PIP_AUTO_PYTHON`, when set and non-empty, is used as-is.
    /// - Otherwise the first entry of [`INTERPRETER_CANDIDATES`] that runs
    ///   `--version` successfully.
    /// - If none runs, the first candidate is returned anyway; later calls
    ///   then fail with [`PipAutoError::Launch`].
    pub fn locate() -> Self {
        if let Ok(p) = std::env::var(PYTHON_ENV_VAR) {
            if !p.trim().is_empty() {
                debug!("Using interpreter from {PYTHON_ENV_VAR}: {p}");
                return Self::from_interpreter(p);
            }
        }

        for candidate in INTERPRETER_CANDIDATES {
            let env = Self::from_interpreter(candidate);
            if env.is_runnable() {
                debug!("Located Python interpreter: {candidate}");
                return env;
            }
        }

        warn!(
            "No Python interpreter answered --version (tried {:?})",
            INTERPRETER_CANDIDATES
        );
        Self::from_interpreter(INTERPRETER_CANDIDATES[0])
    }

    /// The interpreter this handle launches.
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Returns `true` if `python --version` exits successfully.
    pub fn is_runnable(&self) -> bool {
        self.command()
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Returns whether `import <module>` succeeds.
    ///
    /// `Err` only when the name is invalid or the interpreter cannot be
    /// started; an import error is `Ok(false)`.
    pub fn has_module(&self, module: &str) -> Result<bool, PipAutoError> {
        validate_module_name(module)?;
        let status = self
            .command()
            .arg("-c")
            .arg(format!("import {module}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.launch_error(e))?;
        debug!("Probe import {module}: {}", status.success());
        Ok(status.success())
    }

    /// Installs `package` with `python -m pip install <package>`.
    ///
    /// This mutates the host Python environment and cannot be rolled back.
    pub fn install(&self, package: &str) -> Result<(), PipAutoError> {
        validate_package_name(package)?;
        warn!(
            "Installing Python package '{package}' into {}",
            self.interpreter.display()
        );

        let output = self
            .command()
            .args(["-m", "pip", "install", package])
            .output()
            .map_err(|e| self.launch_error(e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("pip install {package} stdout:\n{stdout}");

        if !output.status.success() {
            return Err(PipAutoError::InstallFailed {
                package: package.to_string(),
                code: output.status.code(),
                stderr: stderr_tail(&output),
            });
        }

        info!("Installed Python package '{package}'");
        Ok(())
    }

    /// Runs `python -m <module> <args…>` and captures its output.
    pub fn run_module<I, S>(&self, module: &str, args: I) -> Result<CommandOutput, PipAutoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        validate_module_name(module)?;
        let output = self
            .command()
            .arg("-m")
            .arg(module)
            .args(args)
            .output()
            .map_err(|e| self.launch_error(e))?;
        finish(format!("python -m {module}"), output)
    }

    /// Runs `python -c <script> <args…>` and captures its output.
    ///
    /// The script reads its arguments from `sys.argv[1:]`.
    pub fn run_script<I, S>(
        &self,
        label: &str,
        script: &str,
        args: I,
    ) -> Result<CommandOutput, PipAutoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self
            .command()
            .arg("-c")
            .arg(script)
            .args(args)
            .output()
            .map_err(|e| self.launch_error(e))?;
        finish(label.to_string(), output)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn launch_error(&self, source: io::Error) -> PipAutoError {
        PipAutoError::Launch {
            program: self.interpreter.clone(),
            source,
        }
    }
}

impl Default for PythonEnv {
    fn default() -> Self {
        Self::locate()
    }
}

fn finish(what: String, output: Output) -> Result<CommandOutput, PipAutoError> {
    if !output.status.success() {
        return Err(PipAutoError::CommandFailed {
            what,
            code: output.status.code(),
            stderr: stderr_tail(&output),
        });
    }
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Last [`STDERR_TAIL_CHARS`] characters of stderr, trimmed. pip puts the
/// useful line at the end.
fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    trimmed
        .chars()
        .skip(count.saturating_sub(STDERR_TAIL_CHARS))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
