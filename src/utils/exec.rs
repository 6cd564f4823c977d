//! External command execution utilities.
//!
//! Provides a Builder-based API for running external programs with captured
//! output and checked exit status.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! Cmd::new("convert")
//!     .arg(source)
//!     .args(["-strip"])
//!     .arg(dest)
//!     .run()?;
//! ```

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::OnceLock,
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    filter: Option<&'static FilterRule>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    #[cfg(test)]
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set output filter for logging.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Human-readable command line, for debug output.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and return output.
    ///
    /// A non-zero exit status is an error carrying the filtered stderr.
    pub fn run(self) -> Result<Output> {
        let filter = self.filter.unwrap_or(&EMPTY_FILTER);
        let program = Path::new(&self.program);
        let name = program
            .file_name()
            .unwrap_or(program.as_os_str())
            .to_string_lossy()
            .into_owned();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        log_output(&name, &output, filter)?;
        Ok(output)
    }
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for command output logging.
///
/// Used to reduce noise by skipping known warnings or irrelevant messages.
pub struct FilterRule {
    /// Prefixes to skip when logging output.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    /// Create a new filter rule.
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Log output lines that pass the filter.
    pub fn log(&self, name: &str, output: &str) {
        let lines: Vec<_> = output
            .lines()
            .filter(|line| {
                let plain = strip_ansi(line);
                let trimmed = plain.trim();
                !trimmed.is_empty() && !self.should_skip(trimmed)
            })
            .collect();

        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Silent filter (skip all output).
pub const SILENT_FILTER: FilterRule = FilterRule::new(&[""]);

// ============================================================================
// Helpers
// ============================================================================

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI regex"));
    re.replace_all(s, "")
}

/// Log command output, returning error on failure.
fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        anyhow::bail!(format_error(name, output, filter));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());
    Ok(())
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output, filter: &'static FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let error_msg = filter
        .skip_prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .fold(stderr.trim(), |s, p| s.trim_start_matches(p).trim_start());
    let error_msg = strip_ansi(error_msg);

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    if !error_msg.is_empty() {
        msg.push_str(&error_msg);
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("convert")
            .arg("in.png")
            .args(["-strip", "out.png"])
            .cwd("/tmp");

        assert_eq!(cmd.program, OsString::from("convert"));
        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.display(), "convert in.png -strip out.png");
    }

    #[test]
    fn test_empty_args_filtered() {
        let cmd = Cmd::new("echo").arg("").args(["a", "", "b"]);
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_filter_rule() {
        let filter = FilterRule::new(&["WARN:", "INFO:"]);
        assert!(filter.should_skip("WARN: something"));
        assert!(filter.should_skip("INFO: something"));
        assert!(!filter.should_skip("ERROR: something"));
        assert!(filter.should_skip(""));
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_ansi("Plain text"), "Plain text");
    }

    #[test]
    fn test_simple_command() {
        let output = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[test]
    fn test_failing_command_is_error() {
        let err = Cmd::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .filter(&SILENT_FILTER)
            .run()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("`sh` failed"));
        assert!(msg.contains("broken"));
    }

    #[test]
    fn test_missing_program_is_error() {
        let err = Cmd::new("definitely-not-a-real-program-xyz").run().unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }
}
