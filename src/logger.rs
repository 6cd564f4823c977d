//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only shows with `--verbose`
//! - `ProgressLine` for a single-line counter kept below the log output
//!
//! # Example
//!
//! ```ignore
//! log!("source"; "{} images changed in {}", count, sha);
//!
//! let progress = ProgressLine::new("optimize", &[("images", 12)]);
//! progress.inc("images");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress line count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        // Progress line sits on the current row without a newline
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "source" => prefix.bright_blue().bold().to_string(),
        "done" => prefix.bright_green().bold().to_string(),
        "error" | "failed" => prefix.bright_red().bold().to_string(),
        "skip" => prefix.dimmed().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with named counters
///
/// Displays: `[optimize] images(3/12)`
///
/// The line is redrawn in place after every `inc`, and `log` clears it before
/// printing so messages scroll above it. Call `finish` to keep the final
/// counts on screen.
pub struct ProgressLine {
    prefix: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display.
    ///
    /// Only includes counters with total > 0.
    pub fn new(prefix: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters: Vec<_> = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        BAR_COUNT.store(1, Ordering::SeqCst);

        let progress = Self {
            prefix,
            counters,
            lock: Mutex::new(()),
        };
        progress.display(false);
        progress
    }

    /// Increment the counter with the given name and redraw.
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            if self.lock.try_lock().is_some() {
                self.display(false);
            }
        }
    }

    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn display(&self, newline: bool) {
        let line = self.render();
        let prefix = colorize_prefix(self.prefix, &self.prefix.to_ascii_lowercase());

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        if newline {
            writeln!(stdout, "{prefix} {line}").ok();
        } else {
            write!(stdout, "{prefix} {line}").ok();
        }
        stdout.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.display(true);
        }
        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        // Clear the line on drop (if not finished properly)
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}
