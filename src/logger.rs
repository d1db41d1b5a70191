//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints when `--verbose` is set
//!
//! # Example
//!
//! ```ignore
//! log!("dotenv"; "wrote {} parameters", count);
//! debug!("insert-tag"; "unknown tag {{{}}} left as is", tag);
//! ```

use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
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

/// Log a message with a colored module prefix.
///
/// Errors and warnings go to stderr so command output on stdout stays
/// machine readable (`resolve --json`, `dot-env:get`).
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    if is_diagnostic(&module_lower) || is_verbose() {
        let mut out = stderr().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    } else {
        let mut out = stdout().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    }
}

#[inline]
fn is_diagnostic(module_lower: &str) -> bool {
    matches!(module_lower, "error" | "warning" | "hint")
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "resolve" => prefix.bright_blue().bold().to_string(),
        "dotenv" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "hint" => prefix.bright_cyan().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}
