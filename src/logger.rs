//! Logging utilities with colored output and GitHub workflow annotations.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `annotate` for surfacing notices and failures in the Actions UI
//!
//! # Example
//!
//! ```ignore
//! log!("publish"; "uploading {}", key);
//! annotate(Annotation::Notice, "Ignoring docs/readme.md: file isn't a yaml type");
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{terminal::size, tty::IsTty};
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width, `None` when stdout is not a terminal.
static TERMINAL_WIDTH: OnceLock<Option<u16>> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Calculate total prefix length for a module name.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Terminal width when attached to a tty. CI runners log to a pipe,
/// where lines must never be cut.
fn get_terminal_width() -> Option<u16> {
    *TERMINAL_WIDTH.get_or_init(|| {
        if stdout().is_tty() {
            Some(size().map(|(w, _)| w).unwrap_or(120))
        } else {
            None
        }
    })
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
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

/// Log a message with a colored module prefix.
///
/// Long messages are truncated to the terminal width when interactive.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let message = match get_terminal_width() {
        Some(width) => {
            let max_msg_len = (width as usize).saturating_sub(calc_prefix_len(module.len()));
            truncate_str(message, max_msg_len)
        }
        None => message,
    };

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "generate" => prefix.bright_blue().bold(),
        "publish" => prefix.bright_green().bold(),
        "skip" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Workflow Annotations
// ============================================================================

/// Severity of a GitHub workflow command annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Notice,
    Warning,
    Error,
}

impl Annotation {
    const fn command(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Whether the process runs inside a GitHub Actions job.
fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Emit `::level::message` so the runner attaches it to the job summary.
///
/// No-op outside of GitHub Actions.
pub fn annotate(level: Annotation, message: &str) {
    if !in_github_actions() {
        return;
    }
    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", format_annotation(level, message)).ok();
    stdout.flush().ok();
}

fn format_annotation(level: Annotation, message: &str) -> String {
    format!("::{}::{}", level.command(), escape_data(message))
}

/// Escape workflow command data (`%`, `\r`, `\n`).
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len() {
        // "publish" -> "[publish] " = 7 + 2 + 1 = 10
        assert_eq!(calc_prefix_len(7), 10);
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "你" is 3 bytes, cutting at 4 must back off to 3
        assert_eq!(truncate_str("你好", 4), "你");
        assert_eq!(truncate_str("a你b", 3), "a");
    }

    #[test]
    fn test_format_annotation_levels() {
        assert_eq!(format_annotation(Annotation::Notice, "ok"), "::notice::ok");
        assert_eq!(format_annotation(Annotation::Warning, "hm"), "::warning::hm");
        assert_eq!(format_annotation(Annotation::Error, "bad"), "::error::bad");
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100%"), "100%25");
        assert_eq!(escape_data("line1\nline2\r"), "line1%0Aline2%0D");
        assert_eq!(escape_data("plain"), "plain");
    }
}
