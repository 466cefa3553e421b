//! External command execution utilities.
//!
//! Runs the documentation tooling and relays its output through the logger,
//! dropping known noise.

use crate::log;
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
};

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// `cmd` is the program followed by any fixed leading arguments.
///
/// # Errors
/// Returns error if command fails to execute or returns non-zero exit code.
pub fn exec(root: Option<&Path>, cmd: &[String], args: &[OsString]) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output)?;
    Ok(output)
}

/// Prepare a Command from components.
fn prepare(root: Option<&Path>, cmd: &[String], args: &[OsString]) -> Result<(String, Command)> {
    let (program, leading) = cmd.split_first().context("Empty command")?;

    let mut command = Command::new(program);
    command.args(leading).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((program.clone(), command))
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for tool output noise.
///
/// Matches lines that start with a prefix AND contain all required keywords.
struct FilterRule {
    /// Line must start with one of these (case-insensitive, after trim).
    starts_with: &'static [&'static str],
    /// Line must also contain ALL of these keywords (case-insensitive).
    contains: &'static [&'static str],
}

impl FilterRule {
    const fn new(starts_with: &'static [&'static str], contains: &'static [&'static str]) -> Self {
        Self { starts_with, contains }
    }

    fn matches(&self, line: &str) -> bool {
        let lower = line.trim().to_ascii_lowercase();
        let has_prefix = self.starts_with.is_empty()
            || self.starts_with.iter().any(|p| lower.starts_with(p));
        let has_keywords = self.contains.iter().all(|kw| lower.contains(kw));
        has_prefix && has_keywords
    }
}

/// Output filter configuration.
struct OutputFilter {
    /// Lines matching any rule are filtered out.
    line_rules: &'static [FilterRule],
}

impl OutputFilter {
    // Docker pull progress:
    //   a1b2c3d4e5f6: Pulling fs layer
    //   a1b2c3d4e5f6: Download complete
    const STDOUT: Self = Self {
        line_rules: &[
            FilterRule::new(&[], &[": pulling fs layer"]),
            FilterRule::new(&[], &[": waiting"]),
            FilterRule::new(&[], &[": verifying checksum"]),
            FilterRule::new(&[], &[": download complete"]),
            FilterRule::new(&[], &[": pull complete"]),
        ],
    };

    // npx banner:
    //   npm WARN exec The following package was not found and will be installed
    const STDERR: Self = Self {
        line_rules: &[
            FilterRule::new(&["npm warn"], &[]),
            FilterRule::new(&["npm notice"], &[]),
        ],
    };

    /// Check if a line should be filtered.
    fn should_filter_line(&self, line: &str) -> bool {
        self.line_rules.iter().any(|r| r.matches(line))
    }

    /// Log non-filtered lines.
    fn log(&self, name: &str, output: &str) {
        for line in output.lines() {
            if !line.trim().is_empty() && !self.should_filter_line(line) {
                log!(name; "{line}");
            }
        }
    }

    /// Extract error message, skipping filtered lines at start.
    fn extract_error<'a>(&self, stderr: &'a str) -> &'a str {
        stderr
            .lines()
            .find(|line| !line.trim().is_empty() && !self.should_filter_line(line))
            .map(|first| {
                let offset = first.as_ptr() as usize - stderr.as_ptr() as usize;
                &stderr[offset..]
            })
            .unwrap_or(stderr)
            .trim()
    }
}

/// Log command output, filtering known noise.
fn log_output(name: &str, output: &Output) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let error_msg = OutputFilter::STDERR.extract_error(stderr.trim());
        if error_msg.is_empty() {
            anyhow::bail!("Command `{name}` failed with {}", output.status);
        }
        anyhow::bail!("Command `{name}` failed with {}\n{error_msg}", output.status);
    }

    OutputFilter::STDOUT.log(name, stdout.trim());
    OutputFilter::STDERR.log(name, stderr.trim());

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_empty() {
        assert!(prepare(None, &[], &[]).is_err());
    }

    #[test]
    fn test_prepare_splits_leading_args() {
        let cmd = vec!["npx".to_string(), "@techdocs/cli".to_string()];
        let (name, command) = prepare(None, &cmd, &[OsString::from("generate")]).unwrap();

        assert_eq!(name, "npx");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["@techdocs/cli", "generate"]);
    }

    #[test]
    fn test_filter_rule_docker_progress() {
        let f = &OutputFilter::STDOUT;
        assert!(f.should_filter_line("a1b2c3d4e5f6: Pulling fs layer"));
        assert!(f.should_filter_line("a1b2c3d4e5f6: Pull complete"));
        assert!(!f.should_filter_line("INFO    -  Documentation built in 0.42 seconds"));
    }

    #[test]
    fn test_extract_error_skips_npm_noise() {
        let stderr = "npm WARN exec missing package\nError: Could not find mkdocs.yml\n  at generate";
        assert_eq!(
            OutputFilter::STDERR.extract_error(stderr),
            "Error: Could not find mkdocs.yml\n  at generate"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_success_and_failure() {
        let sh = vec!["sh".to_string()];
        let ok = exec(None, &sh, &[OsString::from("-c"), OsString::from("echo built")]).unwrap();
        assert!(ok.status.success());

        let script = OsString::from("echo 'Error: bucket missing' >&2; exit 3");
        let err = exec(None, &sh, &[OsString::from("-c"), script]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Command `sh` failed"));
        assert!(msg.contains("Error: bucket missing"));
    }
}
