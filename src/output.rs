//! # Output Configuration
//!
//! Controls how the run summary looks: emoji markers on capable terminals,
//! plain-text markers elsewhere.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deployctl::output::{OutputConfig, summary_lines};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! for line in summary_lines(&config, &summary) {
//!     println!("{}", line);
//! }
//! ```

use std::env;

use crate::pipeline::RunSummary;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Human-readable summary of a finished run.
pub fn summary_lines(config: &OutputConfig, summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();

    let failures = summary.failures();
    if !failures.is_empty() {
        for (app, reason) in &failures {
            lines.push(format!("{} {}: {}", emoji(config, "❌", "[FAIL]"), app, reason));
        }
        return lines;
    }

    let built = summary.built();
    if built.is_empty() {
        lines.push(
            "No projects were built (no version changes or no matching projects found)"
                .to_string(),
        );
    } else {
        lines.push(format!("Successfully built projects: {}", built.join(", ")));
    }
    lines.push(format!(
        "{} All operations completed successfully",
        emoji(config, "✅", "[OK]")
    ));
    lines
}
