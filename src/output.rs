//! # Console Output
//!
//! Progress lines printed to stdout during a checkout run. They are meant
//! for humans reading CI logs, not for machines.
//!
//! ## Respecting User Preferences
//!
//! Warnings are highlighted when color is available. Color is disabled when:
//! - `NO_COLOR` is set (per https://no-color.org/)
//! - `CLICOLOR=0` is set
//! - `TERM=dumb` is set
//! - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)

use std::env;

use console::style;

use crate::release::{ReleaseIdentifier, ResolvedTarget, TagSet};
use crate::sync::SyncReport;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Detect color support from the environment.
    pub fn from_env() -> Self {
        Self {
            use_color: Self::detect_color_support(),
        }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
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

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Formats the progress lines of a run.
#[derive(Debug, Clone, Default)]
pub struct Printer {
    config: OutputConfig,
}

impl Printer {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn requested(&self, requested: &ReleaseIdentifier, from_arg: bool) -> String {
        if from_arg {
            format!("Target release from command line: '{}'", requested)
        } else {
            format!("No target release specified, using {}", requested)
        }
    }

    pub fn preparing(&self, requested: &ReleaseIdentifier) -> String {
        format!("Preparing targets for {}", requested)
    }

    pub fn fallback_warning(&self, requested: &str, authoritative: &[String; 2]) -> String {
        let label = if self.config.use_color {
            style("WARNING:").yellow().bold().force_styling(true).to_string()
        } else {
            "WARNING:".to_string()
        };
        format!(
            "{} Provided tag {} is not a valid tag for both {} and {}; using master instead",
            label, requested, authoritative[0], authoritative[1]
        )
    }

    pub fn available_tags(&self, name: &str, tags: &TagSet, count: usize) -> String {
        format!("Available {} tags: {:?}...", name, tags.preview(count))
    }

    pub fn using_tag(&self, target: &ResolvedTarget) -> String {
        format!("Using tag: {}", target)
    }

    pub fn report(&self, report: &SyncReport) -> String {
        format!(
            "Submodule {} now at {} (\"{}\" commit {} by {} @ {})",
            report.name,
            report.reference,
            report.commit.summary,
            report.commit.id,
            report.commit.author,
            report.commit.date()
        )
    }

    pub fn success(&self, target: &ResolvedTarget) -> String {
        let line = format!("Successfully checked out submodules to ref {}", target);
        if self.config.use_color {
            style(line).green().force_styling(true).to_string()
        } else {
            line
        }
    }
}
