//! `[docs]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [docs]
//! command = ["cargo", "doc", "--no-deps"]  # documentation command
//! output = "public"                        # output directory
//! clean = true                             # wipe output dir before generating
//! quiet = false                            # suppress command output
//! ```

use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Documentation generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "docs")]
pub struct DocsConfig {
    /// Documentation command argv; $DOCSHIP_* variables are expanded
    /// in each argument.
    #[config(default = "[\"cargo\", \"doc\", \"--no-deps\"]")]
    pub command: Vec<String>,

    /// Output directory, relative to the repository root.
    #[config(default = "public")]
    pub output: PathBuf,

    /// Wipe the output directory before running the command.
    #[config(default = "true")]
    pub clean: bool,

    /// Suppress documentation command output.
    pub quiet: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            output: PathBuf::from("public"),
            clean: true,
            quiet: false,
        }
    }
}

impl DocsConfig {
    /// Validate docs configuration.
    ///
    /// # Checks
    /// - When `require_command` (build/publish), a command must be configured.
    /// - Command argv entries must not be empty strings.
    pub fn validate(&self, require_command: bool, diag: &mut ConfigDiagnostics) {
        if require_command && self.command.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.command,
                "no documentation command configured",
                "set `command` in [docs] or the DOCSHIP_COMMAND environment variable",
            );
        }

        if self.command.iter().any(String::is_empty) {
            diag.error(Self::FIELDS.command, "command contains empty arguments");
        }
    }
}

/// Wrap a shell command line in the platform shell's argv.
///
/// Used for `DOCSHIP_COMMAND`, which is a single shell line rather than
/// an argv array.
pub fn shell_command(line: &str) -> Vec<String> {
    #[cfg(unix)]
    {
        vec!["sh".to_string(), "-c".to_string(), line.to_string()]
    }
    #[cfg(windows)]
    {
        vec!["cmd".to_string(), "/C".to_string(), line.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let docs = DocsConfig::default();
        assert!(docs.command.is_empty());
        assert_eq!(docs.output, PathBuf::from("public"));
        assert!(docs.clean);
        assert!(!docs.quiet);
    }

    #[test]
    fn test_missing_command_is_error_when_required() {
        let docs = DocsConfig::default();

        let mut diag = ConfigDiagnostics::new();
        docs.validate(true, &mut diag);
        assert!(diag.has_errors());

        let mut diag = ConfigDiagnostics::new();
        docs.validate(false, &mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(DocsConfig::FIELDS.command.as_str(), "docs.command");
        assert_eq!(DocsConfig::FIELDS.output.as_str(), "docs.output");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_command() {
        assert_eq!(
            shell_command("make docs"),
            vec!["sh", "-c", "make docs"]
        );
    }
}
