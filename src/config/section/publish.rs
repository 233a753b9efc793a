//! `[publish]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [publish]
//! remote = "origin"       # remote name or URL
//! branch = "gh-pages"     # target branch
//! subdir = ""             # optional path inside the branch
//! force = false           # skip staging guard + force push
//! message = "docs: publish from $DOCSHIP_SOURCE"
//!
//! [publish.github]
//! nojekyll = true         # write .nojekyll marker
//! # cname = "docs.example.com"
//! # token_path = "~/.github-token"
//! ```

use crate::config::ConfigDiagnostics;
use crate::utils::path::subdir_components;
use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Publish settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "publish")]
pub struct PublishConfig {
    /// Remote name or URL to push to.
    #[config(default = "origin")]
    pub remote: String,

    /// Target branch (pushed by ref, never checked out locally).
    #[config(default = "gh-pages")]
    pub branch: String,

    /// Optional path inside the branch to publish under. Sibling entries
    /// outside this path are preserved.
    #[config(default = "")]
    pub subdir: String,

    /// Skip the staging-area guard and force push.
    pub force: bool,

    /// Commit message template; $DOCSHIP_* variables are expanded.
    #[config(default = "docs: publish from $DOCSHIP_SOURCE")]
    pub message: String,

    /// GitHub Pages settings.
    #[config(sub)]
    pub github: GithubPagesConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "gh-pages".to_string(),
            subdir: String::new(),
            force: false,
            message: "docs: publish from $DOCSHIP_SOURCE".to_string(),
            github: GithubPagesConfig::default(),
        }
    }
}

impl PublishConfig {
    /// Validate publish configuration.
    ///
    /// # Checks
    /// - `remote`, `branch`, and `message` must not be empty.
    /// - `subdir` must be a safe relative path (no `..`, not absolute).
    /// - If `github.token_path` is set, it must exist and be a file.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.remote.trim().is_empty() {
            diag.error(Self::FIELDS.remote, "remote must not be empty");
        }
        if self.branch.trim().is_empty() {
            diag.error(Self::FIELDS.branch, "branch must not be empty");
        }
        if self.message.trim().is_empty() {
            diag.error(Self::FIELDS.message, "commit message must not be empty");
        }

        if subdir_components(&self.subdir).is_none() {
            diag.error_with_hint(
                Self::FIELDS.subdir,
                format!("`{}` is not a safe branch-relative path", self.subdir),
                "use a relative path without `..` components",
            );
        }

        if let Some(path) = &self.github.token_path {
            if !path.exists() {
                diag.error(
                    GithubPagesConfig::FIELDS.token_path,
                    format!("token file not found: {}", path.display()),
                );
            } else if !path.is_file() {
                diag.error(
                    GithubPagesConfig::FIELDS.token_path,
                    format!("token path is not a file: {}", path.display()),
                );
            }
        }
    }
}

/// GitHub Pages publishing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "publish.github")]
pub struct GithubPagesConfig {
    /// Write a `.nojekyll` marker so Pages serves files starting with `_`.
    #[config(default = "true")]
    pub nojekyll: bool,

    /// Contents of a `CNAME` file (custom domain).
    pub cname: Option<String>,

    /// Path to a file containing a GitHub access token, used for HTTPS
    /// pushes in CI.
    ///
    /// # Security
    /// - Store outside the repository (e.g. `~/.github-token`)
    /// - Never commit tokens to version control!
    pub token_path: Option<PathBuf>,
}

impl Default for GithubPagesConfig {
    fn default() -> Self {
        Self {
            nojekyll: true,
            cname: None,
            token_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let publish = PublishConfig::default();
        assert_eq!(publish.remote, "origin");
        assert_eq!(publish.branch, "gh-pages");
        assert!(publish.subdir.is_empty());
        assert!(!publish.force);
        assert!(publish.github.nojekyll);
    }

    #[test]
    fn test_validate_rejects_empty_branch() {
        let publish = PublishConfig {
            branch: String::new(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        publish.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_rejects_unsafe_subdir() {
        let publish = PublishConfig {
            subdir: "../escape".to_string(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        publish.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_validate_missing_token_file() {
        let publish = PublishConfig {
            github: GithubPagesConfig {
                token_path: Some(PathBuf::from("/nonexistent/token")),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        publish.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_template_contains_defaults() {
        let template = PublishConfig::template_with_header();
        assert!(template.contains("[publish]"));
        assert!(template.contains("remote = \"origin\""));
        assert!(template.contains("branch = \"gh-pages\""));
        assert!(template.contains("[publish.github]"));
        assert!(template.contains("# cname"));
        // The sub-section comment comes from the section struct alone,
        // not doubled with the field doc
        assert_eq!(template.matches("GitHub Pages").count(), 1);
    }
}
