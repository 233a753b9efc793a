//! Configuration management for `docship.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── docs       # [docs]
//! │   └── publish    # [publish], [publish.github]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # Config root (this file)
//! ```
//!
//! # Layering
//!
//! Values are resolved in three layers, later ones winning:
//! file (`docship.toml`) < `DOCSHIP_*` environment variables < CLI flags.
//! A config file is optional; an environment-only setup works the same.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{DocsConfig, GithubPagesConfig, PublishConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    log,
    utils::path::normalize_path,
};
use anyhow::{Result, bail};
use section::docs::shell_command;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docship.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Documentation generation settings
    pub docs: DocsConfig,

    /// Publish settings
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find the config
    /// file. A missing config file is not an error: the `DOCSHIP_*`
    /// environment variables alone can carry a full configuration.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        // Full validation (skip for init: no config file yet)
        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir()?;

        match &cli.command {
            Commands::Init { name: Some(name), .. } => {
                let path = cwd.join(name).join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            Commands::Init { name: None, .. } => {
                let path = cwd.join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            _ => match find_config_file(&cli.config) {
                Some(path) => Ok((path, true)),
                None => Ok((cwd.join(&cli.config), false)),
            },
        }
    }

    /// Finalize configuration after loading.
    ///
    /// Applies environment overrides, then CLI overrides, then normalizes
    /// all paths relative to the project root.
    fn finalize(&mut self, cli: &Cli) {
        let root = match &cli.command {
            Commands::Init { name: Some(name), .. } => {
                std::env::current_dir().unwrap_or_default().join(name)
            }
            _ => self
                .config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        self.apply_env_overrides(|name| std::env::var(name).ok());
        self.apply_command_options(cli);
        self.normalize_paths(&root);
    }

    /// Apply `DOCSHIP_*` environment variable overrides.
    ///
    /// The lookup is injected so tests can run without mutating the
    /// process environment.
    pub fn apply_env_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(line) = get("DOCSHIP_COMMAND")
            && !line.trim().is_empty()
        {
            self.docs.command = shell_command(&line);
        }
        if let Some(dir) = get("DOCSHIP_OUTPUT_DIR") {
            self.docs.output = PathBuf::from(dir);
        }
        if let Some(remote) = get("DOCSHIP_REMOTE") {
            self.publish.remote = remote;
        }
        if let Some(branch) = get("DOCSHIP_BRANCH") {
            self.publish.branch = branch;
        }
        if let Some(subdir) = get("DOCSHIP_SUBDIR") {
            self.publish.subdir = subdir;
        }
        if let Some(message) = get("DOCSHIP_MESSAGE") {
            self.publish.message = message;
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.docs.output, cli.output.as_ref());

        if let Commands::Publish { args } = &cli.command {
            Self::update_option(&mut self.publish.remote, args.remote.as_ref());
            Self::update_option(&mut self.publish.branch, args.branch.as_ref());
            Self::update_option(&mut self.publish.subdir, args.subdir.as_ref());
            Self::update_option(&mut self.publish.message, args.message.as_ref());
            Self::update_option(&mut self.publish.force, args.force.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize all paths relative to the root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.config_path = normalize_path(&self.config_path);
        self.docs.output = normalize_path(&root.join(&self.docs.output));

        if let Some(token_path) = self.publish.github.token_path.take() {
            self.publish.github.token_path = Some(Self::normalize_token_path(&token_path, &root));
        }

        self.root = root;
    }

    /// Normalize token path with tilde expansion.
    fn normalize_token_path(path: &Path, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned();
        let path = PathBuf::from(expanded);
        let full_path = if path.is_relative() {
            root.join(&path)
        } else {
            path
        };
        normalize_path(&full_path)
    }

    // ========================================================================
    // parsing
    // ========================================================================

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                bail!("Aborted due to unknown config fields");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        Ok(input == "y" || input == "yes")
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Get CLI arguments reference
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        let require_command = matches!(
            self.get_cli().command,
            Commands::Build | Commands::Publish { .. }
        );

        self.docs.validate(require_command, &mut diag);
        self.publish.validate(&mut diag);

        if self.docs.output == self.root {
            diag.error(
                DocsConfig::FIELDS.output,
                "output directory must not be the repository root",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// tests
// ============================================================================

/// Parse config from a TOML snippet, asserting no unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("[docs\ncommand = []");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.cli.is_none());
        assert_eq!(config.publish.remote, "origin");
        assert_eq!(config.publish.branch, "gh-pages");
        assert_eq!(config.docs.output, PathBuf::from("public"));
        assert!(config.docs.clean);
    }

    #[test]
    fn test_parse_sections() {
        let config = test_parse_config(
            r#"
[docs]
command = ["cargo", "doc", "--no-deps"]
output = "target/doc"

[publish]
branch = "pages"
subdir = "api"

[publish.github]
nojekyll = false
"#,
        );
        assert_eq!(config.docs.command, vec!["cargo", "doc", "--no-deps"]);
        assert_eq!(config.docs.output, PathBuf::from("target/doc"));
        assert_eq!(config.publish.branch, "pages");
        assert_eq!(config.publish.subdir, "api");
        assert!(!config.publish.github.nojekyll);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[docs]\ncommand = []\n[unknown_section]\nfield = \"value\"";
        let (_, ignored) = Config::parse_with_ignored(content).unwrap();
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = test_parse_config(
            r#"
[publish]
branch = "from-file"
"#,
        );
        config.apply_env_overrides(|name| match name {
            "DOCSHIP_BRANCH" => Some("from-env".to_string()),
            "DOCSHIP_COMMAND" => Some("make docs".to_string()),
            _ => None,
        });

        assert_eq!(config.publish.branch, "from-env");
        // Shell command lines are wrapped in the platform shell
        assert_eq!(config.docs.command.last().unwrap(), "make docs");
        // Untouched values keep their file/default layer
        assert_eq!(config.publish.remote, "origin");
    }

    #[test]
    fn test_cli_flags_override_env_and_file() {
        use clap::Parser;

        let cli = Cli::try_parse_from([
            "docship", "--output", "site", "publish", "--branch", "cli-branch", "--force",
        ])
        .unwrap();

        let mut config = test_parse_config(
            r#"
[publish]
branch = "from-file"
remote = "from-file"
"#,
        );
        config.apply_env_overrides(|name| match name {
            "DOCSHIP_BRANCH" => Some("from-env".to_string()),
            "DOCSHIP_REMOTE" => Some("from-env".to_string()),
            _ => None,
        });
        config.apply_command_options(&cli);

        // CLI wins over env and file
        assert_eq!(config.publish.branch, "cli-branch");
        assert!(config.publish.force);
        assert_eq!(config.docs.output, PathBuf::from("site"));
        // Env wins over file where no flag is given
        assert_eq!(config.publish.remote, "from-env");
    }

    #[test]
    fn test_env_blank_command_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|name| match name {
            "DOCSHIP_COMMAND" => Some("   ".to_string()),
            _ => None,
        });
        assert!(config.docs.command.is_empty());
    }
}
