//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Docship documentation publisher CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to repository root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path (default: docship.toml)
    #[arg(short = 'C', long, global = true, default_value = "docship.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter docship.toml and ignore entries
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,

        /// Print the config template instead of writing files
        #[arg(long)]
        dry: bool,
    },

    /// Run the documentation command only
    #[command(visible_alias = "b")]
    Build,

    /// Build documentation and push it to the target branch
    #[command(visible_alias = "p")]
    Publish {
        #[command(flatten)]
        args: PublishArgs,
    },

    /// Verify git setup, configuration, and remote reachability
    #[command(visible_alias = "c")]
    Check,
}

/// Publish command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct PublishArgs {
    /// Remote name or URL to push to
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Target branch
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Path inside the branch to publish under
    #[arg(short, long)]
    pub subdir: Option<String>,

    /// Commit message template ($DOCSHIP_* variables are expanded)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Skip the staging-area guard and force push
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub force: Option<bool>,

    /// Build and report what would be published without committing or pushing
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build)
    }
    pub const fn is_publish(&self) -> bool {
        matches!(self.command, Commands::Publish { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
}
