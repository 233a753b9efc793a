//! Docship - publish generated documentation to a git branch.

#![allow(dead_code)]

mod cli;
mod config;
mod docs;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    // Leaked so config and subcommands can hold a 'static reference
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(cli)?;

    match &cli.command {
        Commands::Init { dry, .. } => cli::init::init_project(&config, *dry),
        Commands::Build => cli::build::build_docs(&config).map(|_| ()),
        Commands::Publish { args } => cli::publish::publish_docs(&config, args.dry_run).map(|_| ()),
        Commands::Check => cli::check::check_setup(&config),
    }
}
