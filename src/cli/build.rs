//! Build command: run the documentation command without publishing.

use crate::config::Config;
use crate::docs::{
    DocsContext, clear_output_dir, count_output_files, run_docs_command, write_markers,
};
use crate::log;
use crate::utils::git::describe_source;
use crate::utils::plural::plural_count;
use anyhow::{Result, bail};

/// Build command entry point.
pub fn build_docs(config: &Config) -> Result<usize> {
    let source = describe_source(config.get_root())?;
    let ctx = DocsContext::new(config, &source);
    generate_docs(config, &ctx)
}

/// Generate documentation into the configured output directory.
///
/// Clears the output directory (unless disabled), runs the documentation
/// command, verifies it produced output, and writes GitHub Pages markers.
/// Returns the number of publishable files.
pub fn generate_docs(config: &Config, ctx: &DocsContext) -> Result<usize> {
    if config.docs.clean {
        clear_output_dir(config.get_root(), &config.docs.output)?;
    } else {
        std::fs::create_dir_all(&config.docs.output)?;
    }

    run_docs_command(config, ctx)?;

    let generated = count_output_files(&config.docs.output)?;
    if generated == 0 {
        bail!(
            "Documentation command produced no output in `{}`",
            config.docs.output.display()
        );
    }

    // Markers get published too, count them with the rest
    let files = generated + write_markers(&config.docs.output, &config.publish.github)?;

    log!("docs"; "generated {} in {}", plural_count(files, "file"),
        config.root_relative(&config.docs.output).display());

    Ok(files)
}
