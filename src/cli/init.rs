//! Project initialization.
//!
//! Writes a commented starter `docship.toml` and adds the output
//! directory to the ignore files.

use crate::config::{Config, DocsConfig, PublishConfig};
use crate::log;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "docship.toml";

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Generate docship.toml content with comments
pub fn generate_config_template() -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Docship configuration file (v{})\n",
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str("# https://github.com/docship-rs/docship\n\n");

    out.push_str(&DocsConfig::template_with_header());
    out.push('\n');
    out.push_str(&PublishConfig::template_with_header());

    out
}

/// Initialize a project: write docship.toml and ignore entries.
///
/// If `dry_run` is true, only prints the config template to stdout.
pub fn init_project(config: &Config, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", generate_config_template());
        return Ok(());
    }

    let root = config.get_root();
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;

    let path = root.join(CONFIG_FILE);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }
    fs::write(&path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    let output_dir = config.root_relative(&config.docs.output);
    write_ignore_files(root, &output_dir)?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

/// Write .gitignore and .ignore files with the output directory pattern
///
/// Existing ignore files are left untouched.
pub fn write_ignore_files(root: &Path, output_dir: &Path) -> Result<()> {
    let output_pattern = Path::new("/").join(output_dir);
    let content = format!("{}/\n", output_pattern.to_string_lossy());

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        // Only create if doesn't exist (don't overwrite user's ignore files)
        if !path.exists() {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_template() {
        let template = generate_config_template();
        assert!(template.contains("[docs]"));
        assert!(template.contains("[publish]"));
        assert!(template.contains("[publish.github]"));
        assert!(template.contains("output = \"public\""));

        // The template must parse back as a valid config
        let parsed = crate::config::test_parse_config(&template);
        assert_eq!(parsed.publish.branch, "gh-pages");
        assert_eq!(parsed.docs.command, vec!["cargo", "doc", "--no-deps"]);
    }

    #[test]
    fn test_write_ignore_files() {
        let temp = TempDir::new().unwrap();
        write_ignore_files(temp.path(), Path::new("public")).unwrap();

        let gitignore = temp.path().join(".gitignore");
        assert!(gitignore.exists());

        let content = fs::read_to_string(&gitignore).unwrap();
        assert!(content.contains("/public/"));
    }

    #[test]
    fn test_ignore_files_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let gitignore = temp.path().join(".gitignore");
        fs::write(&gitignore, "custom content").unwrap();

        write_ignore_files(temp.path(), Path::new("public")).unwrap();

        let content = fs::read_to_string(&gitignore).unwrap();
        assert_eq!(content, "custom content");
    }
}
