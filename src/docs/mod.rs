//! Documentation command execution.
//!
//! Wraps the user-configured documentation command: exports `DOCSHIP_*`
//! context variables into its environment, expands `$DOCSHIP_*` references
//! in its argv, manages the output directory, and writes GitHub Pages
//! marker files.

use crate::config::{Config, GithubPagesConfig};
use crate::utils::exec::{Cmd, EMPTY_FILTER, SILENT_FILTER};
use crate::utils::git::SourceInfo;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Context variables exported to the documentation command and usable in
/// argv and commit message templates.
#[derive(Debug, Clone)]
pub struct DocsContext {
    vars: Vec<(String, String)>,
}

impl DocsContext {
    pub fn new(config: &Config, source: &SourceInfo) -> Self {
        let vars = vec![
            ("DOCSHIP_ROOT".to_string(), config.root.display().to_string()),
            (
                "DOCSHIP_OUTPUT_DIR".to_string(),
                config.docs.output.display().to_string(),
            ),
            ("DOCSHIP_REMOTE".to_string(), config.publish.remote.clone()),
            ("DOCSHIP_BRANCH".to_string(), config.publish.branch.clone()),
            ("DOCSHIP_SOURCE".to_string(), source.commit.clone()),
            (
                "DOCSHIP_SOURCE_BRANCH".to_string(),
                source.branch.clone(),
            ),
        ];
        Self { vars }
    }

    /// Iterate over (name, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand `$DOCSHIP_*` references in a template string.
    ///
    /// Unknown variables are left untouched so shell constructs survive
    /// into `sh -c` command lines.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name: &str| {
            self.vars
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
        .into_owned()
    }
}

/// Run the documentation command with context variables in its environment.
///
/// Aborts with the command's failure output on a non-zero exit.
pub fn run_docs_command(config: &Config, ctx: &DocsContext) -> Result<()> {
    if config.docs.command.is_empty() {
        bail!("No documentation command configured");
    }

    let argv: Vec<String> = config
        .docs
        .command
        .iter()
        .map(|arg| ctx.expand(arg))
        .collect();

    log!("docs"; "running `{}`", argv.join(" "));

    let filter = if config.docs.quiet {
        &SILENT_FILTER
    } else {
        &EMPTY_FILTER
    };

    Cmd::from_slice(&argv)
        .cwd(config.get_root())
        .envs(ctx.iter())
        .pty(!config.docs.quiet)
        .filter(filter)
        .run()
        .context("Documentation command failed")?;

    Ok(())
}

/// Clear and recreate the output directory.
///
/// Refuses to clear unsafe targets: the repository root itself, or a
/// directory that holds a `.git` entry.
pub fn clear_output_dir(root: &Path, output: &Path) -> Result<()> {
    if output == root {
        bail!(
            "Refusing to clear output directory `{}`: it is the repository root",
            output.display()
        );
    }
    if output.join(".git").exists() {
        bail!(
            "Refusing to clear output directory `{}`: it contains a .git entry",
            output.display()
        );
    }

    if output.exists() {
        debug!("docs"; "clearing {}", output.display());
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear `{}`", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory `{}`", output.display()))?;
    Ok(())
}

/// Count publishable files in the output directory (nested `.git` skipped).
pub fn count_output_files(output: &Path) -> Result<usize> {
    fn walk(dir: &Path) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_name() == ".git" {
                continue;
            }
            let metadata = fs::symlink_metadata(&path)?;
            if metadata.is_dir() {
                count += walk(&path)?;
            } else {
                count += 1;
            }
        }
        Ok(count)
    }

    if !output.exists() {
        return Ok(0);
    }
    walk(output)
}

/// Write GitHub Pages marker files into the output directory.
///
/// Returns the number of files written.
pub fn write_markers(output: &Path, github: &GithubPagesConfig) -> Result<usize> {
    let mut written = 0;

    if github.nojekyll {
        fs::write(output.join(".nojekyll"), "")?;
        written += 1;
    }

    if let Some(cname) = &github.cname
        && !cname.trim().is_empty()
    {
        fs::write(output.join("CNAME"), format!("{}\n", cname.trim()))?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::git::SourceInfo;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_context() -> DocsContext {
        DocsContext {
            vars: vec![
                ("DOCSHIP_SOURCE".to_string(), "abc1234".to_string()),
                ("DOCSHIP_BRANCH".to_string(), "gh-pages".to_string()),
            ],
        }
    }

    #[test]
    fn test_expand_known_vars() {
        let ctx = test_context();
        assert_eq!(
            ctx.expand("docs: publish from $DOCSHIP_SOURCE"),
            "docs: publish from abc1234"
        );
        assert_eq!(
            ctx.expand("${DOCSHIP_BRANCH}/$DOCSHIP_SOURCE"),
            "gh-pages/abc1234"
        );
    }

    #[test]
    fn test_expand_leaves_unknown_vars() {
        let ctx = test_context();
        assert_eq!(ctx.expand("echo $HOME"), "echo $HOME");
        assert_eq!(ctx.expand("no vars here"), "no vars here");
    }

    #[test]
    fn test_context_from_config() {
        let mut config = Config::default();
        config.root = PathBuf::from("/repo");
        config.docs.output = PathBuf::from("/repo/public");

        let source = SourceInfo {
            commit: "f00dcafe".to_string(),
            branch: "main".to_string(),
        };
        let ctx = DocsContext::new(&config, &source);

        let vars: Vec<_> = ctx.iter().collect();
        assert!(vars.contains(&("DOCSHIP_ROOT", "/repo")));
        assert!(vars.contains(&("DOCSHIP_SOURCE", "f00dcafe")));
        assert!(vars.contains(&("DOCSHIP_SOURCE_BRANCH", "main")));
    }

    #[test]
    fn test_clear_output_dir_refuses_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        assert!(clear_output_dir(root, root).is_err());
    }

    #[test]
    fn test_clear_output_dir_refuses_git_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("public");
        fs::create_dir_all(out.join(".git")).unwrap();
        assert!(clear_output_dir(temp.path(), &out).is_err());
    }

    #[test]
    fn test_clear_output_dir_recreates() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("public");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "old").unwrap();

        clear_output_dir(temp.path(), &out).unwrap();
        assert!(out.exists());
        assert_eq!(count_output_files(&out).unwrap(), 0);
    }

    #[test]
    fn test_count_output_files() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("public");
        fs::create_dir_all(out.join("api")).unwrap();
        fs::create_dir_all(out.join(".git")).unwrap();
        fs::write(out.join("index.html"), "x").unwrap();
        fs::write(out.join("api/doc.html"), "y").unwrap();
        fs::write(out.join(".git/HEAD"), "ref").unwrap();

        assert_eq!(count_output_files(&out).unwrap(), 2);
        assert_eq!(count_output_files(&temp.path().join("missing")).unwrap(), 0);
    }

    #[test]
    fn test_write_markers() {
        let temp = TempDir::new().unwrap();
        let github = GithubPagesConfig {
            nojekyll: true,
            cname: Some("docs.example.com".to_string()),
            token_path: None,
        };

        let written = write_markers(temp.path(), &github).unwrap();
        assert_eq!(written, 2);
        assert!(temp.path().join(".nojekyll").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("CNAME")).unwrap(),
            "docs.example.com\n"
        );
    }

    #[test]
    fn test_write_markers_disabled() {
        let temp = TempDir::new().unwrap();
        let github = GithubPagesConfig {
            nojekyll: false,
            cname: None,
            token_path: None,
        };
        assert_eq!(write_markers(temp.path(), &github).unwrap(), 0);
        assert!(!temp.path().join(".nojekyll").exists());
    }
}
