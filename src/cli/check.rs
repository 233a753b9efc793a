//! Check command: read-only preflight for the publish pipeline.
//!
//! Verifies the local git setup, the configuration, and remote
//! reachability without building or pushing anything.

use crate::config::Config;
use crate::log;
use crate::utils::exec::Cmd;
use crate::utils::git::{open_repo, probe_branch, staged_paths};
use crate::utils::plural::plural_count;
use anyhow::{Result, bail};
use owo_colors::OwoColorize;

/// One preflight check result.
struct Check {
    label: String,
    detail: String,
    ok: bool,
}

impl Check {
    fn pass(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { label: label.into(), detail: detail.into(), ok: true }
    }

    fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { label: label.into(), detail: detail.into(), ok: false }
    }

    fn print(&self) {
        let mark = if self.ok {
            "✓".bright_green().to_string()
        } else {
            "✗".bright_red().to_string()
        };
        println!("  {mark} {}: {}", self.label, self.detail);
    }
}

/// Run all preflight checks and report them. Fails when any check fails.
pub fn check_setup(config: &Config) -> Result<()> {
    log!("check"; "verifying publish setup");

    let mut checks = vec![check_git_binary()];

    // The remaining checks need a repository to look at
    let repo_ok = check_repository(config, &mut checks);
    checks.push(check_docs_command(config));

    if repo_ok {
        checks.push(check_identity(config));
        checks.push(check_remote_branch(config));
    }

    let failed = checks.iter().filter(|c| !c.ok).count();
    for check in &checks {
        check.print();
    }

    if failed > 0 {
        bail!("{} failed", plural_count(failed, "check"));
    }
    log!("check"; "all checks passed");
    Ok(())
}

fn check_git_binary() -> Check {
    match which::which("git") {
        Ok(path) => Check::pass("git binary", path.display().to_string()),
        Err(_) => Check::fail("git binary", "not found on PATH"),
    }
}

/// Repository discovery and staging-area checks. Returns whether the
/// repository was found, so remote checks can be skipped when it wasn't.
fn check_repository(config: &Config, checks: &mut Vec<Check>) -> bool {
    let root = config.get_root();
    match open_repo(root) {
        Ok(_) => {
            checks.push(Check::pass("repository", root.display().to_string()));
            match staged_paths(root) {
                Ok(staged) if staged.is_empty() => {
                    checks.push(Check::pass("staging area", "clean"));
                }
                Ok(staged) => {
                    checks.push(Check::fail(
                        "staging area",
                        format!("{} (publish would abort)", plural_count(staged.len(), "staged change")),
                    ));
                }
                Err(err) => checks.push(Check::fail("staging area", err.to_string())),
            }
            true
        }
        Err(_) => {
            checks.push(Check::fail(
                "repository",
                format!("`{}` is not inside a git repository", root.display()),
            ));
            false
        }
    }
}

fn check_docs_command(config: &Config) -> Check {
    let command = &config.docs.command;
    let Some(program) = command.first() else {
        return Check::fail("docs command", "not configured");
    };
    match which::which(program) {
        Ok(_) => Check::pass("docs command", format!("`{}`", command.join(" "))),
        Err(_) => Check::fail("docs command", format!("`{program}` not found on PATH")),
    }
}

/// Commits need a committer identity, `git commit-tree` included.
fn check_identity(config: &Config) -> Check {
    let output = Cmd::new("git")
        .args(["config", "user.email"])
        .cwd(config.get_root())
        .run_unchecked();

    match output {
        Ok(out) if out.status.success() => {
            let email = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if email.is_empty() {
                Check::fail("committer identity", "user.email is empty")
            } else {
                Check::pass("committer identity", email)
            }
        }
        _ => Check::fail("committer identity", "user.email is not set"),
    }
}

fn check_remote_branch(config: &Config) -> Check {
    let remote = &config.publish.remote;
    let branch = &config.publish.branch;
    match probe_branch(config.get_root(), remote, branch) {
        Ok(Some(oid)) => Check::pass(
            "remote branch",
            format!("{remote}/{branch} at {}", &oid.to_string()[..7]),
        ),
        Ok(None) => Check::pass(
            "remote branch",
            format!("{remote}/{branch} does not exist yet (publish will create it)"),
        ),
        Err(err) => Check::fail("remote branch", err.to_string()),
    }
}
