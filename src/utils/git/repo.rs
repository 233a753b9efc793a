//! Repository discovery and plumbing wrappers.

use crate::utils::exec::Cmd;
use anyhow::{Context, Result, bail};
use gix::Repository;
use std::path::Path;

/// Open the git repository enclosing `path`.
pub fn open_repo(path: &Path) -> Result<Repository> {
    gix::discover(path)
        .with_context(|| format!("`{}` is not inside a git repository", path.display()))
}

/// List paths with staged (index) changes.
///
/// Parses `git status --porcelain`: the first status column is the index
/// side, so anything other than ` ` or `?` means the staging area is dirty.
pub fn staged_paths(root: &Path) -> Result<Vec<String>> {
    let output = Cmd::new("git")
        .args(["status", "--porcelain"])
        .cwd(root)
        .run()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_staged(&stdout))
}

fn parse_staged(porcelain: &str) -> Vec<String> {
    porcelain
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let index_status = chars.next()?;
            if index_status == ' ' || index_status == '?' {
                return None;
            }
            // Skip the worktree status column and the separator space
            let path = line.get(3..)?;
            // Renames and copies are reported as `old -> new`
            let path = path.rsplit(" -> ").next()?;
            Some(unquote_path(path))
        })
        .collect()
}

/// Strip git's C-style quoting from paths with special characters.
fn unquote_path(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Where the published documentation was generated from.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Short hash of `HEAD`, or `worktree` when the repo has no commits.
    pub commit: String,
    /// Current branch name, or `HEAD` when detached.
    pub branch: String,
}

/// Describe the currently checked-out source revision.
pub fn describe_source(root: &Path) -> Result<SourceInfo> {
    let commit = rev_parse(root, &["--short", "HEAD"])?.unwrap_or_else(|| "worktree".to_string());
    let branch = rev_parse(root, &["--abbrev-ref", "HEAD"])?.unwrap_or_else(|| "HEAD".to_string());
    Ok(SourceInfo { commit, branch })
}

/// Run `git rev-parse` returning `None` on failure (e.g. unborn HEAD).
fn rev_parse(root: &Path, args: &[&str]) -> Result<Option<String>> {
    let output = Cmd::new("git")
        .arg("rev-parse")
        .args(args.iter().copied())
        .cwd(root)
        .run_unchecked()?;

    if !output.status.success() {
        return Ok(None);
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

/// Create a commit object for `tree` with `git commit-tree`.
///
/// Returns the new commit's object id. The commit is dangling until pushed;
/// no local ref is updated.
pub fn commit_tree(
    root: &Path,
    tree: &gix::ObjectId,
    parent: Option<&gix::ObjectId>,
    message: &str,
) -> Result<gix::ObjectId> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }

    let mut cmd = Cmd::new("git")
        .args(["commit-tree", &tree.to_string()])
        .cwd(root);
    if let Some(parent) = parent {
        cmd = cmd.args(["-p", &parent.to_string()]);
    }
    let output = cmd.args(["-m", message]).run()?;

    let hex = String::from_utf8_lossy(&output.stdout).trim().to_string();
    gix::ObjectId::from_hex(hex.as_bytes())
        .with_context(|| format!("`git commit-tree` returned unexpected output: {hex}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(root: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(root)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {:?} failed", args);
    }

    fn init_repo(root: &Path) {
        git(root, &["init", "-q", "-b", "main"]);
        git(root, &["config", "user.name", "test"]);
        git(root, &["config", "user.email", "test@example.com"]);
    }

    #[test]
    fn test_parse_staged() {
        let porcelain = "M  src/lib.rs\n A staged-nope.rs\n?? untracked.rs\nA  new.rs\n";
        let staged = parse_staged(porcelain);
        assert_eq!(staged, vec!["src/lib.rs", "new.rs"]);
    }

    #[test]
    fn test_parse_staged_renames_and_quoting() {
        let porcelain = concat!(
            "R  old.rs -> new.rs\n",
            "A  \"tab\\there.md\"\n",
            "R  \"a \\\"b\\\".md\" -> \"c \\\"d\\\".md\"\n",
        );
        let staged = parse_staged(porcelain);
        assert_eq!(staged, vec!["new.rs", "tab\there.md", "c \"d\".md"]);
    }

    #[test]
    fn test_staged_paths_clean_and_dirty() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        init_repo(root);

        assert!(staged_paths(root).unwrap().is_empty());

        fs::write(root.join("doc.md"), "hello").unwrap();
        // Untracked files do not count as staged
        assert!(staged_paths(root).unwrap().is_empty());

        git(root, &["add", "doc.md"]);
        assert_eq!(staged_paths(root).unwrap(), vec!["doc.md"]);
    }

    #[test]
    fn test_describe_source_unborn() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        init_repo(root);

        let source = describe_source(root).unwrap();
        assert_eq!(source.commit, "worktree");
        assert_eq!(source.branch, "main");
    }

    #[test]
    fn test_describe_source_with_commit() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        init_repo(root);
        fs::write(root.join("a.txt"), "a").unwrap();
        git(root, &["add", "a.txt"]);
        git(root, &["commit", "-q", "-m", "initial"]);

        let source = describe_source(root).unwrap();
        assert_ne!(source.commit, "worktree");
        assert_eq!(source.branch, "main");
    }

    #[test]
    fn test_commit_tree_orphan_and_child() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        init_repo(root);
        fs::write(root.join("a.txt"), "a").unwrap();
        git(root, &["add", "a.txt"]);
        git(root, &["commit", "-q", "-m", "initial"]);

        let repo = open_repo(root).unwrap();
        let head = repo.head_id().unwrap().detach();
        let tree = repo
            .find_object(head)
            .unwrap()
            .try_into_commit()
            .unwrap()
            .tree_id()
            .unwrap()
            .detach();

        let orphan = commit_tree(root, &tree, None, "docs: publish").unwrap();
        let child = commit_tree(root, &tree, Some(&orphan), "docs: publish again").unwrap();
        assert_ne!(orphan, child);

        // Verify parent linkage through git plumbing
        let out = std::process::Command::new("git")
            .args(["rev-parse", &format!("{child}^")])
            .current_dir(root)
            .output()
            .unwrap();
        let parent = String::from_utf8_lossy(&out.stdout).trim().to_string();
        assert_eq!(parent, orphan.to_string());
    }

    #[test]
    fn test_commit_tree_rejects_empty_message() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        let oid = gix::ObjectId::null(gix::hash::Kind::Sha1);
        assert!(commit_tree(temp.path(), &oid, None, "   ").is_err());
    }
}
