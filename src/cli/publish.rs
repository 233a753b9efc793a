//! Publish command: build documentation and push it to the target branch.
//!
//! The caller's working tree, index, and checked-out branch are never
//! touched: the documentation tree is written straight to the object
//! database, committed with `git commit-tree`, and pushed by ref.

use crate::cli::build::generate_docs;
use crate::config::Config;
use crate::docs::DocsContext;
use crate::utils::git::{
    TreeBuilder, commit_root_tree, commit_tree, describe_source, fetch_branch, graft_tree,
    open_repo, probe_branch, push_commit, resolve_push_target, staged_paths,
};
use crate::utils::path::subdir_components;
use crate::utils::plural::plural_count;
use crate::{debug, log, logger};
use anyhow::{Context, Result, bail};

/// Result of a publish run.
#[derive(Debug)]
pub enum PublishOutcome {
    /// A new commit was pushed to the target branch.
    Pushed {
        commit: gix::ObjectId,
        files: usize,
    },
    /// The built tree matches the remote tree; nothing was pushed.
    UpToDate,
    /// Dry run: documentation was built and compared, nothing was pushed.
    DryRun { files: usize, orphan: bool },
}

/// Run the full publish pipeline.
pub fn publish_docs(config: &Config, dry_run: bool) -> Result<PublishOutcome> {
    let root = config.get_root();
    let repo = open_repo(root)?;

    // Guard: clean staging area (any ambiguity halts before the remote
    // branch is mutated)
    if !config.publish.force {
        let staged = staged_paths(root)?;
        if !staged.is_empty() {
            bail!(
                "Staging area is not clean ({}):\n{}\nCommit or unstage them first, or publish with --force",
                plural_count(staged.len(), "staged change"),
                staged
                    .iter()
                    .map(|p| format!("  {p}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
    }

    let remote = &config.publish.remote;
    let branch = &config.publish.branch;

    // Probe the remote branch; fetch its objects when it exists
    let tip = probe_branch(root, remote, branch)?;
    match &tip {
        Some(oid) => {
            debug!("publish"; "remote {remote}/{branch} at {oid}");
            fetch_branch(root, remote, branch)?;
        }
        None => log!("publish"; "remote branch `{branch}` not found, will create it"),
    }

    let source = describe_source(root)?;
    let ctx = DocsContext::new(config, &source);
    generate_docs(config, &ctx)?;

    // Build the documentation tree in the object database. The blob count
    // from the builder is what actually lands in the pushed tree.
    let mut builder = TreeBuilder::new(&repo);
    let doc_tree = builder.build_from_dir(&config.docs.output)?;
    let files = builder.file_count();

    let components = subdir_components(&config.publish.subdir)
        .with_context(|| format!("Unsafe subdir `{}`", config.publish.subdir))?;

    let base_tree = tip
        .as_ref()
        .map(|oid| commit_root_tree(&repo, *oid))
        .transpose()?;
    let root_tree = graft_tree(&repo, base_tree, &components, doc_tree)?;

    // Identical trees mean an identical publish; skip the push
    if base_tree == Some(root_tree) {
        logger::warn(&format!(
            "`{remote}/{branch}` is already up to date, nothing to push"
        ));
        return Ok(PublishOutcome::UpToDate);
    }

    if dry_run {
        log!("publish"; "dry run: would push {} to {}/{} ({})",
            plural_count(files, "file"), remote, branch,
            if tip.is_some() { "updating existing branch" } else { "new branch" });
        return Ok(PublishOutcome::DryRun {
            files,
            orphan: tip.is_none(),
        });
    }

    // Commit rooted at the remote tip, or an orphan for a new branch
    let message = ctx.expand(&config.publish.message);
    let commit = commit_tree(root, &root_tree, tip.as_ref(), &message)?;
    debug!("publish"; "created commit {commit}");

    let target = resolve_push_target(root, remote, config.publish.github.token_path.as_deref())?;
    push_commit(root, &target, &commit, branch, config.publish.force)?;

    log!("publish"; "pushed {} to {}/{} as {}",
        plural_count(files, "file"), remote, branch, &commit.to_string()[..7]);

    Ok(PublishOutcome::Pushed { commit, files })
}
