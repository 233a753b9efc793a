//! Git operations for documentation publishing.
//!
//! Object construction (blobs, trees) goes through gix and writes straight
//! to the object database, so the caller's index and working tree are never
//! touched. History and network operations (`ls-remote`, `fetch`,
//! `commit-tree`, `push`) shell out to the `git` binary.

mod remote;
mod repo;
mod tree;

pub use remote::{fetch_branch, probe_branch, push_commit, resolve_push_target};
pub use repo::{SourceInfo, commit_tree, describe_source, open_repo, staged_paths};
pub use tree::{TreeBuilder, commit_root_tree, graft_tree};
