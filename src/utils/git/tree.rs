//! Git tree construction from the documentation output directory.
//!
//! Blobs and trees are written straight to the repository's object database.
//! No index file is involved, so the caller's staging area stays untouched.

use anyhow::{Context, Result, anyhow};
use gix::{
    Repository,
    bstr::BString,
    objs::{Tree, tree},
};
use std::{fs, path::Path};

/// Builder for constructing git trees from a directory snapshot.
pub struct TreeBuilder<'a> {
    repo: &'a Repository,
    files: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo, files: 0 }
    }

    /// Number of blobs written so far.
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// Build a git tree from a directory and write it to the object database.
    ///
    /// Recursively traverses the directory, creating blobs for files and
    /// trees for subdirectories. Symlinks are stored as link entries. A
    /// nested `.git` directory is skipped.
    pub fn build_from_dir(&mut self, dir: &Path) -> Result<gix::ObjectId> {
        let tree = self.collect_dir(dir)?;
        Ok(self.repo.write_object(&tree)?.detach())
    }

    fn collect_dir(&mut self, dir: &Path) -> Result<Tree> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let filename = filename_of(&entry)?;

            if filename == ".git" {
                continue;
            }

            let metadata = fs::symlink_metadata(&path)?;
            if metadata.is_dir() {
                let sub_tree = self.collect_dir(&path)?;
                let oid = self.repo.write_object(&sub_tree)?.detach();
                entries.push(tree::Entry {
                    mode: tree::EntryKind::Tree.into(),
                    oid,
                    filename,
                });
            } else if metadata.is_symlink() {
                let target = fs::read_link(&path)?;
                let oid = self
                    .repo
                    .write_blob(target.to_string_lossy().as_bytes())?
                    .into();
                self.files += 1;
                entries.push(tree::Entry {
                    mode: tree::EntryKind::Link.into(),
                    oid,
                    filename,
                });
            } else {
                let contents = fs::read(&path)
                    .with_context(|| format!("Failed to read `{}`", path.display()))?;
                let oid = self.repo.write_blob(contents)?.into();
                self.files += 1;
                entries.push(tree::Entry {
                    mode: blob_mode(&metadata),
                    oid,
                    filename,
                });
            }
        }

        sort_tree_entries(&mut entries);
        Ok(Tree { entries })
    }
}

/// Get filename as BString.
fn filename_of(entry: &fs::DirEntry) -> Result<BString> {
    entry
        .file_name()
        .into_string()
        .map(Into::into)
        .map_err(|_| anyhow!("Invalid UTF-8 in filename"))
}

/// Blob entry mode, preserving the executable bit on unix.
#[cfg(unix)]
fn blob_mode(metadata: &fs::Metadata) -> tree::EntryMode {
    use std::os::unix::fs::PermissionsExt;
    if metadata.permissions().mode() & 0o111 != 0 {
        tree::EntryKind::BlobExecutable.into()
    } else {
        tree::EntryKind::Blob.into()
    }
}

#[cfg(not(unix))]
fn blob_mode(_metadata: &fs::Metadata) -> tree::EntryMode {
    tree::EntryKind::Blob.into()
}

/// Sort entries according to git tree ordering.
///
/// Git sorts tree entries by name but treats directories as if they end
/// with a slash: `foo-bar` (file) sorts before `foo` (directory).
fn sort_tree_entries(entries: &mut [tree::Entry]) {
    entries.sort_by_cached_key(|e| {
        let mut key = e.filename.as_slice().to_vec();
        if e.mode.is_tree() {
            key.push(b'/');
        }
        key
    });
}

/// Graft `subtree` at `components` inside `base`, preserving siblings.
///
/// With empty `components` the subtree itself is returned. When `base` is
/// `None` (orphan publish) missing intermediate levels become fresh trees.
/// Returns the object id of the new root tree.
pub fn graft_tree(
    repo: &Repository,
    base: Option<gix::ObjectId>,
    components: &[String],
    subtree: gix::ObjectId,
) -> Result<gix::ObjectId> {
    let Some((first, rest)) = components.split_first() else {
        return Ok(subtree);
    };

    let mut entries = match base {
        Some(oid) => read_tree_entries(repo, oid)?,
        None => Vec::new(),
    };

    // Recurse into the existing child tree at this level, if any
    let child_base = entries
        .iter()
        .find(|e| e.filename == first.as_str() && e.mode.is_tree())
        .map(|e| e.oid);

    let child = graft_tree(repo, child_base, rest, subtree)?;

    entries.retain(|e| e.filename != first.as_str());
    entries.push(tree::Entry {
        mode: tree::EntryKind::Tree.into(),
        oid: child,
        filename: first.as_str().into(),
    });
    sort_tree_entries(&mut entries);

    Ok(repo.write_object(&Tree { entries })?.detach())
}

/// Read a tree object into owned entries.
fn read_tree_entries(repo: &Repository, oid: gix::ObjectId) -> Result<Vec<tree::Entry>> {
    let object = repo
        .find_object(oid)
        .with_context(|| format!("Tree object `{oid}` not found"))?;
    let tree = object
        .try_into_tree()
        .map_err(|_| anyhow!("Object `{oid}` is not a tree"))?;

    let tree_ref = tree.decode()?;
    Ok(tree_ref
        .entries
        .iter()
        .map(|e| tree::Entry {
            mode: e.mode,
            oid: e.oid.to_owned(),
            filename: e.filename.to_owned(),
        })
        .collect())
}

/// Get the root tree id of a commit.
pub fn commit_root_tree(repo: &Repository, commit: gix::ObjectId) -> Result<gix::ObjectId> {
    Ok(repo
        .find_object(commit)
        .with_context(|| format!("Commit object `{commit}` not found"))?
        .try_into_commit()
        .map_err(|_| anyhow!("Object `{commit}` is not a commit"))?
        .tree_id()?
        .detach())
}
