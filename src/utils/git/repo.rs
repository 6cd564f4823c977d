use super::tree::{TreeIndex, diff_indexes};
use anyhow::{Context, Result, anyhow};
use gix::Repository;
use std::path::{Path, PathBuf};

/// Paths changed by a single commit.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Full hex id of the commit.
    pub commit: String,
    /// Working tree root the paths are relative to.
    pub root: PathBuf,
    /// Repository-relative paths, sorted.
    pub paths: Vec<String>,
}

/// Open the repository containing `dir`, searching upward.
pub fn open_repo(dir: &Path) -> Result<Repository> {
    gix::discover(dir).with_context(|| format!("No git repository at `{}`", dir.display()))
}

/// Get the working tree root of a non-bare repository.
fn get_repo_root(repo: &Repository) -> Result<PathBuf> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Repository has no working tree"))
}

/// List the paths changed by the commit `reference` points to.
///
/// Changes are taken against the first parent. A root commit has no parent and
/// reports no changes.
pub fn changed_in_ref(repo: &Repository, reference: &str) -> Result<ChangeSet> {
    let root = get_repo_root(repo)?;

    let commit = repo
        .rev_parse_single(reference)
        .with_context(|| format!("Cannot resolve `{reference}`"))?
        .object()?
        .try_into_commit()?;
    let commit_id = commit.id.to_string();

    let Some(parent_id) = commit.parent_ids().next() else {
        return Ok(ChangeSet {
            commit: commit_id,
            root,
            paths: Vec::new(),
        });
    };

    let new = TreeIndex::from_tree(&commit.tree()?)?;
    let old = TreeIndex::from_tree(&parent_id.object()?.try_into_commit()?.tree()?)?;

    Ok(ChangeSet {
        commit: commit_id,
        root,
        paths: diff_indexes(&old, &new),
    })
}
