use anyhow::Result;
use gix::{ObjectId, Tree};
use std::collections::BTreeMap;

/// Flattened view of a git tree: every non-tree entry by full path.
pub struct TreeIndex {
    entries: BTreeMap<String, ObjectId>,
}

impl TreeIndex {
    /// Recursively record all blobs (and submodule links) reachable from `tree`.
    pub fn from_tree(tree: &Tree<'_>) -> Result<Self> {
        let entries = tree
            .traverse()
            .breadthfirst
            .files()?
            .into_iter()
            .filter(|entry| !entry.mode.is_tree())
            .map(|entry| (entry.filepath.to_string(), entry.oid))
            .collect();
        Ok(Self { entries })
    }
}

/// Paths added, removed or modified between two trees, in path order.
pub fn diff_indexes(old: &TreeIndex, new: &TreeIndex) -> Vec<String> {
    let mut changed: Vec<String> = new
        .entries
        .iter()
        .filter(|(path, oid)| old.entries.get(*path) != Some(*oid))
        .map(|(path, _)| path.clone())
        .collect();

    changed.extend(
        old.entries
            .keys()
            .filter(|path| !new.entries.contains_key(*path))
            .cloned(),
    );
    changed.sort();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use gix::hash::Kind;

    fn index(entries: &[(&str, ObjectId)]) -> TreeIndex {
        TreeIndex {
            entries: entries
                .iter()
                .map(|(path, oid)| ((*path).to_string(), *oid))
                .collect(),
        }
    }

    #[test]
    fn test_diff_indexes() {
        let a = ObjectId::null(Kind::Sha1);
        let b = ObjectId::empty_blob(Kind::Sha1);

        let old = index(&[("same.png", a), ("edited.jpg", a), ("gone.png", a)]);
        let new = index(&[("same.png", a), ("edited.jpg", b), ("added.png", b)]);

        assert_eq!(
            diff_indexes(&old, &new),
            vec!["added.png", "edited.jpg", "gone.png"]
        );
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let a = ObjectId::null(Kind::Sha1);
        let old = index(&[("x/y.png", a)]);
        let new = index(&[("x/y.png", a)]);
        assert!(diff_indexes(&old, &new).is_empty());
    }
}
