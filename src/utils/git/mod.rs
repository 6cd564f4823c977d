//! Read-only git queries.
//!
//! Resolves a ref to its commit and lists the paths that commit changed,
//! the equivalent of `git diff-tree -r --name-only --no-commit-id <sha>`.

mod repo;
mod tree;

pub use repo::{ChangeSet, changed_in_ref, open_repo};
