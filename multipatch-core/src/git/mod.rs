//! Git operations for multipatch
//!
//! This module wraps `git2` with the handful of repository operations the
//! provisioner and the log merger need: remotes, branches and commit walks.

mod branch;
mod commits;
mod repo;

pub use branch::BranchRef;
pub use commits::{CommitDetail, CommitInfo, CommitSequence, FileChange};
pub use repo::GitRepo;
