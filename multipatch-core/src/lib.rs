//! multipatch core - provisioning tracking branches and merging their logs
//!
//! A repository carries a small YAML manifest (`<git-dir>/multipatch.yml`)
//! naming remotes and the branches to follow. This crate creates those
//! remotes and non-checked-out tracking branches, and merges the histories
//! of many branches into one chronological log.

pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod manifest;
pub mod provision;
pub mod selection;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{Config, LogConfig};
pub use error::{Error, Result};
pub use git::{BranchRef, CommitDetail, CommitInfo, CommitSequence, FileChange, GitRepo};
pub use history::{stream_log, LogEntry, LogFormatter, LogMerger, LogOptions};
pub use manifest::{BranchEntry, RemoteEntry, TrackingManifest, MANIFEST_FILE};
pub use provision::{ProvisionOptions, ProvisionReport, Provisioner};
pub use selection::{filter_excluded, BranchSelector, SelectionMode};
