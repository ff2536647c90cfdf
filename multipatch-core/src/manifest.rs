//! The per-repository tracking manifest
//!
//! Stored as YAML in the repository's git directory:
//!
//! ```yaml
//! remotes:
//!   - name: upstream
//!     uri: https://example.com/upstream.git
//! branches:
//!   - remote: upstream
//!     branch: master
//!   - branch: feature-x
//! ```
//!
//! A branch entry without `remote` is a local branch. It is logged but not
//! provisioned.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::git::BranchRef;
use crate::{Error, Result};

/// File name of the manifest inside the git directory
pub const MANIFEST_FILE: &str = "multipatch.yml";

/// A remote to provision
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteEntry {
    /// Name of the remote (e.g., "upstream")
    pub name: String,
    /// URL of the remote
    pub uri: String,
}

/// A branch to track
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BranchEntry {
    /// Remote the branch lives on, absent for local branches
    ///
    /// Older manifests call this key `origin`.
    #[serde(default, alias = "origin", skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Branch name on that remote
    pub branch: String,
}

impl BranchEntry {
    /// The ref this entry is logged as
    pub fn to_branch_ref(&self) -> BranchRef {
        match &self.remote {
            Some(remote) => BranchRef::remote(remote, &self.branch),
            None => BranchRef::local(&self.branch),
        }
    }
}

/// The loaded manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingManifest {
    /// Remotes in manifest order
    pub remotes: Vec<RemoteEntry>,
    /// Tracked branches in manifest order
    pub branches: Vec<BranchEntry>,
}

impl TrackingManifest {
    /// Path of the manifest inside a git directory
    pub fn path_in(git_dir: &Path) -> PathBuf {
        git_dir.join(MANIFEST_FILE)
    }

    /// Load the manifest from a git directory
    ///
    /// Fails with [`Error::ConfigNotFound`] if the file is absent.
    pub fn load(git_dir: &Path) -> Result<Self> {
        let path = Self::path_in(git_dir);
        if !path.exists() {
            return Err(Error::ConfigNotFound(path));
        }

        let contents = std::fs::read_to_string(&path)?;
        Self::parse(&contents).map_err(|error| Error::Manifest { path, error })
    }

    /// Parse manifest YAML
    ///
    /// An empty document is an empty manifest.
    pub fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// All manifest branches as refs to log, in manifest order
    pub fn branch_refs(&self) -> Vec<BranchRef> {
        self.branches.iter().map(BranchEntry::to_branch_ref).collect()
    }
}
