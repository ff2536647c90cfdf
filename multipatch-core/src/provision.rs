//! Creating manifest remotes and tracking branches
//!
//! Changes are applied remote by remote, then branch by branch, in manifest
//! order. There is no rollback: when a step fails, everything before it
//! stays applied.

use std::collections::HashSet;

use crate::git::GitRepo;
use crate::manifest::TrackingManifest;
use crate::{Error, Result};

/// Branch that must be checked out before provisioning
const REQUIRED_BRANCH: &str = "master";

/// Options for a provisioning run
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    /// Fetch every manifest remote, even ones no branch refers to
    pub fetch_all: bool,
}

/// What a provisioning run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Remotes that did not exist before
    pub remotes_created: Vec<String>,
    /// Existing remotes whose URL was (re)set
    pub remotes_updated: Vec<String>,
    /// Remotes fetched, in fetch order
    pub fetched: Vec<String>,
    /// Local tracking branches created or moved
    pub branches_created: Vec<String>,
    /// Local-only manifest branches that were not provisioned
    pub skipped: Vec<String>,
}

/// Applies a [`TrackingManifest`] to a repository
///
/// Each remote is fetched at most once per provisioner.
pub struct Provisioner<'repo> {
    repo: &'repo GitRepo,
    options: ProvisionOptions,
    fetched: HashSet<String>,
    report: ProvisionReport,
}

impl<'repo> Provisioner<'repo> {
    pub fn new(repo: &'repo GitRepo, options: ProvisionOptions) -> Self {
        Self {
            repo,
            options,
            fetched: HashSet::new(),
            report: ProvisionReport::default(),
        }
    }

    /// Provision everything the manifest names
    pub fn run(mut self, manifest: &TrackingManifest) -> Result<ProvisionReport> {
        self.ensure_on_master()?;

        for remote in &manifest.remotes {
            if self.repo.ensure_remote(&remote.name, &remote.uri)? {
                self.report.remotes_created.push(remote.name.clone());
            } else {
                self.report.remotes_updated.push(remote.name.clone());
            }
        }

        if self.options.fetch_all {
            for remote in &manifest.remotes {
                self.fetch_once(&remote.name)?;
            }
        }

        for entry in &manifest.branches {
            let upstream = entry.to_branch_ref();
            let (Some(remote), Some(local_name)) =
                (upstream.remote_name(), upstream.tracking_branch_name())
            else {
                tracing::info!("{} is a local branch; not creating it", entry.branch);
                self.report.skipped.push(entry.branch.clone());
                continue;
            };

            tracing::info!("create branch {} tracking {}", local_name, upstream);
            self.fetch_once(remote)?;
            self.repo.create_tracking_branch(&local_name, &upstream)?;
            self.report.branches_created.push(local_name);
        }

        Ok(self.report)
    }

    /// Fetch a remote unless this provisioner already has
    ///
    /// Returns `true` if a fetch happened.
    pub fn fetch_once(&mut self, remote: &str) -> Result<bool> {
        if self.fetched.contains(remote) {
            tracing::debug!("{} already fetched", remote);
            return Ok(false);
        }

        tracing::info!("fetch {}", remote);
        self.repo.fetch(remote)?;
        self.fetched.insert(remote.to_string());
        self.report.fetched.push(remote.to_string());
        Ok(true)
    }

    /// Check out `master` if needed and make sure it is the active branch
    fn ensure_on_master(&self) -> Result<()> {
        let current = self.repo.current_branch()?;
        if current.as_deref() == Some(REQUIRED_BRANCH) {
            return Ok(());
        }

        let has_master = self
            .repo
            .list_local_branches()?
            .iter()
            .any(|b| b.branch_name() == REQUIRED_BRANCH);

        if has_master {
            tracing::info!("checking out {}", REQUIRED_BRANCH);
            self.repo.checkout_branch(REQUIRED_BRANCH).map_err(|e| {
                Error::RepositoryState(format!(
                    "repo could not switch to {}: {}",
                    REQUIRED_BRANCH, e
                ))
            })?;
        }

        match self.repo.current_branch()? {
            Some(branch) if branch == REQUIRED_BRANCH => Ok(()),
            other => Err(Error::RepositoryState(format!(
                "repo could not switch to {} (active branch: {})",
                REQUIRED_BRANCH,
                other.as_deref().unwrap_or("detached HEAD")
            ))),
        }
    }
}
