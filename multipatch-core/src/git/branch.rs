//! Branch references and tracking branch management

use std::fmt;

use git2::BranchType;

use super::repo::GitRepo;
use crate::Result;

/// A line of history to log: a remote-tracking branch or a local branch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchRef {
    remote: Option<String>,
    branch: String,
}

impl BranchRef {
    /// A branch on a remote, e.g. `origin/master`
    pub fn remote(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: Some(remote.into()),
            branch: branch.into(),
        }
    }

    /// A local-only branch
    pub fn local(branch: impl Into<String>) -> Self {
        Self {
            remote: None,
            branch: branch.into(),
        }
    }

    /// Name of the remote, `None` for local branches
    pub fn remote_name(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// Name of the branch, without any remote prefix
    pub fn branch_name(&self) -> &str {
        &self.branch
    }

    /// Display label, `origin/master` or `feature-x`
    pub fn label(&self) -> String {
        match &self.remote {
            Some(remote) => format!("{}/{}", remote, self.branch),
            None => self.branch.clone(),
        }
    }

    /// Full reference name to start a commit walk from
    pub fn refname(&self) -> String {
        match &self.remote {
            Some(remote) => format!("refs/remotes/{}/{}", remote, self.branch),
            None => format!("refs/heads/{}", self.branch),
        }
    }

    /// Name matched by exclusion patterns: `remote/branch`, or `/branch`
    /// for local branches
    pub fn composite_name(&self) -> String {
        format!("{}/{}", self.remote.as_deref().unwrap_or(""), self.branch)
    }

    /// Name of the local branch that tracks this remote branch
    /// (`origin.master` for `origin/master`)
    pub fn tracking_branch_name(&self) -> Option<String> {
        self.remote
            .as_ref()
            .map(|remote| format!("{}.{}", remote, self.branch))
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl GitRepo {
    /// List all local branches, sorted by name
    pub fn list_local_branches(&self) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();

        for branch in self.inner().branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name().ok().flatten() {
                branches.push(BranchRef::local(name));
            }
        }

        branches.sort_by(|a, b| a.branch_name().cmp(b.branch_name()));
        Ok(branches)
    }

    /// List all remote-tracking branches, sorted by remote then branch
    ///
    /// Symbolic `<remote>/HEAD` entries are skipped. Branches whose name does
    /// not start with a configured remote are ignored.
    pub fn list_remote_branches(&self) -> Result<Vec<BranchRef>> {
        let remotes = self.remote_names()?;
        let mut branches = Vec::new();

        for branch in self.inner().branches(Some(BranchType::Remote))? {
            let (branch, _) = branch?;
            if branch.get().kind() == Some(git2::ReferenceType::Symbolic) {
                continue;
            }
            let Some(name) = branch.name().ok().flatten() else {
                continue;
            };

            // Longest remote prefix wins, remote names may contain '/'
            let split = remotes
                .iter()
                .filter_map(|remote| {
                    name.strip_prefix(remote.as_str())
                        .and_then(|rest| rest.strip_prefix('/'))
                        .map(|rest| (remote, rest))
                })
                .max_by_key(|(remote, _)| remote.len());

            match split {
                Some((_, "HEAD")) => {}
                Some((remote, rest)) => branches.push(BranchRef::remote(remote.as_str(), rest)),
                None => tracing::debug!("skipping {}: no matching remote", name),
            }
        }

        branches.sort_by(|a, b| {
            (a.remote_name(), a.branch_name()).cmp(&(b.remote_name(), b.branch_name()))
        });
        Ok(branches)
    }

    /// Create a local branch that tracks a remote branch, without checking it out
    ///
    /// The local branch is created at the remote branch's current commit. An
    /// existing local branch of the same name is moved there.
    pub fn create_tracking_branch(&self, local_name: &str, upstream: &BranchRef) -> Result<()> {
        let upstream_name = upstream.label();
        let remote_branch = self.inner().find_branch(&upstream_name, BranchType::Remote)?;
        let commit = remote_branch.get().peel_to_commit()?;

        let mut local = self.inner().branch(local_name, &commit, true)?;
        local.set_upstream(Some(upstream_name.as_str()))?;

        Ok(())
    }

    /// Upstream of a local branch, as `remote/branch`
    pub fn upstream_of(&self, local_name: &str) -> Result<Option<String>> {
        let local = self.inner().find_branch(local_name, BranchType::Local)?;
        let upstream = match local.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let name = upstream.name()?.map(String::from);
        Ok(name)
    }
}
