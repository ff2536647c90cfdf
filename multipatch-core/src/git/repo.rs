//! Git repository detection and remote operations

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{FetchOptions, RemoteCallbacks, Repository};

use crate::{Error, Result};

/// A git repository wrapper providing multipatch-specific operations
pub struct GitRepo {
    /// The underlying git2 repository
    repo: Repository,
    /// Path to the repository root (the git directory for bare repositories)
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// This will search upward from the given path to find the repository root.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::RepositoryState(format!("not a git repository: {}", path.display()))
            } else {
                Error::Git(e)
            }
        })?;

        let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the git control directory, where the tracking manifest lives
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Get the current branch name
    ///
    /// Returns `None` for a detached HEAD. An unborn HEAD reports the branch
    /// it will create.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Ok(self.unborn_head_target()?.and_then(|target| {
                    target.strip_prefix("refs/heads/").map(String::from)
                }));
            }
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// The refname HEAD points at if HEAD is unborn
    pub(crate) fn unborn_head_target(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                Ok(head.symbolic_target().map(String::from))
            }
            _ => Ok(None),
        }
    }

    /// Check out an existing local branch
    ///
    /// Uses a safe checkout, so local modifications that would be
    /// overwritten make this fail rather than being discarded.
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", name);
        let target = self.repo.revparse_single(&refname)?;

        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_tree(&target, Some(&mut checkout))?;
        self.repo.set_head(&refname)?;

        Ok(())
    }

    /// Get the configured URL of a remote, if the remote exists
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Make sure a remote exists with the given URL
    ///
    /// Returns `true` if the remote had to be created.
    pub fn ensure_remote(&self, name: &str, url: &str) -> Result<bool> {
        match self.repo.find_remote(name) {
            Ok(_) => {
                tracing::info!("{} exists; set url to {}", name, url);
                self.repo.remote_set_url(name, url)?;
                Ok(false)
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                tracing::info!("create remote {}; set url to {}", name, url);
                self.repo.remote(name, url)?;
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List the names of all configured remotes
    pub fn remote_names(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes.iter().flatten().map(String::from).collect())
    }

    /// Fetch all configured refspecs of a remote
    pub fn fetch(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name)?;

        // Progress is not reported
        let mut callbacks = RemoteCallbacks::new();
        callbacks.transfer_progress(|_| true);

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        remote.fetch(&[] as &[&str], Some(&mut fetch_options), None)?;

        Ok(())
    }

    /// Get access to the underlying git2 repository
    pub fn inner(&self) -> &Repository {
        &self.repo
    }
}
