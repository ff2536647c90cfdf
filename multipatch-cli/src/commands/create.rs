//! Create command - provision manifest remotes and tracking branches

use std::path::PathBuf;

use clap::Args;
use multipatch_core::{GitRepo, ProvisionOptions, Provisioner, TrackingManifest};

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Repository to provision
    pub root: PathBuf,

    /// Fetch every manifest remote, not only those a branch refers to
    #[arg(long)]
    pub fetch: bool,
}

impl CreateArgs {
    /// Execute the create command
    pub fn execute(&self) -> anyhow::Result<()> {
        let repo = GitRepo::open(&self.root)?;
        let manifest = TrackingManifest::load(repo.git_dir())?;

        tracing::debug!(
            root = %repo.root().display(),
            remotes = manifest.remotes.len(),
            branches = manifest.branches.len(),
            "Manifest loaded"
        );

        let options = ProvisionOptions {
            fetch_all: self.fetch,
        };
        let report = Provisioner::new(&repo, options).run(&manifest)?;

        for name in &report.remotes_created {
            println!("created remote  {}", name);
        }
        for name in &report.remotes_updated {
            println!("updated remote  {}", name);
        }
        for name in &report.fetched {
            println!("fetched         {}", name);
        }
        for name in &report.branches_created {
            println!("tracking branch {}", name);
        }
        for name in &report.skipped {
            println!("skipped local   {}", name);
        }

        Ok(())
    }
}
