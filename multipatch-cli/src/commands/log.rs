//! Log command - print the history of several branches in commit time order

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Args;
use multipatch_core::{
    stream_log, BranchSelector, Config, GitRepo, LogFormatter, LogMerger, LogOptions,
    SelectionMode,
};

/// Arguments for the log command
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Repository to read (defaults to current directory)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Log the master branch of every remote instead of the manifest branches
    #[arg(short = 'm', long)]
    pub all_masters: bool,

    /// Log every remote-tracking branch instead of the manifest branches
    #[arg(short = 'A', long)]
    pub all_remotes: bool,

    /// Log every remote-tracking and local branch
    #[arg(short = 'e', long)]
    pub everything: bool,

    /// Skip branches whose remote/branch name contains PATTERN
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Show changed files with deletion and insertion counts
    #[arg(short, long)]
    pub stat: bool,

    /// Show the full diff of each commit
    #[arg(short, long)]
    pub patch: bool,

    /// Print a header line before each new day
    #[arg(short = 'd', long)]
    pub split_days: bool,
}

impl LogArgs {
    pub fn selection_mode(&self) -> SelectionMode {
        SelectionMode::from_flags(self.everything, self.all_remotes, self.all_masters)
    }

    /// Execute the log command
    pub fn execute(&self) -> anyhow::Result<()> {
        let config = Config::load_with_overrides(&self.exclude)?;
        let repo = GitRepo::open(&self.root)?;

        let selector = BranchSelector::new(self.selection_mode(), config.log.exclude.clone());
        let branches = selector.select(&repo)?;

        let mut sources = Vec::with_capacity(branches.len());
        for branch in branches {
            let commits = repo
                .commits(&branch.refname())
                .with_context(|| format!("cannot read history of {}", branch))?;
            sources.push((branch, commits));
        }
        let merger = LogMerger::new(sources)?;

        let options = LogOptions {
            stat: self.stat,
            patch: self.patch,
            split_days: self.split_days,
            ..LogOptions::from_config(&config.log)
        };
        let mut formatter = LogFormatter::new(options, Local)?;

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            tracing::warn!("cannot install interrupt handler: {}", e);
        }

        let mut out = io::stdout().lock();
        let written = stream_log(
            merger,
            &mut formatter,
            &mut out,
            |commit| repo.commit_detail(&commit.id),
            &cancel,
        )?;

        tracing::debug!(written, "Log finished");
        Ok(())
    }
}
