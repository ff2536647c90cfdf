//! k-way merge of per-branch commit histories by commit time

use crate::git::{BranchRef, CommitInfo};
use crate::{Error, Result};

/// One commit of the merged log, with the branch it was reached from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub branch: BranchRef,
    pub commit: CommitInfo,
}

/// Per-branch state: the newest commit not yet emitted, and the rest
struct Cursor<I> {
    branch: BranchRef,
    current: CommitInfo,
    rest: I,
}

/// Merges several newest-first commit sequences into one newest-first stream
///
/// Holds at most one unconsumed commit per branch. A branch drops out of the
/// active set for good once its sequence is exhausted. Commits with equal
/// timestamps come out in branch order.
pub struct LogMerger<I> {
    active: Vec<Cursor<I>>,
    pending_error: Option<Error>,
}

impl<I> LogMerger<I>
where
    I: Iterator<Item = Result<CommitInfo>>,
{
    /// Pull the first commit of every sequence
    ///
    /// Branches with no commits at all are dropped without error.
    pub fn new(sources: impl IntoIterator<Item = (BranchRef, I)>) -> Result<Self> {
        let mut active = Vec::new();

        for (branch, mut rest) in sources {
            match rest.next() {
                Some(current) => active.push(Cursor {
                    branch,
                    current: current?,
                    rest,
                }),
                None => tracing::debug!("{} has no commits", branch),
            }
        }

        Ok(Self {
            active,
            pending_error: None,
        })
    }

    /// Number of branches that still have commits to emit
    pub fn active_branches(&self) -> usize {
        self.active.len()
    }

    /// Index of the cursor holding the most recent commit, first one on ties
    fn newest(&self) -> Option<usize> {
        let mut best: Option<(usize, &CommitInfo)> = None;
        for (idx, cursor) in self.active.iter().enumerate() {
            match best {
                Some((_, commit)) if commit.time >= cursor.current.time => {}
                _ => best = Some((idx, &cursor.current)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl<I> Iterator for LogMerger<I>
where
    I: Iterator<Item = Result<CommitInfo>>,
{
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_error.take() {
            return Some(Err(err));
        }

        let idx = self.newest()?;
        let cursor = &mut self.active[idx];

        match cursor.rest.next() {
            Some(Ok(older)) => {
                let commit = std::mem::replace(&mut cursor.current, older);
                Some(Ok(LogEntry {
                    branch: cursor.branch.clone(),
                    commit,
                }))
            }
            next => {
                let Cursor {
                    branch, current, ..
                } = self.active.remove(idx);
                match next {
                    Some(Err(err)) => self.pending_error = Some(err),
                    _ => tracing::debug!("{} exhausted", branch),
                }
                Some(Ok(LogEntry {
                    branch,
                    commit: current,
                }))
            }
        }
    }
}
