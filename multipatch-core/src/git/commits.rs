//! Commit walks and per-commit change details

use chrono::{DateTime, Utc};
use git2::{Commit, DiffOptions, Oid, Patch, Repository, Revwalk, Sort};

use super::repo::GitRepo;
use crate::Result;

/// The parts of a commit shown in a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full hex object id
    pub id: String,
    /// Commit (committer) timestamp, used for ordering
    pub time: DateTime<Utc>,
    /// Author display name
    pub author: String,
    /// First line of the message
    pub summary: String,
}

impl CommitInfo {
    /// Abbreviated id, the first 6 hex characters
    pub fn short_id(&self) -> &str {
        self.id.get(..6).unwrap_or(&self.id)
    }

    fn from_commit(commit: &Commit<'_>) -> Self {
        let author = commit.author();
        Self {
            id: commit.id().to_string(),
            time: DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or_default(),
            author: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            summary: commit
                .summary_bytes()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .unwrap_or_default(),
        }
    }
}

/// A change to one file in a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path of the file (the new path for renames and additions)
    pub path: String,
    /// Lines added
    pub insertions: usize,
    /// Lines removed
    pub deletions: usize,
    /// Unified diff text for this file
    pub patch: String,
}

/// All file changes of a commit relative to its first parent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDetail {
    /// Changed files in libgit2's diff order (sorted by path)
    pub files: Vec<FileChange>,
}

/// Lazily walks the history of one ref, newest commit first
pub struct CommitSequence<'repo> {
    repo: &'repo Repository,
    walk: Revwalk<'repo>,
}

impl Iterator for CommitSequence<'_> {
    type Item = Result<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.walk.next()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(e.into())),
        };

        Some(
            self.repo
                .find_commit(oid)
                .map(|commit| CommitInfo::from_commit(&commit))
                .map_err(Into::into),
        )
    }
}

impl GitRepo {
    /// Open a reverse-chronological commit walk starting at a full refname
    ///
    /// The branch HEAD points at while unborn yields an empty sequence; any
    /// other missing ref is an error.
    pub fn commits(&self, refname: &str) -> Result<CommitSequence<'_>> {
        let repo = self.inner();
        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;

        match repo.find_reference(refname) {
            Ok(reference) => walk.push(reference.peel_to_commit()?.id())?,
            Err(e) if e.code() == git2::ErrorCode::NotFound
                && self.unborn_head_target()?.as_deref() == Some(refname) =>
            {
                tracing::debug!("{} is unborn", refname);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(CommitSequence { repo, walk })
    }

    /// Load the per-file changes of a commit against its first parent
    pub fn commit_detail(&self, id: &str) -> Result<CommitDetail> {
        let repo = self.inner();
        let commit = repo.find_commit(Oid::from_str(id)?)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(true);
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;

        let mut files = Vec::new();
        for idx in 0..diff.deltas().len() {
            let Some(mut patch) = Patch::from_diff(&diff, idx)? else {
                continue;
            };

            let delta = patch.delta();
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (_, insertions, deletions) = patch.line_stats()?;
            let text = patch.to_buf()?;

            files.push(FileChange {
                path,
                insertions,
                deletions,
                patch: String::from_utf8_lossy(&text).into_owned(),
            });
        }

        Ok(CommitDetail { files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestRepo;

    #[test]
    fn test_commits_newest_first() {
        let test = TestRepo::new();
        test.commit("one", 100);
        test.commit("two", 200);
        test.commit("three", 300);

        let repo = test.open();
        let summaries: Vec<String> = repo
            .commits("refs/heads/master")
            .unwrap()
            .map(|c| c.unwrap().summary)
            .collect();
        assert_eq!(summaries, vec!["three", "two", "one"]);
    }

    #[test]
    fn test_commit_info_fields() {
        let test = TestRepo::new();
        test.commit_as("Jane Q Doe", "  Fix the thing  \n\nbody text", 1_700_000_000);

        let repo = test.open();
        let commit = repo.commits("refs/heads/master").unwrap().next().unwrap().unwrap();
        assert_eq!(commit.author, "Jane Q Doe");
        assert_eq!(commit.time.timestamp(), 1_700_000_000);
        assert_eq!(commit.id.len(), 40);
        assert_eq!(commit.short_id(), &commit.id[..6]);
        assert!(commit.summary.contains("Fix the thing"));
    }

    #[test]
    fn test_unborn_head_is_empty() {
        let test = TestRepo::new();
        let repo = test.open();
        assert_eq!(repo.commits("refs/heads/master").unwrap().count(), 0);
    }

    #[test]
    fn test_unknown_ref_is_error() {
        let test = TestRepo::new();
        test.commit("one", 100);
        let repo = test.open();
        assert!(repo.commits("refs/heads/nope").is_err());
    }

    #[test]
    fn test_commit_detail() {
        let test = TestRepo::new();
        test.commit_files("add", 100, &[("a.txt", "one\ntwo\n"), ("b.txt", "x\n")]);
        let id = test.commit_files("edit", 200, &[("a.txt", "one\nthree\nfour\n")]);

        let detail = test.open().commit_detail(&id.to_string()).unwrap();
        assert_eq!(detail.files.len(), 1);

        let change = &detail.files[0];
        assert_eq!(change.path, "a.txt");
        assert_eq!(change.insertions, 2);
        assert_eq!(change.deletions, 1);
        assert!(change.patch.contains("+three"));
        assert!(change.patch.contains("-two"));
    }

    #[test]
    fn test_root_commit_detail() {
        let test = TestRepo::new();
        let id = test.commit_files("add", 100, &[("b.txt", "x\n"), ("a.txt", "y\nz\n")]);

        let detail = test.open().commit_detail(&id.to_string()).unwrap();
        let paths: Vec<&str> = detail.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
        assert_eq!(detail.files[0].insertions, 2);
    }
}
