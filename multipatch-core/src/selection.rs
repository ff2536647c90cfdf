//! Choosing which branches to log

use crate::git::{BranchRef, GitRepo};
use crate::manifest::TrackingManifest;
use crate::Result;

/// Where the list of branches comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// The branches listed in the tracking manifest
    #[default]
    Manifest,
    /// Every remote's `master` branch
    AllMasters,
    /// Every remote-tracking branch
    AllRemotes,
    /// Every remote-tracking branch plus every local branch
    Everything,
}

impl SelectionMode {
    /// Pick the mode from the log command's flags, widest flag wins
    pub fn from_flags(everything: bool, all_remotes: bool, all_masters: bool) -> Self {
        if everything {
            Self::Everything
        } else if all_remotes {
            Self::AllRemotes
        } else if all_masters {
            Self::AllMasters
        } else {
            Self::Manifest
        }
    }
}

/// Produces the ordered list of branches to log
#[derive(Debug, Clone, Default)]
pub struct BranchSelector {
    mode: SelectionMode,
    exclude: Vec<String>,
}

impl BranchSelector {
    pub fn new(mode: SelectionMode, exclude: Vec<String>) -> Self {
        Self { mode, exclude }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Resolve the candidates for this mode and drop excluded ones
    ///
    /// Manifest mode fails with [`crate::Error::ConfigNotFound`] when the
    /// repository has no manifest. Discovery never reads the manifest.
    pub fn select(&self, repo: &GitRepo) -> Result<Vec<BranchRef>> {
        let candidates = match self.mode {
            SelectionMode::Manifest => TrackingManifest::load(repo.git_dir())?.branch_refs(),
            _ => self.discover(repo)?,
        };

        let selected = filter_excluded(candidates, &self.exclude);
        tracing::debug!(
            mode = ?self.mode,
            branches = selected.len(),
            "selected branches"
        );
        Ok(selected)
    }

    fn discover(&self, repo: &GitRepo) -> Result<Vec<BranchRef>> {
        let mut branches: Vec<BranchRef> = repo
            .list_remote_branches()?
            .into_iter()
            .filter(|b| self.mode != SelectionMode::AllMasters || b.branch_name() == "master")
            .collect();

        if self.mode == SelectionMode::Everything {
            branches.extend(repo.list_local_branches()?);
        }

        Ok(branches)
    }
}

/// Drop every branch whose `remote/branch` name contains one of `patterns`
///
/// Order preserving. Empty patterns are ignored.
pub fn filter_excluded(candidates: Vec<BranchRef>, patterns: &[String]) -> Vec<BranchRef> {
    candidates
        .into_iter()
        .filter(|branch| {
            let name = branch.composite_name();
            !patterns
                .iter()
                .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use crate::testutil::TestRepo;
    use crate::Error;

    fn candidates() -> Vec<BranchRef> {
        vec![
            BranchRef::remote("origin", "master"),
            BranchRef::remote("origin", "wip-thing"),
            BranchRef::remote("fork", "master"),
            BranchRef::local("master"),
            BranchRef::local("scratch"),
        ]
    }

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn labels(branches: &[BranchRef]) -> Vec<String> {
        branches.iter().map(BranchRef::label).collect()
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(SelectionMode::from_flags(false, false, false), SelectionMode::Manifest);
        assert_eq!(SelectionMode::from_flags(false, false, true), SelectionMode::AllMasters);
        assert_eq!(SelectionMode::from_flags(false, true, true), SelectionMode::AllRemotes);
        assert_eq!(SelectionMode::from_flags(true, false, true), SelectionMode::Everything);
    }

    #[test]
    fn test_filter_by_substring() {
        let kept = filter_excluded(candidates(), &patterns(&["wip", "fork/"]));
        assert_eq!(labels(&kept), vec!["origin/master", "master", "scratch"]);
    }

    #[test]
    fn test_filter_local_composite_name() {
        // Local branches are matched as "/name"
        let kept = filter_excluded(candidates(), &patterns(&["/master"]));
        assert_eq!(labels(&kept), vec!["origin/wip-thing", "scratch"]);
    }

    #[test]
    fn test_filter_no_patterns() {
        assert_eq!(filter_excluded(candidates(), &[]), candidates());
        assert_eq!(filter_excluded(candidates(), &patterns(&[""])), candidates());
    }

    #[test]
    fn test_filter_idempotent() {
        let excl = patterns(&["wip", "scratch"]);
        let once = filter_excluded(candidates(), &excl);
        let twice = filter_excluded(once.clone(), &excl);
        assert_eq!(once, twice);
    }

    fn repo_with_remote() -> (TestRepo, TestRepo) {
        let upstream = TestRepo::new();
        upstream.commit("first", 100);
        upstream.branch("dev");

        let test = TestRepo::new();
        test.commit("local", 50);
        test.branch("topic");

        let repo = test.open();
        repo.ensure_remote("origin", upstream.url()).unwrap();
        repo.fetch("origin").unwrap();
        (upstream, test)
    }

    #[test]
    fn test_discovery_modes() {
        let (_upstream, test) = repo_with_remote();
        let repo = test.open();

        let select = |mode| labels(&BranchSelector::new(mode, vec![]).select(&repo).unwrap());

        assert_eq!(select(SelectionMode::AllMasters), vec!["origin/master"]);
        assert_eq!(select(SelectionMode::AllRemotes), vec!["origin/dev", "origin/master"]);
        assert_eq!(
            select(SelectionMode::Everything),
            vec!["origin/dev", "origin/master", "master", "topic"]
        );
    }

    #[test]
    fn test_discovery_with_exclusions() {
        let (_upstream, test) = repo_with_remote();
        let repo = test.open();

        let selector = BranchSelector::new(SelectionMode::Everything, patterns(&["dev", "/top"]));
        assert_eq!(
            labels(&selector.select(&repo).unwrap()),
            vec!["origin/master", "master"]
        );
    }

    #[test]
    fn test_discovery_empty_repo() {
        let test = TestRepo::new();
        let selector = BranchSelector::new(SelectionMode::Everything, vec![]);
        assert!(selector.select(&test.open()).unwrap().is_empty());
    }

    #[test]
    fn test_manifest_mode() {
        let test = TestRepo::new();
        let repo = test.open();
        std::fs::write(
            repo.git_dir().join(MANIFEST_FILE),
            "branches:\n  - remote: origin\n    branch: master\n  - branch: wip\n  - branch: dev\n",
        )
        .unwrap();

        let selector = BranchSelector::new(SelectionMode::Manifest, patterns(&["wip"]));
        assert_eq!(labels(&selector.select(&repo).unwrap()), vec!["origin/master", "dev"]);
    }

    #[test]
    fn test_manifest_mode_missing_manifest() {
        let test = TestRepo::new();
        let result = BranchSelector::default().select(&test.open());
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }
}
