//! Throwaway repositories for tests

use std::path::Path;

use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

use crate::GitRepo;

pub(crate) struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    /// A fresh repository whose HEAD is an unborn `master`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn url(&self) -> &str {
        self.dir.path().to_str().unwrap()
    }

    pub fn open(&self) -> GitRepo {
        GitRepo::open(self.path()).unwrap()
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Commit on HEAD, changing `file.txt`
    pub fn commit(&self, message: &str, time: i64) -> Oid {
        self.commit_to("HEAD", "Some Guy", message, time, &[("file.txt", message)])
    }

    pub fn commit_as(&self, author: &str, message: &str, time: i64) -> Oid {
        self.commit_to("HEAD", author, message, time, &[("file.txt", message)])
    }

    pub fn commit_files(&self, message: &str, time: i64, files: &[(&str, &str)]) -> Oid {
        self.commit_to("HEAD", "Some Guy", message, time, files)
    }

    /// Commit on a local branch, creating it as a root commit if needed
    pub fn commit_on(&self, branch: &str, message: &str, time: i64) -> Oid {
        let refname = format!("refs/heads/{}", branch);
        let contents = format!("{} {}", branch, message);
        self.commit_to(&refname, "Some Guy", message, time, &[("file.txt", &contents)])
    }

    /// Commit top-level `files` on top of the tree `update_ref` points at
    pub fn commit_to(
        &self,
        update_ref: &str,
        author: &str,
        message: &str,
        time: i64,
        files: &[(&str, &str)],
    ) -> Oid {
        let repo = &self.repo;
        let parent = repo
            .find_reference(update_ref)
            .and_then(|r| r.peel_to_commit())
            .ok();
        let base_tree = parent.as_ref().map(|c| c.tree().unwrap());

        let mut builder = repo.treebuilder(base_tree.as_ref()).unwrap();
        for (name, contents) in files {
            let blob = repo.blob(contents.as_bytes()).unwrap();
            builder.insert(name, blob, 0o100644).unwrap();
        }
        let tree = repo.find_tree(builder.write().unwrap()).unwrap();

        let sig = Signature::new(author, "dev@example.com", &Time::new(time, 0)).unwrap();
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some(update_ref), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Create a local branch at the HEAD commit
    pub fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
    }
}
