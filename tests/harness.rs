//! Test harness for importsweep integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use git2::{IndexAddOption, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestRepo {
    dir: TempDir,
    repo: Option<Repository>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir, repo: None }
    }

    pub fn with_git() -> Self {
        let mut repo = Self::new();
        repo.init_git();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn init_git(&mut self) {
        let repo = Repository::init(self.dir.path()).expect("Failed to init git");
        {
            let mut config = repo.config().expect("Failed to open git config");
            config
                .set_str("user.email", "test@test.com")
                .expect("Failed to set git email");
            config
                .set_str("user.name", "Test")
                .expect("Failed to set git name");
        }
        self.repo = Some(repo);
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }

    /// Stage everything and commit it.
    pub fn commit_all(&self, message: &str) {
        let repo = self.repo.as_ref().expect("Git not initialized");
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index.write().expect("Failed to write index");

        let tree = repo
            .find_tree(index.write_tree().expect("Failed to write tree"))
            .expect("Failed to find tree");
        let sig = Signature::now("Test", "test@test.com").expect("Failed to create signature");
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to commit");
    }

    pub fn head_branch(&self) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let head = repo.head().ok()?;
        head.shorthand().map(str::to_string)
    }

    pub fn head_message(&self) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let commit = repo.head().ok()?.peel_to_commit().ok()?;
        commit.message().map(str::to_string)
    }
}

/// An `importsweep` command with GitHub settings cleared from the environment.
pub fn importsweep() -> Command {
    let mut cmd = Command::cargo_bin("importsweep").expect("Failed to find binary");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_API_URL")
        .env_remove("IMPORTSWEEP_LOG");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let repo = TestRepo::new();
        assert!(repo.path().exists());
    }

    #[test]
    fn test_harness_git_commit() {
        let repo = TestRepo::with_git();
        repo.add_file("main.py", "import os\n");
        repo.commit_all("initial");
        assert_eq!(repo.head_message().as_deref(), Some("initial"));
    }
}
