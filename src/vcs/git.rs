//! Git repository integration

use git2::{
    Commit, Cred, ErrorCode, Oid, PushOptions, RemoteCallbacks, Repository, Signature,
};
use std::path::{Path, PathBuf};

const FALLBACK_NAME: &str = "importsweep";
const FALLBACK_EMAIL: &str = "importsweep@users.noreply.github.com";

/// The git repository enclosing a project.
pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    /// Find the repository containing `path`, if any. Bare repositories are
    /// ignored since there is no work tree to commit from.
    pub fn discover(path: &Path) -> Option<Self> {
        let repo = Repository::discover(path).ok()?;
        let workdir = repo.workdir()?.canonicalize().ok()?;

        Some(Self { repo, workdir })
    }

    /// Name of the branch HEAD points to, including an unborn one.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.repo.find_reference("HEAD").ok()?;
        let target = head.symbolic_target()?;
        target.strip_prefix("refs/heads/").map(str::to_string)
    }

    /// Path of `path` relative to the work tree, as the index expects it.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.workdir).ok().map(Path::to_path_buf)
    }

    /// URL configured for a remote.
    pub fn remote_url(&self, remote: &str) -> Option<String> {
        let remote = self.repo.find_remote(remote).ok()?;
        remote.url().map(str::to_string)
    }

    /// Commit `paths` (relative to the work tree) on `branch`.
    ///
    /// The branch is created at HEAD and checked out when HEAD is elsewhere;
    /// the work tree is left untouched since both point at the same commit.
    /// Returns `None` when staging leaves the tree identical to HEAD's.
    pub fn commit_paths(
        &self,
        branch: &str,
        paths: &[PathBuf],
        message: &str,
    ) -> Result<Option<Oid>, git2::Error> {
        let head = self.head_commit()?;

        if self.current_branch().as_deref() != Some(branch) {
            if let Some(commit) = &head {
                if self.repo.find_branch(branch, git2::BranchType::Local).is_ok() {
                    return Err(git2::Error::from_str(&format!(
                        "branch '{branch}' already exists; delete it or pass another --branch"
                    )));
                }
                self.repo.branch(branch, commit, false)?;
            }
            self.repo.set_head(&format!("refs/heads/{branch}"))?;
        }

        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;
        let tree_id = index.write_tree()?;

        if head.as_ref().is_some_and(|commit| commit.tree_id() == tree_id) {
            return Ok(None);
        }

        let tree = self.repo.find_tree(tree_id)?;
        let signature = self
            .repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))?;
        let parents: Vec<&Commit> = head.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(Some(oid))
    }

    /// Push `branch` to `remote`, authenticating with `token` when given.
    pub fn push(&self, remote: &str, branch: &str, token: Option<&str>) -> Result<(), git2::Error> {
        let mut remote = self.repo.find_remote(remote)?;

        let mut callbacks = RemoteCallbacks::new();
        if let Some(token) = token {
            let token = token.to_string();
            callbacks.credentials(move |_url, _username, _allowed| {
                Cred::userpass_plaintext("x-access-token", &token)
            });
        }
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => Err(git2::Error::from_str(&format!(
                "push of {refname} rejected: {message}"
            ))),
            None => Ok(()),
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[refspec.as_str()], Some(&mut options))
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>, git2::Error> {
        match self.repo.head() {
            Ok(head) => head.peel_to_commit().map(Some),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
