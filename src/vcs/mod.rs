//! Version control and code hosting.
//!
//! [`GitRepo`] wraps git2 for branching, committing and pushing;
//! [`GitHubClient`] opens pull requests through the GitHub REST API.

mod git;
mod github;

pub use git::GitRepo;
pub use github::{parse_remote_url, GitHubClient, NewPullRequest, RepoSlug, DEFAULT_API_URL};
