//! GitHub REST API helpers.
//!
//! Calls the pulls endpoint directly via the blocking `reqwest` client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::codebase::{CodebaseError, CodebaseResult, PullRequest};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("importsweep/", env!("CARGO_PKG_VERSION"));

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(format!("expected OWNER/NAME, got '{s}'")),
        }
    }
}

/// Extract `owner/name` from a GitHub remote URL.
///
/// Understands `git@github.com:owner/name.git`,
/// `ssh://git@github.com/owner/name.git` and `https://github.com/owner/name`.
pub fn parse_remote_url(url: &str) -> Option<RepoSlug> {
    let url = url.trim();
    let path = if let Some(rest) = url.strip_prefix("git@github.com:") {
        rest
    } else {
        let without_scheme = url.split_once("://").map(|(_, rest)| rest)?;
        let without_auth = without_scheme
            .rsplit_once('@')
            .map_or(without_scheme, |(_, host)| host);
        without_auth.strip_prefix("github.com/")?
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.parse().ok()
}

/// Body of `POST /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Serialize)]
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    html_url: String,
    number: u64,
}

/// Minimal GitHub client authenticated with a token.
pub struct GitHubClient {
    http: reqwest::blocking::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> CodebaseResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Open a pull request.
    ///
    /// # Errors
    ///
    /// Returns `CodebaseError::GitHubApi` if the API answers with a non-2xx
    /// status, `CodebaseError::Http` if the request itself fails.
    pub fn create_pull_request(
        &self,
        repo: &RepoSlug,
        request: &NewPullRequest<'_>,
    ) -> CodebaseResult<PullRequest> {
        let url = format!("{}/repos/{}/{}/pulls", self.api_url, repo.owner, repo.name);
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(request)
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(CodebaseError::GitHubApi {
                status,
                body: error_message(&body).unwrap_or(body),
            });
        }

        let pull: PullResponse = resp.json()?;
        Ok(PullRequest {
            url: pull.html_url,
            number: pull.number,
        })
    }
}

/// The `message` field of a GitHub error payload.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
