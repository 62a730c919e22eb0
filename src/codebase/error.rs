//! Errors raised by a codebase implementation.

use std::path::PathBuf;

use thiserror::Error;

use super::ImportId;
use crate::analysis::AnalysisError;

/// Errors that can occur while loading, editing or publishing a codebase.
#[derive(Error, Debug)]
pub enum CodebaseError {
    /// The root path is not a usable project root.
    #[error("Failed to load codebase at {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Unknown import {0}")]
    UnknownImport(ImportId),

    #[error("Import {0} has already been removed")]
    AlreadyRemoved(ImportId),

    /// A pending edit could not be flushed to disk.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status}: {body}")]
    GitHubApi { status: u16, body: String },

    /// Diagnostics could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for codebase operations.
pub type CodebaseResult<T> = Result<T, CodebaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CodebaseError::Load {
            path: PathBuf::from("/nope"),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load codebase at /nope: No such file or directory"
        );

        let err = CodebaseError::AlreadyRemoved(ImportId::new(3));
        assert_eq!(err.to_string(), "Import #3 has already been removed");

        let err = CodebaseError::GitHubApi {
            status: 422,
            body: "Validation Failed".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub API returned HTTP 422: Validation Failed");
    }
}
