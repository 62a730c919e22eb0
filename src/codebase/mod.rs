//! The codebase model the codemod operates on.
//!
//! [`Codebase`] is the contract between the dead-import policy and whatever
//! engine parses, resolves and rewrites the project. [`SourceCodebase`] is
//! the tree-sitter backed engine shipped with this crate; tests drive the
//! policy with recording fakes instead.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use importsweep::codebase::{Codebase, SourceCodebase};
//!
//! let mut codebase = SourceCodebase::load(Path::new("."))?;
//! let dead: Vec<_> = codebase
//!     .imports()
//!     .iter()
//!     .filter(|import| import.name.is_some() && import.usages.is_empty())
//!     .map(|import| import.id)
//!     .collect();
//!
//! for id in dead {
//!     codebase.remove_import(id)?;
//! }
//! codebase.commit()?;
//! ```

mod error;
mod rewrite;
mod source;

use std::fmt;
use std::path::PathBuf;

pub use error::{CodebaseError, CodebaseResult};
pub use rewrite::{render_file, Removals};
pub use source::{PublishSettings, SourceCodebase, DEFAULT_BRANCH, DEFAULT_REMOTE};

/// Stable handle of an import within one loaded codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportId(usize);

impl ImportId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A recorded reference to an imported binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    /// File containing the reference
    pub file_path: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column (0-indexed)
    pub column: usize,
}

/// One imported binding in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub id: ImportId,
    /// Local name bound by the import; `None` for side-effect imports
    pub name: Option<String>,
    /// Symbol requested from the source module, if any
    pub imported_name: Option<String>,
    /// Source module path, if known
    pub module: Option<String>,
    /// Owning file
    pub file_path: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// References to this import elsewhere in the codebase
    pub usages: Vec<Usage>,
}

impl Import {
    /// The bound name, treating an empty string as absent.
    pub fn bound_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns true if this import binds no name but names a module.
    pub fn is_side_effect(&self) -> bool {
        self.bound_name().is_none() && self.module.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Returns true if nothing references this import.
    pub fn is_unused(&self) -> bool {
        self.usages.is_empty()
    }
}

/// Handle of a version-control commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHandle {
    /// Commit id (hex)
    pub id: String,
    /// Branch the commit was made on
    pub branch: String,
}

/// A pull request opened for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub url: String,
    pub number: u64,
}

/// A loaded project the codemod can inspect and edit.
///
/// Implementations give single-actor access: one caller iterates the
/// imports, removes some, then flushes and publishes.
pub trait Codebase {
    /// Imports in the order the codebase reports them.
    fn imports(&self) -> &[Import];

    /// Delete an import from its owning file (in memory).
    fn remove_import(&mut self, id: ImportId) -> CodebaseResult<()>;

    /// Flush all pending edits to disk.
    fn commit(&mut self) -> CodebaseResult<()>;

    /// Create a version-control commit of the flushed edits.
    ///
    /// Returns `None` when there was nothing to commit.
    fn git_commit(&mut self, message: &str) -> CodebaseResult<Option<CommitHandle>>;

    /// Open a pull request for the last commit.
    ///
    /// Returns `None` when no pull request could be opened.
    fn create_pr(&mut self, title: &str, body: &str) -> CodebaseResult<Option<PullRequest>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(name: Option<&str>, module: Option<&str>) -> Import {
        Import {
            id: ImportId::new(0),
            name: name.map(str::to_string),
            imported_name: None,
            module: module.map(str::to_string),
            file_path: PathBuf::from("main.py"),
            line: 1,
            usages: Vec::new(),
        }
    }

    #[test]
    fn test_side_effect_detection() {
        assert!(import(None, Some("polyfills")).is_side_effect());
        assert!(import(Some(""), Some("polyfills")).is_side_effect());
        assert!(!import(Some("os"), Some("os")).is_side_effect());
        assert!(!import(None, None).is_side_effect());
        assert!(!import(None, Some("")).is_side_effect());
    }

    #[test]
    fn test_bound_name() {
        assert_eq!(import(Some("os"), None).bound_name(), Some("os"));
        assert_eq!(import(Some(""), None).bound_name(), None);
    }

    #[test]
    fn test_import_id_display() {
        assert_eq!(ImportId::new(7).to_string(), "#7");
        assert_eq!(ImportId::new(7).index(), 7);
    }
}
