//! Codemods built on the [`Codebase`] contract.
//!
//! # Example
//!
//! ```ignore
//! use importsweep::codemod::run;
//! use importsweep::config::RunConfig;
//!
//! let config = RunConfig::new(".");
//! let report = run(&config, &mut std::io::stdout())?;
//! println!("{} imports removed", report.removed);
//! ```

mod dead_imports;

use std::io::Write;

use tracing::debug;

use crate::codebase::{Codebase, CodebaseResult, SourceCodebase};
use crate::config::RunConfig;

pub use dead_imports::{
    classify, commit_message, pr_title, remove_dead_imports, ImportClass, RemovalReport, PR_BODY,
};

/// Load a codebase with `load` and run the dead-import pass over it.
///
/// A load failure is reported once on `out` and returned without touching
/// anything else.
pub fn run_codemod<C, L, W>(load: L, out: &mut W) -> CodebaseResult<RemovalReport>
where
    C: Codebase,
    L: FnOnce() -> CodebaseResult<C>,
    W: Write,
{
    writeln!(out, "Parsing codebase...")?;
    let mut codebase = match load() {
        Ok(codebase) => codebase,
        Err(e) => {
            let _ = writeln!(out, "Failed to initialize codemod: {e}");
            return Err(e);
        }
    };

    writeln!(out, "Running codemod...")?;
    remove_dead_imports(&mut codebase, out)
}

/// Run the dead-import codemod on the project described by `config`.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> CodebaseResult<RemovalReport> {
    run_codemod(
        || {
            SourceCodebase::load(&config.root).map(|codebase| {
                debug!(files = codebase.file_count(), "Codebase ready");
                codebase.with_publisher(config.publish.clone())
            })
        },
        out,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::{CodebaseError, CommitHandle, Import, ImportId, PullRequest};
    use std::path::PathBuf;

    struct NeverCalled;

    impl Codebase for NeverCalled {
        fn imports(&self) -> &[Import] {
            panic!("imports() called after a failed load")
        }

        fn remove_import(&mut self, _id: ImportId) -> CodebaseResult<()> {
            unreachable!()
        }

        fn commit(&mut self) -> CodebaseResult<()> {
            unreachable!()
        }

        fn git_commit(&mut self, _message: &str) -> CodebaseResult<Option<CommitHandle>> {
            unreachable!()
        }

        fn create_pr(&mut self, _title: &str, _body: &str) -> CodebaseResult<Option<PullRequest>> {
            unreachable!()
        }
    }

    #[test]
    fn test_load_failure_is_reported_once() {
        let mut out = Vec::new();
        let result = run_codemod::<NeverCalled, _, _>(
            || {
                Err(CodebaseError::Load {
                    path: PathBuf::from("/missing"),
                    reason: "No such file or directory".to_string(),
                })
            },
            &mut out,
        );

        assert!(matches!(result, Err(CodebaseError::Load { .. })));
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Parsing codebase...\nFailed to initialize codemod: \
             Failed to load codebase at /missing: No such file or directory\n"
        );
    }

    #[test]
    fn test_run_on_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RunConfig::new(dir.path().join("nope"));

        let mut out = Vec::new();
        assert!(run(&config, &mut out).is_err());
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Failed to initialize codemod"));
    }

    #[test]
    fn test_run_without_unused_imports() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.py"), "import sys\nsys.exit(0)\n").unwrap();
        let config = RunConfig::new(dir.path());

        let mut out = Vec::new();
        let report = run(&config, &mut out).unwrap();
        assert_eq!(report.removed, 0);
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("No unused imports found!\n"));
    }
}
