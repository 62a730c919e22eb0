//! The "remove dead imports" policy.
//!
//! Walks every import a [`Codebase`] reports, removes the ones that bind a
//! name nobody references, keeps side-effect imports, then flushes, commits
//! and opens a pull request when anything changed.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::codebase::{Codebase, CodebaseResult, CommitHandle, Import, ImportId, PullRequest};

/// Body of the pull request opened for the change.
pub const PR_BODY: &str = "This PR automatically removes unused imports from the codebase using the delete-dead-imports codemod.

Changes made:
- Removed unused imports while preserving side-effect imports
- Improved code cleanliness and reduced bundle size
- No functional changes

This change was automatically generated by importsweep.";

/// Commit message for `count` removed imports.
pub fn commit_message(count: usize) -> String {
    format!(
        "refactor: remove {count} unused imports\n\nAutomatically removed dead imports using codegen codemod."
    )
}

/// Pull request title for `count` removed imports.
pub fn pr_title(count: usize) -> String {
    format!("refactor: remove {count} unused imports")
}

/// What the policy does with one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportClass {
    /// Binds nothing but names a module: always kept
    SideEffect,
    /// Binds a name with no usages: removed
    Dead,
    /// Everything else: left alone
    Live,
}

/// Classify an import.
///
/// An import with neither a name nor a module is live: it is not a
/// side-effect import, and removing it would break the rule that only
/// named imports are removed.
pub fn classify(import: &Import) -> ImportClass {
    if import.is_side_effect() {
        ImportClass::SideEffect
    } else if import.bound_name().is_some() && import.is_unused() {
        ImportClass::Dead
    } else {
        ImportClass::Live
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: usize,
    pub skipped_side_effects: usize,
    pub commit: Option<CommitHandle>,
    pub pull_request: Option<PullRequest>,
}

/// An import the pass acts on, captured before any removal.
struct Candidate {
    id: ImportId,
    class: ImportClass,
    /// Module for side-effect imports, bound name for dead ones
    label: String,
    file_path: PathBuf,
}

impl Candidate {
    fn from_import(import: &Import) -> Option<Self> {
        let class = classify(import);
        let label = match class {
            ImportClass::SideEffect => import.module.clone()?,
            ImportClass::Dead => import.bound_name()?.to_string(),
            ImportClass::Live => return None,
        };

        Some(Self {
            id: import.id,
            class,
            label,
            file_path: import.file_path.clone(),
        })
    }
}

/// Run the policy over `codebase`, writing diagnostics to `out`.
///
/// Any error is reported once on `out` and returned. Imports removed before
/// the failure stay removed in memory; nothing is flushed unless the pass
/// reached `commit`.
pub fn remove_dead_imports<C, W>(codebase: &mut C, out: &mut W) -> CodebaseResult<RemovalReport>
where
    C: Codebase + ?Sized,
    W: Write,
{
    let result = sweep(codebase, out);
    if let Err(e) = &result {
        let _ = writeln!(out, "Error while processing imports: {e}");
    }
    result
}

fn sweep<C, W>(codebase: &mut C, out: &mut W) -> CodebaseResult<RemovalReport>
where
    C: Codebase + ?Sized,
    W: Write,
{
    let candidates: Vec<Candidate> = codebase
        .imports()
        .iter()
        .filter_map(Candidate::from_import)
        .collect();

    let mut report = RemovalReport::default();

    for candidate in &candidates {
        match candidate.class {
            ImportClass::SideEffect => {
                writeln!(
                    out,
                    "Skipping side-effect import: {} from {}",
                    candidate.label,
                    candidate.file_path.display()
                )?;
                report.skipped_side_effects += 1;
            }
            ImportClass::Dead => {
                writeln!(
                    out,
                    "Removing unused import: {} from {}",
                    candidate.label,
                    candidate.file_path.display()
                )?;
                codebase.remove_import(candidate.id)?;
                report.removed += 1;
            }
            ImportClass::Live => {}
        }
    }

    if report.removed == 0 {
        writeln!(out, "\nNo unused imports found!")?;
        return Ok(report);
    }

    writeln!(out, "\nRemoved {} unused imports", report.removed)?;
    codebase.commit()?;

    report.commit = codebase.git_commit(&commit_message(report.removed))?;
    if report.commit.is_some() {
        report.pull_request = codebase.create_pr(&pr_title(report.removed), PR_BODY)?;
    } else {
        debug!("No commit was created, skipping pull request");
    }

    match &report.pull_request {
        Some(pr) => writeln!(out, "\nCreated PR: {}", pr.url)?,
        None => writeln!(out, "\nFailed to create PR")?,
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::{CodebaseError, Usage};
    use pretty_assertions::assert_eq;

    /// Records every call made by the policy.
    #[derive(Default)]
    struct FakeCodebase {
        imports: Vec<Import>,
        calls: Vec<String>,
        commit_handle: Option<CommitHandle>,
        pull_request: Option<PullRequest>,
        fail_remove: Option<ImportId>,
        fail_create_pr: bool,
    }

    impl FakeCodebase {
        fn with_imports(specs: &[(Option<&str>, Option<&str>, usize)]) -> Self {
            let imports = specs
                .iter()
                .enumerate()
                .map(|(i, (name, module, usage_count))| Import {
                    id: ImportId::new(i),
                    name: name.map(str::to_string),
                    imported_name: None,
                    module: module.map(str::to_string),
                    file_path: PathBuf::from("src/main.py"),
                    line: i + 1,
                    usages: (0..*usage_count)
                        .map(|n| Usage {
                            file_path: PathBuf::from("src/main.py"),
                            line: 10 + n,
                            column: 0,
                        })
                        .collect(),
                })
                .collect();

            Self {
                imports,
                commit_handle: Some(CommitHandle {
                    id: "abc123".to_string(),
                    branch: "codemod/remove-unused-imports".to_string(),
                }),
                pull_request: Some(PullRequest {
                    url: "https://github.com/acme/app/pull/1".to_string(),
                    number: 1,
                }),
                ..Self::default()
            }
        }
    }

    impl Codebase for FakeCodebase {
        fn imports(&self) -> &[Import] {
            &self.imports
        }

        fn remove_import(&mut self, id: ImportId) -> CodebaseResult<()> {
            if self.fail_remove == Some(id) {
                return Err(CodebaseError::UnknownImport(id));
            }
            self.calls.push(format!("remove {id}"));
            Ok(())
        }

        fn commit(&mut self) -> CodebaseResult<()> {
            self.calls.push("commit".to_string());
            Ok(())
        }

        fn git_commit(&mut self, message: &str) -> CodebaseResult<Option<CommitHandle>> {
            self.calls.push(format!("git_commit {message}"));
            Ok(self.commit_handle.clone())
        }

        fn create_pr(&mut self, title: &str, _body: &str) -> CodebaseResult<Option<PullRequest>> {
            self.calls.push(format!("create_pr {title}"));
            if self.fail_create_pr {
                return Err(CodebaseError::GitHubApi {
                    status: 502,
                    body: "Bad Gateway".to_string(),
                });
            }
            Ok(self.pull_request.clone())
        }
    }

    fn run(codebase: &mut FakeCodebase) -> (CodebaseResult<RemovalReport>, String) {
        let mut out = Vec::new();
        let result = remove_dead_imports(codebase, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_classify() {
        let fake = FakeCodebase::with_imports(&[
            (None, Some("polyfills"), 0),
            (Some("os"), Some("os"), 0),
            (Some("sys"), Some("sys"), 1),
            (None, None, 0),
            (Some(""), Some("reflect-metadata"), 0),
        ]);
        let classes: Vec<_> = fake.imports.iter().map(classify).collect();
        assert_eq!(
            classes,
            vec![
                ImportClass::SideEffect,
                ImportClass::Dead,
                ImportClass::Live,
                ImportClass::Live,
                ImportClass::SideEffect,
            ]
        );
    }

    #[test]
    fn test_side_effect_only() {
        let mut fake = FakeCodebase::with_imports(&[(None, Some("polyfills"), 0)]);
        let (result, out) = run(&mut fake);

        let report = result.unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.skipped_side_effects, 1);
        assert_eq!(
            out,
            "Skipping side-effect import: polyfills from src/main.py\n\nNo unused imports found!\n"
        );
        assert!(fake.calls.is_empty());
    }

    #[test]
    fn test_single_dead_import() {
        let mut fake = FakeCodebase::with_imports(&[(Some("os"), Some("os"), 0)]);
        let (result, out) = run(&mut fake);

        let report = result.unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.pull_request.unwrap().number, 1);
        assert_eq!(
            out,
            "Removing unused import: os from src/main.py\n\
             \nRemoved 1 unused imports\n\
             \nCreated PR: https://github.com/acme/app/pull/1\n"
        );
        assert_eq!(
            fake.calls,
            vec![
                "remove #0".to_string(),
                "commit".to_string(),
                format!("git_commit {}", commit_message(1)),
                "create_pr refactor: remove 1 unused imports".to_string(),
            ]
        );
        assert!(commit_message(1).contains("remove 1 unused imports"));
    }

    #[test]
    fn test_used_import_is_silent() {
        let mut fake = FakeCodebase::with_imports(&[(Some("sys"), Some("sys"), 1)]);
        let (result, out) = run(&mut fake);

        assert_eq!(result.unwrap().removed, 0);
        assert_eq!(out, "\nNo unused imports found!\n");
        assert!(fake.calls.is_empty());
    }

    #[test]
    fn test_no_commit_handle_skips_pr() {
        let mut fake = FakeCodebase::with_imports(&[
            (Some("os"), Some("os"), 0),
            (Some("re"), Some("re"), 0),
        ]);
        fake.commit_handle = None;
        let (result, out) = run(&mut fake);

        let report = result.unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(report.commit, None);
        assert!(out.ends_with("\nFailed to create PR\n"));
        assert!(fake.calls.iter().all(|c| !c.starts_with("create_pr")));
        assert_eq!(fake.calls.last().unwrap(), &format!("git_commit {}", commit_message(2)));
    }

    #[test]
    fn test_pr_not_returned() {
        let mut fake = FakeCodebase::with_imports(&[(Some("os"), Some("os"), 0)]);
        fake.pull_request = None;
        let (result, out) = run(&mut fake);

        assert!(result.unwrap().commit.is_some());
        assert!(out.ends_with("\nFailed to create PR\n"));
    }

    #[test]
    fn test_mixed_imports_in_order() {
        let mut fake = FakeCodebase::with_imports(&[
            (Some("a"), Some("m"), 0),
            (None, Some("side"), 0),
            (Some("b"), Some("m"), 2),
            (Some("c"), Some("m"), 0),
        ]);
        let (result, out) = run(&mut fake);

        let report = result.unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(report.skipped_side_effects, 1);
        assert_eq!(&fake.calls[..3], &["remove #0", "remove #3", "commit"]);
        assert!(out.starts_with(
            "Removing unused import: a from src/main.py\n\
             Skipping side-effect import: side from src/main.py\n\
             Removing unused import: c from src/main.py\n"
        ));
        assert!(out.contains("Removed 2 unused imports"));
    }

    #[test]
    fn test_remove_failure_stops_pass() {
        let mut fake = FakeCodebase::with_imports(&[
            (Some("a"), Some("m"), 0),
            (Some("b"), Some("m"), 0),
            (Some("c"), Some("m"), 0),
        ]);
        fake.fail_remove = Some(ImportId::new(1));
        let (result, out) = run(&mut fake);

        assert!(matches!(result, Err(CodebaseError::UnknownImport(_))));
        assert_eq!(fake.calls, vec!["remove #0".to_string()]);
        assert_eq!(
            out.matches("Error while processing imports: Unknown import #1").count(),
            1
        );
        assert!(!out.contains("Removing unused import: c"));
    }

    #[test]
    fn test_pr_failure_propagates() {
        let mut fake = FakeCodebase::with_imports(&[(Some("os"), Some("os"), 0)]);
        fake.fail_create_pr = true;
        let (result, out) = run(&mut fake);

        assert!(matches!(result, Err(CodebaseError::GitHubApi { status: 502, .. })));
        assert!(out.ends_with(
            "Error while processing imports: GitHub API returned HTTP 502: Bad Gateway\n"
        ));
    }

    #[test]
    fn test_templates() {
        assert_eq!(
            commit_message(3),
            "refactor: remove 3 unused imports\n\nAutomatically removed dead imports using codegen codemod."
        );
        assert_eq!(pr_title(3), "refactor: remove 3 unused imports");
        assert!(PR_BODY.contains("preserving side-effect imports"));
    }
}
