//! Tree-sitter backed [`Codebase`] implementation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::rewrite::{render_file, Removals};
use super::{
    Codebase, CodebaseError, CodebaseResult, CommitHandle, Import, ImportId, PullRequest, Usage,
};
use crate::analysis::{
    BindingRole, FileAnalysis, ImportAnalyzer, ImportBinding, ImportStatement, SourceLanguage,
    StatementKind,
};
use crate::graph::{ImportGraph, ImportedName, ModuleResolver, NamespaceImport};
use crate::vcs::{parse_remote_url, GitHubClient, GitRepo, NewPullRequest, RepoSlug, DEFAULT_API_URL};

pub const DEFAULT_BRANCH: &str = "codemod/remove-unused-imports";
pub const DEFAULT_REMOTE: &str = "origin";
const FALLBACK_BASE: &str = "main";

/// Where and how `git_commit` and `create_pr` publish the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    /// Branch the codemod commits to
    pub branch: String,
    /// Pull request base; defaults to the branch checked out at load time
    pub base: Option<String>,
    pub remote: String,
    /// Target repository; defaults to the one the remote URL points at
    pub repo: Option<RepoSlug>,
    pub token: Option<String>,
    pub api_url: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            base: None,
            remote: DEFAULT_REMOTE.to_string(),
            repo: None,
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// A parsed project file and its pending edits.
struct SourceFile {
    /// Path relative to the codebase root
    path: PathBuf,
    language: SourceLanguage,
    text: String,
    statements: Vec<ImportStatement>,
    removals: Removals,
    dirty: bool,
}

/// Where an [`Import`] lives. `binding` is `None` for statements that bind
/// nothing.
#[derive(Debug, Clone, Copy)]
struct Location {
    file: usize,
    statement: usize,
    binding: Option<usize>,
}

/// A project on disk, analyzed with tree-sitter.
pub struct SourceCodebase {
    root: PathBuf,
    files: Vec<SourceFile>,
    imports: Vec<Import>,
    locations: Vec<Location>,
    removed: HashSet<ImportId>,
    /// Files flushed by `commit`, relative to the root
    written: Vec<PathBuf>,
    repo: Option<GitRepo>,
    /// Branch checked out when the codebase was loaded
    initial_branch: Option<String>,
    settings: PublishSettings,
    last_commit: Option<CommitHandle>,
}

impl SourceCodebase {
    /// Load every supported source file below `root`.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn load(root: &Path) -> CodebaseResult<Self> {
        let root = root.canonicalize().map_err(|e| CodebaseError::Load {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !root.is_dir() {
            return Err(CodebaseError::Load {
                path: root,
                reason: "not a directory".to_string(),
            });
        }

        let mut analyzer = ImportAnalyzer::new()?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored_dir(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || SourceLanguage::from_path(entry.path()).is_none() {
                continue;
            }

            let path = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_path_buf();

            match analyzer.analyze_file(entry.path()) {
                Ok((text, analysis)) => {
                    debug!(
                        path = %path.display(),
                        statements = analysis.statements.len(),
                        "Analyzed file"
                    );
                    files.push((path, text, analysis));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping file"),
            }
        }

        Ok(Self::from_analyses(root, files))
    }

    /// Replace the publish settings.
    pub fn with_publisher(mut self, settings: PublishSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Number of source files loaded.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Current text of a file with pending removals applied.
    pub fn rendered(&self, path: &Path) -> Option<String> {
        let file = self.files.iter().find(|f| f.path == path)?;
        Some(render_file(&file.text, file.language, &file.statements, &file.removals))
    }

    fn from_analyses(root: PathBuf, mut analyses: Vec<(PathBuf, String, FileAnalysis)>) -> Self {
        analyses.sort_by(|a, b| a.0.cmp(&b.0));

        let resolver = ModuleResolver::new(analyses.iter().map(|(path, _, _)| path.clone()));
        let graph = build_graph(&resolver, &analyses);

        let mut imports = Vec::new();
        let mut locations = Vec::new();
        let mut files = Vec::with_capacity(analyses.len());

        for (file_idx, (path, text, analysis)) in analyses.into_iter().enumerate() {
            let package_init = is_package_init(&path, analysis.language);

            for (stmt_idx, statement) in analysis.statements.iter().enumerate() {
                if statement.is_side_effect_only() {
                    locations.push(Location {
                        file: file_idx,
                        statement: stmt_idx,
                        binding: None,
                    });
                    imports.push(Import {
                        id: ImportId::new(imports.len()),
                        name: None,
                        imported_name: None,
                        module: statement.module.clone(),
                        file_path: path.clone(),
                        line: statement.line,
                        usages: Vec::new(),
                    });
                    continue;
                }

                for (binding_idx, binding) in statement.bindings.iter().enumerate() {
                    let mut usages: Vec<Usage> = analysis
                        .references_to(&binding.local)
                        .map(|r| Usage {
                            file_path: path.clone(),
                            line: r.line,
                            column: r.column,
                        })
                        .collect();

                    usages.extend(graph.uses_of(&path, &binding.local).into_iter().map(
                        |(importer, imported)| Usage {
                            file_path: importer.to_path_buf(),
                            line: imported.line,
                            column: imported.column,
                        },
                    ));

                    if package_init {
                        usages.extend(package_usages(&graph, &path, &analysis, statement, binding));
                    }

                    locations.push(Location {
                        file: file_idx,
                        statement: stmt_idx,
                        binding: Some(binding_idx),
                    });
                    imports.push(Import {
                        id: ImportId::new(imports.len()),
                        name: Some(binding.name.clone()),
                        imported_name: binding.imported.clone(),
                        module: Some(binding.module.clone()).filter(|m| !m.is_empty()),
                        file_path: path.clone(),
                        line: binding.line,
                        usages,
                    });
                }
            }

            files.push(SourceFile {
                path,
                language: analysis.language,
                text,
                statements: analysis.statements,
                removals: Removals::new(),
                dirty: false,
            });
        }

        let repo = GitRepo::discover(&root);
        let initial_branch = repo.as_ref().and_then(GitRepo::current_branch);

        info!(
            root = %root.display(),
            files = files.len(),
            imports = imports.len(),
            edges = graph.edge_count(),
            cycles = graph.has_cycles(),
            git = repo.is_some(),
            "Loaded codebase"
        );

        Self {
            root,
            files,
            imports,
            locations,
            removed: HashSet::new(),
            written: Vec::new(),
            repo,
            initial_branch,
            settings: PublishSettings::default(),
            last_commit: None,
        }
    }

    fn repository(&self) -> CodebaseResult<&GitRepo> {
        self.repo
            .as_ref()
            .ok_or_else(|| CodebaseError::NotARepository(self.root.clone()))
    }

    fn target_repository(&self, repo: &GitRepo) -> Option<RepoSlug> {
        self.settings.repo.clone().or_else(|| {
            repo.remote_url(&self.settings.remote)
                .and_then(|url| parse_remote_url(&url))
        })
    }
}

impl Codebase for SourceCodebase {
    fn imports(&self) -> &[Import] {
        &self.imports
    }

    fn remove_import(&mut self, id: ImportId) -> CodebaseResult<()> {
        let location = *self
            .locations
            .get(id.index())
            .ok_or(CodebaseError::UnknownImport(id))?;
        if !self.removed.insert(id) {
            return Err(CodebaseError::AlreadyRemoved(id));
        }

        let file = &mut self.files[location.file];
        match location.binding {
            Some(binding) => file.removals.remove_binding(location.statement, binding),
            None => file.removals.remove_statement(location.statement),
        }
        file.dirty = true;

        debug!(import = %id, path = %file.path.display(), "Removed import");
        Ok(())
    }

    fn commit(&mut self) -> CodebaseResult<()> {
        for file in self.files.iter_mut().filter(|f| f.dirty) {
            let text = render_file(&file.text, file.language, &file.statements, &file.removals);
            let path = self.root.join(&file.path);
            fs::write(&path, text).map_err(|source| CodebaseError::Write { path, source })?;

            file.dirty = false;
            if !self.written.contains(&file.path) {
                self.written.push(file.path.clone());
            }
            debug!(path = %file.path.display(), "Wrote file");
        }

        info!(files = self.written.len(), "Flushed pending edits");
        Ok(())
    }

    fn git_commit(&mut self, message: &str) -> CodebaseResult<Option<CommitHandle>> {
        let repo = self.repository()?;
        let paths: Vec<PathBuf> = self
            .written
            .iter()
            .filter_map(|path| repo.relative_path(&self.root.join(path)))
            .collect();

        let Some(oid) = repo.commit_paths(&self.settings.branch, &paths, message)? else {
            info!("Working tree matches HEAD, nothing to commit");
            return Ok(None);
        };

        let handle = CommitHandle {
            id: oid.to_string(),
            branch: self.settings.branch.clone(),
        };
        info!(commit = %handle.id, branch = %handle.branch, "Created commit");
        self.last_commit = Some(handle.clone());
        Ok(Some(handle))
    }

    fn create_pr(&mut self, title: &str, body: &str) -> CodebaseResult<Option<PullRequest>> {
        let Some(commit) = self.last_commit.as_ref() else {
            warn!("No commit to open a pull request for");
            return Ok(None);
        };
        let Some(token) = self.settings.token.as_deref() else {
            warn!("No GitHub token configured, skipping pull request");
            return Ok(None);
        };
        let repo = self.repository()?;
        let Some(slug) = self.target_repository(repo) else {
            warn!(remote = %self.settings.remote, "Could not determine the GitHub repository");
            return Ok(None);
        };

        repo.push(&self.settings.remote, &commit.branch, Some(token))?;
        debug!(remote = %self.settings.remote, branch = %commit.branch, "Pushed branch");

        let base = self
            .settings
            .base
            .as_deref()
            .or(self.initial_branch.as_deref())
            .unwrap_or(FALLBACK_BASE);

        let client = GitHubClient::new(&self.settings.api_url, token)?;
        let pull = client.create_pull_request(
            &slug,
            &NewPullRequest {
                title,
                body,
                head: &commit.branch,
                base,
            },
        )?;

        info!(repo = %slug, number = pull.number, "Opened pull request");
        Ok(Some(pull))
    }
}

/// Returns true for a Python package's `__init__.py`, whose bindings are
/// attributes of the package.
fn is_package_init(path: &Path, language: SourceLanguage) -> bool {
    language == SourceLanguage::Python
        && path
            .file_name()
            .is_some_and(|name| name == "__init__.py" || name == "__init__.pyi")
}

/// Uses of a binding in a package `__init__.py` that come from the package
/// namespace rather than from a name.
///
/// `import pkg` reaches every binding as `pkg.name`; `from pkg import *`
/// reaches them unless `__all__` narrows it. Without `__all__`, names pulled
/// in from the package's own submodules (`from .models import User`) are its
/// public API and count as used at their own position.
fn package_usages(
    graph: &ImportGraph,
    path: &Path,
    analysis: &FileAnalysis,
    statement: &ImportStatement,
    binding: &ImportBinding,
) -> Vec<Usage> {
    let mut usages: Vec<Usage> = graph
        .namespace_uses_of(path)
        .into_iter()
        .filter(|(_, site)| !(site.wildcard && analysis.defines_all))
        .map(|(importer, site)| Usage {
            file_path: importer.to_path_buf(),
            line: site.line,
            column: site.column,
        })
        .collect();

    let relative = matches!(
        &statement.kind,
        StatementKind::PythonFrom { module_text } if module_text.starts_with('.')
    );
    if relative && !analysis.defines_all {
        usages.push(Usage {
            file_path: path.to_path_buf(),
            line: binding.line,
            column: binding.column,
        });
    }

    usages
}

/// Connect every file to the project files it imports from.
fn build_graph(resolver: &ModuleResolver, analyses: &[(PathBuf, String, FileAnalysis)]) -> ImportGraph {
    let mut graph = ImportGraph::with_capacity(analyses.len(), analyses.len());

    for (path, _, analysis) in analyses {
        graph.add_file(path);

        for statement in &analysis.statements {
            for binding in &statement.bindings {
                let Some(target) = resolver.resolve(path, &binding.module, analysis.language)
                else {
                    continue;
                };

                match binding.role {
                    BindingRole::Member | BindingRole::Named => {
                        let requested = binding.imported.as_ref().map(|name| {
                            ImportedName::new(name.clone(), binding.line, binding.column)
                        });
                        graph.add_import(path, &target, requested);
                    }
                    BindingRole::Module | BindingRole::Namespace | BindingRole::Entire => {
                        let site = NamespaceImport {
                            line: binding.line,
                            column: binding.column,
                            wildcard: false,
                        };
                        graph.add_namespace_import(path, &target, site);
                    }
                    BindingRole::Default => {
                        graph.add_import(path, &target, None);
                    }
                }
            }
        }

        for wildcard in &analysis.wildcards {
            let Some(target) = resolver.resolve(path, &wildcard.module, analysis.language) else {
                continue;
            };
            let site = NamespaceImport {
                line: wildcard.line,
                column: wildcard.column,
                wildcard: true,
            };
            graph.add_namespace_import(path, &target, site);
        }
    }

    graph
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "node_modules"
            | ".git"
            | "dist"
            | "build"
            | ".next"
            | "coverage"
            | ".turbo"
            | "target"
            | "__pycache__"
            | ".venv"
            | "venv"
            | ".tox"
            | ".mypy_cache"
    )
}
