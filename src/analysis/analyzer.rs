//! Import analysis using tree-sitter.
//!
//! This module parses source files to extract module-level import
//! statements and every identifier reference outside of them, which is
//! what usage resolution needs to decide whether an import is dead.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

use super::language::SourceLanguage;
use super::types::{ImportStatement, Reference, WildcardImport};
use super::{javascript, python, references};

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Everything the codemod needs to know about one source file.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub language: SourceLanguage,
    /// Module-level import statements in source order
    pub statements: Vec<ImportStatement>,
    /// Identifier references outside those statements
    pub references: Vec<Reference>,
    /// Module-level `from m import *` statements
    pub wildcards: Vec<WildcardImport>,
    /// Whether the module assigns `__all__` at top level
    pub defines_all: bool,
}

impl FileAnalysis {
    /// References to `name` anywhere outside the import statements.
    pub fn references_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| r.name == name)
    }
}

/// Classification of a top-level node.
pub(super) enum TopLevel {
    /// An import statement the codemod may rewrite
    Import(ImportStatement),
    /// A wildcard import, kept for module resolution only
    Wildcard(WildcardImport),
    /// Import-like syntax that is neither rewritten nor scanned for references
    /// (`__future__` imports, re-exports)
    Ignored,
    /// Ordinary code
    Code,
}

/// Analyzer for extracting imports from Python, JavaScript and TypeScript files.
pub struct ImportAnalyzer {
    python_parser: Parser,
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ImportAnalyzer {
    /// Create a new ImportAnalyzer.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            python_parser: parser_for(SourceLanguage::Python)?,
            js_parser: parser_for(SourceLanguage::JavaScript)?,
            ts_parser: parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: parser_for(SourceLanguage::Tsx)?,
        })
    }

    /// Read and analyze a single file, returning its text alongside.
    pub fn analyze_file(&mut self, path: &Path) -> AnalysisResult<(String, FileAnalysis)> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let language = SourceLanguage::from_extension(ext)
            .ok_or_else(|| AnalysisError::UnsupportedFileType(ext.to_string()))?;

        let content = fs::read_to_string(path)?;
        let analysis = self.analyze_source(&content, language, path)?;
        Ok((content, analysis))
    }

    /// Analyze source code directly.
    pub fn analyze_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<FileAnalysis> {
        let parser = match language {
            SourceLanguage::Python => &mut self.python_parser,
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.display().to_string(),
            })?;

        Ok(Self::extract(&tree, source, language))
    }

    /// Split the module body into import statements and code, then collect
    /// references from the code.
    fn extract(tree: &Tree, source: &str, language: SourceLanguage) -> FileAnalysis {
        let root = tree.root_node();
        let mut statements = Vec::new();
        let mut wildcards = Vec::new();
        let mut skipped = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let parsed = match language {
                SourceLanguage::Python => python::parse_statement(&child, source),
                _ => javascript::parse_statement(&child, source),
            };

            match parsed {
                TopLevel::Import(statement) => {
                    statements.push(statement);
                    skipped.push(child.id());
                }
                TopLevel::Wildcard(wildcard) => {
                    wildcards.push(wildcard);
                    skipped.push(child.id());
                }
                TopLevel::Ignored => skipped.push(child.id()),
                TopLevel::Code => {}
            }
        }

        let references = references::collect_references(&root, source, language, &skipped);
        let defines_all =
            language == SourceLanguage::Python && references::defines_dunder_all(&root, source);

        FileAnalysis {
            language,
            statements,
            references,
            wildcards,
            defines_all,
        }
    }
}

fn parser_for(language: SourceLanguage) -> AnalysisResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|_| AnalysisError::LanguageInit)?;
    Ok(parser)
}

/// Extract the text content of a node.
pub(super) fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract string value (removes quotes).
pub(super) fn extract_string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    Some(trimmed.to_string())
}

/// 1-indexed line and 0-indexed column of a node.
pub(super) fn position(node: &Node) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column)
}

/// Returns true if `child` is the node stored under `field` of `parent`.
pub(super) fn is_field_of(parent: &Node, field: &str, child: &Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|n| n.id() == child.id())
}
