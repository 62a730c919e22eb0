//! Rendering a file with some import bindings removed.
//!
//! Statements that lose every binding are deleted, together with their line
//! when nothing else shares it. Statements that keep some bindings are
//! re-rendered from the specifier text of the survivors, so `import { a, b }`
//! minus `a` becomes `import { b }` without leaving stray commas.

use std::collections::HashSet;
use std::ops::Range;

use crate::analysis::{BindingRole, ImportBinding, ImportStatement, SourceLanguage, StatementKind};

/// Pending removals for one file, keyed by statement and binding index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removals {
    statements: HashSet<usize>,
    bindings: HashSet<(usize, usize)>,
}

impl Removals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a whole statement, whatever it binds.
    pub fn remove_statement(&mut self, statement: usize) {
        self.statements.insert(statement);
    }

    /// Remove one binding of a statement.
    pub fn remove_binding(&mut self, statement: usize, binding: usize) {
        self.bindings.insert((statement, binding));
    }

    fn keeps(&self, statement: usize, binding: usize) -> bool {
        !self.statements.contains(&statement) && !self.bindings.contains(&(statement, binding))
    }
}

/// Render `source` with `removals` applied to its import statements.
///
/// Statements must be in source order and must not overlap.
pub fn render_file(
    source: &str,
    language: SourceLanguage,
    statements: &[ImportStatement],
    removals: &Removals,
) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for (stmt_idx, statement) in statements.iter().enumerate() {
        let kept: Vec<&ImportBinding> = statement
            .bindings
            .iter()
            .enumerate()
            .filter(|(binding_idx, _)| removals.keeps(stmt_idx, *binding_idx))
            .map(|(_, binding)| binding)
            .collect();

        let deleted = removals.statements.contains(&stmt_idx)
            || (kept.is_empty() && !statement.bindings.is_empty());

        let (range, replacement) = if deleted {
            (deletion_range(source, &statement.range, language), String::new())
        } else if kept.len() < statement.bindings.len() {
            (statement.range.clone(), render_statement(source, statement, &kept))
        } else {
            continue;
        };

        if range.start < cursor {
            continue;
        }
        output.push_str(&source[cursor..range.start]);
        output.push_str(&replacement);
        cursor = range.end;
    }

    output.push_str(&source[cursor..]);
    output
}

/// Render a statement that keeps only `kept` of its bindings.
fn render_statement(source: &str, statement: &ImportStatement, kept: &[&ImportBinding]) -> String {
    let texts = || {
        kept.iter()
            .map(|binding| binding.text.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    match &statement.kind {
        StatementKind::PythonImport => format!("import {}", texts()),
        StatementKind::PythonFrom { module_text } => {
            format!("from {} import {}", module_text, texts())
        }
        StatementKind::EsImport {
            head,
            source_text,
            semicolon,
        } => {
            let mut parts = Vec::new();
            let mut named = Vec::new();
            for binding in kept {
                match binding.role {
                    BindingRole::Default | BindingRole::Namespace => parts.push(binding.text.clone()),
                    _ => named.push(binding.text.as_str()),
                }
            }
            if !named.is_empty() {
                parts.push(format!("{{ {} }}", named.join(", ")));
            }
            format!(
                "{} {} from {}{}",
                head,
                parts.join(", "),
                source_text,
                if *semicolon { ";" } else { "" }
            )
        }
        // Single-binding statements are never partially removed
        StatementKind::Require | StatementKind::SideEffect => {
            source[statement.range.clone()].to_string()
        }
    }
}

/// The span to delete for a fully removed statement.
///
/// Covers the whole line (and its newline) when the statement is alone on
/// it, apart from whitespace, a trailing `;` or a trailing comment.
fn deletion_range(source: &str, range: &Range<usize>, language: SourceLanguage) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |i| range.end + i);

    let before = &source[line_start..range.start];
    let after = source[range.end..line_end].trim();

    let alone = before.trim().is_empty()
        && (after.is_empty() || after == ";" || after.starts_with(language.line_comment()));

    if alone {
        let end = if line_end < source.len() { line_end + 1 } else { line_end };
        return line_start..end;
    }

    // `import os; import sys` keeps the second statement valid
    let rest = &source[range.end..line_end];
    let trimmed = rest.trim_start();
    if let Some(after_semicolon) = trimmed.strip_prefix(';') {
        let skipped = rest.len() - after_semicolon.trim_start().len();
        return range.start..range.end + skipped;
    }

    range.clone()
}
