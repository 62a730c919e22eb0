//! Shared types produced by source analysis.
//!
//! These describe what a single file looks like to the codemod: which
//! module-level import statements it contains, which local names each
//! statement binds, and every identifier reference elsewhere in the file.

use std::ops::Range;

/// How an import statement is written, which determines how it is
/// re-rendered when only some of its bindings are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// Python `import a, b.c as d`
    PythonImport,
    /// Python `from module import a, b as c`
    PythonFrom {
        /// Module text exactly as written (e.g. `..pkg`)
        module_text: String,
    },
    /// ES module `import ... from 'module'`
    EsImport {
        /// Leading keywords, `import` or `import type`
        head: String,
        /// Source string including its quotes
        source_text: String,
        /// Whether the statement ended with a semicolon
        semicolon: bool,
    },
    /// CommonJS `const x = require('module')`
    Require,
    /// Statement that binds nothing: `import 'module'`, `require('module');`
    SideEffect,
}

/// The syntactic position a binding occupies in its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRole {
    /// Python `import a` / `import a.b as c`
    Module,
    /// Python `from m import a`
    Member,
    /// ES default import: `import foo from 'm'`
    Default,
    /// ES namespace import: `import * as foo from 'm'`
    Namespace,
    /// ES named import: `import { foo } from 'm'`
    Named,
    /// CommonJS binding of the whole module
    Entire,
}

/// One local name introduced by an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Display name. The local name, except for un-aliased dotted Python
    /// module imports where it is the full dotted path.
    pub name: String,
    /// Identifier bound in the importing file
    pub local: String,
    /// Symbol requested from the source module, if any
    pub imported: Option<String>,
    /// Module the binding comes from
    pub module: String,
    pub role: BindingRole,
    /// Source text of the specifier (e.g. `foo as bar`)
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column (0-indexed)
    pub column: usize,
}

/// A module-level import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Source module, when the statement names exactly one
    pub module: Option<String>,
    pub kind: StatementKind,
    /// Byte range of the statement in the file
    pub range: Range<usize>,
    /// Line number (1-indexed)
    pub line: usize,
    pub bindings: Vec<ImportBinding>,
}

impl ImportStatement {
    /// Returns true if this statement exists only for its side effects.
    pub fn is_side_effect_only(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A module-level `from module import *`. It binds no single name, so it is
/// never rewritten, but it still pulls in the module's whole namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardImport {
    /// Module text exactly as written
    pub module: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column (0-indexed)
    pub column: usize,
}

/// An identifier occurrence outside the module-level import statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_effect_only() {
        let stmt = ImportStatement {
            module: Some("polyfills".to_string()),
            kind: StatementKind::SideEffect,
            range: 0..18,
            line: 1,
            bindings: vec![],
        };
        assert!(stmt.is_side_effect_only());
    }
}
