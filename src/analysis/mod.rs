//! Source code analysis module for importsweep.
//!
//! This module provides tools for analyzing Python, JavaScript and
//! TypeScript source code to find module-level imports and the identifier
//! references that keep them alive.
//!
//! # Features
//!
//! - Parse Python `import` / `from ... import` statements
//! - Parse ES6 `import` statements (default, named, namespace, side-effect)
//! - Parse CommonJS `require()` and TypeScript `import x = require()` statements
//! - Collect identifier and type references outside of import statements
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use importsweep::analysis::ImportAnalyzer;
//!
//! let mut analyzer = ImportAnalyzer::new()?;
//! let (_text, analysis) = analyzer.analyze_file(Path::new("app/main.py"))?;
//!
//! for statement in &analysis.statements {
//!     for binding in &statement.bindings {
//!         let used = analysis.references_to(&binding.local).next().is_some();
//!         println!("{} (line {}): used={}", binding.name, binding.line, used);
//!     }
//! }
//! ```

mod analyzer;
mod javascript;
mod language;
mod python;
mod references;
mod types;

// Re-export main types for convenience
pub use analyzer::{AnalysisError, AnalysisResult, FileAnalysis, ImportAnalyzer};
pub use language::SourceLanguage;
pub use types::{
    BindingRole, ImportBinding, ImportStatement, Reference, StatementKind, WildcardImport,
};
