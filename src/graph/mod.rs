//! Graph module for cross-file import relationships.
//!
//! This module provides the [`ImportGraph`] struct, a directed graph of
//! project files connected by the names they import from each other, and
//! the [`ModuleResolver`] that maps module specifiers to project files.
//!
//! # Example
//!
//! ```rust
//! use std::path::{Path, PathBuf};
//! use importsweep::analysis::SourceLanguage;
//! use importsweep::graph::{ImportGraph, ImportedName, ModuleResolver};
//!
//! let resolver = ModuleResolver::new(vec![PathBuf::from("lib.py"), PathBuf::from("app.py")]);
//! let target = resolver
//!     .resolve(Path::new("app.py"), "lib", SourceLanguage::Python)
//!     .unwrap();
//!
//! let mut graph = ImportGraph::new();
//! graph.add_import(Path::new("app.py"), &target, Some(ImportedName::new("helper", 1, 16)));
//!
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.uses_of(&target, "helper").len(), 1);
//! ```

mod import_graph;
mod resolve;

pub use import_graph::{ImportEdge, ImportGraph, ImportedName, NamespaceImport};
pub use resolve::{ModuleResolver, ECMASCRIPT_EXTENSIONS};
