//! File-level import graph implementation using petgraph.
//!
//! Nodes are project files, edges point from the importing file to the
//! file it imports and carry the names it asks for. The graph answers the
//! cross-file half of usage resolution: "which other files import `name`
//! from this file?" and "which files take this file's whole namespace?"

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A symbol requested across an edge, with the position of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub name: String,
    /// Line number in the importing file (1-indexed)
    pub line: usize,
    /// Column in the importing file (0-indexed)
    pub column: usize,
}

impl ImportedName {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            line,
            column,
        }
    }
}

/// Position of an import that takes a module's whole namespace, such as
/// Python `import pkg` or `from pkg import *`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceImport {
    /// Line number in the importing file (1-indexed)
    pub line: usize,
    /// Column in the importing file (0-indexed)
    pub column: usize,
    /// `from pkg import *`, which only sees the names `__all__` lists when
    /// the target defines it
    pub wildcard: bool,
}

/// Represents an edge in the import graph.
///
/// One edge per (importer, target) pair; repeated imports between the same
/// files accumulate on the existing edge.
#[derive(Debug, Clone, Default)]
pub struct ImportEdge {
    /// Names imported from the target
    pub names: Vec<ImportedName>,
    /// Imports of the target's whole namespace
    pub namespaces: Vec<NamespaceImport>,
}

/// A directed graph of imports between project files.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use importsweep::graph::{ImportGraph, ImportedName};
///
/// let mut graph = ImportGraph::new();
/// graph.add_import(
///     Path::new("app.py"),
///     Path::new("pkg/__init__.py"),
///     Some(ImportedName::new("User", 1, 17)),
/// );
///
/// let uses = graph.uses_of(Path::new("pkg/__init__.py"), "User");
/// assert_eq!(uses.len(), 1);
/// assert_eq!(uses[0].0, Path::new("app.py"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    graph: DiGraph<PathBuf, ImportEdge>,
    /// Maps file paths to their node indices for O(1) lookup
    node_indices: HashMap<PathBuf, NodeIndex>,
}

impl ImportGraph {
    /// Creates a new empty import graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a file to the graph, returning its existing index if present.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(path.to_path_buf());
        self.node_indices.insert(path.to_path_buf(), idx);
        idx
    }

    /// Records that `from` imports `name` (or just the module) from `to`.
    ///
    /// Self-imports are ignored and return `false`.
    pub fn add_import(&mut self, from: &Path, to: &Path, name: Option<ImportedName>) -> bool {
        let Some(edge) = self.edge_mut(from, to) else {
            return false;
        };
        edge.names.extend(name);
        true
    }

    /// Records that `from` takes the whole namespace of `to`.
    ///
    /// Self-imports are ignored and return `false`.
    pub fn add_namespace_import(&mut self, from: &Path, to: &Path, site: NamespaceImport) -> bool {
        let Some(edge) = self.edge_mut(from, to) else {
            return false;
        };
        edge.namespaces.push(site);
        true
    }

    fn edge_mut(&mut self, from: &Path, to: &Path) -> Option<&mut ImportEdge> {
        if from == to {
            return None;
        }

        let from_idx = self.add_file(from);
        let to_idx = self.add_file(to);

        let edge_idx = match self.graph.find_edge(from_idx, to_idx) {
            Some(idx) => idx,
            None => self.graph.add_edge(from_idx, to_idx, ImportEdge::default()),
        };
        self.graph.edge_weight_mut(edge_idx)
    }

    /// Returns every place another file imports `name` from `target`.
    pub fn uses_of(&self, target: &Path, name: &str) -> Vec<(&Path, &ImportedName)> {
        let Some(&idx) = self.node_indices.get(target) else {
            return Vec::new();
        };

        let mut uses: Vec<(&Path, &ImportedName)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .flat_map(|edge| {
                let importer = self.graph[edge.source()].as_path();
                edge.weight()
                    .names
                    .iter()
                    .filter(move |imported| imported.name == name)
                    .map(move |imported| (importer, imported))
            })
            .collect();

        uses.sort_by(|a, b| a.0.cmp(b.0).then(a.1.line.cmp(&b.1.line)));
        uses
    }

    /// Returns every place another file takes the whole namespace of `target`.
    pub fn namespace_uses_of(&self, target: &Path) -> Vec<(&Path, &NamespaceImport)> {
        let Some(&idx) = self.node_indices.get(target) else {
            return Vec::new();
        };

        let mut uses: Vec<(&Path, &NamespaceImport)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .flat_map(|edge| {
                let importer = self.graph[edge.source()].as_path();
                edge.weight()
                    .namespaces
                    .iter()
                    .map(move |site| (importer, site))
            })
            .collect();

        uses.sort_by(|a, b| a.0.cmp(b.0).then(a.1.line.cmp(&b.1.line)));
        uses
    }

    /// Checks if the import graph contains any cycles.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the number of file-to-file edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
