//! importsweep - removes unused imports and publishes the change as a pull request
//!
//! This crate analyzes Python, JavaScript and TypeScript projects with
//! tree-sitter, removes imports that bind names nothing references, and
//! commits the result on a branch before opening a GitHub pull request.

pub mod analysis;
pub mod codebase;
pub mod codemod;
pub mod config;
pub mod graph;
pub mod vcs;

pub use codebase::{Codebase, CodebaseError, CodebaseResult, SourceCodebase};
pub use codemod::{remove_dead_imports, run, RemovalReport};
pub use config::RunConfig;
