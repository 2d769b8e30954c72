//! Dependency listing
//!
//! The lister turns a module manifest into the flat, ordered list of
//! dependencies and tells the pipeline where each dependency's extracted
//! sources live. The order returned here is the order members appear in
//! every emitted section.

pub mod go;
pub mod parse;

use std::path::{Path, PathBuf};

use crate::domain::Dependency;
use crate::error::Result;

pub use go::GoModLister;

/// Source of the transitive dependency list for a module
pub trait DependencyLister: Sync {
    /// List every transitive dependency, main module excluded
    fn list(&self, manifest_dir: &Path) -> Result<Vec<Dependency>>;

    /// Make dependency sources available locally (e.g. download into a cache)
    fn fetch(&self, manifest_dir: &Path) -> Result<()>;

    /// Directory holding the extracted sources of `dependency`
    fn source_dir(&self, dependency: &Dependency) -> PathBuf;
}
