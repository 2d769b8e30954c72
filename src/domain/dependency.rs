//! Dependency domain types

use std::fmt;
use std::path::PathBuf;

/// A dependency as produced by the lister: a module coordinate and a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Module coordinate, e.g. `github.com/spf13/cobra`
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `name@version`, the form used in diagnostics and module cache paths
    pub fn coordinate(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Content-addressed digest of a file's raw bytes.
///
/// Ordered so it can serve as the tie-breaker when sorting groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A notice file found next to a dependency's sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeFile {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// The accepted license of a dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLicense {
    /// Short license code such as `MIT` or `Apache-2.0`
    pub id: String,
    /// Human-readable license title
    pub title: String,
    /// Absolute path of the matched license file
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// Everything known about one dependency once detection and hashing are done.
///
/// `license` is present only when detection succeeded above the confidence
/// threshold and the license file was read. `notice` is independent of it.
/// Output names are not stored here: they belong to groups and are assigned
/// by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub dependency: Dependency,
    pub license: Option<ResolvedLicense>,
    pub notice: Option<NoticeFile>,
}

impl DependencyRecord {
    pub fn name(&self) -> &str {
        &self.dependency.name
    }

    pub fn version(&self) -> &str {
        &self.dependency.version
    }

    /// Whether this record contributes to any section of the bundle
    pub fn is_empty(&self) -> bool {
        self.license.is_none() && self.notice.is_none()
    }
}
