//! Per-dependency diagnostics
//!
//! Diagnostics describe problems that exclude a dependency from the bundle (or
//! merely taint it, for conflicts) without failing the run.

use std::fmt;

use super::Dependency;

/// What went wrong for a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No license match, or a match below the confidence threshold
    Unresolved,
    /// Several candidate files with differing license ids; the first was used
    Conflict,
    /// The matched license or notice file could not be read
    ReadFailure,
    /// The detector could not be run or produced unusable output
    ToolFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Unresolved => "unresolved",
            DiagnosticKind::Conflict => "conflict",
            DiagnosticKind::ReadFailure => "read failure",
            DiagnosticKind::ToolFailure => "tool failure",
        };
        f.write_str(label)
    }
}

/// A diagnostic tied to one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub dependency: Dependency,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, dependency: &Dependency, message: impl Into<String>) -> Self {
        Self {
            kind,
            dependency: dependency.clone(),
            message: message.into(),
        }
    }

    /// Emit this diagnostic as a structured warning
    pub fn log(&self) {
        let coordinate = self.dependency.coordinate();
        tracing::warn!(
            dependency = %coordinate,
            kind = %self.kind,
            "{coordinate}: {}",
            self.message
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.dependency, self.message)
    }
}
