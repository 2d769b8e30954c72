//! Domain types shared by every pipeline stage
//!
//! A dependency moves through the pipeline as a sequence of types:
//! [`Dependency`] (listed) → [`crate::detector::classify::Detection`] (license matched)
//! → [`DependencyRecord`] (fingerprinted) → group membership in
//! [`crate::aggregate::Aggregation`] → emitted by [`crate::bundle`].
//! Dependencies that fall out along the way leave a [`Diagnostic`] behind.

pub mod dependency;
pub mod diagnostic;

pub use dependency::{Dependency, DependencyRecord, Fingerprint, NoticeFile, ResolvedLicense};
pub use diagnostic::{Diagnostic, DiagnosticKind};
