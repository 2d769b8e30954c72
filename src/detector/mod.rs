//! License detection
//!
//! The detector itself is an external collaborator behind
//! [`LicenseDetector`]; this module also owns the rules for accepting its
//! answers ([`classify`]) and for finding notice files ([`notice`]).

pub mod classify;
pub mod licensee;
pub mod notice;
pub mod report;

use std::path::Path;

use crate::error::Result;

pub use classify::{Classification, DEFAULT_CONFIDENCE_THRESHOLD, classify};
pub use licensee::LicenseeDetector;
pub use notice::find_notice_file;
pub use report::DetectorReport;

/// Best-effort license classifier for a directory of sources
pub trait LicenseDetector: Sync {
    /// Scan `dir` and report candidate license files, best match first
    fn detect(&self, dir: &Path) -> Result<DetectorReport>;
}
