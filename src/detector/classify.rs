//! Acceptance of detector results
//!
//! A dependency is resolved only when its best candidate carries a license id
//! and reaches the confidence threshold. Several candidates with differing
//! ids are a conflict: the first candidate still wins, but the caller is told.

use std::path::{Path, PathBuf};

use super::report::DetectorReport;

/// Default minimum confidence, in percent
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 95.0;

/// An accepted license match
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub license_id: String,
    pub license_title: String,
    /// Absolute path of the matched file
    pub license_path: PathBuf,
    pub confidence: f64,
    /// Every distinct license id among the candidates, first match first.
    /// More than one entry means the detector disagreed with itself.
    pub candidate_ids: Vec<String>,
}

impl Detection {
    pub fn is_conflict(&self) -> bool {
        self.candidate_ids.len() > 1
    }
}

/// Outcome of classifying one detector report
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Resolved(Detection),
    Unresolved { reason: String },
}

/// Classify `report` for the directory `dir` against `threshold` percent
pub fn classify(report: &DetectorReport, dir: &Path, threshold: f64) -> Classification {
    let Some(best) = report.matched_files.first() else {
        return Classification::Unresolved {
            reason: "no license file found".to_string(),
        };
    };

    let Some(license_id) = best.matched_license.clone() else {
        return Classification::Unresolved {
            reason: format!("{} did not match a known license", best.filename),
        };
    };

    let confidence = best.confidence();
    if confidence < threshold {
        return Classification::Unresolved {
            reason: format!(
                "{license_id} match in {} has confidence {confidence} below threshold {threshold}",
                best.filename
            ),
        };
    }

    let mut candidate_ids: Vec<String> = Vec::new();
    for id in report
        .matched_files
        .iter()
        .filter_map(|f| f.matched_license.as_deref())
    {
        if !candidate_ids.iter().any(|seen| seen == id) {
            candidate_ids.push(id.to_string());
        }
    }

    let license_title = report
        .title_for(&license_id)
        .map_or_else(|| license_id.clone(), str::to_string);

    Classification::Resolved(Detection {
        license_title,
        license_path: dir.join(&best.filename),
        confidence,
        candidate_ids,
        license_id,
    })
}
