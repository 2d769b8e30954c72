//! Structured detector output
//!
//! Mirrors the subset of `licensee detect --json` that the pipeline reads.
//! Unknown fields are ignored.

use serde::Deserialize;

/// Full detector result for one directory
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectorReport {
    /// License metadata for every license referenced by a matched file
    #[serde(default)]
    pub licenses: Vec<LicenseInfo>,
    /// Candidate files, best match first
    #[serde(default)]
    pub matched_files: Vec<MatchedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub meta: Option<LicenseMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LicenseMeta {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchedFile {
    /// File name relative to the scanned directory
    pub filename: String,
    #[serde(default)]
    pub matched_license: Option<String>,
    #[serde(default)]
    pub matcher: Option<Matcher>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Matcher {
    #[serde(default)]
    pub name: Option<String>,
    /// Percentage in `0..=100`
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl MatchedFile {
    pub fn confidence(&self) -> f64 {
        self.matcher
            .as_ref()
            .and_then(|m| m.confidence)
            .unwrap_or(0.0)
    }
}

impl DetectorReport {
    /// Title of `license_id`, falling back to the first listed license
    pub fn title_for(&self, license_id: &str) -> Option<&str> {
        fn title_of(info: &LicenseInfo) -> Option<&str> {
            info.meta.as_ref().and_then(|m| m.title.as_deref())
        }

        self.licenses
            .iter()
            .find(|info| info.spdx_id.as_deref() == Some(license_id))
            .and_then(title_of)
            .or_else(|| self.licenses.first().and_then(title_of))
    }
}
