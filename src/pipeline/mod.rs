//! Collection pipeline
//!
//! Coordinates the stages in one direction only:
//! lister → detector → hasher → aggregator → bundle writer.
//!
//! Detection may run on a bounded worker pool, but results are always put
//! back into dependency-list order before anything is grouped, so the output
//! does not depend on which detector call finished first. Cancellation is
//! checked between dependencies; a cancelled run never reaches the writer.

pub mod cancel;

use std::path::Path;

use rayon::prelude::*;

use crate::aggregate::{Aggregation, aggregate};
use crate::bundle::{BundleSummary, BundleText, BundleWriter};
use crate::detector::{Classification, LicenseDetector, classify, find_notice_file};
use crate::domain::{
    Dependency, DependencyRecord, Diagnostic, DiagnosticKind, NoticeFile, ResolvedLicense,
};
use crate::error::{LicenseCollectError, Result};
use crate::hash::fingerprint_file;
use crate::lister::DependencyLister;
use crate::progress::ProgressDisplay;

pub use cancel::CancellationToken;

/// Knobs of the pipeline that do not belong to a collaborator
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Minimum accepted detector confidence, in percent
    pub confidence: f64,
    /// Parallel detector invocations; 1 means sequential
    pub jobs: usize,
    /// Whether to ask the lister to fetch sources first
    pub download: bool,
    /// Module coordinates to leave out
    pub skip: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            confidence: crate::detector::DEFAULT_CONFIDENCE_THRESHOLD,
            jobs: 1,
            download: true,
            skip: Vec::new(),
        }
    }
}

/// Result of examining a single dependency
#[derive(Debug, Clone)]
struct Examined {
    record: DependencyRecord,
    diagnostics: Vec<Diagnostic>,
}

/// Records and diagnostics for every listed dependency, in listing order
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub dependencies: usize,
    pub records: Vec<DependencyRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Dependencies with an accepted, fingerprinted license
    pub fn resolved(&self) -> usize {
        self.records.iter().filter(|r| r.license.is_some()).count()
    }
}

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct CollectReport {
    pub analysis: Analysis,
    pub aggregation: Aggregation,
    pub bundle: BundleSummary,
}

/// The collection pipeline over a lister and a detector
pub struct Pipeline<'a> {
    lister: &'a dyn DependencyLister,
    detector: &'a dyn LicenseDetector,
    options: PipelineOptions,
    cancel: CancellationToken,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        lister: &'a dyn DependencyLister,
        detector: &'a dyn LicenseDetector,
        options: PipelineOptions,
    ) -> Self {
        Self {
            lister,
            detector,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to abort the run between dependencies
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// List, detect and fingerprint every dependency of the module in `manifest_dir`
    pub fn analyse(&self, manifest_dir: &Path) -> Result<Analysis> {
        if self.options.download {
            tracing::info!("downloading dependency sources");
            self.lister.fetch(manifest_dir)?;
        }

        let dependencies: Vec<Dependency> = self
            .lister
            .list(manifest_dir)?
            .into_iter()
            .filter(|d| {
                let skipped = self.options.skip.iter().any(|s| *s == d.name);
                if skipped {
                    tracing::debug!(dependency = %d, "skipped by configuration");
                }
                !skipped
            })
            .collect();

        let progress = ProgressDisplay::new(dependencies.len() as u64);
        let examined = if self.options.jobs > 1 {
            self.examine_parallel(&dependencies, &progress)
        } else {
            self.examine_sequential(&dependencies, &progress)
        };
        let examined = match examined {
            Ok(examined) => examined,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        progress.finish();

        let mut analysis = Analysis {
            dependencies: dependencies.len(),
            ..Analysis::default()
        };
        for item in examined {
            for diagnostic in &item.diagnostics {
                diagnostic.log();
            }
            analysis.diagnostics.extend(item.diagnostics);
            if !item.record.is_empty() {
                analysis.records.push(item.record);
            }
        }

        tracing::info!(
            dependencies = analysis.dependencies,
            resolved = analysis.resolved(),
            diagnostics = analysis.diagnostics.len(),
            "license detection finished"
        );
        Ok(analysis)
    }

    /// Run every stage and write the bundle
    pub fn run(
        &self,
        manifest_dir: &Path,
        writer: &BundleWriter,
        text: &BundleText,
    ) -> Result<CollectReport> {
        let analysis = self.analyse(manifest_dir)?;
        if self.cancel.is_cancelled() {
            return Err(LicenseCollectError::Cancelled);
        }
        let aggregation = aggregate(&analysis.records);
        let bundle = writer.write(&aggregation, text)?;
        Ok(CollectReport {
            analysis,
            aggregation,
            bundle,
        })
    }

    fn examine_sequential(
        &self,
        dependencies: &[Dependency],
        progress: &ProgressDisplay,
    ) -> Result<Vec<Examined>> {
        let mut examined = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if self.cancel.is_cancelled() {
                return Err(LicenseCollectError::Cancelled);
            }
            progress.advance(&dependency.coordinate());
            examined.push(self.examine(dependency));
        }
        Ok(examined)
    }

    fn examine_parallel(
        &self,
        dependencies: &[Dependency],
        progress: &ProgressDisplay,
    ) -> Result<Vec<Examined>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
            .map_err(|e| LicenseCollectError::IoError {
                message: format!("could not start detector workers: {e}"),
            })?;

        // Indexed collect keeps dependency-list order regardless of completion order.
        let examined: Vec<Option<Examined>> = pool.install(|| {
            dependencies
                .par_iter()
                .map(|dependency| {
                    if self.cancel.is_cancelled() {
                        return None;
                    }
                    progress.advance(&dependency.coordinate());
                    Some(self.examine(dependency))
                })
                .collect()
        });

        if self.cancel.is_cancelled() {
            return Err(LicenseCollectError::Cancelled);
        }
        examined
            .into_iter()
            .map(|item| item.ok_or(LicenseCollectError::Cancelled))
            .collect()
    }

    /// Detect, classify and fingerprint one dependency.
    ///
    /// Never fails: every problem becomes a diagnostic and the affected part
    /// of the record is left empty.
    fn examine(&self, dependency: &Dependency) -> Examined {
        let dir = self.lister.source_dir(dependency);
        let mut diagnostics = Vec::new();
        // An unresolved dependency is left out of both documents.
        let mut wants_notice = true;

        let license = match self.detector.detect(&dir) {
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ToolFailure,
                    dependency,
                    format!("license detection failed: {e}"),
                ));
                None
            }
            Ok(report) => match classify(&report, &dir, self.options.confidence) {
                Classification::Unresolved { reason } => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::Unresolved,
                        dependency,
                        format!("cannot determine license: {reason}"),
                    ));
                    wants_notice = false;
                    None
                }
                Classification::Resolved(detection) => {
                    if detection.is_conflict() {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::Conflict,
                            dependency,
                            format!(
                                "several license files with differing licenses ({}), using {}",
                                detection.candidate_ids.join(", "),
                                detection.license_id
                            ),
                        ));
                    }
                    match fingerprint_file(&detection.license_path) {
                        Ok(fingerprint) => {
                            tracing::debug!(
                                dependency = %dependency,
                                license = %detection.license_id,
                                confidence = detection.confidence,
                                "license detected"
                            );
                            Some(ResolvedLicense {
                                id: detection.license_id,
                                title: detection.license_title,
                                path: detection.license_path,
                                fingerprint,
                            })
                        }
                        Err(e) => {
                            diagnostics.push(Diagnostic::new(
                                DiagnosticKind::ReadFailure,
                                dependency,
                                e.to_string(),
                            ));
                            None
                        }
                    }
                }
            },
        };

        let notice = wants_notice
            .then(|| find_notice_file(&dir))
            .flatten()
            .and_then(|path| match fingerprint_file(&path) {
                Ok(fingerprint) => Some(NoticeFile { path, fingerprint }),
                Err(e) => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::ReadFailure,
                        dependency,
                        e.to_string(),
                    ));
                    None
                }
            });

        Examined {
            record: DependencyRecord {
                dependency: dependency.clone(),
                license,
                notice,
            },
            diagnostics,
        }
    }
}
