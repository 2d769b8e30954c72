//! Collect command implementation
//!
//! This command resolves the configuration, wires the Go lister and the
//! licensee detector into the pipeline, writes the bundle and prints a
//! short summary on stdout. Ctrl-C stops the run after the dependency in
//! flight; nothing is written in that case.

use std::path::Path;

use console::Style;

use crate::bundle::{BundleText, BundleWriter, read_self_document};
use crate::cli::CollectArgs;
use crate::config::CollectConfig;
use crate::detector::LicenseeDetector;
use crate::error::Result;
use crate::lister::GoModLister;
use crate::pipeline::{CancellationToken, CollectReport, Pipeline, PipelineOptions};

/// Run collect command
pub fn run(working_dir: &Path, args: CollectArgs) -> Result<()> {
    let config = CollectConfig::resolve(&args, working_dir)?;
    tracing::debug!(
        manifest = %config.manifest_path.display(),
        output = %config.output_dir.display(),
        jobs = config.jobs,
        confidence = config.confidence,
        "resolved configuration"
    );

    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);

    let report = collect(&config, cancel).inspect_err(|e| {
        if e.is_output_failure() {
            tracing::error!(
                output = %config.output_dir.display(),
                "bundle not written, output directory left unchanged"
            );
        }
    })?;
    print_summary(&report);
    Ok(())
}

/// Cancel `cancel` on Ctrl-C. Failing to register only costs a clean stop.
fn install_interrupt_handler(cancel: &CancellationToken) {
    let token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        tracing::warn!("interrupted, stopping after the current dependency");
        token.cancel();
    });
    if let Err(e) = installed {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }
}

/// Run the whole pipeline for an already resolved configuration
pub fn collect(config: &CollectConfig, cancel: CancellationToken) -> Result<CollectReport> {
    let lister = GoModLister::discover(&config.go_bin, &config.manifest_dir, config.policy)?;
    let detector =
        LicenseeDetector::new(&config.detector_bin, config.confidence, config.policy);

    let text = BundleText {
        project_name: config.project_name.clone(),
        self_license: read_self_document(&config.self_license_path)?,
        self_notice: read_self_document(&config.self_notice_path)?,
    };

    let options = PipelineOptions {
        confidence: config.confidence,
        jobs: config.jobs,
        download: config.download,
        skip: config.skip.clone(),
    };

    Pipeline::new(&lister, &detector, options)
        .with_cancellation(cancel)
        .run(
            &config.manifest_dir,
            &BundleWriter::new(&config.output_dir),
            &text,
        )
}

fn print_summary(report: &CollectReport) {
    let analysis = &report.analysis;
    println!(
        "{} {} dependencies, {} with an accepted license",
        Style::new().bold().green().apply_to("Collected"),
        analysis.dependencies,
        analysis.resolved()
    );
    println!(
        "  {} license group(s), {} notice group(s), {} file(s) in {}",
        report.bundle.license_groups,
        report.bundle.notice_groups,
        report.bundle.files.len(),
        report.bundle.output_dir.display()
    );
    if !analysis.diagnostics.is_empty() {
        println!(
            "  {} {} dependencies need attention (see warnings above)",
            Style::new().bold().yellow().apply_to("!"),
            analysis.diagnostics.len()
        );
    }
}
