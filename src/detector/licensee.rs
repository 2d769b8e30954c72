//! `licensee` command-line detector

use std::path::Path;

use crate::error::{LicenseCollectError, Result};
use crate::process::{self, RunPolicy, ToolCommand};

use super::LicenseDetector;
use super::report::DetectorReport;

/// Runs `licensee detect --json` on a dependency directory
#[derive(Debug, Clone)]
pub struct LicenseeDetector {
    program: String,
    confidence: f64,
    policy: RunPolicy,
}

impl LicenseeDetector {
    pub fn new(program: impl Into<String>, confidence: f64, policy: RunPolicy) -> Self {
        Self {
            program: program.into(),
            confidence,
            policy,
        }
    }

    fn command(&self, dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.program, dir)
            .args(["detect", "--json", "--no-packages"])
            .arg(format!("--confidence={}", self.confidence))
            .arg(dir.display().to_string())
    }
}

/// Parse detector stdout.
///
/// licensee exits non-zero when nothing matched, so the exit status is not
/// consulted; empty output is.
pub fn parse_report(command: &ToolCommand, stdout: &str, stderr: &str) -> Result<DetectorReport> {
    if stdout.trim().is_empty() {
        return Err(LicenseCollectError::ToolFailed {
            command: command.display(),
            reason: format!("no output: {}", stderr.trim()),
        });
    }
    Ok(serde_json::from_str(stdout)?)
}

impl LicenseDetector for LicenseeDetector {
    fn detect(&self, dir: &Path) -> Result<DetectorReport> {
        let command = self.command(dir);
        process::retry(&self.policy, "license detection", || {
            let output = process::run(&command, self.policy.timeout)?;
            parse_report(&command, &output.stdout, &output.stderr)
        })
    }
}
