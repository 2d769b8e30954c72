//! Run configuration
//!
//! Inputs come from, in decreasing precedence: command-line flags,
//! environment variables (handled by clap), the optional YAML config file,
//! and built-in defaults. Every relative path is resolved against an explicit
//! working directory; nothing here reads or changes the process current
//! directory.

pub mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CollectArgs;
use crate::detector::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::error::{LicenseCollectError, Result};
use crate::process::RunPolicy;

pub use file::{CONFIG_FILE_NAME, FileConfig};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "dependency-licenses";

/// Default timeout for one external command, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retries after a failed external command
pub const DEFAULT_RETRIES: u32 = 2;

/// Fully resolved settings for one collect run
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Directory relative paths were resolved against
    pub working_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Directory of the manifest; external tools run here
    pub manifest_dir: PathBuf,
    pub self_license_path: PathBuf,
    pub self_notice_path: PathBuf,
    pub output_dir: PathBuf,
    pub project_name: String,
    /// Minimum accepted detector confidence, in percent
    pub confidence: f64,
    /// Parallel detector invocations
    pub jobs: usize,
    pub policy: RunPolicy,
    pub go_bin: String,
    pub detector_bin: String,
    /// Whether to run `go mod download` first
    pub download: bool,
    /// Module coordinates excluded from the bundle
    pub skip: Vec<String>,
}

fn resolve_path(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

impl CollectConfig {
    /// Build the configuration for `args`, resolving paths against `working_dir`
    pub fn resolve(args: &CollectArgs, working_dir: &Path) -> Result<Self> {
        let manifest = resolve_path(working_dir, &args.dependency);
        let manifest_path =
            dunce::canonicalize(&manifest).map_err(|_| LicenseCollectError::ManifestNotFound {
                path: manifest.display().to_string(),
            })?;
        if !manifest_path.is_file() {
            return Err(LicenseCollectError::ManifestNotFound {
                path: manifest_path.display().to_string(),
            });
        }
        let manifest_dir = manifest_path
            .parent()
            .map_or_else(|| working_dir.to_path_buf(), Path::to_path_buf);

        let file = match &args.config {
            Some(path) => FileConfig::load(&resolve_path(working_dir, path))?,
            None => FileConfig::load_optional(&manifest_dir.join(CONFIG_FILE_NAME))?,
        };

        let output_dir = args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let config = Self {
            working_dir: working_dir.to_path_buf(),
            self_license_path: args
                .license
                .as_deref()
                .map_or_else(|| manifest_dir.join("LICENSE"), |p| resolve_path(working_dir, p)),
            self_notice_path: args
                .notice
                .as_deref()
                .map_or_else(|| manifest_dir.join("NOTICE"), |p| resolve_path(working_dir, p)),
            output_dir: resolve_path(working_dir, &output_dir),
            project_name: args
                .project_name
                .clone()
                .or(file.project_name)
                .unwrap_or_default(),
            confidence: args
                .confidence
                .or(file.confidence)
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            jobs: args.jobs.or(file.jobs).unwrap_or(1),
            policy: RunPolicy {
                timeout: Duration::from_secs(
                    args.timeout
                        .or(file.timeout_secs)
                        .unwrap_or(DEFAULT_TIMEOUT_SECS),
                ),
                retries: args.retries.or(file.retries).unwrap_or(DEFAULT_RETRIES),
                ..RunPolicy::default()
            },
            go_bin: args.go_bin.clone(),
            detector_bin: args.detector_bin.clone(),
            download: !args.skip_download,
            skip: file.skip,
            manifest_path,
            manifest_dir,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(LicenseCollectError::ConfigInvalid {
                message: format!("confidence must be between 0 and 100, got {}", self.confidence),
            });
        }
        if self.jobs == 0 {
            return Err(LicenseCollectError::ConfigInvalid {
                message: "jobs must be at least 1".to_string(),
            });
        }
        if self.policy.timeout.is_zero() {
            return Err(LicenseCollectError::ConfigInvalid {
                message: "timeout must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dependency: &str) -> CollectArgs {
        CollectArgs {
            dependency: PathBuf::from(dependency),
            go_bin: "go".to_string(),
            detector_bin: "licensee".to_string(),
            ..CollectArgs::default()
        }
    }

    fn module(temp: &TempDir) -> PathBuf {
        let dir = temp.path().join("svc");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("go.mod"), "module example.com/svc\n").unwrap();
        dir
    }

    #[test]
    fn test_defaults_next_to_manifest() {
        let temp = TempDir::new().unwrap();
        let dir = dunce::canonicalize(module(&temp)).unwrap();

        let config = CollectConfig::resolve(&args("svc/go.mod"), temp.path()).unwrap();

        assert_eq!(config.manifest_dir, dir);
        assert_eq!(config.self_license_path, dir.join("LICENSE"));
        assert_eq!(config.self_notice_path, dir.join("NOTICE"));
        assert_eq!(config.output_dir, temp.path().join(DEFAULT_OUTPUT_DIR));
        assert!((config.confidence - 95.0).abs() < f64::EPSILON);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.policy.retries, DEFAULT_RETRIES);
        assert!(config.download);
        assert_eq!(config.project_name, "");
    }

    #[test]
    fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let result = CollectConfig::resolve(&args("nope/go.mod"), temp.path());
        assert!(matches!(
            result,
            Err(LicenseCollectError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_config_file_fills_unset_flags() {
        let temp = TempDir::new().unwrap();
        let dir = module(&temp);
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            "project_name: From File\nconfidence: 90\njobs: 4\nskip:\n  - example.com/tools\n",
        )
        .unwrap();

        let mut cli_args = args("svc/go.mod");
        cli_args.jobs = Some(2);
        let config = CollectConfig::resolve(&cli_args, temp.path()).unwrap();

        assert_eq!(config.project_name, "From File");
        assert!((config.confidence - 90.0).abs() < f64::EPSILON);
        assert_eq!(config.jobs, 2);
        assert_eq!(config.skip, vec!["example.com/tools".to_string()]);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        module(&temp);
        let mut cli_args = args("svc/go.mod");
        cli_args.config = Some(PathBuf::from("missing.yaml"));

        let result = CollectConfig::resolve(&cli_args, temp.path());
        assert!(matches!(result, Err(LicenseCollectError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_confidence() {
        let temp = TempDir::new().unwrap();
        module(&temp);
        let mut cli_args = args("svc/go.mod");
        cli_args.confidence = Some(150.0);

        let result = CollectConfig::resolve(&cli_args, temp.path());
        assert!(matches!(result, Err(LicenseCollectError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let temp = TempDir::new().unwrap();
        module(&temp);
        let mut cli_args = args("svc/go.mod");
        cli_args.jobs = Some(0);

        assert!(CollectConfig::resolve(&cli_args, temp.path()).is_err());
    }

    #[test]
    fn test_absolute_output_dir_kept() {
        let temp = TempDir::new().unwrap();
        module(&temp);
        let out = temp.path().join("elsewhere");
        let mut cli_args = args("svc/go.mod");
        cli_args.output_dir = Some(out.clone());

        let config = CollectConfig::resolve(&cli_args, temp.path()).unwrap();
        assert_eq!(config.output_dir, out);
    }
}
