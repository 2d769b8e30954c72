use clap::Parser;
use std::path::PathBuf;

/// Arguments for the collect command
#[derive(Parser, Debug, Clone, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Bundle licenses of a module:\n    license-collect collect --dependency ../service/go.mod\n\n\
                  Choose output directory and project name:\n    license-collect collect --dependency go.mod --output-dir dist/licenses --project-name \"Apache Demo\"\n\n\
                  Use a custom detector binary:\n    license-collect collect --dependency go.mod --detector-bin /opt/licensee/bin/licensee\n\n\
                  Detect in parallel with a shorter timeout:\n    license-collect collect --dependency go.mod --jobs 8 --timeout 30")]
pub struct CollectArgs {
    /// Module manifest (go.mod); its directory is the default location of LICENSE and NOTICE
    #[arg(long, visible_alias = "manifest", env = "LICENSE_COLLECT_MANIFEST")]
    pub dependency: PathBuf,

    /// Project LICENSE file (default: LICENSE next to the manifest)
    #[arg(long)]
    pub license: Option<PathBuf>,

    /// Project NOTICE file (default: NOTICE next to the manifest)
    #[arg(long)]
    pub notice: Option<PathBuf>,

    /// Output directory (default: ./dependency-licenses)
    #[arg(long, visible_alias = "outputdir")]
    pub output_dir: Option<PathBuf>,

    /// Project name inserted into document headers
    #[arg(long, visible_alias = "projectname")]
    pub project_name: Option<String>,

    /// Minimum detector confidence in percent (default: 95)
    #[arg(long, value_name = "PERCENT")]
    pub confidence: Option<f64>,

    /// Number of parallel detector invocations (default: 1)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Timeout for each external command in seconds (default: 120)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Retries after a failed external command (default: 2)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Go toolchain binary
    #[arg(long, env = "LICENSE_COLLECT_GO", default_value = "go")]
    pub go_bin: String,

    /// License detector binary
    #[arg(long, env = "LICENSE_COLLECT_DETECTOR", default_value = "licensee")]
    pub detector_bin: String,

    /// Skip `go mod download` before detection
    #[arg(long)]
    pub skip_download: bool,

    /// Configuration file (default: .license-collect.yaml next to the manifest, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
