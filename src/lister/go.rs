//! Go modules lister backed by the `go` command

use std::path::{Path, PathBuf};

use crate::domain::Dependency;
use crate::error::{LicenseCollectError, Result};
use crate::process::{self, RunPolicy, ToolCommand};

use super::DependencyLister;
use super::parse::{escape_cache_path, parse_module_list};

/// Lists dependencies with `go list -m all` and locates them in the module cache
#[derive(Debug, Clone)]
pub struct GoModLister {
    go_bin: String,
    module_cache: PathBuf,
    policy: RunPolicy,
}

impl GoModLister {
    /// Create a lister with an already known module cache root
    pub fn with_module_cache(
        go_bin: impl Into<String>,
        module_cache: impl Into<PathBuf>,
        policy: RunPolicy,
    ) -> Self {
        Self {
            go_bin: go_bin.into(),
            module_cache: module_cache.into(),
            policy,
        }
    }

    /// Create a lister, asking the `go` tool where its module cache lives
    pub fn discover(go_bin: impl Into<String>, manifest_dir: &Path, policy: RunPolicy) -> Result<Self> {
        let go_bin = go_bin.into();
        let command = ToolCommand::new(&go_bin, manifest_dir).args(["env", "GOMODCACHE", "GOPATH"]);
        let output = process::retry(&policy, "go env", || {
            process::run(&command, policy.timeout)?.require_success(&command)
        })?;

        let module_cache = module_cache_from_env_output(&output.stdout).ok_or_else(|| {
            LicenseCollectError::ToolFailed {
                command: command.display(),
                reason: "could not determine the module cache directory".to_string(),
            }
        })?;
        tracing::debug!(module_cache = %module_cache.display(), "resolved module cache");

        Ok(Self::with_module_cache(go_bin, module_cache, policy))
    }

    fn run_go(&self, manifest_dir: &Path, args: &[&str], label: &str) -> Result<String> {
        let command = ToolCommand::new(&self.go_bin, manifest_dir).args(args.iter().copied());
        let output = process::retry(&self.policy, label, || {
            process::run(&command, self.policy.timeout)?.require_success(&command)
        })?;
        Ok(output.stdout)
    }
}

/// Pick the module cache from `go env GOMODCACHE GOPATH` output.
///
/// Falls back to the first `GOPATH` entry, then to `~/go`, when `GOMODCACHE`
/// is empty.
fn module_cache_from_env_output(stdout: &str) -> Option<PathBuf> {
    let mut lines = stdout.lines().map(str::trim);
    let gomodcache = lines.next().unwrap_or_default();
    if !gomodcache.is_empty() {
        return Some(PathBuf::from(gomodcache));
    }

    let gopath = lines.next().unwrap_or_default();
    if let Some(first) = std::env::split_paths(gopath).find(|p| !p.as_os_str().is_empty()) {
        return Some(first.join("pkg").join("mod"));
    }

    dirs::home_dir().map(|home| home.join("go").join("pkg").join("mod"))
}

impl DependencyLister for GoModLister {
    fn list(&self, manifest_dir: &Path) -> Result<Vec<Dependency>> {
        let stdout = self.run_go(manifest_dir, &["list", "-m", "all"], "go list")?;
        let dependencies = parse_module_list(&stdout);
        tracing::info!(count = dependencies.len(), "listed dependencies");
        Ok(dependencies)
    }

    fn fetch(&self, manifest_dir: &Path) -> Result<()> {
        self.run_go(manifest_dir, &["mod", "download"], "go mod download")?;
        Ok(())
    }

    fn source_dir(&self, dependency: &Dependency) -> PathBuf {
        self.module_cache.join(format!(
            "{}@{}",
            escape_cache_path(&dependency.name),
            escape_cache_path(&dependency.version)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_cache_prefers_gomodcache() {
        let cache = module_cache_from_env_output("/cache/mod\n/home/u/go\n").unwrap();
        assert_eq!(cache, PathBuf::from("/cache/mod"));
    }

    #[cfg(unix)]
    #[test]
    fn test_module_cache_falls_back_to_first_gopath_entry() {
        let cache = module_cache_from_env_output("\n/a/go:/b/go\n").unwrap();
        assert_eq!(cache, PathBuf::from("/a/go/pkg/mod"));
    }

    #[test]
    fn test_source_dir_is_escaped() {
        let lister = GoModLister::with_module_cache("go", "/cache", RunPolicy::default());
        let dep = Dependency::new("github.com/BurntSushi/toml", "v1.2.0");
        assert_eq!(
            lister.source_dir(&dep),
            PathBuf::from("/cache/github.com/!burnt!sushi/toml@v1.2.0")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_list_runs_in_manifest_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("fake-go");
        std::fs::write(
            &script,
            "#!/bin/sh\n[ -f go.mod ] || exit 3\necho example.com/main\necho github.com/a/b v1.0.0\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let module_dir = temp.path().join("module");
        std::fs::create_dir(&module_dir).unwrap();
        std::fs::write(module_dir.join("go.mod"), "module example.com/main\n").unwrap();

        let lister = GoModLister::with_module_cache(
            script.display().to_string(),
            temp.path().join("cache"),
            RunPolicy::default(),
        );
        let deps = lister.list(&module_dir).unwrap();

        assert_eq!(deps, vec![Dependency::new("github.com/a/b", "v1.0.0")]);
    }
}
