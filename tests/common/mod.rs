//! Common test utilities for license-collect integration tests
//!
//! A [`TestWorkspace`] holds a Go module, a fake module cache and two shell
//! scripts standing in for `go` and `licensee`, so the real binary can run
//! end to end without network access or external tools.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const MIT_TEXT: &str = "MIT License\n\nCopyright (c) Example Authors\n\nPermission is hereby granted, free of charge...\n";
pub const APACHE_TEXT: &str = "Apache License\nVersion 2.0, January 2004\nhttp://www.apache.org/licenses/\n";

/// A test workspace for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    modules: Vec<String>,
}

impl TestWorkspace {
    /// Create a workspace with an `app` module and empty module cache
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let workspace = Self {
            temp,
            path,
            modules: Vec::new(),
        };
        workspace.write_file("app/go.mod", "module example.com/app\n\ngo 1.21\n");
        std::fs::create_dir_all(workspace.module_cache()).expect("Failed to create module cache");
        workspace.write_fake_tools();
        workspace
    }

    pub fn module_cache(&self) -> PathBuf {
        self.path.join("gomodcache")
    }

    pub fn manifest(&self) -> PathBuf {
        self.path.join("app/go.mod")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path.join("app/dependency-licenses")
    }

    /// Add a dependency to the module list and populate its cache directory.
    ///
    /// `detected` is the license reported by the fake detector as
    /// `(file, spdx id, confidence)`; `None` makes the detector fail.
    pub fn add_module(
        &mut self,
        name: &str,
        version: &str,
        files: &[(&str, &str)],
        detected: Option<(&str, &str, u32)>,
    ) -> &mut Self {
        let dir = self.module_cache().join(format!("{name}@{version}"));
        std::fs::create_dir_all(&dir).expect("Failed to create module directory");
        for (file, text) in files {
            std::fs::write(dir.join(file), text).expect("Failed to write module file");
        }
        if let Some((file, id, confidence)) = detected {
            let report = format!(
                r#"{{"licenses":[{{"key":"{key}","spdx_id":"{id}","meta":{{"title":"{id} License"}}}}],"matched_files":[{{"filename":"{file}","matched_license":"{id}","matcher":{{"name":"exact","confidence":{confidence}}}}}]}}"#,
                key = id.to_lowercase(),
            );
            std::fs::write(dir.join(".licensee.json"), report).expect("Failed to write report");
        }
        self.modules.push(format!("{name} {version}"));
        self.write_module_list();
        self
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the output directory
    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output_dir().join(name)).expect("Failed to read output file")
    }

    pub fn output_exists(&self, name: &str) -> bool {
        self.output_dir().join(name).exists()
    }

    /// `license-collect collect` for `app/go.mod`, wired to the fake tools
    pub fn collect_cmd(&self) -> Command {
        self.collect_cmd_for("go.mod")
    }

    /// `license-collect collect` for `manifest`, relative to the `app` directory
    pub fn collect_cmd_for(&self, manifest: &str) -> Command {
        let mut cmd = license_collect_cmd();
        cmd.current_dir(self.path.join("app"))
            .env_remove("LICENSE_COLLECT_LOG")
            .env_remove("LICENSE_COLLECT_WORKSPACE")
            .env_remove("LICENSE_COLLECT_MANIFEST")
            .args(["collect", "--dependency", manifest])
            .arg("--go-bin")
            .arg(self.path.join("bin/go"))
            .arg("--detector-bin")
            .arg(self.path.join("bin/licensee"));
        cmd
    }

    fn write_module_list(&self) {
        let mut list = String::from("example.com/app\n");
        for module in &self.modules {
            list.push_str(module);
            list.push('\n');
        }
        self.write_file("modules.txt", &list);
    }

    fn write_fake_tools(&self) {
        let go = format!(
            "#!/bin/sh\n\
             case \"$1\" in\n\
             env) echo '{cache}'; echo '' ;;\n\
             list) cat '{modules}' ;;\n\
             mod) exit 0 ;;\n\
             *) echo \"unexpected go command: $*\" >&2; exit 2 ;;\n\
             esac\n",
            cache = self.module_cache().display(),
            modules = self.path.join("modules.txt").display(),
        );
        let licensee = "#!/bin/sh\n\
                        for last; do :; done\n\
                        cat \"$last/.licensee.json\"\n";
        write_script(&self.path.join("bin/go"), &go);
        write_script(&self.path.join("bin/licensee"), licensee);
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().expect("script has a parent"))
        .expect("Failed to create bin directory");
    std::fs::write(path, body).expect("Failed to write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn license_collect_cmd() -> Command {
    Command::cargo_bin("license-collect").expect("binary is built")
}
