//! Bundle writer
//!
//! Renders the aggregated LICENSE and NOTICE documents and populates the
//! output directory with one copy per group representative.
//!
//! Every file is first written to a staging directory inside the output
//! directory, then moved into place through a [`Transaction`]. Any failure
//! is fatal and leaves the output directory as it was before the run.

pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::Aggregation;
use crate::error::{LicenseCollectError, Result};
use crate::transaction::Transaction;

pub use render::{render_license, render_notice};

/// Aggregated license document name
pub const LICENSE_FILE: &str = "LICENSE";

/// Aggregated notice document name
pub const NOTICE_FILE: &str = "NOTICE";

/// Prefix of the staging directory created inside the output directory
const STAGING_PREFIX: &str = ".license-collect-";

/// Texts rendered into the aggregated documents
#[derive(Debug, Clone, Default)]
pub struct BundleText {
    pub project_name: String,
    pub self_license: String,
    pub self_notice: String,
}

/// What the writer put on disk
#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub output_dir: PathBuf,
    pub license_groups: usize,
    pub notice_groups: usize,
    pub files: Vec<PathBuf>,
}

/// Read the project's own LICENSE or NOTICE.
///
/// A missing file is reported and treated as empty; any other read error is
/// returned.
pub fn read_self_document(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "project document not found, using empty text");
            Ok(String::new())
        }
        Err(e) => Err(LicenseCollectError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Create the output directory; an existing directory is fine
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| LicenseCollectError::DirCreateFailed {
        path: output_dir.display().to_string(),
        reason: e.to_string(),
    })?;
    if !output_dir.is_dir() {
        return Err(LicenseCollectError::DirCreateFailed {
            path: output_dir.display().to_string(),
            reason: "path exists and is not a directory".to_string(),
        });
    }
    Ok(())
}

fn write_read_only(path: &Path, contents: &str) -> Result<()> {
    let write_error = |e: std::io::Error| LicenseCollectError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    fs::write(path, contents).map_err(write_error)?;
    let mut permissions = fs::metadata(path).map_err(write_error)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions).map_err(write_error)?;
    Ok(())
}

/// Writes bundles into one output directory
#[derive(Debug, Clone)]
pub struct BundleWriter {
    output_dir: PathBuf,
}

impl BundleWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render and write the complete bundle
    pub fn write(&self, aggregation: &Aggregation, text: &BundleText) -> Result<BundleSummary> {
        ensure_output_dir(&self.output_dir)?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.output_dir)
            .map_err(|e| LicenseCollectError::DirCreateFailed {
                path: self.output_dir.join(STAGING_PREFIX).display().to_string(),
                reason: e.to_string(),
            })?;
        let staged_dir = staging.path().join("staged");
        let backup_dir = staging.path().join("previous");
        for dir in [&staged_dir, &backup_dir] {
            fs::create_dir(dir).map_err(|e| LicenseCollectError::DirCreateFailed {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let mut names: Vec<String> = Vec::new();
        for (source, name) in aggregation.copies() {
            fs::copy(source, staged_dir.join(name)).map_err(|e| {
                LicenseCollectError::FileCopyFailed {
                    from: source.display().to_string(),
                    path: self.output_dir.join(name).display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            names.push(name.to_string());
        }

        let license = render_license(&text.project_name, &text.self_license, aggregation);
        let notice = render_notice(&text.project_name, &text.self_notice, aggregation);
        write_read_only(&staged_dir.join(LICENSE_FILE), &license)?;
        write_read_only(&staged_dir.join(NOTICE_FILE), &notice)?;
        names.push(LICENSE_FILE.to_string());
        names.push(NOTICE_FILE.to_string());

        let mut transaction = Transaction::new(&self.output_dir, &backup_dir);
        let mut files = Vec::with_capacity(names.len());
        for name in &names {
            files.push(transaction.install(&staged_dir.join(name), name)?);
        }
        transaction.commit();

        tracing::info!(
            output_dir = %self.output_dir.display(),
            files = files.len(),
            "bundle written"
        );

        Ok(BundleSummary {
            output_dir: self.output_dir.clone(),
            license_groups: aggregation.licenses.len(),
            notice_groups: aggregation.notices.len(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::{Dependency, DependencyRecord, NoticeFile, ResolvedLicense};
    use crate::hash::fingerprint_file;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        cache: PathBuf,
        output: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let cache = temp.path().join("cache");
            let output = temp.path().join("out");
            fs::create_dir_all(&cache).unwrap();
            Self {
                _temp: temp,
                cache,
                output,
            }
        }

        fn record(&self, name: &str, license: &str, notice: Option<&str>) -> DependencyRecord {
            let dir = self.cache.join(format!("{name}@v1.0.0"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("LICENSE"), license).unwrap();
            let notice = notice.map(|text| {
                fs::write(dir.join("NOTICE"), text).unwrap();
                NoticeFile {
                    path: dir.join("NOTICE"),
                    fingerprint: fingerprint_file(&dir.join("NOTICE")).unwrap(),
                }
            });
            DependencyRecord {
                dependency: Dependency::new(name, "v1.0.0"),
                license: Some(ResolvedLicense {
                    id: "MIT".to_string(),
                    title: "MIT License".to_string(),
                    path: dir.join("LICENSE"),
                    fingerprint: fingerprint_file(&dir.join("LICENSE")).unwrap(),
                }),
                notice,
            }
        }
    }

    fn text() -> BundleText {
        BundleText {
            project_name: "Demo".to_string(),
            self_license: "OWN LICENSE\n".to_string(),
            self_notice: "OWN NOTICE\n".to_string(),
        }
    }

    #[test]
    fn test_write_creates_documents_and_copies() {
        let fixture = Fixture::new();
        let records = vec![
            fixture.record("github.com/a/one", "mit text", Some("notice one")),
            fixture.record("github.com/b/two", "mit text", None),
        ];

        let summary = BundleWriter::new(&fixture.output)
            .write(&aggregate(&records), &text())
            .unwrap();

        assert_eq!(summary.license_groups, 1);
        assert_eq!(summary.notice_groups, 1);
        assert_eq!(
            fs::read_to_string(fixture.output.join("LICENSE_a_one")).unwrap(),
            "mit text"
        );
        assert_eq!(
            fs::read_to_string(fixture.output.join("NOTICE_a_one")).unwrap(),
            "notice one"
        );
        let license = fs::read_to_string(fixture.output.join(LICENSE_FILE)).unwrap();
        assert!(license.starts_with("OWN LICENSE\n"));
        assert!(license.contains("github.com/b/two (v1.0.0)"));
    }

    #[test]
    fn test_documents_are_read_only() {
        let fixture = Fixture::new();
        let records = vec![fixture.record("github.com/a/one", "mit", None)];

        BundleWriter::new(&fixture.output)
            .write(&aggregate(&records), &text())
            .unwrap();

        for name in [LICENSE_FILE, NOTICE_FILE] {
            let permissions = fs::metadata(fixture.output.join(name)).unwrap().permissions();
            assert!(permissions.readonly(), "{name} should be read-only");
        }
    }

    #[test]
    fn test_existing_output_dir_and_previous_run_are_fine() {
        let fixture = Fixture::new();
        let records = vec![fixture.record("github.com/a/one", "mit", None)];
        let writer = BundleWriter::new(&fixture.output);

        writer.write(&aggregate(&records), &text()).unwrap();
        let first = fs::read_to_string(fixture.output.join(LICENSE_FILE)).unwrap();
        writer.write(&aggregate(&records), &text()).unwrap();
        let second = fs::read_to_string(fixture.output.join(LICENSE_FILE)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_staging_dir_is_cleaned_up() {
        let fixture = Fixture::new();
        let records = vec![fixture.record("github.com/a/one", "mit", None)];

        BundleWriter::new(&fixture.output)
            .write(&aggregate(&records), &text())
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(&fixture.output)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_copy_failure_is_fatal_and_leaves_nothing_behind() {
        let fixture = Fixture::new();
        let records = vec![fixture.record("github.com/a/one", "mit", None)];
        let aggregation = aggregate(&records);
        fs::remove_file(&records[0].license.as_ref().unwrap().path).unwrap();

        let result = BundleWriter::new(&fixture.output).write(&aggregation, &text());

        assert!(matches!(
            result,
            Err(LicenseCollectError::FileCopyFailed { .. })
        ));
        assert!(!fixture.output.join(LICENSE_FILE).exists());
        assert!(!fixture.output.join("LICENSE_a_one").exists());
    }

    #[test]
    fn test_output_path_that_is_a_file_fails() {
        let fixture = Fixture::new();
        fs::write(&fixture.output, "not a dir").unwrap();

        let result = BundleWriter::new(&fixture.output).write(&Aggregation::default(), &text());

        assert!(matches!(
            result,
            Err(LicenseCollectError::DirCreateFailed { .. })
        ));
    }

    #[test]
    fn test_read_self_document_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_self_document(&temp.path().join("LICENSE")).unwrap(), "");
    }

    #[test]
    fn test_read_self_document_directory_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(read_self_document(temp.path()).is_err());
    }
}
