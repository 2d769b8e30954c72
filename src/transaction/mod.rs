//! Transaction support for committing a staged bundle
//!
//! Staged files are moved into the output directory one rename at a time.
//! The transaction remembers what each rename did so the output directory can
//! be put back the way it was if a later step fails.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(&output_dir, &backup_dir);
//! transaction.install(&staged, &target)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LicenseCollectError, Result};

/// A file that existed before the transaction and was moved aside
#[derive(Debug, Clone)]
struct Replaced {
    /// Original path
    path: PathBuf,
    /// Where the previous file was moved to
    backup: PathBuf,
}

/// A transaction for atomic output directory updates
#[derive(Debug)]
pub struct Transaction {
    /// Directory receiving the bundle
    output_dir: PathBuf,

    /// Directory holding previous versions of replaced files
    backup_dir: PathBuf,

    /// Files created during this transaction
    created_files: Vec<PathBuf>,

    /// Files replaced during this transaction
    replaced_files: Vec<Replaced>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    /// Create a new transaction; `backup_dir` must be on the same file system
    /// as `output_dir` and outlive the transaction.
    pub fn new(output_dir: &Path, backup_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            backup_dir: backup_dir.to_path_buf(),
            created_files: Vec::new(),
            replaced_files: Vec::new(),
            committed: false,
        }
    }

    /// Move `staged` to `output_dir/name`, keeping any previous file aside
    pub fn install(&mut self, staged: &Path, name: &str) -> Result<PathBuf> {
        let target = self.output_dir.join(name);

        if target.exists() {
            let backup = self.backup_dir.join(name);
            fs::rename(&target, &backup).map_err(|e| LicenseCollectError::FileWriteFailed {
                path: target.display().to_string(),
                reason: format!("could not move previous file aside: {e}"),
            })?;
            self.replaced_files.push(Replaced {
                path: target.clone(),
                backup,
            });
        } else {
            self.created_files.push(target.clone());
        }

        fs::rename(staged, &target).map_err(|e| LicenseCollectError::FileWriteFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(target)
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Manually trigger a rollback
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }

        // Remove created files
        for path in &self.created_files {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
        }

        // Put replaced files back
        for replaced in self.replaced_files.iter().rev() {
            if !replaced.backup.exists() {
                continue;
            }
            if replaced.path.exists() {
                let _ = fs::remove_file(&replaced.path);
            }
            if let Err(e) = fs::rename(&replaced.backup, &replaced.path) {
                tracing::warn!(
                    path = %replaced.path.display(),
                    "failed to restore previous file: {e}"
                );
            }
        }

        self.created_files.clear();
        self.replaced_files.clear();
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            // Automatic rollback on drop if not committed
            if let Err(e) = self.rollback() {
                tracing::warn!("rollback failed: {e}");
            }
        }
    }
}
