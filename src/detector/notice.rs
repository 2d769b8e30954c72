//! Notice file discovery

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Find the notice file of a dependency.
///
/// Only the top level of `dir` is searched. The first regular file, by file
/// name, whose name contains `notice` in any case wins. A missing or
/// unreadable directory simply has no notice.
pub fn find_notice_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains("notice")
        })
        .map(walkdir::DirEntry::into_path)
}
