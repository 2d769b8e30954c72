//! Output file names for group representatives

use std::collections::HashSet;
use std::path::Path;

/// Names reserved for the aggregated documents
pub const RESERVED_NAMES: &[&str] = &["LICENSE", "NOTICE"];

/// Compose `<file name>_<second-to-last segment>_<last segment>`.
///
/// The segments come from the module coordinate, so `LICENSE` of
/// `github.com/spf13/cobra` becomes `LICENSE_spf13_cobra`. A coordinate with
/// a single segment contributes only that segment.
pub fn output_file_name(source: &Path, module: &str) -> String {
    let base = source
        .file_name()
        .map_or_else(|| "LICENSE".to_string(), |n| n.to_string_lossy().into_owned());

    let segments: Vec<&str> = module.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => base,
        [only] => format!("{base}_{only}"),
        [.., parent, last] => format!("{base}_{parent}_{last}"),
    }
}

/// Tracks names already handed out within one output directory
#[derive(Debug)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self {
            used: RESERVED_NAMES.iter().map(|n| (*n).to_string()).collect(),
        }
    }
}

impl NameRegistry {
    /// Claim `name`, or the first free `name_2`, `name_3`, ... if it is taken
    pub fn claim(&mut self, name: String) -> String {
        if self.used.insert(name.clone()) {
            return name;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{name}_{n}");
            if self.used.insert(candidate.clone()) {
                tracing::debug!(%name, %candidate, "output name taken, using suffix");
                return candidate;
            }
            n += 1;
        }
    }
}
