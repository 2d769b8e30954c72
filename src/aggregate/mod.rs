//! Grouping of dependencies by license and notice fingerprint
//!
//! ## Algorithm
//!
//! 1. Walk the records in dependency-list order and append each one to the
//!    license group and the notice group keyed by its fingerprints.
//! 2. The first member of each group is its representative: its file is
//!    copied and its metadata labels the section.
//! 3. Sort license groups by `(license id, fingerprint)`. Notice groups use
//!    the same key, taken from their representative's license (empty when
//!    the representative has none).
//! 4. Hand out output file names in that sorted order, suffixing duplicates.
//!
//! Lookups go through a `HashMap`, but only the insertion-ordered `Vec` of
//! groups is ever iterated, so nothing that reaches the output depends on
//! hash order.

pub mod naming;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{Dependency, DependencyRecord, Fingerprint};

use naming::{NameRegistry, output_file_name};

/// Dependencies whose license files are byte-identical
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseGroup {
    pub fingerprint: Fingerprint,
    pub license_id: String,
    pub license_title: String,
    /// License file of the representative
    pub source_path: PathBuf,
    /// File name of the copy inside the output directory
    pub output_name: String,
    /// Members in dependency-list order; the first is the representative
    pub members: Vec<Dependency>,
}

/// Dependencies whose notice files are byte-identical
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeGroup {
    pub fingerprint: Fingerprint,
    /// License id of the representative, used only for ordering
    pub license_id: String,
    /// Notice file of the representative
    pub source_path: PathBuf,
    pub output_name: String,
    pub members: Vec<Dependency>,
}

/// The grouped, ordered view of all records, ready for the bundle writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub licenses: Vec<LicenseGroup>,
    pub notices: Vec<NoticeGroup>,
}

impl Aggregation {
    /// Files the writer must copy, as `(source, output name)` pairs
    pub fn copies(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.licenses
            .iter()
            .map(|g| (&g.source_path, g.output_name.as_str()))
            .chain(
                self.notices
                    .iter()
                    .map(|g| (&g.source_path, g.output_name.as_str())),
            )
    }
}

/// Group `records`, elect representatives and fix the emission order
pub fn aggregate(records: &[DependencyRecord]) -> Aggregation {
    let mut licenses: Vec<LicenseGroup> = Vec::new();
    let mut license_index: HashMap<Fingerprint, usize> = HashMap::new();
    let mut notices: Vec<NoticeGroup> = Vec::new();
    let mut notice_index: HashMap<Fingerprint, usize> = HashMap::new();

    for record in records {
        if let Some(license) = &record.license {
            match license_index.get(&license.fingerprint) {
                Some(&i) => licenses[i].members.push(record.dependency.clone()),
                None => {
                    license_index.insert(license.fingerprint.clone(), licenses.len());
                    licenses.push(LicenseGroup {
                        fingerprint: license.fingerprint.clone(),
                        license_id: license.id.clone(),
                        license_title: license.title.clone(),
                        source_path: license.path.clone(),
                        output_name: String::new(),
                        members: vec![record.dependency.clone()],
                    });
                }
            }
        }

        if let Some(notice) = &record.notice {
            match notice_index.get(&notice.fingerprint) {
                Some(&i) => notices[i].members.push(record.dependency.clone()),
                None => {
                    notice_index.insert(notice.fingerprint.clone(), notices.len());
                    notices.push(NoticeGroup {
                        fingerprint: notice.fingerprint.clone(),
                        license_id: record
                            .license
                            .as_ref()
                            .map(|l| l.id.clone())
                            .unwrap_or_default(),
                        source_path: notice.path.clone(),
                        output_name: String::new(),
                        members: vec![record.dependency.clone()],
                    });
                }
            }
        }
    }

    licenses.sort_by(|a, b| {
        a.license_id
            .cmp(&b.license_id)
            .then_with(|| a.fingerprint.cmp(&b.fingerprint))
    });
    notices.sort_by(|a, b| {
        a.license_id
            .cmp(&b.license_id)
            .then_with(|| a.fingerprint.cmp(&b.fingerprint))
    });

    let mut names = NameRegistry::default();
    for group in &mut licenses {
        let module = group.members.first().map_or("", |d| d.name.as_str());
        group.output_name = names.claim(output_file_name(&group.source_path, module));
    }
    for group in &mut notices {
        let module = group.members.first().map_or("", |d| d.name.as_str());
        group.output_name = names.claim(output_file_name(&group.source_path, module));
    }

    tracing::info!(
        license_groups = licenses.len(),
        notice_groups = notices.len(),
        "aggregated dependency records"
    );

    Aggregation { licenses, notices }
}
