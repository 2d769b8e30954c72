//! Text rendering of the aggregated LICENSE and NOTICE documents

use std::fmt::Write;

use crate::aggregate::{Aggregation, LicenseGroup, NoticeGroup};
use crate::domain::Dependency;

const RULE_WIDE: &str = "=======================================================================";
const RULE: &str = "================================================================";

fn push_members(out: &mut String, members: &[Dependency]) {
    for member in members {
        let _ = writeln!(out, "{} ({})", member.name, member.version);
    }
}

fn push_license_section(out: &mut String, group: &LicenseGroup) {
    let _ = write!(
        out,
        "\n{RULE}\n\
         The following component(s) are provided under the {} License ({}).\n\
         See the respective project link for details.\n\
         You can find a copy of the License at {}.\n\n",
        group.license_id, group.license_title, group.output_name
    );
    push_members(out, &group.members);
}

fn push_notice_section(out: &mut String, group: &NoticeGroup) {
    let _ = write!(
        out,
        "\n{RULE}\n\
         You can find a copy of the Notice at {} for the following component(s).\n\
         See the respective project link for details.\n",
        group.output_name
    );
    push_members(out, &group.members);
}

/// Render the LICENSE document: the project's own license text followed by
/// one section per license group, in aggregation order.
pub fn render_license(project_name: &str, self_license: &str, aggregation: &Aggregation) -> String {
    let mut out = String::from(self_license);
    let _ = write!(
        out,
        "\n{RULE_WIDE}\n\
         {project_name} Subcomponents:\n\n\
         The {project_name} project contains subcomponents with\n\
         separate copyright notices and license terms. Your use of the binary release\n\
         for these subcomponents is subject to the terms and conditions of the\n\
         following licenses.\n\n"
    );
    for group in &aggregation.licenses {
        push_license_section(&mut out, group);
    }
    out
}

/// Render the NOTICE document: the project's own notice text, if any,
/// followed by one section per notice group.
pub fn render_notice(project_name: &str, self_notice: &str, aggregation: &Aggregation) -> String {
    let mut out = String::from(self_notice);
    let _ = write!(out, "\n{RULE_WIDE}\n{project_name} Subcomponents:\n\n");
    for group in &aggregation.notices {
        push_notice_section(&mut out, group);
    }
    out
}
