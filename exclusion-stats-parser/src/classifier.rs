//! Exclusion classifier
//!
//! Maps one exclusion element of a policy document to an [`ExclusionRule`].
//!
//! File exclusions are children of an `info` list and carry a pipe-delimited
//! record whose second field is a numeric type code. Process exclusions are
//! children of a `process` list; their fifth field is a bit mask of the
//! protections the exclusion switches off.

use exclusion_stats_core::{ExclusionCategory, ExclusionRule};
use roxmltree::Node;

const EXCLUSIONS_TAG: &str = "exclusions";
const FILE_LIST_TAG: &str = "info";
const PROCESS_LIST_TAG: &str = "process";

const FIELD_SEPARATOR: char = '|';
const FILE_TYPE_FIELD: usize = 1;
const PROCESS_FLAGS_FIELD: usize = 4;
const MIN_FIELDS: usize = 5;

/// File exclusion type codes
mod type_code {
    pub const PATH: u32 = 2;
    pub const FILE_EXTENSION: u32 = 3;
    pub const WILDCARD: u32 = 6;
}

/// Process exclusion flag bits
mod flag {
    pub const FILE_SCAN_CHILD: u32 = 1 << 0;
    pub const SYSTEM_PROCESS_PROTECTION: u32 = 1 << 2;
    pub const SYSTEM_PROCESS_PROTECTION_CHILD: u32 = 1 << 3;
    pub const MALICIOUS_ACTIVITY: u32 = 1 << 4;
    pub const MALICIOUS_ACTIVITY_CHILD: u32 = 1 << 5;

    /// Highest flag value still counted as a plain file-scan exclusion
    pub const FILE_SCAN_MAX: u32 = 2;
}

/// Classify one exclusion element.
///
/// Returns `None` for anything that is not a supported exclusion: elements
/// outside an `exclusions` section, unknown type codes, self-protect-only
/// process entries and records with missing or non-numeric fields.
///
/// Process flags 0 to 2 are file-scan exclusions. Above that, system process
/// protection wins over malicious activity when both bits are set.
pub fn classify(node: Node<'_, '_>) -> Option<ExclusionRule> {
    if !is_exclusion_item(node) {
        return None;
    }

    let list = node.parent_element()?;
    let text = node.text()?.trim();
    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    match list.tag_name().name() {
        FILE_LIST_TAG => classify_file(fields[FILE_TYPE_FIELD]),
        PROCESS_LIST_TAG => classify_process(fields[PROCESS_FLAGS_FIELD]),
        _ => None,
    }
}

/// Whether `node` sits in an exclusion list inside an `exclusions` section
pub fn is_exclusion_item(node: Node<'_, '_>) -> bool {
    if !node.is_element() {
        return false;
    }
    let Some(list) = node.parent_element() else {
        return false;
    };
    matches!(list.tag_name().name(), FILE_LIST_TAG | PROCESS_LIST_TAG)
        && list
            .ancestors()
            .skip(1)
            .any(|a| a.is_element() && a.tag_name().name() == EXCLUSIONS_TAG)
}

fn classify_file(type_field: &str) -> Option<ExclusionRule> {
    let category = match type_field.trim().parse::<u32>().ok()? {
        type_code::PATH => ExclusionCategory::Path,
        type_code::FILE_EXTENSION => ExclusionCategory::FileExtension,
        type_code::WILDCARD => ExclusionCategory::Wildcard,
        _ => return None,
    };
    Some(ExclusionRule::file(category))
}

fn classify_process(flags_field: &str) -> Option<ExclusionRule> {
    let flags = flags_field.trim().parse::<u32>().ok()?;

    if flags <= flag::FILE_SCAN_MAX {
        return Some(ExclusionRule::process(
            ExclusionCategory::ProcessFileScan,
            flags & flag::FILE_SCAN_CHILD != 0,
        ));
    }
    if flags & flag::SYSTEM_PROCESS_PROTECTION != 0 {
        return Some(ExclusionRule::process(
            ExclusionCategory::ProcessSystemProtection,
            flags & flag::SYSTEM_PROCESS_PROTECTION_CHILD != 0,
        ));
    }
    if flags & flag::MALICIOUS_ACTIVITY != 0 {
        return Some(ExclusionRule::process(
            ExclusionCategory::ProcessMaliciousActivity,
            flags & flag::MALICIOUS_ACTIVITY_CHILD != 0,
        ));
    }
    None
}
