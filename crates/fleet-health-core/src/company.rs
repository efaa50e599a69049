//! Company derivation and record exclusion
//!
//! Manifest names follow an `<org>/<company>/...` layout; the second path
//! segment names the customer a machine belongs to.

use std::collections::BTreeSet;

use crate::record::{Field, Record};

/// Company reported for records without a usable manifest name
pub const UNKNOWN_COMPANY: &str = "unknown";

/// Sort key for records whose manifest name is null
pub const NULL_MANIFEST_SORT_KEY: &str = "x";

/// Only the root volume of a machine is reported on
pub const ROOT_MOUNTPOINT: &str = "/";

/// Company names whose machines are never reported on
pub type ExclusionSet = BTreeSet<String>;

/// Company segment of the manifest name, or [`UNKNOWN_COMPANY`]
pub fn get_company(record: &Record) -> &str {
    record
        .get(Field::ManifestName)
        .and_then(|manifest| manifest.split('/').nth(1))
        .unwrap_or(UNKNOWN_COMPANY)
}

/// Whether a record is dropped before any rule runs
pub fn skip_record(record: &Record, excluded: &ExclusionSet) -> bool {
    if excluded.contains(get_company(record)) {
        return true;
    }

    // Other volumes of multi-disk machines are noise
    record.get(Field::Mountpoint) != Some(ROOT_MOUNTPOINT)
}

/// Batch ordering key
///
/// Null manifests sort under `"x"`, which lands after the company names seen
/// in practice but is not guaranteed to be last.
pub fn sort_key(record: &Record) -> &str {
    match record.get(Field::ManifestName) {
        None => NULL_MANIFEST_SORT_KEY,
        Some(_) => get_company(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(manifest: Option<&str>, mountpoint: &str) -> Record {
        let record = Record::empty().with(Field::Mountpoint, mountpoint);
        match manifest {
            Some(name) => record.with(Field::ManifestName, name),
            None => record,
        }
    }

    #[test]
    fn test_get_company() {
        assert_eq!(get_company(&machine(Some("acme/customerA/prod"), "/")), "customerA");
        assert_eq!(get_company(&machine(Some("acme/customerB"), "/")), "customerB");
        assert_eq!(get_company(&machine(None, "/")), UNKNOWN_COMPANY);
    }

    #[test]
    fn test_get_company_malformed_manifest() {
        assert_eq!(get_company(&machine(Some("standalone"), "/")), UNKNOWN_COMPANY);
        assert_eq!(get_company(&machine(Some(""), "/")), UNKNOWN_COMPANY);
        assert_eq!(get_company(&machine(Some("acme/"), "/")), "");
    }

    #[test]
    fn test_skip_excluded_company() {
        let excluded: ExclusionSet = ["customerA".to_string()].into_iter().collect();
        assert!(skip_record(&machine(Some("acme/customerA/prod"), "/"), &excluded));
        assert!(!skip_record(&machine(Some("acme/customerB/prod"), "/"), &excluded));
    }

    #[test]
    fn test_skip_unknown_company_when_excluded() {
        let excluded: ExclusionSet = [UNKNOWN_COMPANY.to_string()].into_iter().collect();
        assert!(skip_record(&machine(None, "/"), &excluded));
    }

    #[test]
    fn test_skip_non_root_volume() {
        let excluded = ExclusionSet::new();
        assert!(skip_record(&machine(Some("acme/customerA"), "/data"), &excluded));
        assert!(skip_record(
            &Record::empty().with(Field::ManifestName, "acme/customerA"),
            &excluded
        ));
        assert!(!skip_record(&machine(Some("acme/customerA"), "/"), &excluded));
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(sort_key(&machine(Some("acme/zeta"), "/")), "zeta");
        assert_eq!(sort_key(&machine(None, "/")), NULL_MANIFEST_SORT_KEY);
        assert_eq!(sort_key(&machine(Some("flat"), "/")), UNKNOWN_COMPANY);
    }
}
