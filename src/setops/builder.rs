use crate::extractor::{extract_fields, FieldSpec};
use crate::loader::AddressRecord;
use crate::setops::AddressSet;
use serde::Serialize;

/// Counters accumulated while building a set from records.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BuildCounts {
    pub records_scanned: usize,
    pub values_extracted: usize,
    pub unique: usize,
    pub duplicates: usize,
}

/// Apply the FieldSpec to every record, normalize each extracted value and
/// insert it into a fresh set.
pub fn build_set(records: &[AddressRecord], spec: &FieldSpec) -> (AddressSet, BuildCounts) {
    let mut set = AddressSet::new();
    let mut counts = BuildCounts::default();

    for record in records {
        counts.records_scanned += 1;
        for value in extract_fields(record, spec) {
            counts.values_extracted += 1;
            if !set.insert(value) {
                counts.duplicates += 1;
            }
        }
    }

    counts.unique = set.len();
    (set, counts)
}
