use serde::Serialize;
use std::collections::BTreeSet;

/// Identity normalization for addresses: trim surrounding whitespace and
/// lower-case. Applied before every insertion and membership test, so two
/// addresses differing only in case are the same entity.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Deduplicated set of normalized address strings. Backed by a `BTreeSet`,
/// so iteration and serialization are always lexicographic ascending; this
/// is the single ordering policy for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressSet {
    addresses: BTreeSet<String>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw (possibly unnormalized) values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for value in values {
            set.insert(value.as_ref());
        }
        set
    }

    /// Normalize and insert. Returns true when the address was not already
    /// present.
    pub fn insert(&mut self, value: &str) -> bool {
        self.addresses.insert(normalize(value))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.addresses.contains(&normalize(value))
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(|s| s.as_str())
    }

    /// All addresses, lexicographic ascending.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.addresses.iter().cloned().collect()
    }

    /// Union of this set and another; neither input is mutated.
    pub fn union(&self, other: &AddressSet) -> AddressSet {
        AddressSet {
            addresses: self.addresses.union(&other.addresses).cloned().collect(),
        }
    }

    /// This set minus every element of `exclusion`; neither input is
    /// mutated. The result is a subset of `self` and disjoint from
    /// `exclusion`.
    pub fn subtract(&self, exclusion: &AddressSet) -> AddressSet {
        AddressSet {
            addresses: self
                .addresses
                .difference(&exclusion.addresses)
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<String> for AddressSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
