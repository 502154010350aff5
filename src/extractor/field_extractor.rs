use crate::config::SourceProfile;
use crate::error::{AddrSiftError, Result};
use crate::loader::AddressRecord;

/// Ordered, duplicate-free list of field names scanned for address values on
/// every record of a source. Declared per source, never inferred from keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<String>,
}

impl FieldSpec {
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for field in fields {
            let field = field.into();
            let trimmed = field.trim();
            if trimmed.is_empty() {
                return Err(AddrSiftError::Config {
                    message: "FieldSpec contains an empty field name".to_string(),
                });
            }
            if !seen.iter().any(|f: &String| f == trimmed) {
                seen.push(trimmed.to_string());
            }
        }

        if seen.is_empty() {
            return Err(AddrSiftError::Config {
                message: "FieldSpec must declare at least one field".to_string(),
            });
        }

        Ok(Self { fields: seen })
    }

    pub fn from_csv(csv: &str) -> Result<Self> {
        Self::new(csv.split(',').filter(|s| !s.trim().is_empty()))
    }

    pub fn from_profile(profile: &SourceProfile) -> Result<Self> {
        Self::new(profile.fields.iter().cloned())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fields.join(","))
    }
}

/// Values found at the spec's fields, in declaration order. A field that is
/// missing, null, non-string, or empty after trimming yields nothing.
pub fn extract_fields<'a>(record: &'a AddressRecord, spec: &FieldSpec) -> Vec<&'a str> {
    spec.fields()
        .iter()
        .filter_map(|field| record.get(field))
        .filter_map(|value| value.as_str())
        .filter(|s| !s.trim().is_empty())
        .collect()
}
