use crate::error::{AddrSiftError, Result};
use crate::loader::AddressRecord;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-category subject counts plus the count of subjects that scored in no
/// category at all. Serializes to a single flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
    #[serde(rename = "noPointsCount")]
    pub no_points_count: u64,
}

/// Count, per category, the subjects whose value is a positive finite
/// number. Category names are derived from the first record's keys minus the
/// identity field; that derivation is why an empty input is an error.
pub fn count_categories(records: &[AddressRecord], id_field: &str) -> Result<CategoryReport> {
    let first = records.first().ok_or(AddrSiftError::EmptyInput)?;

    let categories: Vec<String> = first
        .keys()
        .filter(|key| key.as_str() != id_field)
        .cloned()
        .collect();

    let mut counts: BTreeMap<String, u64> =
        categories.iter().map(|c| (c.clone(), 0)).collect();
    let mut no_points_count = 0u64;

    for record in records {
        let mut scored = false;
        for category in &categories {
            let value = record.get(category).map(coerce_number).unwrap_or(0.0);
            if value.is_finite() && value > 0.0 {
                if let Some(count) = counts.get_mut(category) {
                    *count += 1;
                }
                scored = true;
            }
        }
        if !scored {
            no_points_count += 1;
        }
    }

    Ok(CategoryReport {
        counts,
        no_points_count,
    })
}

/// Numeric coercion for category values: numbers as-is, numeric strings
/// parsed, booleans as 0/1, everything else 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
