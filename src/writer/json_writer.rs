use crate::error::{AddrSiftError, Result};
use crate::setops::AddressSet;
use crate::stats::CategoryReport;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Serialize the final set as a pretty-printed JSON array of lower-cased
/// addresses, sorted ascending, with a trailing newline. Write failures are
/// fatal and never retried.
pub fn write_address_set(path: &Path, set: &AddressSet) -> Result<()> {
    write_pretty(path, set)
}

/// Serialize a statistics report as a pretty-printed JSON object.
pub fn write_statistics(path: &Path, report: &CategoryReport) -> Result<()> {
    write_pretty(path, report)
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // A serialization failure is a write-boundary failure, same as the
    // fs::write below.
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| AddrSiftError::Io(std::io::Error::from(e)))?;
    json.push('\n');

    std::fs::write(path, json)?;
    Ok(())
}

/// Load an exclusion set: a JSON array of address strings, typically the
/// output of an earlier run. Parsed strictly, without comma repair, since
/// these files are pipeline outputs rather than upstream logs. Normalized on
/// load; the set is only ever read, never written back.
pub fn read_exclusion_set(path: &Path) -> Result<AddressSet> {
    let text = std::fs::read_to_string(path)?;

    let value: Value =
        serde_json::from_str(&text).map_err(|source| AddrSiftError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })?;

    let Value::Array(items) = value else {
        return Err(AddrSiftError::InvalidShape {
            path: path.to_path_buf(),
        });
    };

    Ok(AddressSet::from_values(
        items.iter().filter_map(|item| item.as_str()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_address_set_output_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let set = AddressSet::from_values(["0xBBB", "0xaaa"]);
        write_address_set(&path, &set).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\n  \"0xaaa\",\n  \"0xbbb\"\n]\n");
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");

        let set = AddressSet::from_values(["0xCCC", "0xaaa", "0xBbB"]);
        write_address_set(&first, &set).unwrap();
        write_address_set(&second, &set).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_read_exclusion_set_normalizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exclude.json");
        fs::write(&path, r#"["0xBBB", " 0xCcC "]"#).unwrap();

        let set = read_exclusion_set(&path).unwrap();
        assert_eq!(set.to_sorted_vec(), vec!["0xbbb", "0xccc"]);
    }

    #[test]
    fn test_read_exclusion_set_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exclude.json");
        fs::write(&path, r#"{"addresses": []}"#).unwrap();

        let err = read_exclusion_set(&path).unwrap_err();
        assert!(matches!(err, AddrSiftError::InvalidShape { .. }));
    }

    #[test]
    fn test_read_exclusion_set_rejects_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exclude.json");
        fs::write(&path, "[\"0xaaa\"").unwrap();

        let err = read_exclusion_set(&path).unwrap_err();
        assert!(matches!(err, AddrSiftError::MalformedInput { .. }));
    }

    #[test]
    fn test_unserializable_value_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        // Non-string map keys cannot be represented in JSON.
        let mut bad = std::collections::BTreeMap::new();
        bad.insert(vec![1u8], 1u8);

        let err = write_pretty(&path, &bad).unwrap_err();
        assert!(matches!(err, AddrSiftError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_unwritable_path_is_io_error() {
        let err =
            write_address_set(Path::new("/no/such/dir/out.json"), &AddressSet::new())
                .unwrap_err();
        assert!(matches!(err, AddrSiftError::Io(_)));
    }
}
