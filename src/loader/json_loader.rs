use crate::config::LoaderConfig;
use crate::error::{AddrSiftError, Result};
use crate::loader::repair::repair_missing_commas;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One parsed JSON object from a log file. No fixed schema; the fields that
/// get read are declared per source via a FieldSpec.
pub type AddressRecord = serde_json::Map<String, Value>;

/// What to do with a file whose top-level value is not an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePolicy {
    /// Fatal `InvalidShape` error. Used for explicitly named files.
    Strict,
    /// Skip the file and record it for a warning. Used in directory mode.
    SkipNonArrays,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<AddressRecord>,
    /// Files whose records contributed to the run. Disjoint from `skipped`.
    pub files_processed: usize,
    /// Files that only parsed after comma repair.
    pub repaired: Vec<PathBuf>,
    /// Non-array files skipped under `ShapePolicy::SkipNonArrays`. Not
    /// counted in `files_processed`.
    pub skipped: Vec<PathBuf>,
}

impl LoadOutcome {
    pub fn merge(&mut self, other: LoadOutcome) {
        self.records.extend(other.records);
        self.files_processed += other.files_processed;
        self.repaired.extend(other.repaired);
        self.skipped.extend(other.skipped);
    }
}

pub struct JsonLoader {
    suffix: String,
}

impl JsonLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            suffix: config.suffix.to_lowercase(),
        }
    }

    /// Load one input path. A file is parsed under `Strict`; a directory is
    /// enumerated non-recursively and each matching file is parsed under
    /// `SkipNonArrays`, in lexicographic file-name order.
    pub fn load(&self, path: &Path) -> Result<LoadOutcome> {
        if !path.exists() {
            return Err(AddrSiftError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        if path.is_dir() {
            self.load_directory(path)
        } else {
            self.load_file(path, ShapePolicy::Strict)
        }
    }

    pub fn load_file(&self, path: &Path, policy: ShapePolicy) -> Result<LoadOutcome> {
        let text = std::fs::read_to_string(path)?;
        let (value, was_repaired) = self.parse_with_repair(path, &text)?;

        let mut outcome = LoadOutcome::default();
        if was_repaired {
            outcome.repaired.push(path.to_path_buf());
        }

        match value {
            Value::Array(items) => {
                outcome.files_processed = 1;
                // Non-object elements carry no named fields and contribute
                // nothing to any FieldSpec.
                outcome.records.extend(items.into_iter().filter_map(|item| {
                    if let Value::Object(map) = item {
                        Some(map)
                    } else {
                        None
                    }
                }));
                Ok(outcome)
            }
            _ => match policy {
                ShapePolicy::Strict => Err(AddrSiftError::InvalidShape {
                    path: path.to_path_buf(),
                }),
                ShapePolicy::SkipNonArrays => {
                    outcome.skipped.push(path.to_path_buf());
                    Ok(outcome)
                }
            },
        }
    }

    fn load_directory(&self, dir: &Path) -> Result<LoadOutcome> {
        let files = self.enumerate_directory(dir)?;

        if files.is_empty() {
            // An empty scan would silently produce an empty set and corrupt
            // downstream merges, so it is treated as a shape error.
            return Err(AddrSiftError::InvalidShape {
                path: dir.to_path_buf(),
            });
        }

        let mut outcome = LoadOutcome::default();
        for file in files {
            outcome.merge(self.load_file(&file, ShapePolicy::SkipNonArrays)?);
        }

        Ok(outcome)
    }

    /// Files directly inside `dir` whose extension matches the configured
    /// suffix, sorted by file name for a deterministic processing order.
    pub fn enumerate_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .map(AddrSiftError::Io)
                    .unwrap_or_else(|| AddrSiftError::InvalidPath {
                        path: dir.display().to_string(),
                    })
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let matches_suffix = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase() == self.suffix)
                .unwrap_or(false);

            if matches_suffix {
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }

    /// Strict parse with exactly one repair retry. The retry only happens
    /// when the missing-comma pattern is present; any other syntax error is
    /// reported as-is.
    fn parse_with_repair(&self, path: &Path, text: &str) -> Result<(Value, bool)> {
        let first_error = match serde_json::from_str(text) {
            Ok(value) => return Ok((value, false)),
            Err(e) => e,
        };

        let Some(repaired_text) = repair_missing_commas(text) else {
            return Err(AddrSiftError::MalformedInput {
                path: path.to_path_buf(),
                source: first_error,
            });
        };

        match serde_json::from_str(&repaired_text) {
            Ok(value) => Ok((value, true)),
            Err(second_error) => Err(AddrSiftError::MalformedInput {
                path: path.to_path_buf(),
                source: second_error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader() -> JsonLoader {
        JsonLoader::new(&LoaderConfig::default())
    }

    #[test]
    fn test_load_valid_array() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("events.json");
        fs::write(&file, r#"[{"to":"0xAAA"},{"to":"0xBBB","from":"0xCCC"}]"#).unwrap();

        let outcome = loader().load(&file).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.files_processed, 1);
        assert!(outcome.repaired.is_empty());
    }

    #[test]
    fn test_missing_comma_is_repaired() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("events.json");
        fs::write(&file, "[{\"to\":\"0x1\"}\n{\"to\":\"0x2\"}]").unwrap();

        let outcome = loader().load(&file).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.repaired, vec![file]);
        assert_eq!(
            outcome.records[0].get("to").and_then(|v| v.as_str()),
            Some("0x1")
        );
        assert_eq!(
            outcome.records[1].get("to").and_then(|v| v.as_str()),
            Some("0x2")
        );
    }

    #[test]
    fn test_unrepairable_input_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "[{\"to\": }\n{\"to\":\"0x2\"}]").unwrap();

        let err = loader().load(&file).unwrap_err();
        match err {
            AddrSiftError::MalformedInput { path, .. } => assert_eq!(path, file),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_without_pattern_is_not_retried() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "[1, 2,").unwrap();

        let err = loader().load(&file).unwrap_err();
        assert!(matches!(err, AddrSiftError::MalformedInput { .. }));
    }

    #[test]
    fn test_non_array_is_fatal_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("object.json");
        fs::write(&file, r#"{"to":"0x1"}"#).unwrap();

        let err = loader().load(&file).unwrap_err();
        assert!(matches!(err, AddrSiftError::InvalidShape { .. }));
    }

    #[test]
    fn test_non_array_is_skipped_in_directory_mode() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"to":"0x1"}]"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"to":"0x2"}"#).unwrap();

        let outcome = loader().load(dir.path()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        // A skipped file is not a processed one.
        assert_eq!(outcome.files_processed, 1);
        assert_eq!(outcome.skipped, vec![dir.path().join("b.json")]);
    }

    #[test]
    fn test_directory_order_is_lexicographic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"to":"second"}]"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"to":"first"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not json").unwrap();

        let outcome = loader().load(dir.path()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(
            outcome.records[0].get("to").and_then(|v| v.as_str()),
            Some("first")
        );
        assert_eq!(
            outcome.records[1].get("to").and_then(|v| v.as_str()),
            Some("second")
        );
    }

    #[test]
    fn test_directory_with_no_matching_files_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not json").unwrap();

        let err = loader().load(dir.path()).unwrap_err();
        assert!(matches!(err, AddrSiftError::InvalidShape { .. }));
    }

    #[test]
    fn test_malformed_file_aborts_directory_scan() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"to":"0x1"}]"#).unwrap();
        fs::write(dir.path().join("b.json"), "[{\"to\": ]").unwrap();

        let err = loader().load(dir.path()).unwrap_err();
        assert!(matches!(err, AddrSiftError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_path_is_invalid() {
        let err = loader().load(Path::new("/no/such/file.json")).unwrap_err();
        assert!(matches!(err, AddrSiftError::InvalidPath { .. }));
    }

    #[test]
    fn test_non_object_elements_are_ignored() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("mixed.json");
        fs::write(&file, r#"[{"to":"0x1"}, 42, "0x2", null]"#).unwrap();

        let outcome = loader().load(&file).unwrap();
        assert_eq!(outcome.records.len(), 1);
    }
}
