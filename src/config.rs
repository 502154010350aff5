use crate::error::{AddrSiftError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub loader: LoaderConfig,
    pub stats: StatsConfig,
    /// Named source profiles: one FieldSpec per known log shape, so a single
    /// engine serves every script variant without code duplication.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// File-name suffix required when enumerating a directory input.
    pub suffix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    /// Field identifying the subject of each record in statistics mode.
    pub id_field: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceProfile {
    /// Ordered field names scanned for address values on every record.
    pub fields: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            stats: StatsConfig::default(),
            sources: BTreeMap::new(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            suffix: "json".to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            id_field: "address".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AddrSiftError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AddrSiftError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| AddrSiftError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["addrsift.toml", ".addrsift.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref suffix) = cli_args.suffix {
            self.loader.suffix = suffix.trim_start_matches('.').to_string();
        }

        if let Some(ref id_field) = cli_args.id_field {
            self.stats.id_field = id_field.clone();
        }

        if let Some(ref fields) = cli_args.fields {
            // Ad-hoc profile built from --fields; selectable via the
            // "cli" source name without touching the config file.
            let parsed: Vec<String> = fields
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.sources
                .insert("cli".to_string(), SourceProfile { fields: parsed });
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| AddrSiftError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| AddrSiftError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.loader.suffix.is_empty() {
            return Err(AddrSiftError::Config {
                message: "Directory-scan suffix must not be empty".to_string(),
            });
        }

        if self.stats.id_field.trim().is_empty() {
            return Err(AddrSiftError::Config {
                message: "Statistics identity field must not be empty".to_string(),
            });
        }

        for (name, profile) in &self.sources {
            if profile.fields.is_empty() {
                return Err(AddrSiftError::Config {
                    message: format!("Source profile '{}' declares no fields", name),
                });
            }
            if profile.fields.iter().any(|f| f.trim().is_empty()) {
                return Err(AddrSiftError::Config {
                    message: format!("Source profile '{}' contains an empty field name", name),
                });
            }
        }

        Ok(())
    }

    /// Look up a named source profile.
    pub fn source_profile(&self, name: &str) -> Result<&SourceProfile> {
        self.sources.get(name).ok_or_else(|| AddrSiftError::Config {
            message: format!(
                "Unknown source profile '{}' (known: {})",
                name,
                if self.sources.is_empty() {
                    "none".to_string()
                } else {
                    self.sources.keys().cloned().collect::<Vec<_>>().join(", ")
                }
            ),
        })
    }

    pub fn create_sample_config() -> String {
        let mut sample = Self::default();
        sample.sources.insert(
            "transfers".to_string(),
            SourceProfile {
                fields: vec!["to".to_string(), "from".to_string()],
            },
        );
        sample.sources.insert(
            "calls".to_string(),
            SourceProfile {
                fields: vec!["caller".to_string(), "receiver".to_string()],
            },
        );
        toml::to_string_pretty(&sample).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub fields: Option<String>,
    pub suffix: Option<String>,
    pub id_field: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: Option<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_id_field(mut self, id_field: Option<String>) -> Self {
        self.id_field = id_field;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loader.suffix, "json");
        assert_eq!(config.stats.id_field, "address");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.loader.suffix.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_profile_rejected() {
        let mut config = Config::default();
        config
            .sources
            .insert("bad".to_string(), SourceProfile { fields: vec![] });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.loader.suffix, loaded_config.loader.suffix);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_fields(Some("to, from ,caller".to_string()))
            .with_suffix(Some(".ndjson".to_string()));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.loader.suffix, "ndjson");
        let profile = config.source_profile("cli").unwrap();
        assert_eq!(profile.fields, vec!["to", "from", "caller"]);
    }

    #[test]
    fn test_unknown_profile_lists_known() {
        let mut config = Config::default();
        config.sources.insert(
            "transfers".to_string(),
            SourceProfile {
                fields: vec!["to".to_string()],
            },
        );

        let err = config.source_profile("mints").unwrap_err();
        assert!(err.to_string().contains("transfers"));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[loader]"));
        assert!(sample.contains("[stats]"));
        assert!(sample.contains("[sources.transfers]"));
        assert!(sample.contains("[sources.calls]"));
    }

    #[test]
    fn test_parse_sample_config_roundtrip() {
        let sample = Config::create_sample_config();
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(sample.as_bytes()).unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(
            config.source_profile("calls").unwrap().fields,
            vec!["caller", "receiver"]
        );
    }
}
