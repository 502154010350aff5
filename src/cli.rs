use crate::config::{CliOverrides, Config};
use crate::error::{AddrSiftError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "addrsift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract, deduplicate and combine address sets from on-chain event logs")]
#[command(
    long_about = "AddrSift loads JSON event logs (tolerating missing commas between \
                       adjacent objects), extracts address-bearing fields, deduplicates them \
                       into a normalized set, optionally unions several inputs and subtracts \
                       an exclusion set, and writes the result as sorted, lower-cased JSON."
)]
#[command(after_help = "EXAMPLES:\n  \
    addrsift --input transfers.json --output holders.json --fields to,from\n  \
    addrsift --input logs/ --output all.json --source transfers --config addrsift.toml\n  \
    addrsift --input a.json --input b.json --output merged.json --fields to --exclude team.json\n  \
    addrsift --stats --input points.json --output counts.json --id-field address\n")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input JSON file or directory (repeatable; directories are scanned
    /// non-recursively for files matching the configured suffix)
    #[arg(short, long, required_unless_present = "generate_config")]
    pub input: Vec<PathBuf>,

    /// Output file path for the resulting JSON
    #[arg(short, long, required_unless_present = "generate_config")]
    pub output: Option<PathBuf>,

    /// Field names scanned for addresses, in order (comma-separated)
    #[arg(short, long, conflicts_with = "source")]
    pub fields: Option<String>,

    /// Named source profile from the configuration file
    #[arg(short, long)]
    pub source: Option<String>,

    /// Address-set file whose entries are removed from the result
    #[arg(short = 'x', long)]
    pub exclude: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Run the statistics variant (category counting) instead of extraction
    #[arg(long, conflicts_with_all = ["fields", "source", "exclude"])]
    pub stats: bool,

    /// Identity field designating the subject in statistics mode
    #[arg(long, requires = "stats")]
    pub id_field: Option<String>,

    /// File-name suffix required in directory-scan mode
    #[arg(long, help = "Suffix for directory enumeration (default: json)")]
    pub suffix: Option<String>,

    /// Output format for messages and reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_fields(self.fields.clone())
            .with_suffix(self.suffix.clone())
            .with_id_field(self.id_field.clone())
    }

    /// Name of the source profile the run should use. `--fields` is folded
    /// into the synthetic "cli" profile by the config merge.
    pub fn profile_name(&self) -> Result<&str> {
        if let Some(ref source) = self.source {
            Ok(source.as_str())
        } else if self.fields.is_some() {
            Ok("cli")
        } else {
            Err(AddrSiftError::Config {
                message: "Extraction requires --fields or --source".to_string(),
            })
        }
    }

    pub fn output_path(&self) -> Result<&PathBuf> {
        self.output.as_ref().ok_or_else(|| AddrSiftError::Config {
            message: "Missing required --output path".to_string(),
        })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            input: vec![PathBuf::from("events.json")],
            output: Some(PathBuf::from("out.json")),
            fields: None,
            source: None,
            exclude: None,
            config: None,
            stats: false,
            id_field: None,
            suffix: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_profile_name_from_fields() {
        let mut cli = base_cli();
        cli.fields = Some("to,from".to_string());
        assert_eq!(cli.profile_name().unwrap(), "cli");
    }

    #[test]
    fn test_profile_name_from_source() {
        let mut cli = base_cli();
        cli.source = Some("transfers".to_string());
        assert_eq!(cli.profile_name().unwrap(), "transfers");
    }

    #[test]
    fn test_profile_name_missing() {
        let cli = base_cli();
        assert!(cli.profile_name().is_err());
    }

    #[test]
    fn test_load_config_builds_cli_profile() {
        let mut cli = base_cli();
        cli.fields = Some("to,from".to_string());

        let config = cli.load_config().unwrap();
        let profile = config.source_profile("cli").unwrap();
        assert_eq!(profile.fields, vec!["to", "from"]);
    }

    #[test]
    fn test_verbosity_levels() {
        let mut cli = base_cli();
        cli.verbose = 2;
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.is_verbose());

        cli.quiet = true;
        assert_eq!(cli.verbosity_level(), 0);
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_clap_parses_extraction_invocation() {
        let cli = Cli::try_parse_from([
            "addrsift",
            "--input",
            "events.json",
            "--output",
            "out.json",
            "--fields",
            "to,from",
        ])
        .unwrap();

        assert_eq!(cli.input.len(), 1);
        assert_eq!(cli.fields.as_deref(), Some("to,from"));
        assert!(!cli.stats);
    }

    #[test]
    fn test_clap_rejects_fields_with_stats() {
        let result = Cli::try_parse_from([
            "addrsift",
            "--input",
            "points.json",
            "--output",
            "out.json",
            "--stats",
            "--fields",
            "to",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_clap_rejects_fields_with_source() {
        let result = Cli::try_parse_from([
            "addrsift",
            "--input",
            "events.json",
            "--output",
            "out.json",
            "--fields",
            "to",
            "--source",
            "transfers",
        ]);
        assert!(result.is_err());
    }
}
