pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod setops;
pub mod stats;
pub mod ui;
pub mod writer;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, LoaderConfig, SourceProfile, StatsConfig};
pub use error::{AddrSiftError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{extract_fields, FieldSpec};
pub use loader::{AddressRecord, JsonLoader, LoadOutcome, ShapePolicy};
pub use setops::{build_set, normalize, AddressSet, BuildCounts};
pub use stats::{count_categories, CategoryReport};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use writer::{PipelineReport, StatsRunReport};

use std::path::{Path, PathBuf};

/// Main library interface: one instance per pipeline run, holding the
/// configuration and the terminal output machinery. Execution is strictly
/// sequential and single-threaded; the only waiting is on synchronous I/O.
pub struct AddrSift {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl AddrSift {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// The full extraction pipeline: load every input, extract the profile's
    /// fields, deduplicate into a normalized set, subtract the exclusion set
    /// if one was given, and write the sorted result.
    pub fn extract_addresses(
        &self,
        inputs: &[PathBuf],
        profile_name: &str,
        exclude: Option<&Path>,
        output: &Path,
    ) -> Result<PipelineReport> {
        let profile = self.config.source_profile(profile_name)?;
        let spec = FieldSpec::from_profile(profile)?;

        self.output_formatter
            .start_operation(&format!("Extracting addresses (fields: {})", spec));

        // Steps 1-2: load each input in the order given, build its set,
        // union into the accumulator
        let loader = JsonLoader::new(&self.config.loader);
        let progress = self
            .progress_manager
            .create_file_progress(inputs.len() as u64);

        let mut set = AddressSet::new();
        let mut counts = BuildCounts::default();
        let mut files_processed = 0;
        let mut repaired = Vec::new();
        let mut skipped = Vec::new();

        for input in inputs {
            progress.set_message(format!("Loading {}", input.display()));
            let outcome = loader.load(input)?;

            let (file_set, file_counts) = build_set(&outcome.records, &spec);
            counts.records_scanned += file_counts.records_scanned;
            counts.values_extracted += file_counts.values_extracted;
            set = set.union(&file_set);

            files_processed += outcome.files_processed;
            repaired.extend(outcome.repaired);
            skipped.extend(outcome.skipped);
            progress.inc(1);
        }
        progress.finish_and_clear();

        // Duplicates are counted across the whole run, not per file.
        counts.unique = set.len();
        counts.duplicates = counts.values_extracted - counts.unique;

        self.report_load_notes(&repaired, &skipped);
        self.output_formatter.info(&format!(
            "Scanned {} records from {} files",
            counts.records_scanned, files_processed
        ));
        self.output_formatter.debug(&format!(
            "{} values extracted, {} unique after dedupe",
            counts.values_extracted, counts.unique
        ));

        // Step 3: optional exclusion
        let (final_set, excluded) = match exclude {
            Some(path) => {
                let spinner = self
                    .progress_manager
                    .create_spinner(&format!("Reading exclusion set {}", path.display()));
                let exclusion = writer::read_exclusion_set(path);
                spinner.finish_and_clear();
                let exclusion = exclusion?;
                let reduced = set.subtract(&exclusion);
                let removed = set.len() - reduced.len();
                self.output_formatter.info(&format!(
                    "Excluded {} addresses present in {}",
                    removed,
                    path.display()
                ));
                (reduced, removed)
            }
            None => (set, 0),
        };

        // Step 4: persist
        writer::write_address_set(output, &final_set)?;

        let mut report = PipelineReport::new(&counts, final_set.len(), output.to_path_buf());
        report.files_processed = files_processed;
        report.files_repaired = repaired;
        report.files_skipped = skipped;
        report.excluded = excluded;

        self.output_formatter.success(&format!(
            "Wrote {} addresses to {}",
            report.final_size,
            output.display()
        ));

        Ok(report)
    }

    /// The statistics variant: one input file of subject records, one output
    /// object of per-category counts plus the no-point count.
    pub fn run_statistics(&self, inputs: &[PathBuf], output: &Path) -> Result<StatsRunReport> {
        let [input] = inputs else {
            return Err(AddrSiftError::Config {
                message: "Statistics mode takes exactly one --input file".to_string(),
            });
        };

        if input.is_dir() {
            return Err(AddrSiftError::Config {
                message: "Statistics mode does not accept a directory input".to_string(),
            });
        }

        self.output_formatter
            .start_operation("Aggregating category statistics");

        let loader = JsonLoader::new(&self.config.loader);
        let outcome = loader.load_file(input, ShapePolicy::Strict)?;
        self.report_load_notes(&outcome.repaired, &outcome.skipped);

        let report = count_categories(&outcome.records, &self.config.stats.id_field)?;
        writer::write_statistics(output, &report)?;

        self.output_formatter.success(&format!(
            "Wrote {} category counts to {}",
            report.counts.len(),
            output.display()
        ));

        Ok(StatsRunReport {
            files_processed: outcome.files_processed,
            records_scanned: outcome.records.len(),
            categories: report.counts.len(),
            no_points_count: report.no_points_count,
            output_path: output.to_path_buf(),
            finished_at: chrono::Utc::now(),
        })
    }

    fn report_load_notes(&self, repaired: &[PathBuf], skipped: &[PathBuf]) {
        for path in repaired {
            self.output_formatter.info(&format!(
                "Repaired missing commas in {}",
                path.display()
            ));
        }
        for path in skipped {
            self.output_formatter.warning(&format!(
                "Skipped {} (top-level value is not an array)",
                path.display()
            ));
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(AddrSiftError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &AddrSiftError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
