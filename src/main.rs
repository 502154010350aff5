use addrsift::{AddrSift, AddrSiftError, Cli, OutputFormatter, OutputMode, UserFriendlyError};
use clap::Parser;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let sift = match AddrSift::from_cli(&cli) {
        Ok(sift) => sift,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let result = if cli.stats {
        run_statistics(&cli, &sift)
    } else {
        run_extraction(&cli, &sift)
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            sift.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn run_extraction(cli: &Cli, sift: &AddrSift) -> Result<(), AddrSiftError> {
    let profile = cli.profile_name()?;
    let output = cli.output_path()?;

    let report = sift.extract_addresses(&cli.input, profile, cli.exclude.as_deref(), output)?;
    sift.output_formatter().print_pipeline_report(&report);
    Ok(())
}

fn run_statistics(cli: &Cli, sift: &AddrSift) -> Result<(), AddrSiftError> {
    let output = cli.output_path()?;

    let report = sift.run_statistics(&cli.input, output)?;
    sift.output_formatter().print_stats_report(&report);
    Ok(())
}

fn exit_code_for(error: &AddrSiftError) -> i32 {
    match error {
        AddrSiftError::Config { .. } => 2,
        AddrSiftError::MalformedInput { .. } => 3,
        AddrSiftError::InvalidShape { .. } => 4,
        AddrSiftError::EmptyInput => 5,
        AddrSiftError::Io(_) | AddrSiftError::InvalidPath { .. } => 6,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "addrsift.toml".to_string());

    match AddrSift::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  addrsift --input logs/ --output out.json --source transfers --config {}", config_path);
            println!("\nEdit the source profiles to match your log shapes.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &AddrSiftError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli {
            input: vec![],
            output: None,
            fields: None,
            source: None,
            exclude: None,
            config: Some(config_path.clone()),
            stats: false,
            id_field: None,
            suffix: None,
            output_format: addrsift::OutputFormat::Human,
            verbose: 0,
            quiet: false,
            generate_config: true,
        };

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[loader]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&AddrSiftError::Config {
                message: "x".to_string()
            }),
            2
        );
        assert_eq!(
            exit_code_for(&AddrSiftError::InvalidShape {
                path: PathBuf::from("a.json")
            }),
            4
        );
        assert_eq!(exit_code_for(&AddrSiftError::EmptyInput), 5);
    }
}
