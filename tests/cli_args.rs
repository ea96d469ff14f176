//! Integration tests for CLI argument handling
//!
//! Tests flag parsing and limit validation from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_weatherdash"))
        .args(args)
        .output()
        .expect("Failed to execute weatherdash")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weatherdash"), "Help should mention weatherdash");
    assert!(stdout.contains("--city"), "Help should mention --city flag");
    assert!(stdout.contains("--no-locate"), "Help should mention --no-locate flag");
}

#[test]
fn test_invalid_days_prints_error_and_exits() {
    let output = run_cli(&["--days", "9"]);
    assert!(!output.status.success(), "Expected invalid days to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid days"),
        "Should print error message about invalid days: {}",
        stderr
    );
}

#[test]
fn test_invalid_hours_prints_error_and_exits() {
    let output = run_cli(&["--hours", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid hours"), "{}", stderr);
}

#[test]
fn test_non_numeric_days_rejected_by_parser() {
    let output = run_cli(&["--days", "many"]);
    assert!(!output.status.success());
}

#[test]
fn test_valid_flags_with_help() {
    // --help short-circuits before the TUI starts
    let output = run_cli(&["--city", "Paris", "--fahrenheit", "--days", "3", "--help"]);
    assert!(output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use weatherdash::cli::{Cli, CliError, StartupConfig};
    use weatherdash::data::{ForecastLimits, TemperatureUnit};

    #[test]
    fn test_cli_no_args() {
        let cli = Cli::parse_from(["weatherdash"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.initial_city.is_none());
        assert!(config.locate);
    }

    #[test]
    fn test_cli_city_and_unit() {
        let cli = Cli::parse_from(["weatherdash", "--city", "Tokyo", "--fahrenheit"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_city.as_deref(), Some("Tokyo"));
        assert_eq!(config.unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_cli_limits() {
        let cli = Cli::parse_from(["weatherdash", "--days", "2", "--hours", "16"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.limits, ForecastLimits { hourly: 16, daily: 2 });
    }

    #[test]
    fn test_cli_invalid_days() {
        let cli = Cli::parse_from(["weatherdash", "--days", "7"]);
        assert_eq!(StartupConfig::from_cli(&cli), Err(CliError::InvalidDays(7)));
    }
}
