//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::DashboardConfig;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    tick_interval_ms: u64,
    start_delay_ms: u64,
    temperature: f64,
    top_p: f64,
    max_chars: Option<usize>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    tick_interval_ms: config.pipeline.tick_interval_ms,
                    start_delay_ms: config.pipeline.start_delay_ms,
                    temperature: config.sampling.temperature,
                    top_p: config.sampling.top_p,
                    max_chars: config.note.max_chars,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &DashboardConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.pipeline.tick_interval_ms < 100 {
        warnings.push(format!(
            "tick_interval_ms = {} renders faster than a viewer can follow",
            config.pipeline.tick_interval_ms
        ));
    }

    if config.note.max_chars.is_none() {
        warnings.push("note.max_chars unset - arbitrarily large notes accepted".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Tick interval: {} ms", summary.tick_interval_ms);
            println!("  Start delay: {} ms", summary.start_delay_ms);
            println!("  Temperature: {:.1}", summary.temperature);
            println!("  Top-p: {:.2}", summary.top_p);
            match summary.max_chars {
                Some(max) => println!("  Max note chars: {}", max),
                None => println!("  Max note chars: unlimited"),
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            config: PathBuf::from("no-such-config.toml"),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_validate_good_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[pipeline]\ntick_interval_ms = 500").unwrap();

        let args = ValidateArgs {
            config: path,
            json: false,
        };
        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().tick_interval_ms, 500);
    }

    #[test]
    fn test_validate_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[pipeline]\ntick_interval_ms = 1").unwrap();

        let args = ValidateArgs {
            config: path,
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
    }
}
