//! Configuration validation
//!
//! Rules:
//! - tick_interval_ms >= 10 (a faster tick renders as a flicker)
//! - sampling parameters within 0.0..=1.0
//! - note.max_chars, if set, > 0

use contracts::{DashboardConfig, PipelineError};
use validator::Validate;

/// Validate a DashboardConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &DashboardConfig) -> Result<(), PipelineError> {
    validate_pipeline(config)?;
    validate_sampling(config)?;
    validate_note(config)?;
    Ok(())
}

fn validate_pipeline(config: &DashboardConfig) -> Result<(), PipelineError> {
    if config.pipeline.tick_interval_ms < 10 {
        return Err(PipelineError::config_validation(
            "pipeline.tick_interval_ms",
            format!(
                "tick_interval_ms must be >= 10, got {}",
                config.pipeline.tick_interval_ms
            ),
        ));
    }
    Ok(())
}

fn validate_sampling(config: &DashboardConfig) -> Result<(), PipelineError> {
    config.sampling.validate().map_err(|e| {
        PipelineError::config_validation("sampling", format!("out of range: {e}"))
    })
}

fn validate_note(config: &DashboardConfig) -> Result<(), PipelineError> {
    if let Some(max_chars) = config.note.max_chars {
        if max_chars == 0 {
            return Err(PipelineError::config_validation(
                "note.max_chars",
                "max_chars must be > 0 when set",
            ));
        }
    }
    Ok(())
}
