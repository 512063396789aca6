//! Error definitions
//!
//! The run-facing variants (`InvalidInput`, `StageOutOfRange`) are local
//! and recoverable: they are surfaced directly to the caller/UI and never
//! retried or escalated. The config variants cover the dashboard
//! configuration layer; no fatal class exists because no operation
//! performs real extraction work.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Run started with an empty clinical note
    #[error("invalid input: clinical note is empty")]
    InvalidInput,

    /// Stage index outside the fixed 1..=7 range
    #[error("stage index {index} out of range (valid: 1..={max})")]
    StageOutOfRange { index: u8, max: u8 },

    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Create an out-of-range error for the fixed stage set
    pub fn stage_out_of_range(index: u8) -> Self {
        Self::StageOutOfRange {
            index,
            max: crate::STAGE_COUNT as u8,
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
