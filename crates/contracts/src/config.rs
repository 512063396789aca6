//! DashboardConfig - dashboard configuration surface
//!
//! Parsed by the config_loader crate from TOML or JSON. Every field has a
//! default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::SamplingParams;

/// Top-level dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Stage progression timing
    pub pipeline: PipelineSettings,

    /// Default sampling sliders (captured, never consumed by any logic)
    pub sampling: SamplingParams,

    /// Clinical note input limits
    pub note: NoteSettings,
}

/// Timing of the scripted stage progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Interval between stage transitions, milliseconds
    pub tick_interval_ms: u64,

    /// Delay before stage 1 first shows as processing, milliseconds
    pub start_delay_ms: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            start_delay_ms: 300,
        }
    }
}

/// Note input limits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteSettings {
    /// Maximum accepted note length in characters (None = unlimited)
    pub max_chars: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.pipeline.tick_interval_ms, 1000);
        assert_eq!(config.pipeline.start_delay_ms, 300);
        assert_eq!(config.sampling.top_p, 0.95);
        assert!(config.note.max_chars.is_none());
    }

    #[test]
    fn test_empty_json_is_valid() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.pipeline.tick_interval_ms, 1000);
    }
}
