//! PipelineRun - one simulated extraction attempt
//!
//! A run is created when the user triggers extraction and replaced
//! implicitly when a new run starts; nothing persists across runs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{DEMO_ELAPSED, DEMO_MRS_SCORE};
use crate::StageId;

/// State of a single extraction attempt
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineRun {
    /// The clinical note text as submitted
    pub note_text: String,

    /// Currently processing stage, `None` whenever no run is in flight
    pub current_stage: Option<StageId>,

    /// Whether the scripted progression is in flight
    pub is_processing: bool,

    /// Sampling parameters captured at start (never consumed by any logic)
    pub sampling: SamplingParams,

    /// Total time figure shown on completion (display-only, not measured)
    pub elapsed_display: Option<&'static str>,

    /// Demo mRS score, populated only on completion
    pub mrs_score: Option<u8>,
}

impl PipelineRun {
    /// Create a fresh run for the given note
    pub fn new(note_text: String, sampling: SamplingParams) -> Self {
        Self {
            note_text,
            current_stage: Some(StageId::FIRST),
            is_processing: true,
            sampling,
            elapsed_display: None,
            mrs_score: None,
        }
    }

    /// Mark the run finished and fill in the demo result figures
    pub fn finish(&mut self) {
        self.is_processing = false;
        self.current_stage = None;
        self.elapsed_display = Some(DEMO_ELAPSED);
        self.mrs_score = Some(DEMO_MRS_SCORE);
    }

    /// Character/token statistics for the submitted note
    pub fn note_stats(&self) -> NoteStats {
        NoteStats::of(&self.note_text)
    }
}

/// Model sampling parameters
///
/// Captured from the dashboard sliders and surfaced in snapshots, but no
/// transition ever consults them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SamplingParams {
    /// Sampling temperature
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: f64,

    /// Nucleus sampling parameter
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.95,
        }
    }
}

/// Inference routing strategy
///
/// Declared on the stage 4 panel but never exercised by any transition.
/// Do not wire routing semantics to it without product clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    #[default]
    Auto,
    Local,
    External,
}

/// Character and token figures for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub chars: usize,
    pub tokens: usize,
}

impl NoteStats {
    /// Estimate statistics for a note (tokens approximated as chars / 4,
    /// rounded up, matching the dashboard counter)
    pub fn of(note: &str) -> Self {
        let chars = note.chars().count();
        Self {
            chars,
            tokens: chars.div_ceil(4),
        }
    }
}
