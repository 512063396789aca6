//! Static stage catalog
//!
//! The seven pipeline stages with their demo panel content. Every figure
//! here (byte counts, keyword hits, confidence scores, the mRS score) is a
//! hardcoded display constant: the dashboard simulates the pipeline, it
//! does not run it.

use serde::Serialize;

use crate::{RoutingStrategy, StageId, StageStatus};

/// Number of pipeline stages, fixed
pub const STAGE_COUNT: usize = 7;

/// Static catalog entry for one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageDescriptor {
    /// Stage index 1..=7
    pub id: StageId,

    /// Card title, e.g. "De-Identification"
    pub title: &'static str,

    /// One-line subtitle under the title
    pub summary: &'static str,

    /// Status shown before any run has touched this stage
    pub baseline_status: StageStatus,

    /// Demo input size figure
    pub size_in: &'static str,

    /// Demo output size figure
    pub size_out: &'static str,

    /// Demo size change badge, e.g. "-85%"
    pub size_change: &'static str,

    /// Demo wall time figure
    pub wall_time: &'static str,

    /// Expanded-panel demo content
    pub detail: StageDetail,
}

/// Hardcoded detail-panel content, one variant per stage
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageDetail {
    /// Stage 1: PHI redaction before/after sample
    DeIdentification {
        before: &'static str,
        after: &'static str,
        note: &'static str,
    },

    /// Stage 2: whitespace normalization before/after sample
    Preprocessing {
        before: &'static str,
        after: &'static str,
        tokens: &'static str,
    },

    /// Stage 3: keyword hit table and reduction figure
    SnippetExtraction {
        keywords: &'static [(&'static str, u32)],
        reduction_pct: u8,
    },

    /// Stage 4: per-field extraction rows and the declared routing strategy
    Inference {
        routing: RoutingStrategy,
        fields: &'static [(&'static str, &'static str, &'static str)],
    },

    /// Stage 5: validation attempts per field (pass / fail / queued)
    Validation {
        attempts: &'static [(&'static str, &'static [&'static str])],
    },

    /// Stage 6: cache file figures
    CacheStorage {
        path: &'static str,
        size: &'static str,
        fields: &'static str,
    },

    /// Stage 7: component answers, confidences, and the final demo score
    Scoring {
        components: &'static [(&'static str, &'static str, f64)],
        overall_confidence: f64,
        mrs: u8,
    },
}

/// Demo mRS score reported when a run completes
pub(crate) const DEMO_MRS_SCORE: u8 = 3;

/// Demo total time reported when a run completes (display-only, not measured)
pub(crate) const DEMO_ELAPSED: &str = "3.8s";

static CATALOG: [StageDescriptor; STAGE_COUNT] = [
    StageDescriptor {
        id: StageId::FIRST,
        title: "De-Identification",
        summary: "Protect PHI before processing",
        baseline_status: StageStatus::Planned,
        size_in: "80KB",
        size_out: "82KB",
        size_change: "+2%",
        wall_time: "0.3s",
        detail: StageDetail::DeIdentification {
            before: "Patient John Smith, DOB 01/15/1965...",
            after: "Patient [NAME], DOB [DATE]...",
            note: "Required for external API usage. Optional for local models.",
        },
    },
    StageDescriptor {
        id: StageId(2),
        title: "Preprocessing",
        summary: "Normalize text for optimal extraction",
        baseline_status: StageStatus::Idle,
        size_in: "82KB",
        size_out: "78KB",
        size_change: "-5%",
        wall_time: "0.1s",
        detail: StageDetail::Preprocessing {
            before: "Multiple   spaces and\n\n\n\nbreaks",
            after: "Multiple spaces and\n\nbreaks",
            tokens: "20.5K→19.5K",
        },
    },
    StageDescriptor {
        id: StageId(3),
        title: "Snippet Extraction",
        summary: "Extract relevant context using keywords",
        baseline_status: StageStatus::Idle,
        size_in: "78KB",
        size_out: "12KB",
        size_change: "-85%",
        wall_time: "0.5s",
        detail: StageDetail::SnippetExtraction {
            keywords: &[
                ("weakness", 42),
                ("stroke", 28),
                ("paralysis", 15),
                ("aphasia", 12),
            ],
            reduction_pct: 85,
        },
    },
    StageDescriptor {
        id: StageId(4),
        title: "LLM Inference",
        summary: "Generate field extractions",
        baseline_status: StageStatus::Idle,
        size_in: "12KB",
        size_out: "2KB",
        size_change: "-83%",
        wall_time: "1.2s",
        detail: StageDetail::Inference {
            routing: RoutingStrategy::Auto,
            fields: &[
                ("walking_ability", "complete", "0.8s"),
                ("self_care_adls", "complete", "0.9s"),
                ("usual_activities", "complete", "0.7s"),
                ("residual_symptoms", "complete", "0.6s"),
                ("vital_status", "processing", "-"),
            ],
        },
    },
    StageDescriptor {
        id: StageId(5),
        title: "Validation & Retry",
        summary: "Verify and fix invalid responses",
        baseline_status: StageStatus::Idle,
        size_in: "2KB",
        size_out: "2KB",
        size_change: "0%",
        wall_time: "0.4s",
        detail: StageDetail::Validation {
            attempts: &[
                ("walking_ability", &["pass"]),
                ("self_care_adls", &["fail", "pass"]),
                ("usual_activities", &["pass"]),
                ("residual_symptoms", &["fail", "fail", "queue"]),
                ("vital_status", &["pass"]),
            ],
        },
    },
    StageDescriptor {
        id: StageId(6),
        title: "Cache Storage",
        summary: "Save results to disk",
        baseline_status: StageStatus::Idle,
        size_in: "2KB",
        size_out: "3.2KB",
        size_change: "+6KB",
        wall_time: "0.1s",
        detail: StageDetail::CacheStorage {
            path: "/mrs_cache/118477832_b16a1a4961...json",
            size: "3.2 KB",
            fields: "5",
        },
    },
    StageDescriptor {
        id: StageId::LAST,
        title: "mRS Score Calculation",
        summary: "Deterministic scoring from components",
        baseline_status: StageStatus::Idle,
        size_in: "3.2KB",
        size_out: "1KB",
        size_change: "-69%",
        wall_time: "0.2s",
        detail: StageDetail::Scoring {
            components: &[
                ("vital_status_death", "No", 0.95),
                ("walking_ability", "With help", 0.92),
                ("self_care_adls", "Partially", 0.88),
                ("usual_activities_iadls", "Partially", 0.85),
                ("residual_symptoms", "Yes", 0.90),
            ],
            overall_confidence: 0.85,
            mrs: DEMO_MRS_SCORE,
        },
    },
];

/// The full seven-stage catalog, in order
pub fn stage_catalog() -> &'static [StageDescriptor; STAGE_COUNT] {
    &CATALOG
}

impl StageDescriptor {
    /// Look up the catalog entry for a stage
    pub fn for_stage(id: StageId) -> &'static StageDescriptor {
        &CATALOG[id.offset()]
    }

    /// Combined size figure as displayed on the card header
    pub fn size_figure(&self) -> String {
        format!("{} → {}", self.size_in, self.size_out)
    }
}
