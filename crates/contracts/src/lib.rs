//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures.
//! All business crates can only depend on this crate, reverse dependencies
//! are prohibited.
//!
//! ## Stage Model
//! - Exactly 7 pipeline stages, indexed 1..=7, fixed at compile time
//! - Every displayed figure (byte counts, keyword hits, the mRS score) is a
//!   demo constant from the stage catalog; no real extraction is performed

mod catalog;
mod config;
mod error;
mod run;
mod snapshot;
mod stage;

pub use catalog::{stage_catalog, StageDescriptor, StageDetail, STAGE_COUNT};
pub use config::{DashboardConfig, NoteSettings, PipelineSettings};
pub use error::PipelineError;
pub use run::{NoteStats, PipelineRun, RoutingStrategy, SamplingParams};
pub use snapshot::{PipelineSnapshot, StageView};
pub use stage::{StageId, StageState, StageStatus};
