//! # Controller
//!
//! `PipelineStageController` owns the seven stage records and the current
//! run state, and drives the scripted stage progression.
//!
//! The progression is an animation, not real work: a timer task advances
//! one stage per tick, and nothing is awaited except the clock. State is
//! held by an explicitly owned controller instance (no globals); the
//! presentation layer subscribes to a watch channel for redraw signals.

mod controller;
mod ticker;

pub use controller::{AdvanceOutcome, ControllerConfig, PipelineStageController};
pub use ticker::TickerHandle;
