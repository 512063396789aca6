//! Pipeline run metrics collection
//!
//! Records counters for the scripted stage progression and aggregates
//! per-run statistics for the end-of-run summary.

use contracts::{StageDescriptor, StageId};
use metrics::{counter, gauge};
use std::collections::HashMap;

/// Record the start of a run
pub fn record_run_started() {
    counter!("mrs_pipeline_runs_started_total").increment(1);
    gauge!("mrs_pipeline_run_in_progress").set(1.0);
}

/// Record run completion
pub fn record_run_completed() {
    counter!("mrs_pipeline_runs_completed_total").increment(1);
    gauge!("mrs_pipeline_run_in_progress").set(0.0);
}

/// Record a stage entering `processing`
///
/// Called on every transition of the scripted progression.
///
/// # Example
///
/// ```ignore
/// use observability::record_stage_started;
///
/// record_stage_started(stage_id);
/// ```
pub fn record_stage_started(stage: StageId) {
    let title = StageDescriptor::for_stage(stage).title;
    counter!("mrs_pipeline_stage_started_total", "stage" => title).increment(1);
    gauge!("mrs_pipeline_current_stage").set(stage.get() as f64);
}

/// Record a stage reaching `complete`
pub fn record_stage_completed(stage: StageId) {
    let title = StageDescriptor::for_stage(stage).title;
    counter!("mrs_pipeline_stage_completed_total", "stage" => title).increment(1);
}

/// Record one timer tick observed by the controller
pub fn record_tick() {
    counter!("mrs_pipeline_ticks_total").increment(1);
}

/// Record a detail-panel toggle
pub fn record_expand_toggled(stage: StageId, expanded: bool) {
    let state = if expanded { "expanded" } else { "collapsed" };
    counter!(
        "mrs_pipeline_panel_toggles_total",
        "stage" => StageDescriptor::for_stage(stage).title,
        "state" => state
    )
    .increment(1);
}

/// Run metrics aggregator
///
/// Aggregates in memory for the end-of-run summary printout.
#[derive(Debug, Clone, Default)]
pub struct RunMetricsAggregator {
    /// Runs started
    pub runs_started: u64,

    /// Runs that reached stage 7 completion
    pub runs_completed: u64,

    /// Ticks observed across all runs
    pub total_ticks: u64,

    /// Completion count per stage title
    pub stage_completions: HashMap<&'static str, u64>,
}

impl RunMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a run start
    pub fn run_started(&mut self) {
        self.runs_started += 1;
    }

    /// Note a run completion
    pub fn run_completed(&mut self) {
        self.runs_completed += 1;
    }

    /// Note one stage completion
    pub fn stage_completed(&mut self, stage: StageId) {
        self.total_ticks += 1;
        let title = StageDescriptor::for_stage(stage).title;
        *self.stage_completions.entry(title).or_insert(0) += 1;
    }

    /// Generate summary report
    pub fn summary(&self) -> RunMetricsSummary {
        RunMetricsSummary {
            runs_started: self.runs_started,
            runs_completed: self.runs_completed,
            total_ticks: self.total_ticks,
            completion_rate: if self.runs_started > 0 {
                self.runs_completed as f64 / self.runs_started as f64 * 100.0
            } else {
                0.0
            },
            stage_completions: self.stage_completions.clone(),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct RunMetricsSummary {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub total_ticks: u64,
    pub completion_rate: f64,
    pub stage_completions: HashMap<&'static str, u64>,
}

impl std::fmt::Display for RunMetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Run Metrics Summary ===")?;
        writeln!(f, "Runs started: {}", self.runs_started)?;
        writeln!(
            f,
            "Runs completed: {} ({:.2}%)",
            self.runs_completed, self.completion_rate
        )?;
        writeln!(f, "Ticks observed: {}", self.total_ticks)?;

        if !self.stage_completions.is_empty() {
            writeln!(f, "Stage completions:")?;
            let mut titles: Vec<_> = self.stage_completions.iter().collect();
            titles.sort();
            for (title, count) in titles {
                writeln!(f, "  {}: {}", title, count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = RunMetricsAggregator::new();

        aggregator.run_started();
        for id in StageId::all() {
            aggregator.stage_completed(id);
        }
        aggregator.run_completed();

        assert_eq!(aggregator.runs_started, 1);
        assert_eq!(aggregator.runs_completed, 1);
        assert_eq!(aggregator.total_ticks, 7);
        assert_eq!(
            aggregator.stage_completions.get("De-Identification"),
            Some(&1)
        );
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = RunMetricsAggregator::new();
        aggregator.run_started();
        aggregator.run_started();
        aggregator.run_completed();

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Runs started: 2"));
        assert!(output.contains("50.00%"));
    }

    #[test]
    fn test_reset() {
        let mut aggregator = RunMetricsAggregator::new();
        aggregator.run_started();
        aggregator.reset();
        assert_eq!(aggregator.runs_started, 0);
    }
}
