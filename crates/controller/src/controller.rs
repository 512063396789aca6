//! PipelineStageController - stage records, run state, and transitions

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use contracts::{
    DashboardConfig, PipelineError, PipelineRun, PipelineSnapshot, SamplingParams,
    StageDescriptor, StageId, StageState, StageStatus, StageView, STAGE_COUNT,
};
use observability::{
    record_expand_toggled, record_run_completed, record_run_started, record_stage_completed,
    record_stage_started, RunMetricsAggregator, RunMetricsSummary,
};

use crate::ticker::TickerHandle;

/// Controller timing configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Interval between stage transitions
    pub tick_interval: Duration,

    /// Pre-roll before the first transition fires
    pub start_delay: Duration,

    /// Spawn the timer task on `start_run`; disable to drive
    /// `advance_stage` manually (scripting, tests)
    pub animate: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            start_delay: Duration::from_millis(300),
            animate: true,
        }
    }
}

impl From<&DashboardConfig> for ControllerConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.pipeline.tick_interval_ms),
            start_delay: Duration::from_millis(config.pipeline.start_delay_ms),
            animate: true,
        }
    }
}

/// Result of one `advance_stage` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Previous stage completed, the given stage is now processing
    Advanced(StageId),

    /// Stage 7 completed, the run is finished
    Finished,

    /// No run in flight, call was a no-op
    NotRunning,
}

/// Mutable state guarded by the controller mutex
struct ControllerState {
    run: PipelineRun,
    stages: [StageState; STAGE_COUNT],
}

impl ControllerState {
    fn initial() -> Self {
        let mut stages = [StageState::baseline(StageId::FIRST); STAGE_COUNT];
        for id in StageId::all() {
            stages[id.offset()] = StageState::baseline(id);
        }
        Self {
            run: PipelineRun::default(),
            stages,
        }
    }

    fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            run: self.run.clone(),
            stages: StageId::all()
                .map(|id| StageView {
                    descriptor: StageDescriptor::for_stage(id),
                    state: self.stages[id.offset()],
                })
                .collect(),
        }
    }
}

/// Pipeline stage controller
///
/// Cheap to clone; all clones share the same state and redraw channel.
///
/// Invariants upheld across every operation:
/// - at most one stage is `processing` at a time
/// - `current_stage` is `None` exactly when `is_processing` is false
/// - `expanded` flags are never touched by status transitions
#[derive(Clone)]
pub struct PipelineStageController {
    state: Arc<Mutex<ControllerState>>,
    redraw: watch::Sender<PipelineSnapshot>,
    ticker: Arc<Mutex<Option<TickerHandle>>>,
    metrics: Arc<Mutex<RunMetricsAggregator>>,
    config: ControllerConfig,
}

impl PipelineStageController {
    /// Create a controller with default timing
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Create a controller with custom timing
    pub fn with_config(config: ControllerConfig) -> Self {
        let state = ControllerState::initial();
        let (redraw, _) = watch::channel(state.snapshot());
        Self {
            state: Arc::new(Mutex::new(state)),
            redraw,
            ticker: Arc::new(Mutex::new(None)),
            metrics: Arc::new(Mutex::new(RunMetricsAggregator::new())),
            config,
        }
    }

    /// Start a new run for the given clinical note
    ///
    /// Rejects an empty note without touching any state. On success the
    /// previous ticker (if any) is cancelled, every stage resets to its
    /// baseline, stage 1 becomes `processing`, and a new ticker is
    /// scheduled.
    #[instrument(name = "controller_start_run", skip(self, note_text))]
    pub fn start_run(&self, note_text: &str) -> Result<(), PipelineError> {
        self.start_run_with_sampling(note_text, SamplingParams::default())
    }

    /// Start a new run with explicit sampling parameters
    ///
    /// The parameters are captured into the run snapshot but never
    /// consulted by any transition.
    pub fn start_run_with_sampling(
        &self,
        note_text: &str,
        sampling: SamplingParams,
    ) -> Result<(), PipelineError> {
        if note_text.is_empty() {
            return Err(PipelineError::InvalidInput);
        }

        // A new run implicitly destroys the previous one.
        self.release_ticker();

        {
            let mut state = self.lock_state();
            state.run = PipelineRun::new(note_text.to_string(), sampling);
            for id in StageId::all() {
                let expanded = state.stages[id.offset()].expanded;
                state.stages[id.offset()] = StageState {
                    status: StageState::baseline(id).status,
                    expanded,
                };
            }
            state.stages[StageId::FIRST.offset()].status = StageStatus::Processing;

            record_run_started();
            record_stage_started(StageId::FIRST);
            self.metrics.lock().expect("metrics lock").run_started();

            info!(
                chars = state.run.note_stats().chars,
                tokens = state.run.note_stats().tokens,
                "run started"
            );
            self.publish(&state);
        }

        if self.config.animate {
            let handle = TickerHandle::spawn(
                self.clone(),
                self.config.start_delay,
                self.config.tick_interval,
            );
            *self.ticker.lock().expect("ticker lock") = Some(handle);
        }

        Ok(())
    }

    /// Advance the scripted progression by one stage
    ///
    /// Timer-driven during an animated run; callable directly when
    /// animation is disabled. A call with no run in flight is a no-op.
    #[instrument(name = "controller_advance_stage", skip(self))]
    pub fn advance_stage(&self) -> AdvanceOutcome {
        let outcome = {
            let mut state = self.lock_state();

            let Some(current) = state.run.current_stage else {
                debug!("advance_stage called with no run in flight");
                return AdvanceOutcome::NotRunning;
            };

            state.stages[current.offset()].status = StageStatus::Complete;
            record_stage_completed(current);
            self.metrics
                .lock()
                .expect("metrics lock")
                .stage_completed(current);

            let outcome = match current.next() {
                Some(next) => {
                    state.stages[next.offset()].status = StageStatus::Processing;
                    state.run.current_stage = Some(next);
                    record_stage_started(next);
                    debug!(completed = %current, processing = %next, "stage advanced");
                    AdvanceOutcome::Advanced(next)
                }
                None => {
                    state.run.finish();
                    record_run_completed();
                    self.metrics.lock().expect("metrics lock").run_completed();
                    info!(mrs = ?state.run.mrs_score, "run complete");
                    AdvanceOutcome::Finished
                }
            };

            self.publish(&state);
            outcome
        };

        // Guaranteed ticker release on the terminal transition. Aborting
        // from inside the ticker task is safe: the loop exits before its
        // next await point.
        if outcome == AdvanceOutcome::Finished {
            self.release_ticker();
        }

        outcome
    }

    /// Flip the detail-panel flag for a stage
    ///
    /// Valid in any run state; `expanded` is independent of `status`.
    /// Returns the new flag value.
    pub fn toggle_expanded(&self, index: u8) -> Result<bool, PipelineError> {
        let id = StageId::new(index)?;
        let mut state = self.lock_state();

        let record = &mut state.stages[id.offset()];
        record.expanded = !record.expanded;
        let expanded = record.expanded;

        record_expand_toggled(id, expanded);
        debug!(stage = %id, expanded, "panel toggled");
        self.publish(&state);
        Ok(expanded)
    }

    /// Read-only view of the current run and all stage records
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.lock_state().snapshot()
    }

    /// Subscribe to redraw signals
    ///
    /// The receiver observes every published snapshot, starting from the
    /// current one.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.redraw.subscribe()
    }

    /// Aggregated metrics across all runs of this controller
    pub fn metrics_summary(&self) -> RunMetricsSummary {
        self.metrics.lock().expect("metrics lock").summary()
    }

    /// Cancel the scheduled progression, if one is in flight
    pub fn release_ticker(&self) {
        if let Some(handle) = self.ticker.lock().expect("ticker lock").take() {
            drop(handle);
            debug!("ticker released");
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ControllerState> {
        self.state.lock().expect("controller state lock")
    }

    fn publish(&self, state: &ControllerState) {
        // send_replace never fails, even with no subscribers
        self.redraw.send_replace(state.snapshot());
    }
}

impl Default for PipelineStageController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PipelineStageController {
    fn drop(&mut self) {
        // Last clone going away tears down the timer task.
        if Arc::strong_count(&self.ticker) == 1 {
            self.release_ticker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_controller() -> PipelineStageController {
        PipelineStageController::with_config(ControllerConfig {
            animate: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_note_rejected_without_state_change() {
        let controller = manual_controller();
        let err = controller.start_run("").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput));

        let snapshot = controller.snapshot();
        assert!(!snapshot.run.is_processing);
        assert_eq!(snapshot.run.current_stage, None);
        assert_eq!(snapshot.count_with_status(StageStatus::Processing), 0);
    }

    #[test]
    fn test_start_run_sets_stage_one_processing() {
        let controller = manual_controller();
        controller.start_run("Patient reports weakness.").unwrap();

        let snapshot = controller.snapshot();
        assert!(snapshot.run.is_processing);
        assert_eq!(snapshot.run.current_stage, Some(StageId::FIRST));
        assert_eq!(
            snapshot.stage(StageId::FIRST).status(),
            StageStatus::Processing
        );
        for id in StageId::all().skip(1) {
            assert_eq!(snapshot.stage(id).status(), StageStatus::Idle);
        }
    }

    #[test]
    fn test_seven_advances_complete_the_run_in_order() {
        let controller = manual_controller();
        controller.start_run("Patient reports weakness.").unwrap();

        for step in 1..=7u8 {
            let snapshot = controller.snapshot();
            // Never more than one stage processing
            assert_eq!(snapshot.count_with_status(StageStatus::Processing), 1);
            assert_eq!(snapshot.run.current_stage, Some(StageId::new(step).unwrap()));

            let outcome = controller.advance_stage();
            if step < 7 {
                assert_eq!(
                    outcome,
                    AdvanceOutcome::Advanced(StageId::new(step + 1).unwrap())
                );
            } else {
                assert_eq!(outcome, AdvanceOutcome::Finished);
            }
        }

        let snapshot = controller.snapshot();
        assert!(!snapshot.run.is_processing);
        assert_eq!(snapshot.run.current_stage, None);
        assert_eq!(snapshot.count_with_status(StageStatus::Complete), 7);
        assert_eq!(snapshot.run.mrs_score, Some(3));
        assert_eq!(snapshot.run.elapsed_display, Some("3.8s"));
    }

    #[test]
    fn test_advance_without_run_is_noop() {
        let controller = manual_controller();
        assert_eq!(controller.advance_stage(), AdvanceOutcome::NotRunning);

        controller.start_run("note").unwrap();
        for _ in 0..7 {
            controller.advance_stage();
        }
        // Past the end, further calls stay no-ops
        assert_eq!(controller.advance_stage(), AdvanceOutcome::NotRunning);
        assert_eq!(
            controller.snapshot().count_with_status(StageStatus::Complete),
            7
        );
    }

    #[test]
    fn test_toggle_expanded_round_trip() {
        let controller = manual_controller();
        for index in 1..=7u8 {
            let before = controller
                .snapshot()
                .stage(StageId::new(index).unwrap())
                .state
                .expanded;
            controller.toggle_expanded(index).unwrap();
            controller.toggle_expanded(index).unwrap();
            let after = controller
                .snapshot()
                .stage(StageId::new(index).unwrap())
                .state
                .expanded;
            assert_eq!(before, after, "stage {index} round trip");
        }
    }

    #[test]
    fn test_toggle_expanded_out_of_range() {
        let controller = manual_controller();
        let before = controller.snapshot();

        let err = controller.toggle_expanded(8).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::StageOutOfRange { index: 8, max: 7 }
        ));
        let err = controller.toggle_expanded(0).unwrap_err();
        assert!(matches!(err, PipelineError::StageOutOfRange { .. }));

        let after = controller.snapshot();
        for id in StageId::all() {
            assert_eq!(before.stage(id).state, after.stage(id).state);
        }
    }

    #[test]
    fn test_toggle_never_changes_status() {
        let controller = manual_controller();
        controller.start_run("note").unwrap();
        controller.advance_stage();

        let status_before = controller.snapshot().stage(StageId::new(2).unwrap()).status();
        controller.toggle_expanded(2).unwrap();
        let status_after = controller.snapshot().stage(StageId::new(2).unwrap()).status();
        assert_eq!(status_before, status_after);
    }

    #[test]
    fn test_new_run_resets_statuses_not_expansion() {
        let controller = manual_controller();
        controller.start_run("first note").unwrap();
        for _ in 0..7 {
            controller.advance_stage();
        }
        controller.toggle_expanded(5).unwrap();
        let expanded_before = controller
            .snapshot()
            .stage(StageId::new(5).unwrap())
            .state
            .expanded;

        controller.start_run("second note").unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(
            snapshot.stage(StageId::FIRST).status(),
            StageStatus::Processing
        );
        assert_eq!(snapshot.stage(StageId::new(5).unwrap()).status(), StageStatus::Idle);
        // Panel flags survive across runs
        assert_eq!(
            snapshot.stage(StageId::new(5).unwrap()).state.expanded,
            expanded_before
        );
        assert!(snapshot.run.mrs_score.is_none());
        assert_eq!(snapshot.run.note_text, "second note");
    }

    #[test]
    fn test_documented_end_to_end_transcript() {
        let controller = manual_controller();
        controller.start_run("Patient reports weakness.").unwrap();
        assert_eq!(
            controller.snapshot().stage(StageId::FIRST).status(),
            StageStatus::Processing
        );

        controller.advance_stage();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.stage(StageId::FIRST).status(), StageStatus::Complete);
        assert_eq!(
            snapshot.stage(StageId::new(2).unwrap()).status(),
            StageStatus::Processing
        );
        assert_eq!(snapshot.run.current_stage, Some(StageId::new(2).unwrap()));

        for _ in 0..6 {
            controller.advance_stage();
        }
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.count_with_status(StageStatus::Complete), 7);
        assert!(!snapshot.run.is_processing);
    }

    #[test]
    fn test_metrics_summary_counts_runs() {
        let controller = manual_controller();
        controller.start_run("note").unwrap();
        for _ in 0..7 {
            controller.advance_stage();
        }
        let summary = controller.metrics_summary();
        assert_eq!(summary.runs_started, 1);
        assert_eq!(summary.runs_completed, 1);
        assert_eq!(summary.total_ticks, 7);
    }

    #[test]
    fn test_subscribe_observes_changes() {
        let controller = manual_controller();
        let rx = controller.subscribe();
        assert!(!rx.borrow().run.is_processing);

        controller.start_run("note").unwrap();
        assert!(rx.borrow().run.is_processing);

        controller.advance_stage();
        assert_eq!(
            rx.borrow().run.current_stage,
            Some(StageId::new(2).unwrap())
        );
    }
}
