//! TickerHandle - cancellable handle to the stage-progression timer task
//!
//! The timer is a scripted animation: one `advance_stage` per tick, no
//! real work awaited. The handle aborts the task on drop, so the timer is
//! released on run completion, on a new run starting, and on controller
//! teardown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use observability::record_tick;

use crate::controller::{AdvanceOutcome, PipelineStageController};

/// Handle to a running progression timer
pub struct TickerHandle {
    handle: JoinHandle<()>,
}

impl TickerHandle {
    /// Spawn the timer task for the controller's current run
    pub fn spawn(
        controller: PipelineStageController,
        start_delay: Duration,
        tick_interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            ticker_loop(controller, start_delay, tick_interval).await;
        });
        Self { handle }
    }

    /// Whether the timer task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the timer task
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Timer loop: one stage transition per tick until the run finishes
#[instrument(name = "ticker_loop", skip_all)]
async fn ticker_loop(
    controller: PipelineStageController,
    start_delay: Duration,
    tick_interval: Duration,
) {
    debug!(
        start_delay_ms = start_delay.as_millis() as u64,
        tick_interval_ms = tick_interval.as_millis() as u64,
        "ticker started"
    );

    if !start_delay.is_zero() {
        tokio::time::sleep(start_delay).await;
    }

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately; swallow it so
    // stage 1 stays on screen for a full period.
    interval.tick().await;

    loop {
        interval.tick().await;
        record_tick();

        match controller.advance_stage() {
            AdvanceOutcome::Advanced(next) => {
                debug!(stage = %next, "tick advanced progression");
            }
            AdvanceOutcome::Finished => {
                debug!("progression reached the final stage");
                break;
            }
            AdvanceOutcome::NotRunning => {
                // Run was replaced or torn down from under the timer.
                break;
            }
        }
    }

    debug!("ticker stopped");
}
