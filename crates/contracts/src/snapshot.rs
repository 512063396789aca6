//! PipelineSnapshot - controller output
//!
//! Read-only view published to the presentation layer on every change.

use serde::Serialize;

use crate::{PipelineRun, StageDescriptor, StageId, StageState, StageStatus};

/// One stage as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    /// Static catalog entry
    pub descriptor: &'static StageDescriptor,

    /// Per-run mutable state
    pub state: StageState,
}

impl StageView {
    pub fn id(&self) -> StageId {
        self.descriptor.id
    }

    pub fn status(&self) -> StageStatus {
        self.state.status
    }
}

/// Immutable view of the whole dashboard at one instant
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSnapshot {
    /// Current (or most recent) run
    pub run: PipelineRun,

    /// All seven stages, in order
    pub stages: Vec<StageView>,
}

impl PipelineSnapshot {
    /// Snapshot of an untouched dashboard: no run, all stages at baseline
    pub fn initial() -> Self {
        Self {
            run: PipelineRun::default(),
            stages: StageId::all()
                .map(|id| StageView {
                    descriptor: StageDescriptor::for_stage(id),
                    state: StageState::baseline(id),
                })
                .collect(),
        }
    }

    /// Stage view by id
    pub fn stage(&self, id: StageId) -> &StageView {
        &self.stages[id.offset()]
    }

    /// Count of stages currently in the given status
    pub fn count_with_status(&self, status: StageStatus) -> usize {
        self.stages.iter().filter(|s| s.status() == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STAGE_COUNT;

    #[test]
    fn test_initial_snapshot_shape() {
        let snapshot = PipelineSnapshot::initial();
        assert_eq!(snapshot.stages.len(), STAGE_COUNT);
        assert!(!snapshot.run.is_processing);
        assert_eq!(snapshot.run.current_stage, None);
        assert_eq!(snapshot.count_with_status(StageStatus::Processing), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = PipelineSnapshot::initial();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stages"].as_array().unwrap().len(), 7);
    }
}
