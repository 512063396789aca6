//! Stage identity and per-run mutable state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PipelineError, STAGE_COUNT};

/// Stage identifier, fixed range 1..=7.
///
/// The stage set is frozen at compile time: indices are never reordered,
/// added, or removed at runtime.
///
/// # Examples
/// ```
/// use contracts::StageId;
///
/// let id = StageId::new(3).unwrap();
/// assert_eq!(id.get(), 3);
/// assert!(StageId::new(8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub(crate) u8);

impl StageId {
    /// First stage of every run
    pub const FIRST: StageId = StageId(1);

    /// Last stage of every run
    pub const LAST: StageId = StageId(STAGE_COUNT as u8);

    /// Create a stage id, validating the 1..=7 range
    pub fn new(index: u8) -> Result<Self, PipelineError> {
        if (1..=STAGE_COUNT as u8).contains(&index) {
            Ok(Self(index))
        } else {
            Err(PipelineError::stage_out_of_range(index))
        }
    }

    /// Raw 1-based index
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position for array indexing
    pub fn offset(self) -> usize {
        self.0 as usize - 1
    }

    /// Next stage in the fixed sequence, `None` past the last
    pub fn next(self) -> Option<StageId> {
        if self.0 < STAGE_COUNT as u8 {
            Some(StageId(self.0 + 1))
        } else {
            None
        }
    }

    /// Iterate all stage ids in order
    pub fn all() -> impl Iterator<Item = StageId> {
        (1..=STAGE_COUNT as u8).map(StageId)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage status
///
/// `active`, `ready`, `waiting`, and `error` are part of the frozen wire
/// surface but no transition in this release produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Planned,
    Idle,
    Active,
    Processing,
    Ready,
    Waiting,
    Complete,
    Error,
}

impl StageStatus {
    /// Label as displayed on a status badge
    pub fn label(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Waiting => "waiting",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable per-run stage record
///
/// `expanded` controls detail-panel visibility and is fully independent of
/// `status`: toggling one never implicitly changes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageState {
    pub status: StageStatus,
    pub expanded: bool,
}

impl StageState {
    /// Baseline state for a stage before any run has touched it
    pub fn baseline(id: StageId) -> Self {
        // The first card opens expanded in the dashboard, the rest closed.
        Self {
            status: if id == StageId::FIRST {
                StageStatus::Planned
            } else {
                StageStatus::Idle
            },
            expanded: id == StageId::FIRST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_range() {
        assert!(StageId::new(0).is_err());
        assert!(StageId::new(1).is_ok());
        assert!(StageId::new(7).is_ok());
        assert!(StageId::new(8).is_err());
    }

    #[test]
    fn test_stage_id_sequence() {
        let ids: Vec<u8> = StageId::all().map(StageId::get).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(StageId::FIRST.next(), Some(StageId::new(2).unwrap()));
        assert_eq!(StageId::LAST.next(), None);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&StageStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: StageStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(back, StageStatus::Complete);
    }

    #[test]
    fn test_baseline_states() {
        let first = StageState::baseline(StageId::FIRST);
        assert_eq!(first.status, StageStatus::Planned);
        assert!(first.expanded);

        let third = StageState::baseline(StageId::new(3).unwrap());
        assert_eq!(third.status, StageStatus::Idle);
        assert!(!third.expanded);
    }
}
