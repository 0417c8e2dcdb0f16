//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulation period. Period 0 is the initial cohort's creation.
pub type Period = u64;

/// A stable, unique identifier for a customer (`c-000000`).
pub type CustomerId = String;

/// Index of a state within the model's ordered state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of a customer's history.
///
/// `Absent` is the out-of-band marker for "not yet created" (left padding)
/// and "no further record" (right padding in the final table). It can never
/// collide with a real state label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCell {
    Absent,
    State(StateId),
}

impl HistoryCell {
    pub fn state(self) -> Option<StateId> {
        match self {
            Self::Absent => None,
            Self::State(s) => Some(s),
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<StateId> for HistoryCell {
    fn from(s: StateId) -> Self {
        Self::State(s)
    }
}
