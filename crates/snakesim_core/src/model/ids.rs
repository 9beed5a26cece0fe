//! Identifiers for board entities

use serde::{Deserialize, Serialize};

/// Index of a transition in the board's transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u32);

impl TransitionId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
