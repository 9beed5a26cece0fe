//! Simulation outcomes
//!
//! `RunStatus` describes how a single walk ended; `SimulationResults` is the
//! aggregate over every run of a batch.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ids::TransitionId;
use crate::config::TransitionKind;

/// Why a run stopped before reaching the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The step counter reached `max_simulation_steps`
    StepLimit,
    /// Too many consecutive overshoot rolls were rejected
    OvershootRetryLimit,
}

/// Terminal state of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Won,
    Aborted(AbortReason),
}

impl RunStatus {
    #[must_use]
    pub fn is_won(self) -> bool {
        matches!(self, RunStatus::Won)
    }
}

/// Cumulative usage of one transition over a whole batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionUsage {
    pub id: TransitionId,
    pub kind: TransitionKind,
    pub start: u32,
    pub end: u32,
    pub times_used: u64,
}

/// Aggregated statistics of a simulation batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Number of runs simulated
    pub iterations: u64,
    /// Runs that reached the goal
    pub completed_runs: u64,
    /// Runs stopped by the step limit or the overshoot retry cap
    pub aborted_runs: u64,
    /// Runs won with a roll clamped onto the goal
    pub overshoot_wins: u64,
    /// Mean rolls per completed run, `0.0` when every run aborted
    pub average_rolls: f64,
    /// Shortest winning roll sequence; the earliest run wins ties
    pub shortest_roll_sequence: Option<Vec<u32>>,
    /// Per-transition usage in board order (snakes first)
    pub transitions: Vec<TransitionUsage>,
    pub elapsed: Duration,
    /// Seed the batch was run with
    pub seed: u64,
}

impl SimulationResults {
    /// Length of the shortest winning sequence, if any run won
    #[must_use]
    pub fn shortest_num_rolls(&self) -> Option<usize> {
        self.shortest_roll_sequence.as_ref().map(Vec::len)
    }

    pub fn snakes(&self) -> impl Iterator<Item = &TransitionUsage> {
        self.of_kind(TransitionKind::Snake)
    }

    pub fn ladders(&self) -> impl Iterator<Item = &TransitionUsage> {
        self.of_kind(TransitionKind::Ladder)
    }

    fn of_kind(&self, kind: TransitionKind) -> impl Iterator<Item = &TransitionUsage> {
        self.transitions.iter().filter(move |t| t.kind == kind)
    }

    /// Total usages over all transitions of `kind`
    #[must_use]
    pub fn total_usage(&self, kind: TransitionKind) -> u64 {
        self.of_kind(kind).map(|t| t.times_used).sum()
    }

    /// Share of `usage` among all transitions of its kind, in percent
    #[must_use]
    pub fn usage_share(&self, usage: &TransitionUsage) -> f64 {
        let total = self.total_usage(usage.kind);
        if total == 0 {
            0.0
        } else {
            usage.times_used as f64 / total as f64 * 100.0
        }
    }
}
