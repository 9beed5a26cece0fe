//! Single-run walk engine
//!
//! A run rolls, resolves overshoot, advances, applies at most one transition
//! and checks for a terminal state, looping until the goal is reached or the
//! step limit is hit. The `Walker` owns the per-run buffers so a worker can
//! reuse them for every run it performs.

use rand::Rng;

use crate::board::BoardGraph;
use crate::config::GameConfig;
use crate::error::{Result, SimulationError};
use crate::model::{AbortReason, RunStatus};

/// Rolls reserved up front; the buffer grows on demand up to the step limit
const INITIAL_ROLL_CAPACITY: usize = 256;

/// Rules of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkParams {
    pub allow_overshoot: bool,
    pub max_steps: u32,
    /// Consecutive rejected overshoot rolls before giving up; `None` retries forever
    pub max_overshoot_retries: Option<u32>,
}

impl From<&GameConfig> for WalkParams {
    fn from(config: &GameConfig) -> Self {
        Self {
            allow_overshoot: config.allow_overshoot,
            max_steps: config.max_simulation_steps,
            max_overshoot_retries: config.max_overshoot_retries,
        }
    }
}

/// Result of one run, borrowed from the walker's buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome<'w> {
    pub status: RunStatus,
    /// Counted rolls in order; rejected overshoot rolls are not included
    pub rolls: &'w [u32],
    /// Times each transition was taken in this run, indexed by `TransitionId`
    pub transition_usage: &'w [u32],
    /// The winning roll was clamped onto the goal
    pub won_by_overshoot: bool,
}

impl RunOutcome<'_> {
    #[must_use]
    pub fn num_rolls(&self) -> usize {
        self.rolls.len()
    }
}

/// Reusable single-run state machine over a board
#[derive(Debug)]
pub struct Walker<'b> {
    board: &'b BoardGraph,
    params: WalkParams,
    rolls: Vec<u32>,
    usage: Vec<u32>,
}

impl<'b> Walker<'b> {
    pub fn new(board: &'b BoardGraph, params: WalkParams) -> Result<Self> {
        let num_transitions = board.transitions().len();
        let mut usage = Vec::new();
        usage
            .try_reserve_exact(num_transitions)
            .map_err(SimulationError::alloc("usage counters", num_transitions))?;
        usage.resize(num_transitions, 0);

        let capacity = (params.max_steps as usize).min(INITIAL_ROLL_CAPACITY);
        let mut rolls = Vec::new();
        rolls
            .try_reserve_exact(capacity)
            .map_err(SimulationError::alloc("roll sequence", capacity))?;

        Ok(Self {
            board,
            params,
            rolls,
            usage,
        })
    }

    /// Play one run with dice drawn uniformly from `rng`
    pub fn walk<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RunOutcome<'_>> {
        let sides = self.board.dice_sides();
        self.walk_with(|| rng.random_range(1..=sides))
    }

    /// Play one run with dice values supplied by `roll_dice`.
    ///
    /// Every value must lie in `1..=dice_sides`.
    pub fn walk_with<F>(&mut self, mut roll_dice: F) -> Result<RunOutcome<'_>>
    where
        F: FnMut() -> u32,
    {
        self.rolls.clear();
        self.usage.fill(0);

        let goal = self.board.goal();
        let max_steps = self.params.max_steps as usize;
        let mut position = 0;
        let mut rejected = 0;

        let (status, won_by_overshoot) = loop {
            let mut roll = roll_dice();

            let overshoot = roll > goal - position;
            if overshoot {
                if !self.params.allow_overshoot {
                    rejected += 1;
                    if let Some(limit) = self.params.max_overshoot_retries
                        && rejected >= limit
                    {
                        break (RunStatus::Aborted(AbortReason::OvershootRetryLimit), false);
                    }
                    continue;
                }
                roll = goal - position;
            }
            rejected = 0;

            self.record_roll(roll)?;
            position = self.board.successor(position, roll);

            let (next, taken) = self.board.destination(position);
            if let Some(id) = taken {
                self.usage[id.index()] += 1;
            }
            position = next;

            if position == goal {
                break (RunStatus::Won, overshoot);
            }
            if self.rolls.len() >= max_steps {
                break (RunStatus::Aborted(AbortReason::StepLimit), false);
            }
        };

        Ok(RunOutcome {
            status,
            rolls: &self.rolls,
            transition_usage: &self.usage,
            won_by_overshoot,
        })
    }

    fn record_roll(&mut self, roll: u32) -> Result<()> {
        if self.rolls.len() == self.rolls.capacity() {
            let additional = self.rolls.len().max(1);
            let requested = self.rolls.len() + additional;
            self.rolls
                .try_reserve(additional)
                .map_err(SimulationError::alloc("roll sequence", requested))?;
        }
        self.rolls.push(roll);
        Ok(())
    }
}

/// Replay a recorded roll sequence from the start.
///
/// Returns the final position, or `None` if a roll would have carried the
/// token past the goal.
#[must_use]
pub fn replay(board: &BoardGraph, rolls: &[u32]) -> Option<u32> {
    let goal = board.goal();
    rolls.iter().try_fold(0, |position, &roll| {
        if roll > goal - position {
            return None;
        }
        let (next, _) = board.destination(board.successor(position, roll));
        Some(next)
    })
}
