//! Game configuration
//!
//! `GameConfig` is the immutable description of a board and of the simulation
//! run on it. Both the board builder and the simulation driver assume the value
//! has passed [`GameConfig::validate`]; the builder DSL and the file loaders
//! guarantee that.
//!
//! # Builder DSL
//!
//! ```ignore
//! use snakesim_core::config::GameBuilder;
//!
//! let config = GameBuilder::new()
//!     .grid(10, 10)
//!     .dice(6)
//!     .iterations(10_000)
//!     .snake(98, 12)
//!     .ladder(4, 56)
//!     .build()?;
//! ```

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub mod builder;

pub use builder::GameBuilder;

pub const DEFAULT_ITERATIONS: u64 = 100;
pub const DEFAULT_MAX_SIMULATION_STEPS: u32 = 1000;
pub const DEFAULT_ROWS: u32 = 10;
pub const DEFAULT_COLS: u32 = 10;
pub const DEFAULT_DICE_SIDES: u32 = 6;

/// Which list a transition was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Snake,
    Ladder,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Snake => write!(f, "snake"),
            TransitionKind::Ladder => write!(f, "ladder"),
        }
    }
}

/// A shortcut between two 1-based board positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub start: u32,
    pub end: u32,
}

impl Transition {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    fn touches(&self, position: u32) -> bool {
        self.start == position || self.end == position
    }
}

/// Complete board and simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Simulation ===
    pub iterations: u64,
    pub max_simulation_steps: u32,
    /// Consecutive rejected overshoot rolls after which a run is aborted.
    /// `None` keeps re-rolling until a roll fits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_overshoot_retries: Option<u32>,

    // === Board ===
    pub rows: u32,
    pub cols: u32,
    pub dice_sides: u32,
    pub allow_overshoot: bool,
    pub snakes: Vec<Transition>,
    pub ladders: Vec<Transition>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            max_simulation_steps: DEFAULT_MAX_SIMULATION_STEPS,
            max_overshoot_retries: None,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            dice_sides: DEFAULT_DICE_SIDES,
            allow_overshoot: true,
            snakes: Vec::new(),
            ladders: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Number of fields on the board; the last one is the goal
    #[must_use]
    pub fn num_fields(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    /// 1-based position of the goal field
    #[must_use]
    pub fn goal(&self) -> u32 {
        self.num_fields()
    }

    /// All transitions, snakes first, each list in declaration order
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionKind, Transition)> + '_ {
        self.snakes
            .iter()
            .map(|t| (TransitionKind::Snake, *t))
            .chain(self.ladders.iter().map(|t| (TransitionKind::Ladder, *t)))
    }

    /// Check every invariant the board builder and simulation rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroCols);
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(ConfigError::BoardTooLarge {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.dice_sides < 2 {
            return Err(ConfigError::TooFewDiceSides(self.dice_sides));
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.max_simulation_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }

        let mut claimed = FxHashSet::default();
        for (kind, transition) in self.transitions() {
            self.check_shape(kind, transition)?;
            for position in [transition.start, transition.end] {
                if claimed.contains(&position) {
                    return Err(ConfigError::SharedEndpoint {
                        kind,
                        start: transition.start,
                        end: transition.end,
                        position,
                    });
                }
            }
            claimed.insert(transition.start);
            claimed.insert(transition.end);
        }

        Ok(())
    }

    /// Check whether `transition` could be added to this configuration.
    ///
    /// Rules are applied in the order the config loader reports them: self
    /// loop, start on goal, collision with an existing transition, bounds,
    /// direction.
    pub fn check_transition(
        &self,
        kind: TransitionKind,
        transition: Transition,
    ) -> Result<(), ConfigError> {
        let Transition { start, end } = transition;
        if start == end {
            return Err(ConfigError::SelfLoop {
                kind,
                position: start,
            });
        }
        if start == self.goal() {
            return Err(ConfigError::StartsOnGoal { kind, start });
        }
        if let Some(position) = self
            .transitions()
            .find_map(|(_, existing)| [start, end].into_iter().find(|p| existing.touches(*p)))
        {
            return Err(ConfigError::SharedEndpoint {
                kind,
                start,
                end,
                position,
            });
        }
        self.check_shape(kind, transition)
    }

    fn check_shape(&self, kind: TransitionKind, transition: Transition) -> Result<(), ConfigError> {
        let Transition { start, end } = transition;
        let num_fields = self.num_fields();

        if start == end {
            return Err(ConfigError::SelfLoop {
                kind,
                position: start,
            });
        }
        if start == self.goal() {
            return Err(ConfigError::StartsOnGoal { kind, start });
        }
        if start == 0 || end == 0 || start > num_fields || end > num_fields {
            return Err(ConfigError::OutOfBounds {
                kind,
                start,
                end,
                num_fields,
            });
        }
        let wrong_direction = match kind {
            TransitionKind::Snake => start < end,
            TransitionKind::Ladder => start > end,
        };
        if wrong_direction {
            return Err(ConfigError::WrongDirection { kind, start, end });
        }
        Ok(())
    }
}
