use std::collections::TryReserveError;
use std::fmt;

use crate::config::TransitionKind;

/// Errors raised while building a board or running a simulation batch
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// A buffer the simulation depends on could not be allocated.
    /// The board graph is left untouched and can be reused.
    AllocationFailure {
        what: &'static str,
        requested: usize,
    },
}

impl SimulationError {
    pub(crate) fn alloc(
        what: &'static str,
        requested: usize,
    ) -> impl FnOnce(TryReserveError) -> Self {
        move |_| SimulationError::AllocationFailure { what, requested }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::AllocationFailure { what, requested } => {
                write!(f, "failed to allocate {what} ({requested} elements)")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Violations of the configuration invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroRows,
    ZeroCols,
    BoardTooLarge {
        rows: u32,
        cols: u32,
    },
    TooFewDiceSides(u32),
    ZeroIterations,
    ZeroMaxSteps,
    SelfLoop {
        kind: TransitionKind,
        position: u32,
    },
    StartsOnGoal {
        kind: TransitionKind,
        start: u32,
    },
    OutOfBounds {
        kind: TransitionKind,
        start: u32,
        end: u32,
        num_fields: u32,
    },
    WrongDirection {
        kind: TransitionKind,
        start: u32,
        end: u32,
    },
    SharedEndpoint {
        kind: TransitionKind,
        start: u32,
        end: u32,
        position: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroRows => write!(f, "number of rows must be positive"),
            ConfigError::ZeroCols => write!(f, "number of cols must be positive"),
            ConfigError::BoardTooLarge { rows, cols } => {
                write!(f, "board of {rows}x{cols} fields is too large")
            }
            ConfigError::TooFewDiceSides(sides) => {
                write!(f, "dice needs at least 2 sides, got {sides}")
            }
            ConfigError::ZeroIterations => write!(f, "number of iterations must be positive"),
            ConfigError::ZeroMaxSteps => {
                write!(f, "maximum number of simulation steps must be positive")
            }
            ConfigError::SelfLoop { kind, position } => {
                write!(f, "{kind} starts and ends on field {position}")
            }
            ConfigError::StartsOnGoal { kind, start } => {
                write!(f, "{kind} must not start on the goal field {start}")
            }
            ConfigError::OutOfBounds {
                kind,
                start,
                end,
                num_fields,
            } => write!(
                f,
                "{kind} {start}:{end} reaches outside the board (1..={num_fields})"
            ),
            ConfigError::WrongDirection { kind, start, end } => match kind {
                TransitionKind::Snake => {
                    write!(f, "snake {start}:{end} must start above its end")
                }
                TransitionKind::Ladder => {
                    write!(f, "ladder {start}:{end} must start below its end")
                }
            },
            ConfigError::SharedEndpoint {
                kind,
                start,
                end,
                position,
            } => write!(
                f,
                "{kind} {start}:{end} shares field {position} with another snake or ladder"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
