//! Snakes and ladders simulation library
//!
//! This crate compiles a rectangular board with snakes and ladders into a
//! successor graph and runs a Monte Carlo simulation over it, estimating:
//! - Average number of rolls needed to win
//! - How often a win comes from an overshoot roll clamped onto the goal
//! - How many runs hit the step limit
//! - The fastest win observed
//! - How often each snake and ladder is used
//!
//! # Example
//!
//! ```ignore
//! use snakesim_core::{BoardGraph, GameBuilder, simulation::simulate};
//!
//! let config = GameBuilder::new()
//!     .grid(10, 10)
//!     .iterations(100_000)
//!     .snake(98, 12)
//!     .ladder(4, 56)
//!     .build()?;
//! let board = BoardGraph::build(&config)?;
//! let results = simulate(&board, &config)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod board;
pub mod error;
pub mod simulation;
pub mod walk;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use board::BoardGraph;
pub use config::{GameBuilder, GameConfig, Transition, TransitionKind};
pub use error::{ConfigError, SimulationError};
pub use model::SimulationResults;
