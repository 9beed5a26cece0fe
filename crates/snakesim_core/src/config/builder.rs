//! Game Builder
//!
//! Fluent construction of a validated [`GameConfig`].
//!
//! # Example
//!
//! ```ignore
//! use snakesim_core::config::GameBuilder;
//!
//! let config = GameBuilder::new()
//!     .grid(1, 10)
//!     .dice(6)
//!     .allow_overshoot(false)
//!     .iterations(1_000)
//!     .max_steps(500)
//!     .ladder(2, 9)
//!     .snake(8, 3)
//!     .build()?;
//! ```

use super::{GameConfig, Transition};
use crate::error::ConfigError;

/// Builder for game configurations; `build` runs full validation
#[derive(Debug, Clone, Default)]
pub struct GameBuilder {
    config: GameConfig,
}

impl GameBuilder {
    /// Start from the default configuration (10x10 board, d6, no transitions)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: GameConfig) -> Self {
        Self { config }
    }

    // =========================================================================
    // Board
    // =========================================================================

    /// Set the board dimensions
    #[must_use]
    pub fn grid(mut self, rows: u32, cols: u32) -> Self {
        self.config.rows = rows;
        self.config.cols = cols;
        self
    }

    /// Set the number of sides of the die
    #[must_use]
    pub fn dice(mut self, sides: u32) -> Self {
        self.config.dice_sides = sides;
        self
    }

    #[must_use]
    pub fn allow_overshoot(mut self, allow: bool) -> Self {
        self.config.allow_overshoot = allow;
        self
    }

    /// Add a snake from `start` down to `end`
    #[must_use]
    pub fn snake(mut self, start: u32, end: u32) -> Self {
        self.config.snakes.push(Transition::new(start, end));
        self
    }

    /// Add a ladder from `start` up to `end`
    #[must_use]
    pub fn ladder(mut self, start: u32, end: u32) -> Self {
        self.config.ladders.push(Transition::new(start, end));
        self
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    #[must_use]
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Set the step limit after which a single run is aborted
    #[must_use]
    pub fn max_steps(mut self, steps: u32) -> Self {
        self.config.max_simulation_steps = steps;
        self
    }

    /// Abort a run after `retries` consecutive rejected overshoot rolls
    #[must_use]
    pub fn max_overshoot_retries(mut self, retries: u32) -> Self {
        self.config.max_overshoot_retries = Some(retries);
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionKind;

    #[test]
    fn test_builder_basic() {
        let config = GameBuilder::new()
            .grid(1, 10)
            .dice(4)
            .allow_overshoot(false)
            .iterations(50)
            .max_steps(20)
            .build()
            .unwrap();

        assert_eq!(config.rows, 1);
        assert_eq!(config.cols, 10);
        assert_eq!(config.dice_sides, 4);
        assert!(!config.allow_overshoot);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.max_simulation_steps, 20);
        assert_eq!(config.max_overshoot_retries, None);
    }

    #[test]
    fn test_builder_transitions_keep_declaration_order() {
        let config = GameBuilder::new()
            .grid(5, 5)
            .snake(24, 3)
            .ladder(2, 14)
            .snake(20, 11)
            .build()
            .unwrap();

        assert_eq!(
            config.snakes,
            vec![Transition::new(24, 3), Transition::new(20, 11)]
        );
        assert_eq!(config.ladders, vec![Transition::new(2, 14)]);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let err = GameBuilder::new()
            .grid(1, 10)
            .ladder(4, 2)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongDirection {
                kind: TransitionKind::Ladder,
                start: 4,
                end: 2
            }
        );
    }

    #[test]
    fn test_builder_from_config() {
        let base = GameBuilder::new().grid(2, 5).build().unwrap();
        let config = GameBuilder::from_config(base)
            .max_overshoot_retries(3)
            .build()
            .unwrap();
        assert_eq!(config.num_fields(), 10);
        assert_eq!(config.max_overshoot_retries, Some(3));
    }
}
