//! Integration tests for the simulation engine
//!
//! Tests are organized by topic:
//! - `board_properties` - Graph shape over many generated configurations
//! - `scenarios` - End-to-end simulations on small known boards
//! - `reproducibility` - Seeded runs and the shortest-sequence replay

mod board_properties;
mod scenarios;
