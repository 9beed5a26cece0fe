//! Command line front end for the snakes and ladders simulator

pub mod config_file;
pub mod logging;
pub mod report;
pub mod util;

pub use config_file::load_config;
pub use logging::init_logging;
