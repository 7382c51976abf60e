//! Fixtures for exercising `stratum_config` against real files.
//!
//! [`TempConfigDir`] gives each test its own user configuration directory
//! and reads back what the engine persisted.

pub mod config_dir;

pub use config_dir::TempConfigDir;
