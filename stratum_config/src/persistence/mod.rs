//! User files on disk and the bookkeeping that decides when to rewrite them.
//!
//! Each component owns one JSON document at `<config_dir>/<component>.json`
//! whose top-level keys are system names. Documents are read through
//! [`UserFileLayout::load`] and fully rewritten by [`UserFileLayout::write`];
//! [`DirtyTracker`] records which components are stale.

mod dirty;
mod file;
mod options;

pub use dirty::{DirtyTracker, SaveFailure, SaveSummary};
pub use file::UserFile;
pub use options::{CONFIG_DIR_ENV, EngineOptions, UserFileLayout};

#[cfg(test)]
mod tests;
