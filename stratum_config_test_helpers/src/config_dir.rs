//! Temporary configuration directories for engine tests.
//!
//! Each [`TempConfigDir`] owns a fresh directory that is removed when the
//! value is dropped. Component files follow the `<component>.json` layout the
//! engine uses by default.
//!
//! # Examples
//!
//! ```no_run
//! use serde_json::json;
//! use stratum_config_test_helpers::TempConfigDir;
//!
//! let dir = TempConfigDir::new().expect("temp dir");
//! dir.write_json("framework", &json!({"logging": {"level": "debug"}}))
//!     .expect("write user file");
//! assert!(dir.exists("framework"));
//! ```

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::TempDir;

/// Temporary directory holding per-component user files.
#[must_use = "dropping removes the temporary directory"]
pub struct TempConfigDir {
    root: Utf8PathBuf,
    _dir: TempDir,
}

impl TempConfigDir {
    /// Creates an empty configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is not
    /// valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create config directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temp dir is not valid UTF-8: {}", path.display()))?;
        Ok(Self { root, _dir: dir })
    }

    /// Root of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the user file for `component`.
    #[must_use]
    pub fn file_for(&self, component: &str) -> Utf8PathBuf {
        self.root.join(format!("{component}.json"))
    }

    /// Returns `true` when `component` has a user file on disk.
    #[must_use]
    pub fn exists(&self, component: &str) -> bool {
        self.file_for(component).is_file()
    }

    /// Writes `value` as the user file for `component`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json(&self, component: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("serialize user file")?;
        self.write_raw(component, &text)
    }

    /// Writes arbitrary text as the user file for `component`.
    ///
    /// Useful for exercising corrupt-file handling.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_raw(&self, component: &str, text: &str) -> Result<()> {
        let path = self.file_for(component);
        std::fs::write(&path, text).with_context(|| format!("write {path}"))
    }

    /// Reads and parses the user file for `component`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid JSON.
    pub fn read_json(&self, component: &str) -> Result<Value> {
        let path = self.file_for(component);
        let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        serde_json::from_str(&text).with_context(|| format!("parse {path}"))
    }
}
