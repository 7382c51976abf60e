//! Reading and writing per-component user documents.

use std::io::{ErrorKind, Write};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use serde_json::{Map, Value};
use tracing::debug;

use super::UserFileLayout;
use crate::{StratumError, StratumResult, StratumResultExt, System};

/// Outcome of reading one component's user document.
#[derive(Clone, Debug)]
pub enum UserFile {
    /// No document exists yet.
    Missing,
    /// The document exists but could not be read or is not a JSON object.
    Corrupt(Arc<StratumError>),
    /// The parsed top-level object.
    Loaded(Map<String, Value>),
}

impl UserFile {
    /// Section stored under `system`, if present.
    #[must_use]
    pub fn section(&self, system: System) -> Option<&Value> {
        match self {
            Self::Loaded(document) => document.get(system.as_str()),
            Self::Missing | Self::Corrupt(_) => None,
        }
    }

    /// `true` for [`UserFile::Missing`].
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// `true` for [`UserFile::Corrupt`].
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    /// The loaded document, or an empty one.
    #[must_use]
    pub fn into_document(self) -> Map<String, Value> {
        match self {
            Self::Loaded(document) => document,
            Self::Missing | Self::Corrupt(_) => Map::new(),
        }
    }
}

impl UserFileLayout {
    /// Reads `component`'s document.
    #[must_use]
    pub fn load(&self, component: &str) -> UserFile {
        let path = self.path_for(component);
        let dir = match Dir::open_ambient_dir(&self.dir, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return UserFile::Missing,
            Err(err) => return UserFile::Corrupt(StratumError::file(&self.dir, err)),
        };
        let text = match dir.read_to_string(self.file_name(component)) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(component, path = %path, "no user file");
                return UserFile::Missing;
            }
            Err(err) => return UserFile::Corrupt(StratumError::file(&path, err)),
        };
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(document) => UserFile::Loaded(document),
            Err(err) => UserFile::Corrupt(StratumError::parse(&path, err)),
        }
    }

    /// Replaces `component`'s document with `document`, creating the
    /// configuration directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::Serialize`] when the document cannot be
    /// encoded and [`StratumError::File`] when the directory or file cannot
    /// be written.
    pub fn write(&self, component: &str, document: &Value) -> StratumResult<Utf8PathBuf> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        let content = encoded.into_stratum()?;
        let dir = ensure_dir(&self.dir)?;
        let path = self.path_for(component);
        let mut file = dir
            .open_with(
                self.file_name(component),
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .map_err(|err| StratumError::file(&path, err))?;
        file.write_all(content.as_bytes())
            .map_err(|err| StratumError::file(&path, err))?;
        Ok(path)
    }
}

fn ensure_dir(path: &Utf8Path) -> StratumResult<Dir> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|err| StratumError::file(path, err))?;
            Dir::open_ambient_dir(path, ambient_authority())
                .map_err(|err| StratumError::file(path, err))
        }
        Err(open_err) => Err(StratumError::file(path, open_err)),
    }
}
