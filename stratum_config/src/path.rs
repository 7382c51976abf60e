//! Parsed configuration paths.
//!
//! The external grammar is `<system>.<dot.separated.path>` for isolated
//! systems and `<system>.<group>.<action>[<index>]` for the shared keybinds
//! system. Strings are parsed once at the API boundary into [`ConfigPath`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{StratumError, StratumResult, System};

/// A fully qualified shared-namespace entry, `group.action`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ActionKey {
    /// Group the action belongs to, usually the declaring component.
    pub group: String,
    /// Action name within the group.
    pub action: String,
}

impl ActionKey {
    /// Creates a key from its parts.
    #[must_use]
    pub fn new(group: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            action: action.into(),
        }
    }

    /// Path segments `[group, action]`.
    #[must_use]
    pub fn segments(&self) -> [&str; 2] {
        [self.group.as_str(), self.action.as_str()]
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.action)
    }
}

impl FromStr for ActionKey {
    type Err = Arc<StratumError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('.').collect::<Vec<_>>().as_slice() {
            [group, action] if !group.is_empty() && !action.is_empty() => {
                Ok(Self::new(*group, *action))
            }
            _ => Err(StratumError::invalid_path(s, "expected `group.action`")),
        }
    }
}

/// A validated configuration path.
///
/// # Examples
///
/// ```
/// use stratum_config::{ConfigPath, System};
///
/// let path: ConfigPath = "keybinds.editor.save[1]".parse()?;
/// assert_eq!(path.system(), System::Keybinds);
/// assert_eq!(path.segments(), ["editor", "save"]);
/// assert_eq!(path.index(), Some(1));
/// assert_eq!(path.to_string(), "keybinds.editor.save[1]");
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConfigPath {
    system: System,
    segments: Vec<String>,
    index: Option<usize>,
}

impl ConfigPath {
    /// Parses `text` against the addressing grammar.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::UnknownSystem`] for an unknown leading
    /// segment and [`StratumError::InvalidPath`] for empty segments, a
    /// malformed index, an index on an isolated system, or a keybinds path
    /// that does not name exactly one `group.action`.
    pub fn parse(text: &str) -> StratumResult<Self> {
        let (system_name, rest) = text
            .split_once('.')
            .ok_or_else(|| StratumError::invalid_path(text, "missing key after system"))?;
        let system: System = system_name.parse()?;
        let (body, index) = split_index(text, rest)?;
        let segments: Vec<String> = body.split('.').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(StratumError::invalid_path(text, "empty segment"));
        }
        match system {
            System::Keybinds if segments.len() != 2 => Err(StratumError::invalid_path(
                text,
                "keybinds paths must be `keybinds.<group>.<action>`",
            )),
            System::Keybinds => Ok(Self {
                system,
                segments,
                index,
            }),
            _ if index.is_some() => Err(StratumError::invalid_path(
                text,
                "indices are only valid for keybinds",
            )),
            _ => Ok(Self {
                system,
                segments,
                index,
            }),
        }
    }

    /// Builds an isolated-system path from pre-split segments.
    ///
    /// # Errors
    ///
    /// Fails under the same rules as [`ConfigPath::parse`].
    pub fn isolated<S: AsRef<str>>(system: System, segments: &[S]) -> StratumResult<Self> {
        let joined: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        Self::parse(&format!("{system}.{}", joined.join(".")))
    }

    /// Builds a keybinds path for `key`, optionally addressing one binding.
    #[must_use]
    pub fn action(key: &ActionKey, index: Option<usize>) -> Self {
        Self {
            system: System::Keybinds,
            segments: vec![key.group.clone(), key.action.clone()],
            index,
        }
    }

    /// The system named by the first segment.
    #[must_use]
    pub const fn system(&self) -> System {
        self.system
    }

    /// Segments after the system name.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Trailing binding index, if any.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Segments joined with `.`, without the system or index.
    #[must_use]
    pub fn key_path(&self) -> String {
        self.segments.join(".")
    }

    /// The `group.action` named by a keybinds path.
    #[must_use]
    pub fn action_key(&self) -> Option<ActionKey> {
        match (self.system, self.segments.as_slice()) {
            (System::Keybinds, [group, action]) => Some(ActionKey::new(group, action)),
            _ => None,
        }
    }
}

fn split_index<'a>(text: &str, rest: &'a str) -> StratumResult<(&'a str, Option<usize>)> {
    let Some(body) = rest.strip_suffix(']') else {
        return Ok((rest, None));
    };
    let (body, raw_index) = body
        .rsplit_once('[')
        .ok_or_else(|| StratumError::invalid_path(text, "unbalanced `]`"))?;
    let index = raw_index
        .parse::<usize>()
        .map_err(|_| StratumError::invalid_path(text, "index must be a non-negative integer"))?;
    Ok((body, Some(index)))
}

impl FromStr for ConfigPath {
    type Err = Arc<StratumError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.system, self.key_path())?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}
