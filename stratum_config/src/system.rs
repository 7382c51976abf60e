//! Configuration systems and the merge strategy each one uses.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::StratumError;

/// How a system's per-component contributions are combined.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MergeStrategy {
    /// Each component keeps its own independently merged tree.
    Isolate,
    /// Every component contributes to one shared, conflict-checked tree.
    PriorityMerge,
}

/// A named configuration namespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    /// Free-form component settings, including `plugin_states`.
    Settings,
    /// Log levels and sinks.
    Logging,
    /// Language selection and locale data.
    Localization,
    /// Input bindings shared across every component.
    Keybinds,
    /// Window and widget layout.
    Ui,
}

impl System {
    /// Every system in processing order; `settings` always comes first.
    pub const ALL: [Self; 5] = [
        Self::Settings,
        Self::Logging,
        Self::Localization,
        Self::Ui,
        Self::Keybinds,
    ];

    /// Name used in paths and as a top-level key in user files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Logging => "logging",
            Self::Localization => "localization",
            Self::Keybinds => "keybinds",
            Self::Ui => "ui",
        }
    }

    /// Merge strategy for this system.
    #[must_use]
    pub const fn strategy(self) -> MergeStrategy {
        match self {
            Self::Keybinds => MergeStrategy::PriorityMerge,
            Self::Settings | Self::Logging | Self::Localization | Self::Ui => {
                MergeStrategy::Isolate
            }
        }
    }

    /// `true` for isolated systems.
    #[must_use]
    pub const fn is_isolated(self) -> bool {
        matches!(self.strategy(), MergeStrategy::Isolate)
    }

    /// Isolated systems in processing order.
    pub fn isolated() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|system| system.is_isolated())
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for System {
    type Err = Arc<StratumError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == s)
            .ok_or_else(|| Arc::new(StratumError::UnknownSystem(s.to_owned())))
    }
}
