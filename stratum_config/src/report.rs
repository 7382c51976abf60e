//! Diagnostic accumulator shared by merge and reconcile operations.
//!
//! Recovered faults (type mismatches, corrupt files, binding conflicts) never
//! abort processing; they are recorded here instead so a host can surface
//! them once initialization completes.

use std::fmt;

/// How serious a recorded issue is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Severity {
    /// Informational note, e.g. a reconciled plugin entry.
    Info,
    /// A recovered fault; defaults were used in place of bad input.
    Warning,
    /// A fault that left part of the configuration unavailable.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A single report entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    /// Severity of the entry.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Configuration key the issue refers to, when there is one.
    pub key_path: Option<String>,
}

/// Accumulates info, warning and error issues.
///
/// # Examples
///
/// ```
/// use stratum_config::{InitializationReport, Severity};
///
/// let mut report = InitializationReport::default();
/// report.warning_at("ui.scale", "type mismatch");
/// assert_eq!(report.count(Severity::Warning), 1);
/// assert!(!report.is_clean());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InitializationReport {
    issues: Vec<Issue>,
}

impl InitializationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    fn push(&mut self, severity: Severity, message: String, key_path: Option<String>) {
        self.issues.push(Issue {
            severity,
            message,
            key_path,
        });
    }

    /// Records an informational note.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message.into(), None);
    }

    /// Records a warning without a key path.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into(), None);
    }

    /// Records a warning attached to `key_path`.
    pub fn warning_at(&mut self, key_path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, message.into(), Some(key_path.into()));
    }

    /// Records an error without a key path.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into(), None);
    }

    /// Records an error attached to `key_path`.
    pub fn error_at(&mut self, key_path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, message.into(), Some(key_path.into()));
    }

    /// Every recorded issue in insertion order.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues of a single severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity == severity)
    }

    /// Warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warning)
    }

    /// Number of issues of `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    /// `true` when no warnings or errors were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues
            .iter()
            .all(|issue| issue.severity == Severity::Info)
    }

    /// `true` when any recorded issue mentions `key_path`.
    #[must_use]
    pub fn mentions_path(&self, key_path: &str) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.key_path.as_deref() == Some(key_path))
    }

    /// Moves every issue from `other` into `self`.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
    }

    /// Number of recorded issues.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.issues.len()
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for InitializationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] ", issue.severity)?;
            if let Some(path) = &issue.key_path {
                write!(f, "{path}: ")?;
            }
            f.write_str(&issue.message)?;
        }
        Ok(())
    }
}
