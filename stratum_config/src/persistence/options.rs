//! Engine options and the on-disk layout they resolve to.

use camino::{Utf8Path, Utf8PathBuf};

/// Environment variable overriding the user configuration directory.
pub const CONFIG_DIR_ENV: &str = "STRATUM_CONFIG_DIR";

const DEFAULT_APP_NAME: &str = "stratum";
const DEFAULT_EXTENSION: &str = "json";
const FALLBACK_DIR: &str = "config";

/// Options controlling where and how the engine persists user files.
///
/// # Examples
///
/// ```
/// use stratum_config::EngineOptions;
///
/// let options = EngineOptions::new()
///     .with_config_dir("/tmp/demo")
///     .with_pretty(false);
/// let layout = options.layout();
/// assert_eq!(layout.path_for("framework").as_str(), "/tmp/demo/framework.json");
/// assert!(!layout.pretty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    config_dir: Option<Utf8PathBuf>,
    app_name: String,
    file_extension: String,
    pretty: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            config_dir: None,
            app_name: DEFAULT_APP_NAME.to_owned(),
            file_extension: DEFAULT_EXTENSION.to_owned(),
            pretty: true,
        }
    }
}

impl EngineOptions {
    /// Options with every default applied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `dir` for user files, bypassing environment lookup.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Application name used below platform configuration roots.
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Extension of user files, without the leading dot.
    #[must_use]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Toggles pretty-printed output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Configured application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Directory holding user files.
    ///
    /// Resolution order: the explicit directory, `STRATUM_CONFIG_DIR`,
    /// `$XDG_CONFIG_HOME/<app>`, the platform configuration directory joined
    /// with the application name, and finally `./config`.
    #[must_use]
    pub fn resolve_config_dir(&self) -> Utf8PathBuf {
        self.resolve_config_dir_with(|key| std::env::var(key).ok())
    }

    /// [`EngineOptions::resolve_config_dir`] with an explicit environment.
    #[must_use]
    pub fn resolve_config_dir_with<F>(&self, lookup: F) -> Utf8PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(dir) = &self.config_dir {
            return dir.clone();
        }
        if let Some(dir) = non_empty(CONFIG_DIR_ENV) {
            return Utf8PathBuf::from(dir);
        }
        if let Some(base) = non_empty("XDG_CONFIG_HOME") {
            return Utf8PathBuf::from(base).join(&self.app_name);
        }
        dirs::config_dir()
            .and_then(|base| Utf8PathBuf::from_path_buf(base).ok())
            .map_or_else(
                || Utf8PathBuf::from(FALLBACK_DIR),
                |base| base.join(&self.app_name),
            )
    }

    /// Layout rooted at the resolved configuration directory.
    #[must_use]
    pub fn layout(&self) -> UserFileLayout {
        UserFileLayout {
            dir: self.resolve_config_dir(),
            extension: self.file_extension.clone(),
            pretty: self.pretty,
        }
    }
}

/// Maps component names to user file paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserFileLayout {
    pub(super) dir: Utf8PathBuf,
    pub(super) extension: String,
    pub(super) pretty: bool,
}

impl UserFileLayout {
    /// Pretty-printed `.json` files under `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
            pretty: true,
        }
    }

    /// Directory holding every user file.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// `true` when documents are pretty-printed.
    #[must_use]
    pub const fn pretty(&self) -> bool {
        self.pretty
    }

    /// File name of `component`'s document.
    #[must_use]
    pub fn file_name(&self, component: &str) -> String {
        format!("{component}.{}", self.extension)
    }

    /// Full path of `component`'s document.
    #[must_use]
    pub fn path_for(&self, component: &str) -> Utf8PathBuf {
        self.dir.join(self.file_name(component))
    }
}
