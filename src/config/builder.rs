use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::env::load_env_vars;
use super::file::load_env_file;
use super::raw::RawSettings;
use super::settings::Settings;
use super::ConfigError;

/// A settings source in the loading pipeline.
#[derive(Debug)]
enum ConfigSource {
    File { path: PathBuf, required: bool },
    Env { prefix: String },
}

/// Builder for loading settings from env files and the process environment.
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones key by key.
///
/// ## Example
///
/// ```no_run
/// use mongo_fnd::Config;
///
/// let settings = Config::builder()
///     .with_file("config/default.env", true)
///     .with_file("config/local.env", false)
///     .build_settings()?;
///
/// println!("connecting to {}", settings.store().host());
/// # Ok::<(), mongo_fnd::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<ConfigSource>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an env file to be loaded.
    ///
    /// If `required` is `true`, the build fails if the file can't be opened.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Overlays process environment variables that start with `prefix`.
    ///
    /// The prefix is stripped before merging, so with `with_env("APP_")`
    /// the variable `APP_MONGO_HOST` sets `MONGO_HOST`:
    ///
    /// ```no_run
    /// # use mongo_fnd::Config;
    /// // file defaults -> env overrides
    /// let settings = Config::builder()
    ///     .with_file(".env", true)
    ///     .with_env("APP_")
    ///     .build_settings()?;
    /// # Ok::<(), mongo_fnd::ConfigError>(())
    /// ```
    pub fn with_env(mut self, prefix: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Env {
            prefix: prefix.into(),
        });
        self
    }

    /// Loads and merges every source into one raw map.
    pub fn build_raw(self) -> Result<RawSettings, ConfigError> {
        let mut merged = RawSettings::new();

        for source in self.sources {
            match source {
                ConfigSource::File { path, required } => {
                    if let Some(settings) = load_env_file(&path, required)? {
                        merged.merge(settings);
                    }
                }
                ConfigSource::Env { prefix } => {
                    merged.merge(load_env_vars(&prefix));
                }
            }
        }

        Ok(merged)
    }

    /// Builds the application [`Settings`], keeping the raw map alongside
    /// the typed store section.
    pub fn build_settings(self) -> Result<Settings, ConfigError> {
        Settings::from_raw(self.build_raw()?)
    }

    /// Builds the merged map and deserializes it into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        self.build_raw()?.deserialize()
    }
}
