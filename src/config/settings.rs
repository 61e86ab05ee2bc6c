//! Typed projections of the raw settings map.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::raw::RawSettings;
use super::{Config, ConfigError};

/// Connection parameters for the MongoDB store.
///
/// Built from the `MONGO_*` keys; a missing key yields an empty string. The
/// connection URI is derived once at construction and not validated here.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "StoreFields")]
pub struct StoreConfig {
    host: String,
    port: String,
    user: String,
    password: String,
    database: String,
    uri: String,
}

#[derive(Deserialize)]
struct StoreFields {
    #[serde(rename = "MONGO_HOST", default)]
    host: String,
    #[serde(rename = "MONGO_PORT", default)]
    port: String,
    #[serde(rename = "MONGO_USER", default)]
    user: String,
    #[serde(rename = "MONGO_PASSWORD", default)]
    password: String,
    #[serde(rename = "MONGO_DATABASE", default)]
    database: String,
}

impl From<StoreFields> for StoreConfig {
    fn from(f: StoreFields) -> Self {
        Self::new(f.host, f.port, f.user, f.password, f.database)
    }
}

impl StoreConfig {
    /// Creates a config and synthesizes
    /// `mongodb://{user}:{password}@{host}:{port}/{database}`.
    ///
    /// Substitution is literal: nothing is percent-encoded.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        let (host, port, user, password, database) = (
            host.into(),
            port.into(),
            user.into(),
            password.into(),
            database.into(),
        );
        let uri = format!("mongodb://{user}:{password}@{host}:{port}/{database}");
        Self {
            host,
            port,
            user,
            password,
            database,
            uri,
        }
    }

    /// Replaces the synthesized URI, e.g. to append driver options.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The URI with the password replaced by `***`.
    ///
    /// A literal `:{password}@` is masked first, since an unencoded password
    /// may contain `/` or `@`. Otherwise the userinfo of the authority is
    /// masked after its first `:`, which covers overridden and
    /// percent-encoded credentials.
    pub fn redacted_uri(&self) -> String {
        let literal = format!(":{}@", self.password);
        if !self.password.is_empty() && self.uri.contains(&literal) {
            return self.uri.replacen(&literal, ":***@", 1);
        }
        mask_userinfo(&self.uri)
    }
}

fn mask_userinfo(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &uri[authority_start..];
    let authority = &rest[..rest.find(['/', '?']).unwrap_or(rest.len())];

    let Some(userinfo_end) = authority.rfind('@') else {
        return uri.to_string();
    };
    let Some(colon) = authority[..userinfo_end].find(':') else {
        return uri.to_string();
    };

    let password_start = authority_start + colon + 1;
    let password_end = authority_start + userinfo_end;
    format!("{}***{}", &uri[..password_start], &uri[password_end..])
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("uri", &self.redacted_uri())
            .finish()
    }
}

/// The complete application settings.
///
/// Holds the typed store section plus every raw key that was loaded, so other
/// services can read keys the typed projection does not cover.
#[derive(Debug, Clone)]
pub struct Settings {
    store: StoreConfig,
    raw: RawSettings,
}

impl Settings {
    /// Projects a raw map into settings.
    pub fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let store = raw.deserialize()?;
        Ok(Self { store, raw })
    }

    /// Loads settings from a single required env file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder().with_file(path, true).build_settings()
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub fn raw(&self) -> &RawSettings {
        &self.raw
    }

    pub fn into_store(self) -> StoreConfig {
        self.store
    }
}

/// Loads the store configuration from the env file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<StoreConfig, ConfigError> {
    Settings::load(path).map(Settings::into_store)
}

/// Loads the full settings from the env file at `path`.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    Settings::load(path)
}
