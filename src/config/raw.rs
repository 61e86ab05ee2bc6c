//! The untyped key/value map produced by parsing settings sources.

use std::collections::HashMap;
use std::fmt;

use serde::de::value::MapDeserializer;
use serde::de::DeserializeOwned;

use super::ConfigError;

/// String-keyed settings as read from env files and the process environment.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    entries: HashMap<String, String>,
}

impl RawSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Overlays `other` onto `self`; keys in `other` win.
    pub(crate) fn merge(&mut self, other: RawSettings) {
        self.entries.extend(other.entries);
    }

    /// Deserializes the map into a typed value.
    ///
    /// Every value is presented to serde as a string, so target fields must be
    /// string-typed (or deserialize from a string). Keys the target type does
    /// not name are ignored unless it opts into `deny_unknown_fields`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let deserializer =
            MapDeserializer::<_, serde::de::value::Error>::new(self.iter());
        Ok(T::deserialize(deserializer)?)
    }
}

// Values routinely hold credentials, so only keys are printed.
impl fmt::Debug for RawSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("RawSettings").field("keys", &keys).finish()
    }
}

impl FromIterator<(String, String)> for RawSettings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
