//! Settings loading: env files to raw map to typed configuration.

mod builder;
mod env;
mod error;
mod file;
mod raw;
mod settings;

pub use builder::Config;
pub use error::ConfigError;
pub use raw::RawSettings;
pub use settings::{load_config, load_settings, Settings, StoreConfig};
