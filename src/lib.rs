pub mod config;
pub mod context;
mod error;
pub mod store;

pub use config::{load_config, load_settings, Config, ConfigError, RawSettings, Settings, StoreConfig};
pub use context::{build_dependencies, build_from_file, AppContext, AppContextBuilder, ContextState};
pub use error::Error;
pub use store::{connect, ConnectionError, MongoDriver, StoreDriver, CONNECT_TIMEOUT};
