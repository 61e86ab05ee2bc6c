//! The dependency container assembled at startup.

use std::path::Path;

use crate::config::{Settings, StoreConfig};
use crate::store::{self, ConnectionError, MongoDriver, StoreDriver};
use crate::Error;

/// Lifecycle of an [`AppContext`]. There is no way back from `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Built,
    Released,
}

/// Central application context holding the settings and the live store
/// connection.
///
/// A context only exists once the store has been connected and pinged.
/// Call [`release`](Self::release) during shutdown, after every consumer of
/// [`store()`](Self::store) has stopped.
///
/// ## Example
///
/// ```no_run
/// use mongo_fnd::{build_dependencies, load_settings};
///
/// # async fn run() -> Result<(), mongo_fnd::Error> {
/// let settings = load_settings(".env")?;
/// let mut ctx = build_dependencies(settings).await?;
///
/// if let Some(client) = ctx.store() {
///     let _db = client.database(ctx.config().database());
/// }
///
/// ctx.release().await?;
/// # Ok(())
/// # }
/// ```
pub struct AppContext<D: StoreDriver = MongoDriver> {
    settings: Settings,
    driver: D,
    store: Option<D::Handle>,
}

impl<D: StoreDriver> AppContext<D> {
    /// Returns the full settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the store configuration the connection was opened with.
    pub fn config(&self) -> &StoreConfig {
        self.settings.store()
    }

    /// Returns the live store handle, or `None` once released.
    pub fn store(&self) -> Option<&D::Handle> {
        self.store.as_ref()
    }

    pub fn state(&self) -> ContextState {
        if self.store.is_some() {
            ContextState::Built
        } else {
            ContextState::Released
        }
    }

    /// Closes the store connection.
    ///
    /// The first call disconnects; later calls do nothing and return
    /// `Ok(())`. A disconnect error is returned, but the handle is gone either
    /// way and the context stays `Released`.
    pub async fn release(&mut self) -> Result<(), Error> {
        let Some(handle) = self.store.take() else {
            tracing::debug!("store already released");
            return Ok(());
        };

        self.driver
            .disconnect(handle)
            .await
            .map_err(|e| ConnectionError::Disconnect(e.into()))?;
        tracing::info!(host = self.config().host(), "released store connection");
        Ok(())
    }
}

impl<D: StoreDriver> Drop for AppContext<D> {
    fn drop(&mut self) {
        if self.store.take().is_some() {
            tracing::warn!(
                host = self.settings.store().host(),
                "app context dropped without release; store handle closed by drop"
            );
        }
    }
}

impl<D: StoreDriver> std::fmt::Debug for AppContext<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { settings: None }
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    settings: Option<Settings>,
}

impl AppContextBuilder {
    /// Attaches the settings the context is built from.
    pub fn with_config(self, settings: Settings) -> Self {
        Self {
            settings: Some(settings),
        }
    }

    /// Connects through `driver` and builds the context.
    ///
    /// Fails with [`Error::MissingConfig`] if no settings were attached. A
    /// connection failure is returned unchanged and nothing is built.
    pub async fn build<D: StoreDriver>(self, driver: D) -> Result<AppContext<D>, Error> {
        let settings = self.settings.ok_or(Error::MissingConfig)?;
        let store = store::connect(&driver, settings.store()).await?;

        Ok(AppContext {
            settings,
            driver,
            store: Some(store),
        })
    }
}

/// Builds the application's dependencies against MongoDB.
pub async fn build_dependencies(settings: Settings) -> Result<AppContext, Error> {
    AppContext::builder()
        .with_config(settings)
        .build(MongoDriver)
        .await
}

/// Loads settings from the env file at `path`, then builds the dependencies.
pub async fn build_from_file(path: impl AsRef<Path>) -> Result<AppContext, Error> {
    build_dependencies(Settings::load(path)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigError};
    use crate::store::testing::{FakeDriver, Step};

    fn settings() -> Settings {
        Config::builder().build_settings().unwrap()
    }

    #[tokio::test]
    async fn test_build_and_release() {
        let driver = FakeDriver::healthy();
        let calls = driver.calls.clone();

        let mut ctx = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await
            .unwrap();
        assert_eq!(ctx.state(), ContextState::Built);
        assert!(ctx.store().is_some());
        assert_eq!(ctx.store().unwrap().uri, ctx.config().uri());

        assert_eq!(calls.handles_dropped(), 0);

        ctx.release().await.unwrap();
        assert_eq!(ctx.state(), ContextState::Released);
        assert!(ctx.store().is_none());
        assert_eq!(calls.disconnects(), 1);
        assert_eq!(calls.handles_dropped(), 1);
    }

    #[tokio::test]
    async fn test_second_release_is_noop() {
        let driver = FakeDriver::healthy();
        let calls = driver.calls.clone();

        let mut ctx = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await
            .unwrap();
        ctx.release().await.unwrap();
        ctx.release().await.unwrap();

        assert_eq!(ctx.state(), ContextState::Released);
        assert_eq!(calls.disconnects(), 1);
    }

    #[tokio::test]
    async fn test_missing_config() {
        let result = AppContext::builder().build(FakeDriver::healthy()).await;
        assert!(matches!(result, Err(Error::MissingConfig)));
    }

    #[tokio::test]
    async fn test_connect_failure_propagates_unchanged() {
        let driver = FakeDriver::healthy().with_connect(Step::Fail);
        let calls = driver.calls.clone();

        let result = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await;
        match result {
            Err(Error::Connection(ConnectionError::Connect(cause))) => {
                assert_eq!(cause.to_string(), "fake driver: connect refused");
            }
            other => panic!("expected connect error, got {other:?}"),
        }
        assert_eq!(calls.disconnects(), 0);
    }

    #[tokio::test]
    async fn test_ping_failure_builds_nothing_and_leaks_nothing() {
        let driver = FakeDriver::healthy().with_ping(Step::Fail);
        let calls = driver.calls.clone();

        let result = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await;
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::Ping(_)))
        ));
        assert_eq!(calls.connects(), 1);
        assert_eq!(calls.disconnects(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_error_is_surfaced_once() {
        let driver = FakeDriver::healthy().with_disconnect(Step::Fail);

        let mut ctx = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await
            .unwrap();

        let first = ctx.release().await;
        assert!(matches!(
            first,
            Err(Error::Connection(ConnectionError::Disconnect(_)))
        ));
        assert_eq!(ctx.state(), ContextState::Released);
        assert!(ctx.release().await.is_ok());
    }

    #[tokio::test]
    async fn test_drop_without_release_closes_handle() {
        let driver = FakeDriver::healthy();
        let calls = driver.calls.clone();

        let ctx = AppContext::builder()
            .with_config(settings())
            .build(driver)
            .await
            .unwrap();
        drop(ctx);

        // The handle is dropped, not disconnected through the driver.
        assert_eq!(calls.disconnects(), 0);
        assert_eq!(calls.handles_dropped(), 1);
        assert_eq!(std::sync::Arc::strong_count(&calls), 1);
    }

    #[tokio::test]
    async fn test_build_from_missing_file() {
        let result = build_from_file("/nonexistent/settings.env").await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::FileOpen { .. }))
        ));
    }
}
