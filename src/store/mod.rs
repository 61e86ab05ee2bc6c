//! Connection establishment against the external store.
//!
//! The client library sits behind [`StoreDriver`]. [`connect`] runs the
//! connect-then-ping sequence under a single deadline and only hands back a
//! handle that answered its ping.

mod error;
mod mongo;

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::config::StoreConfig;

pub use error::{BoxError, ConnectionError};
pub use mongo::MongoDriver;

/// Deadline for the whole connect + ping sequence.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The operations consumed from a store client library.
pub trait StoreDriver: Send + Sync {
    /// A live session to the store.
    type Handle: Send + Sync;
    /// The library's error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a session for `uri`.
    fn connect(&self, uri: &str) -> impl Future<Output = Result<Self::Handle, Self::Error>> + Send;

    /// Checks that the session can reach the server.
    fn ping(&self, handle: &Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Closes the session.
    fn disconnect(&self, handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Connects to the store described by `config` within [`CONNECT_TIMEOUT`].
pub async fn connect<D: StoreDriver>(
    driver: &D,
    config: &StoreConfig,
) -> Result<D::Handle, ConnectionError> {
    connect_with_timeout(driver, config, CONNECT_TIMEOUT).await
}

/// Connects and pings, both bounded by one deadline `timeout` from now.
///
/// No retries are attempted. If the ping fails the new handle is
/// disconnected, still within the deadline, before the ping error is returned.
pub async fn connect_with_timeout<D: StoreDriver>(
    driver: &D,
    config: &StoreConfig,
    timeout: Duration,
) -> Result<D::Handle, ConnectionError> {
    let deadline = Instant::now() + timeout;

    tracing::debug!(
        host = config.host(),
        port = config.port(),
        database = config.database(),
        timeout_ms = timeout.as_millis() as u64,
        "connecting to store"
    );

    let handle = match timeout_at(deadline, driver.connect(config.uri())).await {
        Ok(Ok(handle)) => handle,
        Ok(Err(e)) => return Err(ConnectionError::Connect(e.into())),
        Err(elapsed) => return Err(ConnectionError::Connect(elapsed.into())),
    };

    let cause: BoxError = match timeout_at(deadline, driver.ping(&handle)).await {
        Ok(Ok(())) => {
            tracing::info!(
                host = config.host(),
                port = config.port(),
                database = config.database(),
                "connected to store"
            );
            return Ok(handle);
        }
        Ok(Err(e)) => e.into(),
        Err(elapsed) => elapsed.into(),
    };

    // The ping error is what the caller needs; a cleanup failure is only logged.
    // Cleanup stays inside the deadline; on expiry the handle is simply dropped.
    match timeout_at(deadline, driver.disconnect(handle)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to disconnect after unsuccessful ping");
        }
        Err(elapsed) => {
            tracing::warn!(error = %elapsed, "disconnect after unsuccessful ping timed out");
        }
    }
    Err(ConnectionError::Ping(cause))
}
