use thiserror::Error;

/// Boxed cause reported by a [`StoreDriver`](super::StoreDriver).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    #[error("failed to connect to store: {0}")]
    Connect(#[source] BoxError),

    #[error("failed to ping store: {0}")]
    Ping(#[source] BoxError),

    #[error("failed to disconnect from store: {0}")]
    Disconnect(#[source] BoxError),
}

impl ConnectionError {
    /// Returns `true` if the connect deadline expired.
    pub fn is_timeout(&self) -> bool {
        let cause = match self {
            Self::Connect(cause) | Self::Ping(cause) | Self::Disconnect(cause) => cause,
        };
        cause.is::<tokio::time::error::Elapsed>()
    }
}
