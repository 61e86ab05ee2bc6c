use crate::config::ConfigError;
use crate::store::ConnectionError;
use thiserror::Error;

/// Top-level error type for the mongo-fnd library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("application context requires a configuration")]
    MissingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_malformed_line_context_in_message() {
        let e: Error = ConfigError::MalformedLine {
            path: PathBuf::from("app.env"),
            line_number: 3,
            line: "MONGO_PORT".into(),
        }
        .into();

        let message = e.to_string();
        assert!(message.contains("app.env"));
        assert!(message.contains("line 3"));
        assert!(message.contains("MONGO_PORT"));
    }

    #[test]
    fn test_connection_cause_is_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e: Error = ConnectionError::Connect(cause.into()).into();

        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("refused"));
    }
}
