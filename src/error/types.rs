use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the tile interaction crate.
pub type Result<T> = std::result::Result<T, TileError>;

/// Errors surfaced at the fallible edges of the crate (configuration loading
/// and log sinks). Pointer handling itself never fails.
#[derive(Debug, Error)]
pub enum TileError {
    #[error("invalid region configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("configuration I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_display_includes_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TileError::from(cause);
        assert!(err.to_string().starts_with("invalid region configuration:"));
    }
}
