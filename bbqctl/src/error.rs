//! Error type for everything outside the control core.

/// Errors raised by configuration, I/O and the collaborators around the
/// controller. The controller itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("probe read failed: {0}")]
    Sensor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
