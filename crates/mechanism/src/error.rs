use thiserror::Error;

/// Rejected mechanism configurations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown motor: {0}")]
    UnknownMotor(String),

    #[error("Invalid {field}: {value} (must be > 0)")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Invalid {field}: {value} ({reason})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
