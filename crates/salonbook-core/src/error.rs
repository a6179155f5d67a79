//! Error types for Salonbook

use thiserror::Error;

/// Result type alias using Salonbook's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Salonbook error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Cart errors (E001-E099)
    #[error("Service '{0}' is not in the cart.")]
    ServiceNotInCart(String),

    #[error("Pick a time for service '{0}' before choosing a staff member.")]
    TimeRequired(String),

    #[error("Booking is not ready to submit: {0}")]
    NotReady(String),

    // Network errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Submission errors (E200-E299)
    #[error("Booking submission failed: {0}")]
    SubmissionFailed(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ServiceNotInCart(_) => "E001",
            Self::TimeRequired(_) => "E002",
            Self::NotReady(_) => "E003",
            Self::Network(_) => "E100",
            Self::Api { .. } => "E101",
            Self::SubmissionFailed(_) => "E200",
            Self::Database(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Serialization(_) => "E900",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Whether the operation that produced this error can be retried
    /// without changing any local state first
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::SubmissionFailed(_)
        )
    }
}
