use thiserror::Error;

/// Errors surfaced by the prediction client and its controllers
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictorError {
    /// Could not reach the backend (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status or an unexpected body
    #[error("Server error: {0}")]
    Server(String),

    /// Locally detected invalid input, never sent over the wire
    #[error("Validation error: {0}")]
    Validation(String),

    /// A statistic value that does not parse as a finite number
    #[error("Malformed statistic: {0}")]
    MalformedStatistic(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PredictorError>;

impl PredictorError {
    /// Short message suitable for showing next to the control that failed
    pub fn user_message(&self) -> String {
        match self {
            PredictorError::Network(_) => "Could not reach the prediction service".to_string(),
            PredictorError::Server(_) => "The prediction service returned an error".to_string(),
            PredictorError::Validation(msg) => msg.clone(),
            PredictorError::MalformedStatistic(_) => "Statistic unavailable".to_string(),
            PredictorError::Config(msg) => msg.clone(),
        }
    }

    /// Underlying failure detail, if the error carries a non-empty one
    pub fn detail(&self) -> Option<&str> {
        let detail = match self {
            PredictorError::Network(d)
            | PredictorError::Server(d)
            | PredictorError::Validation(d)
            | PredictorError::MalformedStatistic(d)
            | PredictorError::Config(d) => d.trim(),
        };

        if detail.is_empty() {
            None
        } else {
            Some(detail)
        }
    }
}

impl From<reqwest::Error> for PredictorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() || err.is_decode() {
            PredictorError::Server(err.to_string())
        } else {
            PredictorError::Network(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for PredictorError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        PredictorError::Network("request timed out".to_string())
    }
}
