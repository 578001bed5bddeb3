use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Prediction submission failed: {0}")]
    UpstreamSubmission(String),

    #[error("Prediction poll failed: {0}")]
    UpstreamPoll(String),

    #[error("Prediction {prediction_id} ended with status {status}")]
    GenerationFailed {
        prediction_id: String,
        status: String,
    },

    #[error("Prediction did not complete within {}s", timeout.as_secs())]
    PollTimeout { timeout: Duration },

    #[error("Request cancelled before the prediction completed")]
    Cancelled,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn submission(msg: impl Into<String>) -> Self {
        Self::UpstreamSubmission(msg.into())
    }

    pub fn poll(msg: impl Into<String>) -> Self {
        Self::UpstreamPoll(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
