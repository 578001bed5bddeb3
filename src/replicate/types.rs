use serde::{Deserialize, Serialize};
use std::fmt;

/// Mime type used for the data URI sent upstream.
pub const IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, Serialize)]
pub struct CreatePredictionRequest {
    /// Model identifier, e.g. `black-forest-labs/flux-dev`.
    pub version: String,
    pub input: PredictionInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl PredictionInput {
    /// Wraps raw base64 image data in a data URI.
    pub fn from_base64(image_base64: &str, prompt: Option<String>) -> Self {
        Self {
            image: format!("data:{};base64,{}", IMAGE_MIME, image_base64),
            prompt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    /// Any status this client does not know about; treated as still running.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Prediction output. Most image models return a list of URLs, some a
/// single URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    Many(Vec<String>),
    One(String),
}

impl PredictionOutput {
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Many(urls) => urls,
            Self::One(url) => std::slice::from_ref(url),
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.urls().first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
}

impl Prediction {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn first_output(&self) -> Option<&str> {
        self.output.as_ref().and_then(PredictionOutput::first)
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.error.as_deref())
    }
}
