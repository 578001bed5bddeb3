use crate::generation::GenerationRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub base64: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl From<GenerateImageRequest> for GenerationRequest {
    fn from(request: GenerateImageRequest) -> Self {
        Self {
            image_base64: request.base64,
            prompt: request.prompt,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
