use super::types::*;
use crate::{Error, Result, config::ReplicateConfig};
use async_trait::async_trait;
use reqwest::{Response, header::AUTHORIZATION};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for a single HTTP round trip to the API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn create_prediction(&self, request: &CreatePredictionRequest) -> Result<Prediction>;

    async fn get_prediction(&self, id: &str) -> Result<Prediction>;
}

pub struct ReplicateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ReplicateClient {
    pub fn new(config: &ReplicateConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.base_url)
    }

    fn prediction_url(&self, id: &str) -> String {
        format!("{}/predictions/{}", self.base_url, id)
    }
}

#[async_trait]
impl PredictionClient for ReplicateClient {
    async fn create_prediction(&self, request: &CreatePredictionRequest) -> Result<Prediction> {
        debug!("Submitting prediction for model {}", request.version);

        let response = self
            .client
            .post(self.predictions_url())
            .header(AUTHORIZATION, self.auth_header())
            .json(request)
            .send()
            .await
            .map_err(|e| Error::submission(format!("Failed to reach Replicate: {}", e)))?;

        let response = ensure_success(response).await.map_err(Error::submission)?;
        let prediction = parse_prediction(response).await?;

        debug!(
            "Prediction {} created with status {}",
            prediction.id, prediction.status
        );
        Ok(prediction)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        let response = self
            .client
            .get(self.prediction_url(id))
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| Error::poll(format!("Failed to reach Replicate: {}", e)))?;

        let response = ensure_success(response).await.map_err(Error::poll)?;
        parse_prediction(response).await
    }
}

/// Turns a non-2xx response into a message carrying the status and the
/// upstream error text when there is one.
async fn ensure_success(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let upstream = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message().map(str::to_string));

    warn!("Replicate responded with {}: {}", status, body);

    Err(match upstream {
        Some(message) => format!(
            "Request failed with status code {}: {}",
            status.as_u16(),
            message
        ),
        None => format!("Request failed with status code {}", status.as_u16()),
    })
}

async fn parse_prediction(response: Response) -> Result<Prediction> {
    response
        .json::<Prediction>()
        .await
        .map_err(|e| Error::internal(format!("Malformed prediction response: {}", e)))
}
