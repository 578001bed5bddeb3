use super::poll::{PollSettings, poll_until};
use crate::{
    Error, Result,
    config::ReplicateConfig,
    replicate::{
        CreatePredictionRequest, Prediction, PredictionClient, PredictionInput, PredictionStatus,
        ReplicateClient,
    },
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const IMAGE_REQUIRED: &str = "Image base64 is required";

/// One incoming generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Base64-encoded image, without a data URI prefix.
    pub image_base64: Option<String>,
    pub prompt: Option<String>,
}

/// Submits predictions and waits for them to finish.
///
/// Holds no per-request state, so one instance is shared by all handlers.
pub struct GenerationService {
    client: Arc<dyn PredictionClient>,
    model: String,
    poll: PollSettings,
}

impl GenerationService {
    pub fn new(client: Arc<dyn PredictionClient>, config: &ReplicateConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            poll: PollSettings {
                interval: config.poll_interval(),
                timeout: config.poll_timeout(),
            },
        }
    }

    pub fn from_config(config: &ReplicateConfig) -> Result<Self> {
        let client = ReplicateClient::new(config)?;
        info!(
            "Generation service ready (model: {}, poll every {:?}, give up after {:?})",
            config.model,
            config.poll_interval(),
            config.poll_timeout()
        );
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    /// Creates a prediction for `image_base64` and returns it as first
    /// reported by the API, usually still `starting`.
    pub async fn submit(&self, image_base64: &str, prompt: Option<String>) -> Result<Prediction> {
        if image_base64.trim().is_empty() {
            return Err(Error::validation(IMAGE_REQUIRED));
        }

        let request = CreatePredictionRequest {
            version: self.model.clone(),
            input: PredictionInput::from_base64(image_base64.trim(), prompt),
        };

        self.client.create_prediction(&request).await
    }

    /// Polls until the prediction reaches a terminal status.
    ///
    /// A `failed` or `canceled` prediction is returned as `Ok`; only
    /// transport errors, the deadline, and cancellation are errors here.
    pub async fn await_completion(
        &self,
        prediction: Prediction,
        cancel: &CancellationToken,
    ) -> Result<Prediction> {
        let id = prediction.id.clone();
        let id = id.as_str();
        let client = self.client.as_ref();

        poll_until(
            prediction,
            self.poll,
            cancel,
            || {
                debug!("Polling prediction {}", id);
                client.get_prediction(id)
            },
            Prediction::is_terminal,
        )
        .await
    }

    /// Full request flow: validate, submit, wait, and pick the first output.
    pub async fn handle_request(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let image = request
            .image_base64
            .as_deref()
            .filter(|image| !image.trim().is_empty())
            .ok_or_else(|| Error::validation(IMAGE_REQUIRED))?;

        let prediction = self.submit(image, request.prompt).await?;
        info!(
            "Submitted prediction {} (status: {})",
            prediction.id, prediction.status
        );

        let prediction = self.await_completion(prediction, cancel).await?;

        match prediction.status {
            PredictionStatus::Succeeded => {
                let image = prediction.first_output().ok_or_else(|| {
                    Error::internal(format!(
                        "Prediction {} succeeded without output",
                        prediction.id
                    ))
                })?;
                info!("Prediction {} succeeded", prediction.id);
                Ok(image.to_string())
            }
            status @ (PredictionStatus::Failed | PredictionStatus::Canceled) => {
                warn!("Prediction {} ended with status {}", prediction.id, status);
                Err(Error::GenerationFailed {
                    prediction_id: prediction.id,
                    status: status.to_string(),
                })
            }
            status => Err(Error::internal(format!(
                "Prediction {} stopped polling in non-terminal status {}",
                prediction.id, status
            ))),
        }
    }
}
