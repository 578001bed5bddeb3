use super::types::{ErrorResponse, GenerateImageRequest, GenerateImageResponse, HealthResponse};
use crate::{Error, generation::GenerationService};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<GenerationService>,
    /// Cancelled on shutdown; each request polls under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(generator: Arc<GenerationService>) -> Self {
        Self {
            generator,
            shutdown: CancellationToken::new(),
        }
    }
}

pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        // A body that is not declared as JSON carries no image.
        Err(JsonRejection::MissingJsonContentType(_)) => GenerateImageRequest::default(),
        Err(rejection) => {
            warn!(
                "Rejected generation request {}: {}",
                request_id,
                rejection.body_text()
            );
            return Err(rejection_response(&rejection));
        }
    };
    info!(
        "Received generation request {} (prompt: {:?})",
        request_id, request.prompt
    );

    // Dropping the handler future (client went away) cancels the poll loop.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    match state
        .generator
        .handle_request(request.into(), &cancel)
        .await
    {
        Ok(image) => {
            info!("Generation request {} completed: {}", request_id, image);
            Ok(Json(GenerateImageResponse { image }))
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected generation request {}: {}", request_id, e);
            } else {
                error!("Generation request {} failed: {:?}", request_id, e);
            }
            Err(error_response(&e))
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Keeps the extractor's status code but answers with the JSON error shape.
pub fn rejection_response(rejection: &JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    (
        rejection.status(),
        Json(ErrorResponse {
            error: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
        }),
    )
}

/// Maps a crate error to the status code and JSON body sent to the caller.
pub fn error_response(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let (status, error, details) = match err {
        Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        Error::GenerationFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Image generation failed".to_string(),
            None,
        ),
        Error::PollTimeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "Image generation timed out".to_string(),
            Some(err.to_string()),
        ),
        Error::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Request cancelled".to_string(),
            Some(err.to_string()),
        ),
        Error::UpstreamSubmission(msg) | Error::UpstreamPoll(msg) | Error::Internal(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Replicate API error".to_string(),
            Some(msg.clone()),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Replicate API error".to_string(),
            Some(other.to_string()),
        ),
    };

    (status, Json(ErrorResponse { error, details }))
}
