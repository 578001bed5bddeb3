use replicate_relay::{
    config::{Config, ReplicateConfig},
    replicate::{Prediction, PredictionOutput, PredictionStatus},
};
use serde_json::{Value, json};

pub const TEST_MODEL: &str = "black-forest-labs/flux-dev";
pub const TEST_API_KEY: &str = "r8_test_key";

/// Replicate settings with a short poll cadence for tests
pub fn create_test_replicate_config(base_url: &str) -> ReplicateConfig {
    ReplicateConfig {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        model: TEST_MODEL.to_string(),
        poll_interval_ms: 10,
        poll_timeout_secs: 5,
    }
}

/// Full configuration pointing the client at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.replicate = create_test_replicate_config(base_url);
    config
}

pub fn prediction(id: &str, status: PredictionStatus) -> Prediction {
    Prediction {
        id: id.to_string(),
        status,
        output: None,
    }
}

pub fn succeeded(id: &str, urls: &[&str]) -> Prediction {
    Prediction {
        id: id.to_string(),
        status: PredictionStatus::Succeeded,
        output: Some(PredictionOutput::Many(
            urls.iter().map(|u| u.to_string()).collect(),
        )),
    }
}

/// Prediction JSON as the API returns it
pub fn prediction_json(id: &str, status: &str, output: Option<Value>) -> Value {
    json!({
        "id": id,
        "model": TEST_MODEL,
        "status": status,
        "output": output,
        "urls": {
            "get": format!("https://api.replicate.com/v1/predictions/{id}"),
            "cancel": format!("https://api.replicate.com/v1/predictions/{id}/cancel"),
        }
    })
}

/// A tiny PNG header, base64 encoded
pub const SAMPLE_IMAGE_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk";

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 3000
  body_limit_bytes: 1048576
  logs:
    level: "debug"

replicate:
  base_url: "http://localhost:9999/v1"
  api_key: "r8_from_file"
  model: "stability-ai/stable-diffusion-xl"
  poll_interval_ms: 500
  poll_timeout_secs: 60
"#;
