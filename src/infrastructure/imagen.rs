//! Imagen client for storyboard pages

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{
    GeneratedImage, ImageGenerationError, ImageGenerationPort, ImageRequest,
};

/// Client for the Vertex AI Imagen `predict` endpoint
pub struct ImagenClient {
    client: Client,
    base_url: String,
    project_id: String,
    location: String,
    model: String,
    api_key: Option<String>,
}

impl ImagenClient {
    pub fn new(
        base_url: &str,
        project_id: &str,
        location: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            location: location.to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    fn predict_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.base_url, self.project_id, self.location, self.model
        )
    }
}

#[async_trait]
impl ImageGenerationPort for ImagenClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageGenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ImageGenerationError::NotConfigured)?;

        let body = PredictRequest {
            instances: vec![Instance {
                prompt: request.prompt,
            }],
            parameters: Parameters {
                sample_count: request.sample_count,
                aspect_ratio: request.aspect_ratio,
                safety_filter_level: "block_some",
                person_generation: "allow_adult",
            },
        };

        let response = self
            .client
            .post(self.predict_url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGenerationError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageGenerationError::QuotaExceeded(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageGenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| ImageGenerationError::Malformed(e.to_string()))?;

        let base64_png = parsed
            .predictions
            .into_iter()
            .next()
            .and_then(|prediction| prediction.bytes_base64_encoded)
            .filter(|bytes| !bytes.is_empty())
            .ok_or(ImageGenerationError::MissingImageData)?;

        tracing::debug!("Imagen returned {} bytes of base64 image data", base64_png.len());

        Ok(GeneratedImage { base64_png })
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
    aspect_ratio: String,
    safety_filter_level: &'static str,
    person_generation: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}
