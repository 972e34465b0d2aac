//! Storyboard Service - one composed page for the whole outline
//!
//! Sends a single prompt describing every scene as a panel. Quota
//! exhaustion and other provider failures are answered with a placeholder
//! image; only a missing credential or an empty outline is an error.

use std::sync::Arc;

use crate::application::ports::outbound::{ImageGenerationError, ImageGenerationPort, ImageRequest};
use crate::application::services::generation::{FallbackReason, GatewayError, Generated};
use crate::application::services::prompts::build_storyboard_prompt;
use crate::domain::entities::{SceneStep, StoryboardArtifact};
use crate::domain::value_objects::{ContentClassification, StoryMode};

const PROVIDER: &str = "Image generation";

pub const QUOTA_MESSAGE: &str =
    "Quota limit reached. Please increase your Google Cloud quota or wait before generating more images.";
pub const FAILURE_MESSAGE: &str = "Failed to generate storyboard. Using placeholder image.";

/// Service for generating storyboard pages
pub struct StoryboardService {
    images: Arc<dyn ImageGenerationPort>,
    mode: StoryMode,
}

impl StoryboardService {
    pub fn new(images: Arc<dyn ImageGenerationPort>, mode: StoryMode) -> Self {
        Self { images, mode }
    }

    /// Generate one storyboard page for all `steps`
    pub async fn generate(
        &self,
        steps: &[SceneStep],
        classification: ContentClassification,
    ) -> Result<Generated<StoryboardArtifact>, GatewayError> {
        if steps.is_empty() {
            return Err(GatewayError::InvalidRequest("Story steps are required".to_string()));
        }
        if !self.images.is_configured() {
            tracing::error!("Image generation requested without an API key");
            return Err(GatewayError::NotConfigured(PROVIDER));
        }

        tracing::info!(
            "Generating storyboard with {} style ({} panels)",
            classification,
            steps.len()
        );

        let prompt = build_storyboard_prompt(steps, classification, self.mode);
        match self.images.generate(ImageRequest::storyboard_page(prompt)).await {
            Ok(image) => {
                tracing::debug!("Storyboard image is {} base64 bytes", image.base64_png.len());
                Ok(Generated::Success(StoryboardArtifact::generated(
                    image.data_uri(),
                    format!("{} storyboard generated successfully", style_label(classification)),
                )))
            }
            Err(e) => Ok(self.fallback(e, classification, steps.len())),
        }
    }

    fn fallback(
        &self,
        error: ImageGenerationError,
        classification: ContentClassification,
        panel_count: usize,
    ) -> Generated<StoryboardArtifact> {
        let image = placeholder_image(classification, panel_count);

        if error.is_quota() {
            tracing::error!("Image generation quota exceeded: {}", error);
            return Generated::fallback(
                FallbackReason::QuotaExceeded,
                StoryboardArtifact::placeholder(image, true, QUOTA_MESSAGE),
            );
        }

        tracing::error!("Error generating storyboard: {}", error);
        let reason = match &error {
            ImageGenerationError::MissingImageData | ImageGenerationError::Malformed(_) => {
                FallbackReason::Malformed(error.to_string())
            }
            ImageGenerationError::Http(message) => FallbackReason::Transport(message.clone()),
            ImageGenerationError::NotConfigured => FallbackReason::NotConfigured,
            _ => FallbackReason::Provider(error.to_string()),
        };
        Generated::fallback(reason, StoryboardArtifact::placeholder(image, false, FAILURE_MESSAGE))
    }
}

fn style_label(classification: ContentClassification) -> &'static str {
    match classification {
        ContentClassification::Advertisement => "Advertisement",
        ContentClassification::Narrative => "Comic",
    }
}

/// Placeholder page reference sized like a real storyboard
pub fn placeholder_image(classification: ContentClassification, panel_count: usize) -> String {
    let subject = match classification {
        ContentClassification::Advertisement => "Modern advertisement",
        ContentClassification::Narrative => "Comic",
    };
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("height", "1200")
        .append_pair("width", "900")
        .append_pair("query", &format!("{} storyboard with {} panels", subject, panel_count))
        .finish();
    format!("/placeholder.svg?{}", query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::GeneratedImage;
    use std::sync::Mutex;

    struct MockImages {
        configured: bool,
        reply: Result<GeneratedImage, ImageGenerationError>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockImages {
        fn new(reply: Result<GeneratedImage, ImageGenerationError>) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl ImageGenerationPort for MockImages {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageGenerationError> {
            self.prompts.lock().unwrap().push(request.prompt);
            self.reply.clone()
        }
    }

    fn steps(count: u32) -> Vec<SceneStep> {
        (1..=count)
            .map(|n| SceneStep::new(n, format!("Scene {}", n), "Something happens"))
            .collect()
    }

    #[tokio::test]
    async fn test_success_returns_data_uri() {
        let images = MockImages::new(Ok(GeneratedImage {
            base64_png: "iVBORw0KGgo".to_string(),
        }));
        let service = StoryboardService::new(images.clone(), StoryMode::Generic);

        let result = service
            .generate(&steps(5), ContentClassification::Narrative)
            .await
            .unwrap();

        let Generated::Success(artifact) = result else {
            panic!("Expected a generated storyboard");
        };
        assert_eq!(artifact.image, "data:image/png;base64,iVBORw0KGgo");
        assert!(!artifact.placeholder);
        assert!(!artifact.quota_exceeded);
        assert_eq!(images.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_quota_placeholder_not_error() {
        let images = MockImages::new(Err(ImageGenerationError::QuotaExceeded(
            "RESOURCE_EXHAUSTED".to_string(),
        )));
        let service = StoryboardService::new(images, StoryMode::Generic);

        let result = service
            .generate(&steps(5), ContentClassification::Advertisement)
            .await
            .unwrap();

        assert_eq!(result.fallback_reason(), Some(&FallbackReason::QuotaExceeded));
        let artifact = result.into_inner();
        assert!(artifact.quota_exceeded);
        assert!(artifact.placeholder);
        assert!(!artifact.image.is_empty());
        assert!(artifact.image.contains("Modern+advertisement+storyboard+with+5+panels"));
        assert_eq!(artifact.message.as_deref(), Some(QUOTA_MESSAGE));
    }

    #[tokio::test]
    async fn test_other_failure_is_generic_placeholder() {
        let images = MockImages::new(Err(ImageGenerationError::Api {
            status: 500,
            message: "backend unavailable".to_string(),
        }));
        let service = StoryboardService::new(images, StoryMode::Generic);

        let artifact = service
            .generate(&steps(6), ContentClassification::Narrative)
            .await
            .unwrap()
            .into_inner();

        assert!(!artifact.quota_exceeded);
        assert!(artifact.placeholder);
        assert!(artifact.image.contains("Comic+storyboard+with+6+panels"));
        assert_eq!(artifact.message.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_missing_image_data_is_malformed() {
        let images = MockImages::new(Err(ImageGenerationError::MissingImageData));
        let service = StoryboardService::new(images, StoryMode::Generic);

        let result = service
            .generate(&steps(5), ContentClassification::Narrative)
            .await
            .unwrap();
        assert!(matches!(result.fallback_reason(), Some(FallbackReason::Malformed(_))));
        assert!(result.into_inner().placeholder);

        let images = MockImages::new(Err(ImageGenerationError::Malformed("expected value".to_string())));
        let result = StoryboardService::new(images, StoryMode::Generic)
            .generate(&steps(5), ContentClassification::Narrative)
            .await
            .unwrap();
        assert!(matches!(result.fallback_reason(), Some(FallbackReason::Malformed(_))));
    }

    #[tokio::test]
    async fn test_guards() {
        let service = StoryboardService::new(
            Arc::new(MockImages {
                configured: false,
                reply: Err(ImageGenerationError::NotConfigured),
                prompts: Mutex::new(Vec::new()),
            }),
            StoryMode::Generic,
        );
        assert_eq!(
            service.generate(&steps(5), ContentClassification::Narrative).await,
            Err(GatewayError::NotConfigured("Image generation"))
        );
        assert!(matches!(
            service.generate(&[], ContentClassification::Narrative).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_placeholder_image_shape() {
        let url = placeholder_image(ContentClassification::Narrative, 5);
        assert_eq!(
            url,
            "/placeholder.svg?height=1200&width=900&query=Comic+storyboard+with+5+panels"
        );
    }
}
