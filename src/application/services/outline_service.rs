//! Outline Service - turns an idea into classified scenes
//!
//! Builds the outline instruction, sends it to the text model, strips any
//! code fencing from the reply and parses it. Whatever the model returns,
//! the outline handed back has contiguous numbering and at least the
//! minimum number of scenes. Provider failures produce the deterministic
//! placeholder outline instead of an error.

use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::outbound::{LlmError, LlmPort, LlmRequest};
use crate::application::services::generation::{FallbackReason, GatewayError, Generated};
use crate::application::services::prompts::{build_outline_prompt, build_regenerate_step_prompt};
use crate::domain::entities::{Outline, SceneStep};
use crate::domain::value_objects::{ContentClassification, StoryMode};

const PROVIDER: &str = "Text generation";

const PLACEHOLDER_TITLES: [&str; 5] = [
    "The Awakening",
    "The Journey Begins",
    "The Great Challenge",
    "The Revelation",
    "The Triumph",
];

const PLACEHOLDER_DESCRIPTIONS: [&str; 5] = [
    "Our story begins in an unexpected place. The protagonist discovers something that will change everything: a spark of curiosity that cannot be ignored.",
    "With newfound purpose, the adventure truly starts. Challenges emerge, but so does determination. Every step forward reveals new wonders and obstacles.",
    "The most difficult moment arrives. Doubt creeps in, but resilience prevails. This is where true character is forged in the fires of adversity.",
    "Everything becomes clear. The pieces of the puzzle fall into place, revealing a truth that was hidden all along. Understanding dawns like a sunrise.",
    "The journey reaches its climax. All struggles, lessons, and growth culminate in a breathtaking finale. The story comes full circle, transformed and complete.",
];

/// Replacement descriptions used when a single scene cannot be regenerated,
/// picked by `step index mod len`
const REGENERATED_DESCRIPTIONS: [&str; 5] = [
    "A fresh perspective emerges, revealing hidden depths in the story. The narrative takes an unexpected turn that captivates and intrigues.",
    "The plot thickens with new developments. Characters face fresh challenges that test their resolve in surprising ways.",
    "An alternative path unfolds, rich with possibility. The story evolves in directions previously unimagined.",
    "New insights illuminate the journey. The narrative deepens, revealing layers of meaning and emotion.",
    "The story transforms, taking on new dimensions. What seemed certain becomes fluid, dynamic, alive.",
];

/// Service for generating and revising story outlines
pub struct OutlineService {
    llm: Arc<dyn LlmPort>,
    mode: StoryMode,
    min_steps: usize,
}

impl OutlineService {
    pub fn new(llm: Arc<dyn LlmPort>, mode: StoryMode, min_steps: usize) -> Self {
        Self {
            llm,
            mode,
            min_steps,
        }
    }

    /// Classify the idea and expand it into at least `min_steps` scenes
    pub async fn generate_outline(&self, idea: &str) -> Result<Generated<Outline>, GatewayError> {
        if idea.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("Prompt is required".to_string()));
        }
        if !self.llm.is_configured() {
            return Err(GatewayError::NotConfigured(PROVIDER));
        }

        let prompt = build_outline_prompt(idea, self.min_steps, self.mode);
        let response = match self.llm.generate(LlmRequest::new(prompt)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Outline generation failed: {}", e);
                return Ok(Generated::fallback(
                    fallback_reason(e),
                    self.placeholder_outline(idea),
                ));
            }
        };

        match parse_outline(&response.content) {
            Ok(outline) => {
                let outline = outline.normalized(self.min_steps);
                tracing::info!(
                    "Generated {} outline with {} scenes ({})",
                    outline.classification,
                    outline.len(),
                    response.model
                );
                Ok(Generated::Success(outline))
            }
            Err(e) => {
                tracing::warn!("Could not parse outline reply: {}", e);
                Ok(Generated::fallback(
                    FallbackReason::Malformed(e),
                    self.placeholder_outline(idea),
                ))
            }
        }
    }

    /// Rewrite the scene at `index` in the context of the whole outline
    ///
    /// The returned step always carries the sequence number of the slot it
    /// replaces.
    pub async fn regenerate_step(
        &self,
        idea: &str,
        index: usize,
        steps: &[SceneStep],
    ) -> Result<Generated<SceneStep>, GatewayError> {
        if idea.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("Prompt is required".to_string()));
        }
        let Some(current) = steps.get(index) else {
            return Err(GatewayError::InvalidRequest(format!(
                "Step {} does not exist ({} steps)",
                index + 1,
                steps.len()
            )));
        };
        if !self.llm.is_configured() {
            return Err(GatewayError::NotConfigured(PROVIDER));
        }

        let step_number = index as u32 + 1;
        let prompt = build_regenerate_step_prompt(idea, step_number, steps, self.mode);
        let response = match self.llm.generate(LlmRequest::new(prompt)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Step {} regeneration failed: {}", step_number, e);
                return Ok(Generated::fallback(
                    fallback_reason(e),
                    placeholder_step(current, index),
                ));
            }
        };

        match parse_step(&response.content) {
            Ok(mut step) => {
                step.number = step_number;
                tracing::info!("Regenerated step {}", step_number);
                Ok(Generated::Success(step))
            }
            Err(e) => {
                tracing::warn!("Could not parse regenerated step: {}", e);
                Ok(Generated::fallback(
                    FallbackReason::Malformed(e),
                    placeholder_step(current, index),
                ))
            }
        }
    }

    /// Deterministic outline used when the model cannot be reached
    pub fn placeholder_outline(&self, idea: &str) -> Outline {
        placeholder_outline(idea, self.min_steps)
    }
}

/// Deterministic outline; the idea opens the first scene
pub fn placeholder_outline(idea: &str, min_steps: usize) -> Outline {
    let steps = PLACEHOLDER_TITLES
        .iter()
        .zip(PLACEHOLDER_DESCRIPTIONS.iter())
        .enumerate()
        .map(|(index, (title, description))| {
            let description = if index == 0 {
                format!("{}\n\n{}", idea.trim(), description)
            } else {
                description.to_string()
            };
            SceneStep::new(index as u32 + 1, *title, description)
        })
        .collect();

    Outline::new(ContentClassification::Narrative, steps).normalized(min_steps)
}

/// Keep the scene's title and focus, swap in a generic description
pub fn placeholder_step(current: &SceneStep, index: usize) -> SceneStep {
    SceneStep {
        number: index as u32 + 1,
        title: current.title.clone(),
        description: REGENERATED_DESCRIPTIONS[index % REGENERATED_DESCRIPTIONS.len()].to_string(),
        character_focus: current.character_focus.clone(),
    }
}

fn fallback_reason(error: LlmError) -> FallbackReason {
    match error {
        LlmError::NotConfigured => FallbackReason::NotConfigured,
        LlmError::Http(message) => FallbackReason::Transport(message),
        LlmError::Api { status: 401 | 403, .. } => FallbackReason::Unauthorized,
        LlmError::Api { status: 429, .. } => FallbackReason::QuotaExceeded,
        LlmError::Api { status, message } => FallbackReason::Provider(format!("{}: {}", status, message)),
        LlmError::EmptyResponse => FallbackReason::Malformed("no content in model response".to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct RawOutline {
    #[serde(rename = "contentType", default)]
    content_type: Option<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "characterFocus", default)]
    character_focus: Option<String>,
}

impl From<RawStep> for SceneStep {
    fn from(raw: RawStep) -> Self {
        SceneStep {
            number: 0,
            title: raw.title.trim().to_string(),
            description: raw.description.trim().to_string(),
            character_focus: raw
                .character_focus
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStepEnvelope {
    step: RawStep,
}

/// Remove markdown code fences and any prose around the JSON object
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.trim_end().strip_suffix("```").unwrap_or(trimmed).trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn parse_outline(content: &str) -> Result<Outline, String> {
    let raw: RawOutline = serde_json::from_str(strip_code_fences(content)).map_err(|e| e.to_string())?;
    let classification = raw
        .content_type
        .as_deref()
        .map(ContentClassification::from_wire)
        .unwrap_or_default();
    let steps = raw
        .steps
        .into_iter()
        .map(SceneStep::from)
        .filter(|step| !step.title.is_empty() || !step.description.is_empty())
        .collect();
    Ok(Outline::new(classification, steps))
}

fn parse_step(content: &str) -> Result<SceneStep, String> {
    let json = strip_code_fences(content);
    let raw = serde_json::from_str::<RawStepEnvelope>(json)
        .map(|envelope| envelope.step)
        .or_else(|_| serde_json::from_str::<RawStep>(json))
        .map_err(|e| e.to_string())?;
    let step = SceneStep::from(raw);
    if step.description.is_empty() {
        return Err("Regenerated step has no description".to_string());
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::LlmResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockLlm {
        configured: bool,
        reply: Result<String, LlmError>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl MockLlm {
        fn replying(content: &str) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply: Ok(content.to_string()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(error: LlmError) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply: Err(error),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                reply: Err(LlmError::NotConfigured),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmPort for MockLlm {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt);
            self.reply.clone().map(|content| LlmResponse {
                content,
                model: "mock".to_string(),
            })
        }
    }

    fn service(llm: Arc<MockLlm>) -> OutlineService {
        OutlineService::new(llm, StoryMode::Generic, 5)
    }

    fn five_steps() -> Vec<SceneStep> {
        (1..=5)
            .map(|n| SceneStep::new(n, format!("Title {}", n), format!("Description {}", n)))
            .collect()
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("Here you go: {\"a\": 1} enjoy"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_fenced_outline_is_parsed() {
        let reply = r#"```json
{
  "contentType": "ad",
  "steps": [
    {"number": 1, "title": "Meet the bottle", "description": "A sleek bottle."},
    {"number": 2, "title": "Morning run", "description": "Hydration on the go."},
    {"number": 3, "title": "Office", "description": "Stays cold all day."},
    {"number": 4, "title": "Gym", "description": "Tough and light."},
    {"number": 5, "title": "Logo", "description": "Buy now."}
  ]
}
```"#;
        let result = service(MockLlm::replying(reply))
            .generate_outline("Ad for a water bottle")
            .await
            .unwrap();

        let Generated::Success(outline) = result else {
            panic!("Expected a generated outline");
        };
        assert_eq!(outline.classification, ContentClassification::Advertisement);
        assert_eq!(outline.len(), 5);
        assert_eq!(outline.steps[0].title, "Meet the bottle");
    }

    #[tokio::test]
    async fn test_short_outline_is_padded_to_five() {
        let reply = r#"{"contentType": "story", "steps": [
            {"number": 1, "title": "One", "description": "First"},
            {"number": 2, "title": "Two", "description": "Second"}
        ]}"#;
        let outline = service(MockLlm::replying(reply))
            .generate_outline("A short tale")
            .await
            .unwrap()
            .into_inner();

        assert_eq!(outline.len(), 5);
        assert_eq!(outline.steps[0].title, "One");
        assert_eq!(outline.steps[1].description, "Second");
        assert_eq!(outline.steps[2], SceneStep::filler(3));
        let numbers: Vec<u32> = outline.steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_provider_failure_yields_placeholder_outline() {
        let llm = MockLlm::failing(LlmError::Api {
            status: 500,
            message: "Internal".to_string(),
        });
        let result = service(llm).generate_outline("A robot who paints").await.unwrap();

        assert!(matches!(
            result.fallback_reason(),
            Some(FallbackReason::Provider(_))
        ));
        let outline = result.into_inner();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline.steps[0].title, "The Awakening");
        assert!(outline.steps[0].description.starts_with("A robot who paints"));
        assert_eq!(outline.steps[4].title, "The Triumph");
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_malformed_fallback() {
        let result = service(MockLlm::replying("I cannot help with that."))
            .generate_outline("idea")
            .await
            .unwrap();
        assert!(matches!(result.fallback_reason(), Some(FallbackReason::Malformed(_))));
        assert_eq!(result.into_inner().len(), 5);
    }

    #[tokio::test]
    async fn test_missing_key_and_empty_idea_are_errors() {
        let llm = MockLlm::unconfigured();
        let result = service(llm.clone()).generate_outline("idea").await;
        assert_eq!(result, Err(GatewayError::NotConfigured("Text generation")));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);

        let result = service(MockLlm::replying("{}")).generate_outline("   ").await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_character_focus_is_kept() {
        let reply = r#"{"contentType": "story", "steps": [
            {"title": "Lab", "description": "Night in the lab", "characterFocus": "Marie Curie"}
        ]}"#;
        let svc = OutlineService::new(MockLlm::replying(reply), StoryMode::CharacterFocused, 5);
        let outline = svc.generate_outline("Marie Curie story").await.unwrap().into_inner();
        assert_eq!(outline.steps[0].character_focus.as_deref(), Some("Marie Curie"));
        assert_eq!(outline.len(), 5);
    }

    #[tokio::test]
    async fn test_regenerate_step_uses_slot_number() {
        let reply = r#"{"step": {"number": 9, "title": "New middle", "description": "A twist."}}"#;
        let llm = MockLlm::replying(reply);
        let steps = five_steps();
        let result = service(llm.clone()).regenerate_step("idea", 2, &steps).await.unwrap();

        let Generated::Success(step) = result else {
            panic!("Expected a regenerated step");
        };
        assert_eq!(step.number, 3);
        assert_eq!(step.title, "New middle");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("5. Title 5: Description 5"));
    }

    #[tokio::test]
    async fn test_regenerate_step_accepts_bare_object() {
        let reply = r#"{"title": "Bare", "description": "No envelope."}"#;
        let step = service(MockLlm::replying(reply))
            .regenerate_step("idea", 0, &five_steps())
            .await
            .unwrap()
            .into_inner();
        assert_eq!(step.title, "Bare");
        assert_eq!(step.number, 1);
    }

    #[tokio::test]
    async fn test_regenerate_step_fallback_rotates_descriptions() {
        let steps = five_steps();
        for index in 0..steps.len() {
            let llm = MockLlm::failing(LlmError::Http("connection refused".to_string()));
            let result = service(llm).regenerate_step("idea", index, &steps).await.unwrap();
            assert!(matches!(result.fallback_reason(), Some(FallbackReason::Transport(_))));

            let step = result.into_inner();
            assert_eq!(step.number, index as u32 + 1);
            assert_eq!(step.title, steps[index].title);
            assert_eq!(step.description, REGENERATED_DESCRIPTIONS[index % 5]);
        }
    }

    #[tokio::test]
    async fn test_regenerate_step_out_of_range() {
        let result = service(MockLlm::replying("{}"))
            .regenerate_step("idea", 5, &five_steps())
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn test_placeholder_step_wraps_table() {
        let step = SceneStep::new(7, "Seventh", "old");
        let replaced = placeholder_step(&step, 6);
        assert_eq!(replaced.description, REGENERATED_DESCRIPTIONS[1]);
        assert_eq!(replaced.number, 7);
    }
}
