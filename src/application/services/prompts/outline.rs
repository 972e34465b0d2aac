//! Outline and step regeneration prompts

use crate::domain::entities::SceneStep;
use crate::domain::value_objects::StoryMode;

/// Build the instruction that classifies the idea and expands it into scenes
pub fn build_outline_prompt(idea: &str, min_steps: usize, mode: StoryMode) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are a creative story writer. Given the following idea, first determine if this is an \
         advertisement/promotional content or a narrative story, then expand it into a detailed \
         outline with at least {} steps/scenes.\n\n",
        min_steps
    ));
    prompt.push_str(&format!("User's Idea: \"{}\"\n\n", idea.trim()));

    prompt.push_str("First, analyze the content type:\n");
    prompt.push_str(
        "- If it mentions products, services, brands, marketing, sales, promotion, advertisement, \
         or commercial purposes → classify as \"ad\"\n",
    );
    prompt.push_str(
        "- If it tells a story with characters, plot, narrative, or creative storytelling → \
         classify as \"story\"\n\n",
    );

    if mode.is_character_focused() {
        prompt.push_str("CHARACTER FOCUS:\n");
        prompt.push_str("- Give every scene a named character the scene centres on\n");
        prompt.push_str(
            "- If the idea mentions a real, named person, make that person the focus of the scenes \
             they appear in and keep their name exactly as written\n",
        );
        prompt.push_str(
            "- Describe each scene so the focus character is prominent in the frame\n\n",
        );
    }

    prompt.push_str("Return your response as a JSON object with this exact structure:\n");
    prompt.push_str("{\n  \"contentType\": \"ad\" or \"story\",\n  \"steps\": [\n");
    for number in 1..=min_steps {
        let separator = if number == min_steps { "" } else { "," };
        if mode.is_character_focused() {
            prompt.push_str(&format!(
                "    {{\"number\": {}, \"title\": \"...\", \"description\": \"...\", \"characterFocus\": \"...\"}}{}\n",
                number, separator
            ));
        } else {
            prompt.push_str(&format!(
                "    {{\"number\": {}, \"title\": \"...\", \"description\": \"...\"}}{}\n",
                number, separator
            ));
        }
    }
    prompt.push_str("  ]\n}\n\n");
    prompt.push_str("Make the outline engaging, cinematic, and appropriate for visual storytelling.");

    prompt
}

/// Build the instruction that rewrites a single scene in context
pub fn build_regenerate_step_prompt(
    idea: &str,
    step_number: u32,
    current_steps: &[SceneStep],
    mode: StoryMode,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a creative story writer revising one scene of an existing outline. Keep the \
         narrative continuous with the scenes before and after it.\n\n",
    );
    prompt.push_str(&format!("Original idea: \"{}\"\n\n", idea.trim()));

    prompt.push_str("CURRENT OUTLINE:\n");
    for step in current_steps {
        prompt.push_str(&format!("{}. {}: {}", step.number, step.title, step.description));
        if let Some(character) = &step.character_focus {
            prompt.push_str(&format!(" (focus: {})", character));
        }
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "Write a fresh version of scene {} only. Do not change any other scene.\n",
        step_number
    ));
    if mode.is_character_focused() {
        prompt.push_str(
            "Keep a named focus character for the scene; keep any real person's name exactly as written.\n",
        );
        prompt.push_str(&format!(
            "\nReturn a JSON object: {{\"step\": {{\"number\": {}, \"title\": \"...\", \"description\": \"...\", \"characterFocus\": \"...\"}}}}",
            step_number
        ));
    } else {
        prompt.push_str(&format!(
            "\nReturn a JSON object: {{\"step\": {{\"number\": {}, \"title\": \"...\", \"description\": \"...\"}}}}",
            step_number
        ));
    }

    prompt
}
