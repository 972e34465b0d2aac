//! Storyboard page prompt
//!
//! One prompt describes the whole page: every scene becomes a panel of a
//! single composed image.

use crate::domain::entities::SceneStep;
use crate::domain::value_objects::{ContentClassification, StoryMode};

/// Visual style guide for a classification and storytelling mode
pub fn style_guide(classification: ContentClassification, mode: StoryMode) -> &'static str {
    match (classification, mode) {
        (ContentClassification::Advertisement, StoryMode::Generic) => {
            "Style: AI-cartoonized modern illustration with vibrant colors, smooth gradients, and dynamic compositions.
- Modern, sleek, polished digital illustration style
- Colorful with vibrant hues and smooth color gradients
- Clean, professional look suitable for advertisements
- Dynamic angles and eye-catching compositions
- Glossy, 3D-rendered aesthetic with depth and dimension
- Energetic and engaging visual storytelling
- Contemporary commercial art style
- Product/brand-focused visual hierarchy"
        }
        (ContentClassification::Narrative, StoryMode::Generic) => {
            "Style: Comic book / graphic novel illustration with expressive characters and vibrant backgrounds.
- Bold outlined characters with thick black ink lines
- Colorful, expressive comic-style panels
- Dynamic action poses and dramatic angles
- Vibrant backgrounds with rich colors
- Traditional comic book shading and highlights
- Expressive facial features and body language
- Sequential art storytelling techniques
- Manga/graphic novel aesthetic with energy lines and motion"
        }
        (ContentClassification::Advertisement, StoryMode::CharacterFocused) => {
            "Style: Photorealistic commercial photography, NO cartoon, NO illustration.
- High-end advertising campaign look with studio lighting
- Product/brand-focused visual hierarchy with the focus character prominent
- Clean, professional compositions suitable for advertisements
- Shallow depth of field and polished color grading
- Contemporary commercial aesthetic"
        }
        (ContentClassification::Narrative, StoryMode::CharacterFocused) => {
            "Style: Photorealistic cinematic film stills, NO cartoon, NO illustration.
- Movie-grade lighting and lens choices
- The focus character is large in frame and clearly recognizable in every panel
- Natural skin tones, realistic textures and environments
- Dramatic camera angles and cinematic color grading
- Emotional, character-driven storytelling"
        }
    }
}

/// Build the single prompt for the storyboard page
pub fn build_storyboard_prompt(
    steps: &[SceneStep],
    classification: ContentClassification,
    mode: StoryMode,
) -> String {
    let count = steps.len();
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Create a single storyboard page layout containing {} distinct panels arranged in a comic-style grid.\n\n",
        count
    ));
    prompt.push_str(style_guide(classification, mode));
    prompt.push_str("\n\n");

    prompt.push_str(&format!("Panel descriptions ({} scenes total):\n", count));
    for (index, step) in steps.iter().enumerate() {
        prompt.push_str(&format!("\nPanel {}: {}\n{}\n", index + 1, step.title, step.description));
        if let Some(character) = &step.character_focus {
            prompt.push_str(&format!("Focus character: {}\n", character));
        }
    }

    prompt.push_str("\nLayout requirements:\n");
    prompt.push_str(&format!("- Single page containing all {} panels\n", count));
    prompt.push_str("- Each panel should be clearly separated with borders\n");
    prompt.push_str("- Panels arranged in a visually appealing grid (2-3 panels per row)\n");
    prompt.push_str("- Vary panel sizes for visual interest\n");
    prompt.push_str("- Maintain consistent art style across all panels\n");
    prompt.push_str(match classification {
        ContentClassification::Advertisement => "- Professional, polished commercial look\n",
        ContentClassification::Narrative => "- Comic book page aesthetic\n",
    });
    prompt.push_str("- NO text overlays, NO speech bubbles, NO captions - pure visual storytelling\n");
    prompt.push_str("- Cohesive color palette throughout the composition\n");
    if mode.is_character_focused() {
        prompt.push_str("- Photorealistic rendering only, NO cartoon style\n");
        prompt.push_str(
            "- Any real, named person must be rendered recognizably as themselves, consistent across panels\n",
        );
    } else {
        prompt.push_str(match classification {
            ContentClassification::Advertisement => "- Modern, sleek, gradient-rich illustrations\n",
            ContentClassification::Narrative => "- Bold comic-style artwork with vibrant colors\n",
        });
    }

    prompt.push_str(&format!(
        "\nThe final image should be a complete storyboard page showing all {} story beats in one unified composition.",
        count
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<SceneStep> {
        (1..=5)
            .map(|n| SceneStep::new(n, format!("Beat {}", n), format!("Something happens {}", n)))
            .collect()
    }

    #[test]
    fn test_styles_are_distinct_per_classification() {
        for mode in [StoryMode::Generic, StoryMode::CharacterFocused] {
            let ad = build_storyboard_prompt(&steps(), ContentClassification::Advertisement, mode);
            let story = build_storyboard_prompt(&steps(), ContentClassification::Narrative, mode);

            assert!(ad.contains("commercial"));
            assert!(ad.contains("advertising") || ad.contains("advertisements"));
            assert!(!story.contains("commercial"));
            assert!(!story.contains("advertis"));
            assert_ne!(
                style_guide(ContentClassification::Advertisement, mode),
                style_guide(ContentClassification::Narrative, mode)
            );
        }

        let comic = build_storyboard_prompt(&steps(), ContentClassification::Narrative, StoryMode::Generic);
        assert!(comic.contains("Comic book"));
        let cinematic =
            build_storyboard_prompt(&steps(), ContentClassification::Narrative, StoryMode::CharacterFocused);
        assert!(cinematic.contains("cinematic"));
    }

    #[test]
    fn test_prompt_describes_one_page_with_every_panel() {
        let prompt = build_storyboard_prompt(&steps(), ContentClassification::Narrative, StoryMode::Generic);
        assert!(prompt.contains("single storyboard page layout containing 5 distinct panels"));
        for n in 1..=5 {
            assert!(prompt.contains(&format!("Panel {}: Beat {}", n, n)));
        }
        assert!(prompt.contains("NO text overlays, NO speech bubbles, NO captions"));
    }

    #[test]
    fn test_character_focused_prompt_is_photorealistic() {
        let mut with_focus = steps();
        with_focus[0].character_focus = Some("Marie Curie".to_string());
        let prompt =
            build_storyboard_prompt(&with_focus, ContentClassification::Narrative, StoryMode::CharacterFocused);
        assert!(prompt.contains("NO cartoon"));
        assert!(prompt.contains("Photorealistic"));
        assert!(prompt.contains("rendered recognizably"));
        assert!(prompt.contains("Focus character: Marie Curie"));
    }
}
