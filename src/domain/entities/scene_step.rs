//! Scene steps - the ordered beats of a story outline

use crate::domain::value_objects::ContentClassification;

/// One scene of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStep {
    /// Position in the outline, starting at 1
    pub number: u32,
    pub title: String,
    pub description: String,
    /// Named character the scene centres on (character-focused mode)
    pub character_focus: Option<String>,
}

impl SceneStep {
    pub fn new(number: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            description: description.into(),
            character_focus: None,
        }
    }

    pub fn with_character_focus(mut self, character: impl Into<String>) -> Self {
        self.character_focus = Some(character.into());
        self
    }

    /// Generic scene used to fill an outline that came back too short
    pub fn filler(number: u32) -> Self {
        Self::new(
            number,
            format!("Scene {}", number),
            "The story continues as new moments unfold, carrying the journey toward its conclusion.",
        )
    }

    /// Text read aloud for this scene
    pub fn narration_text(&self) -> String {
        let title = self.title.trim().trim_end_matches('.');
        if title.is_empty() {
            self.description.trim().to_string()
        } else {
            format!("{}. {}", title, self.description.trim())
        }
    }
}

/// A classified, ordered sequence of scenes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub classification: ContentClassification,
    pub steps: Vec<SceneStep>,
}

impl Outline {
    pub fn new(classification: ContentClassification, steps: Vec<SceneStep>) -> Self {
        Self {
            classification,
            steps,
        }
    }

    /// Renumber steps 1..N by position and append filler scenes until
    /// there are at least `min_steps`
    ///
    /// Steps the model returned keep their title, description and focus;
    /// filler is only ever appended after them.
    pub fn normalized(mut self, min_steps: usize) -> Self {
        renumber(&mut self.steps);
        while self.steps.len() < min_steps {
            let number = self.steps.len() as u32 + 1;
            self.steps.push(SceneStep::filler(number));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Make sequence numbers contiguous, starting at 1
pub fn renumber(steps: &mut [SceneStep]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.number = index as u32 + 1;
    }
}
