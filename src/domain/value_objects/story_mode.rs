//! Storytelling and composition modes

use std::str::FromStr;

/// Which prompt variant the outline and storyboard stages use
///
/// `Generic` asks for plain title/description scenes. `CharacterFocused`
/// also asks for a named character per scene, emphasising any real
/// person mentioned in the idea, and pushes the storyboard towards
/// photorealistic, character-prominent panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryMode {
    #[default]
    Generic,
    CharacterFocused,
}

impl StoryMode {
    pub fn is_character_focused(&self) -> bool {
        matches!(self, Self::CharacterFocused)
    }
}

impl FromStr for StoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "character_focused" | "character-focused" | "character" => Ok(Self::CharacterFocused),
            other => Err(format!("Unknown story mode: {}", other)),
        }
    }
}

/// How the composed video animates the storyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    Cinematic,
    Slideshow,
}

impl CompositionMode {
    pub fn from_cinematic_flag(cinematic: bool) -> Self {
        if cinematic {
            Self::Cinematic
        } else {
            Self::Slideshow
        }
    }

    pub fn is_cinematic(&self) -> bool {
        matches!(self, Self::Cinematic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cinematic => "cinematic",
            Self::Slideshow => "slideshow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_mode_parse() {
        assert_eq!("generic".parse::<StoryMode>(), Ok(StoryMode::Generic));
        assert_eq!(
            "Character_Focused".parse::<StoryMode>(),
            Ok(StoryMode::CharacterFocused)
        );
        assert!("anime".parse::<StoryMode>().is_err());
    }

    #[test]
    fn test_composition_mode_from_flag() {
        assert_eq!(CompositionMode::from_cinematic_flag(true), CompositionMode::Cinematic);
        assert_eq!(CompositionMode::from_cinematic_flag(false), CompositionMode::Slideshow);
        assert_eq!(CompositionMode::Slideshow.as_str(), "slideshow");
    }
}
