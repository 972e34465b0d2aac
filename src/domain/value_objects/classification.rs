//! Content classification - decides which visual style a story is drawn in

/// What kind of content the user's idea describes
///
/// Determined by the outline model from the idea. Governs the storyboard
/// style until the story is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentClassification {
    /// Promotional content: products, services, brands
    Advertisement,
    /// A story with characters and plot
    #[default]
    Narrative,
}

impl ContentClassification {
    /// Parse the value the outline model returns (`"ad"` or `"story"`)
    ///
    /// Anything unrecognised is treated as a narrative.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ad" | "advertisement" | "commercial" => Self::Advertisement,
            _ => Self::Narrative,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Advertisement => "ad",
            Self::Narrative => "story",
        }
    }

    pub fn is_advertisement(&self) -> bool {
        matches!(self, Self::Advertisement)
    }
}

impl std::fmt::Display for ContentClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}
