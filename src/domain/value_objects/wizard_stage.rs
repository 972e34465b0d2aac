//! Wizard stages and the transitions between them

/// Where the user is in the idea-to-video flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStage {
    #[default]
    Input,
    Outline,
    Storyboard,
    Composer,
    Complete,
}

impl WizardStage {
    /// The stage a backward transition lands on, if one exists
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Outline => Some(Self::Input),
            Self::Storyboard => Some(Self::Outline),
            Self::Composer => Some(Self::Storyboard),
            Self::Input | Self::Complete => None,
        }
    }

    /// The stage a plain forward transition lands on
    ///
    /// `Composer -> Complete` is only reachable by saving, so it is not
    /// listed here.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Input => Some(Self::Outline),
            Self::Outline => Some(Self::Storyboard),
            Self::Storyboard => Some(Self::Composer),
            Self::Composer | Self::Complete => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Outline => "outline",
            Self::Storyboard => "storyboard",
            Self::Composer => "composer",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for WizardStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_transitions() {
        assert_eq!(WizardStage::Outline.previous(), Some(WizardStage::Input));
        assert_eq!(WizardStage::Storyboard.previous(), Some(WizardStage::Outline));
        assert_eq!(WizardStage::Composer.previous(), Some(WizardStage::Storyboard));
        assert_eq!(WizardStage::Input.previous(), None);
        assert_eq!(WizardStage::Complete.previous(), None);
    }

    #[test]
    fn test_forward_transitions_skip_complete() {
        assert_eq!(WizardStage::Storyboard.next(), Some(WizardStage::Composer));
        assert_eq!(WizardStage::Composer.next(), None);
    }
}
