//! Wizard context - the explicit state of one idea-to-video session
//!
//! Every transition is a method on `WizardContext`. Operations that call a
//! provider are split in two: `begin_*` checks the guard, marks the
//! operation in flight and hands back what the provider needs together
//! with an `OperationTicket`; `complete_*` applies the outcome. Results
//! carrying a ticket from before a `reset` are dropped.
//!
//! Each running operation has its own progress estimator. The reported
//! progress is the slowest of them, so it only reads 100 once nothing is
//! pending.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::application::services::generation::Generated;
use crate::application::services::progress::{ProgressEstimator, COMPLETE};
use crate::domain::entities::{
    NarrationArtifact, Outline, SceneStep, Story, StoryboardArtifact, VideoArtifact,
};
use crate::domain::value_objects::{
    CompositionMode, ContentClassification, StoryId, WizardId, WizardStage,
};

pub const QUOTA_WARNING: &str = "Google Cloud quota limit reached. The image shown is a placeholder. \
To generate the actual storyboard:\n1. Visit Google Cloud Console\n2. Request a quota increase for \
Imagen API\n3. Wait a few minutes and try again";

pub const QUOTA_WARNING_ON_REGENERATE: &str = "Quota limit reached. Please wait a few minutes before \
trying again, or request a quota increase in Google Cloud Console.";

/// Wizard operations that call out to a provider or the story store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardOperation {
    GenerateOutline,
    RegenerateStep,
    GenerateStoryboard,
    RegenerateStoryboard,
    GenerateNarration,
    ComposeVideo,
    Save,
}

impl WizardOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateOutline => "generate_outline",
            Self::RegenerateStep => "regenerate_step",
            Self::GenerateStoryboard => "generate_storyboard",
            Self::RegenerateStoryboard => "regenerate_storyboard",
            Self::GenerateNarration => "generate_narration",
            Self::ComposeVideo => "compose_video",
            Self::Save => "save",
        }
    }
}

impl std::fmt::Display for WizardOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof that an operation was started; required to apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTicket {
    operation: WizardOperation,
    epoch: u64,
}

impl OperationTicket {
    pub fn operation(&self) -> WizardOperation {
        self.operation
    }
}

/// The step currently open for editing and its unsaved text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSelection {
    pub index: usize,
    pub buffer: String,
}

/// Inputs for the composition provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionInputs {
    pub storyboard_image: String,
    pub audio_url: Option<String>,
    pub scene_count: usize,
    pub mode: CompositionMode,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("Wizard not found: {0}")]
    NotFound(WizardId),
    #[error("Operation {0} is already in progress")]
    OperationInProgress(WizardOperation),
    #[error("An idea is required")]
    EmptyIdea,
    #[error("The idea cannot change once an outline is requested; reset to start over")]
    IdeaLocked,
    #[error("No outline has been generated yet")]
    NoOutline,
    #[error("Step index {index} is out of range ({len} steps)")]
    StepOutOfRange { index: usize, len: usize },
    #[error("Step index {0} is not selected for editing")]
    NotSelected(usize),
    #[error("No storyboard has been generated yet")]
    NoStoryboard,
    #[error("No narration decision has been made yet")]
    NoNarration,
    #[error("Cannot {action} from the {stage} stage")]
    InvalidTransition { action: &'static str, stage: WizardStage },
    #[error("{0}")]
    Rejected(String),
    #[error("Save failed: {0}")]
    SaveFailed(String),
}

/// Point-in-time copy of the wizard, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSnapshot {
    pub id: WizardId,
    pub stage: WizardStage,
    pub story: Story,
    pub selection: Option<StepSelection>,
    pub cinematic_mode: bool,
    pub in_flight: Vec<WizardOperation>,
    pub status_message: Option<String>,
    pub quota_warning: Option<String>,
    pub saved_as: Option<StoryId>,
    pub progress: u8,
}

#[derive(Debug)]
pub struct WizardContext {
    id: WizardId,
    stage: WizardStage,
    story: Story,
    selection: Option<StepSelection>,
    cinematic_mode: bool,
    in_flight: HashMap<WizardOperation, ProgressEstimator>,
    status_message: Option<String>,
    quota_warning: Option<String>,
    saved_as: Option<StoryId>,
    pacing: ProgressEstimator,
    settled_progress: u8,
    epoch: u64,
    last_touched: DateTime<Utc>,
}

impl WizardContext {
    /// `pacing` is the template every operation's estimator is cut from
    pub fn new(id: WizardId, pacing: ProgressEstimator) -> Self {
        Self {
            id,
            stage: WizardStage::Input,
            story: Story::default(),
            selection: None,
            cinematic_mode: false,
            in_flight: HashMap::new(),
            status_message: None,
            quota_warning: None,
            saved_as: None,
            pacing,
            settled_progress: 0,
            epoch: 0,
            last_touched: Utc::now(),
        }
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn selection(&self) -> Option<&StepSelection> {
        self.selection.as_ref()
    }

    pub fn cinematic_mode(&self) -> bool {
        self.cinematic_mode
    }

    pub fn quota_warning(&self) -> Option<&str> {
        self.quota_warning.as_deref()
    }

    pub fn is_in_flight(&self, operation: WizardOperation) -> bool {
        self.in_flight.contains_key(&operation)
    }

    /// The estimator driven by the operation `ticket` started
    pub fn progress_for(&self, ticket: OperationTicket) -> ProgressEstimator {
        match self.in_flight.get(&ticket.operation) {
            Some(estimator) if ticket.epoch == self.epoch => estimator.clone(),
            _ => self.pacing.fresh(),
        }
    }

    /// Lowest progress among running operations, or the last settled value
    pub fn progress(&self) -> u8 {
        self.in_flight
            .values()
            .map(ProgressEstimator::value)
            .min()
            .unwrap_or(self.settled_progress)
    }

    pub fn touch(&mut self) {
        self.last_touched = Utc::now();
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        self.last_touched
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let mut in_flight: Vec<WizardOperation> = self.in_flight.keys().copied().collect();
        in_flight.sort_by_key(|op| op.as_str());

        WizardSnapshot {
            id: self.id,
            stage: self.stage,
            story: self.story.clone(),
            selection: self.selection.clone(),
            cinematic_mode: self.cinematic_mode,
            in_flight,
            status_message: self.status_message.clone(),
            quota_warning: self.quota_warning.clone(),
            saved_as: self.saved_as,
            progress: self.progress(),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Set the idea text; locked once an outline is requested
    pub fn set_idea(&mut self, idea: impl Into<String>) -> Result<(), WizardError> {
        if self.story.has_outline()
            || self.stage != WizardStage::Input
            || self.is_in_flight(WizardOperation::GenerateOutline)
        {
            return Err(WizardError::IdeaLocked);
        }
        self.story.idea = idea.into();
        Ok(())
    }

    // =========================================================================
    // Outline
    // =========================================================================

    pub fn begin_outline(&mut self) -> Result<(OperationTicket, String), WizardError> {
        self.ensure_not_complete("generate an outline")?;
        if self.story.idea.trim().is_empty() {
            return Err(WizardError::EmptyIdea);
        }
        let ticket = self.begin(
            WizardOperation::GenerateOutline,
            "Creating your story outline...".to_string(),
        )?;
        Ok((ticket, self.story.idea.clone()))
    }

    pub fn complete_outline(&mut self, ticket: OperationTicket, outcome: Generated<Outline>) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        if let Some(reason) = outcome.fallback_reason() {
            tracing::warn!("Wizard {} using placeholder outline: {}", self.id, reason);
        }
        self.story.apply_outline(outcome.into_inner());
        self.selection = None;
        self.move_to(WizardStage::Outline);
        true
    }

    pub fn begin_regenerate_step(
        &mut self,
        index: usize,
    ) -> Result<(OperationTicket, String, Vec<SceneStep>), WizardError> {
        self.ensure_step(index)?;
        let ticket = self.begin(
            WizardOperation::RegenerateStep,
            format!("Regenerating Step {}...", index + 1),
        )?;
        Ok((ticket, self.story.idea.clone(), self.story.steps.clone()))
    }

    /// Replace only step `index`; an open editor on that step picks up the
    /// new text
    pub fn complete_regenerate_step(
        &mut self,
        ticket: OperationTicket,
        index: usize,
        outcome: Generated<SceneStep>,
    ) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        let step = outcome.into_inner();
        let description = step.description.clone();
        if !self.story.replace_step(index, step) {
            return false;
        }
        if let Some(selection) = self.selection.as_mut().filter(|s| s.index == index) {
            selection.buffer = description;
        }
        true
    }

    /// Open step `index` for editing, discarding any unsaved edit
    pub fn select_step(&mut self, index: usize) -> Result<&StepSelection, WizardError> {
        self.ensure_step(index)?;
        let buffer = self.story.steps[index].description.clone();
        Ok(&*self.selection.insert(StepSelection { index, buffer }))
    }

    /// Change the editing buffer of the selected step
    pub fn edit_step(&mut self, index: usize, text: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_step(index)?;
        match self.selection.as_mut() {
            Some(selection) if selection.index == index => {
                selection.buffer = text.into();
                Ok(())
            }
            _ => Err(WizardError::NotSelected(index)),
        }
    }

    /// Write the editing buffer into the selected step
    pub fn commit_edit(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_step(index)?;
        match &self.selection {
            Some(selection) if selection.index == index => {
                self.story.steps[index].description = selection.buffer.clone();
                Ok(())
            }
            _ => Err(WizardError::NotSelected(index)),
        }
    }

    // =========================================================================
    // Storyboard
    // =========================================================================

    pub fn begin_storyboard(
        &mut self,
    ) -> Result<(OperationTicket, Vec<SceneStep>, ContentClassification), WizardError> {
        self.ensure_not_complete("generate a storyboard")?;
        if !self.story.has_outline() {
            return Err(WizardError::NoOutline);
        }
        let style = if self.story.classification.is_advertisement() {
            "modern advertisement"
        } else {
            "comic-style"
        };
        let ticket = self.begin(
            WizardOperation::GenerateStoryboard,
            format!("Generating {} storyboard...", style),
        )?;
        self.quota_warning = None;
        Ok((ticket, self.story.steps.clone(), self.story.classification))
    }

    pub fn complete_storyboard(
        &mut self,
        ticket: OperationTicket,
        outcome: Generated<StoryboardArtifact>,
    ) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        let artifact = outcome.into_inner();
        if artifact.quota_exceeded {
            self.quota_warning = Some(QUOTA_WARNING.to_string());
        }
        self.story.storyboard = Some(artifact);
        self.move_to(WizardStage::Storyboard);
        true
    }

    pub fn begin_regenerate_storyboard(
        &mut self,
    ) -> Result<(OperationTicket, Vec<SceneStep>, ContentClassification), WizardError> {
        if self.story.storyboard.is_none() {
            return Err(WizardError::NoStoryboard);
        }
        let style = if self.story.classification.is_advertisement() {
            "advertisement"
        } else {
            "comic"
        };
        let ticket = self.begin(
            WizardOperation::RegenerateStoryboard,
            format!("Regenerating {} storyboard...", style),
        )?;
        Ok((ticket, self.story.steps.clone(), self.story.classification))
    }

    /// Replace the storyboard in place without changing stage
    pub fn complete_regenerate_storyboard(
        &mut self,
        ticket: OperationTicket,
        outcome: Generated<StoryboardArtifact>,
    ) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        let artifact = outcome.into_inner();
        if artifact.quota_exceeded {
            self.quota_warning = Some(QUOTA_WARNING_ON_REGENERATE.to_string());
        } else if !artifact.is_placeholder() {
            self.quota_warning = None;
        }
        self.story.storyboard = Some(artifact);
        true
    }

    // =========================================================================
    // Composer
    // =========================================================================

    pub fn begin_narration(&mut self) -> Result<(OperationTicket, String), WizardError> {
        if !self.story.has_outline() {
            return Err(WizardError::NoOutline);
        }
        let ticket = self.begin(
            WizardOperation::GenerateNarration,
            "Generating narration...".to_string(),
        )?;
        Ok((ticket, self.story.narration_script()))
    }

    pub fn complete_narration(
        &mut self,
        ticket: OperationTicket,
        outcome: Generated<NarrationArtifact>,
    ) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        self.story.narration = Some(outcome.into_inner());
        true
    }

    /// Flip cinematic mode; only meaningful in the composer
    pub fn toggle_cinematic_mode(&mut self) -> Result<bool, WizardError> {
        if self.stage != WizardStage::Composer {
            return Err(WizardError::InvalidTransition {
                action: "toggle cinematic mode",
                stage: self.stage,
            });
        }
        self.cinematic_mode = !self.cinematic_mode;
        Ok(self.cinematic_mode)
    }

    pub fn begin_composition(&mut self) -> Result<(OperationTicket, CompositionInputs), WizardError> {
        let storyboard = self.story.storyboard.as_ref().ok_or(WizardError::NoStoryboard)?;
        let narration = self.story.narration.as_ref().ok_or(WizardError::NoNarration)?;

        let inputs = CompositionInputs {
            storyboard_image: storyboard.image.clone(),
            audio_url: narration.audio_url().map(str::to_string),
            scene_count: self.story.steps.len(),
            mode: CompositionMode::from_cinematic_flag(self.cinematic_mode),
        };
        let ticket = self.begin(WizardOperation::ComposeVideo, "Composing video...".to_string())?;
        Ok((ticket, inputs))
    }

    pub fn complete_composition(
        &mut self,
        ticket: OperationTicket,
        outcome: Generated<VideoArtifact>,
    ) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        self.story.attach_video(outcome.into_inner())
    }

    // =========================================================================
    // Save / navigation
    // =========================================================================

    /// A video can always be saved; from the storyboard stage a storyboard
    /// is enough
    pub fn begin_save(&mut self) -> Result<(OperationTicket, Story), WizardError> {
        let storyboard_entry =
            self.stage == WizardStage::Storyboard && self.story.storyboard.is_some();
        if self.story.video.is_none() && !storyboard_entry {
            return Err(WizardError::InvalidTransition {
                action: "save",
                stage: self.stage,
            });
        }
        let ticket = self.begin(WizardOperation::Save, "Saving story...".to_string())?;
        Ok((ticket, self.story.clone()))
    }

    pub fn complete_save(&mut self, ticket: OperationTicket, story_id: StoryId) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        self.saved_as = Some(story_id);
        self.move_to(WizardStage::Complete);
        true
    }

    /// Release an operation whose provider call was rejected
    pub fn abort(&mut self, ticket: OperationTicket) {
        self.finish(ticket);
    }

    /// Step back one stage, keeping every artifact
    pub fn back(&mut self) -> Result<WizardStage, WizardError> {
        let previous = self.stage.previous().ok_or(WizardError::InvalidTransition {
            action: "go back",
            stage: self.stage,
        })?;
        self.move_to(previous);
        Ok(previous)
    }

    /// Step forward one stage when that stage's artifact already exists
    pub fn advance(&mut self) -> Result<WizardStage, WizardError> {
        let next = self.stage.next().ok_or(WizardError::InvalidTransition {
            action: "advance",
            stage: self.stage,
        })?;
        match next {
            WizardStage::Outline if !self.story.has_outline() => return Err(WizardError::NoOutline),
            WizardStage::Storyboard | WizardStage::Composer if self.story.storyboard.is_none() => {
                return Err(WizardError::NoStoryboard)
            }
            _ => {}
        }
        self.move_to(next);
        Ok(next)
    }

    /// Clear everything and return to the idea input
    pub fn reset(&mut self) {
        self.story = Story::default();
        self.selection = None;
        self.cinematic_mode = false;
        self.in_flight.clear();
        self.status_message = None;
        self.quota_warning = None;
        self.saved_as = None;
        self.settled_progress = 0;
        self.epoch += 1;
        self.move_to(WizardStage::Input);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin(
        &mut self,
        operation: WizardOperation,
        status: String,
    ) -> Result<OperationTicket, WizardError> {
        if self.in_flight.contains_key(&operation) {
            return Err(WizardError::OperationInProgress(operation));
        }
        self.in_flight.insert(operation, self.pacing.fresh());
        tracing::debug!("Wizard {} started {}", self.id, operation);
        self.status_message = Some(status);
        Ok(OperationTicket {
            operation,
            epoch: self.epoch,
        })
    }

    /// Returns false when the ticket predates a reset
    fn finish(&mut self, ticket: OperationTicket) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                "Wizard {} dropping stale {} result",
                self.id,
                ticket.operation
            );
            return false;
        }
        self.in_flight.remove(&ticket.operation);
        if self.in_flight.is_empty() {
            self.status_message = None;
            self.settled_progress = COMPLETE;
        }
        true
    }

    fn move_to(&mut self, stage: WizardStage) {
        if self.stage != stage {
            tracing::info!("Wizard {} moved {} -> {}", self.id, self.stage, stage);
            self.stage = stage;
        }
    }

    fn ensure_step(&self, index: usize) -> Result<(), WizardError> {
        if index >= self.story.steps.len() {
            return Err(WizardError::StepOutOfRange {
                index,
                len: self.story.steps.len(),
            });
        }
        Ok(())
    }

    fn ensure_not_complete(&self, action: &'static str) -> Result<(), WizardError> {
        if self.stage == WizardStage::Complete {
            return Err(WizardError::InvalidTransition {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::generation::FallbackReason;
    use std::time::Duration;

    fn context() -> WizardContext {
        WizardContext::new(
            WizardId::new(),
            ProgressEstimator::new(Duration::from_millis(200), 5, 95),
        )
    }

    fn outline(count: u32) -> Outline {
        Outline::new(
            ContentClassification::Narrative,
            (1..=count)
                .map(|n| SceneStep::new(n, format!("Title {}", n), format!("Description {}", n)))
                .collect(),
        )
    }

    fn with_outline() -> WizardContext {
        let mut ctx = context();
        ctx.set_idea("A robot who learns to paint in space").unwrap();
        let (ticket, _) = ctx.begin_outline().unwrap();
        assert!(ctx.complete_outline(ticket, Generated::Success(outline(5))));
        ctx
    }

    fn with_storyboard() -> WizardContext {
        let mut ctx = with_outline();
        let (ticket, _, _) = ctx.begin_storyboard().unwrap();
        ctx.complete_storyboard(
            ticket,
            Generated::Success(StoryboardArtifact::generated("data:image/png;base64,AA", "ok")),
        );
        ctx
    }

    #[test]
    fn test_outline_requires_idea() {
        let mut ctx = context();
        assert_eq!(ctx.begin_outline().unwrap_err(), WizardError::EmptyIdea);
        ctx.set_idea("   ").unwrap();
        assert_eq!(ctx.begin_outline().unwrap_err(), WizardError::EmptyIdea);
    }

    #[test]
    fn test_outline_advances_and_locks_idea() {
        let ctx = &mut with_outline();
        assert_eq!(ctx.stage(), WizardStage::Outline);
        assert_eq!(ctx.story().steps.len(), 5);
        assert_eq!(ctx.set_idea("Another idea"), Err(WizardError::IdeaLocked));
        assert!(!ctx.is_in_flight(WizardOperation::GenerateOutline));
    }

    #[test]
    fn test_idea_locked_while_outline_pending() {
        let mut ctx = context();
        ctx.set_idea("A lighthouse keeper").unwrap();
        let (ticket, idea) = ctx.begin_outline().unwrap();

        assert_eq!(ctx.set_idea("Something else"), Err(WizardError::IdeaLocked));

        ctx.abort(ticket);
        assert_eq!(idea, "A lighthouse keeper");
        ctx.set_idea("Something else").unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_the_slowest_running_operation() {
        let mut ctx = with_outline();
        assert_eq!(ctx.progress(), COMPLETE);

        let (storyboard, _, _) = ctx.begin_storyboard().unwrap();
        let (narration, _) = ctx.begin_narration().unwrap();
        assert_eq!(ctx.progress(), 0);

        ctx.progress_for(narration)
            .track(tokio::time::sleep(Duration::from_millis(100)))
            .await;
        ctx.complete_narration(
            narration,
            Generated::Success(NarrationArtifact::LocalSynthesis { duration_secs: 30 }),
        );

        assert!(ctx.is_in_flight(WizardOperation::GenerateStoryboard));
        assert!(ctx.progress() < COMPLETE);

        ctx.abort(storyboard);
        assert_eq!(ctx.progress(), COMPLETE);
    }

    #[test]
    fn test_reset_returns_progress_to_zero() {
        let mut ctx = with_outline();
        ctx.reset();
        assert_eq!(ctx.progress(), 0);
        assert!(!ctx.is_busy());
    }

    #[test]
    fn test_same_operation_cannot_run_twice() {
        let mut ctx = with_outline();
        let (_ticket, _, _) = ctx.begin_regenerate_step(0).unwrap();
        assert_eq!(
            ctx.begin_regenerate_step(1).unwrap_err(),
            WizardError::OperationInProgress(WizardOperation::RegenerateStep)
        );
        // other operations are not blocked
        assert!(ctx.begin_storyboard().is_ok());
    }

    #[test]
    fn test_regenerate_step_replaces_only_that_step() {
        let mut ctx = with_outline();
        let before = ctx.story().steps.clone();

        let (ticket, idea, steps) = ctx.begin_regenerate_step(2).unwrap();
        assert_eq!(idea, "A robot who learns to paint in space");
        assert_eq!(steps, before);
        ctx.complete_regenerate_step(
            ticket,
            2,
            Generated::fallback(
                FallbackReason::Transport("down".to_string()),
                SceneStep::new(3, "Title 3", "Fresh text"),
            ),
        );

        let after = &ctx.story().steps;
        assert_eq!(after.len(), before.len());
        for (i, (a, b)) in after.iter().zip(before.iter()).enumerate() {
            if i == 2 {
                assert_eq!(a.description, "Fresh text");
                assert_eq!(a.number, 3);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_regenerate_step_refreshes_open_editor() {
        let mut ctx = with_outline();
        ctx.select_step(1).unwrap();
        let (ticket, _, _) = ctx.begin_regenerate_step(1).unwrap();
        ctx.complete_regenerate_step(ticket, 1, Generated::Success(SceneStep::new(2, "T", "Brand new")));
        assert_eq!(ctx.selection().unwrap().buffer, "Brand new");
    }

    #[test]
    fn test_regenerate_step_out_of_range() {
        let mut ctx = with_outline();
        assert_eq!(
            ctx.begin_regenerate_step(5).unwrap_err(),
            WizardError::StepOutOfRange { index: 5, len: 5 }
        );
    }

    #[test]
    fn test_edit_then_commit_changes_only_that_step() {
        let mut ctx = with_outline();
        let before = ctx.story().steps.clone();

        ctx.select_step(3).unwrap();
        ctx.edit_step(3, "Edited description").unwrap();
        ctx.commit_edit(3).unwrap();

        let after = &ctx.story().steps;
        assert_eq!(after[3].description, "Edited description");
        for i in [0, 1, 2, 4] {
            assert_eq!(after[i], before[i]);
        }
    }

    #[test]
    fn test_selecting_another_step_discards_unsaved_edit() {
        let mut ctx = with_outline();
        ctx.select_step(0).unwrap();
        ctx.edit_step(0, "Never saved").unwrap();

        let selection = ctx.select_step(1).unwrap();
        assert_eq!(selection.buffer, "Description 2");
        assert_eq!(ctx.story().steps[0].description, "Description 1");

        ctx.select_step(0).unwrap();
        assert_eq!(ctx.selection().unwrap().buffer, "Description 1");
    }

    #[test]
    fn test_edit_requires_selection() {
        let mut ctx = with_outline();
        assert_eq!(ctx.edit_step(2, "x"), Err(WizardError::NotSelected(2)));
        ctx.select_step(1).unwrap();
        assert_eq!(ctx.edit_step(2, "x"), Err(WizardError::NotSelected(2)));
        assert_eq!(ctx.commit_edit(2), Err(WizardError::NotSelected(2)));
    }

    #[test]
    fn test_storyboard_requires_outline() {
        let mut ctx = context();
        assert_eq!(ctx.begin_storyboard().unwrap_err(), WizardError::NoOutline);
    }

    #[test]
    fn test_quota_warning_lifecycle() {
        let mut ctx = with_outline();
        let (ticket, _, _) = ctx.begin_storyboard().unwrap();
        ctx.complete_storyboard(
            ticket,
            Generated::fallback(
                FallbackReason::QuotaExceeded,
                StoryboardArtifact::placeholder("/placeholder.svg", true, "quota"),
            ),
        );
        assert_eq!(ctx.stage(), WizardStage::Storyboard);
        assert_eq!(ctx.quota_warning(), Some(QUOTA_WARNING));

        let (ticket, _, _) = ctx.begin_regenerate_storyboard().unwrap();
        ctx.complete_regenerate_storyboard(
            ticket,
            Generated::fallback(
                FallbackReason::QuotaExceeded,
                StoryboardArtifact::placeholder("/placeholder.svg", true, "quota"),
            ),
        );
        assert_eq!(ctx.quota_warning(), Some(QUOTA_WARNING_ON_REGENERATE));

        let (ticket, _, _) = ctx.begin_regenerate_storyboard().unwrap();
        ctx.complete_regenerate_storyboard(
            ticket,
            Generated::Success(StoryboardArtifact::generated("data:image/png;base64,BB", "ok")),
        );
        assert_eq!(ctx.quota_warning(), None);
        assert_eq!(ctx.story().storyboard.as_ref().unwrap().image, "data:image/png;base64,BB");
        assert_eq!(ctx.stage(), WizardStage::Storyboard);
    }

    #[test]
    fn test_regenerate_storyboard_requires_storyboard() {
        let mut ctx = with_outline();
        assert_eq!(
            ctx.begin_regenerate_storyboard().unwrap_err(),
            WizardError::NoStoryboard
        );
    }

    #[test]
    fn test_composition_requires_storyboard_and_narration() {
        let mut ctx = with_outline();
        assert_eq!(ctx.begin_composition().unwrap_err(), WizardError::NoStoryboard);

        let mut ctx = with_storyboard();
        assert_eq!(ctx.begin_composition().unwrap_err(), WizardError::NoNarration);

        let (ticket, script) = ctx.begin_narration().unwrap();
        assert!(script.starts_with("Title 1. Description 1"));
        ctx.complete_narration(
            ticket,
            Generated::fallback(
                FallbackReason::NotConfigured,
                NarrationArtifact::LocalSynthesis { duration_secs: 30 },
            ),
        );

        let (_, inputs) = ctx.begin_composition().unwrap();
        assert_eq!(inputs.scene_count, 5);
        assert_eq!(inputs.audio_url, None);
        assert_eq!(inputs.mode, CompositionMode::Slideshow);
    }

    #[test]
    fn test_cinematic_toggle_only_in_composer() {
        let mut ctx = with_storyboard();
        assert!(matches!(
            ctx.toggle_cinematic_mode(),
            Err(WizardError::InvalidTransition { .. })
        ));
        assert_eq!(ctx.advance(), Ok(WizardStage::Composer));
        assert_eq!(ctx.toggle_cinematic_mode(), Ok(true));
        assert_eq!(ctx.toggle_cinematic_mode(), Ok(false));
    }

    #[test]
    fn test_back_and_forward_keep_artifacts() {
        let mut ctx = with_storyboard();
        assert_eq!(ctx.advance(), Ok(WizardStage::Composer));
        assert_eq!(ctx.back(), Ok(WizardStage::Storyboard));
        assert_eq!(ctx.back(), Ok(WizardStage::Outline));
        assert_eq!(ctx.back(), Ok(WizardStage::Input));
        assert!(matches!(ctx.back(), Err(WizardError::InvalidTransition { .. })));

        assert!(ctx.story().storyboard.is_some());
        assert_eq!(ctx.story().steps.len(), 5);

        assert_eq!(ctx.advance(), Ok(WizardStage::Outline));
        assert_eq!(ctx.advance(), Ok(WizardStage::Storyboard));
        assert_eq!(ctx.advance(), Ok(WizardStage::Composer));
        assert!(matches!(ctx.advance(), Err(WizardError::InvalidTransition { .. })));
    }

    #[test]
    fn test_advance_guards() {
        let mut ctx = context();
        assert_eq!(ctx.advance(), Err(WizardError::NoOutline));

        let mut ctx = with_outline();
        assert_eq!(ctx.advance(), Err(WizardError::NoStoryboard));
    }

    #[test]
    fn test_save_requires_video_or_storyboard_stage() {
        let mut ctx = with_outline();
        assert!(matches!(ctx.begin_save(), Err(WizardError::InvalidTransition { .. })));

        let mut ctx = with_storyboard();
        let (ticket, story) = ctx.begin_save().unwrap();
        assert!(story.storyboard.is_some());
        let id = StoryId::new();
        ctx.complete_save(ticket, id);
        assert_eq!(ctx.stage(), WizardStage::Complete);
        assert_eq!(ctx.snapshot().saved_as, Some(id));
    }

    #[test]
    fn test_abort_releases_operation() {
        let mut ctx = with_storyboard();
        let (ticket, _) = ctx.begin_save().unwrap();
        assert!(ctx.is_in_flight(WizardOperation::Save));
        ctx.abort(ticket);
        assert!(!ctx.is_in_flight(WizardOperation::Save));
        assert_eq!(ctx.stage(), WizardStage::Storyboard);
    }

    #[test]
    fn test_reset_clears_everything_and_drops_stale_results() {
        let mut ctx = with_storyboard();
        let (ticket, _, _) = ctx.begin_regenerate_storyboard().unwrap();

        ctx.reset();

        assert_eq!(ctx.stage(), WizardStage::Input);
        assert_eq!(ctx.story(), &Story::default());
        assert!(ctx.selection().is_none());
        assert!(!ctx.is_in_flight(WizardOperation::RegenerateStoryboard));

        let applied = ctx.complete_regenerate_storyboard(
            ticket,
            Generated::Success(StoryboardArtifact::generated("late", "ok")),
        );
        assert!(!applied);
        assert!(ctx.story().storyboard.is_none());

        ctx.set_idea("Fresh start").unwrap();
    }

    #[test]
    fn test_status_message_follows_in_flight_operations() {
        let mut ctx = with_outline();
        let (ticket, _, _) = ctx.begin_regenerate_step(2).unwrap();
        assert_eq!(
            ctx.snapshot().status_message.as_deref(),
            Some("Regenerating Step 3...")
        );
        ctx.complete_regenerate_step(ticket, 2, Generated::Success(SceneStep::new(3, "t", "d")));
        assert_eq!(ctx.snapshot().status_message, None);
    }
}
