//! Wizard Service - runs wizard sessions against the story gateway
//!
//! Each session lives behind its own lock. Provider calls run with the lock
//! released so the session can still be read, reset or used for another
//! operation while a call is pending. A started operation is released even
//! when the request driving it is dropped halfway.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::application::ports::outbound::StoryRepositoryPort;
use crate::application::services::generation::{FallbackReason, GatewayError, Generated};
use crate::application::services::outline_service::placeholder_step;
use crate::application::services::progress::ProgressEstimator;
use crate::application::services::storyboard_service::{placeholder_image, FAILURE_MESSAGE};
use crate::application::services::wizard::context::{
    OperationTicket, StepSelection, WizardContext, WizardError, WizardSnapshot,
};
use crate::application::services::StoryGateway;
use crate::domain::entities::{NarrationArtifact, SceneStep, StoryboardArtifact};
use crate::domain::value_objects::{AppSettings, ContentClassification, WizardId, WizardStage};

type Session = Arc<Mutex<WizardContext>>;

pub struct WizardService {
    gateway: StoryGateway,
    repository: Arc<dyn StoryRepositoryPort>,
    settings: AppSettings,
    sessions: RwLock<HashMap<WizardId, Session>>,
}

impl WizardService {
    pub fn new(
        gateway: StoryGateway,
        repository: Arc<dyn StoryRepositoryPort>,
        settings: AppSettings,
    ) -> Self {
        Self {
            gateway,
            repository,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh wizard at the input stage
    pub async fn create(&self) -> WizardSnapshot {
        let id = WizardId::new();
        let context = WizardContext::new(id, ProgressEstimator::from_settings(&self.settings));
        let snapshot = context.snapshot();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(context)));
        tracing::info!("Created wizard {}", id);
        snapshot
    }

    pub async fn snapshot(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let context = lock(&session).await;
        Ok(context.snapshot())
    }

    pub async fn remove(&self, id: WizardId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop wizards untouched since `cutoff` that have nothing in flight
    pub async fn evict_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(context) => context.is_busy() || context.last_touched() >= cutoff,
            // held by a running request
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle wizards ({} remaining)", evicted, sessions.len());
        }
        evicted
    }

    pub async fn set_idea(&self, id: WizardId, idea: String) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.set_idea(idea)).await
    }

    // =========================================================================
    // Outline
    // =========================================================================

    pub async fn generate_outline(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, idea, progress) = {
            let mut context = lock(&session).await;
            let (ticket, idea) = context.begin_outline()?;
            (PendingOperation::new(&session, ticket), idea, context.progress_for(ticket))
        };

        let outline = &self.gateway.outline;
        let outcome = self
            .run(&progress, async {
                match outline.generate_outline(&idea).await {
                    Ok(outcome) => outcome,
                    Err(e) => Generated::fallback(reason_for(&e), outline.placeholder_outline(&idea)),
                }
            })
            .await;

        let mut context = lock(&session).await;
        context.complete_outline(pending.settle(), outcome);
        Ok(context.snapshot())
    }

    pub async fn regenerate_step(
        &self,
        id: WizardId,
        index: usize,
    ) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, idea, steps, progress) = {
            let mut context = lock(&session).await;
            let (ticket, idea, steps) = context.begin_regenerate_step(index)?;
            (PendingOperation::new(&session, ticket), idea, steps, context.progress_for(ticket))
        };

        let outline = &self.gateway.outline;
        let outcome = self
            .run(&progress, async {
                match outline.regenerate_step(&idea, index, &steps).await {
                    Ok(outcome) => outcome,
                    Err(e) => Generated::fallback(reason_for(&e), placeholder_step(&steps[index], index)),
                }
            })
            .await;

        let mut context = lock(&session).await;
        context.complete_regenerate_step(pending.settle(), index, outcome);
        Ok(context.snapshot())
    }

    pub async fn select_step(
        &self,
        id: WizardId,
        index: usize,
    ) -> Result<StepSelection, WizardError> {
        let session = self.session(id).await?;
        let mut context = lock(&session).await;
        context.select_step(index).cloned()
    }

    pub async fn edit_step(
        &self,
        id: WizardId,
        index: usize,
        text: String,
    ) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.edit_step(index, text)).await
    }

    pub async fn commit_edit(&self, id: WizardId, index: usize) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.commit_edit(index)).await
    }

    // =========================================================================
    // Storyboard
    // =========================================================================

    pub async fn generate_storyboard(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, steps, classification, progress) = {
            let mut context = lock(&session).await;
            let (ticket, steps, classification) = context.begin_storyboard()?;
            (PendingOperation::new(&session, ticket), steps, classification, context.progress_for(ticket))
        };

        let outcome = self
            .run(&progress, self.storyboard_outcome(&steps, classification))
            .await;

        let mut context = lock(&session).await;
        context.complete_storyboard(pending.settle(), outcome);
        Ok(context.snapshot())
    }

    pub async fn regenerate_storyboard(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, steps, classification, progress) = {
            let mut context = lock(&session).await;
            let (ticket, steps, classification) = context.begin_regenerate_storyboard()?;
            (PendingOperation::new(&session, ticket), steps, classification, context.progress_for(ticket))
        };

        let outcome = self
            .run(&progress, self.storyboard_outcome(&steps, classification))
            .await;

        let mut context = lock(&session).await;
        context.complete_regenerate_storyboard(pending.settle(), outcome);
        Ok(context.snapshot())
    }

    async fn storyboard_outcome(
        &self,
        steps: &[SceneStep],
        classification: ContentClassification,
    ) -> Generated<StoryboardArtifact> {
        match self.gateway.storyboard.generate(steps, classification).await {
            Ok(outcome) => outcome,
            Err(e) => Generated::fallback(
                reason_for(&e),
                StoryboardArtifact::placeholder(
                    placeholder_image(classification, steps.len()),
                    false,
                    FAILURE_MESSAGE,
                ),
            ),
        }
    }

    // =========================================================================
    // Composer
    // =========================================================================

    pub async fn generate_narration(
        &self,
        id: WizardId,
        voice_id: Option<String>,
    ) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, script, progress) = {
            let mut context = lock(&session).await;
            let (ticket, script) = context.begin_narration()?;
            (PendingOperation::new(&session, ticket), script, context.progress_for(ticket))
        };

        let narration = &self.gateway.narration;
        let local = NarrationArtifact::LocalSynthesis {
            duration_secs: self.settings.narration_duration_secs,
        };
        let outcome = self
            .run(&progress, async {
                match narration.narrate(&script, voice_id.as_deref()).await {
                    Ok(outcome) => outcome,
                    Err(e) => Generated::fallback(reason_for(&e), local),
                }
            })
            .await;

        let mut context = lock(&session).await;
        context.complete_narration(pending.settle(), outcome);
        Ok(context.snapshot())
    }

    pub async fn toggle_cinematic_mode(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.toggle_cinematic_mode().map(|_| ()))
            .await
    }

    pub async fn compose_video(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, inputs, progress) = {
            let mut context = lock(&session).await;
            let (ticket, inputs) = context.begin_composition()?;
            (PendingOperation::new(&session, ticket), inputs, context.progress_for(ticket))
        };

        let composition = &self.gateway.composition;
        let result = progress
            .track(composition.compose(
                &inputs.storyboard_image,
                inputs.audio_url.as_deref(),
                inputs.scene_count,
                inputs.mode,
            ))
            .await;

        let mut context = lock(&session).await;
        match result {
            Ok(outcome) => {
                context.complete_composition(pending.settle(), outcome);
                Ok(context.snapshot())
            }
            Err(e) => {
                context.abort(pending.settle());
                Err(WizardError::Rejected(e.to_string()))
            }
        }
    }

    // =========================================================================
    // Save / navigation
    // =========================================================================

    pub async fn save(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        let session = self.session(id).await?;
        let (pending, story) = {
            let mut context = lock(&session).await;
            let (ticket, story) = context.begin_save()?;
            (PendingOperation::new(&session, ticket), story)
        };

        let result = self.repository.save(&story).await;

        let mut context = lock(&session).await;
        match result {
            Ok(story_id) => {
                tracing::info!("Wizard {} saved story {}", id, story_id);
                context.complete_save(pending.settle(), story_id);
                Ok(context.snapshot())
            }
            Err(e) => {
                tracing::error!("Wizard {} failed to save: {}", id, e);
                context.abort(pending.settle());
                Err(WizardError::SaveFailed(e.to_string()))
            }
        }
    }

    pub async fn back(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.back().map(|_: WizardStage| ()))
            .await
    }

    pub async fn advance(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| context.advance().map(|_: WizardStage| ()))
            .await
    }

    pub async fn reset(&self, id: WizardId) -> Result<WizardSnapshot, WizardError> {
        self.with_context(id, |context| {
            context.reset();
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn session(&self, id: WizardId) -> Result<Session, WizardError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(WizardError::NotFound(id))
    }

    async fn with_context<F>(&self, id: WizardId, apply: F) -> Result<WizardSnapshot, WizardError>
    where
        F: FnOnce(&mut WizardContext) -> Result<(), WizardError>,
    {
        let session = self.session(id).await?;
        let mut context = lock(&session).await;
        apply(&mut context)?;
        Ok(context.snapshot())
    }

    /// Track the call's progress and hold placeholder results for the
    /// configured pacing delay
    async fn run<T, F>(&self, progress: &ProgressEstimator, operation: F) -> Generated<T>
    where
        F: Future<Output = Generated<T>>,
    {
        let delay = self.settings.fallback_delay();
        progress
            .track(async {
                let outcome = operation.await;
                if outcome.is_fallback() && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            })
            .await
    }
}

/// Lock a session and mark it as used
async fn lock(session: &Session) -> MutexGuard<'_, WizardContext> {
    let mut context = session.lock().await;
    context.touch();
    context
}

/// An operation between `begin_*` and `complete_*`
///
/// Dropping it unsettled, as happens when the client disconnects, releases
/// the operation so it can be started again.
struct PendingOperation {
    session: Session,
    ticket: OperationTicket,
    settled: bool,
}

impl PendingOperation {
    fn new(session: &Session, ticket: OperationTicket) -> Self {
        Self {
            session: session.clone(),
            ticket,
            settled: false,
        }
    }

    fn settle(mut self) -> OperationTicket {
        self.settled = true;
        self.ticket
    }
}

impl Drop for PendingOperation {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let ticket = self.ticket;
        tracing::debug!("Releasing abandoned {} operation", ticket.operation());
        match self.session.try_lock() {
            Ok(mut context) => context.abort(ticket),
            Err(_) => {
                let session = self.session.clone();
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        session.lock().await.abort(ticket);
                    });
                }
            }
        }
    }
}

fn reason_for(error: &GatewayError) -> FallbackReason {
    match error {
        GatewayError::NotConfigured(_) => FallbackReason::NotConfigured,
        GatewayError::InvalidRequest(message) => FallbackReason::Provider(message.clone()),
    }
}
