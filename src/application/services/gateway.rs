//! Story gateway - the four capability services bundled together
//!
//! Shared by the stateless generation endpoints and the wizard.

use std::sync::Arc;

use crate::application::services::{
    CompositionService, NarrationService, OutlineService, StoryboardService,
};

#[derive(Clone)]
pub struct StoryGateway {
    pub outline: Arc<OutlineService>,
    pub storyboard: Arc<StoryboardService>,
    pub narration: Arc<NarrationService>,
    pub composition: Arc<CompositionService>,
}

impl StoryGateway {
    pub fn new(
        outline: OutlineService,
        storyboard: StoryboardService,
        narration: NarrationService,
        composition: CompositionService,
    ) -> Self {
        Self {
            outline: Arc::new(outline),
            storyboard: Arc::new(storyboard),
            narration: Arc::new(narration),
            composition: Arc::new(composition),
        }
    }
}
