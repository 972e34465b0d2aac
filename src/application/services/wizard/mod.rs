//! Idea-to-video wizard: the session state machine and the service that
//! drives it

mod context;
mod service;

pub use context::{StepSelection, WizardError, WizardOperation, WizardSnapshot};
pub use service::WizardService;
