pub mod pending;
pub mod wizard_controller;

pub use pending::{Fold, GenerationOutcome, PendingGeneration, PendingUpload, RequestCtx, UploadOutcome};
pub use wizard_controller::{Collaborators, StageTransition, UploadStatus, WizardController};
