pub mod generation_dispatcher;
pub mod stage_gate;
pub mod upload_coordinator;

pub use generation_dispatcher::{GenerationDispatcher, GenerationPolicy};
pub use upload_coordinator::UploadCoordinator;
