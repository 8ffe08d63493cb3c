//! Application services for chat turns and conversation listings.

mod orchestrator;

pub use orchestrator::{ChatOrchestrator, SharedOrchestrator};
