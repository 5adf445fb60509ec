// AI-backed features: resume match, career roadmap, interview guide.
// All collaborator calls go through the orchestrator; no feature calls llm_client directly.

pub mod orchestrator;
pub mod prompts;
pub mod request;

pub use orchestrator::{FailureKind, Orchestrator, RequestFailure, RequestState};
pub use request::{FeatureInput, FeatureKind};
