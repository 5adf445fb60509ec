//! Request Orchestrator: per-feature request lifecycle.
//!
//! Idle → Loading → Succeeded | Failed, one slot per feature. Each submit takes a
//! new generation number; a completion is applied only if its generation is still
//! the latest for that feature, so an older in-flight call can never overwrite a
//! newer submit's outcome.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::features::request::{FeatureInput, FeatureKind, PromptRequest};
use crate::llm_client::{Collaborator, LlmError};
use crate::models::response::AiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Blank required input; the collaborator was never called.
    Validation,
    /// Credential, network, service or empty-response failure.
    Collaborator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(AiResponse),
    Failed(RequestFailure),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

#[derive(Debug, Default)]
struct FeatureSlot {
    state: RequestState,
    generation: u64,
}

/// Drives the three AI-backed features and caches each one's latest state.
pub struct Orchestrator {
    collaborator: Arc<dyn Collaborator>,
    slots: Mutex<HashMap<FeatureKind, FeatureSlot>>,
}

impl Orchestrator {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Current state of a feature. Features never submitted are `Idle`.
    pub fn state(&self, kind: FeatureKind) -> RequestState {
        self.slots
            .lock()
            .get(&kind)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Returns a feature to `Idle` and invalidates any call still in flight.
    pub fn reset(&self, kind: FeatureKind) {
        let mut slots = self.slots.lock();
        let slot = slots.entry(kind).or_default();
        slot.generation += 1;
        slot.state = RequestState::Idle;
    }

    /// Validates, calls the collaborator, and returns the feature's state afterwards.
    ///
    /// If a newer submit for the same feature started while this one was in flight,
    /// this call's result is discarded and the returned state is the newer one's.
    pub async fn submit(&self, input: FeatureInput) -> RequestState {
        let kind = input.kind();

        let request = match PromptRequest::new(input) {
            Ok(request) => request,
            Err(e) => {
                debug!("{kind} submit rejected: {e}");
                let mut slots = self.slots.lock();
                let slot = slots.entry(kind).or_default();
                slot.generation += 1;
                slot.state = RequestState::Failed(RequestFailure {
                    kind: FailureKind::Validation,
                    message: e.user_message(),
                });
                return slot.state.clone();
            }
        };

        let generation = {
            let mut slots = self.slots.lock();
            let slot = slots.entry(kind).or_default();
            slot.generation += 1;
            slot.state = RequestState::Loading;
            slot.generation
        };

        info!(
            "Submitting {kind} request (generation {generation}, grounded: {})",
            kind.uses_search_grounding()
        );
        let outcome = self
            .collaborator
            .generate(&request.to_generation_request())
            .await;

        let mut slots = self.slots.lock();
        let slot = slots.entry(kind).or_default();
        if slot.generation != generation {
            debug!(
                "Discarding stale {kind} completion (generation {generation}, latest {})",
                slot.generation
            );
            return slot.state.clone();
        }

        slot.state = match outcome {
            Ok(response) => {
                info!(
                    "{kind} request succeeded ({} chars, {} citations)",
                    response.text.len(),
                    response.citations.len()
                );
                RequestState::Succeeded(response)
            }
            Err(e) => {
                warn!("{kind} request failed: {e}");
                RequestState::Failed(collaborator_failure(kind, &e))
            }
        };
        slot.state.clone()
    }
}

fn collaborator_failure(kind: FeatureKind, error: &LlmError) -> RequestFailure {
    RequestFailure {
        kind: FailureKind::Collaborator,
        message: error
            .detail()
            .unwrap_or_else(|| kind.failure_fallback().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::Poll;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::llm_client::GenerationRequest;
    use crate::models::response::Citation;

    /// Replies from a fixed queue and records every request it sees.
    #[derive(Default)]
    struct ScriptedCollaborator {
        replies: Mutex<VecDeque<Result<AiResponse, LlmError>>>,
        seen: Mutex<Vec<GenerationRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedCollaborator {
        fn replying(replies: Vec<Result<AiResponse, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }
    }

    #[async_trait]
    impl Collaborator for ScriptedCollaborator {
        async fn generate(&self, request: &GenerationRequest) -> Result<AiResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().push(request.clone());
            self.replies
                .lock()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    /// Holds each call until the test releases it, keyed by a marker in the prompt.
    struct GatedCollaborator {
        gates: Mutex<Vec<(&'static str, oneshot::Receiver<Result<AiResponse, LlmError>>)>>,
    }

    #[async_trait]
    impl Collaborator for GatedCollaborator {
        async fn generate(&self, request: &GenerationRequest) -> Result<AiResponse, LlmError> {
            let gate = {
                let mut gates = self.gates.lock();
                let index = gates
                    .iter()
                    .position(|(marker, _)| request.prompt.contains(marker))
                    .expect("no gate for prompt");
                gates.remove(index).1
            };
            gate.await.unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    /// Drives a submit up to its collaborator call without completing it.
    async fn poll_once<F: Future>(future: &mut Pin<Box<F>>) {
        std::future::poll_fn(|cx| {
            let _ = future.as_mut().poll(cx);
            Poll::Ready(())
        })
        .await;
    }

    fn roadmap(role: &str) -> FeatureInput {
        FeatureInput::Roadmap {
            target_role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let orchestrator = Orchestrator::new(ScriptedCollaborator::replying(vec![]));
        for kind in [FeatureKind::Match, FeatureKind::Roadmap, FeatureKind::Interview] {
            assert_eq!(orchestrator.state(kind), RequestState::Idle);
        }
    }

    #[tokio::test]
    async fn test_validation_failure_skips_collaborator() {
        let collaborator = ScriptedCollaborator::replying(vec![]);
        let orchestrator = Orchestrator::new(collaborator.clone());

        let state = orchestrator
            .submit(FeatureInput::Match {
                resume: String::new(),
                job_description: "x".to_string(),
            })
            .await;

        assert_eq!(
            state,
            RequestState::Failed(RequestFailure {
                kind: FailureKind::Validation,
                message: "Please fill in both resume and job description.".to_string(),
            })
        );
        assert_eq!(collaborator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.state(FeatureKind::Match), state);
    }

    #[tokio::test]
    async fn test_success_caches_response_per_feature() {
        let response = AiResponse::new(
            "## Phase 1",
            vec![Citation {
                title: "T".to_string(),
                uri: "x".to_string(),
            }],
        );
        let collaborator = ScriptedCollaborator::replying(vec![Ok(response.clone())]);
        let orchestrator = Orchestrator::new(collaborator.clone());

        let state = orchestrator.submit(roadmap("Data Engineer")).await;
        assert_eq!(state, RequestState::Succeeded(response.clone()));
        assert_eq!(
            orchestrator.state(FeatureKind::Roadmap),
            RequestState::Succeeded(response)
        );
        assert_eq!(orchestrator.state(FeatureKind::Interview), RequestState::Idle);

        let seen = collaborator.seen.lock();
        assert!(seen[0].search_grounding);
        assert!(seen[0].prompt.contains("Data Engineer"));
    }

    #[tokio::test]
    async fn test_match_request_is_not_grounded() {
        let collaborator =
            ScriptedCollaborator::replying(vec![Ok(AiResponse::new("# Match Score: 70%", vec![]))]);
        let orchestrator = Orchestrator::new(collaborator.clone());

        orchestrator
            .submit(FeatureInput::Match {
                resume: "r".to_string(),
                job_description: "j".to_string(),
            })
            .await;
        assert!(!collaborator.seen.lock()[0].search_grounding);
    }

    #[tokio::test]
    async fn test_collaborator_message_is_preferred() {
        let collaborator = ScriptedCollaborator::replying(vec![Err(LlmError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        })]);
        let orchestrator = Orchestrator::new(collaborator);

        let state = orchestrator
            .submit(FeatureInput::Interview {
                role: "SRE".to_string(),
            })
            .await;
        assert_eq!(
            state,
            RequestState::Failed(RequestFailure {
                kind: FailureKind::Collaborator,
                message: "API key not valid".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fallback_message_per_feature() {
        let cases = [
            (
                FeatureInput::Match {
                    resume: "r".to_string(),
                    job_description: "j".to_string(),
                },
                "An error occurred during analysis.",
            ),
            (roadmap("PM"), "Failed to generate roadmap."),
            (
                FeatureInput::Interview {
                    role: "PM".to_string(),
                },
                "Failed to generate guide.",
            ),
        ];
        for (input, expected) in cases {
            let orchestrator =
                Orchestrator::new(ScriptedCollaborator::replying(vec![Err(LlmError::EmptyContent)]));
            match orchestrator.submit(input).await {
                RequestState::Failed(failure) => {
                    assert_eq!(failure.kind, FailureKind::Collaborator);
                    assert_eq!(failure.message, expected);
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_key_message_surfaces() {
        let orchestrator =
            Orchestrator::new(ScriptedCollaborator::replying(vec![Err(LlmError::MissingApiKey)]));
        let RequestState::Failed(failure) = orchestrator.submit(roadmap("PM")).await else {
            panic!("expected failure");
        };
        assert_eq!(
            failure.message,
            "API Key not found. Please ensure it is set in the environment."
        );
    }

    #[tokio::test]
    async fn test_resubmit_after_failure_recovers() {
        let collaborator = ScriptedCollaborator::replying(vec![
            Err(LlmError::EmptyContent),
            Ok(AiResponse::new("ok", vec![])),
        ]);
        let orchestrator = Orchestrator::new(collaborator);

        assert!(matches!(
            orchestrator.submit(roadmap("PM")).await,
            RequestState::Failed(_)
        ));
        assert!(matches!(
            orchestrator.submit(roadmap("PM")).await,
            RequestState::Succeeded(_)
        ));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let orchestrator =
            Orchestrator::new(ScriptedCollaborator::replying(vec![Ok(AiResponse::new("ok", vec![]))]));
        orchestrator.submit(roadmap("PM")).await;
        orchestrator.reset(FeatureKind::Roadmap);
        assert_eq!(orchestrator.state(FeatureKind::Roadmap), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let (tx, rx) = oneshot::channel();
        let orchestrator = Orchestrator::new(Arc::new(GatedCollaborator {
            gates: Mutex::new(vec![("Alpha", rx)]),
        }));

        let mut submit = Box::pin(orchestrator.submit(roadmap("Alpha")));
        poll_once(&mut submit).await;
        assert!(orchestrator.state(FeatureKind::Roadmap).is_loading());

        let _ = tx.send(Ok(AiResponse::new("done", vec![])));
        assert!(matches!(submit.await, RequestState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_stale_completion_does_not_overwrite_newer_submit() {
        let (tx_old, rx_old) = oneshot::channel();
        let (tx_new, rx_new) = oneshot::channel();
        let orchestrator = Orchestrator::new(Arc::new(GatedCollaborator {
            gates: Mutex::new(vec![("Alpha", rx_old), ("Beta", rx_new)]),
        }));

        let mut older = Box::pin(orchestrator.submit(roadmap("Alpha")));
        poll_once(&mut older).await;
        let mut newer = Box::pin(orchestrator.submit(roadmap("Beta")));
        poll_once(&mut newer).await;

        let _ = tx_new.send(Ok(AiResponse::new("newer", vec![])));
        let newer_state = newer.await;
        let _ = tx_old.send(Ok(AiResponse::new("older", vec![])));
        let older_state = older.await;

        let expected = RequestState::Succeeded(AiResponse::new("newer", vec![]));
        assert_eq!(newer_state, expected);
        assert_eq!(older_state, expected);
        assert_eq!(orchestrator.state(FeatureKind::Roadmap), expected);
    }

    #[tokio::test]
    async fn test_stale_completion_is_ignored_when_released_first() {
        let (tx_old, rx_old) = oneshot::channel();
        let (tx_new, rx_new) = oneshot::channel();
        let orchestrator = Orchestrator::new(Arc::new(GatedCollaborator {
            gates: Mutex::new(vec![("Alpha", rx_old), ("Beta", rx_new)]),
        }));

        let mut older = Box::pin(orchestrator.submit(roadmap("Alpha")));
        poll_once(&mut older).await;
        let mut newer = Box::pin(orchestrator.submit(roadmap("Beta")));
        poll_once(&mut newer).await;

        let _ = tx_old.send(Ok(AiResponse::new("older", vec![])));
        assert!(older.await.is_loading());
        assert!(orchestrator.state(FeatureKind::Roadmap).is_loading());

        let _ = tx_new.send(Ok(AiResponse::new("newer", vec![])));
        assert_eq!(
            newer.await,
            RequestState::Succeeded(AiResponse::new("newer", vec![]))
        );
    }

    #[tokio::test]
    async fn test_validation_failure_invalidates_in_flight_call() {
        let (tx, rx) = oneshot::channel();
        let orchestrator = Orchestrator::new(Arc::new(GatedCollaborator {
            gates: Mutex::new(vec![("Alpha", rx)]),
        }));

        let mut first = Box::pin(orchestrator.submit(roadmap("Alpha")));
        poll_once(&mut first).await;
        let second_state = orchestrator.submit(roadmap("   ")).await;

        let _ = tx.send(Ok(AiResponse::new("late", vec![])));
        first.await;

        assert!(matches!(second_state, RequestState::Failed(_)));
        assert_eq!(orchestrator.state(FeatureKind::Roadmap), second_state);
    }
}
