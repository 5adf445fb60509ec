//! Feature definitions and validated prompt requests.

use std::fmt;

use serde::Serialize;

use crate::errors::AppError;
use crate::features::prompts::{
    INTERVIEW_PROMPT_TEMPLATE, MATCH_PROMPT_TEMPLATE, ROADMAP_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{GenerationParams, GenerationRequest};

/// Fast model for the structured match report.
pub const MATCH_MODEL: &str = "gemini-3-flash-preview";
/// Search-grounded model for roadmap and interview guides.
pub const GROUNDED_MODEL: &str = "gemini-3-pro-preview";

const MATCH_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
};

/// One of the three AI-backed flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Match,
    Roadmap,
    Interview,
}

impl FeatureKind {
    pub fn model(self) -> &'static str {
        match self {
            FeatureKind::Match => MATCH_MODEL,
            FeatureKind::Roadmap | FeatureKind::Interview => GROUNDED_MODEL,
        }
    }

    pub fn params(self) -> Option<GenerationParams> {
        match self {
            FeatureKind::Match => Some(MATCH_PARAMS),
            FeatureKind::Roadmap | FeatureKind::Interview => None,
        }
    }

    /// Fixed per feature; not user-configurable.
    pub fn uses_search_grounding(self) -> bool {
        !matches!(self, FeatureKind::Match)
    }

    pub fn validation_message(self) -> &'static str {
        match self {
            FeatureKind::Match => "Please fill in both resume and job description.",
            FeatureKind::Roadmap => "Tell us your target role first!",
            FeatureKind::Interview => "Please specify a job role.",
        }
    }

    /// Shown when the collaborator fails without an explanation of its own.
    pub fn failure_fallback(self) -> &'static str {
        match self {
            FeatureKind::Match => "An error occurred during analysis.",
            FeatureKind::Roadmap => "Failed to generate roadmap.",
            FeatureKind::Interview => "Failed to generate guide.",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::Match => "match",
            FeatureKind::Roadmap => "roadmap",
            FeatureKind::Interview => "interview",
        };
        f.write_str(name)
    }
}

/// Raw user input for a feature, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureInput {
    Match {
        resume: String,
        job_description: String,
    },
    Roadmap {
        target_role: String,
    },
    Interview {
        role: String,
    },
}

impl FeatureInput {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureInput::Match { .. } => FeatureKind::Match,
            FeatureInput::Roadmap { .. } => FeatureKind::Roadmap,
            FeatureInput::Interview { .. } => FeatureKind::Interview,
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            FeatureInput::Match {
                resume,
                job_description,
            } => !is_blank(resume) && !is_blank(job_description),
            FeatureInput::Roadmap { target_role } => !is_blank(target_role),
            FeatureInput::Interview { role } => !is_blank(role),
        }
    }

    fn build_prompt(&self) -> String {
        match self {
            FeatureInput::Match {
                resume,
                job_description,
            } => fill_template(
                MATCH_PROMPT_TEMPLATE,
                &[
                    ("resume", resume.as_str()),
                    ("job_description", job_description.as_str()),
                ],
            ),
            FeatureInput::Roadmap { target_role } => {
                fill_template(ROADMAP_PROMPT_TEMPLATE, &[("target_role", target_role.as_str())])
            }
            FeatureInput::Interview { role } => {
                fill_template(INTERVIEW_PROMPT_TEMPLATE, &[("role", role.as_str())])
            }
        }
    }
}

/// A validated request with its prompt already built. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    kind: FeatureKind,
    prompt: String,
}

impl PromptRequest {
    /// Fails with the feature's validation message when a required field is blank.
    pub fn new(input: FeatureInput) -> Result<Self, AppError> {
        let kind = input.kind();
        if !input.is_complete() {
            return Err(AppError::Validation(kind.validation_message().to_string()));
        }
        let prompt = input.build_prompt();
        Ok(Self { kind, prompt })
    }

    pub fn to_generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            model: self.kind.model(),
            prompt: self.prompt.clone(),
            params: self.kind.params(),
            search_grounding: self.kind.uses_search_grounding(),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(input: FeatureInput) -> String {
        match PromptRequest::new(input) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_match_requires_both_fields() {
        let msg = validation_message(FeatureInput::Match {
            resume: String::new(),
            job_description: "x".to_string(),
        });
        assert_eq!(msg, "Please fill in both resume and job description.");

        let msg = validation_message(FeatureInput::Match {
            resume: "x".to_string(),
            job_description: " \n\t".to_string(),
        });
        assert_eq!(msg, "Please fill in both resume and job description.");
    }

    #[test]
    fn test_role_features_require_role() {
        assert_eq!(
            validation_message(FeatureInput::Roadmap {
                target_role: "  ".to_string()
            }),
            "Tell us your target role first!"
        );
        assert_eq!(
            validation_message(FeatureInput::Interview {
                role: String::new()
            }),
            "Please specify a job role."
        );
    }

    #[test]
    fn test_match_prompt_contains_inputs_and_sections_in_order() {
        let request = PromptRequest::new(FeatureInput::Match {
            resume: "Rust engineer, 5 years".to_string(),
            job_description: "Staff engineer, Rust".to_string(),
        })
        .unwrap();
        let prompt = request.to_generation_request().prompt;
        assert!(prompt.contains("Rust engineer, 5 years"));
        assert!(prompt.contains("Staff engineer, Rust"));

        let order = [
            "# Match Score:",
            "## Top Matching Skills",
            "## Missing Requirements",
            "## Optimized Bullet Points",
            "## Strategic Advice",
        ];
        let positions: Vec<usize> = order.iter().map(|s| prompt.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_roadmap_prompt_names_role_and_phases() {
        let request = PromptRequest::new(FeatureInput::Roadmap {
            target_role: "Data Engineer".to_string(),
        })
        .unwrap();
        assert!(request.to_generation_request().prompt.contains("becoming a Data Engineer"));
        for phase in [
            "Foundations",
            "Technical Deep Dive",
            "Project Building",
            "Job Market Strategy",
        ] {
            assert!(request.to_generation_request().prompt.contains(phase), "missing {phase}");
        }
    }

    #[test]
    fn test_interview_prompt_mentions_star() {
        let request = PromptRequest::new(FeatureInput::Interview {
            role: "SRE".to_string(),
        })
        .unwrap();
        assert!(request.to_generation_request().prompt.contains("role of: SRE"));
        assert!(request.to_generation_request().prompt.contains("STAR"));
    }

    #[test]
    fn test_search_grounding_is_fixed_per_feature() {
        assert!(!FeatureKind::Match.uses_search_grounding());
        assert!(FeatureKind::Roadmap.uses_search_grounding());
        assert!(FeatureKind::Interview.uses_search_grounding());
    }

    #[test]
    fn test_generation_request_matches_feature() {
        let request = PromptRequest::new(FeatureInput::Match {
            resume: "a".to_string(),
            job_description: "b".to_string(),
        })
        .unwrap()
        .to_generation_request();
        assert_eq!(request.model, MATCH_MODEL);
        assert!(!request.search_grounding);
        assert_eq!(request.params.map(|p| p.top_k), Some(40));

        let request = PromptRequest::new(FeatureInput::Interview {
            role: "PM".to_string(),
        })
        .unwrap()
        .to_generation_request();
        assert_eq!(request.model, GROUNDED_MODEL);
        assert!(request.search_grounding);
        assert!(request.params.is_none());
    }

    #[test]
    fn test_inputs_substituted_verbatim() {
        let request = PromptRequest::new(FeatureInput::Match {
            resume: "literal {job_description}".to_string(),
            job_description: "JD".to_string(),
        })
        .unwrap();
        assert!(request.to_generation_request().prompt.contains("literal {job_description}"));
    }
}
