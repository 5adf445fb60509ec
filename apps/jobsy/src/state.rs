use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::features::Orchestrator;
use crate::llm_client::{Collaborator, LlmClient};
use crate::store::{FileStore, KeyValueStore, Profile};

/// Everything a command needs, built once in `main`.
pub struct AppState<S: KeyValueStore = FileStore> {
    pub orchestrator: Orchestrator,
    pub profile: Profile<S>,
    /// Print rendered content as JSON instead of styled text.
    pub json: bool,
}

impl AppState<FileStore> {
    pub fn from_config(config: &Config, json: bool) -> Result<Self> {
        let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_api_base.clone())
            .context("Failed to build the Gemini client")?;
        if llm.has_api_key() {
            info!("LLM client initialized");
        } else {
            warn!("No Gemini API key configured; AI features will fail until one is set");
        }

        let store = FileStore::load(&config.store_path).with_context(|| {
            format!("Failed to open profile at {}", config.store_path.display())
        })?;

        Ok(Self::new(Arc::new(llm), Profile::load(store), json))
    }
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(collaborator: Arc<dyn Collaborator>, profile: Profile<S>, json: bool) -> Self {
        Self {
            orchestrator: Orchestrator::new(collaborator),
            profile,
            json,
        }
    }
}
