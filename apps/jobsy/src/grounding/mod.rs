//! Grounding: turns the collaborator's grounding chunks into a citation list.
//!
//! Citations are always rendered as a trailing section, never inline with the text.

use serde::{Deserialize, Serialize};

use crate::models::response::Citation;

/// Title shown for a web source the collaborator did not name.
pub const FALLBACK_TITLE: &str = "Knowledge Source";

/// A grounding record attached to a search-grounded response.
/// Records without a `web` sub-record (e.g. retrieved-context chunks) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl WebSource {
    fn is_empty(&self) -> bool {
        is_blank(&self.uri) && is_blank(&self.title)
    }
}

/// Projects grounding chunks to citations, preserving input order.
///
/// A chunk contributes only if its `web` sub-record is present and non-empty.
/// A missing or blank title falls back to [`FALLBACK_TITLE`].
pub fn extract_citations(chunks: &[GroundingChunk]) -> Vec<Citation> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter(|web| !web.is_empty())
        .map(|web| Citation {
            title: web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(FALLBACK_TITLE)
                .to_string(),
            uri: web.uri.clone().unwrap_or_default(),
        })
        .collect()
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(true)
}
