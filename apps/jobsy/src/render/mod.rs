// Markdown-subset renderer: collaborator text in, display blocks out. No I/O, no state.

pub mod blocks;
pub mod markdown;

use serde::Serialize;

pub use blocks::{Block, Inline, ListItem, ListMarker, ScoreBanner, Tier};
pub use markdown::render;

use crate::models::response::{AiResponse, Citation};

/// A response ready for display: blocks from the text plus the trailing citation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedContent {
    pub blocks: Vec<Block>,
    pub citations: Vec<Citation>,
}

impl RenderedContent {
    pub fn from_response(response: &AiResponse) -> Self {
        Self {
            blocks: render(&response.text),
            citations: response.citations.clone(),
        }
    }
}
