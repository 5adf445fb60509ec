use serde::Serialize;

/// Qualitative classification of a match score. Drives the banner's colour and caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Strong,
    Moderate,
    Weak,
}

impl Tier {
    /// ≥ 80 strong, 50–79 moderate, < 50 weak.
    pub fn from_percent(percent: u8) -> Self {
        if percent >= 80 {
            Tier::Strong
        } else if percent >= 50 {
            Tier::Moderate
        } else {
            Tier::Weak
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Tier::Strong => "Strong Candidate Potential",
            Tier::Moderate | Tier::Weak => "Room for Optimization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBanner {
    pub percent: u8,
    pub tier: Tier,
}

impl ScoreBanner {
    pub fn new(percent: u8) -> Self {
        Self {
            percent,
            tier: Tier::from_percent(percent),
        }
    }

    pub fn caption(&self) -> &'static str {
        self.tier.caption()
    }
}

/// A run of inline content inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Emphasis(String),
    /// Single newline inside a paragraph.
    SoftBreak,
}

/// Source marker of a list item. Both mean the same thing; only the glyph differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    Star,
    Dash,
}

impl ListMarker {
    pub fn glyph(self) -> &'static str {
        match self {
            ListMarker::Star => "✦",
            ListMarker::Dash => "○",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub marker: ListMarker,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    ScoreBanner(ScoreBanner),
    Heading { level: u8, content: Vec<Inline> },
    List { items: Vec<ListItem> },
    Paragraph { content: Vec<Inline> },
}

/// Flattens inline runs to plain text; soft breaks become newlines.
pub fn plain_text(content: &[Inline]) -> String {
    content
        .iter()
        .map(|run| match run {
            Inline::Text(text) | Inline::Emphasis(text) => text.as_str(),
            Inline::SoftBreak => "\n",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        for p in 0..=100u8 {
            let expected = if p < 50 {
                Tier::Weak
            } else if p < 80 {
                Tier::Moderate
            } else {
                Tier::Strong
            };
            assert_eq!(Tier::from_percent(p), expected, "percent {p}");
        }
    }

    #[test]
    fn test_captions() {
        assert_eq!(ScoreBanner::new(82).caption(), "Strong Candidate Potential");
        assert_eq!(ScoreBanner::new(79).caption(), "Room for Optimization");
        assert_eq!(ScoreBanner::new(10).caption(), "Room for Optimization");
    }

    #[test]
    fn test_plain_text_joins_runs() {
        let runs = vec![
            Inline::Text("Lead ".to_string()),
            Inline::Emphasis("Rust".to_string()),
            Inline::SoftBreak,
            Inline::Text("teams".to_string()),
        ];
        assert_eq!(plain_text(&runs), "Lead Rust\nteams");
    }

    #[test]
    fn test_block_serializes_with_type_tag() {
        let json = serde_json::to_value(Block::ScoreBanner(ScoreBanner::new(55))).unwrap();
        assert_eq!(json["type"], "score_banner");
        assert_eq!(json["percent"], 55);
        assert_eq!(json["tier"], "moderate");
    }
}
