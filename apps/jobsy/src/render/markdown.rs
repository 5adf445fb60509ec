//! Line-oriented parser for the markdown dialect the collaborator is asked to produce.
//!
//! Each line is classified once, in precedence order:
//! score directive, heading (`###`, `##`, `#`), list item (`* `, `- `), plain text.
//! Blank lines close the open paragraph or list. Emphasis (`**text**`) is resolved
//! per line, so a span never crosses a soft break.

use crate::render::blocks::{Block, Inline, ListItem, ListMarker, ScoreBanner};

const SCORE_PREFIX: &str = "# Match Score: ";

/// Longest prefix first so `## ` is never read as a level-1 heading.
const HEADING_PREFIXES: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

const LIST_PREFIXES: [(&str, ListMarker); 2] = [("* ", ListMarker::Star), ("- ", ListMarker::Dash)];

enum Line<'a> {
    Blank,
    Score(ScoreBanner),
    Heading(u8, &'a str),
    Item(ListMarker, &'a str),
    Text(&'a str),
}

/// Renders collaborator text into display blocks. Empty input yields no blocks.
pub fn render(text: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for line in text.lines() {
        builder.push(classify(line));
    }
    builder.finish()
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return Line::Blank;
    }
    if let Some(banner) = parse_score(line) {
        return Line::Score(banner);
    }
    for (prefix, level) in HEADING_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Heading(level, rest);
        }
    }
    for (prefix, marker) in LIST_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Item(marker, rest);
        }
    }
    Line::Text(line)
}

/// `# Match Score: <0-100>%` exactly. Anything else is left to heading parsing.
fn parse_score(line: &str) -> Option<ScoreBanner> {
    let digits = line.strip_prefix(SCORE_PREFIX)?.strip_suffix('%')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let percent = digits.parse::<u8>().ok().filter(|p| *p <= 100)?;
    Some(ScoreBanner::new(percent))
}

/// Splits a line into text and emphasis runs. An unmatched `**` stays literal.
fn parse_inline(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        if open > 0 {
            runs.push(Inline::Text(rest[..open].to_string()));
        }
        if close > 0 {
            runs.push(Inline::Emphasis(after[..close].to_string()));
        }
        rest = &after[close + 2..];
    }

    if !rest.is_empty() {
        runs.push(Inline::Text(rest.to_string()));
    }
    runs
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    paragraph: Vec<Inline>,
    list: Vec<ListItem>,
}

impl BlockBuilder {
    fn push(&mut self, line: Line<'_>) {
        match line {
            Line::Blank => self.flush(),
            Line::Score(banner) => {
                self.flush();
                self.blocks.push(Block::ScoreBanner(banner));
            }
            Line::Heading(level, text) => {
                self.flush();
                self.blocks.push(Block::Heading {
                    level,
                    content: parse_inline(text),
                });
            }
            Line::Item(marker, text) => {
                self.flush_paragraph();
                self.list.push(ListItem {
                    marker,
                    content: parse_inline(text),
                });
            }
            Line::Text(text) => {
                self.flush_list();
                if !self.paragraph.is_empty() {
                    self.paragraph.push(Inline::SoftBreak);
                }
                self.paragraph.extend(parse_inline(text));
            }
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let content = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph { content });
        }
    }

    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            let items = std::mem::take(&mut self.list);
            self.blocks.push(Block::List { items });
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}
