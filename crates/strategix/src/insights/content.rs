//! Article body parsing.
//!
//! Bodies are plain text with a few recognised markers: `## ` and `### ` headings, `- `
//! list items, `N. **Title**` numbered highlights, `**strong**` spans, and blank lines
//! separating paragraphs. Everything else is paragraph text.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Strong { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { spans: Vec<Inline> },
    ListItem { spans: Vec<Inline> },
    Highlight { number: u32, title: String, spans: Vec<Inline> },
}

fn highlight_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\. \*\*(.*?)\*\*(.*)$").expect("highlight pattern compiles")
    })
}

/// Split `text` into plain and `**strong**` spans. An unmatched `**` stays literal.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if open > 0 {
            spans.push(Inline::Text {
                text: rest[..open].to_string(),
            });
        }
        spans.push(Inline::Strong {
            text: after_open[..close].to_string(),
        });
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        spans.push(Inline::Text {
            text: rest.to_string(),
        });
    }
    spans
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<ContentBlock>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join(" ");
    lines.clear();
    blocks.push(ContentBlock::Paragraph {
        spans: parse_inline(&text),
    });
}

pub fn parse_content(content: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();

        if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
        } else if let Some(text) = line.strip_prefix("### ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Heading {
                level: 3,
                text: text.trim().to_string(),
            });
        } else if let Some(text) = line.strip_prefix("## ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Heading {
                level: 2,
                text: text.trim().to_string(),
            });
        } else if let Some(text) = line.strip_prefix("- ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::ListItem {
                spans: parse_inline(text.trim()),
            });
        } else if let Some(captures) = highlight_pattern().captures(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let number = captures[1].parse().unwrap_or(0);
            blocks.push(ContentBlock::Highlight {
                number,
                title: captures[2].to_string(),
                spans: parse_inline(captures[3].trim()),
            });
        } else {
            paragraph.push(line);
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}
