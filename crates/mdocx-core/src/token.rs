// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line classifier
//!
//! Each line is classified on its own, without reference to surrounding
//! lines. Multi-line constructs are assembled later by the reassembler.

use regex::Regex;
use std::sync::OnceLock;

/// Deepest heading level recognised; `######` lines are paragraphs
pub const MAX_HEADING_LEVEL: u8 = 5;

/// Markdown construct of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading { level: u8, content: String },
    HorizontalRule,
    Bullet { level: usize, content: String },
    Numbered { level: usize, content: String },
    /// Line containing `**`; content is the whole line
    BoldText { content: String },
    /// Line starting with `|`; content is the raw line
    TableRow { content: String },
    Empty,
    /// Fence toggle; the marker is never rendered
    CodeFence { marker: String },
    Placeholder { content: String },
    Paragraph { content: String },
}

impl Token {
    /// Short name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Token::Heading { .. } => "heading",
            Token::HorizontalRule => "horizontal_rule",
            Token::Bullet { .. } => "bullet",
            Token::Numbered { .. } => "numbered",
            Token::BoldText { .. } => "bold_text",
            Token::TableRow { .. } => "table_row",
            Token::Empty => "empty",
            Token::CodeFence { .. } => "code_fence",
            Token::Placeholder { .. } => "placeholder",
            Token::Paragraph { .. } => "paragraph",
        }
    }
}

fn numbered_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+").expect("Invalid numbered prefix regex"))
}

fn numbered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.\s+(.+)$").expect("Invalid numbered item regex"))
}

/// Number of leading whitespace characters
pub fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Nesting level of a list line: two columns per level
pub fn indent_level(line: &str) -> usize {
    leading_whitespace(line) / 2
}

/// Classify one line. First matching rule wins.
pub fn classify(line: &str) -> Token {
    let trimmed = line.trim();

    if let Some((level, content)) = heading(line) {
        return Token::Heading {
            level,
            content: content.to_string(),
        };
    }

    if matches!(trimmed, "---" | "***" | "___") {
        return Token::HorizontalRule;
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Token::Bullet {
            level: indent_level(line),
            content: rest.trim().to_string(),
        };
    }

    if numbered_prefix().is_match(trimmed) {
        if let Some(caps) = numbered_item().captures(trimmed) {
            return Token::Numbered {
                level: indent_level(line),
                content: caps[2].to_string(),
            };
        }
    }

    if line.contains("**") {
        return Token::BoldText {
            content: line.to_string(),
        };
    }

    if trimmed.starts_with('|') {
        return Token::TableRow {
            content: line.to_string(),
        };
    }

    if trimmed.is_empty() {
        return Token::Empty;
    }

    if trimmed.starts_with("```") {
        return Token::CodeFence {
            marker: trimmed.to_string(),
        };
    }

    if trimmed.starts_with("[Insert ") && trimmed.ends_with(']') {
        return Token::Placeholder {
            content: trimmed.to_string(),
        };
    }

    Token::Paragraph {
        content: trimmed.to_string(),
    }
}

/// `#`×N followed by a space at column 0, N in 1..=5
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL as usize {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, rest.trim()))
}
