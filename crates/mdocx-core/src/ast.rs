// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document model produced by the Markdown reassembler
//!
//! Blocks are the units handed to a document sink, in source order.
//! Every source line belongs to exactly one [`LogicalBlock`], including lines
//! that render nothing (blank lines, unterminated fences).

use crate::traits::{ConversionError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Document metadata collected while reassembling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Content of the first level-1 heading
    pub title: Option<String>,
    /// Number of input lines
    pub line_count: usize,
}

/// The root document node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub meta: DocumentMeta,
    pub blocks: Vec<LogicalBlock>,
    /// Preserved raw source (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_source: Option<String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks that produce output, in order
    pub fn rendered(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter_map(|b| b.block.as_ref())
    }

    /// Count words in the document
    pub fn word_count(&self) -> usize {
        self.rendered().map(|b| b.word_count()).sum()
    }

    /// Pretty JSON of metadata and logical blocks
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConversionError::SerializationError(e.to_string()))
    }
}

/// A run of consecutive source lines rendered as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalBlock {
    /// Zero-based, half-open line range
    pub lines: Range<usize>,
    /// `None` when the lines render nothing
    pub block: Option<Block>,
}

impl LogicalBlock {
    pub fn new(lines: Range<usize>, block: Option<Block>) -> Self {
        Self { lines, block }
    }
}

/// Block-level elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Heading with level 1-5
    Heading { level: u8, content: String },

    /// Horizontal rule / thematic break
    HorizontalRule,

    /// One bullet or numbered list line
    ListItem {
        kind: ListKind,
        level: usize,
        content: String,
    },

    /// Paragraph split into plain and bold runs
    Paragraph { content: Vec<Inline> },

    /// Table rows; the first row is the header
    Table { rows: Vec<Vec<String>> },

    /// Fenced code, lines joined by `\n`
    CodeBlock { content: String },

    /// `[Insert ...]` marker
    Placeholder { content: String },
}

impl Block {
    /// Count words in this block
    pub fn word_count(&self) -> usize {
        match self {
            Block::Heading { content, .. }
            | Block::ListItem { content, .. }
            | Block::CodeBlock { content }
            | Block::Placeholder { content } => content.split_whitespace().count(),
            Block::Paragraph { content } => content.iter().map(|i| i.word_count()).sum(),
            Block::Table { rows } => rows
                .iter()
                .flatten()
                .map(|cell| cell.split_whitespace().count())
                .sum(),
            Block::HorizontalRule => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Inline runs within a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text { content: String },

    /// Strong emphasis (bold)
    Strong { content: String },
}

impl Inline {
    pub fn text(content: impl Into<String>) -> Self {
        Inline::Text {
            content: content.into(),
        }
    }

    pub fn strong(content: impl Into<String>) -> Self {
        Inline::Strong {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Inline::Text { content } | Inline::Strong { content } => content,
        }
    }

    /// Count words in this inline element
    pub fn word_count(&self) -> usize {
        self.content().split_whitespace().count()
    }
}
