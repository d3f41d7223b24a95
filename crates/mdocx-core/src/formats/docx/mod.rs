// SPDX-License-Identifier: AGPL-3.0-or-later
//! DOCX (WordprocessingML) renderer
//!
//! Blocks are translated into sink primitives by [`emit_block`]; the
//! [`DocxBuilder`] sink serialises them into `word/document.xml` and
//! [`package`] zips the result with styles and numbering parts.

mod builder;
pub mod package;

pub use builder::DocxBuilder;

use crate::ast::{Block, Document, Inline, ListKind};
use crate::traits::{DocumentSink, RenderConfig, Renderer, Result};
use tracing::debug;

/// Twentieths of a point per inch
pub const TWIPS_PER_INCH: f32 = 1440.0;

/// Paragraph justification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// Formatted text run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Hex RGB, e.g. `808080`
    pub color: Option<String>,
    pub font: Option<String>,
    pub size_pt: Option<f32>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, rgb: impl Into<String>) -> Self {
        self.color = Some(rgb.into());
        self
    }

    pub fn font(mut self, name: impl Into<String>, size_pt: f32) -> Self {
        self.font = Some(name.into());
        self.size_pt = Some(size_pt);
        self
    }
}

/// Paragraph with optional style, alignment and left indent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Paragraph style id from `styles.xml`
    pub style: Option<String>,
    pub alignment: Alignment,
    /// Left indent in twips
    pub indent_left: Option<u32>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            ..Self::default()
        }
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn indent(mut self, twips: u32) -> Self {
        self.indent_left = Some(twips);
        self
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }
}

/// Table of `rows × columns` text cells
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub style: Option<String>,
    pub columns: usize,
    /// Cell text per row; rows may be shorter or longer than `columns`
    pub rows: Vec<Vec<String>>,
    /// Render the first row bold
    pub bold_header: bool,
}

/// DOCX renderer
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DocxRenderer {
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<Vec<u8>> {
        let mut builder = DocxBuilder::new(config);
        emit_document(doc, &mut builder, config);
        builder.finish(&doc.meta)
    }
}

/// Emit every rendered block of `doc`, in order
pub fn emit_document<S: DocumentSink>(doc: &Document, sink: &mut S, config: &RenderConfig) {
    for block in doc.rendered() {
        emit_block(block, sink, config);
    }
}

/// Translate one block into sink calls
pub fn emit_block<S: DocumentSink>(block: &Block, sink: &mut S, config: &RenderConfig) {
    match block {
        Block::Heading { level, content } => {
            debug!(level, "heading");
            let alignment = if *level == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            };
            sink.add_heading(content, *level, alignment);
        }

        Block::HorizontalRule => {
            sink.add_paragraph(Paragraph::new().run(Run::new("_".repeat(config.rule_width))));
        }

        Block::ListItem {
            kind,
            level,
            content,
        } => {
            let style = match kind {
                ListKind::Bullet => "ListBullet",
                ListKind::Ordered => "ListNumber",
            };
            let mut paragraph = Paragraph::styled(style).run(Run::new(content.as_str()));
            if *level > 0 {
                paragraph = paragraph.indent(list_indent(*level, config));
            }
            sink.add_paragraph(paragraph);
        }

        Block::Paragraph { content } => {
            let runs = content
                .iter()
                .map(|inline| match inline {
                    Inline::Strong { content } => Run::new(content.as_str()).bold(),
                    Inline::Text { content } => Run::new(content.as_str()),
                })
                .collect();
            sink.add_paragraph(Paragraph {
                runs,
                ..Paragraph::default()
            });
        }

        Block::Table { rows } => {
            let columns = rows.first().map_or(0, Vec::len);
            debug!(rows = rows.len(), columns, "table");
            sink.add_table(TableSpec {
                style: Some(config.table_style.clone()),
                columns,
                rows: rows.clone(),
                bold_header: true,
            });
        }

        Block::CodeBlock { content } => {
            sink.add_paragraph(
                Paragraph::styled("IntenseQuote").run(
                    Run::new(content.as_str())
                        .font(config.code_font_name.as_str(), config.code_font_size_pt),
                ),
            );
        }

        Block::Placeholder { content } => {
            sink.add_paragraph(
                Paragraph::new().align(Alignment::Center).run(
                    Run::new(content.as_str())
                        .italic()
                        .color(config.placeholder_color.as_str()),
                ),
            );
        }
    }
}

fn list_indent(level: usize, config: &RenderConfig) -> u32 {
    (config.list_indent_inches * TWIPS_PER_INCH * level as f32).round() as u32
}
