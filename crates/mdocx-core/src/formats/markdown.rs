// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line-oriented Markdown reader
//!
//! Lines are classified one at a time and reassembled into logical blocks in
//! a single forward pass. Tables and fenced code are the only constructs that
//! span more than one line.

use crate::ast::{Block, Document, DocumentMeta, ListKind, LogicalBlock};
use crate::inline::split_bold;
use crate::token::{classify, Token};
use crate::traits::{ParseConfig, Parser, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, trace, warn};

/// Markdown reader for structured requirement documents
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document> {
        let lines = split_lines(input);
        let blocks = reassemble(&lines);

        let title = blocks.iter().find_map(|b| match &b.block {
            Some(Block::Heading { level: 1, content }) => Some(content.clone()),
            _ => None,
        });

        info!(
            lines = lines.len(),
            blocks = blocks.len(),
            "reassembled markdown document"
        );

        Ok(Document {
            meta: DocumentMeta {
                title,
                line_count: lines.len(),
            },
            blocks,
            raw_source: if config.preserve_raw_source {
                Some(input.to_string())
            } else {
                None
            },
        })
    }
}

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("Invalid line break regex"))
}

/// Split on `\n`, `\r\n` or a lone `\r`. A final terminator does not open an
/// empty last line.
pub fn split_lines(input: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = line_break().split(input).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Fence state of the reassembler
#[derive(Debug)]
enum CodeState {
    Normal,
    InCodeBlock { opened_at: usize, body: Vec<String> },
}

/// Group lines into logical blocks, in order, covering every line once.
pub fn reassemble(lines: &[&str]) -> Vec<LogicalBlock> {
    let mut blocks = Vec::new();
    let mut state = CodeState::Normal;
    let mut cursor = 0;

    while cursor < lines.len() {
        let line = lines[cursor];
        let token = classify(line);
        trace!(line = cursor + 1, kind = token.kind(), "classified");

        state = match state {
            CodeState::InCodeBlock {
                opened_at,
                mut body,
            } => {
                if matches!(token, Token::CodeFence { .. }) {
                    let block = if body.is_empty() {
                        None
                    } else {
                        Some(Block::CodeBlock {
                            content: body.join("\n"),
                        })
                    };
                    blocks.push(LogicalBlock::new(opened_at..cursor + 1, block));
                    cursor += 1;
                    CodeState::Normal
                } else {
                    body.push(line.trim_end().to_string());
                    cursor += 1;
                    CodeState::InCodeBlock { opened_at, body }
                }
            }

            CodeState::Normal => match token {
                Token::CodeFence { .. } => {
                    let opened_at = cursor;
                    cursor += 1;
                    CodeState::InCodeBlock {
                        opened_at,
                        body: Vec::new(),
                    }
                }

                Token::TableRow { .. } => {
                    let (end, block) = aggregate_table(lines, cursor);
                    blocks.push(LogicalBlock::new(cursor..end, block));
                    cursor = end;
                    CodeState::Normal
                }

                token => {
                    blocks.push(LogicalBlock::new(cursor..cursor + 1, single_line_block(token)));
                    cursor += 1;
                    CodeState::Normal
                }
            },
        };
    }

    if let CodeState::InCodeBlock { opened_at, body } = state {
        warn!(
            line = opened_at + 1,
            discarded = body.len(),
            "unterminated code fence, dropping its contents"
        );
        blocks.push(LogicalBlock::new(opened_at..lines.len(), None));
    }

    blocks
}

fn single_line_block(token: Token) -> Option<Block> {
    let block = match token {
        Token::Heading { level, content } => Block::Heading { level, content },
        Token::HorizontalRule => Block::HorizontalRule,
        Token::Bullet { level, content } => Block::ListItem {
            kind: ListKind::Bullet,
            level,
            content,
        },
        Token::Numbered { level, content } => Block::ListItem {
            kind: ListKind::Ordered,
            level,
            content,
        },
        Token::BoldText { content } | Token::Paragraph { content } => Block::Paragraph {
            content: split_bold(&content),
        },
        Token::Placeholder { content } => Block::Placeholder { content },
        Token::Empty | Token::TableRow { .. } | Token::CodeFence { .. } => return None,
    };
    Some(block)
}

fn separator_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\|[\s|:\-]+\|$").expect("Invalid separator row regex"))
}

/// Consume table lines starting at `start`.
///
/// Returns the index one past the last consumed line and the table, if any
/// row survived filtering.
fn aggregate_table(lines: &[&str], start: usize) -> (usize, Option<Block>) {
    let mut end = start;
    let mut rows: Vec<Vec<String>> = Vec::new();

    while end < lines.len() && lines[end].contains('|') {
        let line = lines[end].trim();
        end += 1;

        if separator_row().is_match(line) {
            continue;
        }

        let cells = split_cells(line);
        if cells.iter().any(|c| !c.is_empty()) {
            rows.push(cells);
        }
    }

    let Some(header) = rows.first() else {
        warn!(
            line = start + 1,
            consumed = end - start,
            "table has no content rows, skipping"
        );
        return (end, None);
    };

    let columns = header.len();
    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.len() != columns {
            warn!(
                line = start + 1,
                row = i,
                cells = row.len(),
                columns,
                "ragged table row"
            );
        }
    }

    debug!(line = start + 1, rows = rows.len(), columns, "table");
    (end, Some(Block::Table { rows }))
}

/// Cells between the outer pipes, trimmed
fn split_cells(line: &str) -> Vec<String> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 2 {
        return Vec::new();
    }
    fields[1..fields.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;
    use pretty_assertions::assert_eq;

    fn rendered(lines: &[&str]) -> Vec<Block> {
        reassemble(lines)
            .into_iter()
            .filter_map(|b| b.block)
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_title_list_and_bold_paragraph() {
        let blocks = rendered(&[
            "# Title",
            "",
            "- item one",
            "- item two",
            "**bold** and plain",
        ]);
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    content: "Title".to_string()
                },
                Block::ListItem {
                    kind: ListKind::Bullet,
                    level: 0,
                    content: "item one".to_string()
                },
                Block::ListItem {
                    kind: ListKind::Bullet,
                    level: 0,
                    content: "item two".to_string()
                },
                Block::Paragraph {
                    content: vec![Inline::strong("bold"), Inline::text(" and plain")]
                },
            ]
        );
    }

    #[test]
    fn test_table_drops_separator_and_keeps_header_first() {
        let lines = [
            "| Id | Requirement |",
            "|----|:-----------:|",
            "| FR-1 | Login |",
            "| FR-2 | Logout |",
            "After the table",
        ];
        let blocks = reassemble(&lines);
        assert_eq!(blocks[0].lines, 0..4);
        assert_eq!(
            blocks[0].block,
            Some(Block::Table {
                rows: vec![
                    row(&["Id", "Requirement"]),
                    row(&["FR-1", "Login"]),
                    row(&["FR-2", "Logout"]),
                ]
            })
        );
        assert_eq!(blocks[1].lines, 4..5);
    }

    #[test]
    fn test_table_rows_keep_bold_markers_literally() {
        let blocks = rendered(&["| Id | Name |", "| 1 | **Main** door |"]);
        assert_eq!(
            blocks,
            vec![Block::Table {
                rows: vec![row(&["Id", "Name"]), row(&["1", "**Main** door"])]
            }]
        );
    }

    #[test]
    fn test_bold_header_row_is_a_paragraph() {
        let blocks = rendered(&["| **Id** | Name |", "| 1 | Door |"]);
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
        assert!(matches!(blocks[1], Block::Table { .. }));
    }

    #[test]
    fn test_table_consumes_any_line_with_a_pipe() {
        let blocks = reassemble(&["| A |", "a | b", "|  |  |", "| B |", "tail"]);
        assert_eq!(blocks[0].lines, 0..4);
        assert_eq!(
            blocks[0].block,
            Some(Block::Table {
                rows: vec![row(&["A"]), row(&["B"])]
            })
        );
    }

    #[test]
    fn test_separator_only_table_advances() {
        let blocks = reassemble(&["|---|---|", "|:-:|", "text"]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], LogicalBlock::new(0..2, None));
        assert_eq!(blocks[1].lines, 2..3);
    }

    #[test]
    fn test_ragged_rows_are_kept_as_written() {
        let blocks = rendered(&["| A | B |", "| 1 | 2 | 3 |", "| x |"]);
        assert_eq!(
            blocks,
            vec![Block::Table {
                rows: vec![row(&["A", "B"]), row(&["1", "2", "3"]), row(&["x"])]
            }]
        );
    }

    #[test]
    fn test_code_block_lines_are_verbatim() {
        let lines = ["```python", "# not a heading", "  - not a bullet  ", "", "```"];
        let blocks = reassemble(&lines);
        assert_eq!(
            blocks,
            vec![LogicalBlock::new(
                0..5,
                Some(Block::CodeBlock {
                    content: "# not a heading\n  - not a bullet\n".to_string()
                })
            )]
        );
    }

    #[test]
    fn test_unterminated_fence_emits_nothing() {
        let blocks = reassemble(&["intro", "```", "let x = 1;", "let y = 2;"]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], LogicalBlock::new(1..4, None));
    }

    #[test]
    fn test_empty_fence_pair_emits_nothing() {
        assert!(rendered(&["```", "```"]).is_empty());
    }

    #[test]
    fn test_per_type_blocks() {
        let blocks = rendered(&[
            "## Scope",
            "---",
            "  3. third",
            "[Insert context diagram]",
            "plain words",
        ]);
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    content: "Scope".to_string()
                },
                Block::HorizontalRule,
                Block::ListItem {
                    kind: ListKind::Ordered,
                    level: 1,
                    content: "third".to_string()
                },
                Block::Placeholder {
                    content: "[Insert context diagram]".to_string()
                },
                Block::Paragraph {
                    content: vec![Inline::text("plain words")]
                },
            ]
        );
    }

    #[test]
    fn test_parse_sets_meta() {
        let doc = MarkdownParser::new()
            .parse(
                "## Preface\n# System Requirements\n# Second\n",
                &ParseConfig {
                    preserve_raw_source: true,
                },
            )
            .unwrap();
        assert_eq!(doc.meta.title.as_deref(), Some("System Requirements"));
        assert_eq!(doc.meta.line_count, 3);
        assert!(doc.raw_source.is_some());
    }

    #[test]
    fn test_parse_handles_crlf() {
        let doc = MarkdownParser::new()
            .parse("# Title\r\n- item\r\n", &ParseConfig::default())
            .unwrap();
        assert_eq!(doc.rendered().count(), 2);
        assert_eq!(doc.meta.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_parse_handles_lone_cr() {
        let doc = MarkdownParser::new()
            .parse("# Title\r- item\r", &ParseConfig::default())
            .unwrap();
        assert_eq!(doc.meta.line_count, 2);
        assert_eq!(
            doc.rendered().cloned().collect::<Vec<_>>(),
            vec![
                Block::Heading {
                    level: 1,
                    content: "Title".to_string()
                },
                Block::ListItem {
                    kind: ListKind::Bullet,
                    level: 0,
                    content: "item".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("\r\r\n"), vec!["", ""]);
    }
}
