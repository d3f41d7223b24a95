// SPDX-License-Identifier: AGPL-3.0-or-later
//! mdocx Core - Markdown to DOCX conversion
//!
//! This crate provides:
//! - A line classifier mapping each Markdown line to a [`Token`]
//! - A single-pass reassembler grouping lines into logical blocks
//! - A DOCX writer behind the [`DocumentSink`] trait

pub mod ast;
pub mod formats;
pub mod inline;
pub mod token;
pub mod traits;

pub use ast::{Block, Document, DocumentMeta, Inline, ListKind, LogicalBlock};
pub use formats::{DocxRenderer, MarkdownParser};
pub use token::{classify, Token};
pub use traits::{
    ConversionError, DocumentSink, ParseConfig, Parser, ParserExt, RenderConfig, Renderer,
    RendererExt, Result,
};
