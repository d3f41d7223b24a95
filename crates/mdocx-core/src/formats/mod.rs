// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format handlers: Markdown in, DOCX out

pub mod docx;
pub mod markdown;

pub use docx::{DocxBuilder, DocxRenderer};
pub use markdown::MarkdownParser;
