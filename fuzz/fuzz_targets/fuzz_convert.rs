// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use mdocx_core::{DocxRenderer, MarkdownParser, ParseConfig, Parser, RenderConfig, Renderer};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let doc = MarkdownParser::new()
            .parse(input, &ParseConfig::default())
            .expect("parsing is total");
        let covered: usize = doc.blocks.iter().map(|b| b.lines.len()).sum();
        assert_eq!(covered, doc.meta.line_count);
        DocxRenderer::new()
            .render(&doc, &RenderConfig::default())
            .expect("in-memory render");
    }
});
