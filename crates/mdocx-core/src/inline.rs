// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bold span splitting

use crate::ast::Inline;
use regex::Regex;
use std::sync::OnceLock;

fn bold_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*[^*]+\*\*").expect("Invalid bold span regex"))
}

/// Split text into alternating plain and bold runs.
///
/// A `**...**` span with no `*` inside becomes one [`Inline::Strong`] run.
/// Everything else, including unmatched `**`, stays in plain runs.
/// Empty runs are omitted.
pub fn split_bold(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for m in bold_span().find_iter(text) {
        let before = &text[cursor..m.start()];
        if !before.is_empty() {
            runs.push(Inline::text(before));
        }
        let inner = &text[m.start() + 2..m.end() - 2];
        runs.push(Inline::strong(inner));
        cursor = m.end();
    }

    let tail = &text[cursor..];
    if !tail.is_empty() {
        runs.push(Inline::text(tail));
    }

    runs
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Property: without any '*' the text is a single plain run
        #[test]
        fn prop_no_markers_single_run(text in "[^*]{1,60}") {
            prop_assert_eq!(split_bold(&text), vec![Inline::text(text.clone())]);
        }

        // Property: stripping the bold delimiters loses no other characters
        #[test]
        fn prop_runs_preserve_text(text in "[a-z *]{0,60}") {
            let runs = split_bold(&text);
            let rebuilt: String = runs
                .iter()
                .map(|r| match r {
                    Inline::Strong { content } => format!("**{content}**"),
                    Inline::Text { content } => content.clone(),
                })
                .collect();
            prop_assert_eq!(rebuilt, text);
        }
    }
}
