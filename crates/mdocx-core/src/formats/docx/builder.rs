// SPDX-License-Identifier: AGPL-3.0-or-later
//! WordprocessingML body writer

use super::package::{self, Package};
use super::{Alignment, Paragraph, Run, TableSpec};
use crate::ast::DocumentMeta;
use crate::traits::{DocumentSink, RenderConfig, Result};
use quick_xml::escape::escape;
use std::io::Cursor;
use tracing::{info, trace};

/// Usable page width (Letter, one-inch margins) in twips
const TEXT_WIDTH_TWIPS: u32 = 9360;

/// In-memory DOCX document built through [`DocumentSink`] calls
pub struct DocxBuilder {
    config: RenderConfig,
    body: String,
}

impl DocxBuilder {
    /// Start an empty document styled by `config`
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            config: config.clone(),
            body: String::new(),
        }
    }

    /// Body XML written so far
    pub fn body_xml(&self) -> &str {
        &self.body
    }

    /// Complete `word/document.xml`
    pub fn document_xml(&self) -> String {
        package::document_xml(&self.body)
    }

    /// Package the document into DOCX bytes
    pub fn finish(self, meta: &DocumentMeta) -> Result<Vec<u8>> {
        let parts = Package {
            document: self.document_xml(),
            styles: package::styles_xml(&self.config),
            core: package::core_xml(meta),
        };
        let mut out = Cursor::new(Vec::new());
        package::write_package(&mut out, &parts)?;
        let bytes = out.into_inner();
        info!(bytes = bytes.len(), "packaged docx");
        Ok(bytes)
    }

    fn write_paragraph(&mut self, paragraph: &Paragraph) {
        self.body.push_str("<w:p>");

        let mut props = String::new();
        if let Some(style) = &paragraph.style {
            props.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape(style.as_str())));
        }
        if let Some(left) = paragraph.indent_left {
            props.push_str(&format!(r#"<w:ind w:left="{left}"/>"#));
        }
        if paragraph.alignment == Alignment::Center {
            props.push_str(r#"<w:jc w:val="center"/>"#);
        }
        if !props.is_empty() {
            self.body.push_str("<w:pPr>");
            self.body.push_str(&props);
            self.body.push_str("</w:pPr>");
        }

        for run in &paragraph.runs {
            write_run(&mut self.body, run);
        }

        self.body.push_str("</w:p>");
    }
}

fn write_run(out: &mut String, run: &Run) {
    if run.text.is_empty() {
        return;
    }

    out.push_str("<w:r>");

    let mut props = String::new();
    if let Some(font) = &run.font {
        let font = escape(font.as_str());
        props.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
        ));
    }
    if run.bold {
        props.push_str("<w:b/>");
    }
    if run.italic {
        props.push_str("<w:i/>");
    }
    if let Some(color) = &run.color {
        props.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape(color.as_str())));
    }
    if let Some(size) = run.size_pt {
        let half_points = half_points(size);
        props.push_str(&format!(
            r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#
        ));
    }
    if !props.is_empty() {
        out.push_str("<w:rPr>");
        out.push_str(&props);
        out.push_str("</w:rPr>");
    }

    write_text(out, &run.text);
    out.push_str("</w:r>");
}

/// Run text; `\n` becomes a line break, `\t` a tab. Other control characters
/// and the XML-illegal noncharacters U+FFFE/U+FFFF are dropped.
fn write_text(out: &mut String, text: &str) {
    let mut segment = String::new();
    let flush = |out: &mut String, segment: &mut String| {
        if !segment.is_empty() {
            out.push_str(r#"<w:t xml:space="preserve">"#);
            out.push_str(&escape(segment.as_str()));
            out.push_str("</w:t>");
            segment.clear();
        }
    };

    for ch in text.chars() {
        match ch {
            '\n' => {
                flush(out, &mut segment);
                out.push_str("<w:br/>");
            }
            '\t' => {
                flush(out, &mut segment);
                out.push_str("<w:tab/>");
            }
            c if c.is_control() => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => segment.push(c),
        }
    }
    flush(out, &mut segment);
}

/// Font sizes in WordprocessingML are half-points
pub(crate) fn half_points(size_pt: f32) -> u32 {
    (size_pt * 2.0).round() as u32
}

impl DocumentSink for DocxBuilder {
    fn add_heading(&mut self, text: &str, level: u8, alignment: Alignment) {
        let paragraph = Paragraph::styled(format!("Heading{level}"))
            .align(alignment)
            .run(Run::new(text));
        self.write_paragraph(&paragraph);
    }

    fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.write_paragraph(&paragraph);
    }

    fn add_table(&mut self, table: TableSpec) {
        if table.columns == 0 {
            return;
        }
        let width = TEXT_WIDTH_TWIPS / table.columns as u32;

        self.body.push_str("<w:tbl><w:tblPr>");
        if let Some(style) = &table.style {
            self.body
                .push_str(&format!(r#"<w:tblStyle w:val="{}"/>"#, escape(style.as_str())));
        }
        self.body.push_str(concat!(
            r#"<w:tblW w:w="0" w:type="auto"/>"#,
            r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#,
            "</w:tblPr><w:tblGrid>"
        ));
        for _ in 0..table.columns {
            self.body.push_str(&format!(r#"<w:gridCol w:w="{width}"/>"#));
        }
        self.body.push_str("</w:tblGrid>");

        for (i, row) in table.rows.iter().enumerate() {
            if row.len() > table.columns {
                trace!(row = i, dropped = row.len() - table.columns, "cells beyond header width");
            }
            self.body.push_str("<w:tr>");
            for j in 0..table.columns {
                let text = row.get(j).map(String::as_str).unwrap_or("");
                let mut run = Run::new(text);
                run.bold = i == 0 && table.bold_header;

                self.body.push_str(&format!(
                    r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/></w:tcPr><w:p>"#
                ));
                write_run(&mut self.body, &run);
                self.body.push_str("</w:p></w:tc>");
            }
            self.body.push_str("</w:tr>");
        }

        self.body.push_str("</w:tbl>");
    }
}
