// SPDX-License-Identifier: AGPL-3.0-or-later
//! OPC package parts and zip writer

use super::builder::half_points;
use crate::ast::DocumentMeta;
use crate::traits::{RenderConfig, Result};
use quick_xml::escape::escape;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Parts that vary per document
pub struct Package {
    pub document: String,
    pub styles: String,
    pub core: String,
}

/// Write all parts of a DOCX archive
pub fn write_package<W: Write + Seek>(writer: W, parts: &Package) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", opt)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", opt)?;
    zip.write_all(RELS_XML.as_bytes())?;

    zip.start_file("docProps/core.xml", opt)?;
    zip.write_all(parts.core.as_bytes())?;

    zip.start_file("word/document.xml", opt)?;
    zip.write_all(parts.document.as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", opt)?;
    zip.write_all(WORD_RELS_XML.as_bytes())?;

    zip.start_file("word/styles.xml", opt)?;
    zip.write_all(parts.styles.as_bytes())?;

    zip.start_file("word/numbering.xml", opt)?;
    zip.write_all(NUMBERING_XML.as_bytes())?;

    zip.finish()?;
    Ok(())
}

/// Wrap body XML into a full `word/document.xml`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>{body}<w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>
      <w:cols w:space="720"/>
    </w:sectPr>
  </w:body>
</w:document>"#
    )
}

/// Core properties; only the title is carried
pub fn core_xml(meta: &DocumentMeta) -> String {
    let title = meta
        .title
        .as_deref()
        .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}<dc:creator>mdocx</dc:creator></cp:coreProperties>"#
    )
}

/// Style sheet with document defaults taken from `config`
pub fn styles_xml(config: &RenderConfig) -> String {
    let font = escape(config.font_name.as_str());
    let size = half_points(config.font_size_pt);
    let table_style = escape(config.table_style.as_str());

    let mut headings = String::new();
    for (level, size_pt) in [(1u8, 16.0f32), (2, 13.0), (3, 12.0), (4, 11.0), (5, 11.0)] {
        let italic = if level == 4 { "<w:i/>" } else { "" };
        headings.push_str(&format!(
            r#"
  <w:style w:type="paragraph" w:styleId="Heading{level}">
    <w:name w:val="heading {level}"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="240" w:after="0"/><w:outlineLvl w:val="{outline}"/></w:pPr>
    <w:rPr><w:b/>{italic}<w:color w:val="2F5496"/><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr>
  </w:style>"#,
            outline = level - 1,
            sz = half_points(size_pt),
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>{headings}
  <w:style w:type="paragraph" w:styleId="ListBullet">
    <w:name w:val="List Bullet"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:contextualSpacing/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="ListNumber">
    <w:name w:val="List Number"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:numPr><w:numId w:val="2"/></w:numPr><w:contextualSpacing/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="IntenseQuote">
    <w:name w:val="Intense Quote"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:pPr>
      <w:pBdr><w:top w:val="single" w:sz="4" w:space="10" w:color="4472C4"/><w:bottom w:val="single" w:sz="4" w:space="10" w:color="4472C4"/></w:pBdr>
      <w:spacing w:before="360" w:after="360"/>
      <w:ind w:left="864" w:right="864"/>
    </w:pPr>
    <w:rPr><w:i/><w:color w:val="4472C4"/></w:rPr>
  </w:style>
  <w:style w:type="table" w:default="1" w:styleId="TableNormal">
    <w:name w:val="Normal Table"/>
    <w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr>
  </w:style>
  <w:style w:type="table" w:styleId="{table_style}">
    <w:name w:val="{table_style}"/>
    <w:basedOn w:val="TableNormal"/>
    <w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr>
    <w:tblPr>
      <w:tblBorders>
        <w:top w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
        <w:left w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
        <w:bottom w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
        <w:right w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
        <w:insideH w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
        <w:insideV w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/>
      </w:tblBorders>
    </w:tblPr>
    <w:tblStylePr w:type="firstRow">
      <w:rPr><w:b/></w:rPr>
      <w:tblPr/>
      <w:tcPr><w:tcBorders><w:bottom w:val="single" w:sz="18" w:space="0" w:color="4F81BD"/></w:tcBorders></w:tcPr>
    </w:tblStylePr>
  </w:style>
</w:styles>"#
    )
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const WORD_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

// numId 1 is the bullet list, numId 2 the decimal list
const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:lvlText w:val="&#8226;"/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="decimal"/>
      <w:lvlText w:val="%1."/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_use_configured_font() {
        let config = RenderConfig {
            font_name: "Georgia".to_string(),
            font_size_pt: 12.0,
            ..RenderConfig::default()
        };
        let xml = styles_xml(&config);
        assert!(xml.contains(r#"w:ascii="Georgia""#));
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
        for id in ["Heading1", "Heading5", "ListBullet", "ListNumber", "IntenseQuote", "LightGridAccent1"] {
            assert!(xml.contains(&format!(r#"w:styleId="{id}""#)), "missing style {id}");
        }
    }

    #[test]
    fn test_core_title_escaped() {
        let xml = core_xml(&DocumentMeta {
            title: Some("R&D <Plan>".to_string()),
            line_count: 0,
        });
        assert!(xml.contains("<dc:title>R&amp;D &lt;Plan&gt;</dc:title>"));
        assert!(!core_xml(&DocumentMeta::default()).contains("dc:title"));
    }

    #[test]
    fn test_document_wraps_body() {
        let xml = document_xml("<w:p></w:p>");
        assert!(xml.contains("<w:body><w:p></w:p><w:sectPr>"));
    }
}
