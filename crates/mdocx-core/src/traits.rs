// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser, renderer and document sink traits

use crate::ast::Document;
use crate::formats::docx::{Alignment, Paragraph, TableSpec};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Error type for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("File not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Configuration for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Keep raw source on the document
    pub preserve_raw_source: bool,
}

/// Styling applied when rendering a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Body font (document default)
    pub font_name: String,
    /// Body font size in points
    pub font_size_pt: f32,
    /// Font for fenced code
    pub code_font_name: String,
    /// Code font size in points
    pub code_font_size_pt: f32,
    /// Hex RGB colour of placeholder markers
    #[serde(deserialize_with = "hex_color")]
    pub placeholder_color: String,
    /// Left indent added per list nesting level
    pub list_indent_inches: f32,
    /// Number of underscores in a horizontal rule
    pub rule_width: usize,
    /// Table style id
    pub table_style: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_name: "Calibri".to_string(),
            font_size_pt: 11.0,
            code_font_name: "Courier New".to_string(),
            code_font_size_pt: 9.0,
            placeholder_color: "808080".to_string(),
            list_indent_inches: 0.5,
            rule_width: 80,
            table_style: "LightGridAccent1".to_string(),
        }
    }
}

/// Six hex digits, as written into `w:color`
fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a six digit hex colour such as \"808080\", got {value:?}"
        )))
    }
}

impl RenderConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConversionError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}

/// Parser trait: convert source text to a document
pub trait Parser {
    /// Parse a string into a Document
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document>;
}

/// Renderer trait: convert a document to output bytes
pub trait Renderer {
    /// Render a Document to bytes
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<Vec<u8>>;
}

/// Extension trait for reader and file input
pub trait ParserExt: Parser {
    /// Parse from a reader
    fn parse_reader<R: Read>(&self, reader: R, config: &ParseConfig) -> Result<Document> {
        let mut input = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut input)?;
        self.parse(&input, config)
    }

    /// Parse a file, reporting a missing file as [`ConversionError::InputNotFound`]
    fn parse_path(&self, path: &Path, config: &ParseConfig) -> Result<Document> {
        if !path.exists() {
            return Err(ConversionError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        self.parse_reader(File::open(path)?, config)
    }
}

/// Extension trait for writer and file output
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        doc: &Document,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(doc, config)?;
        writer.write_all(&output)?;
        Ok(())
    }

    /// Render to a file, creating parent directories. Returns the size written.
    fn render_to_path(&self, doc: &Document, path: &Path, config: &RenderConfig) -> Result<u64> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        self.render_writer(doc, &mut file, config)?;
        file.flush()?;
        Ok(file.metadata()?.len())
    }
}

// Blanket implementations
impl<T: Parser> ParserExt for T {}
impl<T: Renderer> RendererExt for T {}

/// Rich document primitives the block emitter writes to
pub trait DocumentSink {
    /// Append a heading paragraph of the given level
    fn add_heading(&mut self, text: &str, level: u8, alignment: Alignment);

    /// Append a styled paragraph
    fn add_paragraph(&mut self, paragraph: Paragraph);

    /// Append a table
    fn add_table(&mut self, table: TableSpec);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.font_name, "Calibri");
        assert_eq!(config.font_size_pt, 11.0);
        assert_eq!(config.rule_width, 80);
    }

    #[test]
    fn test_render_config_partial_toml() {
        let config = RenderConfig::from_toml_str(
            r#"
font_name = "Arial"
rule_width = 40
"#,
        )
        .unwrap();
        assert_eq!(config.font_name, "Arial");
        assert_eq!(config.rule_width, 40);
        assert_eq!(config.code_font_name, "Courier New");
    }

    #[test]
    fn test_render_config_rejects_bad_types() {
        let err = RenderConfig::from_toml_str("rule_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConversionError::ConfigError(_)));
    }

    #[test]
    fn test_render_config_placeholder_color() {
        let config = RenderConfig::from_toml_str("placeholder_color = \"A0b1C2\"").unwrap();
        assert_eq!(config.placeholder_color, "A0b1C2");

        for bad in ["gray", "80808", "8080800", "#80808"] {
            let err = RenderConfig::from_toml_str(&format!("placeholder_color = {bad:?}"))
                .unwrap_err();
            assert!(matches!(err, ConversionError::ConfigError(_)), "{bad}");
        }
    }

    #[test]
    fn test_render_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RenderConfig::from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConversionError::InputNotFound { .. }));
    }
}
