//! Configuration types for plotnn diagram rendering.
//!
//! This module provides configuration structures that control how documents
//! are assembled and which external tools produce derived outputs. All types
//! implement [`serde::Deserialize`] for loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`DocumentConfig`] - Controls the document preamble.
//! - [`ToolchainConfig`] - Selects and parameterizes the external tools.
//! - [`StyleConfig`] - Overrides palette colors.
//!
//! # Example
//!
//! ```
//! # use plotnn::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [toolchain]
//!     dpi = 150
//!
//!     [style.colors]
//!     conv = "rgb:blue,1;white,2"
//! "#).unwrap();
//! assert_eq!(config.toolchain().dpi(), 150);
//! assert!(config.document().inline_styles());
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use plotnn_core::color::{PaletteColor, TikzColor};

use crate::export::{ConverterKind, LatexEngine};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Document assembly section.
    #[serde(default)]
    document: DocumentConfig,

    /// External toolchain section.
    #[serde(default)]
    toolchain: ToolchainConfig,

    /// Style section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(document: DocumentConfig, toolchain: ToolchainConfig, style: StyleConfig) -> Self {
        Self {
            document,
            toolchain,
            style,
        }
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }

    /// Returns the toolchain configuration.
    pub fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the document configuration.
    pub fn with_document(mut self, document: DocumentConfig) -> Self {
        self.document = document;
        self
    }

    /// Replaces the toolchain configuration.
    pub fn with_toolchain(mut self, toolchain: ToolchainConfig) -> Self {
        self.toolchain = toolchain;
        self
    }
}

/// Controls how the document preamble is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Embed the block style definitions in the document.
    inline_styles: bool,

    /// Emit the palette color definitions.
    include_colors: bool,

    /// Directory holding the style files when they are not inlined.
    styles_dir: Option<PathBuf>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            inline_styles: true,
            include_colors: true,
            styles_dir: None,
        }
    }
}

impl DocumentConfig {
    pub fn inline_styles(&self) -> bool {
        self.inline_styles
    }

    pub fn include_colors(&self) -> bool {
        self.include_colors
    }

    pub fn styles_dir(&self) -> Option<&Path> {
        self.styles_dir.as_deref()
    }

    pub fn with_inline_styles(mut self, inline_styles: bool) -> Self {
        self.inline_styles = inline_styles;
        self
    }

    pub fn with_include_colors(mut self, include_colors: bool) -> Self {
        self.include_colors = include_colors;
        self
    }

    pub fn with_styles_dir(mut self, styles_dir: impl Into<PathBuf>) -> Self {
        self.styles_dir = Some(styles_dir.into());
        self
    }
}

/// Selects and parameterizes the external tools.
///
/// Tools left unset are discovered on `PATH`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// LaTeX engine to use instead of discovery.
    latex: Option<LatexEngine>,

    /// PDF converter to use instead of discovery.
    converter: Option<ConverterKind>,

    /// Raster resolution for PNG output.
    dpi: u32,

    /// 1-based PDF page to convert.
    page: u32,

    /// Keep the `.tex` source next to a rendered PDF or image.
    keep_tex: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            latex: None,
            converter: None,
            dpi: 300,
            page: 1,
            keep_tex: true,
        }
    }
}

impl ToolchainConfig {
    pub fn latex(&self) -> Option<LatexEngine> {
        self.latex
    }

    pub fn converter(&self) -> Option<ConverterKind> {
        self.converter
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn keep_tex(&self) -> bool {
        self.keep_tex
    }

    pub fn with_latex(mut self, latex: LatexEngine) -> Self {
        self.latex = Some(latex);
        self
    }

    pub fn with_converter(mut self, converter: ConverterKind) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_keep_tex(mut self, keep_tex: bool) -> Self {
        self.keep_tex = keep_tex;
        self
    }
}

/// Palette overrides.
///
/// Entries that are not listed keep their built-in definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "StyleRecord")]
pub struct StyleConfig {
    colors: BTreeMap<PaletteColor, TikzColor>,
}

impl StyleConfig {
    /// Returns the configured override for `color`, if any.
    pub fn color(&self, color: PaletteColor) -> Option<&TikzColor> {
        self.colors.get(&color)
    }

    /// Overrides the definition of a palette color.
    pub fn with_color(mut self, color: PaletteColor, definition: TikzColor) -> Self {
        self.colors.insert(color, definition);
        self
    }
}

/// The `[style]` table as written, keyed by palette names.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleRecord {
    #[serde(default)]
    colors: BTreeMap<String, TikzColor>,
}

impl TryFrom<StyleRecord> for StyleConfig {
    type Error = String;

    fn try_from(record: StyleRecord) -> Result<Self, Self::Error> {
        let colors = record
            .colors
            .into_iter()
            .map(|(name, definition)| Ok((name.parse::<PaletteColor>()?, definition)))
            .collect::<Result<_, String>>()?;
        Ok(Self { colors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.document().inline_styles());
        assert!(config.document().include_colors());
        assert!(config.document().styles_dir().is_none());
        assert_eq!(config.toolchain().dpi(), 300);
        assert_eq!(config.toolchain().page(), 1);
        assert!(config.toolchain().keep_tex());
        assert!(config.toolchain().latex().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [document]
            inline_styles = false
            include_colors = false
            styles_dir = "/opt/layers"

            [toolchain]
            latex = "pdflatex"
            converter = "ghostscript"
            dpi = 72
            page = 2
            keep_tex = true

            [style.colors]
            pool = "rgb:red,2;black,1"
            "#,
        )
        .unwrap();

        assert!(!config.document().inline_styles());
        assert_eq!(config.document().styles_dir(), Some(Path::new("/opt/layers")));
        assert_eq!(config.toolchain().latex(), Some(LatexEngine::Pdflatex));
        assert_eq!(config.toolchain().converter(), Some(ConverterKind::Ghostscript));
        assert_eq!(config.toolchain().page(), 2);
        assert_eq!(
            config.style().color(PaletteColor::Pool).map(ToString::to_string),
            Some("rgb:red,2;black,1".to_string())
        );
        assert!(config.style().color(PaletteColor::Conv).is_none());
    }

    #[test]
    fn test_invalid_palette_color_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [style.colors]
            conv = "rgb:red"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_palette_name_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[style.colors]\nlstm = \"red\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[toolchain]\nresolution = 3\n");
        assert!(result.is_err());
    }
}
