//! plotnn - Neural-network architecture diagrams as LaTeX/TikZ.
//!
//! A [`Diagram`] is an ordered list of block descriptors. Rendering turns it
//! into a standalone TikZ document; exporting optionally compiles that
//! document to PDF and converts it to PNG or SVG with external tools.

pub mod config;
pub mod export;

mod error;
mod render;
mod template;

pub use plotnn_core::{color, element, geometry};

pub use error::PlotnnError;
pub use render::{TexDocument, TexRenderer};
pub use template::{StyleSource, write_bundled_styles};

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use config::AppConfig;
use element::Element;
use export::{
    Exporter, FormatConverter, ImageExporter, ImageFormat, LatexCompiler, OutputFormat,
    PdfExporter, TexExporter, Toolchain,
};

/// An ordered sequence of diagram elements.
///
/// Elements are rendered in insertion order. Names are not checked, so a
/// connection may refer to a block that does not exist.
///
/// # Examples
///
/// ```rust,no_run
/// use plotnn::{
///     Diagram,
///     element::{Connection, Conv, Pool},
///     geometry::Placement,
/// };
///
/// let diagram = Diagram::new()
///     .add(Conv::new("conv1").with_filters(32))
///     .add(Pool::new("pool1").with_to(Placement::after("conv1")))
///     .add(Connection::new("conv1", "pool1"));
///
/// diagram.save_tex("out/net.tex").expect("Failed to write diagram");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    elements: Vec<Element>,
}

/// The on-disk form of a diagram description.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DiagramRecord {
    #[serde(default)]
    element: Vec<Element>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return the diagram for chaining.
    pub fn add(mut self, element: impl Into<Element>) -> Self {
        self.push(element);
        self
    }

    /// Append an element in place.
    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Returns the elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Parse a diagram description.
    ///
    /// The description is a TOML document holding an `[[element]]` array;
    /// every entry names its type with a `kind` key.
    ///
    /// # Errors
    ///
    /// Returns [`PlotnnError::Definition`] carrying the source and the span
    /// of the offending entry when the description is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// let diagram = plotnn::Diagram::from_toml(r#"
    ///     [[element]]
    ///     kind = "conv"
    ///     name = "conv1"
    ///
    ///     [[element]]
    ///     kind = "pool"
    ///     name = "pool1"
    ///     to = "(conv1-east)"
    /// "#).unwrap();
    /// assert_eq!(diagram.len(), 2);
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, PlotnnError> {
        let record: DiagramRecord = toml::from_str(source).map_err(|err| {
            PlotnnError::new_definition_error(err.message(), err.span(), source)
        })?;

        debug!(elements = record.element.len(); "Diagram description parsed");
        Ok(Self {
            elements: record.element,
        })
    }

    /// Render the complete document with default settings.
    pub fn to_tex(&self) -> String {
        DiagramRenderer::default().render_tex(self).into_text()
    }

    /// Write the document to `path` with default settings.
    pub fn save_tex(&self, path: impl AsRef<Path>) -> Result<PathBuf, PlotnnError> {
        DiagramRenderer::default().save_tex(self, path)
    }

    /// Compile the document to a PDF at `path`, saving the `.tex` next to it.
    pub fn render_pdf(&self, path: impl AsRef<Path>) -> Result<PathBuf, PlotnnError> {
        DiagramRenderer::default().render_pdf(self, path)
    }

    /// Render the first page to a PNG at `path`.
    pub fn render_png(&self, path: impl AsRef<Path>, dpi: u32) -> Result<PathBuf, PlotnnError> {
        DiagramRenderer::default().render_png(self, path, dpi)
    }

    /// Render the first page to an SVG at `path`.
    pub fn render_svg(&self, path: impl AsRef<Path>) -> Result<PathBuf, PlotnnError> {
        DiagramRenderer::default().render_svg(self, path)
    }
}

impl Extend<Element> for Diagram {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl FromIterator<Element> for Diagram {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Renders and exports diagrams with a given configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use plotnn::{
///     Diagram, DiagramRenderer,
///     config::{AppConfig, ToolchainConfig},
///     element::Conv,
///     export::OutputFormat,
/// };
///
/// let config = AppConfig::default().with_toolchain(ToolchainConfig::default().with_dpi(150));
/// let renderer = DiagramRenderer::new(config);
///
/// let diagram = Diagram::new().add(Conv::new("conv1"));
/// renderer
///     .render(&diagram, "net.png", OutputFormat::Png)
///     .expect("Failed to render diagram");
/// ```
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    config: AppConfig,
    toolchain: Toolchain,
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramRenderer {
    /// Create a renderer that looks up external tools on `PATH`.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            toolchain: Toolchain::from_env(),
        }
    }

    /// Replace the toolchain used to find external tools.
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render the complete document.
    pub fn render_tex(&self, diagram: &Diagram) -> TexDocument {
        TexRenderer::new(&self.config).document(diagram.elements())
    }

    /// Write the document to `path`.
    pub fn save_tex(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, PlotnnError> {
        self.render(diagram, path, OutputFormat::Tex)
    }

    /// Compile the document to a PDF at `path`.
    pub fn render_pdf(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, PlotnnError> {
        self.render(diagram, path, OutputFormat::Pdf)
    }

    /// Render a PNG at `path` with the given resolution.
    pub fn render_png(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
        dpi: u32,
    ) -> Result<PathBuf, PlotnnError> {
        self.export(diagram, path.as_ref(), OutputFormat::Png, dpi)
    }

    /// Render an SVG at `path`.
    pub fn render_svg(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, PlotnnError> {
        self.render(diagram, path, OutputFormat::Svg)
    }

    /// Produce `path` in the given format.
    ///
    /// # Errors
    ///
    /// Returns `PlotnnError` for:
    /// - File I/O errors
    /// - Missing external tools
    /// - External tools exiting with a failure
    pub fn render(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<PathBuf, PlotnnError> {
        let dpi = self.config.toolchain().dpi();
        self.export(diagram, path.as_ref(), format, dpi)
    }

    fn export(
        &self,
        diagram: &Diagram,
        path: &Path,
        format: OutputFormat,
        dpi: u32,
    ) -> Result<PathBuf, PlotnnError> {
        info!(
            elements = diagram.len(),
            format = format.to_string(),
            path = path.display().to_string();
            "Rendering diagram"
        );

        let document = self.document_for(diagram, format)?;
        let written = self.exporter(format, dpi).export(&document, path)?;

        info!(path = written.display().to_string(); "Diagram exported successfully");
        Ok(written)
    }

    /// Render the document for `format`.
    ///
    /// Compilation happens in a scratch directory, so a relative styles
    /// directory is made absolute first.
    fn document_for(
        &self,
        diagram: &Diagram,
        format: OutputFormat,
    ) -> Result<TexDocument, PlotnnError> {
        let styles_dir = self.config.document().styles_dir();
        match styles_dir {
            Some(dir) if format.needs_toolchain() && dir.is_relative() => {
                let absolute = std::path::absolute(dir)?;
                debug!(styles_dir = absolute.display().to_string(); "Resolved styles directory");
                let config = self
                    .config
                    .clone()
                    .with_document(self.config.document().clone().with_styles_dir(absolute));
                Ok(TexRenderer::new(&config).document(diagram.elements()))
            }
            _ => Ok(self.render_tex(diagram)),
        }
    }

    fn exporter(&self, format: OutputFormat, dpi: u32) -> Box<dyn Exporter> {
        let toolchain = self.config.toolchain();
        let compiler = LatexCompiler::new(self.toolchain.clone(), toolchain.latex());
        let converter = FormatConverter::new(self.toolchain.clone(), toolchain.converter());

        let image = |image_format| {
            ImageExporter::new(
                compiler.clone(),
                converter.clone(),
                image_format,
                dpi,
                toolchain.page(),
            )
            .with_keep_tex(toolchain.keep_tex())
        };

        match format {
            OutputFormat::Tex => Box::new(TexExporter),
            OutputFormat::Pdf => Box::new(PdfExporter::new(compiler.clone(), toolchain.keep_tex())),
            OutputFormat::Png => Box::new(image(ImageFormat::Png)),
            OutputFormat::Svg => Box::new(image(ImageFormat::Svg)),
        }
    }
}
