//! Writing rendered documents and deriving PDF/PNG/SVG from them.
//!
//! Every output format has an [`Exporter`]. The TeX exporter only writes
//! files; the others shell out to a LaTeX engine and, for raster and vector
//! images, to a PDF converter. Tools are looked up on `PATH` by
//! [`Toolchain`] unless the configuration pins one.

mod convert;
mod latex;
mod toolchain;

pub use convert::{ConverterKind, FormatConverter, ImageFormat};
pub use latex::{LatexCompiler, LatexEngine};
pub use toolchain::{Invocation, Toolchain};

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::info;
use thiserror::Error;

use crate::render::TexDocument;

/// Errors raised while writing or converting documents.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No {purpose} found (tried {})", .candidates.join(", "))]
    ToolNotFound {
        purpose: &'static str,
        candidates: Vec<&'static str>,
    },

    #[error("`{tool}` failed with {status}{}", format_output(.output))]
    ToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    #[error("`{tool}` finished but did not produce {}", .path.display())]
    MissingOutput { tool: String, path: PathBuf },

    #[error("Unsupported output format `{0}`, expected one of: tex, pdf, png, svg")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn format_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(":\n{output}")
    }
}

/// The formats a diagram can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tex,
    Pdf,
    Png,
    Svg,
}

impl OutputFormat {
    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Returns the file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tex => "tex",
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// Checks whether producing this format needs external tools
    pub fn needs_toolchain(self) -> bool {
        self != Self::Tex
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tex" => Ok(Self::Tex),
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Writes a rendered document to a file in some output format.
pub trait Exporter {
    /// Exports `document` to `output` and returns the written path.
    fn export(&self, document: &TexDocument, output: &Path) -> Result<PathBuf, Error>;
}

/// Writes the LaTeX source itself.
#[derive(Debug, Default)]
pub struct TexExporter;

impl Exporter for TexExporter {
    fn export(&self, document: &TexDocument, output: &Path) -> Result<PathBuf, Error> {
        let dir = ensure_parent(output)?;
        fs::write(output, document.text())?;
        document.styles().materialize(&dir)?;

        info!(path = output.display().to_string(); "LaTeX source written");
        Ok(output.to_path_buf())
    }
}

/// Compiles the document to PDF.
#[derive(Debug)]
pub struct PdfExporter {
    compiler: LatexCompiler,
    keep_tex: bool,
}

impl PdfExporter {
    pub fn new(compiler: LatexCompiler, keep_tex: bool) -> Self {
        Self { compiler, keep_tex }
    }
}

impl Exporter for PdfExporter {
    fn export(&self, document: &TexDocument, output: &Path) -> Result<PathBuf, Error> {
        if self.keep_tex {
            save_source(document, output)?;
        }
        self.compiler.compile(document, output)
    }
}

/// Compiles the document to PDF in a scratch directory, then converts one
/// page to PNG or SVG.
#[derive(Debug)]
pub struct ImageExporter {
    compiler: LatexCompiler,
    converter: FormatConverter,
    format: ImageFormat,
    dpi: u32,
    page: u32,
    keep_tex: bool,
}

impl ImageExporter {
    pub fn new(
        compiler: LatexCompiler,
        converter: FormatConverter,
        format: ImageFormat,
        dpi: u32,
        page: u32,
    ) -> Self {
        Self {
            compiler,
            converter,
            format,
            dpi,
            page,
            keep_tex: false,
        }
    }

    /// Also writes the `.tex` source next to the image.
    pub fn with_keep_tex(mut self, keep_tex: bool) -> Self {
        self.keep_tex = keep_tex;
        self
    }
}

impl Exporter for ImageExporter {
    fn export(&self, document: &TexDocument, output: &Path) -> Result<PathBuf, Error> {
        if self.keep_tex {
            save_source(document, output)?;
        }
        let scratch = tempfile::tempdir()?;
        let pdf = self
            .compiler
            .compile(document, &scratch.path().join("diagram.pdf"))?;
        self.converter
            .convert(&pdf, output, self.format, self.dpi, self.page)
    }
}

/// Writes the LaTeX source next to a derived output, as `<stem>.tex`.
fn save_source(document: &TexDocument, output: &Path) -> Result<PathBuf, Error> {
    TexExporter.export(document, &output.with_extension("tex"))
}

/// Creates the parent directory of `path` and returns it.
pub(crate) fn ensure_parent(path: &Path) -> io::Result<PathBuf> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(parent.to_path_buf())
        }
        _ => Ok(PathBuf::from(".")),
    }
}
