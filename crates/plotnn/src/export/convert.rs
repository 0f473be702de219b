//! Converting a compiled PDF page to PNG or SVG.

use std::{
    ffi::OsString,
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use super::{Error, Invocation, Toolchain, ensure_parent};

/// Image formats a PDF page can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A family of PDF converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// `pdftocairo` from poppler
    Pdftocairo,
    /// ImageMagick, as `magick` or the older `convert`
    Imagemagick,
    /// Ghostscript `gs`
    Ghostscript,
}

impl ConverterKind {
    /// Converters in discovery order.
    pub const ALL: [ConverterKind; 3] = [Self::Pdftocairo, Self::Imagemagick, Self::Ghostscript];

    /// Executable names, in the order they are tried.
    pub fn programs(self) -> &'static [&'static str] {
        match self {
            Self::Pdftocairo => &["pdftocairo"],
            Self::Imagemagick => &["magick", "convert"],
            Self::Ghostscript => &["gs"],
        }
    }

    /// Only `pdftocairo` can write SVG.
    pub fn supports(self, format: ImageFormat) -> bool {
        match format {
            ImageFormat::Png => true,
            ImageFormat::Svg => self == Self::Pdftocairo,
        }
    }
}

/// Converts PDF pages with the first available (or the configured) tool.
#[derive(Debug, Clone)]
pub struct FormatConverter {
    toolchain: Toolchain,
    kind: Option<ConverterKind>,
}

impl FormatConverter {
    /// Creates a converter; `kind` pins the tool instead of discovering one.
    pub fn new(toolchain: Toolchain, kind: Option<ConverterKind>) -> Self {
        Self { toolchain, kind }
    }

    /// Finds a converter able to write `format`.
    pub fn resolve(&self, format: ImageFormat) -> Result<(ConverterKind, PathBuf), Error> {
        let kinds: Vec<ConverterKind> = match self.kind {
            Some(kind) => vec![kind],
            None => ConverterKind::ALL.to_vec(),
        };
        let usable: Vec<ConverterKind> = kinds
            .into_iter()
            .filter(|kind| kind.supports(format))
            .collect();

        for &kind in &usable {
            if let Some((_, path)) = self.toolchain.find_first(kind.programs()) {
                return Ok((kind, path));
            }
        }

        let mut candidates: Vec<&'static str> = usable
            .iter()
            .flat_map(|kind| kind.programs().iter().copied())
            .collect();
        if candidates.is_empty() {
            candidates = ConverterKind::Pdftocairo.programs().to_vec();
        }
        Err(Error::ToolNotFound {
            purpose: match format {
                ImageFormat::Png => "PNG converter",
                ImageFormat::Svg => "SVG converter",
            },
            candidates,
        })
    }

    /// Builds the command converting page `page` (1-based) of `pdf`.
    ///
    /// `pdftocairo` appends the extension itself when writing PNG, so it is
    /// given the output path without one; see [`FormatConverter::produced_path`].
    pub fn plan(
        kind: ConverterKind,
        program: &Path,
        pdf: &Path,
        output: &Path,
        format: ImageFormat,
        dpi: u32,
        page: u32,
    ) -> Invocation {
        let invocation = Invocation::new(program);
        match kind {
            ConverterKind::Pdftocairo => {
                let target = match format {
                    ImageFormat::Png => output.with_extension(""),
                    ImageFormat::Svg => output.to_path_buf(),
                };
                invocation
                    .arg(format!("-{format}"))
                    .args(["-r".to_string(), dpi.to_string()])
                    .args(["-f".to_string(), page.to_string()])
                    .args(["-l".to_string(), page.to_string()])
                    .arg("-singlefile")
                    .arg(pdf)
                    .arg(target)
            }
            ConverterKind::Imagemagick => {
                let mut source = pdf.as_os_str().to_os_string();
                source.push(format!("[{}]", page.saturating_sub(1)));
                // An explicit coder prefix keeps extensionless outputs from
                // being written as PDF.
                let mut target = OsString::from(format!("{format}:"));
                target.push(output);
                invocation
                    .args(["-density".to_string(), dpi.to_string()])
                    .arg(source)
                    .args(["-quality", "100"])
                    .arg(target)
            }
            ConverterKind::Ghostscript => {
                let mut output_file = OsString::from("-sOutputFile=");
                output_file.push(output);
                invocation
                    .args(["-dSAFER", "-dBATCH", "-dNOPAUSE", "-sDEVICE=pngalpha"])
                    .arg(format!("-r{dpi}"))
                    .arg(format!("-dFirstPage={page}"))
                    .arg(format!("-dLastPage={page}"))
                    .arg(output_file)
                    .arg(pdf)
            }
        }
    }

    /// Where the tool actually writes its result for `output`.
    pub fn produced_path(kind: ConverterKind, output: &Path, format: ImageFormat) -> PathBuf {
        match (kind, format) {
            (ConverterKind::Pdftocairo, ImageFormat::Png) => output.with_extension("png"),
            _ => output.to_path_buf(),
        }
    }

    /// Converts one page of `pdf` into `output`.
    pub fn convert(
        &self,
        pdf: &Path,
        output: &Path,
        format: ImageFormat,
        dpi: u32,
        page: u32,
    ) -> Result<PathBuf, Error> {
        let (kind, program) = self.resolve(format)?;
        debug!(converter:? = kind, program = program.display().to_string(); "Converter selected");

        ensure_parent(output)?;
        let invocation = Self::plan(kind, &program, pdf, output, format, dpi, page);
        invocation.run()?;

        let produced = Self::produced_path(kind, output, format);
        if !produced.is_file() {
            return Err(Error::MissingOutput {
                tool: invocation.tool_name(),
                path: produced,
            });
        }
        if produced != output {
            fs::rename(&produced, output)?;
        }

        info!(path = output.display().to_string(), format = format.extension(); "Image generated");
        Ok(output.to_path_buf())
    }
}
