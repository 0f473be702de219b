//! Static document pieces and the bundled style files.
//!
//! A document is assembled as header, palette definitions, begin block,
//! fragments and end block. The header either inlines the bundled style
//! files or imports them from a directory, see [`StyleSource`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;

use plotnn_core::color::PaletteColor;

use crate::config::{DocumentConfig, StyleConfig};

const INIT_TEX: &str = include_str!("../layers/init.tex");
const BOX_STY: &str = include_str!("../layers/Box.sty");
const RIGHT_BANDED_BOX_STY: &str = include_str!("../layers/RightBandedBox.sty");
const BALL_STY: &str = include_str!("../layers/Ball.sty");

/// Directory name used for bundled styles written next to a document.
pub const BUNDLED_STYLES_DIR: &str = "layers";

const TIKZ_LIBRARIES: &str = r"\usetikzlibrary{positioning}
\usetikzlibrary{3d}
\usetikzlibrary{calc}
";

const DOCUMENT_CLASS: &str = r"\documentclass[border=8pt, multi, tikz]{standalone}
";

const DOCUMENT_BEGIN: &str = r"
\newcommand{\copymidarrow}{\tikz \draw[-Stealth,line width=0.8mm,draw={rgb:blue,4;red,1;green,1;black,3}] (-0.3,0) -- ++(0.3,0);}

\begin{document}
\begin{tikzpicture}
\tikzstyle{connection}=[ultra thick,every node/.style={sloped,allow upside down},draw=\edgecolor,opacity=0.7]
\tikzstyle{copyconnection}=[ultra thick,every node/.style={sloped,allow upside down},draw={rgb:blue,4;red,1;green,1;black,3},opacity=0.7]
";

const DOCUMENT_END: &str = r"
\end{tikzpicture}
\end{document}
";

/// Where the block style definitions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// Definitions are embedded in the document preamble
    Inline,
    /// Definitions are imported from an existing directory
    Directory(PathBuf),
    /// The bundled files are written to a `layers/` directory next to the document
    Bundled,
}

impl StyleSource {
    /// Picks the style source described by the document configuration.
    pub fn from_config(config: &DocumentConfig) -> Self {
        match (config.inline_styles(), config.styles_dir()) {
            (true, _) => Self::Inline,
            (false, Some(dir)) => Self::Directory(dir.to_path_buf()),
            (false, None) => Self::Bundled,
        }
    }

    /// Directory that must be on the TeX search path when compiling a
    /// document stored in `workdir`.
    pub fn search_dir(&self, workdir: &Path) -> Option<PathBuf> {
        match self {
            Self::Inline => None,
            Self::Directory(dir) => Some(dir.clone()),
            Self::Bundled => Some(workdir.join(BUNDLED_STYLES_DIR)),
        }
    }

    /// Writes the bundled style files into `workdir` when this source needs them.
    pub fn materialize(&self, workdir: &Path) -> io::Result<()> {
        if *self == Self::Bundled {
            write_bundled_styles(&workdir.join(BUNDLED_STYLES_DIR))?;
        }
        Ok(())
    }
}

/// The bundled style files as `(file name, contents)` pairs.
pub fn bundled_styles() -> [(&'static str, &'static str); 4] {
    [
        ("init.tex", INIT_TEX),
        ("Box.sty", BOX_STY),
        ("RightBandedBox.sty", RIGHT_BANDED_BOX_STY),
        ("Ball.sty", BALL_STY),
    ]
}

/// Writes the bundled style files into `dir`, creating it if needed.
pub fn write_bundled_styles(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for (file_name, contents) in bundled_styles() {
        fs::write(dir.join(file_name), contents)?;
    }
    debug!(dir = dir.display().to_string(); "Bundled styles written");
    Ok(())
}

/// Returns the preamble for the given style source.
pub(crate) fn header(styles: &StyleSource) -> String {
    match styles {
        StyleSource::Inline => {
            let mut header = String::from(DOCUMENT_CLASS);
            header.push_str(TIKZ_LIBRARIES);
            header.push_str(&inline_styles());
            header
        }
        StyleSource::Directory(dir) => external_header(&tex_path(dir)),
        StyleSource::Bundled => external_header(BUNDLED_STYLES_DIR),
    }
}

fn external_header(dir: &str) -> String {
    let dir = dir.trim_end_matches('/');
    format!(
        "{DOCUMENT_CLASS}\\usepackage{{import}}\n\\subimport{{{dir}/}}{{init}}\n{TIKZ_LIBRARIES}"
    )
}

/// The style files with package loading lines removed.
fn inline_styles() -> String {
    let init = INIT_TEX
        .lines()
        .filter(|line| !line.trim_start().starts_with(r"\usepackage"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut parts = vec![init];
    for sty in [BALL_STY, BOX_STY, RIGHT_BANDED_BOX_STY] {
        parts.push(
            sty.lines()
                .filter(|line| !line.trim_start().starts_with(r"\ProvidesPackage"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    parts.join("\n") + "\n"
}

/// Returns the palette definitions, applying configured overrides.
pub(crate) fn color_definitions(style: &StyleConfig) -> String {
    let mut out = String::from("\n");
    for color in PaletteColor::ALL {
        let definition = style
            .color(color)
            .map(|c| c.to_string())
            .unwrap_or_else(|| color.default_definition().to_string());
        out.push_str(&format!("\\def\\{}{{{definition}}}\n", color.macro_name()));
    }
    out
}

pub(crate) fn document_begin() -> &'static str {
    DOCUMENT_BEGIN
}

pub(crate) fn document_end() -> &'static str {
    DOCUMENT_END
}

/// Formats a path the way TeX expects it, with forward slashes.
pub(crate) fn tex_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_header_strips_package_lines() {
        let header = header(&StyleSource::Inline);

        assert!(header.starts_with(r"\documentclass[border=8pt, multi, tikz]{standalone}"));
        assert!(!header.contains(r"\usepackage"));
        assert!(!header.contains(r"\ProvidesPackage"));
        assert!(header.contains(r"\tikzset{Box/.pic="));
        assert!(header.contains(r"\tikzset{RightBandedBox/.pic="));
        assert!(header.contains(r"\tikzset{Ball/.pic="));
        assert!(header.contains(r"\def\edgecolor"));
    }

    #[test]
    fn test_external_header_imports_directory() {
        let header = header(&StyleSource::Directory(PathBuf::from("/opt/styles/")));
        assert!(header.contains("\\usepackage{import}\n\\subimport{/opt/styles/}{init}\n"));

        let bundled = super::header(&StyleSource::Bundled);
        assert!(bundled.contains(r"\subimport{layers/}{init}"));
    }

    #[test]
    fn test_color_definitions_defaults() {
        let colors = color_definitions(&StyleConfig::default());
        assert!(colors.contains("\\def\\ConvColor{rgb:yellow,5;red,2.5;white,5}\n"));
        assert!(colors.contains("\\def\\SumColor{rgb:blue,5;green,15}\n"));
        assert_eq!(colors.matches("\\def\\").count(), PaletteColor::ALL.len());
    }

    #[test]
    fn test_style_source_from_config() {
        let config = DocumentConfig::default();
        assert_eq!(StyleSource::from_config(&config), StyleSource::Inline);

        let config = DocumentConfig::default().with_inline_styles(false);
        assert_eq!(StyleSource::from_config(&config), StyleSource::Bundled);
        assert_eq!(
            StyleSource::Bundled.search_dir(Path::new("/tmp/build")),
            Some(PathBuf::from("/tmp/build/layers"))
        );
        assert_eq!(StyleSource::Inline.search_dir(Path::new("/tmp/build")), None);
    }

    #[test]
    fn test_write_bundled_styles() {
        let dir = tempfile::tempdir().unwrap();
        StyleSource::Bundled.materialize(dir.path()).unwrap();

        for (file_name, contents) in bundled_styles() {
            let written = fs::read_to_string(dir.path().join("layers").join(file_name)).unwrap();
            assert_eq!(written, contents);
        }
    }
}
