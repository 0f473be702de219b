//! Error adapter for converting PlotnnError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Errors in a
//! diagram description point at the offending entry; missing external tools
//! come with an install hint.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use plotnn::{PlotnnError, export};

/// Adapter for an invalid diagram description.
pub struct DefinitionAdapter<'a> {
    message: &'a str,
    span: Option<&'a Range<usize>>,
    src: &'a str,
}

impl<'a> DefinitionAdapter<'a> {
    pub fn new(message: &'a str, span: Option<&'a Range<usize>>, src: &'a str) -> Self {
        Self { message, span, src }
    }
}

impl fmt::Debug for DefinitionAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for DefinitionAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.trim_end();
        write!(f, "Invalid diagram description: {message}")
    }
}

impl std::error::Error for DefinitionAdapter<'_> {}

impl MietteDiagnostic for DefinitionAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("plotnn::definition"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "each [[element]] needs a `kind` (input, conv, conv_conv_relu, pool, unpool, \
             conv_res, conv_softmax, softmax, sum, connection, skip, two_conv_pool, unconv, res)",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label =
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span_to_miette(span));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`PlotnnError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a PlotnnError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PlotnnError::Io(_) => "plotnn::io",
            PlotnnError::Definition { .. } => "plotnn::definition",
            PlotnnError::Config(_) => "plotnn::config",
            PlotnnError::Export(err) => match err {
                export::Error::ToolNotFound { .. } => "plotnn::export::tool_not_found",
                export::Error::ToolFailed { .. } => "plotnn::export::tool_failed",
                export::Error::MissingOutput { .. } => "plotnn::export::missing_output",
                export::Error::UnsupportedFormat(_) => "plotnn::export::unsupported_format",
                export::Error::Io(_) => "plotnn::export::io",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PlotnnError::Config(_) => {
                "configuration files accept the [document], [toolchain] and [style.colors] sections"
            }
            PlotnnError::Export(export::Error::ToolNotFound { purpose, .. }) => {
                install_hint(purpose)
            }
            PlotnnError::Export(
                export::Error::ToolFailed { .. } | export::Error::MissingOutput { .. },
            ) => "run with `--format tex` and compile the document by hand to see the full log",
            PlotnnError::Export(export::Error::UnsupportedFormat(_)) => {
                "supported formats are tex, pdf, png and svg"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn install_hint(purpose: &str) -> &'static str {
    match purpose {
        "LaTeX compiler" => {
            "install a TeX distribution providing latexmk or pdflatex (TeX Live, MiKTeX)"
        }
        "SVG converter" => "install poppler-utils, which provides pdftocairo",
        _ => "install poppler-utils, ImageMagick or Ghostscript",
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// An invalid description with source location information.
    Definition(DefinitionAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Definition(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Definition(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Definition(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Definition(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Definition(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Definition(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a byte range to a miette [`SourceSpan`].
fn span_to_miette(span: &Range<usize>) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

/// Convert a [`PlotnnError`] into a list of reportable errors.
pub fn to_reportables(err: &PlotnnError) -> Vec<Reportable<'_>> {
    match err {
        PlotnnError::Definition { message, span, src } => vec![Reportable::Definition(
            DefinitionAdapter::new(message, span.as_ref(), src),
        )],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_error_points_at_span() {
        let err = PlotnnError::new_definition_error(
            "unknown variant `lstm`",
            Some(0..11),
            "[[element]]\nkind = \"lstm\"\n",
        );

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let Reportable::Definition(d) = &reportables[0] else {
            panic!("Expected Definition");
        };
        assert_eq!(
            d.to_string(),
            "Invalid diagram description: unknown variant `lstm`"
        );
        let labels: Vec<_> = d.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 0);
        assert_eq!(labels[0].len(), 11);
    }

    #[test]
    fn test_definition_error_without_span_has_no_labels() {
        let err = PlotnnError::new_definition_error("bad", None, "");
        let reportables = to_reportables(&err);
        assert!(reportables[0].labels().is_none());
        assert!(reportables[0].source_code().is_some());
    }

    #[test]
    fn test_tool_not_found_has_install_hint() {
        let err = PlotnnError::Export(export::Error::ToolNotFound {
            purpose: "SVG converter",
            candidates: vec!["pdftocairo"],
        });

        let reportables = to_reportables(&err);
        let Reportable::Error(e) = &reportables[0] else {
            panic!("Expected Error");
        };
        assert_eq!(
            e.code().map(|c| c.to_string()).as_deref(),
            Some("plotnn::export::tool_not_found")
        );
        assert!(e.help().unwrap().to_string().contains("pdftocairo"));
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = PlotnnError::Io(std::io::Error::other("disk full"));
        let reportables = to_reportables(&err);

        assert_eq!(reportables[0].to_string(), "I/O error: disk full");
        assert!(reportables[0].help().is_none());
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()).as_deref(),
            Some("plotnn::io")
        );
    }
}
