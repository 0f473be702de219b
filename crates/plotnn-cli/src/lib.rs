//! CLI logic for the plotnn diagram tool.
//!
//! This module contains the core CLI logic: reading a diagram description,
//! rendering it in the requested format, and opening the result.

pub mod error_adapter;

mod args;
mod config;
mod opener;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use plotnn::{Diagram, DiagramRenderer, PlotnnError, export::OutputFormat};

/// Run the plotnn CLI application
///
/// This function parses the input description, renders it in the requested
/// format and, unless disabled, opens PDF and image results in the system
/// viewer.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PlotnnError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid diagram descriptions
/// - Missing or failing external tools
pub fn run(args: &Args) -> Result<(), PlotnnError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(dpi) = args.dpi {
        let toolchain = app_config.toolchain().clone().with_dpi(dpi);
        app_config = app_config.with_toolchain(toolchain);
    }

    let source = fs::read_to_string(&args.input)?;
    let diagram = Diagram::from_toml(&source)?;

    let (output, format) = resolve_output(args);
    let renderer = DiagramRenderer::new(app_config);
    let written = renderer.render(&diagram, &output, format)?;

    info!(
        output_file = written.display().to_string(),
        format = format.to_string();
        "Diagram exported successfully"
    );

    if format.needs_toolchain() && !args.no_open {
        if let Err(err) = opener::open(&written) {
            warn!(path = written.display().to_string(), err:% = err; "Could not open viewer");
        }
    }

    Ok(())
}

/// Picks the output path and format.
///
/// An explicit format wins, then the output file's extension, then PDF. A
/// missing output path is derived from the input path.
fn resolve_output(args: &Args) -> (PathBuf, OutputFormat) {
    let output = args.output.as_ref().map(PathBuf::from);
    let format = args
        .format
        .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or(OutputFormat::Pdf);
    let output = match output {
        Some(output) => output,
        None => Path::new(&args.input).with_extension(format.extension()),
    };
    (output, format)
}
