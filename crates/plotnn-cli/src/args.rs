//! Command-line argument definitions for the plotnn CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, and logging verbosity.

use clap::Parser;

use plotnn::export::OutputFormat;

/// Command-line arguments for the plotnn diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the diagram description (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file [default: input path with the format's extension]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (tex, pdf, png, svg) [default: from the output extension, else pdf]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Resolution for PNG output, overriding the configuration
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Do not open the result in the system viewer
    #[arg(long)]
    pub no_open: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::try_parse_from([
            "plotnn",
            "net.toml",
            "-o",
            "out/net.svg",
            "-f",
            "SVG",
            "--dpi",
            "150",
            "--no-open",
        ])
        .unwrap();

        assert_eq!(args.input, "net.toml");
        assert_eq!(args.output.as_deref(), Some("out/net.svg"));
        assert_eq!(args.format, Some(OutputFormat::Svg));
        assert_eq!(args.dpi, Some(150));
        assert!(args.no_open);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["plotnn", "net.toml", "-f", "gif"]).is_err());
    }
}
