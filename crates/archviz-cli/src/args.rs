//! Command-line argument definitions for the archviz CLI.
//!
//! Every argument is optional: without flags the diagram is written as SVG
//! into the current directory.

use std::path::PathBuf;

use clap::Parser;

use archviz::OutputFormat;

/// Command-line arguments for the archviz diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory the diagram file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format (svg, dot)
    #[arg(short, long, default_value = "svg")]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::try_parse_from(["archviz"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Svg);
        assert!(args.config.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "archviz",
            "--output-dir",
            "out",
            "--format",
            "dot",
            "--config",
            "archviz.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.format, OutputFormat::Dot);
        assert_eq!(args.config.as_deref(), Some("archviz.toml"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["archviz", "--format", "png"]).is_err());
    }
}
