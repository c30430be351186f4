//! Archviz CLI library
//!
//! Renders the "Vulnerable API protected" diagram with the archviz library.

pub mod diagram;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::PathBuf;

use log::info;

use archviz::ArchvizError;

/// Run the archviz CLI application
///
/// Returns the path of the written diagram file.
///
/// # Errors
///
/// Returns an [`ArchvizError`] if the configuration cannot be loaded or the
/// diagram cannot be defined, rendered or written.
pub fn run(args: &Args) -> Result<PathBuf, ArchvizError> {
    info!(
        output_dir = args.output_dir.display().to_string(),
        format:% = args.format;
        "Rendering diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let path = diagram::builder()
        .with_config(app_config)
        .with_format(args.format)
        .render_in(&args.output_dir, diagram::define)?;

    info!(path = path.display().to_string(); "Diagram exported successfully");
    Ok(path)
}
