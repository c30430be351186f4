//! Error adapter for converting ArchvizError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::{fmt, io};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use archviz::{ArchvizError, semantic::NodeCategory};

/// Adapter for [`ArchvizError`] variants.
///
/// The diagram is defined in code, so there is no source text to point at;
/// each variant gets a diagnostic code and, where it helps, a hint.
pub struct ErrorAdapter<'a>(pub &'a ArchvizError);

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
            ArchvizError::UnknownCategory(_) => "archviz::unknown_category",
            ArchvizError::InvalidHandle(_) => "archviz::invalid_handle",
            ArchvizError::Attribute(_) => "archviz::attribute",
            ArchvizError::Style(_) => "archviz::style",
            ArchvizError::Graph(_) => "archviz::graph",
            ArchvizError::Layout(_) => "archviz::layout",
            ArchvizError::Export(_) => "archviz::export",
            ArchvizError::Io(_) => "archviz::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ArchvizError::UnknownCategory(_) => format!(
                "known categories: {}",
                NodeCategory::ALL
                    .iter()
                    .map(|category| category.tag())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ArchvizError::Attribute(_) => {
                "supported graph attributes: pad, nodesep, ranksep, splines, bgcolor, fontname, fontsize, fontcolor"
                    .to_string()
            }
            ArchvizError::Io(err) => match err.kind() {
                io::ErrorKind::NotFound => "check that the path exists".to_string(),
                io::ErrorKind::InvalidData => {
                    "the configuration file must be TOML with optional [layout] and [style] sections"
                        .to_string()
                }
                _ => "check that the output directory is writable".to_string(),
            },
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

/// Wrap an [`ArchvizError`] for rendering by miette.
pub fn to_reportable(err: &ArchvizError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
