//! Error types for archviz operations.
//!
//! [`ArchvizError`] is the single error type returned by the public API. Each
//! variant corresponds to one stage of the pipeline: definition, structure,
//! layout, export and the final write.

use std::io;

use thiserror::Error;

use archviz_core::semantic;

/// The main error type for archviz operations.
#[derive(Debug, Error)]
pub enum ArchvizError {
    #[error("unknown node category `{0}`")]
    UnknownCategory(String),

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("graph attribute error: {0}")]
    Attribute(String),

    #[error("style error: {0}")]
    Style(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<crate::export::Error> for ArchvizError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<semantic::Error> for ArchvizError {
    fn from(error: semantic::Error) -> Self {
        match error {
            semantic::Error::UnknownCategory(tag) => Self::UnknownCategory(tag),
            semantic::Error::UnknownAttribute(_) | semantic::Error::InvalidAttribute { .. } => {
                Self::Attribute(error.to_string())
            }
            semantic::Error::InvalidStyle(_)
            | semantic::Error::InvalidDirection(_)
            | semantic::Error::InvalidColor(_) => Self::Style(error.to_string()),
        }
    }
}
