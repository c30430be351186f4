//! Export of rendered diagrams.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! Scope closure
//!     ↓ define
//! Semantic Diagram
//!     ↓ structure
//! DiagramGraph
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! String written by `output`
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: the laid-out drawing, via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - [`dot`]: a Graphviz description of the semantic diagram; it does not need
//!   a layout, so it is driven directly by [`dot::Dot::export_diagram`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`ArchvizError::Export`] at the crate boundary.
//!
//! [`ArchvizError::Export`]: crate::ArchvizError::Export

pub mod dot;
pub mod svg;

use crate::layout::Layout;

/// Abstraction for backends that draw a computed [`Layout`].
pub trait Exporter {
    /// Renders the layout and returns the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format.
    fn export_layout(&mut self, layout: &Layout<'_>) -> Result<String, Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
