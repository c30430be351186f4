//! Core types for archviz architecture diagrams.
//!
//! This crate holds everything the diagram library and its renderers share:
//!
//! - **Identifiers**: string-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color parsing ([`color::Color`])
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`] module)
//! - **Draw**: drawables for node icons, labels, edges and clusters ([`draw`] module)
//! - **Semantic**: the immutable diagram model ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
