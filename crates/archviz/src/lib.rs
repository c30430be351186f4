//! Archviz - declarative architecture diagrams.
//!
//! A diagram is defined in a closure: nodes of known visual categories are
//! declared in a [`Scope`], grouped in clusters and connected by edges. When
//! the closure returns, the definition is validated, laid out and written as a
//! single SVG (or Graphviz DOT) file.
//!
//! ```rust,no_run
//! use archviz::{DiagramBuilder, Edge, semantic::NodeCategory};
//!
//! let path = DiagramBuilder::new("Web service")
//!     .with_graph_attr("pad", "0")
//!     .render_in(".", |scope| {
//!         let user = scope.node(NodeCategory::User, "User");
//!         let api = scope.cluster("Backend", |backend| {
//!             backend.node(NodeCategory::Run, "API")
//!         });
//!         scope.connect(user, api, Edge::new().label("https"))?;
//!         Ok(())
//!     })
//!     .expect("Failed to render");
//!
//! println!("wrote {}", path.display());
//! ```

pub mod config;
pub mod scope;

mod error;
mod export;
mod layout;
mod output;
mod structure;
mod theme;

pub use archviz_core::{color, draw, geometry, identifier, semantic};

pub use error::ArchvizError;
pub use output::{OutputFormat, write_atomically};
pub use scope::{Edge, EdgeHandle, NodeHandle, Scope};

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use archviz_core::semantic::{Diagram, Direction, GraphAttributes};

use config::AppConfig;
use export::Exporter;

/// Builder for defining and rendering a diagram.
///
/// Holds everything about a diagram except its content: title, graph
/// attributes, direction, output file and configuration. The content is
/// declared by the closure given to [`define`](Self::define) or
/// [`render_in`](Self::render_in).
#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    title: String,
    graph_attrs: Vec<(String, String)>,
    direction: Direction,
    filename: Option<String>,
    format: OutputFormat,
    config: AppConfig,
}

impl DiagramBuilder {
    /// Creates a builder for a diagram titled `title`.
    ///
    /// The title is drawn under the diagram and, unless
    /// [`with_filename`](Self::with_filename) is used, names the output file.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            graph_attrs: Vec::new(),
            direction: Direction::default(),
            filename: None,
            format: OutputFormat::default(),
            config: AppConfig::default(),
        }
    }

    /// Sets a graph attribute such as `pad`, `nodesep` or `bgcolor`.
    ///
    /// Attributes are validated when the diagram is defined; later values for
    /// the same key win.
    pub fn with_graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.graph_attrs.push((key.into(), value.into()));
        self
    }

    /// Sets the direction ranks advance in. Defaults to left to right.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Overrides the output file stem derived from the title.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the layout and style configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the definition closure and returns the validated diagram.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `f`, [`ArchvizError::Attribute`] or
    /// [`ArchvizError::Style`] for bad graph attributes or configuration, and
    /// [`ArchvizError::Graph`] if the declared elements are inconsistent.
    pub fn define<F>(&self, f: F) -> Result<Diagram, ArchvizError>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), ArchvizError>,
    {
        info!(title = self.title.as_str(); "Defining diagram");

        let mut state = scope::DiagramState::new();
        f(&mut Scope::new(&mut state))?;
        let (nodes, clusters, edges) = state.into_parts();

        let attributes = self.graph_attributes()?;
        let diagram = Diagram::new(
            self.title.clone(),
            attributes,
            self.direction,
            nodes,
            clusters,
            edges,
        );

        structure::DiagramGraph::from_diagram(&diagram)?;
        debug!(
            nodes = diagram.nodes().len(),
            clusters = diagram.clusters().len(),
            edges = diagram.edges().len();
            "Diagram defined"
        );
        trace!(diagram:?; "Defined diagram");

        Ok(diagram)
    }

    /// Renders a diagram in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::Graph`], [`ArchvizError::Layout`],
    /// [`ArchvizError::Style`] or [`ArchvizError::Export`] from the matching
    /// pipeline stage.
    pub fn render(&self, diagram: &Diagram) -> Result<String, ArchvizError> {
        info!(format:% = self.format; "Building diagram structure");
        let graph = structure::DiagramGraph::from_diagram(diagram)?;
        let theme = theme::Theme::new(self.config.style(), diagram.attributes())?;

        let rendered = match self.format {
            OutputFormat::Svg => {
                let layout = layout::LayoutBuilder::new(self.config.layout().engine())
                    .build(&graph, &theme)?;

                let mut svg = export::svg::SvgBuilder::new()
                    .with_padding(diagram.attributes().pad_points())
                    .build()?;
                svg.export_layout(&layout)?
            }
            OutputFormat::Dot => export::dot::Dot::new(&theme).export_diagram(diagram),
        };

        info!(bytes = rendered.len(); "Diagram rendered");
        Ok(rendered)
    }

    /// File name of the artifact for `diagram`, extension included.
    pub fn file_name(&self, diagram: &Diagram) -> String {
        let stem = self
            .filename
            .clone()
            .unwrap_or_else(|| diagram.filename_stem());
        format!("{stem}.{}", self.format.extension())
    }

    /// Defines, renders and writes the diagram into `dir`.
    ///
    /// Nothing is written unless every stage succeeds. Returns the path of the
    /// written file.
    ///
    /// # Errors
    ///
    /// Returns any error of [`define`](Self::define) or
    /// [`render`](Self::render), and [`ArchvizError::Io`] if the file cannot be
    /// written into `dir`.
    pub fn render_in<F>(&self, dir: impl AsRef<Path>, f: F) -> Result<PathBuf, ArchvizError>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), ArchvizError>,
    {
        let diagram = self.define(f)?;
        let rendered = self.render(&diagram)?;
        output::write_atomically(dir.as_ref(), &self.file_name(&diagram), &rendered)
    }

    /// Resolves graph attributes: defaults, then configuration, then the
    /// attributes set on the builder.
    fn graph_attributes(&self) -> Result<GraphAttributes, ArchvizError> {
        let mut attributes = GraphAttributes::default();

        let layout = self.config.layout();
        if let Some(spacing) = layout.node_spacing() {
            attributes.set("nodesep", &spacing.to_string())?;
        }
        if let Some(spacing) = layout.rank_spacing() {
            attributes.set("ranksep", &spacing.to_string())?;
        }

        let style = self.config.style();
        if let Some(font) = style.font_family() {
            attributes.set("fontname", font)?;
        }
        if let Some(color) = style.background_color().map_err(ArchvizError::Style)? {
            attributes.set("bgcolor", &color.to_hex_string())?;
        }

        for (key, value) in &self.graph_attrs {
            attributes.set(key, value)?;
        }
        Ok(attributes)
    }
}
