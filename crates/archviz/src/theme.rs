//! Visual defaults for rendered diagrams.
//!
//! A [`Theme`] resolves the style configuration and the diagram's graph
//! attributes into the draw definitions used by layout and export. By default
//! edges are gray and cluster backgrounds cycle through pastel fills by
//! nesting depth.

use log::debug;

use archviz_core::{
    color::Color,
    draw::{ArrowDefinition, ArrowStyle, ClusterDefinition, StrokeDefinition, TextDefinition},
    semantic::{self, GraphAttributes},
};

use crate::{ArchvizError, config::StyleConfig};

const EDGE_COLOR: &str = "#7B8894";
const CLUSTER_STROKE_COLOR: &str = "#AEB6BE";
const CLUSTER_BACKGROUNDS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];
const LABEL_BACKGROUND: &str = "white";

const NODE_FONT_SIZE: u16 = 13;
const EDGE_FONT_SIZE: u16 = 13;
const CLUSTER_FONT_SIZE: u16 = 12;

/// Resolved drawing definitions for one diagram.
#[derive(Debug, Clone)]
pub struct Theme {
    background: Option<Color>,
    edge_color: Color,
    edge_width: f32,
    arrow_style: ArrowStyle,
    node_text: TextDefinition,
    edge_text: TextDefinition,
    title_text: TextDefinition,
    clusters: Vec<ClusterDefinition>,
}

impl Theme {
    /// Builds the theme of a diagram.
    ///
    /// Graph attributes win over the style configuration: `bgcolor` was
    /// already merged into `attributes` by the builder.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::Style`] if a configured color does not parse.
    pub fn new(style: &StyleConfig, attributes: &GraphAttributes) -> Result<Self, ArchvizError> {
        let background = attributes.bgcolor();
        let edge_color = match style.edge_color().map_err(ArchvizError::Style)? {
            Some(color) => color,
            None => parse_builtin(EDGE_COLOR)?,
        };
        let cluster_fill = style
            .cluster_background_color()
            .map_err(ArchvizError::Style)?;

        let font_color = attributes.fontcolor();
        let text = |size: u16| {
            let mut text = TextDefinition::new();
            text.set_font_family(attributes.fontname());
            text.set_font_size(size);
            text.set_color(Some(font_color));
            text
        };

        let node_text = text(NODE_FONT_SIZE);
        let mut edge_text = text(EDGE_FONT_SIZE);
        edge_text.set_background_color(Some(match background {
            Some(color) => color,
            None => parse_builtin(LABEL_BACKGROUND)?,
        }));
        let title_text = text(font_size_of(attributes.fontsize()));

        let cluster_stroke = StrokeDefinition::new(parse_builtin(CLUSTER_STROKE_COLOR)?, 1.0);
        let clusters = match cluster_fill {
            Some(fill) => vec![ClusterDefinition::new(
                fill,
                cluster_stroke,
                text(CLUSTER_FONT_SIZE),
            )],
            None => CLUSTER_BACKGROUNDS
                .iter()
                .map(|fill| {
                    Ok(ClusterDefinition::new(
                        parse_builtin(fill)?,
                        cluster_stroke.clone(),
                        text(CLUSTER_FONT_SIZE),
                    ))
                })
                .collect::<Result<Vec<_>, ArchvizError>>()?,
        };

        debug!(
            edge_color:% = edge_color,
            background:? = background.map(|color| color.to_string()),
            font = attributes.fontname();
            "Theme resolved"
        );

        Ok(Self {
            background,
            edge_color,
            edge_width: 1.0,
            arrow_style: attributes.splines().into(),
            node_text,
            edge_text,
            title_text,
            clusters,
        })
    }

    /// Canvas color; `None` leaves the canvas transparent.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Color of edges that do not set their own.
    pub fn edge_color(&self) -> Color {
        self.edge_color
    }

    pub fn node_text(&self) -> &TextDefinition {
        &self.node_text
    }

    pub fn edge_text(&self) -> &TextDefinition {
        &self.edge_text
    }

    pub fn title_text(&self) -> &TextDefinition {
        &self.title_text
    }

    /// Cluster style for a nesting depth; colors cycle through the palette.
    pub fn cluster(&self, depth: usize) -> &ClusterDefinition {
        &self.clusters[depth % self.clusters.len()]
    }

    /// Arrow definition for an edge, honoring its own color and style.
    pub fn arrow_for(&self, edge: &semantic::Edge) -> ArrowDefinition {
        let color = edge.color().unwrap_or(self.edge_color);
        ArrowDefinition::new(
            StrokeDefinition::for_edge(color, self.edge_width, edge.style()),
            self.arrow_style,
        )
    }
}

fn parse_builtin(color: &str) -> Result<Color, ArchvizError> {
    Color::new(color).map_err(ArchvizError::Style)
}

fn font_size_of(points: f32) -> u16 {
    points.round().clamp(1.0, f32::from(u16::MAX)) as u16
}
