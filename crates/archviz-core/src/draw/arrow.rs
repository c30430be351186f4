//! Edge paths and SVG marker generation.
//!
//! An [`Arrow`] pairs an [`ArrowDefinition`] (stroke and path shape) with an
//! [`ArrowDirection`]. Arrows are drawn through an [`ArrowDrawer`], which
//! records every marker color in use so that the `<defs>` block holds exactly
//! one marker per color and direction.

use std::collections::BTreeMap;

use svg::{self, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text},
    geometry::Point,
    semantic::{EdgeDirection, Splines},
};

/// Shape of the path between two endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStyle {
    Straight,
    Curved,
    /// Horizontal and vertical segments only
    #[default]
    Orthogonal,
}

impl From<Splines> for ArrowStyle {
    fn from(splines: Splines) -> Self {
        match splines {
            Splines::Ortho => Self::Orthogonal,
            Splines::Line => Self::Straight,
            Splines::Curved => Self::Curved,
        }
    }
}

/// Stroke and path shape of an arrow.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
    style: ArrowStyle,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition, style: ArrowStyle) -> Self {
        Self { stroke, style }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn style(&self) -> ArrowStyle {
        self.style
    }
}

/// Which ends of the path carry a marker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Marker at the destination
    #[default]
    Forward,
    /// Marker at the source
    Backward,
    /// Markers at both ends
    Bidirectional,
    /// No markers
    Plain,
}

impl From<EdgeDirection> for ArrowDirection {
    fn from(direction: EdgeDirection) -> Self {
        match direction {
            EdgeDirection::Forward => Self::Forward,
            EdgeDirection::Backward => Self::Backward,
            EdgeDirection::Both => Self::Bidirectional,
            EdgeDirection::None => Self::Plain,
        }
    }
}

/// A drawable arrow with styling and direction markers.
#[derive(Debug, Clone)]
pub struct Arrow {
    definition: ArrowDefinition,
    direction: ArrowDirection,
}

/// Draws arrows and collects the marker definitions they reference.
///
/// Markers are keyed by id in ordered maps, so the generated `<defs>` block is
/// the same for the same set of arrows.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    heads: BTreeMap<String, Color>,
    tails: BTreeMap<String, Color>,
}

impl ArrowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws an arrow from `source` to `destination` and registers its markers.
    pub fn draw_arrow(&mut self, arrow: &Arrow, source: Point, destination: Point) -> Box<dyn svg::Node> {
        self.register_arrow_markers(arrow);
        arrow.render_to_svg(source, destination)
    }

    /// Draws an arrow with an optional label centered on the path midpoint.
    pub fn draw_arrow_with_text(
        &mut self,
        arrow: &Arrow,
        text: Option<&Text<'_>>,
        source: Point,
        destination: Point,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Arrow,
            self.draw_arrow(arrow, source, destination),
        );

        if let Some(text) = text {
            output.merge(text.render_to_layers(source.midpoint(destination)));
        }

        output
    }

    /// Generates the `<defs>` block with every registered marker.
    pub fn draw_marker_definitions(&self) -> Box<dyn svg::Node> {
        let mut defs = svg_element::Definitions::new();
        for color in self.heads.values() {
            defs = defs.add(Arrow::create_arrow_left(*color));
        }
        for color in self.tails.values() {
            defs = defs.add(Arrow::create_arrow_right(*color));
        }
        defs.into()
    }

    /// Number of distinct markers registered so far.
    pub fn marker_count(&self) -> usize {
        self.heads.len() + self.tails.len()
    }

    fn register_arrow_markers(&mut self, arrow: &Arrow) {
        let color = arrow.definition.stroke().color();
        let (head, tail) = Arrow::get_markers(arrow.direction, color);
        if let Some(head) = head {
            self.heads.insert(head, color);
        }
        if let Some(tail) = tail {
            self.tails.insert(tail, color);
        }
    }
}

impl Arrow {
    pub fn new(definition: ArrowDefinition, direction: ArrowDirection) -> Self {
        Self {
            definition,
            direction,
        }
    }

    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }

    fn render_to_svg(&self, source: Point, destination: Point) -> Box<dyn svg::Node> {
        let path_data = Self::create_path_data_for_style(source, destination, self.definition.style);
        let color = self.definition.stroke().color();

        let path = svg_element::Path::new()
            .set("d", path_data)
            .set("fill", "none");

        let mut path = crate::apply_stroke!(path, self.definition.stroke());

        let (start_marker, end_marker) = Self::get_markers(self.direction, color);

        if let Some(marker) = start_marker {
            path = path.set("marker-start", marker);
        }

        if let Some(marker) = end_marker {
            path = path.set("marker-end", marker);
        }

        Box::new(path)
    }

    fn marker_left_id(color: Color) -> String {
        format!("arrow-left-{}", color.to_id_safe_string())
    }

    fn marker_right_id(color: Color) -> String {
        format!("arrow-right-{}", color.to_id_safe_string())
    }

    fn get_markers(direction: ArrowDirection, color: Color) -> (Option<String>, Option<String>) {
        match direction {
            ArrowDirection::Forward => (
                None,
                Some(format!("url(#{})", Self::marker_right_id(color))),
            ),
            ArrowDirection::Backward => {
                (Some(format!("url(#{})", Self::marker_left_id(color))), None)
            }
            ArrowDirection::Bidirectional => (
                Some(format!("url(#{})", Self::marker_left_id(color))),
                Some(format!("url(#{})", Self::marker_right_id(color))),
            ),
            ArrowDirection::Plain => (None, None),
        }
    }

    fn create_path_data_for_style(start: Point, end: Point, style: ArrowStyle) -> String {
        match style {
            ArrowStyle::Straight => Self::create_path_data_from_points(start, end),
            ArrowStyle::Curved => Self::create_curved_path_data_from_points(start, end),
            ArrowStyle::Orthogonal => Self::create_orthogonal_path_data_from_points(start, end),
        }
    }

    pub fn create_path_data_from_points(start: Point, end: Point) -> String {
        format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
    }

    /// Cubic bezier leaving and entering along the dominant axis.
    fn create_curved_path_data_from_points(start: Point, end: Point) -> String {
        let abs_dist = end.sub_point(start).abs();
        let mid = start.midpoint(end);

        let (ctrl1, ctrl2) = if abs_dist.x() >= abs_dist.y() {
            (mid.with_y(start.y()), mid.with_y(end.y()))
        } else {
            (mid.with_x(start.x()), mid.with_x(end.x()))
        };

        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            start.x(),
            start.y(),
            ctrl1.x(),
            ctrl1.y(),
            ctrl2.x(),
            ctrl2.y(),
            end.x(),
            end.y()
        )
    }

    fn create_orthogonal_path_data_from_points(start: Point, end: Point) -> String {
        let abs_dist = end.sub_point(start).abs();
        let mid = start.midpoint(end);

        // More horizontal than vertical: go horizontal first
        if abs_dist.x() > abs_dist.y() {
            format!(
                "M {} {} L {} {} L {} {} L {} {}",
                start.x(),
                start.y(),
                mid.x(),
                start.y(),
                mid.x(),
                end.y(),
                end.x(),
                end.y()
            )
        } else {
            format!(
                "M {} {} L {} {} L {} {} L {} {}",
                start.x(),
                start.y(),
                start.x(),
                mid.y(),
                end.x(),
                mid.y(),
                end.x(),
                end.y()
            )
        }
    }

    fn create_arrow_right(color: Color) -> svg_element::Marker {
        svg_element::Marker::new()
            .set("id", Self::marker_right_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            )
    }

    fn create_arrow_left(color: Color) -> svg_element::Marker {
        svg_element::Marker::new()
            .set("id", Self::marker_left_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 1)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 10 0 L 0 5 L 10 10 z")
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{StrokeStyle, TextDefinition};

    fn arrow(color: &str, direction: ArrowDirection) -> Arrow {
        let stroke = StrokeDefinition::new(Color::new(color).unwrap(), 1.0);
        Arrow::new(ArrowDefinition::new(stroke, ArrowStyle::Straight), direction)
    }

    fn to_string(node: Box<dyn svg::Node>) -> String {
        svg::Document::new().add(node).to_string()
    }

    #[test]
    fn test_arrow_direction_from_edge_direction() {
        assert_eq!(ArrowDirection::from(EdgeDirection::Forward), ArrowDirection::Forward);
        assert_eq!(ArrowDirection::from(EdgeDirection::Backward), ArrowDirection::Backward);
        assert_eq!(ArrowDirection::from(EdgeDirection::Both), ArrowDirection::Bidirectional);
        assert_eq!(ArrowDirection::from(EdgeDirection::None), ArrowDirection::Plain);
    }

    #[test]
    fn test_arrow_style_from_splines() {
        assert_eq!(ArrowStyle::from(Splines::Ortho), ArrowStyle::Orthogonal);
        assert_eq!(ArrowStyle::from(Splines::Line), ArrowStyle::Straight);
        assert_eq!(ArrowStyle::from(Splines::Curved), ArrowStyle::Curved);
    }

    #[test]
    fn test_create_path_data_from_points() {
        let data = Arrow::create_path_data_from_points(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        assert_eq!(data, "M 0 0 L 10 5");
    }

    #[test]
    fn test_orthogonal_path_goes_horizontal_first() {
        let data = Arrow::create_orthogonal_path_data_from_points(
            Point::new(0.0, 0.0),
            Point::new(100.0, 20.0),
        );
        assert_eq!(data, "M 0 0 L 50 0 L 50 20 L 100 20");
    }

    #[test]
    fn test_plain_arrow_registers_no_markers() {
        let mut drawer = ArrowDrawer::new();
        let node = drawer.draw_arrow(
            &arrow("black", ArrowDirection::Plain),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(drawer.marker_count(), 0);
        assert!(!to_string(node).contains("marker-"));
    }

    #[test]
    fn test_markers_deduplicated_per_color() {
        let mut drawer = ArrowDrawer::new();
        let (a, b) = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        drawer.draw_arrow(&arrow("black", ArrowDirection::Forward), a, b);
        drawer.draw_arrow(&arrow("black", ArrowDirection::Forward), a, b);
        drawer.draw_arrow(&arrow("red", ArrowDirection::Bidirectional), a, b);

        assert_eq!(drawer.marker_count(), 3);

        let defs = to_string(drawer.draw_marker_definitions());
        assert_eq!(defs.matches("<marker").count(), 3);
    }

    #[test]
    fn test_forward_arrow_has_end_marker() {
        let mut drawer = ArrowDrawer::new();
        let node = drawer.draw_arrow(
            &arrow("black", ArrowDirection::Forward),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let svg = to_string(node);
        assert!(svg.contains("marker-end"));
        assert!(!svg.contains("marker-start"));
    }

    #[test]
    fn test_dotted_arrow_has_dasharray() {
        let mut stroke = StrokeDefinition::new(Color::default(), 1.0);
        stroke.set_style(StrokeStyle::Dotted);
        let dotted = Arrow::new(ArrowDefinition::new(stroke, ArrowStyle::Orthogonal), ArrowDirection::Forward);

        let mut drawer = ArrowDrawer::new();
        let svg = to_string(drawer.draw_arrow(&dotted, Point::new(0.0, 0.0), Point::new(0.0, 50.0)));
        assert!(svg.contains("stroke-dasharray=\"2,3\""));
    }

    #[test]
    fn test_arrow_with_text_adds_label() {
        let def = TextDefinition::default();
        let label = Text::new(&def, "Deploy");
        let mut drawer = ArrowDrawer::new();

        let output = drawer.draw_arrow_with_text(
            &arrow("black", ArrowDirection::Forward),
            Some(&label),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert_eq!(output.count(RenderLayer::Arrow), 1);
        assert_eq!(output.count(RenderLayer::Text), 1);

        let output = drawer.draw_arrow_with_text(
            &arrow("black", ArrowDirection::Plain),
            None,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert_eq!(output.count(RenderLayer::Text), 0);
    }
}
