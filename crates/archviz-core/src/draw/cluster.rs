//! Cluster boxes.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Insets, Point, Size},
};

/// Visual style shared by all cluster boxes of a diagram.
#[derive(Debug, Clone)]
pub struct ClusterDefinition {
    fill_color: Color,
    stroke: StrokeDefinition,
    text: TextDefinition,
    padding: Insets,
    corner_radius: f32,
}

impl ClusterDefinition {
    pub fn new(fill_color: Color, stroke: StrokeDefinition, text: TextDefinition) -> Self {
        Self {
            fill_color,
            stroke,
            text,
            padding: Insets::uniform(16.0),
            corner_radius: 6.0,
        }
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    /// Space between the box border and its members.
    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    /// Insets applied to the members' bounds to get the box: the padding plus
    /// a band at the top holding the label.
    pub fn content_insets(&self, label: &str) -> Insets {
        let label_height = Text::new(&self.text, label).calculate_size().height();
        self.padding
            .with_top(self.padding.top() + label_height + self.padding.top() / 2.0)
    }
}

impl Default for ClusterDefinition {
    fn default() -> Self {
        let mut text = TextDefinition::default();
        text.set_font_size(12);
        Self::new(
            Color::new("#E5F5FD").unwrap_or_default(),
            StrokeDefinition::new(Color::new("#AEB6BE").unwrap_or_default(), 1.0),
            text,
        )
    }
}

/// A rounded cluster box with its label in the top-left corner.
#[derive(Debug, Clone)]
pub struct ClusterBox<'a> {
    definition: &'a ClusterDefinition,
    label: &'a str,
    size: Size,
}

impl<'a> ClusterBox<'a> {
    pub fn new(definition: &'a ClusterDefinition, label: &'a str, size: Size) -> Self {
        Self {
            definition,
            label,
            size,
        }
    }
}

impl<'a> Drawable for ClusterBox<'a> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = position.to_bounds(self.size);

        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", self.definition.corner_radius)
            .set("fill", self.definition.fill_color.to_string())
            .set("fill-opacity", self.definition.fill_color.alpha());
        let rect = crate::apply_stroke!(rect, &self.definition.stroke);
        output.add_to_layer(RenderLayer::Cluster, Box::new(rect));

        let text = Text::new(&self.definition.text, self.label);
        let text_size = text.calculate_size();
        let padding = self.definition.padding;
        let label_center = Point::new(
            bounds.min_x() + padding.left() + text_size.width() / 2.0,
            bounds.min_y() + padding.top() / 2.0 + text_size.height() / 2.0,
        );
        output.merge(text.render_to_layers(label_center));

        output
    }

    fn size(&self) -> Size {
        self.size
    }
}
