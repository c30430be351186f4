//! A node icon with its label below it.

use crate::{
    draw::{Drawable, IconDefinition, LayeredOutput, RenderLayer, Text, find_rectangle_intersection},
    geometry::{Point, Size},
};

/// Vertical gap between an icon and its label.
const LABEL_GAP: f32 = 4.0;

/// A node drawable: category icon on top, label centered underneath.
///
/// The drawable is positioned by the center of its whole extent (icon and
/// label), which is what the layout engines place.
#[derive(Debug, Clone)]
pub struct NodeWithLabel<'a> {
    icon: Box<dyn IconDefinition>,
    text: Option<Text<'a>>,
}

impl<'a> NodeWithLabel<'a> {
    pub fn new(icon: Box<dyn IconDefinition>, text: Option<Text<'a>>) -> Self {
        Self { icon, text }
    }

    pub fn text_size(&self) -> Size {
        self.text
            .as_ref()
            .map(|text| text.calculate_size())
            .unwrap_or_default()
    }

    /// Center of the icon when the node is centered on `position`.
    pub fn icon_center(&self, position: Point) -> Point {
        let total = self.size();
        let top = position.y() - total.height() / 2.0;
        Point::new(position.x(), top + self.icon.size().height() / 2.0)
    }

    /// Where an edge from this node towards `toward` leaves the icon.
    pub fn find_intersection(&self, position: Point, toward: Point) -> Point {
        find_rectangle_intersection(self.icon_center(position), toward, self.icon.size())
    }

    fn label_center(&self, position: Point) -> Point {
        let total = self.size();
        let top = position.y() - total.height() / 2.0;
        let label_height = self.text_size().height();
        Point::new(
            position.x(),
            top + self.icon.size().height() + LABEL_GAP + label_height / 2.0,
        )
    }
}

impl<'a> Drawable for NodeWithLabel<'a> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Content,
            self.icon.render_to_svg(self.icon_center(position)),
        );

        if let Some(text) = &self.text {
            output.merge(text.render_to_layers(self.label_center(position)));
        }

        output
    }

    fn size(&self) -> Size {
        let icon = self.icon.size();
        let text = self.text_size();
        if text.is_zero() {
            return icon;
        }
        Size::new(
            icon.width().max(text.width()),
            icon.height() + LABEL_GAP + text.height(),
        )
    }
}
