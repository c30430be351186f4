use svg::{self, node::element as svg_element};

use super::{ICON_SIZE, IconDefinition};
use crate::{
    color::Color,
    draw::{StrokeCap, StrokeDefinition, StrokeJoin},
    geometry::Point,
    semantic::NodeCategory,
};

/// Human actor icon: a stick figure.
#[derive(Debug, Clone)]
pub struct UserIconDefinition {
    stroke: StrokeDefinition,
}

impl UserIconDefinition {
    pub fn new(color: Color) -> Self {
        let mut stroke = StrokeDefinition::new(color, ICON_SIZE / 20.0);
        stroke.set_cap(StrokeCap::Round);
        stroke.set_join(StrokeJoin::Round);
        Self { stroke }
    }
}

impl IconDefinition for UserIconDefinition {
    fn render_to_svg(&self, position: Point) -> Box<dyn svg::Node> {
        let half = ICON_SIZE / 2.0;
        let head_radius = ICON_SIZE / 8.0;
        let head_center = Point::new(position.x(), position.y() - half + head_radius + 2.0);

        let neck_y = head_center.y() + head_radius;
        let hip_y = position.y() + ICON_SIZE / 8.0;
        let arms_y = neck_y + ICON_SIZE / 8.0;
        let arm_span = ICON_SIZE / 4.0;
        let foot_y = position.y() + half - 2.0;

        let head = svg_element::Circle::new()
            .set("cx", head_center.x())
            .set("cy", head_center.y())
            .set("r", head_radius)
            .set("fill", "none");
        let head = crate::apply_stroke!(head, &self.stroke);

        let x = position.x();
        let body = svg_element::Path::new()
            .set(
                "d",
                format!(
                    "M {x} {neck_y} L {x} {hip_y} \
                     M {} {arms_y} L {} {arms_y} \
                     M {} {foot_y} L {x} {hip_y} L {} {foot_y}",
                    x - arm_span,
                    x + arm_span,
                    x - arm_span,
                    x + arm_span,
                ),
            )
            .set("fill", "none");
        let body = crate::apply_stroke!(body, &self.stroke);

        svg_element::Group::new()
            .set("data-icon", NodeCategory::User.tag())
            .add(head)
            .add(body)
            .into()
    }

    fn clone_box(&self) -> Box<dyn IconDefinition> {
        Box::new(self.clone())
    }
}
