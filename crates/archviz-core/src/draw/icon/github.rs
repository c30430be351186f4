use svg::{self, node::element as svg_element};

use super::{ICON_SIZE, IconDefinition};
use crate::{
    color::Color,
    draw::{StrokeCap, StrokeDefinition},
    geometry::Point,
    semantic::NodeCategory,
};

/// Version-control host icon: a filled disc carrying a branch glyph.
#[derive(Debug, Clone)]
pub struct GithubIconDefinition {
    fill_color: Color,
    glyph_stroke: StrokeDefinition,
}

impl GithubIconDefinition {
    pub fn new(fill_color: Color) -> Self {
        let mut glyph_stroke =
            StrokeDefinition::new(Color::new("white").unwrap_or_default(), ICON_SIZE / 16.0);
        glyph_stroke.set_cap(StrokeCap::Round);
        Self {
            fill_color,
            glyph_stroke,
        }
    }
}

impl IconDefinition for GithubIconDefinition {
    fn render_to_svg(&self, position: Point) -> Box<dyn svg::Node> {
        let radius = ICON_SIZE / 2.0;
        let unit = ICON_SIZE / 8.0;

        let disc = svg_element::Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", radius)
            .set("fill", self.fill_color.to_string())
            .set("fill-opacity", self.fill_color.alpha());

        // Trunk with one branch merging back into it
        let trunk_top = position.add_point(Point::new(-unit, -2.0 * unit));
        let trunk_bottom = position.add_point(Point::new(-unit, 2.0 * unit));
        let branch_tip = position.add_point(Point::new(unit * 1.5, -unit));

        let branch = svg_element::Path::new()
            .set(
                "d",
                format!(
                    "M {} {} L {} {} M {} {} Q {} {}, {} {}",
                    trunk_top.x(),
                    trunk_top.y(),
                    trunk_bottom.x(),
                    trunk_bottom.y(),
                    branch_tip.x(),
                    branch_tip.y(),
                    branch_tip.x(),
                    position.y() + unit,
                    trunk_bottom.x(),
                    position.y() + unit,
                ),
            )
            .set("fill", "none");
        let branch = crate::apply_stroke!(branch, &self.glyph_stroke);

        let mut group = svg_element::Group::new()
            .set("data-icon", NodeCategory::Github.tag())
            .add(disc)
            .add(branch);

        for commit in [trunk_top, trunk_bottom, branch_tip] {
            group = group.add(
                svg_element::Circle::new()
                    .set("cx", commit.x())
                    .set("cy", commit.y())
                    .set("r", unit * 0.6)
                    .set("fill", self.glyph_stroke.color().to_string()),
            );
        }

        group.into()
    }

    fn clone_box(&self) -> Box<dyn IconDefinition> {
        Box::new(self.clone())
    }
}
