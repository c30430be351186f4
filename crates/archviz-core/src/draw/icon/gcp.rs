use svg::{self, node::element as svg_element};

use super::{ICON_SIZE, IconDefinition};
use crate::{color::Color, geometry::Point, semantic::NodeCategory};

/// The white glyph drawn inside a GCP hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcpGlyph {
    /// Stacked build steps
    Build,
    /// Double chevron
    Run,
}

impl GcpGlyph {
    fn category(self) -> NodeCategory {
        match self {
            Self::Build => NodeCategory::Build,
            Self::Run => NodeCategory::Run,
        }
    }
}

/// GCP product icon: a hexagon in the provider color with a service glyph.
#[derive(Debug, Clone)]
pub struct GcpIconDefinition {
    fill_color: Color,
    glyph: GcpGlyph,
}

impl GcpIconDefinition {
    pub fn new(fill_color: Color, glyph: GcpGlyph) -> Self {
        Self { fill_color, glyph }
    }

    /// Corner points of a hexagon with flat top and bottom edges.
    fn hexagon_points(position: Point) -> String {
        let r = ICON_SIZE / 2.0;
        let h = r * 3f32.sqrt() / 2.0;
        [
            (-r, 0.0),
            (-r / 2.0, -h),
            (r / 2.0, -h),
            (r, 0.0),
            (r / 2.0, h),
            (-r / 2.0, h),
        ]
        .iter()
        .map(|(dx, dy)| format!("{},{}", position.x() + dx, position.y() + dy))
        .collect::<Vec<_>>()
        .join(" ")
    }

    fn glyph_path(&self, position: Point) -> String {
        let u = ICON_SIZE / 8.0;
        let (x, y) = (position.x(), position.y());
        match self.glyph {
            GcpGlyph::Build => (0..3)
                .map(|step| {
                    let top = y - 1.5 * u + step as f32 * 1.1 * u;
                    let indent = step as f32 * 0.4 * u;
                    format!(
                        "M {} {} h {} v {} h {} z ",
                        x - 1.5 * u + indent,
                        top,
                        3.0 * u - indent,
                        0.7 * u,
                        -(3.0 * u - indent)
                    )
                })
                .collect::<String>()
                .trim_end()
                .to_string(),
            GcpGlyph::Run => format!(
                "M {} {} l {} {} l {} {} z M {} {} l {} {} l {} {} z",
                x - 1.5 * u,
                y - 1.5 * u,
                1.5 * u,
                1.5 * u,
                -1.5 * u,
                1.5 * u,
                x,
                y - 1.5 * u,
                1.5 * u,
                1.5 * u,
                -1.5 * u,
                1.5 * u,
            ),
        }
    }
}

impl IconDefinition for GcpIconDefinition {
    fn render_to_svg(&self, position: Point) -> Box<dyn svg::Node> {
        let hexagon = svg_element::Polygon::new()
            .set("points", Self::hexagon_points(position))
            .set("fill", self.fill_color.to_string())
            .set("fill-opacity", self.fill_color.alpha());

        let glyph = svg_element::Path::new()
            .set("d", self.glyph_path(position))
            .set("fill", "white");

        svg_element::Group::new()
            .set("data-icon", self.glyph.category().tag())
            .add(hexagon)
            .add(glyph)
            .into()
    }

    fn clone_box(&self) -> Box<dyn IconDefinition> {
        Box::new(self.clone())
    }
}
