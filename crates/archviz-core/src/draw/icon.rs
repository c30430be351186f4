//! Category icons drawn in place of node shapes.
//!
//! Every [`NodeCategory`] maps to one [`IconDefinition`]. Icons are plain
//! vector drawings in the brand color of their provider, so the SVG output is
//! self-contained.

use crate::{
    color::Color,
    geometry::{Point, Size},
    semantic::NodeCategory,
};

mod gcp;
mod github;
mod user;

pub use gcp::{GcpGlyph, GcpIconDefinition};
pub use github::GithubIconDefinition;
pub use user::UserIconDefinition;

/// Width and height of every icon, in pixels.
pub const ICON_SIZE: f32 = 64.0;

/// A stateless icon drawing.
pub trait IconDefinition: std::fmt::Debug {
    /// Size of the drawn icon.
    fn size(&self) -> Size {
        Size::new(ICON_SIZE, ICON_SIZE)
    }

    /// Renders the icon centered on `position`.
    fn render_to_svg(&self, position: Point) -> Box<dyn svg::Node>;

    /// Creates a boxed clone of this icon definition.
    fn clone_box(&self) -> Box<dyn IconDefinition>;
}

impl Clone for Box<dyn IconDefinition> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Returns the icon drawn for `category`.
///
/// # Examples
///
/// ```
/// use archviz_core::draw::{ICON_SIZE, icon_for};
/// use archviz_core::semantic::NodeCategory;
///
/// let icon = icon_for(NodeCategory::Run);
/// assert_eq!(icon.size().width(), ICON_SIZE);
/// ```
pub fn icon_for(category: NodeCategory) -> Box<dyn IconDefinition> {
    let brand = brand_color(category);
    match category {
        NodeCategory::Github => Box::new(GithubIconDefinition::new(brand)),
        NodeCategory::Build => Box::new(GcpIconDefinition::new(brand, GcpGlyph::Build)),
        NodeCategory::Run => Box::new(GcpIconDefinition::new(brand, GcpGlyph::Run)),
        NodeCategory::User => Box::new(UserIconDefinition::new(brand)),
    }
}

fn brand_color(category: NodeCategory) -> Color {
    Color::new(category.provider().brand_color()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(category: NodeCategory) -> String {
        svg::Document::new()
            .add(icon_for(category).render_to_svg(Point::new(50.0, 50.0)))
            .to_string()
    }

    #[test]
    fn test_every_category_has_an_icon() {
        for category in NodeCategory::ALL {
            let icon = icon_for(category);
            assert_eq!(icon.size(), Size::new(ICON_SIZE, ICON_SIZE));
            assert!(render(category).contains("data-icon"));
        }
    }

    #[test]
    fn test_icons_are_tagged_with_category() {
        assert!(render(NodeCategory::Github).contains("data-icon=\"onprem.vcs.Github\""));
        assert!(render(NodeCategory::Build).contains("data-icon=\"gcp.devtools.Build\""));
        assert!(render(NodeCategory::Run).contains("data-icon=\"gcp.compute.Run\""));
        assert!(render(NodeCategory::User).contains("data-icon=\"onprem.client.User\""));
    }

    #[test]
    fn test_gcp_icons_use_brand_color() {
        let brand = Color::new("#4285F4").unwrap().to_string();
        assert!(render(NodeCategory::Run).contains(&brand));
        assert!(render(NodeCategory::Build).contains(&brand));
    }
}
