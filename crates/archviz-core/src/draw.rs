//! Drawable components for rendering architecture diagrams.
//!
//! Every drawable implements [`Drawable`]: it reports its [`Size`] to the
//! layout stage and renders itself at a center position into a
//! [`LayeredOutput`]. The export stage only places drawables and flattens the
//! layers into an SVG document.
//!
//! - [`NodeWithLabel`]: a category icon with its label below
//! - [`ClusterBox`]: the rounded box and title of a cluster
//! - [`Arrow`]: an edge path with direction markers, drawn through [`ArrowDrawer`]
//! - [`Text`]: a standalone label

mod arrow;
mod cluster;
mod icon;
mod layer;
mod node;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDirection, ArrowDrawer, ArrowStyle};
pub use cluster::{ClusterBox, ClusterDefinition};
pub use icon::{ICON_SIZE, IconDefinition, icon_for};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use node::NodeWithLabel;
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

/// Trait for diagram elements that can be measured and rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable centered on `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}

/// Finds where the ray from `a` towards `b` leaves the rectangle of `a_size`
/// centered on `a`.
///
/// Returns `b` when the points coincide.
pub fn find_rectangle_intersection(a: Point, b: Point, a_size: Size) -> Point {
    let half_width = a_size.width() / 2.0;
    let half_height = a_size.height() / 2.0;

    let dist = b.sub_point(a);

    let length = dist.hypot();
    if length < 0.001 {
        return b;
    }

    let dx_norm = dist.x() / length;
    let dy_norm = dist.y() / length;

    // Distance along the ray to each edge of the rectangle
    let t_top = (-half_height) / dy_norm;
    let t_bottom = half_height / dy_norm;
    let t_left = (-half_width) / dx_norm;
    let t_right = half_width / dx_norm;

    let mut t = f32::MAX;

    for t_edge in [t_top, t_bottom] {
        if t_edge.is_finite() && t_edge > 0.0 && t_edge < t {
            let x = dx_norm.mul_add(t_edge, a.x());
            if x >= a.x() - half_width && x <= a.x() + half_width {
                t = t_edge;
            }
        }
    }

    for t_edge in [t_left, t_right] {
        if t_edge.is_finite() && t_edge > 0.0 && t_edge < t {
            let y = dy_norm.mul_add(t_edge, a.y());
            if y >= a.y() - half_height && y <= a.y() + half_height {
                t = t_edge;
            }
        }
    }

    if t == f32::MAX || !t.is_finite() {
        return b;
    }

    Point::new(dx_norm.mul_add(t, a.x()), dy_norm.mul_add(t, a.y()))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_approx_eq!(f32, actual.x(), expected.x(), epsilon = 0.001);
        assert_approx_eq!(f32, actual.y(), expected.y(), epsilon = 0.001);
    }

    #[test]
    fn test_rectangle_intersection_horizontal() {
        let size = Size::new(100.0, 50.0);
        let a = Point::new(0.0, 0.0);

        assert_point_eq(
            find_rectangle_intersection(a, Point::new(200.0, 0.0), size),
            Point::new(50.0, 0.0),
        );
        assert_point_eq(
            find_rectangle_intersection(a, Point::new(-200.0, 0.0), size),
            Point::new(-50.0, 0.0),
        );
    }

    #[test]
    fn test_rectangle_intersection_vertical() {
        let size = Size::new(100.0, 50.0);
        let a = Point::new(10.0, 10.0);

        assert_point_eq(
            find_rectangle_intersection(a, Point::new(10.0, 300.0), size),
            Point::new(10.0, 35.0),
        );
    }

    #[test]
    fn test_rectangle_intersection_diagonal_hits_corner() {
        let size = Size::new(40.0, 40.0);
        let a = Point::new(0.0, 0.0);

        assert_point_eq(
            find_rectangle_intersection(a, Point::new(100.0, 100.0), size),
            Point::new(20.0, 20.0),
        );
    }

    #[test]
    fn test_rectangle_intersection_same_point() {
        let a = Point::new(5.0, 5.0);
        assert_point_eq(find_rectangle_intersection(a, a, Size::new(10.0, 10.0)), a);
    }

    proptest! {
        #[test]
        fn prop_intersection_lies_on_rectangle_border(
            bx in -500.0f32..500.0,
            by in -500.0f32..500.0,
            w in 1.0f32..200.0,
            h in 1.0f32..200.0,
        ) {
            let a = Point::default();
            let b = Point::new(bx, by);
            let size = Size::new(w, h);
            prop_assume!(bx.abs() > w / 2.0 || by.abs() > h / 2.0);

            let p = find_rectangle_intersection(a, b, size);
            let on_vertical = (p.x().abs() - w / 2.0).abs() < 0.01 && p.y().abs() <= h / 2.0 + 0.01;
            let on_horizontal = (p.y().abs() - h / 2.0).abs() < 0.01 && p.x().abs() <= w / 2.0 + 0.01;
            prop_assert!(on_vertical || on_horizontal);
        }
    }
}
