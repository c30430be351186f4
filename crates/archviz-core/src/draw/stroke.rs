//! Stroke and line-style definitions.
//!
//! [`StrokeDefinition`] holds everything needed to outline a shape or draw an
//! edge path. Use the [`apply_stroke!`](crate::apply_stroke!) macro to set all
//! of its SVG attributes on an element at once.
//!
//! | Property | SVG Attribute | Example Values |
//! |----------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#000000"`, `0.5` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"5,5"`, `"2,3"` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"` |
//! | `join` | `stroke-linejoin` | `"miter"`, `"round"` |

use crate::{color::Color, semantic::EdgeStyle};

/// Dash pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// 5px dash, 5px gap
    Dashed,
    /// 2px dot, 3px gap
    Dotted,
    /// Custom SVG dasharray pattern, e.g. `"10,5,2,5"`
    Custom(String),
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Dotted => Some("2,3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// Defines how line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Defines how line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use archviz_core::draw::{StrokeDefinition, StrokeStyle, StrokeCap};
/// use archviz_core::color::Color;
///
/// let mut stroke = StrokeDefinition::new(Color::new("#7B8894").unwrap(), 1.0);
/// stroke.set_style(StrokeStyle::Dotted);
/// stroke.set_cap(StrokeCap::Round);
/// assert_eq!(stroke.style().to_svg_value().as_deref(), Some("2,3"));
/// ```
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates the stroke of an edge drawn in the given style.
    ///
    /// Bold edges double the base width; the other styles only change the
    /// dash pattern.
    pub fn for_edge(color: Color, width: f32, style: EdgeStyle) -> Self {
        let mut stroke = Self::new(color, width);
        match style {
            EdgeStyle::Solid => {}
            EdgeStyle::Dotted => stroke.set_style(StrokeStyle::Dotted),
            EdgeStyle::Dashed => stroke.set_style(StrokeStyle::Dashed),
            EdgeStyle::Bold => stroke.set_width(width * 2.0),
        }
        stroke
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns the stroke join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }

    pub fn set_join(&mut self, join: StrokeJoin) {
        self.join = join;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width, line cap, line join, and the dash pattern when
/// the style is not solid.
///
/// # Examples
///
/// ```
/// use archviz_core::draw::StrokeDefinition;
/// use archviz_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new()
///     .set("width", 100)
///     .set("height", 50);
///
/// let rect = archviz_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use svg::node::element as svg_element;

    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_approx_eq!(f32, stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
        assert_eq!(stroke.join(), StrokeJoin::Miter);
    }

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value().as_deref(), Some("5,5"));
        assert_eq!(StrokeStyle::Dotted.to_svg_value().as_deref(), Some("2,3"));
        assert_eq!(
            StrokeStyle::Custom("10,5".to_string()).to_svg_value().as_deref(),
            Some("10,5")
        );
    }

    #[test]
    fn test_stroke_for_edge() {
        let color = Color::new("#7B8894").unwrap();

        let dotted = StrokeDefinition::for_edge(color, 1.0, EdgeStyle::Dotted);
        assert_eq!(*dotted.style(), StrokeStyle::Dotted);
        assert_approx_eq!(f32, dotted.width(), 1.0);

        let dashed = StrokeDefinition::for_edge(color, 1.0, EdgeStyle::Dashed);
        assert_eq!(*dashed.style(), StrokeStyle::Dashed);

        let bold = StrokeDefinition::for_edge(color, 1.5, EdgeStyle::Bold);
        assert_eq!(*bold.style(), StrokeStyle::Solid);
        assert_approx_eq!(f32, bold.width(), 3.0);
    }

    #[test]
    fn test_apply_stroke_sets_dasharray_only_when_patterned() {
        let solid = StrokeDefinition::new(Color::default(), 1.0);
        let line = svg::Document::new()
            .add(apply_stroke!(svg_element::Line::new(), &solid))
            .to_string();
        assert!(line.contains("stroke-width=\"1\""));
        assert!(!line.contains("stroke-dasharray"));

        let mut dotted = StrokeDefinition::new(Color::default(), 1.0);
        dotted.set_style(StrokeStyle::Dotted);
        let line = svg::Document::new()
            .add(apply_stroke!(svg_element::Line::new(), &dotted))
            .to_string();
        assert!(line.contains("stroke-dasharray=\"2,3\""));
    }
}
