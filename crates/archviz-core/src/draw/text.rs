//! Text definitions and measurement for node, cluster and edge labels.
//!
//! - [`TextDefinition`] - reusable text style
//! - [`Text`] - a renderable label combining content with a [`TextDefinition`]
//!
//! Label sizes are measured with `cosmic-text` against the fonts installed on
//! the system, so the layout leaves enough room for every label.
//!
//! ```
//! # use archviz_core::draw::{TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_size(13);
//!
//! let text = Text::new(&style, "Cloud Build");
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! assert!(size.height() > 0.0);
//! ```

use std::sync::{Arc, Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use svg::{self, node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
};

/// Visual style of a text label.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Sans-Serif"` |
/// | Font size | `13` |
/// | Background color | `None` |
/// | Text color | `None` (SVG default, black) |
/// | Padding | Zero on all sides |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    background_color: Option<Color>,
    color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the background color drawn behind the text.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Sans-Serif".to_string(),
            font_size: 13,
            background_color: None,
            color: None,
            padding: Insets::default(),
        }
    }
}

/// A renderable text element.
///
/// Multi-line content is split on `\n` and rendered as one `<tspan>` per line,
/// centered on the render position.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    /// Calculate the total size required to display this text, including padding.
    pub fn calculate_size(&self) -> Size {
        let padding = self.definition.padding();
        self.calculate_size_without_padding().add_padding(padding)
    }

    fn calculate_size_without_padding(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl<'a> Drawable for Text<'a> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.content.is_empty() {
            return output;
        }

        let text_size = self.calculate_size();
        let lines: Vec<&str> = self.content.lines().collect();

        let text_size_without_padding = self.calculate_size_without_padding();
        let line_height = text_size_without_padding.height() / lines.len().max(1) as f32;

        let total_height = text_size_without_padding.height();
        let y_offset = -(total_height + line_height) / 2.0;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + y_offset)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            rendered_text = rendered_text.add(tspan);
        }

        if let Some(bg_color) = self.definition.background_color() {
            let bg_bounds = position.to_bounds(text_size);
            let bg_min_point = bg_bounds.min_point();

            let bg = svg_element::Rectangle::new()
                .set("x", bg_min_point.x())
                .set("y", bg_min_point.y())
                .set("width", bg_bounds.width())
                .set("height", bg_bounds.height())
                .set("fill", bg_color.to_string())
                .set("fill-opacity", bg_color.alpha())
                .set("rx", 3.0);

            // Label backgrounds must cover edge paths, so they share the text layer.
            output.add_to_layer(RenderLayer::Text, Box::new(bg));
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Measures text with a shared `FontSystem`.
///
/// Loading the system fonts is slow, so one instance lives for the whole process.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Calculate the size of `text` in pixels using real font metrics and shaping.
    ///
    /// Falls back to an average glyph width when shaping produces no glyphs,
    /// which happens when no font is installed.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        // Points to pixels at standard DPI
        let font_size_px = text_def.font_size() as f32 * 1.33;

        let line_height = font_size_px * 1.15;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        for last in buffer.layout_runs().map(|run| run.glyphs.last()) {
            if let Some(last) = last {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if max_width <= 0.0 {
            let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            max_width = longest as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height * text.lines().count().max(1) as f32;
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let def = TextDefinition::default();
        assert_eq!(def.font_size(), 13);
        assert_eq!(def.font_family(), "Sans-Serif");
        assert!(def.background_color().is_none());
        assert!(def.color().is_none());
        assert_approx_eq!(f32, def.padding().top(), 0.0);
    }

    #[test]
    fn test_text_definition_setters() {
        let mut def = TextDefinition::new();
        def.set_font_size(24);
        def.set_font_family("Helvetica");
        def.set_color(Some(Color::new("navy").unwrap()));
        def.set_padding(Insets::uniform(2.0));

        assert_eq!(def.font_size(), 24);
        assert_eq!(def.font_family(), "Helvetica");
        assert_eq!(def.color(), Some(Color::new("navy").unwrap()));
        assert_approx_eq!(f32, def.padding().left(), 2.0);
    }

    #[test]
    fn test_empty_text_has_zero_size() {
        let def = TextDefinition::default();
        let text = Text::new(&def, "");
        assert!(text.calculate_size().is_zero());
        assert!(text.render_to_layers(Point::default()).is_empty());
    }

    #[test]
    fn test_longer_text_is_wider() {
        let def = TextDefinition::default();
        let short = Text::new(&def, "API").calculate_size();
        let long = Text::new(&def, "GitHub repository").calculate_size();
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_multiline_text_is_taller() {
        let def = TextDefinition::default();
        let single = Text::new(&def, "WAF").calculate_size();
        let double = Text::new(&def, "WAF\nfront").calculate_size();
        assert!(double.height() > single.height());
    }

    #[test]
    fn test_padding_is_added_to_size() {
        let mut padded = TextDefinition::default();
        padded.set_padding(Insets::uniform(5.0));
        let plain = TextDefinition::default();

        let with_padding = Text::new(&padded, "Deploy").calculate_size();
        let without_padding = Text::new(&plain, "Deploy").calculate_size();
        assert_approx_eq!(
            f32,
            with_padding.width(),
            without_padding.width() + 10.0,
            epsilon = 0.001
        );
    }

    #[test]
    fn test_render_with_background() {
        let mut def = TextDefinition::default();
        def.set_background_color(Some(Color::new("white").unwrap()));
        let output = Text::new(&def, "https").render_to_layers(Point::new(10.0, 10.0));
        assert_eq!(output.count(RenderLayer::Text), 2);
    }
}
