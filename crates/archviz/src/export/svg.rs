//! SVG backend.

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use archviz_core::{
    draw::{Arrow, ArrowDrawer, ClusterBox, Drawable, LayeredOutput, RenderLayer, Text},
    geometry::{Insets, Size},
};

use super::{Error, Exporter};
use crate::layout::Layout;

/// Builder for [`Svg`].
#[derive(Debug, Default)]
pub struct SvgBuilder {
    padding: f32,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Margin around the drawing, in points.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if the padding is negative or not finite.
    pub fn build(self) -> Result<Svg, Error> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::Render(format!(
                "invalid canvas padding {}",
                self.padding
            )));
        }
        Ok(Svg {
            padding: Insets::uniform(self.padding),
            arrow_drawer: ArrowDrawer::new(),
        })
    }
}

/// Draws a [`Layout`] into an SVG document.
#[derive(Debug)]
pub struct Svg {
    padding: Insets,
    arrow_drawer: ArrowDrawer,
}

impl Svg {
    /// Renders the layout into a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout bounds are not finite.
    pub fn render_layout(&mut self, layout: &Layout<'_>) -> Result<Document, Error> {
        let content_bounds = layout.bounds();
        let corners = [
            content_bounds.min_x(),
            content_bounds.min_y(),
            content_bounds.max_x(),
            content_bounds.max_y(),
        ];
        if corners.iter().any(|value| !value.is_finite()) {
            return Err(Error::Render("layout bounds are not finite".to_string()));
        }

        let svg_size = content_bounds.to_size().add_padding(self.padding);
        debug!(width = svg_size.width(), height = svg_size.height(); "SVG dimensions");

        let doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());
        let doc = self.add_background(doc, layout, svg_size);

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                self.padding.left() - content_bounds.min_x(),
                self.padding.top() - content_bounds.min_y()
            ),
        );
        for node in self.render_content(layout).render() {
            main_group = main_group.add(node);
        }

        let doc = doc.add(self.arrow_drawer.draw_marker_definitions());
        Ok(doc.add(main_group))
    }

    fn add_background(&self, doc: Document, layout: &Layout<'_>, size: Size) -> Document {
        match layout.theme().background() {
            Some(color) => doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            ),
            None => doc,
        }
    }

    fn render_content(&mut self, layout: &Layout<'_>) -> LayeredOutput {
        let theme = layout.theme();
        let mut output = LayeredOutput::new();

        for placed in layout.clusters() {
            let definition = theme.cluster(placed.depth());
            let bounds = placed.bounds();
            let cluster_box = ClusterBox::new(definition, placed.cluster().label(), bounds.to_size());
            output.merge(cluster_box.render_to_layers(bounds.center()));
        }

        for placed in layout.nodes() {
            let node = placed.node();
            let bounds = placed.bounds();
            // Invisible hit area naming the node, for tooltips and scripting.
            output.add_to_layer(
                RenderLayer::Content,
                Box::new(
                    svg_element::Rectangle::new()
                        .set("x", bounds.min_x())
                        .set("y", bounds.min_y())
                        .set("width", bounds.width())
                        .set("height", bounds.height())
                        .set("fill", "none")
                        .set("data-node", node.id().to_string())
                        .set("data-category", node.category().tag()),
                ),
            );
            output.merge(placed.drawable().render_to_layers(placed.position()));
        }

        for placed in layout.edges() {
            let edge = placed.edge();
            let arrow = Arrow::new(theme.arrow_for(edge), edge.direction().into());
            let text = edge.label().map(|label| Text::new(theme.edge_text(), label));
            output.merge(self.arrow_drawer.draw_arrow_with_text(
                &arrow,
                text.as_ref(),
                placed.source(),
                placed.target(),
            ));
        }

        if let Some(title) = layout.title() {
            output.merge(title.text().render_to_layers(title.position()));
        }

        debug!(
            clusters = output.count(RenderLayer::Cluster),
            content = output.count(RenderLayer::Content),
            arrows = output.count(RenderLayer::Arrow),
            texts = output.count(RenderLayer::Text);
            "Layers rendered"
        );
        output
    }
}

impl Exporter for Svg {
    fn export_layout(&mut self, layout: &Layout<'_>) -> Result<String, Error> {
        let doc = self.render_layout(layout)?;
        let rendered = doc.to_string();
        info!(bytes = rendered.len(), markers = self.arrow_drawer.marker_count(); "SVG rendered");
        Ok(rendered)
    }
}
