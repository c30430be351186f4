//! Configuration types for archviz rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the command-line tool.
//!
//! - [`AppConfig`] - top-level configuration combining layout and style settings
//! - [`LayoutConfig`] - layout engine and default spacing
//! - [`StyleConfig`] - default colors and font
//!
//! Values set here are defaults: graph attributes given by the diagram
//! definition (such as `nodesep` or `bgcolor`) take precedence.
//!
//! # Example
//!
//! ```
//! # use archviz::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().unwrap().is_none());
//! ```

use serde::Deserialize;

use archviz_core::{color::Color, semantic::LayoutEngine};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout configuration section.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Engine used to place nodes.
    #[serde(default)]
    engine: LayoutEngine,

    /// Default `nodesep`, in inches.
    #[serde(default)]
    node_spacing: Option<f32>,

    /// Default `ranksep`, in inches.
    #[serde(default)]
    rank_spacing: Option<f32>,
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn node_spacing(&self) -> Option<f32> {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> Option<f32> {
        self.rank_spacing
    }
}

/// Style configuration section.
///
/// Colors are kept as strings and parsed on access, so a bad value is
/// reported when the diagram is rendered rather than when the file is read.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,

    #[serde(default)]
    cluster_background_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed default background [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background", self.background_color.as_deref())
    }

    /// Returns the parsed default edge [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Option<Color>, String> {
        parse_color("edge", self.edge_color.as_deref())
    }

    /// Returns the parsed cluster fill [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn cluster_background_color(&self) -> Result<Option<Color>, String> {
        parse_color("cluster background", self.cluster_background_color.as_deref())
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }
}

fn parse_color(what: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.layout().engine(), LayoutEngine::Sugiyama);
        assert!(config.layout().node_spacing().is_none());
        assert!(config.style().edge_color().unwrap().is_none());
        assert!(config.style().font_family().is_none());
    }

    #[test]
    fn test_invalid_color_is_reported_on_access() {
        let style = StyleConfig {
            edge_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        let err = style.edge_color().unwrap_err();
        assert!(err.contains("Invalid edge color"));
    }

    #[test]
    fn test_layout_config_new() {
        let layout = LayoutConfig::new(LayoutEngine::Basic);
        assert_eq!(layout.engine(), LayoutEngine::Basic);
        assert!(layout.rank_spacing().is_none());
    }
}
