//! Semantic model of an architecture diagram.
//!
//! The types here are the immutable result of running a diagram definition:
//! labeled [`Node`]s of a [`NodeCategory`], [`Cluster`]s that partition them,
//! and [`Edge`]s between them, together with the diagram-wide
//! [`GraphAttributes`] and [`Direction`].
//!
//! Everything is stored in declaration order, so two runs of the same
//! definition produce equal models.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{color::Color, identifier::Id};

/// Points per inch. Graph attributes are given in inches, like Graphviz.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Errors raised while interpreting user-supplied model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unknown node category `{0}`")]
    UnknownCategory(String),

    #[error("unknown graph attribute `{0}`")]
    UnknownAttribute(String),

    #[error("invalid value `{value}` for graph attribute `{key}`: {reason}")]
    InvalidAttribute {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid edge style `{0}`, valid values: solid, dotted, dashed, bold")]
    InvalidStyle(String),

    #[error("invalid direction `{0}`, valid values: LR, RL, TB, BT")]
    InvalidDirection(String),

    #[error("{0}")]
    InvalidColor(String),
}

/// The cloud or platform a node icon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OnPrem,
    Gcp,
}

impl Provider {
    /// Brand color used for the provider's icons.
    pub fn brand_color(self) -> &'static str {
        match self {
            Self::OnPrem => "#2D3436",
            Self::Gcp => "#4285F4",
        }
    }
}

/// Visual category of a node.
///
/// Each category is addressed by a dotted tag (`provider.group.Name`) and
/// drawn with its own icon.
///
/// # Examples
///
/// ```
/// use archviz_core::semantic::NodeCategory;
///
/// let category: NodeCategory = "gcp.compute.Run".parse().unwrap();
/// assert_eq!(category, NodeCategory::Run);
/// assert_eq!(category.tag(), "gcp.compute.Run");
/// assert!("gcp.compute.Lambda".parse::<NodeCategory>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Version-control host.
    Github,
    /// Build service.
    Build,
    /// Compute service.
    Run,
    /// Human actor.
    User,
}

impl NodeCategory {
    /// All known categories, in tag order.
    pub const ALL: [NodeCategory; 4] = [Self::Github, Self::Build, Self::Run, Self::User];

    /// The canonical dotted tag of this category.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Github => "onprem.vcs.Github",
            Self::Build => "gcp.devtools.Build",
            Self::Run => "gcp.compute.Run",
            Self::User => "onprem.client.User",
        }
    }

    /// The provider whose icon set the category belongs to.
    pub fn provider(self) -> Provider {
        match self {
            Self::Github | Self::User => Provider::OnPrem,
            Self::Build | Self::Run => Provider::Gcp,
        }
    }

    /// Human readable kind of the category.
    pub fn description(self) -> &'static str {
        match self {
            Self::Github => "version-control host",
            Self::Build => "build service",
            Self::Run => "compute service",
            Self::User => "human actor",
        }
    }
}

impl FromStr for NodeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which ends of an edge carry an arrowhead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// `source >> target`
    #[default]
    Forward,
    /// `source << target`
    Backward,
    /// Arrowheads on both ends.
    Both,
    /// `source - target`, no arrowheads.
    None,
}

impl EdgeDirection {
    /// Graphviz `dir` attribute value.
    pub fn dot_value(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "back",
            Self::Both => "both",
            Self::None => "none",
        }
    }
}

/// Line style of an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    Bold,
}

impl EdgeStyle {
    /// Graphviz `style` attribute value.
    pub fn dot_value(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dotted => "dotted",
            Self::Dashed => "dashed",
            Self::Bold => "bold",
        }
    }
}

impl FromStr for EdgeStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "solid" => Ok(Self::Solid),
            "dotted" => Ok(Self::Dotted),
            "dashed" => Ok(Self::Dashed),
            "bold" => Ok(Self::Bold),
            _ => Err(Error::InvalidStyle(s.to_string())),
        }
    }
}

/// Direction in which ranks advance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Direction {
    /// Graphviz `rankdir` value.
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
        }
    }

    /// True when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// True when ranks advance towards negative coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftToRight),
            "RL" => Ok(Self::RightToLeft),
            "TB" => Ok(Self::TopToBottom),
            "BT" => Ok(Self::BottomToTop),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

/// Layout algorithm used to position nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Longest-path ranking in declaration order.
    Basic,
    /// Layered layout with crossing minimization.
    #[default]
    Sugiyama,
}

/// How edges are routed between nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Splines {
    /// Horizontal and vertical segments only.
    #[default]
    Ortho,
    /// Straight lines.
    Line,
    /// Bezier curves.
    Curved,
}

impl Splines {
    /// Graphviz `splines` value.
    pub fn dot_value(self) -> &'static str {
        match self {
            Self::Ortho => "ortho",
            Self::Line => "line",
            Self::Curved => "curved",
        }
    }
}

impl FromStr for Splines {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ortho" => Ok(Self::Ortho),
            "line" | "false" | "none" | "polyline" => Ok(Self::Line),
            "curved" | "spline" | "true" => Ok(Self::Curved),
            _ => Err("expected one of ortho, line, curved".to_string()),
        }
    }
}

/// Diagram-wide rendering attributes.
///
/// Keys and defaults follow the Graphviz attributes that architecture
/// diagrams are usually tuned with. Distances are in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphAttributes {
    pad: f32,
    nodesep: f32,
    ranksep: f32,
    splines: Splines,
    bgcolor: Option<Color>,
    fontname: String,
    fontsize: f32,
    fontcolor: Color,
}

impl GraphAttributes {
    /// Keys accepted by [`GraphAttributes::set`].
    pub const KEYS: [&'static str; 8] = [
        "pad",
        "nodesep",
        "ranksep",
        "splines",
        "bgcolor",
        "fontname",
        "fontsize",
        "fontcolor",
    ];

    /// Sets one attribute from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAttribute`] for keys outside [`Self::KEYS`] and
    /// [`Error::InvalidAttribute`] when the value does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use archviz_core::semantic::GraphAttributes;
    ///
    /// let mut attributes = GraphAttributes::default();
    /// attributes.set("pad", "0").unwrap();
    /// assert_eq!(attributes.pad_points(), 0.0);
    /// assert!(attributes.set("shape", "box").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let invalid = |reason: String| Error::InvalidAttribute {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "pad" => self.pad = parse_inches(value).map_err(invalid)?,
            "nodesep" => self.nodesep = parse_inches(value).map_err(invalid)?,
            "ranksep" => self.ranksep = parse_inches(value).map_err(invalid)?,
            "splines" => self.splines = value.parse().map_err(invalid)?,
            "bgcolor" => self.bgcolor = Some(Color::new(value).map_err(invalid)?),
            "fontname" => self.fontname = value.to_string(),
            "fontsize" => {
                self.fontsize = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|size| *size > 0.0)
                    .ok_or_else(|| invalid("expected a positive number".to_string()))?
            }
            "fontcolor" => self.fontcolor = Color::new(value).map_err(invalid)?,
            _ => return Err(Error::UnknownAttribute(key.to_string())),
        }
        Ok(())
    }

    /// Outer margin around the drawing, in points.
    pub fn pad_points(&self) -> f32 {
        self.pad * POINTS_PER_INCH
    }

    /// Minimum space between nodes of the same rank, in points.
    pub fn nodesep_points(&self) -> f32 {
        self.nodesep * POINTS_PER_INCH
    }

    /// Minimum space between ranks, in points.
    pub fn ranksep_points(&self) -> f32 {
        self.ranksep * POINTS_PER_INCH
    }

    /// Raw attribute values as `(key, value)` pairs, in [`Self::KEYS`] order.
    ///
    /// `bgcolor` is omitted when unset.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("pad", self.pad.to_string()),
            ("nodesep", self.nodesep.to_string()),
            ("ranksep", self.ranksep.to_string()),
            ("splines", self.splines.dot_value().to_string()),
        ];
        if let Some(bgcolor) = self.bgcolor {
            pairs.push(("bgcolor", bgcolor.to_string()));
        }
        pairs.push(("fontname", self.fontname.clone()));
        pairs.push(("fontsize", self.fontsize.to_string()));
        pairs.push(("fontcolor", self.fontcolor.to_string()));
        pairs
    }

    pub fn splines(&self) -> Splines {
        self.splines
    }

    pub fn bgcolor(&self) -> Option<Color> {
        self.bgcolor
    }

    pub fn fontname(&self) -> &str {
        &self.fontname
    }

    pub fn fontsize(&self) -> f32 {
        self.fontsize
    }

    pub fn fontcolor(&self) -> Color {
        self.fontcolor
    }
}

impl Default for GraphAttributes {
    fn default() -> Self {
        Self {
            pad: 2.0,
            nodesep: 0.60,
            ranksep: 0.75,
            splines: Splines::Ortho,
            bgcolor: None,
            fontname: "Sans-Serif".to_string(),
            fontsize: 15.0,
            fontcolor: Color::new("#2D3436").expect("valid default font color"),
        }
    }
}

fn parse_inches(value: &str) -> Result<f32, String> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|inches| inches.is_finite() && *inches >= 0.0)
        .ok_or_else(|| "expected a non-negative number of inches".to_string())
}

/// A labeled node drawn with the icon of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    category: NodeCategory,
    cluster: Option<Id>,
}

impl Node {
    pub fn new(id: Id, label: impl Into<String>, category: NodeCategory, cluster: Option<Id>) -> Self {
        Self {
            id,
            label: label.into(),
            category,
            cluster,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// The innermost cluster containing this node, if any.
    pub fn cluster(&self) -> Option<Id> {
        self.cluster
    }
}

/// A labeled group of nodes, optionally nested in another cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: Id,
    label: String,
    parent: Option<Id>,
}

impl Cluster {
    pub fn new(id: Id, label: impl Into<String>, parent: Option<Id>) -> Self {
        Self {
            id,
            label: label.into(),
            parent,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }
}

/// A connector between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    label: Option<String>,
    color: Option<Color>,
    style: EdgeStyle,
    direction: EdgeDirection,
}

impl Edge {
    pub fn new(source: Id, target: Id, direction: EdgeDirection) -> Self {
        Self {
            source,
            target,
            label: None,
            color: None,
            style: EdgeStyle::default(),
            direction,
        }
    }

    /// Sets the label (builder style).
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Sets the stroke color (builder style).
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Sets the line style (builder style).
    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }
}

/// A complete diagram: title, attributes and all declared elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    title: String,
    attributes: GraphAttributes,
    direction: Direction,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(
        title: impl Into<String>,
        attributes: GraphAttributes,
        direction: Direction,
        nodes: Vec<Node>,
        clusters: Vec<Cluster>,
        edges: Vec<Edge>,
    ) -> Self {
        Self {
            title: title.into(),
            attributes,
            direction,
            nodes,
            clusters,
            edges,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn attributes(&self) -> &GraphAttributes {
        &self.attributes
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Clusters in declaration order. A parent is always declared before its children.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn cluster(&self, id: Id) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.id() == id)
    }

    /// Returns the first node with the given label.
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.label() == label)
    }

    /// Returns true if `node` lies in `cluster`, directly or through nested clusters.
    pub fn is_in_cluster(&self, node: &Node, cluster: Id) -> bool {
        let mut current = node.cluster();
        while let Some(id) = current {
            if id == cluster {
                return true;
            }
            current = self.cluster(id).and_then(Cluster::parent);
        }
        false
    }

    /// File name stem derived from the title: words joined with `_`, lowercased.
    ///
    /// # Examples
    ///
    /// ```
    /// use archviz_core::semantic::{Diagram, Direction, GraphAttributes};
    ///
    /// let diagram = Diagram::new(
    ///     "Vulnerable API protected",
    ///     GraphAttributes::default(),
    ///     Direction::default(),
    ///     Vec::new(),
    ///     Vec::new(),
    ///     Vec::new(),
    /// );
    /// assert_eq!(diagram.filename_stem(), "vulnerable_api_protected");
    /// ```
    pub fn filename_stem(&self) -> String {
        self.title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_category_from_tag_is_case_insensitive() {
        assert_eq!(
            "onprem.vcs.github".parse::<NodeCategory>().unwrap(),
            NodeCategory::Github
        );
        assert_eq!(
            "GCP.DEVTOOLS.BUILD".parse::<NodeCategory>().unwrap(),
            NodeCategory::Build
        );
    }

    #[test]
    fn test_category_unknown_tag() {
        let err = "aws.compute.EC2".parse::<NodeCategory>().unwrap_err();
        assert_eq!(err, Error::UnknownCategory("aws.compute.EC2".to_string()));
    }

    #[test]
    fn test_category_tags_roundtrip() {
        for category in NodeCategory::ALL {
            assert_eq!(category.tag().parse::<NodeCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_provider() {
        assert_eq!(NodeCategory::Github.provider(), Provider::OnPrem);
        assert_eq!(NodeCategory::User.provider(), Provider::OnPrem);
        assert_eq!(NodeCategory::Build.provider(), Provider::Gcp);
        assert_eq!(NodeCategory::Run.provider(), Provider::Gcp);
    }

    #[test]
    fn test_edge_style_from_str() {
        assert_eq!("dotted".parse::<EdgeStyle>().unwrap(), EdgeStyle::Dotted);
        assert_eq!("".parse::<EdgeStyle>().unwrap(), EdgeStyle::Solid);
        assert_eq!(
            "wavy".parse::<EdgeStyle>().unwrap_err(),
            Error::InvalidStyle("wavy".to_string())
        );
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftToRight);
        assert_eq!("BT".parse::<Direction>().unwrap(), Direction::BottomToTop);
        assert!("diagonal".parse::<Direction>().is_err());
        assert!(Direction::RightToLeft.is_horizontal());
        assert!(Direction::RightToLeft.is_reversed());
        assert!(!Direction::TopToBottom.is_reversed());
    }

    #[test]
    fn test_graph_attributes_defaults() {
        let attributes = GraphAttributes::default();
        assert_approx_eq!(f32, attributes.pad_points(), 144.0);
        assert_eq!(attributes.splines(), Splines::Ortho);
        assert!(attributes.bgcolor().is_none());
    }

    #[test]
    fn test_graph_attributes_set() {
        let mut attributes = GraphAttributes::default();
        attributes.set("pad", "0").unwrap();
        attributes.set("nodesep", "1").unwrap();
        attributes.set("splines", "curved").unwrap();
        attributes.set("bgcolor", "white").unwrap();

        assert_approx_eq!(f32, attributes.pad_points(), 0.0);
        assert_approx_eq!(f32, attributes.nodesep_points(), 72.0);
        assert_eq!(attributes.splines(), Splines::Curved);
        assert_eq!(attributes.bgcolor(), Some(Color::new("white").unwrap()));
    }

    #[test]
    fn test_graph_attributes_rejects_unknown_key() {
        let mut attributes = GraphAttributes::default();
        assert_eq!(
            attributes.set("shape", "box").unwrap_err(),
            Error::UnknownAttribute("shape".to_string())
        );
    }

    #[test]
    fn test_graph_attributes_rejects_bad_values() {
        let mut attributes = GraphAttributes::default();
        assert!(matches!(
            attributes.set("pad", "-1"),
            Err(Error::InvalidAttribute { .. })
        ));
        assert!(matches!(
            attributes.set("pad", "wide"),
            Err(Error::InvalidAttribute { .. })
        ));
        assert!(matches!(
            attributes.set("fontsize", "0"),
            Err(Error::InvalidAttribute { .. })
        ));
        assert!(matches!(
            attributes.set("bgcolor", "not-a-color"),
            Err(Error::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_is_in_cluster_follows_parents() {
        let outer = Id::new("cluster_outer_test");
        let inner = Id::new("cluster_inner_test");
        let node = Node::new(Id::new("node_in_inner"), "api", NodeCategory::Run, Some(inner));
        let loose = Node::new(Id::new("node_loose"), "user", NodeCategory::User, None);
        let diagram = Diagram::new(
            "nested",
            GraphAttributes::default(),
            Direction::default(),
            vec![node.clone(), loose.clone()],
            vec![
                Cluster::new(outer, "outer", None),
                Cluster::new(inner, "inner", Some(outer)),
            ],
            Vec::new(),
        );

        assert!(diagram.is_in_cluster(&node, inner));
        assert!(diagram.is_in_cluster(&node, outer));
        assert!(!diagram.is_in_cluster(&loose, outer));
    }

    #[test]
    fn test_filename_stem_collapses_whitespace() {
        let diagram = Diagram::new(
            "  My   Web\tService ",
            GraphAttributes::default(),
            Direction::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(diagram.filename_stem(), "my_web_service");
    }
}
