//! Scoped construction of diagram elements.
//!
//! A [`Scope`] is handed to the closure passed to
//! [`DiagramBuilder::define`](crate::DiagramBuilder::define). Nodes, clusters and
//! edges are declared through it; the scope records them in declaration order
//! and hands back opaque handles.
//!
//! ```
//! use archviz::{DiagramBuilder, Edge, semantic::NodeCategory};
//!
//! let diagram = DiagramBuilder::new("Pipeline")
//!     .define(|scope| {
//!         let repo = scope.node(NodeCategory::Github, "repo");
//!         let build = scope.cluster("CI", |ci| ci.node(NodeCategory::Build, "build"));
//!         scope.connect(repo, build, Edge::new().label("push"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(diagram.nodes().len(), 2);
//! assert_eq!(diagram.clusters().len(), 1);
//! assert_eq!(diagram.edges()[0].label(), Some("push"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};

use archviz_core::{
    color::Color,
    identifier::Id,
    semantic::{self, EdgeDirection, EdgeStyle, NodeCategory},
};

use crate::ArchvizError;

static NEXT_DIAGRAM_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a node declared in a [`Scope`].
///
/// Only valid for the diagram that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    diagram: u64,
    index: usize,
}

/// Opaque reference to an edge declared in a [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    diagram: u64,
    index: usize,
}

impl EdgeHandle {
    /// Position of the edge in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Attributes of an edge, given to [`Scope::connect`].
///
/// Color and style are kept as written and validated when the edge is
/// connected.
///
/// # Examples
///
/// ```
/// use archviz::Edge;
///
/// let trigger = Edge::new().label("Build Trigger").color("black");
/// let deploy = Edge::new().label("Deploy").style("dotted");
/// let link = Edge::undirected();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edge {
    label: Option<String>,
    color: Option<String>,
    style: Option<String>,
    direction: EdgeDirection,
}

impl Edge {
    /// A forward edge with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// An edge without arrowheads.
    pub fn undirected() -> Self {
        Self::default().direction(EdgeDirection::None)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the stroke color, as a CSS color string.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the line style: `solid`, `dotted`, `dashed` or `bold`.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    fn into_semantic(self, source: Id, target: Id) -> Result<semantic::Edge, ArchvizError> {
        let color = self
            .color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(ArchvizError::Style)?;
        let style = match self.style.as_deref() {
            Some(style) => style.parse::<EdgeStyle>()?,
            None => EdgeStyle::default(),
        };

        Ok(semantic::Edge::new(source, target, self.direction)
            .with_label(self.label.filter(|label| !label.is_empty()))
            .with_color(color)
            .with_style(style))
    }
}

/// Elements recorded while a diagram definition runs.
#[derive(Debug)]
pub(crate) struct DiagramState {
    token: u64,
    nodes: Vec<semantic::Node>,
    clusters: Vec<semantic::Cluster>,
    edges: Vec<semantic::Edge>,
}

impl DiagramState {
    pub(crate) fn new() -> Self {
        Self {
            token: NEXT_DIAGRAM_TOKEN.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            clusters: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<semantic::Node>,
        Vec<semantic::Cluster>,
        Vec<semantic::Edge>,
    ) {
        (self.nodes, self.clusters, self.edges)
    }
}

/// The declaration context of a diagram or of one of its clusters.
#[derive(Debug)]
pub struct Scope<'s> {
    state: &'s mut DiagramState,
    cluster: Option<Id>,
}

impl<'s> Scope<'s> {
    pub(crate) fn new(state: &'s mut DiagramState) -> Self {
        Self {
            state,
            cluster: None,
        }
    }

    /// Declares a node of the given category in this scope.
    pub fn node(&mut self, category: NodeCategory, label: impl Into<String>) -> NodeHandle {
        let index = self.state.nodes.len();
        let label = label.into();
        trace!(index, category:% = category, label:% = label; "Declaring node");

        self.state.nodes.push(semantic::Node::new(
            Id::indexed("node", index),
            label,
            category,
            self.cluster,
        ));

        NodeHandle {
            diagram: self.state.token,
            index,
        }
    }

    /// Declares a node whose category is given by its dotted tag,
    /// such as `gcp.compute.Run`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::UnknownCategory`] for unrecognized tags.
    pub fn node_tagged(
        &mut self,
        tag: &str,
        label: impl Into<String>,
    ) -> Result<NodeHandle, ArchvizError> {
        let category = tag.parse::<NodeCategory>()?;
        Ok(self.node(category, label))
    }

    /// Opens a cluster inside this scope and runs `f` in it.
    ///
    /// Nodes declared by `f` belong to the new cluster. Returns whatever `f` returns.
    pub fn cluster<R>(&mut self, label: impl Into<String>, f: impl FnOnce(&mut Scope<'_>) -> R) -> R {
        let index = self.state.clusters.len();
        let id = Id::indexed("cluster", index);
        let label = label.into();
        debug!(index, label:% = label; "Opening cluster");

        self.state
            .clusters
            .push(semantic::Cluster::new(id, label, self.cluster));

        let mut inner = Scope {
            state: &mut *self.state,
            cluster: Some(id),
        };
        f(&mut inner)
    }

    /// Connects two previously declared nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::InvalidHandle`] when a handle was issued by
    /// another diagram, and [`ArchvizError::Style`] when the color or style of
    /// `edge` does not parse.
    pub fn connect(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        edge: Edge,
    ) -> Result<EdgeHandle, ArchvizError> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;

        let edge = edge.into_semantic(source, target)?;
        trace!(source:% = source, target:% = target, label:? = edge.label(); "Connecting nodes");

        let index = self.state.edges.len();
        self.state.edges.push(edge);

        Ok(EdgeHandle {
            diagram: self.state.token,
            index,
        })
    }

    fn resolve(&self, handle: NodeHandle) -> Result<Id, ArchvizError> {
        if handle.diagram != self.state.token {
            return Err(ArchvizError::InvalidHandle(format!(
                "node handle #{} belongs to another diagram",
                handle.index
            )));
        }
        self.state
            .nodes
            .get(handle.index)
            .map(semantic::Node::id)
            .ok_or_else(|| {
                ArchvizError::InvalidHandle(format!("unknown node handle #{}", handle.index))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_record_innermost_cluster() {
        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);

        scope.node(NodeCategory::Github, "repo");
        scope.cluster("outer", |outer| {
            outer.node(NodeCategory::Build, "build");
            outer.cluster("inner", |inner| {
                inner.node(NodeCategory::Run, "api");
            });
        });

        let (nodes, clusters, _) = state.into_parts();
        assert_eq!(nodes[0].cluster(), None);
        assert_eq!(nodes[1].cluster(), Some(clusters[0].id()));
        assert_eq!(nodes[2].cluster(), Some(clusters[1].id()));
        assert_eq!(clusters[1].parent(), Some(clusters[0].id()));
    }

    #[test]
    fn test_cluster_returns_closure_value() {
        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);

        let (waf, api) = scope.cluster("API project", |project| {
            (
                project.node(NodeCategory::Run, "WAF"),
                project.node(NodeCategory::Run, "API"),
            )
        });
        assert_ne!(waf, api);
    }

    #[test]
    fn test_node_tagged_rejects_unknown_tag() {
        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);

        let err = scope.node_tagged("aws.compute.EC2", "vm").unwrap_err();
        assert!(matches!(err, ArchvizError::UnknownCategory(tag) if tag == "aws.compute.EC2"));
        assert!(scope.node_tagged("GCP.COMPUTE.RUN", "api").is_ok());
    }

    #[test]
    fn test_connect_rejects_foreign_handle() {
        let mut other_state = DiagramState::new();
        let foreign = Scope::new(&mut other_state).node(NodeCategory::User, "someone");

        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);
        let local = scope.node(NodeCategory::Run, "api");

        let err = scope.connect(foreign, local, Edge::new()).unwrap_err();
        assert!(matches!(err, ArchvizError::InvalidHandle(_)));
        assert!(state.edges.is_empty());
    }

    #[test]
    fn test_connect_rejects_bad_color_and_style() {
        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);
        let a = scope.node(NodeCategory::Run, "a");
        let b = scope.node(NodeCategory::Run, "b");

        let err = scope.connect(a, b, Edge::new().color("blurple")).unwrap_err();
        assert!(matches!(err, ArchvizError::Style(_)));

        let err = scope.connect(a, b, Edge::new().style("wavy")).unwrap_err();
        assert!(matches!(err, ArchvizError::Style(_)));
    }

    #[test]
    fn test_connect_records_attributes() {
        let mut state = DiagramState::new();
        let mut scope = Scope::new(&mut state);
        let a = scope.node(NodeCategory::Build, "build");
        let b = scope.node(NodeCategory::Run, "waf");

        let handle = scope
            .connect(a, b, Edge::new().label("Deploy").style("dotted"))
            .unwrap();
        let link = scope.connect(a, b, Edge::undirected()).unwrap();
        assert_eq!(handle.index(), 0);
        assert_eq!(link.index(), 1);

        let (nodes, _, edges) = state.into_parts();
        assert_eq!(edges[0].source(), nodes[0].id());
        assert_eq!(edges[0].target(), nodes[1].id());
        assert_eq!(edges[0].label(), Some("Deploy"));
        assert_eq!(edges[0].style(), EdgeStyle::Dotted);
        assert_eq!(edges[0].direction(), EdgeDirection::Forward);
        assert_eq!(edges[1].label(), None);
        assert_eq!(edges[1].direction(), EdgeDirection::None);
    }
}
