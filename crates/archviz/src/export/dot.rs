//! Graphviz DOT backend.
//!
//! Builds the graph a Graphviz-based diagram library would generate for the
//! same definition: graph, node and edge defaults, one `subgraph cluster_N`
//! per cluster and one statement per edge. The tree is assembled with
//! `dot_structures` in declaration order and printed by `graphviz_rust`, so
//! the output is stable across runs.

use dot_generator::{attr, id};
use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node as DotNode, NodeId, Stmt, Subgraph,
    Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::info;

use archviz_core::{
    color::Color,
    identifier,
    semantic::{Diagram, EdgeStyle, Node},
};

use crate::theme::Theme;

/// Side of the square reserved for a node icon, in inches.
const NODE_SIZE_INCHES: f32 = 1.4;

/// Writes a semantic diagram as a DOT `digraph`.
#[derive(Debug)]
pub struct Dot<'t> {
    theme: &'t Theme,
}

impl<'t> Dot<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self { theme }
    }

    /// Renders `diagram` as DOT source.
    pub fn export_diagram(&self, diagram: &Diagram) -> String {
        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(self.graph_attributes(diagram))),
            Stmt::GAttribute(GraphAttributes::Node(self.node_defaults(diagram))),
            Stmt::GAttribute(GraphAttributes::Edge(vec![Attribute(
                id!("color"),
                escaped(&self.theme.edge_color().to_hex_string()),
            )])),
        ];

        stmts.extend(
            diagram
                .nodes()
                .iter()
                .filter(|node| node.cluster().is_none())
                .map(node_statement),
        );
        for (index, cluster) in diagram.clusters().iter().enumerate() {
            if cluster.parent().is_none() {
                stmts.push(Stmt::Subgraph(self.cluster_subgraph(diagram, index, 0)));
            }
        }
        stmts.extend(diagram.edges().iter().map(edge_statement));

        let graph = Graph::DiGraph {
            id: escaped(diagram.title()),
            strict: false,
            stmts,
        };
        let out = graph.print(&mut PrinterContext::default());

        info!(bytes = out.len(); "DOT rendered");
        out
    }

    fn graph_attributes(&self, diagram: &Diagram) -> Vec<Attribute> {
        let attributes = diagram.attributes();
        let mut list: Vec<(&'static str, Id)> = attributes
            .to_pairs()
            .into_iter()
            .map(|(key, value)| match key {
                "bgcolor" => (key, escaped(&hex_or(attributes.bgcolor(), &value))),
                "fontcolor" => (key, escaped(&attributes.fontcolor().to_hex_string())),
                _ => (key, escaped(&value)),
            })
            .collect();
        list.push(("rankdir", id!(diagram.direction().rankdir())));
        if !diagram.title().is_empty() {
            list.push(("label", escaped(diagram.title())));
        }
        list.sort_by_key(|(key, _)| *key);
        list.into_iter()
            .map(|(key, value)| Attribute(id!(key), value))
            .collect()
    }

    fn node_defaults(&self, diagram: &Diagram) -> Vec<Attribute> {
        let attributes = diagram.attributes();
        let text = self.theme.node_text();
        vec![
            attr!("fixedsize", "true"),
            Attribute(id!("fontcolor"), escaped(&attributes.fontcolor().to_hex_string())),
            Attribute(id!("fontname"), escaped(text.font_family())),
            plain("fontsize", text.font_size()),
            plain("height", NODE_SIZE_INCHES),
            attr!("imagescale", "true"),
            attr!("labelloc", "b"),
            attr!("shape", "none"),
            plain("width", NODE_SIZE_INCHES),
        ]
    }

    fn cluster_subgraph(&self, diagram: &Diagram, index: usize, depth: usize) -> Subgraph {
        let cluster = &diagram.clusters()[index];
        let definition = self.theme.cluster(depth);

        let mut stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(vec![
            Attribute(id!("bgcolor"), escaped(&definition.fill_color().to_hex_string())),
            Attribute(id!("fontname"), escaped(definition.text().font_family())),
            plain("fontsize", definition.text().font_size()),
            Attribute(id!("label"), escaped(cluster.label())),
            attr!("labeljust", "l"),
            plain("margin", definition.padding().left()),
            Attribute(id!("pencolor"), escaped(&definition.stroke().color().to_hex_string())),
            plain("rankdir", diagram.direction().rankdir()),
            attr!("shape", "box"),
            attr!("style", "rounded"),
        ]))];

        stmts.extend(
            diagram
                .nodes()
                .iter()
                .filter(|node| node.cluster() == Some(cluster.id()))
                .map(node_statement),
        );
        for (child, nested) in diagram.clusters().iter().enumerate() {
            if nested.parent() == Some(cluster.id()) {
                stmts.push(Stmt::Subgraph(self.cluster_subgraph(diagram, child, depth + 1)));
            }
        }

        Subgraph {
            id: id!(format!("cluster_{index}")),
            stmts,
        }
    }
}

fn node_statement(node: &Node) -> Stmt {
    Stmt::Node(DotNode::new(
        node_id(node.id()),
        vec![
            Attribute(id!("label"), escaped(node.label())),
            Attribute(id!("tooltip"), escaped(node.category().tag())),
        ],
    ))
}

fn edge_statement(edge: &archviz_core::semantic::Edge) -> Stmt {
    let mut attributes = vec![plain("dir", edge.direction().dot_value())];
    if let Some(label) = edge.label() {
        attributes.push(Attribute(id!("label"), escaped(label)));
    }
    if let Some(color) = edge.color() {
        attributes.push(Attribute(id!("color"), escaped(&color.to_hex_string())));
    }
    if edge.style() != EdgeStyle::Solid {
        attributes.push(plain("style", edge.style().dot_value()));
    }

    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(
            Vertex::N(node_id(edge.source())),
            Vertex::N(node_id(edge.target())),
        ),
        attributes,
    })
}

fn node_id(id: identifier::Id) -> NodeId {
    NodeId(escaped(&id.to_string()), None)
}

fn plain(key: &str, value: impl std::fmt::Display) -> Attribute {
    Attribute(id!(key), id!(value))
}

fn hex_or(color: Option<Color>, fallback: &str) -> String {
    color.map_or_else(|| fallback.to_string(), Color::to_hex_string)
}

/// Quoted DOT identifier. The printer emits escaped ids verbatim, so inner
/// quotes and backslashes are escaped here.
fn escaped(value: &str) -> Id {
    id!(esc value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

#[cfg(test)]
mod tests {
    use archviz_core::{
        identifier::Id,
        semantic::{Cluster, Direction, Edge, EdgeDirection, GraphAttributes, NodeCategory},
    };

    use super::*;
    use crate::config::StyleConfig;

    fn diagram() -> Diagram {
        let mut attributes = GraphAttributes::default();
        attributes.set("pad", "0").unwrap();
        Diagram::new(
            "Nested \"demo\"",
            attributes,
            Direction::TopToBottom,
            vec![
                Node::new(Id::new("n0"), "GitHub repo", NodeCategory::Github, None),
                Node::new(Id::new("n1"), "Cloud Build", NodeCategory::Build, Some(Id::new("c0"))),
                Node::new(Id::new("n2"), "API", NodeCategory::Run, Some(Id::new("c1"))),
            ],
            vec![
                Cluster::new(Id::new("c0"), "Outer", None),
                Cluster::new(Id::new("c1"), "Inner", Some(Id::new("c0"))),
            ],
            vec![
                Edge::new(Id::new("n0"), Id::new("n1"), EdgeDirection::Forward)
                    .with_label(Some("Build Trigger".to_string()))
                    .with_color(Some(Color::new("black").unwrap())),
                Edge::new(Id::new("n1"), Id::new("n2"), EdgeDirection::None)
                    .with_style(EdgeStyle::Dotted),
            ],
        )
    }

    fn export(diagram: &Diagram) -> String {
        let theme = Theme::new(&StyleConfig::default(), diagram.attributes()).unwrap();
        Dot::new(&theme).export_diagram(diagram)
    }

    #[test]
    fn test_graph_header_and_defaults() {
        let dot = export(&diagram());

        assert!(dot.starts_with("digraph \"Nested \\\"demo\\\"\" {"));
        assert!(dot.contains("pad=\"0\""));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("splines=\"ortho\""));
        assert!(dot.contains("fontcolor=\"#2d3436\""));
        assert!(dot.contains("color=\"#7b8894\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_nested_clusters() {
        let dot = export(&diagram());

        let outer = dot.find("subgraph cluster_0").unwrap();
        let inner = dot.find("subgraph cluster_1").unwrap();
        let api = dot.find("label=\"API\"").unwrap();
        assert!(outer < inner && inner < api);
        assert!(dot.contains("bgcolor=\"#e5f5fd\""));
        assert!(dot.contains("bgcolor=\"#ebf3e7\""));
        assert!(dot.contains("label=\"Outer\""));
        assert!(dot.contains("labeljust=l"));
    }

    #[test]
    fn test_edge_statements() {
        let dot = export(&diagram());

        assert_eq!(dot.matches(" -> ").count(), 2);
        let first = dot.find("\"n0\" -> \"n1\"").unwrap();
        let second = dot.find("\"n1\" -> \"n2\"").unwrap();
        assert!(first < second);

        let first_edge = &dot[first..second];
        assert!(first_edge.contains("dir=forward"));
        assert!(first_edge.contains("label=\"Build Trigger\""));
        assert!(first_edge.contains("color=\"#000000\""));

        let second_edge = &dot[second..];
        assert!(second_edge.contains("dir=none"));
        assert!(second_edge.contains("style=dotted"));
        assert!(!second_edge.contains("label="));
    }

    #[test]
    fn test_output_is_stable() {
        assert_eq!(export(&diagram()), export(&diagram()));
    }

    #[test]
    fn test_labels_are_escaped() {
        let dot = export(&diagram());
        assert!(dot.contains("label=\"Nested \\\"demo\\\"\""));
        assert!(!dot.contains("\"Nested \"demo\"\""));
    }
}
