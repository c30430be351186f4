//! Graph view of a semantic diagram.
//!
//! [`DiagramGraph`] re-checks the model invariants once the definition scope
//! has closed and exposes the queries the layout stage needs: node order,
//! adjacency, cluster membership and cluster nesting.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use archviz_core::{identifier::Id, semantic};

use crate::ArchvizError;

/// Directed graph over the nodes of a diagram, one graph edge per diagram edge.
#[derive(Debug)]
pub struct DiagramGraph<'a> {
    diagram: &'a semantic::Diagram,
    graph: DiGraph<&'a semantic::Node, &'a semantic::Edge>,
    indices: IndexMap<Id, NodeIndex>,
}

impl<'a> DiagramGraph<'a> {
    /// Builds the graph and validates the diagram.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::Graph`] for duplicate node ids, nodes or
    /// clusters that reference an unknown (or later) cluster, and edges whose
    /// endpoints are not nodes of the diagram.
    pub fn from_diagram(diagram: &'a semantic::Diagram) -> Result<Self, ArchvizError> {
        let mut known_clusters = HashSet::new();
        for cluster in diagram.clusters() {
            if let Some(parent) = cluster.parent().filter(|p| !known_clusters.contains(p)) {
                return Err(ArchvizError::Graph(format!(
                    "cluster `{}` is nested in unknown cluster `{parent}`",
                    cluster.label()
                )));
            }
            if !known_clusters.insert(cluster.id()) {
                return Err(ArchvizError::Graph(format!(
                    "duplicate cluster id `{}`",
                    cluster.id()
                )));
            }
        }

        let mut graph = DiGraph::with_capacity(diagram.nodes().len(), diagram.edges().len());
        let mut indices = IndexMap::with_capacity(diagram.nodes().len());

        for node in diagram.nodes() {
            if let Some(cluster) = node.cluster().filter(|c| !known_clusters.contains(c)) {
                return Err(ArchvizError::Graph(format!(
                    "node `{}` belongs to unknown cluster `{cluster}`",
                    node.label()
                )));
            }
            let index = graph.add_node(node);
            if indices.insert(node.id(), index).is_some() {
                return Err(ArchvizError::Graph(format!(
                    "duplicate node id `{}`",
                    node.id()
                )));
            }
        }

        for edge in diagram.edges() {
            let endpoint = |id: Id| {
                indices.get(&id).copied().ok_or_else(|| {
                    ArchvizError::Graph(format!("edge references unknown node `{id}`"))
                })
            };
            let source = endpoint(edge.source())?;
            let target = endpoint(edge.target())?;
            graph.add_edge(source, target, edge);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            clusters = diagram.clusters().len();
            "Diagram graph built"
        );

        Ok(Self {
            diagram,
            graph,
            indices,
        })
    }

    pub fn diagram(&self) -> &'a semantic::Diagram {
        self.diagram
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &'a semantic::Node> + '_ {
        self.indices.values().map(|&index| self.graph[index])
    }

    /// Position of a node in declaration order.
    pub fn node_position(&self, id: Id) -> Option<usize> {
        self.indices.get_index_of(&id)
    }

    /// Edges as `(source, target, edge)`, in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id, &'a semantic::Edge)> + '_ {
        self.graph.raw_edges().iter().map(|edge| {
            (
                self.graph[edge.source()].id(),
                self.graph[edge.target()].id(),
                edge.weight,
            )
        })
    }

    /// Node ids in topological order.
    ///
    /// Cyclic graphs fall back to declaration order.
    pub fn topological_order(&self) -> Vec<Id> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().map(|index| self.graph[index].id()).collect(),
            Err(cycle) => {
                trace!(node:% = self.graph[cycle.node_id()].id(); "Cycle found, using declaration order");
                self.indices.keys().copied().collect()
            }
        }
    }

    /// Clusters enclosing `cluster`, innermost first, starting with `cluster` itself.
    pub fn cluster_chain(&self, cluster: Id) -> Vec<Id> {
        let mut chain = Vec::new();
        let mut current = Some(cluster);
        while let Some(id) = current {
            chain.push(id);
            current = self.diagram.cluster(id).and_then(semantic::Cluster::parent);
        }
        chain
    }

    /// Clusters enclosing a node, outermost first.
    pub fn node_clusters(&self, node: &semantic::Node) -> Vec<Id> {
        let mut chain = node
            .cluster()
            .map(|cluster| self.cluster_chain(cluster))
            .unwrap_or_default();
        chain.reverse();
        chain
    }

    /// Nesting depth of a cluster; top-level clusters have depth 0.
    pub fn cluster_depth(&self, cluster: Id) -> usize {
        self.cluster_chain(cluster).len().saturating_sub(1)
    }

    /// Nodes inside `cluster`, including nodes of nested clusters.
    pub fn cluster_members(&self, cluster: Id) -> impl Iterator<Item = &'a semantic::Node> + '_ {
        let diagram = self.diagram;
        self.nodes()
            .filter(move |node| diagram.is_in_cluster(node, cluster))
    }
}
