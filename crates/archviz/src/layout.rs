//! Layout of a diagram graph.
//!
//! Layout runs in three steps:
//!
//! 1. a [`RankingEngine`](engines::RankingEngine) assigns every node a rank
//!    and an ordering key;
//! 2. ranks are turned into coordinates along the diagram direction, keeping
//!    the members of a cluster next to each other within each rank;
//! 3. cluster boxes are fitted around their members, nodes that overlap a
//!    foreign cluster box are pushed out of it, and edges are clipped to the
//!    node icons.
//!
//! Coordinates are computed in *flow space*, where ranks advance along the
//! main axis and nodes of a rank are spread along the cross axis, then mapped
//! to screen space according to [`Direction`].

mod engines;

use std::{cmp::Ordering, collections::HashSet};

use indexmap::IndexMap;
use log::{debug, info, trace};

use archviz_core::{
    draw::{Drawable, NodeWithLabel, Text, icon_for},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::{self, Direction, LayoutEngine},
};

use crate::{ArchvizError, structure::DiagramGraph, theme::Theme};

/// Gap between the diagram content and the title below it.
const TITLE_GAP: f32 = 24.0;

/// Maximum number of push-out passes over all clusters.
const MAX_PUSH_PASSES: usize = 8;

/// A node with its drawable and center position.
#[derive(Debug)]
pub struct PlacedNode<'a> {
    node: &'a semantic::Node,
    drawable: NodeWithLabel<'a>,
    position: Point,
    rank: usize,
}

impl<'a> PlacedNode<'a> {
    pub fn node(&self) -> &'a semantic::Node {
        self.node
    }

    pub fn drawable(&self) -> &NodeWithLabel<'a> {
        &self.drawable
    }

    /// Center of the node's whole extent, icon and label.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.position, self.drawable.size())
    }

    fn shift(&mut self, offset: Point) {
        self.position = self.position.add_point(offset);
    }
}

/// A cluster box.
#[derive(Debug, Clone)]
pub struct PlacedCluster<'a> {
    cluster: &'a semantic::Cluster,
    depth: usize,
    bounds: Bounds,
}

impl<'a> PlacedCluster<'a> {
    pub fn cluster(&self) -> &'a semantic::Cluster {
        self.cluster
    }

    /// Nesting depth; top-level clusters have depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// An edge clipped to the icons of its endpoints.
#[derive(Debug, Clone)]
pub struct PlacedEdge<'a> {
    edge: &'a semantic::Edge,
    source: Point,
    target: Point,
}

impl<'a> PlacedEdge<'a> {
    pub fn edge(&self) -> &'a semantic::Edge {
        self.edge
    }

    pub fn source(&self) -> Point {
        self.source
    }

    pub fn target(&self) -> Point {
        self.target
    }
}

/// The diagram title, centered under the content.
#[derive(Debug, Clone)]
pub struct PlacedTitle<'a> {
    text: Text<'a>,
    position: Point,
}

impl<'a> PlacedTitle<'a> {
    pub fn text(&self) -> &Text<'a> {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Positioned elements of a diagram, ready for export.
#[derive(Debug)]
pub struct Layout<'a> {
    theme: &'a Theme,
    nodes: Vec<PlacedNode<'a>>,
    clusters: Vec<PlacedCluster<'a>>,
    edges: Vec<PlacedEdge<'a>>,
    title: Option<PlacedTitle<'a>>,
    bounds: Bounds,
}

impl<'a> Layout<'a> {
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[PlacedNode<'a>] {
        &self.nodes
    }

    /// Clusters in declaration order, so enclosing clusters come first.
    pub fn clusters(&self) -> &[PlacedCluster<'a>] {
        &self.clusters
    }

    pub fn edges(&self) -> &[PlacedEdge<'a>] {
        &self.edges
    }

    pub fn title(&self) -> Option<&PlacedTitle<'a>> {
        self.title.as_ref()
    }

    /// Bounds of everything drawn, title included.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Computes a [`Layout`] with the selected engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBuilder {
    engine: LayoutEngine,
}

impl LayoutBuilder {
    pub fn new(engine: LayoutEngine) -> Self {
        Self { engine }
    }

    /// Lays out `graph` with the drawing definitions of `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::Layout`] if the ranking engine fails or returns
    /// an incomplete ranking.
    pub fn build<'a>(
        &self,
        graph: &DiagramGraph<'a>,
        theme: &'a Theme,
    ) -> Result<Layout<'a>, ArchvizError> {
        let diagram = graph.diagram();
        let attributes = diagram.attributes();
        let flow = Flow::new(diagram.direction());

        let node_sep = attributes.nodesep_points();
        let rank_sep = attributes.ranksep_points();
        let level_margin = cluster_level_margin(graph, theme);

        info!(engine:? = self.engine, direction:? = diagram.direction(); "Ranking nodes");
        let grid = engines::engine_for(self.engine, node_sep / 12.0).rank(graph)?;

        let mut placed: IndexMap<Id, (NodeWithLabel<'a>, usize)> = IndexMap::new();
        for node in graph.nodes() {
            let slot = grid.get(&node.id()).ok_or_else(|| {
                ArchvizError::Layout(format!("node `{}` was not ranked", node.label()))
            })?;
            let text = (!node.label().is_empty())
                .then(|| Text::new(theme.node_text(), node.label()));
            placed.insert(
                node.id(),
                (NodeWithLabel::new(icon_for(node.category()), text), slot.rank()),
            );
        }

        let rank_count = grid.values().map(|slot| slot.rank() + 1).max().unwrap_or(0);
        let mut ranks: Vec<Vec<&'a semantic::Node>> = vec![Vec::new(); rank_count];
        for node in graph.nodes() {
            ranks[placed[&node.id()].1].push(node);
        }
        for (rank, members) in ranks.iter_mut().enumerate() {
            let current: &[&'a semantic::Node] = members.as_slice();
            let mut keyed: Vec<(SortKey, &'a semantic::Node)> = current
                .iter()
                .map(|node| (sort_key(graph, &grid, current, node), *node))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));
            *members = keyed.into_iter().map(|(_, node)| node).collect();
            trace!(rank, size = members.len(); "Rank ordered");
        }

        // Main axis: one band per rank.
        let flow_size = |id: Id| flow.size(placed[&id].0.size());
        let mut main_centers = Vec::with_capacity(rank_count);
        let mut cursor = 0.0_f32;
        for (rank, members) in ranks.iter().enumerate() {
            let thickness = members
                .iter()
                .map(|node| flow_size(node.id()).height())
                .fold(0.0, f32::max);
            if rank > 0 {
                let crossings = cluster_set_difference(graph, &ranks[rank - 1], members);
                cursor += rank_sep + level_margin * crossings as f32;
            }
            main_centers.push(cursor + thickness / 2.0);
            cursor += thickness;
        }

        // Cross axis: nodes of a rank side by side, the rank centered on zero.
        let mut positions: IndexMap<Id, Point> = IndexMap::new();
        for (rank, members) in ranks.iter().enumerate() {
            let mut crosses = Vec::with_capacity(members.len());
            let mut cursor = 0.0_f32;
            for (i, node) in members.iter().enumerate() {
                let extent = flow_size(node.id()).width();
                if i > 0 {
                    let levels = cluster_levels_between(graph, members[i - 1], node);
                    cursor += node_sep + level_margin * levels as f32;
                }
                crosses.push(cursor + extent / 2.0);
                cursor += extent;
            }
            let offset = cursor / 2.0;
            for (node, cross) in members.iter().zip(crosses) {
                positions.insert(
                    node.id(),
                    flow.to_screen(cross - offset, main_centers[rank]),
                );
            }
        }

        let mut nodes: Vec<PlacedNode<'a>> = Vec::with_capacity(placed.len());
        for (node, (id, (drawable, rank))) in graph.nodes().zip(placed) {
            let position = positions.get(&id).copied().ok_or_else(|| {
                ArchvizError::Layout(format!("no position for node `{}`", node.label()))
            })?;
            nodes.push(PlacedNode {
                node,
                drawable,
                position,
                rank,
            });
        }

        push_out_of_foreign_clusters(graph, theme, &flow, node_sep, &mut nodes);
        let clusters = fit_clusters(graph, theme, &nodes);

        let mut edges = Vec::with_capacity(diagram.edges().len());
        for (source, target, edge) in graph.edges() {
            let find = |id: Id| {
                nodes.iter().find(|placed| placed.node.id() == id).ok_or_else(|| {
                    ArchvizError::Layout(format!("edge endpoint `{id}` was not placed"))
                })
            };
            let (source, target) = (find(source)?, find(target)?);
            let source_center = source.drawable.icon_center(source.position);
            let target_center = target.drawable.icon_center(target.position);
            edges.push(PlacedEdge {
                edge,
                source: source.drawable.find_intersection(source.position, target_center),
                target: target.drawable.find_intersection(target.position, source_center),
            });
        }

        let mut bounds = nodes
            .iter()
            .map(PlacedNode::bounds)
            .chain(clusters.iter().map(PlacedCluster::bounds))
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();

        let title = (!diagram.title().is_empty()).then(|| {
            let text = Text::new(theme.title_text(), diagram.title());
            let size = text.calculate_size();
            let position = Point::new(
                bounds.center().x(),
                bounds.max_y() + TITLE_GAP + size.height() / 2.0,
            );
            PlacedTitle { text, position }
        });
        if let Some(title) = &title {
            let size = title.text.calculate_size();
            bounds = bounds.merge(&Bounds::new_from_center(title.position, size));
        }

        info!(
            nodes = nodes.len(),
            clusters = clusters.len(),
            edges = edges.len(),
            ranks = rank_count,
            width = bounds.width(),
            height = bounds.height();
            "Layout calculated"
        );

        Ok(Layout {
            theme,
            nodes,
            clusters,
            edges,
            title,
            bounds,
        })
    }
}

/// Mapping between flow space and screen space.
#[derive(Debug, Clone, Copy)]
struct Flow {
    horizontal: bool,
    reversed: bool,
}

impl Flow {
    fn new(direction: Direction) -> Self {
        Self {
            horizontal: direction.is_horizontal(),
            reversed: direction.is_reversed(),
        }
    }

    /// Size with the cross extent as width and the main extent as height.
    fn size(&self, screen: Size) -> Size {
        if self.horizontal {
            screen.transpose()
        } else {
            screen
        }
    }

    fn to_screen(&self, cross: f32, main: f32) -> Point {
        let main = if self.reversed { -main } else { main };
        if self.horizontal {
            Point::new(main, cross)
        } else {
            Point::new(cross, main)
        }
    }

    fn cross_of(&self, point: Point) -> f32 {
        if self.horizontal { point.y() } else { point.x() }
    }

    fn cross_range(&self, bounds: Bounds) -> (f32, f32) {
        if self.horizontal {
            (bounds.min_y(), bounds.max_y())
        } else {
            (bounds.min_x(), bounds.max_x())
        }
    }

    fn cross_offset(&self, delta: f32) -> Point {
        if self.horizontal {
            Point::new(0.0, delta)
        } else {
            Point::new(delta, 0.0)
        }
    }
}

/// Extra spacing reserved per cluster boundary between two nodes.
fn cluster_level_margin(graph: &DiagramGraph<'_>, theme: &Theme) -> f32 {
    graph
        .diagram()
        .clusters()
        .iter()
        .map(|cluster| {
            let insets = theme
                .cluster(graph.cluster_depth(cluster.id()))
                .content_insets(cluster.label());
            insets
                .top()
                .max(insets.bottom())
                .max(insets.left())
                .max(insets.right())
        })
        .fold(0.0, f32::max)
}

/// Number of cluster boundaries separating two neighbours of a rank.
fn cluster_levels_between(
    graph: &DiagramGraph<'_>,
    a: &semantic::Node,
    b: &semantic::Node,
) -> usize {
    let (a, b) = (graph.node_clusters(a), graph.node_clusters(b));
    let common = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    a.len() + b.len() - 2 * common
}

/// Number of clusters present in exactly one of two neighbouring ranks.
fn cluster_set_difference(
    graph: &DiagramGraph<'_>,
    previous: &[&semantic::Node],
    next: &[&semantic::Node],
) -> usize {
    let collect = |nodes: &[&semantic::Node]| -> HashSet<Id> {
        nodes
            .iter()
            .flat_map(|node| graph.node_clusters(node))
            .collect()
    };
    let (previous, next) = (collect(previous), collect(next));
    previous.symmetric_difference(&next).count()
}

/// Lexicographic ordering key of a node within its rank.
///
/// Each enclosing cluster contributes the smallest ordering key of its members
/// on the rank, so members of one cluster sort next to each other.
type SortKey = Vec<(f32, usize)>;

fn sort_key(
    graph: &DiagramGraph<'_>,
    grid: &engines::Grid,
    rank: &[&semantic::Node],
    node: &semantic::Node,
) -> SortKey {
    let diagram = graph.diagram();
    let cluster_count = diagram.clusters().len();
    let order = |node: &semantic::Node| grid.get(&node.id()).map_or(0.0, |slot| slot.order());

    let mut key: SortKey = graph
        .node_clusters(node)
        .into_iter()
        .map(|cluster| {
            let first = rank
                .iter()
                .filter(|member| diagram.is_in_cluster(member, cluster))
                .map(|member| order(*member))
                .fold(f32::INFINITY, f32::min);
            let index = diagram
                .clusters()
                .iter()
                .position(|c| c.id() == cluster)
                .unwrap_or(0);
            (first, index)
        })
        .collect();
    let position = graph.node_position(node.id()).unwrap_or(0);
    key.push((order(node), cluster_count + position));
    key
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Fits every non-empty cluster around its members and nested clusters.
fn fit_clusters<'a>(
    graph: &DiagramGraph<'a>,
    theme: &Theme,
    nodes: &[PlacedNode<'a>],
) -> Vec<PlacedCluster<'a>> {
    let diagram = graph.diagram();
    let clusters = diagram.clusters();
    let mut fitted: Vec<Option<Bounds>> = vec![None; clusters.len()];

    // Children are declared after their parents.
    for (index, cluster) in clusters.iter().enumerate().rev() {
        let members = nodes
            .iter()
            .filter(|placed| placed.node.cluster() == Some(cluster.id()))
            .map(PlacedNode::bounds);
        let children = clusters
            .iter()
            .zip(&fitted)
            .filter(|(child, _)| child.parent() == Some(cluster.id()))
            .filter_map(|(_, bounds)| *bounds);

        fitted[index] = members
            .chain(children)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .map(|content| {
                let depth = graph.cluster_depth(cluster.id());
                content.add_padding(theme.cluster(depth).content_insets(cluster.label()))
            });
        if fitted[index].is_none() {
            debug!(cluster = cluster.label(); "Skipping empty cluster");
        }
    }

    clusters
        .iter()
        .zip(fitted)
        .filter_map(|(cluster, bounds)| {
            bounds.map(|bounds| PlacedCluster {
                cluster,
                depth: graph.cluster_depth(cluster.id()),
                bounds,
            })
        })
        .collect()
}

/// Moves nodes out of cluster boxes they do not belong to.
///
/// A node overlapping a foreign box is moved along the cross axis to the
/// nearer side of the box, together with the nodes beyond it on its rank.
fn push_out_of_foreign_clusters<'a>(
    graph: &DiagramGraph<'a>,
    theme: &Theme,
    flow: &Flow,
    node_sep: f32,
    nodes: &mut [PlacedNode<'a>],
) {
    let gap = node_sep / 2.0;

    for pass in 0..MAX_PUSH_PASSES {
        let mut moved = false;
        for placed_cluster in fit_clusters(graph, theme, nodes) {
            let members: HashSet<Id> = graph
                .cluster_members(placed_cluster.cluster.id())
                .map(semantic::Node::id)
                .collect();
            let (box_min, box_max) = flow.cross_range(placed_cluster.bounds);
            let box_center = (box_min + box_max) / 2.0;

            for index in 0..nodes.len() {
                let node = &nodes[index];
                if members.contains(&node.node.id())
                    || !node.bounds().intersects(&placed_cluster.bounds)
                {
                    continue;
                }

                let (node_min, node_max) = flow.cross_range(node.bounds());
                let cross = flow.cross_of(node.position);
                let forward = cross >= box_center;
                let delta = if forward {
                    box_max + gap - node_min
                } else {
                    box_min - gap - node_max
                };
                let rank = node.rank;
                trace!(node = node.node.label(), cluster = placed_cluster.cluster.label(), delta; "Pushing node out of cluster");

                let offset = flow.cross_offset(delta);
                for other in nodes.iter_mut() {
                    let other_cross = flow.cross_of(other.position);
                    let beyond = if forward {
                        other_cross >= cross
                    } else {
                        other_cross <= cross
                    };
                    if other.rank == rank && beyond && !members.contains(&other.node.id()) {
                        other.shift(offset);
                    }
                }
                moved = true;
            }
        }
        if !moved {
            debug!(passes = pass; "Cluster boxes are clear");
            return;
        }
    }
    debug!(passes = MAX_PUSH_PASSES; "Stopped pushing nodes out of clusters");
}
