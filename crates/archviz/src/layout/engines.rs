//! Ranking engines.
//!
//! An engine assigns every node a [`Slot`]: the rank it sits on along the
//! diagram direction, and an ordering key among the nodes of that rank.
//! Coordinates are computed afterwards by [`super::Layout`], so engines only
//! decide the topology of the drawing.

mod basic;
mod sugiyama;

use indexmap::IndexMap;

use archviz_core::{identifier::Id, semantic::LayoutEngine};

use crate::{ArchvizError, structure::DiagramGraph};

/// Position of a node in the rank grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    rank: usize,
    order: f32,
}

impl Slot {
    pub fn new(rank: usize, order: f32) -> Self {
        Self { rank, order }
    }

    pub fn rank(self) -> usize {
        self.rank
    }

    /// Ordering key within the rank; lower comes first.
    pub fn order(self) -> f32 {
        self.order
    }
}

/// Slots of every node, in declaration order.
pub type Grid = IndexMap<Id, Slot>;

/// Interface of ranking engines.
pub trait RankingEngine {
    /// Assigns a slot to every node of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchvizError::Layout`] if the engine fails to rank the graph.
    fn rank(&self, graph: &DiagramGraph<'_>) -> Result<Grid, ArchvizError>;
}

/// Returns the engine of the given kind.
pub fn engine_for(kind: LayoutEngine, vertex_spacing: f32) -> Box<dyn RankingEngine> {
    match kind {
        LayoutEngine::Basic => Box::new(basic::Engine::new()),
        LayoutEngine::Sugiyama => {
            let mut engine = sugiyama::Engine::new();
            engine.set_vertex_spacing(vertex_spacing);
            Box::new(engine)
        }
    }
}

/// Edges as `(source, target)` pairs with self loops and duplicates removed.
fn ranking_edges(graph: &DiagramGraph<'_>) -> Vec<(Id, Id)> {
    let mut edges: Vec<(Id, Id)> = Vec::new();
    for (source, target, _) in graph.edges() {
        if source != target && !edges.contains(&(source, target)) {
            edges.push((source, target));
        }
    }
    edges
}
