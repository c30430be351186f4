//! Longest-path ranking.

use std::collections::HashMap;

use log::debug;

use archviz_core::identifier::Id;

use super::{Grid, RankingEngine, Slot, ranking_edges};
use crate::{ArchvizError, structure::DiagramGraph};

/// Ranks nodes by their longest incoming path.
///
/// Nodes are visited in topological order (declaration order when the graph
/// has a cycle); edges pointing back to an already visited node are ignored.
/// Within a rank, nodes keep their declaration order.
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }
}

impl RankingEngine for Engine {
    fn rank(&self, graph: &DiagramGraph<'_>) -> Result<Grid, ArchvizError> {
        let order = graph.topological_order();
        let visit: HashMap<Id, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let edges = ranking_edges(graph);

        let mut ranks: HashMap<Id, usize> = HashMap::with_capacity(order.len());
        for id in &order {
            let rank = ranks.get(id).copied().unwrap_or(0);
            for (_, target) in edges.iter().filter(|(source, _)| source == id) {
                if visit[target] > visit[id] {
                    let entry = ranks.entry(*target).or_insert(0);
                    *entry = (*entry).max(rank + 1);
                }
            }
            ranks.entry(*id).or_insert(rank);
        }

        let grid: Grid = graph
            .nodes()
            .enumerate()
            .map(|(position, node)| {
                let rank = ranks.get(&node.id()).copied().unwrap_or(0);
                (node.id(), Slot::new(rank, position as f32))
            })
            .collect();

        debug!(
            nodes = grid.len(),
            ranks = grid.values().map(|slot| slot.rank() + 1).max().unwrap_or(0);
            "Basic ranking done"
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engines::tests::chain_diagram;

    #[test]
    fn test_longest_path_ranks() {
        let diagram = chain_diagram();
        let graph = DiagramGraph::from_diagram(&diagram).unwrap();

        let grid = Engine::new().rank(&graph).unwrap();

        assert_eq!(grid[&Id::new("a")], Slot::new(0, 0.0));
        assert_eq!(grid[&Id::new("b")].rank(), 1);
        // a -> c is shorter than a -> b -> c
        assert_eq!(grid[&Id::new("c")].rank(), 2);
        assert_eq!(grid[&Id::new("lonely")].rank(), 0);
        assert!(grid[&Id::new("a")].order() < grid[&Id::new("lonely")].order());
    }
}
