//! Layered ranking through `rust-sugiyama`.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use rust_sugiyama::configure::Config;

use archviz_core::identifier::Id;

use super::{Grid, RankingEngine, Slot, ranking_edges};
use crate::{ArchvizError, structure::DiagramGraph};

/// Gap between connected components along the ordering key.
const COMPONENT_STRIDE: f32 = 1.0e6;

/// Sugiyama layered ranking with crossing reduction.
///
/// Every connected component is laid out by `rust-sugiyama`; its layers become
/// ranks and the horizontal coordinates become the ordering keys. Components
/// are placed side by side in the order they are returned, followed by nodes
/// that have no edges.
#[derive(Debug)]
pub struct Engine {
    vertex_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            vertex_spacing: 4.0,
        }
    }

    pub fn set_vertex_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertex_spacing = spacing.clamp(2.0, 8.0);
        self
    }
}

impl RankingEngine for Engine {
    fn rank(&self, graph: &DiagramGraph<'_>) -> Result<Grid, ArchvizError> {
        let edges = ranking_edges(graph);

        let node_ids: Vec<Id> = graph.nodes().map(|node| node.id()).collect();
        let vertex_of: HashMap<Id, u32> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i as u32))
            .collect();
        let vertex_edges: Vec<(u32, u32)> = edges
            .iter()
            .map(|(source, target)| (vertex_of[source], vertex_of[target]))
            .collect();

        let mut grid = Grid::with_capacity(node_ids.len());

        if !vertex_edges.is_empty() {
            debug!(nodes = node_ids.len(), edges = vertex_edges.len(); "Running rust-sugiyama");

            let spacing = self.vertex_spacing;
            let layouts = std::panic::catch_unwind(move || {
                let config = Config {
                    minimum_length: 1,
                    vertex_spacing: spacing as f64,
                    ..Default::default()
                };
                rust_sugiyama::from_edges(&vertex_edges, &config)
            })
            .map_err(|err| {
                let message = err
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| err.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown error");
                ArchvizError::Layout(format!("rust-sugiyama panicked: {message}"))
            })?;

            if layouts.is_empty() {
                return Err(ArchvizError::Layout(
                    "rust-sugiyama returned no layout".to_string(),
                ));
            }

            for (component, (coords, _, _)) in layouts.iter().enumerate() {
                let mut placed: Vec<(Id, i64, f32)> = Vec::with_capacity(coords.len());
                for &(vertex, (x, y)) in coords {
                    let Some(&id) = node_ids.get(vertex as usize) else {
                        warn!(vertex = vertex as u64; "rust-sugiyama returned an unknown vertex");
                        continue;
                    };
                    placed.push((id, (y as f64).round() as i64, x as f32));
                }

                // Layers are numbered by their distinct y coordinates.
                let levels: BTreeSet<i64> = placed.iter().map(|(_, y, _)| *y).collect();
                let level_rank: HashMap<i64, usize> =
                    levels.iter().enumerate().map(|(rank, y)| (*y, rank)).collect();
                let max_rank = levels.len().saturating_sub(1);

                let mut ranks: HashMap<Id, usize> =
                    placed.iter().map(|(id, y, _)| (*id, level_rank[y])).collect();

                let points_backwards = edges.iter().any(|(source, target)| {
                    matches!(
                        (ranks.get(source), ranks.get(target)),
                        (Some(s), Some(t)) if s > t
                    )
                });
                if points_backwards {
                    for rank in ranks.values_mut() {
                        *rank = max_rank - *rank;
                    }
                }

                let offset = component as f32 * COMPONENT_STRIDE;
                for (id, _, x) in placed {
                    grid.insert(id, Slot::new(ranks[&id], offset + x));
                }
            }

            if grid.is_empty() {
                return Err(ArchvizError::Layout(
                    "failed to map any rust-sugiyama position back to a node".to_string(),
                ));
            }
        }

        let isolated_offset = (grid.len() as f32 + 1.0) * COMPONENT_STRIDE;
        for (position, id) in node_ids.iter().enumerate() {
            grid.entry(*id)
                .or_insert_with(|| Slot::new(0, isolated_offset + position as f32));
        }

        // Back to declaration order.
        grid.sort_by(|a, _, b, _| vertex_of[a].cmp(&vertex_of[b]));

        debug!(nodes = grid.len(); "Sugiyama ranking done");
        Ok(grid)
    }
}
