use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use thiserror::Error;

use crate::ir::{DependencyEdge, StepId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StratifyFailure {
    #[error("step {0} depends on itself")]
    SelfLoop(StepId),
    #[error("dependency cycle leaves {0} steps unranked")]
    Cycle(usize),
    #[error("step id {0} appears more than once")]
    DuplicateId(StepId),
    #[error("edge references unknown step {0}")]
    UnknownStep(StepId),
}

/// Outcome of layer assignment. `Fallback` is not an error for the caller: it
/// selects the grid layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stratification {
    /// Layer per node, aligned with the node slice passed to `stratify`.
    Stratified(Vec<usize>),
    Fallback(StratifyFailure),
}

/// The two graph-layout primitives the engine depends on. Vertices handed to
/// `minimize_crossings` are dense indexes; links always join adjacent layers.
pub trait LayeringStrategy {
    fn stratify(&self, nodes: &[StepId], edges: &[DependencyEdge]) -> Stratification;

    fn minimize_crossings(
        &self,
        layers: Vec<Vec<usize>>,
        links: &[(usize, usize)],
    ) -> Vec<Vec<usize>>;
}

/// Longest-path layering plus median-heuristic sweeps.
#[derive(Debug, Clone, Copy)]
pub struct MedianLayering {
    pub passes: usize,
}

impl MedianLayering {
    pub fn new(passes: usize) -> Self {
        Self { passes }
    }
}

impl Default for MedianLayering {
    fn default() -> Self {
        Self { passes: 4 }
    }
}

impl LayeringStrategy for MedianLayering {
    fn stratify(&self, nodes: &[StepId], edges: &[DependencyEdge]) -> Stratification {
        match longest_path_ranks(nodes, edges) {
            Ok(ranks) => Stratification::Stratified(ranks),
            Err(failure) => Stratification::Fallback(failure),
        }
    }

    fn minimize_crossings(
        &self,
        layers: Vec<Vec<usize>>,
        links: &[(usize, usize)],
    ) -> Vec<Vec<usize>> {
        order_layers(layers, links, self.passes)
    }
}

fn longest_path_ranks(
    nodes: &[StepId],
    edges: &[DependencyEdge],
) -> Result<Vec<usize>, StratifyFailure> {
    let mut index_of: HashMap<StepId, usize> = HashMap::with_capacity(nodes.len());
    for (idx, id) in nodes.iter().enumerate() {
        if index_of.insert(*id, idx).is_some() {
            return Err(StratifyFailure::DuplicateId(*id));
        }
    }

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut indeg = vec![0usize; nodes.len()];
    for edge in edges {
        if edge.is_self_loop() {
            return Err(StratifyFailure::SelfLoop(edge.source_step_id));
        }
        let from = *index_of
            .get(&edge.source_step_id)
            .ok_or(StratifyFailure::UnknownStep(edge.source_step_id))?;
        let to = *index_of
            .get(&edge.target_step_id)
            .ok_or(StratifyFailure::UnknownStep(edge.target_step_id))?;
        outgoing[from].push(to);
        indeg[to] += 1;
    }

    // Smallest input position first keeps the traversal independent of hashing.
    let mut ready: BinaryHeap<Reverse<usize>> = (0..nodes.len())
        .filter(|idx| indeg[*idx] == 0)
        .map(Reverse)
        .collect();
    let mut ranks = vec![0usize; nodes.len()];
    let mut processed = 0usize;
    while let Some(Reverse(node)) = ready.pop() {
        processed += 1;
        for &next in &outgoing[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            indeg[next] -= 1;
            if indeg[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if processed < nodes.len() {
        return Err(StratifyFailure::Cycle(nodes.len() - processed));
    }
    Ok(ranks)
}

/// Layered graph with every multi-layer edge split into single-layer links.
#[derive(Debug, Clone, Default)]
pub(super) struct ProperGraph {
    pub layers: Vec<Vec<usize>>,
    pub links: Vec<(usize, usize)>,
    /// Vertex chain per input edge, source first and target last.
    pub chains: Vec<Vec<usize>>,
    pub vertex_count: usize,
}

/// Builds the proper layered graph. Vertices `0..ranks.len()` are the real
/// nodes; virtual vertices follow in edge order. Returns `None` when an edge
/// does not point to a strictly higher layer.
pub(super) fn split_long_edges(ranks: &[usize], edges: &[(usize, usize)]) -> Option<ProperGraph> {
    let layer_count = ranks.iter().copied().max().map_or(0, |max| max + 1);
    let mut graph = ProperGraph {
        layers: vec![Vec::new(); layer_count],
        links: Vec::with_capacity(edges.len()),
        chains: Vec::with_capacity(edges.len()),
        vertex_count: ranks.len(),
    };
    for (vertex, rank) in ranks.iter().enumerate() {
        graph.layers[*rank].push(vertex);
    }

    for &(from, to) in edges {
        let from_rank = *ranks.get(from)?;
        let to_rank = *ranks.get(to)?;
        if to_rank <= from_rank {
            return None;
        }
        let mut chain = Vec::with_capacity(to_rank - from_rank + 1);
        chain.push(from);
        let mut prev = from;
        for rank in (from_rank + 1)..to_rank {
            let dummy = graph.vertex_count;
            graph.vertex_count += 1;
            graph.layers[rank].push(dummy);
            graph.links.push((prev, dummy));
            chain.push(dummy);
            prev = dummy;
        }
        graph.links.push((prev, to));
        chain.push(to);
        graph.chains.push(chain);
    }
    Some(graph)
}

fn order_layers(
    mut layers: Vec<Vec<usize>>,
    links: &[(usize, usize)],
    passes: usize,
) -> Vec<Vec<usize>> {
    if layers.len() <= 1 {
        return layers;
    }
    let vertex_count = layers
        .iter()
        .flatten()
        .copied()
        .max()
        .map_or(0, |max| max + 1);
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for &(from, to) in links {
        if from < vertex_count && to < vertex_count {
            outgoing[from].push(to);
            incoming[to].push(from);
        }
    }

    let mut positions = vec![0usize; vertex_count];
    update_positions(&layers, &mut positions);

    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, links);
    if best_crossings == 0 {
        return best;
    }

    for _ in 0..passes.max(1) {
        for rank in 1..layers.len() {
            if layers[rank].len() <= 1 {
                continue;
            }
            sort_layer(&mut layers[rank], &incoming, &positions);
            update_positions(&layers, &mut positions);
        }
        for rank in (0..layers.len() - 1).rev() {
            if layers[rank].len() <= 1 {
                continue;
            }
            sort_layer(&mut layers[rank], &outgoing, &positions);
            update_positions(&layers, &mut positions);
        }
        let crossings = count_crossings(&layers, links);
        if crossings < best_crossings {
            best = layers.clone();
            best_crossings = crossings;
        }
        if best_crossings == 0 {
            break;
        }
    }
    best
}

fn update_positions(layers: &[Vec<usize>], positions: &mut [usize]) {
    for layer in layers {
        for (idx, vertex) in layer.iter().enumerate() {
            if let Some(slot) = positions.get_mut(*vertex) {
                *slot = idx;
            }
        }
    }
}

fn sort_layer(layer: &mut [usize], neighbors: &[Vec<usize>], positions: &[usize]) {
    let mut keyed: Vec<(f32, usize, usize)> = layer
        .iter()
        .enumerate()
        .map(|(current, vertex)| {
            let score = median_position(*vertex, neighbors, positions).unwrap_or(current as f32);
            (score, current, *vertex)
        })
        .collect();
    keyed.sort_by(|a, b| match a.0.partial_cmp(&b.0) {
        Some(Ordering::Equal) | None => a.1.cmp(&b.1),
        Some(ordering) => ordering,
    });
    for (slot, (_, _, vertex)) in layer.iter_mut().zip(keyed) {
        *slot = vertex;
    }
}

pub(super) fn median_position(
    vertex: usize,
    neighbors: &[Vec<usize>],
    positions: &[usize],
) -> Option<f32> {
    let list = neighbors.get(vertex)?;
    let mut values: Vec<f32> = list
        .iter()
        .filter_map(|neighbor| positions.get(*neighbor).map(|pos| *pos as f32))
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) * 0.5)
    }
}

/// Crossings between links of adjacent layers, by pairwise inversion count.
pub(super) fn count_crossings(layers: &[Vec<usize>], links: &[(usize, usize)]) -> usize {
    let mut placement: HashMap<usize, (usize, usize)> = HashMap::new();
    for (rank, layer) in layers.iter().enumerate() {
        for (pos, vertex) in layer.iter().enumerate() {
            placement.insert(*vertex, (rank, pos));
        }
    }

    let mut by_layer: Vec<Vec<(usize, usize)>> = vec![Vec::new(); layers.len()];
    for (from, to) in links {
        let (Some(&(from_rank, from_pos)), Some(&(_, to_pos))) =
            (placement.get(from), placement.get(to))
        else {
            continue;
        };
        by_layer[from_rank].push((from_pos, to_pos));
    }

    let mut crossings = 0usize;
    for segments in &mut by_layer {
        segments.sort_unstable();
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                if a.0 < b.0 && a.1 > b.1 {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: StepId, to: StepId) -> DependencyEdge {
        DependencyEdge::new(from, to)
    }

    #[test]
    fn ranks_follow_longest_path() {
        // 1 -> 2 -> 3 and 1 -> 3: step 3 sits two layers below step 1.
        let result = MedianLayering::default().stratify(
            &[1, 2, 3],
            &[edge(1, 2), edge(2, 3), edge(1, 3)],
        );
        assert_eq!(result, Stratification::Stratified(vec![0, 1, 2]));
    }

    #[test]
    fn cycle_is_reported() {
        let result = MedianLayering::default().stratify(
            &[1, 2, 3],
            &[edge(1, 2), edge(2, 3), edge(3, 1)],
        );
        assert_eq!(result, Stratification::Fallback(StratifyFailure::Cycle(3)));
    }

    #[test]
    fn self_loop_and_duplicates_are_reported() {
        let layering = MedianLayering::default();
        assert_eq!(
            layering.stratify(&[1], &[edge(1, 1)]),
            Stratification::Fallback(StratifyFailure::SelfLoop(1))
        );
        assert_eq!(
            layering.stratify(&[1, 1], &[]),
            Stratification::Fallback(StratifyFailure::DuplicateId(1))
        );
        assert_eq!(
            layering.stratify(&[1], &[edge(1, 9)]),
            Stratification::Fallback(StratifyFailure::UnknownStep(9))
        );
    }

    #[test]
    fn long_edges_get_virtual_vertices() {
        let graph = split_long_edges(&[0, 1, 3], &[(0, 1), (0, 2)]).unwrap();
        assert_eq!(graph.vertex_count, 5);
        assert_eq!(graph.chains[0], vec![0, 1]);
        assert_eq!(graph.chains[1], vec![0, 3, 4, 2]);
        assert_eq!(graph.layers, vec![vec![0], vec![1, 3], vec![4], vec![2]]);
        assert_eq!(graph.links, vec![(0, 1), (0, 3), (3, 4), (4, 2)]);
    }

    #[test]
    fn backward_edge_rejects_split() {
        assert!(split_long_edges(&[1, 0], &[(0, 1)]).is_none());
    }

    #[test]
    fn median_sweeps_remove_a_simple_crossing() {
        // 0 -> 3, 1 -> 2 cross when layer one is [2, 3].
        let layers = vec![vec![0, 1], vec![2, 3]];
        let links = vec![(0, 3), (1, 2)];
        assert_eq!(count_crossings(&layers, &links), 1);
        let ordered = MedianLayering::default().minimize_crossings(layers, &links);
        assert_eq!(count_crossings(&ordered, &links), 0);
    }

    #[test]
    fn ordering_is_deterministic() {
        let layers = vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7]];
        let links = vec![(0, 5), (1, 3), (2, 4), (3, 7), (4, 6), (5, 6)];
        let layering = MedianLayering::new(6);
        let first = layering.minimize_crossings(layers.clone(), &links);
        let second = layering.minimize_crossings(layers, &links);
        assert_eq!(first, second);
    }

    #[test]
    fn median_of_even_neighbor_count_averages() {
        let neighbors = vec![vec![1, 2], vec![], vec![]];
        let positions = vec![0, 1, 4];
        assert_eq!(median_position(0, &neighbors, &positions), Some(2.5));
        assert_eq!(median_position(1, &neighbors, &positions), None);
    }
}
