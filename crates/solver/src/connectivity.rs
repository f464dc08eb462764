//! Ground connectivity filter.
//!
//! Two bricks are adjacent when they sit on neighboring layers and their
//! footprints overlap. Starting from every candidate brick on the ground
//! layer, a breadth-first search marks everything reachable; the rest is a
//! floating component and gets removed.
//!
//! The support check is purely local (layer `z` only looks at `z - 1`), so it
//! cannot see that a whole component lacks a path to the ground. Removing
//! unreachable bricks never invalidates the support of a reachable one: a
//! supporter overlaps what it supports and is therefore reachable too.

use crate::support::layer_index;
use std::collections::VecDeque;
use u_stability_core::Structure;

/// Vertical adjacency graph over a candidate subset of a structure.
#[derive(Debug, Clone)]
pub struct ConnectivityGraph {
    adjacency: Vec<Vec<usize>>,
    candidate: Vec<bool>,
    ground: Vec<bool>,
}

impl ConnectivityGraph {
    /// Builds the graph over the bricks whose `candidate` flag is set.
    pub fn new(structure: &Structure, candidate: &[bool]) -> Self {
        let bricks = structure.bricks();
        let n = bricks.len();
        let by_layer = layer_index(bricks);
        let mut adjacency = vec![Vec::new(); n];

        for (i, brick) in bricks.iter().enumerate() {
            if !candidate[i] {
                continue;
            }
            // Edges are undirected; scanning only the layer above adds each once.
            if let Some(above) = by_layer.get(&(brick.z + 1)) {
                for &j in above {
                    if candidate[j] && bricks[j].overlaps(brick) {
                        adjacency[i].push(j);
                        adjacency[j].push(i);
                    }
                }
            }
        }

        Self {
            adjacency,
            candidate: candidate.to_vec(),
            ground: bricks.iter().map(|b| b.is_ground()).collect(),
        }
    }

    /// Builds the graph over every brick of the structure.
    pub fn full(structure: &Structure) -> Self {
        Self::new(structure, &vec![true; structure.len()])
    }

    /// Neighbors of brick `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Marks candidate bricks reachable from a candidate ground brick.
    pub fn reachable_from_ground(&self) -> Vec<bool> {
        let seeds = (0..self.adjacency.len()).filter(|&i| self.candidate[i] && self.ground[i]);
        self.bfs(seeds)
    }

    /// Number of connected components among candidate bricks.
    pub fn component_count(&self) -> usize {
        let mut visited = vec![false; self.adjacency.len()];
        let mut components = 0;
        for start in 0..self.adjacency.len() {
            if !self.candidate[start] || visited[start] {
                continue;
            }
            components += 1;
            for (i, reached) in self.bfs(std::iter::once(start)).into_iter().enumerate() {
                visited[i] |= reached;
            }
        }
        components
    }

    fn bfs(&self, seeds: impl Iterator<Item = usize>) -> Vec<bool> {
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        for seed in seeds {
            if !visited[seed] {
                visited[seed] = true;
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            for &next in &self.adjacency[current] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }
}

/// Restricts `kept` to bricks connected to the ground through kept bricks.
pub fn filter_connected(structure: &Structure, kept: &[bool]) -> Vec<bool> {
    ConnectivityGraph::new(structure, kept).reachable_from_ground()
}

/// Fraction of bricks connected to the ground in the unpruned structure.
///
/// Returns `1.0` for an empty structure.
pub fn connectivity_score(structure: &Structure) -> f64 {
    if structure.is_empty() {
        return 1.0;
    }
    let reachable = ConnectivityGraph::full(structure).reachable_from_ground();
    reachable.iter().filter(|&&r| r).count() as f64 / structure.len() as f64
}

/// Number of connected components of the unpruned structure.
pub fn connected_components(structure: &Structure) -> usize {
    ConnectivityGraph::full(structure).component_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stability_core::Brick;

    fn structure(bricks: Vec<Brick>) -> Structure {
        Structure::with_default_world(bricks).unwrap()
    }

    #[test]
    fn test_tower_is_connected() {
        let s = structure(vec![
            Brick::new(2, 2, 0, 0, 0),
            Brick::new(2, 2, 1, 1, 1),
            Brick::unit(2, 2, 2),
        ]);
        assert_eq!(filter_connected(&s, &[true, true, true]), vec![true, true, true]);
        assert_eq!(ConnectivityGraph::full(&s).edge_count(), 2);
    }

    #[test]
    fn test_floating_tower_removed() {
        // A two-layer tower starting at z=1 with no ground brick beneath it.
        let s = structure(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(5, 5, 1),
            Brick::unit(5, 5, 2),
        ]);
        assert_eq!(filter_connected(&s, &[true, true, true]), vec![true, false, false]);
    }

    #[test]
    fn test_same_layer_ring_has_no_edges() {
        let s = structure(vec![
            Brick::new(2, 1, 0, 0, 1),
            Brick::new(1, 2, 1, 0, 1),
            Brick::new(2, 1, 0, 1, 1),
            Brick::new(1, 2, 0, 0, 1),
        ]);
        let graph = ConnectivityGraph::full(&s);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.reachable_from_ground(), vec![false; 4]);
        assert_eq!(graph.component_count(), 4);
    }

    #[test]
    fn test_path_must_use_candidates() {
        // The middle brick is excluded, so the top loses its path down.
        let s = structure(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(0, 0, 1),
            Brick::unit(0, 0, 2),
        ]);
        assert_eq!(filter_connected(&s, &[true, false, true]), vec![true, false, false]);
    }

    #[test]
    fn test_connection_through_upper_layer() {
        // The right pillar hangs from a beam resting on the left pillar only.
        let s = structure(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(0, 0, 1),
            Brick::new(4, 1, 0, 0, 2),
            Brick::unit(3, 0, 1),
        ]);
        assert_eq!(filter_connected(&s, &[true; 4]), vec![true; 4]);
    }

    #[test]
    fn test_connectivity_score() {
        assert_eq!(connectivity_score(&Structure::default()), 1.0);
        let s = structure(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(0, 0, 1),
            Brick::unit(9, 9, 4),
            Brick::unit(9, 9, 5),
        ]);
        assert!((connectivity_score(&s) - 0.5).abs() < 1e-12);
        assert_eq!(connected_components(&s), 2);
    }
}
