//! Per-cell support index.
//!
//! For every brick above the ground layer the index lists, cell by cell, the
//! bricks on the layer directly below whose footprint covers that cell. The
//! greedy pass queries it as a predicate over a growing kept set; the MILP
//! formulation turns each cell into one linear constraint.

use std::collections::HashMap;
use u_stability_core::{Brick, ExactResult, Structure};

/// Kept set proposed by a pruning strategy, before connectivity filtering.
#[derive(Debug, Clone)]
pub struct Selection {
    /// One flag per input brick.
    pub kept: Vec<bool>,
    /// How the strategy terminated.
    pub exact: ExactResult,
}

impl Selection {
    /// Number of kept bricks.
    pub fn kept_count(&self) -> usize {
        self.kept.iter().filter(|&&k| k).count()
    }
}

/// Supporters of one footprint cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSupport {
    /// Cell coordinates `(cx, cy)`.
    pub cell: (i32, i32),
    /// Indices of bricks at `z - 1` covering the cell.
    pub supporters: Vec<usize>,
}

impl CellSupport {
    /// Returns true if no brick can ever support this cell.
    pub fn is_unsupportable(&self) -> bool {
        self.supporters.is_empty()
    }
}

/// Support relation of a structure, computed once per solve.
#[derive(Debug, Clone)]
pub struct SupportIndex {
    /// Footprint cells per brick; empty for ground bricks.
    cells: Vec<Vec<CellSupport>>,
    ground: Vec<bool>,
}

impl SupportIndex {
    /// Builds the index for `structure`.
    pub fn new(structure: &Structure) -> Self {
        let bricks = structure.bricks();
        let by_layer = layer_index(bricks);

        let cells = bricks
            .iter()
            .map(|brick| {
                if brick.is_ground() {
                    return Vec::new();
                }
                let below: &[usize] = by_layer
                    .get(&(brick.z - 1))
                    .map(|v| v.as_slice())
                    .unwrap_or(&[]);
                // Only bricks whose footprint overlaps can cover any cell.
                let candidates: Vec<usize> = below
                    .iter()
                    .copied()
                    .filter(|&j| bricks[j].overlaps(brick))
                    .collect();

                brick
                    .footprint()
                    .map(|(cx, cy)| CellSupport {
                        cell: (cx, cy),
                        supporters: candidates
                            .iter()
                            .copied()
                            .filter(|&j| bricks[j].covers(cx, cy))
                            .collect(),
                    })
                    .collect()
            })
            .collect();

        Self {
            cells,
            ground: bricks.iter().map(Brick::is_ground).collect(),
        }
    }

    /// Number of indexed bricks.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the index covers no bricks.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if brick `i` is on the ground layer.
    pub fn is_ground(&self, i: usize) -> bool {
        self.ground[i]
    }

    /// Footprint cells of brick `i` with their potential supporters.
    pub fn cells(&self, i: usize) -> &[CellSupport] {
        &self.cells[i]
    }

    /// Returns true if brick `i` has a cell no brick in the structure covers.
    pub fn is_unsupportable(&self, i: usize) -> bool {
        self.cells[i].iter().any(CellSupport::is_unsupportable)
    }

    /// Total number of (brick, cell) support constraints.
    pub fn constraint_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Returns true if every footprint cell of brick `i` has a kept supporter.
    ///
    /// Ground bricks are always supported. `kept` holds one flag per brick.
    pub fn is_supported(&self, i: usize, kept: &[bool]) -> bool {
        self.ground[i]
            || self.cells[i]
                .iter()
                .all(|c| c.supporters.iter().any(|&j| kept[j]))
    }

    /// Returns true if every kept brick is supported by other kept bricks.
    pub fn is_stable_selection(&self, kept: &[bool]) -> bool {
        (0..self.len()).all(|i| !kept[i] || self.is_supported(i, kept))
    }
}

/// Groups brick indices by layer, preserving input order within a layer.
pub(crate) fn layer_index(bricks: &[Brick]) -> HashMap<i32, Vec<usize>> {
    let mut index: HashMap<i32, Vec<usize>> = HashMap::new();
    for (i, b) in bricks.iter().enumerate() {
        index.entry(b.z).or_default().push(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(bricks: Vec<Brick>) -> Structure {
        Structure::with_default_world(bricks).unwrap()
    }

    #[test]
    fn test_ground_brick_has_no_cells() {
        let index = SupportIndex::new(&structure(vec![Brick::new(2, 2, 0, 0, 0)]));
        assert!(index.is_ground(0));
        assert!(index.cells(0).is_empty());
        assert!(index.is_supported(0, &[false]));
        assert_eq!(index.constraint_count(), 0);
    }

    #[test]
    fn test_cells_list_supporters() {
        // Two 1x1 ground bricks under a 2x1 brick.
        let s = structure(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(1, 0, 0),
            Brick::new(2, 1, 0, 0, 1),
        ]);
        let index = SupportIndex::new(&s);
        let cells = index.cells(2);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], CellSupport { cell: (0, 0), supporters: vec![0] });
        assert_eq!(cells[1], CellSupport { cell: (1, 0), supporters: vec![1] });
        assert!(!index.is_unsupportable(2));
        assert_eq!(index.constraint_count(), 2);

        assert!(index.is_supported(2, &[true, true, true]));
        assert!(!index.is_supported(2, &[true, false, true]));
    }

    #[test]
    fn test_only_layer_directly_below_counts() {
        let s = structure(vec![Brick::unit(0, 0, 0), Brick::unit(0, 0, 2)]);
        let index = SupportIndex::new(&s);
        assert!(index.is_unsupportable(1));
        assert!(!index.is_supported(1, &[true, true]));
    }

    #[test]
    fn test_overhang_cell_is_unsupportable() {
        let s = structure(vec![Brick::unit(0, 0, 0), Brick::new(1, 2, 0, 0, 1)]);
        let index = SupportIndex::new(&s);
        assert!(index.is_unsupportable(1));
        assert!(index.cells(1)[1].is_unsupportable());
        assert!(!index.is_stable_selection(&[true, true]));
        assert!(index.is_stable_selection(&[true, false]));
    }

    #[test]
    fn test_same_layer_neighbors_do_not_support() {
        let s = structure(vec![Brick::unit(0, 0, 1), Brick::unit(0, 0, 1)]);
        let index = SupportIndex::new(&s);
        assert!(index.is_unsupportable(0));
        assert!(index.is_unsupportable(1));
    }

    #[test]
    fn test_layer_index_order() {
        let bricks = vec![Brick::unit(0, 0, 1), Brick::unit(0, 0, 0), Brick::unit(1, 0, 1)];
        let index = layer_index(&bricks);
        assert_eq!(index[&1], vec![0, 2]);
        assert_eq!(index[&0], vec![1]);
    }
}
