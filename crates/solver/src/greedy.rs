//! Greedy forward-pass pruning.
//!
//! Bricks are visited once, in input order. Ground bricks are accepted
//! unconditionally; any other brick is accepted only if every footprint cell
//! is covered by a brick that was *already* accepted on the layer below.
//!
//! There is no backtracking: a brick whose supporter appears later in the input
//! is rejected for good, so the result depends on input order and may be
//! smaller than the maximum stable subset. Every result still satisfies the
//! support invariant. The pass needs no MIP backend and runs in
//! O(bricks × cells × supporters).

use crate::support::{Selection, SupportIndex};
use u_stability_core::{ExactResult, Structure};

/// Order-dependent greedy pruning.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    /// Creates a greedy solver.
    pub fn new() -> Self {
        Self
    }

    /// Selects the bricks accepted by a single forward pass.
    pub fn select(&self, structure: &Structure, index: &SupportIndex) -> Selection {
        let mut kept = vec![false; structure.len()];
        for i in 0..structure.len() {
            let supported = index.is_supported(i, &kept);
            kept[i] = supported;
        }

        let count = kept.iter().filter(|&&k| k).count();
        log::debug!("Greedy pass kept {} of {} bricks", count, structure.len());

        Selection {
            kept,
            exact: ExactResult::feasible(count as f64)
                .with_model_size(structure.len(), index.constraint_count()),
        }
    }
}
