//! Solve result representation.

use crate::brick::Structure;
use crate::exact::SolutionStatus;
use crate::solver::Strategy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a stability pruning solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    /// The pruned structure (same world dimension as the input).
    pub structure: Structure,

    /// Input indices of the kept bricks, ascending.
    pub kept: Vec<usize>,

    /// Number of bricks in the input.
    pub total: usize,

    /// Status of the strategy that produced the kept set.
    pub status: SolutionStatus,

    /// Strategy that produced the kept set.
    pub strategy: Strategy,

    /// Whether the MIP result was replaced by the greedy fallback.
    pub fell_back: bool,

    /// Bricks dropped by the connectivity filter after support selection.
    pub disconnected: usize,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl SolveResult {
    /// Creates a result for a kept mask over `input`.
    pub fn from_mask(
        input: &Structure,
        mask: &[bool],
        status: SolutionStatus,
        strategy: Strategy,
    ) -> Self {
        Self {
            structure: input.retain_mask(mask),
            kept: mask
                .iter()
                .enumerate()
                .filter(|(_, &k)| k)
                .map(|(i, _)| i)
                .collect(),
            total: input.len(),
            status,
            strategy,
            fell_back: false,
            disconnected: 0,
            computation_time_ms: 0,
        }
    }

    /// Number of kept bricks.
    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }

    /// Number of removed bricks.
    pub fn removed_count(&self) -> usize {
        self.total - self.kept.len()
    }

    /// Kept fraction in `[0, 1]`; `1.0` for an empty input.
    pub fn stability_score(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.kept.len() as f64 / self.total as f64
        }
    }

    /// Returns true if nothing was removed.
    pub fn is_fully_stable(&self) -> bool {
        self.kept.len() == self.total
    }

    /// Marks the result as produced by the fallback path.
    pub fn with_fallback(mut self, fell_back: bool) -> Self {
        self.fell_back = fell_back;
        self
    }

    /// Sets the number of bricks dropped by the connectivity filter.
    pub fn with_disconnected(mut self, disconnected: usize) -> Self {
        self.disconnected = disconnected;
        self
    }

    /// Sets the computation time.
    pub fn with_time_ms(mut self, ms: u64) -> Self {
        self.computation_time_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::Brick;

    #[test]
    fn test_from_mask() {
        let input = Structure::with_default_world(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(0, 0, 1),
            Brick::unit(5, 5, 3),
        ])
        .unwrap();
        let result = SolveResult::from_mask(
            &input,
            &[true, true, false],
            SolutionStatus::Optimal,
            Strategy::Milp,
        )
        .with_time_ms(3);

        assert_eq!(result.kept, vec![0, 1]);
        assert_eq!(result.kept_count(), 2);
        assert_eq!(result.removed_count(), 1);
        assert!((result.stability_score() - 2.0 / 3.0).abs() < 1e-12);
        assert!(!result.is_fully_stable());
        assert_eq!(result.structure.len(), 2);
        assert_eq!(result.computation_time_ms, 3);
    }

    #[test]
    fn test_empty_score_is_neutral() {
        let input = Structure::default();
        let result =
            SolveResult::from_mask(&input, &[], SolutionStatus::Feasible, Strategy::Greedy);
        assert_eq!(result.stability_score(), 1.0);
        assert!(result.is_fully_stable());
    }
}
