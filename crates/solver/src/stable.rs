//! Stability solver facade.
//!
//! [`StabilitySolver`] runs one pruning backend, resolves non-optimal MILP
//! terminations according to [`NonOptimalPolicy`], and passes every kept set
//! through the ground connectivity filter.

use crate::connectivity::filter_connected;
use crate::greedy::GreedySolver;
use crate::milp_solver::MilpSolver;
use crate::support::{Selection, SupportIndex};
use std::time::Instant;
use u_stability_core::{
    Config, Error, NonOptimalPolicy, Result, SolveResult, Solver, Strategy, Structure,
};

/// Pruning backend selected by the registry.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Exact MILP pruning.
    Milp(MilpSolver),
    /// Order-dependent forward pass.
    Greedy(GreedySolver),
}

impl Backend {
    /// Strategy implemented by this backend.
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Milp(_) => Strategy::Milp,
            Self::Greedy(_) => Strategy::Greedy,
        }
    }

    fn select(&self, structure: &Structure, index: &SupportIndex) -> Selection {
        match self {
            Self::Milp(solver) => solver.select(structure, index),
            Self::Greedy(solver) => solver.select(structure, index),
        }
    }
}

/// Solver returned by [`get_solver`](crate::get_solver).
#[derive(Debug, Clone)]
pub struct StabilitySolver {
    backend: Backend,
    config: Config,
}

impl StabilitySolver {
    /// Creates a solver around an already built backend.
    pub fn new(backend: Backend, config: Config) -> Self {
        Self { backend, config }
    }

    /// Creates a greedy-only solver.
    pub fn greedy() -> Self {
        Self::new(Backend::Greedy(GreedySolver::new()), Config::default())
    }

    /// Backend in use.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Configuration this solver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a non-valid termination and applies the connectivity filter.
    fn finish(
        &self,
        structure: &Structure,
        index: &SupportIndex,
        mut selection: Selection,
        start: Instant,
    ) -> Result<SolveResult> {
        let mut strategy = self.backend.strategy();
        let mut fell_back = false;

        if !selection.exact.status.has_valid_solution() {
            match self.config.non_optimal {
                NonOptimalPolicy::Fail => {
                    return Err(Error::NonOptimalTermination {
                        status: selection.exact.status,
                        message: selection.exact.message,
                    });
                }
                NonOptimalPolicy::Fallback => {
                    log::warn!(
                        "{} ended with status {} ({}), falling back to greedy",
                        strategy,
                        selection.exact.status,
                        selection.exact.message
                    );
                    selection = GreedySolver::new().select(structure, index);
                    strategy = Strategy::Greedy;
                    fell_back = true;
                }
            }
        }

        let kept = filter_connected(structure, &selection.kept);
        let disconnected = selection.kept_count() - kept.iter().filter(|&&k| k).count();
        if disconnected > 0 {
            log::debug!("Connectivity filter dropped {} floating bricks", disconnected);
        }

        Ok(
            SolveResult::from_mask(structure, &kept, selection.exact.status, strategy)
                .with_fallback(fell_back)
                .with_disconnected(disconnected)
                .with_time_ms(start.elapsed().as_millis() as u64),
        )
    }
}

impl Solver for StabilitySolver {
    fn strategy(&self) -> Strategy {
        self.backend.strategy()
    }

    fn solve_detailed(&self, structure: &Structure) -> Result<SolveResult> {
        let start = Instant::now();
        let index = SupportIndex::new(structure);
        let selection = self.backend.select(structure, &index);
        self.finish(structure, &index, selection, start)
    }
}
