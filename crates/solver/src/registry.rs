//! Ordered backend registry.
//!
//! Candidates are probed in order; the first whose capability check passes and
//! whose constructor succeeds backs the returned [`StabilitySolver`]. The
//! greedy candidate is always available, so resolution never fails.

use crate::greedy::GreedySolver;
use crate::milp_solver::{is_engine_available, MilpSolver};
use crate::stable::{Backend, StabilitySolver};
use u_stability_core::{Config, Error, Result, Strategy};

/// One entry of the registry.
#[derive(Clone, Copy)]
pub struct BackendCandidate {
    /// Strategy this candidate provides.
    pub strategy: Strategy,
    /// Capability check, evaluated before construction.
    pub is_available: fn(&Config) -> bool,
    /// Constructor.
    pub build: fn(&Config) -> Result<Backend>,
}

impl BackendCandidate {
    /// MILP backend using the configured engine.
    pub fn milp() -> Self {
        Self {
            strategy: Strategy::Milp,
            is_available: |config| config.engine().map(is_engine_available).unwrap_or(false),
            build: |config| {
                MilpSolver::new(&config.engine, config.exact.clone()).map(Backend::Milp)
            },
        }
    }

    /// Greedy backend; always available.
    pub fn greedy() -> Self {
        Self {
            strategy: Strategy::Greedy,
            is_available: |_| true,
            build: |_| Ok(Backend::Greedy(GreedySolver::new())),
        }
    }
}

impl std::fmt::Debug for BackendCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendCandidate")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Ordered list of backend candidates.
#[derive(Debug, Clone)]
pub struct SolverRegistry {
    candidates: Vec<BackendCandidate>,
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::new(vec![BackendCandidate::milp(), BackendCandidate::greedy()])
    }
}

impl SolverRegistry {
    /// Creates a registry probing `candidates` in order.
    pub fn new(candidates: Vec<BackendCandidate>) -> Self {
        Self { candidates }
    }

    /// Registered candidates in probing order.
    pub fn candidates(&self) -> &[BackendCandidate] {
        &self.candidates
    }

    /// Builds the first available backend.
    ///
    /// Returns [`Error::BackendUnavailable`] only if every candidate fails,
    /// which cannot happen when the greedy candidate is registered.
    pub fn resolve(&self, config: &Config) -> Result<StabilitySolver> {
        let mut reasons = Vec::new();
        for candidate in &self.candidates {
            if !(candidate.is_available)(config) {
                let reason = match candidate.strategy {
                    Strategy::Milp => match config.engine() {
                        Ok(engine) => format!("MIP engine '{}' not compiled in", engine),
                        Err(e) => e.to_string(),
                    },
                    other => format!("{} unavailable", other),
                };
                log::warn!("Skipping {} backend: {}", candidate.strategy, reason);
                reasons.push(reason);
                continue;
            }
            match (candidate.build)(config) {
                Ok(backend) => {
                    log::debug!("Using {} backend", candidate.strategy);
                    return Ok(StabilitySolver::new(backend, config.clone()));
                }
                Err(e) => {
                    log::warn!("Failed to build {} backend: {}", candidate.strategy, e);
                    reasons.push(e.to_string());
                }
            }
        }
        Err(Error::BackendUnavailable(reasons.join("; ")))
    }
}

/// Returns a solver for `config`, falling back to greedy when no MIP engine
/// can be built.
pub fn get_solver(config: &Config) -> StabilitySolver {
    match SolverRegistry::default().resolve(config) {
        Ok(solver) => solver,
        Err(e) => {
            log::warn!("{}, using greedy", e);
            StabilitySolver::new(Backend::Greedy(GreedySolver::new()), config.clone())
        }
    }
}

/// Returns a solver configured from the process environment.
pub fn get_solver_from_env() -> StabilitySolver {
    get_solver(&Config::from_env())
}
