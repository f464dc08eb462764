//! MILP-based exact pruning.
//!
//! This module keeps the maximum number of bricks subject to full per-cell
//! support, using Mixed Integer Linear Programming through the `good_lp`
//! crate. HiGHS is the default engine; CBC and microlp are selectable when
//! compiled in.
//!
//! # Algorithm
//!
//! The formulation uses:
//! - One binary variable `keep_i` per brick
//! - Objective: maximize `Σ keep_i`
//! - For every non-ground brick `i` and footprint cell `c`:
//!   `Σ keep_j (j covers c at z_i - 1) >= keep_i`
//! - Cells without any potential supporter fix `keep_i == 0`
//!
//! Ties between equally sized maxima are broken by the backend.
//!
//! # Limits
//!
//! HiGHS and CBC receive [`ExactConfig::time_limit_ms`] as a solver option,
//! and their own termination status decides whether the limit cut the search
//! short. microlp takes no limit: it runs to completion and a solve that took
//! longer than the limit is reported as [`SolutionStatus::Timeout`] afterwards.
//! Structures larger than [`ExactConfig::max_items`] are not attempted.
//!
//! [`SolutionStatus::Timeout`]: u_stability_core::SolutionStatus::Timeout
//!
//! # Example
//!
//! ```ignore
//! use u_stability_solver::milp_solver::MilpSolver;
//! use u_stability_solver::support::SupportIndex;
//! use u_stability_core::ExactConfig;
//!
//! let solver = MilpSolver::new("highs", ExactConfig::default())?;
//! let selection = solver.select(&structure, &SupportIndex::new(&structure));
//! ```

use crate::support::{Selection, SupportIndex};
use std::time::Instant;
use u_stability_core::{Engine, Error, ExactConfig, ExactResult, Result, Structure};

#[cfg(feature = "milp")]
use good_lp::{
    constraint, solvers::SolutionStatus as EngineStatus, variable, Constraint, Expression,
    ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
};

/// How an engine run ended, before it is classified.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The engine returned an assignment.
    Solved { kept: Vec<bool>, stop: EngineStop },
    /// The engine proved the model infeasible.
    Infeasible,
    /// The engine failed without an assignment after `solve_ms`.
    Failed { message: String, solve_ms: u64 },
}

/// Why the engine stopped searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStop {
    /// The search finished within the configured gap.
    Completed,
    /// The engine's own time limit ended the search.
    TimeLimit,
    /// The engine takes no time limit; `solve_ms` is the measured solve time.
    Unbounded { solve_ms: u64 },
}

/// Turns an engine outcome into kept flags and an exact result.
///
/// Kept flags of a non-valid result are meaningless and all false unless the
/// engine returned an assignment.
pub fn classify_outcome(
    outcome: EngineOutcome,
    exact: &ExactConfig,
    index: &SupportIndex,
) -> (Vec<bool>, ExactResult) {
    let limit = exact.time_limit_ms;
    match outcome {
        EngineOutcome::Solved { kept, stop } => {
            let timed_out = match stop {
                EngineStop::Completed => false,
                EngineStop::TimeLimit => true,
                EngineStop::Unbounded { solve_ms } => solve_ms >= limit,
            };
            if timed_out {
                return (kept, ExactResult::timeout(limit));
            }
            if !index.is_stable_selection(&kept) {
                log::error!("MILP assignment violates support constraints");
                return (kept, ExactResult::error("assignment violates support constraints"));
            }
            let count = kept.iter().filter(|&&k| k).count() as f64;
            let result = if exact.gap_tolerance > 0.0 {
                ExactResult::feasible(count)
            } else {
                ExactResult::optimal(count)
            };
            (kept, result)
        }
        EngineOutcome::Infeasible => (vec![false; index.len()], ExactResult::infeasible()),
        EngineOutcome::Failed { solve_ms, .. } if solve_ms >= limit => {
            (vec![false; index.len()], ExactResult::timeout(limit))
        }
        EngineOutcome::Failed { message, .. } => {
            (vec![false; index.len()], ExactResult::error(message))
        }
    }
}

/// Check if any MILP engine is compiled in.
pub fn is_milp_available() -> bool {
    cfg!(feature = "milp")
}

/// Check if a specific engine is compiled in.
pub fn is_engine_available(engine: Engine) -> bool {
    match engine {
        Engine::Highs => cfg!(feature = "highs"),
        Engine::Cbc => cfg!(feature = "cbc"),
        Engine::Microlp => cfg!(feature = "microlp"),
    }
}

/// Engines compiled into this build, in probing order.
pub fn available_engines() -> Vec<Engine> {
    Engine::ALL
        .into_iter()
        .filter(|&e| is_engine_available(e))
        .collect()
}

/// Exact pruning solver backed by a `good_lp` engine.
#[derive(Debug, Clone)]
pub struct MilpSolver {
    engine: Engine,
    exact: ExactConfig,
}

impl MilpSolver {
    /// Creates a solver for the engine named by `engine_id`.
    ///
    /// Fails with [`Error::BackendUnavailable`] if the identifier is unknown or
    /// the engine was not compiled in.
    pub fn new(engine_id: &str, exact: ExactConfig) -> Result<Self> {
        let engine: Engine = engine_id.parse()?;
        if !is_engine_available(engine) {
            return Err(Error::BackendUnavailable(format!(
                "MIP engine '{}' not compiled in (enable the '{}' feature)",
                engine,
                engine.as_str()
            )));
        }
        Ok(Self { engine, exact })
    }

    /// Engine used by this solver.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Exact solver limits.
    pub fn exact_config(&self) -> &ExactConfig {
        &self.exact
    }

    /// Selects the maximum supported subset of `structure`.
    ///
    /// A status other than `Optimal` or `Feasible` means the kept flags carry
    /// no meaning and the caller must resolve the termination.
    pub fn select(&self, structure: &Structure, index: &SupportIndex) -> Selection {
        let start = Instant::now();
        let n = structure.len();

        if n == 0 {
            return Selection {
                kept: Vec::new(),
                exact: ExactResult::optimal(0.0),
            };
        }

        if !self.exact.is_within_limit(n) {
            log::warn!(
                "Brick count {} exceeds exact limit {}, skipping MILP",
                n,
                self.exact.max_items
            );
            return Selection {
                kept: vec![false; n],
                exact: ExactResult::too_large(n, self.exact.max_items),
            };
        }

        let (kept, exact) = classify_outcome(self.run(index, start), &self.exact, index);
        if exact.status.has_valid_solution() {
            log::info!(
                "MILP ({}) kept {} of {} bricks in {} ms",
                self.engine,
                exact.objective_value,
                n,
                start.elapsed().as_millis()
            );
        } else {
            log::warn!(
                "MILP ({}) ended with status {}: {}",
                self.engine,
                exact.status,
                exact.message
            );
        }

        Selection {
            kept,
            exact: exact.with_model_size(n, index.constraint_count()),
        }
    }

    /// Builds and solves the model.
    #[cfg(feature = "milp")]
    fn run(&self, index: &SupportIndex, start: Instant) -> EngineOutcome {
        let n = index.len();
        let mut vars = ProblemVariables::new();

        let keep: Vec<Variable> = (0..n)
            .map(|i| vars.add(variable().binary().name(format!("keep_{}", i))))
            .collect();

        let objective: Expression = keep.iter().copied().sum();

        let mut constraints: Vec<Constraint> = Vec::with_capacity(index.constraint_count());
        for i in 0..n {
            if index.is_ground(i) {
                continue;
            }
            if index.is_unsupportable(i) {
                constraints.push(constraint!(keep[i] == 0.0));
                continue;
            }
            for cell in index.cells(i) {
                let supporters: Expression = cell.supporters.iter().map(|&j| keep[j]).sum();
                constraints.push(constraint!(supporters >= keep[i]));
            }
        }

        log::debug!(
            "Solving MILP with {} variables, {} constraints ({} ms spent building)",
            n,
            constraints.len(),
            start.elapsed().as_millis()
        );

        self.solve_with_engine(vars, objective, constraints, &keep)
    }

    #[cfg(not(feature = "milp"))]
    fn run(&self, _index: &SupportIndex, _start: Instant) -> EngineOutcome {
        EngineOutcome::Failed {
            message: "MILP solver not available (compile with 'milp' feature)".to_string(),
            solve_ms: 0,
        }
    }

    #[cfg(feature = "milp")]
    fn solve_with_engine(
        &self,
        vars: ProblemVariables,
        objective: Expression,
        constraints: Vec<Constraint>,
        keep: &[Variable],
    ) -> EngineOutcome {
        let verbose = self.exact.verbosity > 0;
        match self.engine {
            #[cfg(feature = "highs")]
            Engine::Highs => {
                let model = vars
                    .maximise(objective)
                    .using(good_lp::highs)
                    .set_option("output_flag", verbose)
                    .set_option("time_limit", self.exact.time_limit_secs())
                    .set_option("mip_rel_gap", self.exact.gap_tolerance);
                solve_model(model, constraints, keep, true)
            }
            #[cfg(feature = "cbc")]
            Engine::Cbc => {
                let mut model = vars.maximise(objective).using(good_lp::coin_cbc);
                model.set_parameter("log", if verbose { "1" } else { "0" });
                model.set_parameter("sec", &format!("{}", self.exact.time_limit_secs()));
                model.set_parameter("ratioGap", &format!("{}", self.exact.gap_tolerance));
                solve_model(model, constraints, keep, true)
            }
            #[cfg(feature = "microlp")]
            Engine::Microlp => {
                let model = vars.maximise(objective).using(good_lp::microlp);
                solve_model(model, constraints, keep, false)
            }
            #[allow(unreachable_patterns)]
            other => EngineOutcome::Failed {
                message: format!("engine {} not compiled in", other),
                solve_ms: 0,
            },
        }
    }
}

/// Adds the support constraints, solves, and reads back the kept flags.
///
/// `time_bounded` engines were handed the time limit and report on their own
/// whether it stopped them.
#[cfg(feature = "milp")]
fn solve_model<M>(
    mut model: M,
    constraints: Vec<Constraint>,
    keep: &[Variable],
    time_bounded: bool,
) -> EngineOutcome
where
    M: SolverModel<Error = ResolutionError>,
{
    for c in constraints {
        model = model.with(c);
    }
    let start = Instant::now();
    let solved = model.solve();
    let solve_ms = start.elapsed().as_millis() as u64;

    match solved {
        Ok(solution) => {
            let stop = match solution.status() {
                _ if !time_bounded => EngineStop::Unbounded { solve_ms },
                EngineStatus::TimeLimit => EngineStop::TimeLimit,
                _ => EngineStop::Completed,
            };
            EngineOutcome::Solved {
                kept: keep.iter().map(|&v| solution.value(v) > 0.5).collect(),
                stop,
            }
        }
        Err(ResolutionError::Infeasible) => EngineOutcome::Infeasible,
        Err(e) => EngineOutcome::Failed {
            message: format!("MILP solver error: {}", e),
            solve_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stability_core::{Brick, SolutionStatus};

    #[test]
    fn test_is_milp_available() {
        // Just verify the function works
        let _available = is_milp_available();
        assert!(available_engines().iter().all(|&e| is_engine_available(e)));
    }

    #[test]
    fn test_unknown_engine_unavailable() {
        let result = MilpSolver::new("gurobi", ExactConfig::default());
        assert!(matches!(result, Err(Error::BackendUnavailable(_))));
    }

    #[test]
    #[cfg(not(feature = "microlp"))]
    fn test_engine_not_compiled_in() {
        let result = MilpSolver::new("microlp", ExactConfig::default());
        assert!(matches!(result, Err(Error::BackendUnavailable(_))));
    }

    fn tower() -> Structure {
        Structure::with_default_world(vec![Brick::unit(0, 0, 0), Brick::unit(0, 0, 1)]).unwrap()
    }

    #[test]
    fn test_engine_time_limit_is_timeout() {
        let s = tower();
        let index = SupportIndex::new(&s);
        let exact = ExactConfig::default().with_time_limit_ms(10_000);

        // A complete assignment still counts as a timeout when the engine says
        // its limit stopped the search.
        let outcome = EngineOutcome::Solved {
            kept: vec![true, true],
            stop: EngineStop::TimeLimit,
        };
        let (_, result) = classify_outcome(outcome, &exact, &index);
        assert_eq!(result.status, SolutionStatus::Timeout);
        assert!(!result.status.has_valid_solution());
    }

    #[test]
    fn test_completed_solve_keeps_engine_status() {
        let s = tower();
        let index = SupportIndex::new(&s);
        let exact = ExactConfig::default().with_time_limit_ms(1);

        let outcome = EngineOutcome::Solved {
            kept: vec![true, true],
            stop: EngineStop::Completed,
        };
        let (kept, result) = classify_outcome(outcome, &exact, &index);
        assert_eq!(result.status, SolutionStatus::Optimal);
        assert_eq!(kept, vec![true, true]);

        let gapped = ExactConfig::default().with_gap_tolerance(0.05);
        let outcome = EngineOutcome::Solved {
            kept: vec![true, false],
            stop: EngineStop::Completed,
        };
        let (_, result) = classify_outcome(outcome, &gapped, &index);
        assert_eq!(result.status, SolutionStatus::Feasible);
    }

    #[test]
    fn test_unbounded_engine_overrun_is_timeout() {
        let s = tower();
        let index = SupportIndex::new(&s);
        let exact = ExactConfig::default().with_time_limit_ms(50);

        let slow = EngineOutcome::Solved {
            kept: vec![true, true],
            stop: EngineStop::Unbounded { solve_ms: 50 },
        };
        assert_eq!(
            classify_outcome(slow, &exact, &index).1.status,
            SolutionStatus::Timeout
        );

        let fast = EngineOutcome::Solved {
            kept: vec![true, true],
            stop: EngineStop::Unbounded { solve_ms: 49 },
        };
        assert_eq!(
            classify_outcome(fast, &exact, &index).1.status,
            SolutionStatus::Optimal
        );
    }

    #[test]
    fn test_failed_solve_classification() {
        let s = tower();
        let index = SupportIndex::new(&s);
        let exact = ExactConfig::default().with_time_limit_ms(100);

        let late = EngineOutcome::Failed {
            message: "interrupted".to_string(),
            solve_ms: 150,
        };
        let (kept, result) = classify_outcome(late, &exact, &index);
        assert_eq!(result.status, SolutionStatus::Timeout);
        assert_eq!(kept, vec![false, false]);

        let early = EngineOutcome::Failed {
            message: "interrupted".to_string(),
            solve_ms: 5,
        };
        let (_, result) = classify_outcome(early, &exact, &index);
        assert_eq!(result.status, SolutionStatus::Error);
        assert_eq!(result.message, "interrupted");

        let (_, result) = classify_outcome(EngineOutcome::Infeasible, &exact, &index);
        assert_eq!(result.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn test_unstable_assignment_is_error() {
        let s = tower();
        let index = SupportIndex::new(&s);
        let outcome = EngineOutcome::Solved {
            kept: vec![false, true],
            stop: EngineStop::Completed,
        };
        let (_, result) = classify_outcome(outcome, &ExactConfig::default(), &index);
        assert_eq!(result.status, SolutionStatus::Error);
    }

    #[test]
    #[cfg(feature = "microlp")]
    fn test_microlp_overrun_reported_as_timeout() {
        let s = tower();
        // The builder clamps to 1 ms; zero makes every solve an overrun.
        let exact = ExactConfig {
            time_limit_ms: 0,
            ..ExactConfig::default()
        };
        let solver = MilpSolver::new("microlp", exact).unwrap();
        let selection = solver.select(&s, &SupportIndex::new(&s));
        assert_eq!(selection.exact.status, SolutionStatus::Timeout);
    }

    #[test]
    #[cfg(feature = "highs")]
    fn test_milp_keeps_maximum() {
        // Input order defeats the greedy pass: the upper brick comes first.
        let structure = Structure::with_default_world(vec![
            Brick::unit(0, 0, 1),
            Brick::unit(0, 0, 0),
            Brick::new(1, 2, 0, 0, 2),
        ])
        .unwrap();
        let solver = MilpSolver::new("highs", ExactConfig::default()).unwrap();
        let selection = solver.select(&structure, &SupportIndex::new(&structure));

        assert_eq!(selection.exact.status, SolutionStatus::Optimal);
        assert_eq!(selection.kept, vec![true, true, false]);
        assert_eq!(selection.exact.variables, 3);
    }

    #[test]
    #[cfg(feature = "highs")]
    fn test_milp_exceeds_limit() {
        let bricks = (0..6).map(|x| Brick::unit(x, 0, 0)).collect();
        let structure = Structure::with_default_world(bricks).unwrap();
        let solver = MilpSolver::new("highs", ExactConfig::default().with_max_items(5)).unwrap();
        let selection = solver.select(&structure, &SupportIndex::new(&structure));

        assert_eq!(selection.exact.status, SolutionStatus::TooLarge);
        assert!(!selection.exact.status.has_valid_solution());
    }

    #[test]
    #[cfg(feature = "highs")]
    fn test_milp_empty_structure() {
        let structure = Structure::default();
        let solver = MilpSolver::new("highs", ExactConfig::default()).unwrap();
        let selection = solver.select(&structure, &SupportIndex::new(&structure));
        assert!(selection.kept.is_empty());
        assert!(selection.exact.is_optimal);
    }

    #[test]
    #[cfg(feature = "microlp")]
    fn test_microlp_engine() {
        let structure = Structure::with_default_world(vec![
            Brick::new(2, 1, 0, 0, 0),
            Brick::new(2, 1, 0, 0, 1),
            Brick::new(3, 1, 0, 0, 2),
        ])
        .unwrap();
        let solver = MilpSolver::new("microlp", ExactConfig::default()).unwrap();
        let selection = solver.select(&structure, &SupportIndex::new(&structure));
        assert_eq!(selection.kept, vec![true, true, false]);
    }
}
