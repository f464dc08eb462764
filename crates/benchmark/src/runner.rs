//! Benchmark runner for synthetic structures.

use crate::result::{BenchmarkResult, RunResult};
use crate::synthetic::StructureCase;
use rayon::prelude::*;
use u_stability_core::{Config, NonOptimalPolicy, Solver, Strategy};
use u_stability_solver::{connectivity_score, get_solver, StabilitySolver};

/// Configuration for benchmark runs.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Strategies to benchmark.
    pub strategies: Vec<Strategy>,
    /// MIP engine identifier.
    pub engine: String,
    /// MIP time limit per run in milliseconds.
    pub time_limit_ms: u64,
    /// Handling of non-optimal MIP terminations.
    pub non_optimal: NonOptimalPolicy,
    /// Solve cases in parallel.
    pub parallel: bool,
    /// Whether to show progress.
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        let solver = Config::default();
        Self {
            strategies: vec![Strategy::Milp, Strategy::Greedy],
            engine: solver.engine,
            time_limit_ms: solver.exact.time_limit_ms,
            non_optimal: solver.non_optimal,
            parallel: true,
            show_progress: true,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a new benchmark configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strategies to benchmark.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets the MIP engine.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the MIP time limit per run.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the non-optimal termination policy.
    pub fn with_non_optimal_policy(mut self, policy: NonOptimalPolicy) -> Self {
        self.non_optimal = policy;
        self
    }

    /// Enables or disables parallel solving.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Solver configuration derived from these settings.
    pub fn solver_config(&self) -> Config {
        Config::new()
            .with_engine(self.engine.clone())
            .with_time_limit(self.time_limit_ms)
            .with_non_optimal_policy(self.non_optimal)
    }
}

/// Benchmark runner.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a new benchmark runner.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Runs every configured strategy on every case.
    ///
    /// Runs are reported in case order, then strategy order, regardless of
    /// whether they were solved in parallel.
    pub fn run_cases(&self, cases: &[StructureCase]) -> BenchmarkResult {
        let solver_config = self.config.solver_config();
        let solvers: Vec<(Strategy, StabilitySolver)> = self
            .config
            .strategies
            .iter()
            .map(|&strategy| (strategy, self.build_solver(strategy, &solver_config)))
            .collect();

        let jobs: Vec<(&StructureCase, Strategy, &StabilitySolver)> = cases
            .iter()
            .flat_map(|case| solvers.iter().map(move |(s, solver)| (case, *s, solver)))
            .collect();

        let runs: Vec<RunResult> = if self.config.parallel {
            jobs.par_iter()
                .map(|&(case, strategy, solver)| self.run_one(case, strategy, solver))
                .collect()
        } else {
            jobs.iter()
                .map(|&(case, strategy, solver)| self.run_one(case, strategy, solver))
                .collect()
        };

        let mut result = BenchmarkResult::new();
        result.metadata.engine = self.config.engine.clone();
        for run in runs {
            result.add_run(run);
        }
        result
    }

    fn build_solver(&self, strategy: Strategy, config: &Config) -> StabilitySolver {
        match strategy {
            Strategy::Milp => {
                let solver = get_solver(config);
                if solver.strategy() != Strategy::Milp {
                    log::warn!(
                        "MIP engine '{}' unavailable, Milp runs will use greedy",
                        config.engine
                    );
                }
                solver
            }
            Strategy::Greedy => StabilitySolver::greedy(),
        }
    }

    fn run_one(
        &self,
        case: &StructureCase,
        strategy: Strategy,
        solver: &StabilitySolver,
    ) -> RunResult {
        let connectivity = connectivity_score(&case.structure);
        let run = match solver.solve_detailed(&case.structure) {
            Ok(result) => RunResult::from_solve(&case.name, strategy, &result, connectivity),
            Err(e) => {
                log::error!("{} on {} failed: {}", strategy, case.name, e);
                RunResult::failed(&case.name, strategy, case.structure.len(), e)
            }
        }
        .with_expected(case.expected_kept);

        if self.config.show_progress {
            println!(
                "  {:<18} {:<8} kept={}/{} time={}ms",
                run.case, run.strategy, run.kept_bricks, run.total_bricks, run.time_ms
            );
        }
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticGenerator;

    fn quiet(config: BenchmarkConfig) -> BenchmarkRunner {
        BenchmarkRunner::new(BenchmarkConfig {
            show_progress: false,
            ..config
        })
    }

    #[test]
    fn test_greedy_run_reaches_known_maxima() {
        let mut gen = SyntheticGenerator::with_seed(3);
        let cases = vec![
            gen.tower(6).unwrap(),
            gen.staircase(5).unwrap(),
            gen.floating(10).unwrap(),
        ];
        let runner = quiet(BenchmarkConfig::new().with_strategies(vec![Strategy::Greedy]));
        let result = runner.run_cases(&cases);

        assert_eq!(result.runs.len(), 3);
        for run in &result.runs {
            assert_eq!(run.matches_expected(), Some(true), "case {}", run.case);
        }
    }

    #[test]
    fn test_run_order_is_stable() {
        let mut gen = SyntheticGenerator::with_seed(5);
        let cases = vec![gen.noisy_stack(30, 3).unwrap(), gen.noisy_stack(40, 3).unwrap()];
        let runner = quiet(BenchmarkConfig::new().with_engine("no-such-engine"));
        let result = runner.run_cases(&cases);

        let order: Vec<(&str, &str)> = result
            .runs
            .iter()
            .map(|r| (r.case.as_str(), r.strategy.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("noisy_30", "Milp"),
                ("noisy_30", "Greedy"),
                ("noisy_40", "Milp"),
                ("noisy_40", "Greedy"),
            ]
        );
        // Without an engine the Milp runs are produced by greedy.
        assert!(result.runs.iter().all(|r| r.used_strategy == "Greedy"));
        assert_eq!(result.metadata.engine, "no-such-engine");
    }

    #[test]
    #[cfg(feature = "highs")]
    fn test_milp_reaches_known_maxima() {
        let mut gen = SyntheticGenerator::with_seed(11);
        let cases = vec![gen.bridge(3, 4).unwrap(), gen.tower(8).unwrap()];
        let runner = quiet(
            BenchmarkConfig::new()
                .with_strategies(vec![Strategy::Milp])
                .with_parallel(false),
        );
        let result = runner.run_cases(&cases);
        for run in &result.runs {
            assert_eq!(run.used_strategy, "Milp");
            assert_eq!(run.matches_expected(), Some(true), "case {}", run.case);
        }
    }
}
