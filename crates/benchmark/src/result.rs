//! Benchmark result types and recording.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use u_stability_core::{SolveResult, Strategy};

/// Result of a single benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Case name
    pub case: String,
    /// Strategy requested
    pub strategy: String,
    /// Strategy that produced the kept set (differs after a fallback)
    pub used_strategy: String,
    /// Termination status of the producing strategy
    pub status: String,
    /// Bricks in the input
    pub total_bricks: usize,
    /// Bricks kept
    pub kept_bricks: usize,
    /// Bricks dropped by the connectivity filter
    pub disconnected: usize,
    /// Whether the greedy fallback ran
    pub fell_back: bool,
    /// Kept fraction (0.0 - 1.0)
    pub stability_score: f64,
    /// Fraction of input bricks connected to the ground before pruning
    pub input_connectivity: f64,
    /// Known maximum stable subset size
    pub expected_kept: Option<usize>,
    /// Computation time in milliseconds
    pub time_ms: u64,
    /// Solver error, if the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// Creates a run result from a successful solve.
    pub fn from_solve(
        case: impl Into<String>,
        strategy: Strategy,
        result: &SolveResult,
        input_connectivity: f64,
    ) -> Self {
        Self {
            case: case.into(),
            strategy: strategy.to_string(),
            used_strategy: result.strategy.to_string(),
            status: result.status.to_string(),
            total_bricks: result.total,
            kept_bricks: result.kept_count(),
            disconnected: result.disconnected,
            fell_back: result.fell_back,
            stability_score: result.stability_score(),
            input_connectivity,
            expected_kept: None,
            time_ms: result.computation_time_ms,
            error: None,
        }
    }

    /// Creates a run result for a failed solve.
    pub fn failed(
        case: impl Into<String>,
        strategy: Strategy,
        total_bricks: usize,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            case: case.into(),
            strategy: strategy.to_string(),
            used_strategy: strategy.to_string(),
            status: "Error".to_string(),
            total_bricks,
            kept_bricks: 0,
            disconnected: 0,
            fell_back: false,
            stability_score: 0.0,
            input_connectivity: 0.0,
            expected_kept: None,
            time_ms: 0,
            error: Some(error.to_string()),
        }
    }

    /// Sets the known maximum stable subset size.
    pub fn with_expected(mut self, expected: Option<usize>) -> Self {
        self.expected_kept = expected;
        self
    }

    /// Returns true if the run reached the known maximum.
    ///
    /// `None` when no maximum is known or the run failed.
    pub fn matches_expected(&self) -> Option<bool> {
        if self.error.is_some() {
            return None;
        }
        self.expected_kept.map(|e| e == self.kept_bricks)
    }
}

/// Collection of benchmark results.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Individual run results
    pub runs: Vec<RunResult>,
    /// Seconds since the Unix epoch when the benchmark was run
    pub timestamp: u64,
    /// Additional metadata
    pub metadata: BenchmarkMetadata,
}

/// Metadata about the benchmark run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkMetadata {
    /// U-Stability version
    pub version: String,
    /// MIP engine requested
    pub engine: String,
    /// Seed of the synthetic generator, if used
    pub seed: Option<u64>,
}

impl BenchmarkResult {
    /// Creates a new benchmark result.
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            runs: Vec::new(),
            timestamp,
            metadata: BenchmarkMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
        }
    }

    /// Adds a run result.
    pub fn add_run(&mut self, result: RunResult) {
        self.runs.push(result);
    }

    /// Saves results to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{:=<100}", "");
        println!("BENCHMARK RESULTS");
        println!("{:=<100}", "");
        println!(
            "{:<18} {:<8} {:<10} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8}",
            "Case", "Strategy", "Status", "Total", "Kept", "Score", "Expect", "Time(ms)", "Fallback"
        );
        println!("{:-<100}", "");

        for run in &self.runs {
            let expected = run.expected_kept.map_or("-".to_string(), |e| e.to_string());
            let status = match &run.error {
                Some(_) => "FAILED".to_string(),
                None => run.status.clone(),
            };
            println!(
                "{:<18} {:<8} {:<10} {:>8} {:>8} {:>8.3} {:>8} {:>10} {:>8}",
                run.case,
                run.strategy,
                status,
                run.total_bricks,
                run.kept_bricks,
                run.stability_score,
                expected,
                run.time_ms,
                if run.fell_back { "yes" } else { "" }
            );
        }

        println!("{:=<100}\n", "");
    }

    /// Computes summary statistics grouped by requested strategy.
    pub fn summary_by_strategy(&self) -> Vec<StrategySummary> {
        let mut by_strategy: BTreeMap<String, Vec<&RunResult>> = BTreeMap::new();
        for run in &self.runs {
            by_strategy
                .entry(run.strategy.clone())
                .or_default()
                .push(run);
        }

        by_strategy
            .into_iter()
            .map(|(strategy, runs)| {
                let n = runs.len() as f64;
                let avg_score = runs.iter().map(|r| r.stability_score).sum::<f64>() / n;
                let avg_time = runs.iter().map(|r| r.time_ms).sum::<u64>() as f64 / n;

                StrategySummary {
                    strategy,
                    run_count: runs.len(),
                    avg_stability_score: avg_score,
                    avg_time_ms: avg_time as u64,
                    fallbacks: runs.iter().filter(|r| r.fell_back).count(),
                    failures: runs.iter().filter(|r| r.error.is_some()).count(),
                    expected_hits: runs
                        .iter()
                        .filter(|r| r.matches_expected() == Some(true))
                        .count(),
                }
            })
            .collect()
    }
}

/// Summary statistics for a strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub run_count: usize,
    pub avg_stability_score: f64,
    pub avg_time_ms: u64,
    pub fallbacks: usize,
    pub failures: usize,
    pub expected_hits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_stability_core::{Brick, SolutionStatus, Structure};

    fn solve_result() -> SolveResult {
        let input = Structure::with_default_world(vec![
            Brick::unit(0, 0, 0),
            Brick::unit(0, 0, 1),
            Brick::unit(4, 4, 1),
        ])
        .unwrap();
        SolveResult::from_mask(
            &input,
            &[true, true, false],
            SolutionStatus::Feasible,
            Strategy::Greedy,
        )
        .with_fallback(true)
        .with_time_ms(12)
    }

    #[test]
    fn test_run_result() {
        let run = RunResult::from_solve("tower", Strategy::Milp, &solve_result(), 2.0 / 3.0)
            .with_expected(Some(2));

        assert_eq!(run.strategy, "Milp");
        assert_eq!(run.used_strategy, "Greedy");
        assert_eq!(run.kept_bricks, 2);
        assert!(run.fell_back);
        assert_eq!(run.matches_expected(), Some(true));
        assert!((run.stability_score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_failed_run() {
        let run = RunResult::failed("bridge", Strategy::Milp, 10, "time limit reached")
            .with_expected(Some(4));
        assert_eq!(run.matches_expected(), None);
        assert_eq!(run.error.as_deref(), Some("time limit reached"));
    }

    #[test]
    fn test_summary_by_strategy() {
        let mut result = BenchmarkResult::new();
        result.add_run(RunResult::from_solve("a", Strategy::Milp, &solve_result(), 1.0));
        result.add_run(RunResult::failed("b", Strategy::Milp, 3, "boom"));
        result.add_run(RunResult::from_solve("a", Strategy::Greedy, &solve_result(), 1.0));

        let summary = result.summary_by_strategy();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].strategy, "Greedy");
        assert_eq!(summary[1].strategy, "Milp");
        assert_eq!(summary[1].run_count, 2);
        assert_eq!(summary[1].failures, 1);
        assert_eq!(summary[1].fallbacks, 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut result = BenchmarkResult::new();
        result.add_run(RunResult::from_solve("a", Strategy::Greedy, &solve_result(), 1.0));
        let json = serde_json::to_string(&result).unwrap();
        let back: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.runs.len(), 1);
        assert_eq!(back.metadata.version, env!("CARGO_PKG_VERSION"));
    }
}
