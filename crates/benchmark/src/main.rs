//! U-Stability Benchmark Runner CLI

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use u_stability_benchmark::{BenchmarkConfig, BenchmarkRunner, SyntheticDatasets};
use u_stability_core::{Config, NonOptimalPolicy, Strategy, Structure};
use u_stability_solver::{
    connected_components, connectivity_score, get_solver, ScoreInput, Solver, StabilityScorer,
};

#[derive(Parser)]
#[command(name = "bench-runner")]
#[command(about = "Stability pruning benchmark runner for U-Stability")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run benchmarks on the synthetic structure set
    Run {
        /// Random seed for the synthetic generator
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Strategies to benchmark
        #[arg(short = 'S', long, value_enum, default_values_t = vec![StrategyArg::Milp, StrategyArg::Greedy])]
        strategies: Vec<StrategyArg>,

        #[command(flatten)]
        solver: SolverArgs,

        /// Solve cases one at a time
        #[arg(long)]
        sequential: bool,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prune a single structure file (JSON document or text form)
    Solve {
        /// Path to the structure file
        file: PathBuf,

        #[command(flatten)]
        solver: SolverArgs,

        /// Output file for the pruned structure; printed to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format of the pruned structure
        #[arg(short, long, value_enum, default_value = "txt")]
        format: OutputFormat,
    },

    /// Print the stability score of a structure file
    Score {
        /// Path to the structure file
        file: PathBuf,

        #[command(flatten)]
        solver: SolverArgs,
    },
}

/// Solver options shared by all subcommands.
#[derive(clap::Args)]
struct SolverArgs {
    /// MIP engine (highs, cbc, microlp); defaults to U_STABILITY_ENGINE or highs
    #[arg(short, long)]
    engine: Option<String>,

    /// MIP time limit in milliseconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Fail instead of falling back to greedy when the MIP is not optimal
    #[arg(long)]
    fail_on_non_optimal: bool,
}

impl SolverArgs {
    /// Environment configuration overridden by command line flags.
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(engine) = &self.engine {
            config = config.with_engine(engine.clone());
        }
        if let Some(ms) = self.time_limit {
            config = config.with_time_limit(ms);
        }
        if self.fail_on_non_optimal {
            config = config.with_non_optimal_policy(NonOptimalPolicy::Fail);
        }
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Exact MILP pruning
    Milp,
    /// Greedy forward pass
    Greedy,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Milp => Strategy::Milp,
            StrategyArg::Greedy => Strategy::Greedy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One brick per line
    Txt,
    /// JSON document
    Json,
}

fn read_structure(path: &Path) -> anyhow::Result<Structure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    text.to_structure()
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            seed,
            strategies,
            solver,
            sequential,
            output,
        } => {
            let solver_config = solver.config();
            let strategies: Vec<Strategy> = strategies.into_iter().map(Into::into).collect();
            let config = BenchmarkConfig::new()
                .with_strategies(strategies)
                .with_engine(solver_config.engine.clone())
                .with_time_limit(solver_config.exact.time_limit_ms)
                .with_non_optimal_policy(solver_config.non_optimal)
                .with_parallel(!sequential);

            let cases = SyntheticDatasets::all(seed).context("failed to generate cases")?;
            println!("Benchmarking {} synthetic structures (seed {})", cases.len(), seed);

            let runner = BenchmarkRunner::new(config);
            let mut results = runner.run_cases(&cases);
            results.metadata.seed = Some(seed);

            results.print_summary();

            println!("Strategy Comparison:");
            println!("{:-<60}", "");
            for summary in results.summary_by_strategy() {
                println!(
                    "  {:<8} runs={:<3} avg_score={:.3} avg_time={}ms hits={} fallbacks={} failures={}",
                    summary.strategy,
                    summary.run_count,
                    summary.avg_stability_score,
                    summary.avg_time_ms,
                    summary.expected_hits,
                    summary.fallbacks,
                    summary.failures
                );
            }

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("\nResults saved to: {}", path.display());
            }
        }

        Commands::Solve {
            file,
            solver,
            output,
            format,
        } => {
            let structure = read_structure(&file)?;
            let result = get_solver(&solver.config()).solve_detailed(&structure)?;

            eprintln!(
                "{}: kept {}/{} bricks ({}, {}{}) in {}ms",
                file.display(),
                result.kept_count(),
                result.total,
                result.strategy,
                result.status,
                if result.fell_back { ", fallback" } else { "" },
                result.computation_time_ms
            );

            let rendered = match format {
                OutputFormat::Txt => result.structure.to_txt(),
                OutputFormat::Json => result.structure.to_json()?,
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Pruned structure saved to: {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }

        Commands::Score { file, solver } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let config = solver.config();

            if let Ok(structure) = text.to_structure() {
                println!("Bricks:       {}", structure.len());
                println!("Connectivity: {:.3}", connectivity_score(&structure));
                println!("Components:   {}", connected_components(&structure));
            }

            let scorer = StabilityScorer::new(get_solver(&config));
            let score = scorer.score(text.as_str(), &(), None);
            println!("Score:        {:.4}", score.score);
            if score.structure.is_none() {
                println!("(structure could not be scored; neutral score reported)");
            }
        }
    }

    Ok(())
}
