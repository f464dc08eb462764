//! # U-Stability Solver
//!
//! Physical stability pruning of brick structures.
//!
//! Given a generated [`Structure`], the solver removes the bricks that cannot
//! stand: every kept brick above the ground must have each footprint cell
//! covered by a kept brick on the layer directly below, and every kept brick
//! must connect to the ground.
//!
//! ## Features
//!
//! - Exact pruning keeping the maximum stable subset (MILP via `good_lp`)
//! - Greedy forward-pass pruning without any MIP backend
//! - Ground connectivity filtering applied to every result
//! - Explicit backend registry with a guaranteed greedy fallback
//! - Scoring adapter for generation pipelines
//!
//! ## Quick Start
//!
//! ```rust
//! use u_stability_solver::{get_solver, Brick, Config, Solver, Structure};
//!
//! let structure = Structure::with_default_world(vec![
//!     Brick::new(1, 1, 0, 0, 0),
//!     Brick::new(1, 2, 0, 0, 1),
//! ])
//! .unwrap();
//!
//! let solver = get_solver(&Config::default());
//! let stable = solver.solve(&structure).unwrap();
//! assert_eq!(stable.len(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `highs`: HiGHS MIP engine (default)
//! - `cbc`: COIN-OR CBC MIP engine
//! - `microlp`: pure Rust MIP engine
//! - `milp`: implied by each engine; pulls in `good_lp`

pub mod connectivity;
pub mod greedy;
pub mod milp_solver;
pub mod registry;
pub mod scoring;
pub mod stable;
pub mod support;

// Re-exports
pub use connectivity::{connected_components, connectivity_score, filter_connected};
pub use greedy::GreedySolver;
pub use milp_solver::{available_engines, is_engine_available, is_milp_available, MilpSolver};
pub use registry::{get_solver, get_solver_from_env, BackendCandidate, SolverRegistry};
pub use scoring::{ScoreInput, StabilityScore, StabilityScorer};
pub use stable::{Backend, StabilitySolver};
pub use support::SupportIndex;
pub use u_stability_core::{
    Brick, Config, Engine, Error, ExactConfig, NonOptimalPolicy, Result, SolutionStatus,
    SolveResult, Solver, Strategy, Structure,
};
