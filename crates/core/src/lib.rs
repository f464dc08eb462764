//! # U-Stability Core
//!
//! Core model and abstractions for the U-Stability brick pruning engine.
//!
//! This crate provides the types shared by the solver and benchmark crates.
//!
//! ## Core Components
//!
//! - **Model**: [`Brick`], [`Structure`] - validated, immutable brick layouts
//! - **Solver trait**: [`Solver`] - `solve(structure) -> structure`
//! - **Configuration**: [`Config`], [`ExactConfig`], [`NonOptimalPolicy`]
//! - **Results**: [`SolveResult`], [`ExactResult`], [`SolutionStatus`]
//!
//! ## Strategies
//!
//! | Strategy | Guarantee | Description |
//! |----------|-----------|-------------|
//! | `Milp` | Maximum stable subset | Binary MIP over keep indicators |
//! | `Greedy` | Valid stable subset | Order-dependent forward pass |
//!
//! ## Configuration
//!
//! ```rust
//! use u_stability_core::{Config, NonOptimalPolicy};
//!
//! let config = Config::new()
//!     .with_engine("highs")
//!     .with_time_limit(5_000)
//!     .with_non_optimal_policy(NonOptimalPolicy::Fallback);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization and JSON documents (default)

pub mod brick;
pub mod error;
pub mod exact;
pub mod format;
pub mod result;
pub mod solver;

// Re-exports
pub use brick::{Brick, Structure, StructureDocument, DEFAULT_WORLD_DIM};
pub use error::{Error, Result};
pub use exact::{ExactConfig, ExactResult, SolutionStatus};
pub use result::SolveResult;
pub use solver::{
    Config, Engine, NonOptimalPolicy, Solver, Strategy, ENGINE_ENV_VAR, NON_OPTIMAL_ENV_VAR,
    TIME_LIMIT_ENV_VAR,
};
