//! Exact solver configuration and result types.
//!
//! The optimal pruning path formulates brick retention as a binary MIP. These
//! types carry its limits and report how the search ended, so the facade can
//! tell a proven optimum apart from a timeout or a backend failure.
//!
//! # Example
//!
//! ```rust
//! use u_stability_core::exact::{ExactConfig, SolutionStatus};
//!
//! let config = ExactConfig::default()
//!     .with_time_limit_ms(5_000)
//!     .with_max_items(2_000);
//! assert!(config.is_within_limit(500));
//! assert!(SolutionStatus::Optimal.is_optimal());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Solution status from a pruning solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolutionStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Valid solution found, but optimality not proven (heuristic result).
    Feasible,
    /// The model was reported infeasible.
    Infeasible,
    /// Time limit reached before a proven optimum.
    Timeout,
    /// Instance exceeds the exact solving limit and was not attempted.
    TooLarge,
    /// Solver encountered an error.
    Error,
    /// Solution status unknown or not applicable.
    #[default]
    Unknown,
}

impl SolutionStatus {
    /// Returns true for a proven optimum.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }

    /// Returns true if the kept set from this status can be trusted as-is.
    pub fn has_valid_solution(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "Optimal"),
            Self::Feasible => write!(f, "Feasible"),
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Timeout => write!(f, "Timeout"),
            Self::TooLarge => write!(f, "TooLarge"),
            Self::Error => write!(f, "Error"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Configuration for the exact (MIP-based) solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExactConfig {
    /// Wall-clock limit for one MIP solve in milliseconds.
    pub time_limit_ms: u64,

    /// Relative MIP gap tolerance (0.0 = optimal).
    pub gap_tolerance: f64,

    /// Maximum number of bricks handed to the MIP backend.
    pub max_items: usize,

    /// Verbosity level (0 = silent, 1+ = backend output).
    pub verbosity: u32,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            gap_tolerance: 0.0,
            max_items: 4_000,
            verbosity: 0,
        }
    }
}

impl ExactConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms.max(1);
        self
    }

    /// Set MIP gap tolerance.
    pub fn with_gap_tolerance(mut self, gap: f64) -> Self {
        self.gap_tolerance = gap.clamp(0.0, 1.0);
        self
    }

    /// Set maximum number of bricks for exact solving.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max.max(1);
        self
    }

    /// Set verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = level;
        self
    }

    /// Check if the number of bricks is within the exact solving limit.
    pub fn is_within_limit(&self, num_items: usize) -> bool {
        num_items <= self.max_items
    }

    /// Time limit in seconds, as backends expect it.
    pub fn time_limit_secs(&self) -> f64 {
        self.time_limit_ms as f64 / 1000.0
    }
}

/// Extended result information from the exact solver.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExactResult {
    /// Solution status.
    pub status: SolutionStatus,

    /// Number of kept bricks in the returned assignment.
    pub objective_value: f64,

    /// Whether the solution is proven optimal.
    pub is_optimal: bool,

    /// Number of decision variables in the model.
    pub variables: usize,

    /// Number of support constraints in the model.
    pub constraints: usize,

    /// Solver-specific status message.
    pub message: String,
}

impl ExactResult {
    /// Create a result indicating an optimal solution.
    pub fn optimal(objective: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: objective,
            is_optimal: true,
            message: "Optimal solution found".to_string(),
            ..Default::default()
        }
    }

    /// Create a result for a heuristic (valid, not proven optimal) solution.
    pub fn feasible(objective: f64) -> Self {
        Self {
            status: SolutionStatus::Feasible,
            objective_value: objective,
            is_optimal: false,
            message: "Feasible solution found".to_string(),
            ..Default::default()
        }
    }

    /// Create a result indicating infeasibility.
    pub fn infeasible() -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            message: "Problem is infeasible".to_string(),
            ..Default::default()
        }
    }

    /// Create a result indicating timeout.
    pub fn timeout(limit_ms: u64) -> Self {
        Self {
            status: SolutionStatus::Timeout,
            message: format!("Time limit of {} ms reached", limit_ms),
            ..Default::default()
        }
    }

    /// Create a result for an instance above the exact limit.
    pub fn too_large(items: usize, max_items: usize) -> Self {
        Self {
            status: SolutionStatus::TooLarge,
            message: format!("{} bricks exceed exact limit {}", items, max_items),
            ..Default::default()
        }
    }

    /// Create a result indicating an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolutionStatus::Error,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set model size statistics.
    pub fn with_model_size(mut self, variables: usize, constraints: usize) -> Self {
        self.variables = variables;
        self.constraints = constraints;
        self
    }
}
