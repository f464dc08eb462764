//! Solver traits and configuration.

use crate::brick::Structure;
use crate::error::{Error, Result};
use crate::exact::ExactConfig;
use crate::result::SolveResult;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable holding the MIP engine identifier.
pub const ENGINE_ENV_VAR: &str = "U_STABILITY_ENGINE";

/// Environment variable holding the MIP time limit in milliseconds.
pub const TIME_LIMIT_ENV_VAR: &str = "U_STABILITY_TIME_LIMIT_MS";

/// Environment variable selecting the non-optimal termination policy.
pub const NON_OPTIMAL_ENV_VAR: &str = "U_STABILITY_NON_OPTIMAL";

/// Pruning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Binary MIP maximizing the number of kept bricks.
    #[default]
    Milp,
    /// Single forward pass accepting bricks supported by earlier ones.
    Greedy,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Milp => write!(f, "Milp"),
            Self::Greedy => write!(f, "Greedy"),
        }
    }
}

/// MIP engine backing the optimal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Engine {
    /// HiGHS (MIT licensed, default).
    #[default]
    Highs,
    /// COIN-OR CBC.
    Cbc,
    /// Pure Rust microlp.
    ///
    /// microlp accepts no time limit. A solve always runs to completion and is
    /// reported as a timeout afterwards if it took longer than the limit.
    Microlp,
}

impl Engine {
    /// All engines in probing order.
    pub const ALL: [Engine; 3] = [Engine::Highs, Engine::Cbc, Engine::Microlp];

    /// Canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highs => "highs",
            Self::Cbc => "cbc",
            Self::Microlp => "microlp",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highs" => Ok(Self::Highs),
            "cbc" | "coin_cbc" => Ok(Self::Cbc),
            "microlp" => Ok(Self::Microlp),
            other => Err(Error::BackendUnavailable(format!(
                "unknown MIP engine '{}'",
                other
            ))),
        }
    }
}

/// What to do when the MIP search ends without a proven optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NonOptimalPolicy {
    /// Rerun the structure through the greedy pass and connectivity filter.
    #[default]
    Fallback,
    /// Return [`Error::NonOptimalTermination`].
    Fail,
}

impl FromStr for NonOptimalPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "fail" => Ok(Self::Fail),
            other => Err(Error::Parse(format!(
                "unknown non-optimal policy '{}'",
                other
            ))),
        }
    }
}

/// Configuration read once when a solver is constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// MIP engine identifier (`highs`, `cbc`, `microlp`).
    pub engine: String,

    /// Exact solver limits.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exact: ExactConfig,

    /// Handling of non-optimal MIP termination.
    #[cfg_attr(feature = "serde", serde(default))]
    pub non_optimal: NonOptimalPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::default().as_str().to_string(),
            exact: ExactConfig::default(),
            non_optimal: NonOptimalPolicy::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// Unset variables keep their defaults. Unparseable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(engine) = lookup(ENGINE_ENV_VAR) {
            config.engine = engine.trim().to_string();
        }

        if let Some(raw) = lookup(TIME_LIMIT_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.exact = config.exact.with_time_limit_ms(ms),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", TIME_LIMIT_ENV_VAR, raw, e),
            }
        }

        if let Some(raw) = lookup(NON_OPTIMAL_ENV_VAR) {
            match raw.parse::<NonOptimalPolicy>() {
                Ok(policy) => config.non_optimal = policy,
                Err(e) => log::warn!("Ignoring {}: {}", NON_OPTIMAL_ENV_VAR, e),
            }
        }

        config
    }

    /// Sets the MIP engine identifier.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the MIP time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.exact = self.exact.with_time_limit_ms(ms);
        self
    }

    /// Sets the exact solver configuration.
    pub fn with_exact(mut self, exact: ExactConfig) -> Self {
        self.exact = exact;
        self
    }

    /// Sets the non-optimal termination policy.
    pub fn with_non_optimal_policy(mut self, policy: NonOptimalPolicy) -> Self {
        self.non_optimal = policy;
        self
    }

    /// Parses the engine identifier.
    pub fn engine(&self) -> Result<Engine> {
        self.engine.parse()
    }
}

/// Trait for stability pruning solvers.
///
/// Implementations are stateless after construction: solving never mutates
/// the solver or the input structure.
pub trait Solver: Send + Sync {
    /// Strategy this solver runs first.
    fn strategy(&self) -> Strategy;

    /// Returns the largest stable subset found, with solve diagnostics.
    fn solve_detailed(&self, structure: &Structure) -> Result<SolveResult>;

    /// Returns the stable subset of `structure` as a new structure.
    fn solve(&self, structure: &Structure) -> Result<Structure> {
        self.solve_detailed(structure).map(|r| r.structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_engine_parse() {
        assert_eq!("HIGHs".parse::<Engine>().unwrap(), Engine::Highs);
        assert_eq!(" cbc ".parse::<Engine>().unwrap(), Engine::Cbc);
        assert_eq!("coin_cbc".parse::<Engine>().unwrap(), Engine::Cbc);
        assert_eq!("microlp".parse::<Engine>().unwrap(), Engine::Microlp);
        assert!(matches!(
            "gurobi".parse::<Engine>(),
            Err(Error::BackendUnavailable(_))
        ));
        for engine in Engine::ALL {
            assert_eq!(engine.as_str().parse::<Engine>().unwrap(), engine);
        }
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_engine("microlp")
            .with_time_limit(500)
            .with_non_optimal_policy(NonOptimalPolicy::Fail);
        assert_eq!(config.engine().unwrap(), Engine::Microlp);
        assert_eq!(config.exact.time_limit_ms, 500);
        assert_eq!(config.non_optimal, NonOptimalPolicy::Fail);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENGINE_ENV_VAR, "CBC"),
            (TIME_LIMIT_ENV_VAR, "1500"),
            (NON_OPTIMAL_ENV_VAR, "fail"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.engine().unwrap(), Engine::Cbc);
        assert_eq!(config.exact.time_limit_ms, 1500);
        assert_eq!(config.non_optimal, NonOptimalPolicy::Fail);
    }

    #[test]
    fn test_config_from_lookup_ignores_garbage() {
        let config = Config::from_lookup(|k| match k {
            TIME_LIMIT_ENV_VAR => Some("soon".to_string()),
            NON_OPTIMAL_ENV_VAR => Some("maybe".to_string()),
            _ => None,
        });
        assert_eq!(config, Config::default());
    }
}
