//! Stability scoring for the generation pipeline.
//!
//! [`StabilityScorer`] wraps an injected [`Solver`] and turns a serialized
//! structure into the five-slot score the pipeline expects. Scoring never
//! fails: malformed input, invalid geometry and solver errors all produce the
//! neutral score `1.0` with no structure.

use crate::registry::get_solver;
use serde_json::Value;
use u_stability_core::{Config, Result, Solver, SolveResult, Structure, DEFAULT_WORLD_DIM};

/// Input accepted by [`StabilityScorer::score`].
pub trait ScoreInput {
    /// Converts the input into a validated structure.
    fn to_structure(&self) -> Result<Structure>;
}

impl ScoreInput for str {
    /// Parses a JSON document, or the text form if the input is not JSON.
    fn to_structure(&self) -> Result<Structure> {
        match serde_json::from_str::<Value>(self) {
            Ok(value) => Structure::from_json_value(value),
            Err(_) => Structure::from_txt(self, DEFAULT_WORLD_DIM),
        }
    }
}

impl ScoreInput for String {
    fn to_structure(&self) -> Result<Structure> {
        self.as_str().to_structure()
    }
}

impl ScoreInput for Value {
    fn to_structure(&self) -> Result<Structure> {
        match self {
            Value::String(s) => s.to_structure(),
            other => Structure::from_json_value(other.clone()),
        }
    }
}

impl ScoreInput for Structure {
    fn to_structure(&self) -> Result<Structure> {
        Ok(self.clone())
    }
}

impl<T: ScoreInput + ?Sized> ScoreInput for &T {
    fn to_structure(&self) -> Result<Structure> {
        (**self).to_structure()
    }
}

/// Score returned to the generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityScore {
    /// Kept fraction in `[0, 1]`.
    pub score: f64,
    /// Slots reserved by the pipeline; always `None`.
    pub reserved: [Option<Value>; 3],
    /// The pruned structure, or `None` if scoring degraded.
    pub structure: Option<Structure>,
}

/// Five-slot tuple form of a [`StabilityScore`].
pub type ScoreTuple = (
    f64,
    Option<Value>,
    Option<Value>,
    Option<Value>,
    Option<Structure>,
);

impl StabilityScore {
    /// Neutral score used when the input cannot be scored.
    pub fn neutral() -> Self {
        Self {
            score: 1.0,
            reserved: [None, None, None],
            structure: None,
        }
    }

    fn from_result(result: SolveResult) -> Self {
        Self {
            score: result.stability_score(),
            reserved: [None, None, None],
            structure: Some(result.structure),
        }
    }

    /// Returns the five-slot tuple form.
    pub fn into_tuple(self) -> ScoreTuple {
        let [a, b, c] = self.reserved;
        (self.score, a, b, c, self.structure)
    }
}

/// Scores structures with an injected solver.
#[derive(Debug, Clone)]
pub struct StabilityScorer<S: Solver> {
    solver: S,
}

impl<S: Solver> StabilityScorer<S> {
    /// Creates a scorer around `solver`.
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// The injected solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Scores `input`.
    ///
    /// The part library is accepted for pipeline compatibility and ignored.
    /// When `config` is given, a solver built from it replaces the injected
    /// one for this call.
    pub fn score<I, L>(
        &self,
        input: I,
        _part_library: &L,
        config: Option<&Config>,
    ) -> StabilityScore
    where
        I: ScoreInput,
        L: ?Sized,
    {
        let structure = match input.to_structure() {
            Ok(structure) => structure,
            Err(e) => {
                log::warn!("Unscorable structure: {}", e);
                return StabilityScore::neutral();
            }
        };

        let result = match config {
            Some(config) => get_solver(config).solve_detailed(&structure),
            None => self.solver.solve_detailed(&structure),
        };

        match result {
            Ok(result) => StabilityScore::from_result(result),
            Err(e) => {
                log::warn!("Stability solve failed: {}", e);
                StabilityScore::neutral()
            }
        }
    }
}
