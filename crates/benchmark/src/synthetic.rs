//! Synthetic structure generator.
//!
//! Produces brick structures with known stability properties (towers that
//! stand completely, bridges whose beam must fall, staircases of overhangs)
//! alongside random noise for stress testing.

use rand::prelude::*;
use u_stability_core::{Brick, Result, Structure, DEFAULT_WORLD_DIM};

/// A named benchmark structure.
#[derive(Debug, Clone)]
pub struct StructureCase {
    /// Case name used in reports.
    pub name: String,
    /// Structure to prune.
    pub structure: Structure,
    /// Size of the maximum stable subset, when known by construction.
    pub expected_kept: Option<usize>,
}

impl StructureCase {
    /// Creates a case with no known optimum.
    pub fn new(name: impl Into<String>, structure: Structure) -> Self {
        Self {
            name: name.into(),
            structure,
            expected_kept: None,
        }
    }

    /// Sets the known maximum stable subset size.
    pub fn with_expected(mut self, kept: usize) -> Self {
        self.expected_kept = Some(kept);
        self
    }
}

/// Generator for synthetic brick structures.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
    world_dim: i32,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            world_dim: DEFAULT_WORLD_DIM,
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            world_dim: DEFAULT_WORLD_DIM,
        }
    }

    /// Sets the world dimension of generated structures (at least 4).
    pub fn with_world_dim(mut self, world_dim: i32) -> Self {
        self.world_dim = world_dim.max(4);
        self
    }

    /// World dimension of generated structures.
    pub fn world_dim(&self) -> i32 {
        self.world_dim
    }

    /// A tower in which every layer rests entirely on the one below.
    ///
    /// Layers shrink or keep their footprint, so the whole tower stands.
    pub fn tower(&mut self, height: i32) -> Result<StructureCase> {
        let height = height.clamp(1, self.world_dim);
        let mut bricks = Vec::with_capacity(height as usize);
        let base = self.world_dim.min(4);
        let mut below = Brick::new(
            self.rng.gen_range(1..=base),
            self.rng.gen_range(1..=base),
            0,
            0,
            0,
        );
        bricks.push(below);

        for z in 1..height {
            let h = self.rng.gen_range(1..=below.h);
            let w = self.rng.gen_range(1..=below.w);
            let x = below.x + self.rng.gen_range(0..=below.h - h);
            let y = below.y + self.rng.gen_range(0..=below.w - w);
            below = Brick::new(h, w, x, y, z);
            bricks.push(below);
        }

        let structure = Structure::new(bricks, self.world_dim)?;
        Ok(StructureCase::new(format!("tower_{}", height), structure)
            .with_expected(height as usize))
    }

    /// Two pillars joined by a beam whose middle cells hang over empty space.
    ///
    /// The beam and the cap resting on it cannot stand; the pillars can.
    pub fn bridge(&mut self, pillar_height: i32, span: i32) -> Result<StructureCase> {
        let pillar_height = pillar_height.clamp(1, self.world_dim - 2);
        let span = span.clamp(1, self.world_dim - 2);
        let mut bricks = Vec::new();

        for z in 0..pillar_height {
            bricks.push(Brick::unit(0, 0, z));
            bricks.push(Brick::unit(span + 1, 0, z));
        }
        bricks.push(Brick::new(span + 2, 1, 0, 0, pillar_height));
        bricks.push(Brick::unit(1, 0, pillar_height + 1));
        bricks.shuffle(&mut self.rng);

        let structure = Structure::new(bricks, self.world_dim)?;
        Ok(
            StructureCase::new(format!("bridge_{}x{}", pillar_height, span), structure)
                .with_expected(2 * pillar_height as usize),
        )
    }

    /// A staircase of 2x1 bricks, each sticking out one cell past the last.
    ///
    /// Only the ground step can stand.
    pub fn staircase(&mut self, steps: i32) -> Result<StructureCase> {
        let steps = steps.clamp(1, self.world_dim - 1);
        let bricks = (0..steps).map(|i| Brick::new(2, 1, i, 0, i)).collect();
        let structure = Structure::new(bricks, self.world_dim)?;
        Ok(StructureCase::new(format!("staircase_{}", steps), structure).with_expected(1))
    }

    /// Random bricks stacked on the lowest `layers` layers.
    pub fn noisy_stack(&mut self, count: usize, layers: i32) -> Result<StructureCase> {
        let layers = layers.clamp(1, self.world_dim);
        let bricks = (0..count).map(|_| self.random_brick(0..layers)).collect();
        let structure = Structure::new(bricks, self.world_dim)?;
        Ok(StructureCase::new(format!("noisy_{}", count), structure))
    }

    /// Random bricks that never touch the ground.
    pub fn floating(&mut self, count: usize) -> Result<StructureCase> {
        let top = self.world_dim.min(6);
        let bricks = (0..count).map(|_| self.random_brick(1..top)).collect();
        let structure = Structure::new(bricks, self.world_dim)?;
        Ok(StructureCase::new(format!("floating_{}", count), structure).with_expected(0))
    }

    fn random_brick(&mut self, layers: std::ops::Range<i32>) -> Brick {
        let h = self.rng.gen_range(1..=3);
        let w = self.rng.gen_range(1..=3);
        let x = self.rng.gen_range(0..=self.world_dim - h);
        let y = self.rng.gen_range(0..=self.world_dim - w);
        let z = self.rng.gen_range(layers);
        Brick::new(h, w, x, y, z)
    }
}

/// Collection of standard synthetic cases.
pub struct SyntheticDatasets;

impl SyntheticDatasets {
    /// Generates all standard synthetic cases with default parameters.
    pub fn all(seed: u64) -> Result<Vec<StructureCase>> {
        let mut gen = SyntheticGenerator::with_seed(seed);
        Ok(vec![
            gen.tower(12)?,
            gen.bridge(3, 2)?,
            gen.bridge(6, 8)?,
            gen.staircase(10)?,
            gen.noisy_stack(60, 4)?,
            gen.noisy_stack(400, 8)?,
            gen.floating(30)?,
        ])
    }

    /// Returns the name prefixes of all standard cases.
    pub fn names() -> &'static [&'static str] {
        &["tower", "bridge", "staircase", "noisy", "floating"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_generation() {
        let mut gen = SyntheticGenerator::with_seed(42);
        let case = gen.tower(8).unwrap();
        assert_eq!(case.structure.len(), 8);
        assert_eq!(case.structure.height(), Some(7));
        assert_eq!(case.expected_kept, Some(8));
    }

    #[test]
    fn test_bridge_generation() {
        let mut gen = SyntheticGenerator::with_seed(42);
        let case = gen.bridge(2, 3).unwrap();
        assert_eq!(case.structure.len(), 6);
        assert_eq!(case.expected_kept, Some(4));
    }

    #[test]
    fn test_world_dim_clamps_sizes() {
        let mut gen = SyntheticGenerator::with_seed(1).with_world_dim(5);
        assert_eq!(gen.world_dim(), 5);
        assert!(gen.tower(50).unwrap().structure.len() <= 5);
        assert!(gen.bridge(50, 50).is_ok());
        assert!(gen.staircase(50).is_ok());
        assert!(gen.noisy_stack(100, 50).is_ok());
        assert!(gen.floating(100).is_ok());
    }

    #[test]
    fn test_reproducibility() {
        let mut gen1 = SyntheticGenerator::with_seed(123);
        let mut gen2 = SyntheticGenerator::with_seed(123);

        let a = gen1.noisy_stack(20, 3).unwrap();
        let b = gen2.noisy_stack(20, 3).unwrap();
        assert_eq!(a.structure, b.structure);
    }

    #[test]
    fn test_floating_has_no_ground() {
        let mut gen = SyntheticGenerator::with_seed(9);
        let case = gen.floating(25).unwrap();
        assert!(case.structure.bricks().iter().all(|b| !b.is_ground()));
    }

    #[test]
    fn test_all_datasets() {
        let cases = SyntheticDatasets::all(42).unwrap();
        assert_eq!(cases.len(), 7);
        for case in &cases {
            assert!(
                SyntheticDatasets::names()
                    .iter()
                    .any(|prefix| case.name.starts_with(prefix)),
                "unexpected name {}",
                case.name
            );
        }
    }
}
