//! Brick and structure model.
//!
//! A [`Brick`] is an axis-aligned `h × w` footprint placed at integer grid
//! coordinates `(x, y, z)`. A [`Structure`] is an ordered list of bricks inside
//! a cubic world of side `world_dim`. Structures are validated on construction
//! and never mutated afterwards: pruning produces a new structure.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// World dimension used when a serialized structure does not carry one.
pub const DEFAULT_WORLD_DIM: i32 = 20;

/// A rectangular brick on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Brick {
    /// Extent along the x axis.
    pub h: i32,
    /// Extent along the y axis.
    pub w: i32,
    /// Minimum x cell.
    pub x: i32,
    /// Minimum y cell.
    pub y: i32,
    /// Layer (0 = ground).
    pub z: i32,
}

impl Brick {
    /// Creates a new brick.
    pub fn new(h: i32, w: i32, x: i32, y: i32, z: i32) -> Self {
        Self { h, w, x, y, z }
    }

    /// Creates a 1×1 brick.
    pub fn unit(x: i32, y: i32, z: i32) -> Self {
        Self::new(1, 1, x, y, z)
    }

    /// Returns the same brick with `h` and `w` swapped.
    pub fn rotated(&self) -> Self {
        Self::new(self.w, self.h, self.x, self.y, self.z)
    }

    /// Returns true if the brick sits on the ground layer.
    pub fn is_ground(&self) -> bool {
        self.z == 0
    }

    /// Number of footprint cells.
    pub fn area(&self) -> usize {
        (self.h.max(0) as usize) * (self.w.max(0) as usize)
    }

    /// Returns true if the footprint contains cell `(cx, cy)`.
    pub fn covers(&self, cx: i32, cy: i32) -> bool {
        self.x <= cx && cx < self.x + self.h && self.y <= cy && cy < self.y + self.w
    }

    /// Returns true if the two footprints share at least one cell (z ignored).
    pub fn overlaps(&self, other: &Brick) -> bool {
        !(self.x + self.h <= other.x
            || other.x + other.h <= self.x
            || self.y + self.w <= other.y
            || other.y + other.w <= self.y)
    }

    /// Returns true if the bricks are on adjacent layers with overlapping footprints.
    pub fn is_vertically_adjacent(&self, other: &Brick) -> bool {
        (self.z - other.z).abs() == 1 && self.overlaps(other)
    }

    /// Iterates the footprint cells in x-major order.
    pub fn footprint(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.x..self.x + self.h).flat_map(move |cx| (self.y..self.y + self.w).map(move |cy| (cx, cy)))
    }

    /// Checks the brick against the bounds of a `world_dim` cube.
    pub fn validate(&self, world_dim: i32) -> Result<()> {
        if self.h < 1 || self.w < 1 {
            return Err(Error::InvalidGeometry(format!(
                "brick {:?} has non-positive dimensions",
                self
            )));
        }
        if self.x < 0 || self.y < 0 || self.z < 0 {
            return Err(Error::InvalidGeometry(format!(
                "brick {:?} has negative coordinates",
                self
            )));
        }
        let exceeds = |start: i32, extent: i32| {
            start
                .checked_add(extent)
                .map_or(true, |end| end > world_dim)
        };
        if exceeds(self.x, self.h) || exceeds(self.y, self.w) || self.z >= world_dim {
            return Err(Error::InvalidGeometry(format!(
                "brick {:?} exceeds world dimension {}",
                self, world_dim
            )));
        }
        Ok(())
    }
}

/// An ordered, validated collection of bricks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "StructureDocument", into = "StructureDocument")
)]
pub struct Structure {
    bricks: Vec<Brick>,
    world_dim: i32,
}

impl Structure {
    /// Creates a structure, rejecting bricks outside the world bounds.
    pub fn new(bricks: Vec<Brick>, world_dim: i32) -> Result<Self> {
        if world_dim < 1 {
            return Err(Error::InvalidGeometry(format!(
                "world dimension must be positive, got {}",
                world_dim
            )));
        }
        for (i, brick) in bricks.iter().enumerate() {
            brick
                .validate(world_dim)
                .map_err(|e| Error::InvalidGeometry(format!("brick #{}: {}", i, e)))?;
        }
        Ok(Self { bricks, world_dim })
    }

    /// Creates a structure in the default world.
    pub fn with_default_world(bricks: Vec<Brick>) -> Result<Self> {
        Self::new(bricks, DEFAULT_WORLD_DIM)
    }

    /// Creates an empty structure.
    pub fn empty(world_dim: i32) -> Self {
        Self {
            bricks: Vec::new(),
            world_dim: world_dim.max(1),
        }
    }

    /// Bricks in input order.
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    /// Side of the cubic world.
    pub fn world_dim(&self) -> i32 {
        self.world_dim
    }

    /// Number of bricks.
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Returns true if there are no bricks.
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Highest occupied layer, if any.
    pub fn height(&self) -> Option<i32> {
        self.bricks.iter().map(|b| b.z).max()
    }

    /// Builds a new structure holding the bricks whose mask entry is `true`.
    ///
    /// Kept bricks preserve their relative order. The mask must have one entry
    /// per brick.
    pub fn retain_mask(&self, mask: &[bool]) -> Structure {
        debug_assert_eq!(mask.len(), self.bricks.len());
        let bricks = self
            .bricks
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(b, _)| *b)
            .collect();
        Structure {
            bricks,
            world_dim: self.world_dim,
        }
    }

    /// Returns true if every brick of `self` appears in `other` at least as often.
    pub fn is_subset_of(&self, other: &Structure) -> bool {
        let mut remaining = other.bricks.clone();
        self.bricks.iter().all(|b| match remaining.iter().position(|o| o == b) {
            Some(pos) => {
                remaining.swap_remove(pos);
                true
            }
            None => false,
        })
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::empty(DEFAULT_WORLD_DIM)
    }
}

/// Serialized form of a [`Structure`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructureDocument {
    /// Bricks in input order.
    pub bricks: Vec<Brick>,

    /// Side of the cubic world.
    #[cfg_attr(feature = "serde", serde(default = "default_world_dim"))]
    pub world_dim: i32,
}

#[cfg(feature = "serde")]
fn default_world_dim() -> i32 {
    DEFAULT_WORLD_DIM
}

impl TryFrom<StructureDocument> for Structure {
    type Error = Error;

    fn try_from(doc: StructureDocument) -> Result<Self> {
        Structure::new(doc.bricks, doc.world_dim)
    }
}

impl From<Structure> for StructureDocument {
    fn from(structure: Structure) -> Self {
        Self {
            bricks: structure.bricks,
            world_dim: structure.world_dim,
        }
    }
}
