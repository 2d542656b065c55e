//! Procedural placement of level content
//!
//! Trees and powerups come from seeded rejection sampling inside the square
//! play area; perimeter walls are tiled deterministically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::WallOrientation;

/// Seed plus stream selector, so each content layer draws from its own
/// reproducible sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        // Golden ratio hash decorrelates neighbouring streams
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Outcome of a constrained draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Vec2,
    /// False when the attempt budget ran out and `position` ignores the
    /// constraints
    pub satisfied: bool,
}

/// Uniform sampler over the play area minus a boundary margin
#[derive(Debug, Clone)]
pub struct PlacementGenerator {
    rng: Pcg32,
    /// Samples fall in [-half_extent, half_extent) on both axes
    half_extent: f32,
}

impl PlacementGenerator {
    pub fn new(play_area_size: f32, margin: f32, rng: RngState) -> Self {
        Self {
            rng: rng.to_rng(),
            half_extent: (play_area_size / 2.0 - margin).max(0.0),
        }
    }

    /// Half side length of the sampling square
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Draw one unconstrained point
    pub fn sample(&mut self) -> Vec2 {
        if self.half_extent <= 0.0 {
            return Vec2::ZERO;
        }
        let h = self.half_extent;
        let x = self.rng.random_range(-h..h);
        let z = self.rng.random_range(-h..h);
        Vec2::new(x, z)
    }

    /// Rejection-sample a point clear of the origin and of `existing`
    ///
    /// After `attempt_budget` rejections a fresh unconstrained point is
    /// returned anyway, flagged as unsatisfied.
    pub fn sample_with_constraints(
        &mut self,
        existing: &[Vec2],
        min_distance_from_center: f32,
        min_distance_from_others: f32,
        attempt_budget: u32,
    ) -> Sample {
        for _ in 0..attempt_budget {
            let position = self.sample();
            if is_clear(position, existing, min_distance_from_center, min_distance_from_others) {
                return Sample {
                    position,
                    satisfied: true,
                };
            }
        }

        Sample {
            position: self.sample(),
            satisfied: false,
        }
    }

    /// Place up to `count` mutually spaced points within a shared attempt
    /// budget. Tight spaces silently yield fewer points.
    pub fn place_spaced(
        &mut self,
        count: usize,
        min_distance_from_center: f32,
        min_distance_from_others: f32,
        attempt_budget: u32,
    ) -> Vec<Vec2> {
        let mut placed = Vec::with_capacity(count);
        let mut attempts = 0;

        while placed.len() < count && attempts < attempt_budget {
            attempts += 1;
            let position = self.sample();
            if is_clear(position, &placed, min_distance_from_center, min_distance_from_others) {
                placed.push(position);
            }
        }

        placed
    }
}

fn is_clear(position: Vec2, existing: &[Vec2], min_from_center: f32, min_from_others: f32) -> bool {
    position.length() >= min_from_center
        && existing
            .iter()
            .all(|other| position.distance(*other) >= min_from_others)
}

/// One perimeter wall segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSlot {
    /// Center on the ground plane
    pub position: Vec2,
    pub orientation: WallOrientation,
}

/// Tile the square perimeter with fixed-length wall segments.
///
/// Each side gets `floor(size / segment_length)` segments laid from the
/// negative corner; north/south run along X, east/west along Z.
pub fn wall_layout(play_area_size: f32, segment_length: f32) -> Vec<WallSlot> {
    if segment_length <= 0.0 || play_area_size <= 0.0 {
        return Vec::new();
    }

    let half = play_area_size / 2.0;
    let per_side = (play_area_size / segment_length).floor() as usize;
    let mut slots = Vec::with_capacity(per_side * 4);

    for i in 0..per_side {
        let offset = -half + i as f32 * segment_length + segment_length / 2.0;
        slots.push(WallSlot {
            position: Vec2::new(offset, -half),
            orientation: WallOrientation::Horizontal,
        });
        slots.push(WallSlot {
            position: Vec2::new(offset, half),
            orientation: WallOrientation::Horizontal,
        });
        slots.push(WallSlot {
            position: Vec2::new(-half, offset),
            orientation: WallOrientation::Vertical,
        });
        slots.push(WallSlot {
            position: Vec2::new(half, offset),
            orientation: WallOrientation::Vertical,
        });
    }

    slots
}
