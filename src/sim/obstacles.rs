//! Static obstacles: perimeter walls plus scattered trees

use glam::Vec3;

use super::collision::{ObstacleContact, resolve_obstacle_collision};
use super::entity::{Obstacle, ObstacleKind};
use super::placement::{PlacementGenerator, RngState, wall_layout};
use super::vehicle::Vehicle;
use crate::consts::*;
use crate::tuning::PlacementTuning;

/// RNG stream reserved for tree placement
const TREE_STREAM: u64 = 1;

/// Owns every obstacle in the level
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
}

impl ObstacleManager {
    /// Walls around the perimeter, then up to `tree_count` spaced trees.
    pub fn new(play_area_size: f32, tree_count: usize, placement: &PlacementTuning, seed: u64) -> Self {
        let walls = wall_layout(play_area_size, placement.wall_segment_length);
        let mut obstacles = Vec::with_capacity(walls.len() + tree_count);

        obstacles.extend(
            walls
                .iter()
                .map(|slot| Obstacle::wall(Vec3::new(slot.position.x, WALL_HEIGHT, slot.position.y), slot.orientation)),
        );

        let mut generator = PlacementGenerator::new(
            play_area_size,
            placement.tree_wall_margin,
            RngState::with_stream(seed, TREE_STREAM),
        );
        let budget = (tree_count as u32).saturating_mul(placement.tree_attempts_per_tree);
        let trees = generator.place_spaced(
            tree_count,
            placement.tree_min_distance_from_center,
            placement.tree_min_spacing,
            budget,
        );

        if trees.len() < tree_count {
            log::warn!(
                "Only placed {} of {} trees in a {}m play area",
                trees.len(),
                tree_count,
                play_area_size
            );
        }
        obstacles.extend(trees.iter().map(|p| Obstacle::tree(Vec3::new(p.x, 0.0, p.y))));

        log::info!(
            "Generated {} wall segments and {} trees",
            walls.len(),
            trees.len()
        );

        Self { obstacles }
    }

    /// Obstacles are static
    pub fn update(&mut self, _dt: f32) {}

    /// Resolve the first obstacle the vehicle overlaps
    pub fn handle_collisions(&self, vehicle: &mut Vehicle) -> Option<ObstacleContact> {
        resolve_obstacle_collision(vehicle, &self.obstacles)
    }

    /// Re-arm every obstacle; the layout itself never changes
    pub fn reset(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.reset();
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn wall_count(&self) -> usize {
        self.count_kind(ObstacleKind::Wall)
    }

    pub fn tree_count(&self) -> usize {
        self.count_kind(ObstacleKind::Tree)
    }

    fn count_kind(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind == kind).count()
    }
}
