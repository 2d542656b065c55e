//! Collectible nitrous canisters

use glam::{Vec2, Vec3};

use super::collision::collect_powerups;
use super::entity::{Powerup, PowerupKind};
use super::placement::{PlacementGenerator, RngState};
use super::vehicle::Vehicle;
use crate::consts::*;
use crate::tuning::PlacementTuning;

/// RNG stream reserved for powerup placement
const POWERUP_STREAM: u64 = 2;

/// Owns the level's powerups. They are reactivated on reset, never respawned.
#[derive(Debug, Clone)]
pub struct PowerupManager {
    powerups: Vec<Powerup>,
}

impl PowerupManager {
    /// Place exactly `count` powerups; spacing is best effort.
    pub fn new(count: usize, play_area_size: f32, placement: &PlacementTuning, seed: u64) -> Self {
        let mut generator = PlacementGenerator::new(
            play_area_size,
            placement.powerup_spawn_margin,
            RngState::with_stream(seed, POWERUP_STREAM),
        );

        let mut positions: Vec<Vec2> = Vec::with_capacity(count);
        let mut crowded = 0;
        for _ in 0..count {
            let sample = generator.sample_with_constraints(
                &positions,
                placement.powerup_min_distance_from_center,
                placement.powerup_min_spacing,
                placement.powerup_attempt_budget,
            );
            if !sample.satisfied {
                crowded += 1;
            }
            positions.push(sample.position);
        }

        if crowded > 0 {
            log::warn!("{} of {} powerups placed without full spacing", crowded, count);
        }
        log::info!("Generated {} powerups", count);

        let powerups = positions
            .iter()
            .map(|p| Powerup::new(Vec3::new(p.x, POWERUP_HEIGHT, p.y), PowerupKind::Nitrous))
            .collect();

        Self { powerups }
    }

    /// Spin every powerup
    pub fn update(&mut self, dt: f32) {
        for powerup in &mut self.powerups {
            powerup.update(dt);
        }
    }

    /// Hand out nitrous for every powerup the vehicle touches.
    ///
    /// Returns the indices of the powerups collected this call.
    pub fn handle_collisions(&mut self, vehicle: &mut Vehicle) -> Vec<usize> {
        collect_powerups(vehicle, &mut self.powerups)
    }

    /// Reactivate all powerups
    pub fn reset(&mut self) {
        for powerup in &mut self.powerups {
            powerup.transform.set_active(true);
        }
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.powerups.iter().filter(|p| p.is_active()).count()
    }
}
