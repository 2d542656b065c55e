//! World state and simulation events
//!
//! The world owns the vehicle and every level entity. Renderers, audio and
//! HUD read it between ticks; only `tick` mutates it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::ObstacleKind;
use super::obstacles::ObstacleManager;
use super::powerups::PowerupManager;
use super::vehicle::Vehicle;
use crate::tuning::WorldConfig;

/// Something collaborators may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The vehicle was reset (cameras should snap back, powerups re-arm)
    ResetRequested,
    /// The vehicle was stopped by an obstacle
    ObstacleHit { index: usize, kind: ObstacleKind },
    /// A powerup handed over a nitrous charge
    NitrousCollected { index: usize },
    NitrousActivated,
    NitrousDepleted,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: WorldConfig,
    pub vehicle: Vehicle,
    pub obstacles: ObstacleManager,
    pub powerups: PowerupManager,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised during the most recent tick
    pub events: Vec<SimEvent>,
    /// Drift input held on the previous tick (for edge detection)
    pub(crate) drift_held: bool,
}

impl World {
    /// Build a level from the configuration; the vehicle spawns at the center
    pub fn new(config: WorldConfig) -> Self {
        let obstacles = ObstacleManager::new(
            config.play_area_size,
            config.tree_count,
            &config.placement,
            config.seed,
        );
        let powerups = PowerupManager::new(
            config.powerup_count,
            config.play_area_size,
            &config.placement,
            config.seed,
        );
        let vehicle = Vehicle::new(Vec3::ZERO, config.vehicle.clone());

        log::info!(
            "World ready: seed {:#x}, {}m area, {} obstacles, {} powerups",
            config.seed,
            config.play_area_size,
            obstacles.len(),
            powerups.len()
        );

        Self {
            config,
            vehicle,
            obstacles,
            powerups,
            time_ticks: 0,
            events: Vec::new(),
            drift_held: false,
        }
    }

    /// Reset the vehicle and re-arm the level
    pub fn reset(&mut self) {
        self.vehicle.reset();
        self.powerups.reset();
        self.obstacles.reset();
        self.drift_held = false;
    }

    /// Seconds of simulated time at a fixed timestep
    pub fn elapsed(&self, dt: f32) -> f32 {
        self.time_ticks as f32 * dt
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_builds_from_config() {
        let config = WorldConfig {
            play_area_size: 60.0,
            tree_count: 4,
            powerup_count: 3,
            ..Default::default()
        };
        let world = World::new(config);
        assert_eq!(world.powerups.len(), 3);
        assert_eq!(world.obstacles.wall_count(), 48);
        assert_eq!(world.vehicle.position(), Vec3::ZERO);
        assert!(world.events.is_empty());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::default();
        let b = World::default();
        let pos = |w: &World| -> Vec<Vec3> {
            w.powerups
                .powerups()
                .iter()
                .map(|p| p.transform.position())
                .chain(w.obstacles.obstacles().iter().map(|o| o.transform.position()))
                .collect()
        };
        assert_eq!(pos(&a), pos(&b));
    }
}
