//! Data-driven vehicle and placement balance
//!
//! One explicit, versioned configuration per concern. Every field has a
//! default so partial JSON documents load cleanly.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the automatic transmission picks a gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GearPolicy {
    /// Gear is a pure function of current speed
    Stateless,
    /// Shift up at the current band's upper bound, shift down only once speed
    /// falls a margin below the band's lower bound
    #[default]
    Hysteresis,
}

/// Vehicle physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Schema version of this tuning set
    pub version: u32,

    // === Speed and acceleration (m/s, m/s²) ===
    pub max_speed: f32,
    pub max_reverse_speed: f32,
    pub forward_acceleration: f32,
    pub backward_acceleration: f32,
    /// Below this speed the vehicle neither steers nor revs
    pub min_speed_threshold: f32,

    // === Friction curve ===
    /// Per-tick multiplier at top speed
    pub friction_coefficient: f32,
    /// Per-tick multiplier near standstill
    pub friction_base: f32,
    pub friction_log_offset: f32,
    pub friction_min_ratio: f32,
    pub drift_friction_coefficient: f32,

    // === Steering ===
    pub turn_speed: f32,
    pub steering_decay_rate: f32,
    pub steering_zero_threshold: f32,
    /// Speed breakpoints between turn-rate bands
    pub turn_rate_min_speed: f32,
    pub turn_rate_low_speed: f32,
    pub turn_rate_medium_speed: f32,
    /// Turn rate at each breakpoint: [min_threshold, min, low, medium]
    pub turn_rate_points: [f32; 4],
    /// Turn rate reached at `max_speed`
    pub turn_rate_at_max_speed: f32,

    // === Drift ===
    pub drift_angle_max: f32,
    pub drift_angle_multiplier: f32,
    pub drift_exit_retention: f32,
    pub drift_decay_rate: f32,

    // === Nitrous ===
    pub nitrous_duration: f32,
    pub nitrous_acceleration: f32,
    pub nitrous_max_speed: f32,

    // === Transmission ===
    pub gear_policy: GearPolicy,
    /// Band edges: gear `k` covers `[gear_speeds[k-1], gear_speeds[k])`
    pub gear_speeds: Vec<f32>,
    /// Torque multiplier per forward gear (index 0 is first gear)
    pub gear_acceleration_multipliers: Vec<f32>,
    /// Downshift margin below a band's lower edge (hysteresis policy only)
    pub gear_downshift_margin: f32,
    pub idle_rpm: f32,
    pub gear_shift_down_rpm: f32,
    pub max_rpm: f32,

    // === Body ===
    pub initial_rotation: f32,
    pub default_scale: f32,
    pub min_scale: f32,
    pub min_acceleration_multiplier: f32,
    pub max_acceleration_multiplier: f32,
}

impl VehicleTuning {
    /// Current tuning schema version
    pub const VERSION: u32 = 1;

    /// Number of forward gears
    pub fn num_gears(&self) -> u8 {
        self.gear_acceleration_multipliers
            .len()
            .min(self.gear_speeds.len().saturating_sub(1))
            .min(u8::MAX as usize) as u8
    }

    /// Speed band `[low, high)` covered by a forward gear.
    ///
    /// Reverse (gear 0) shares first gear's band.
    pub fn gear_band(&self, gear: u8) -> (f32, f32) {
        let gear = gear.clamp(1, self.num_gears().max(1)) as usize;
        let low = self.gear_speeds.get(gear - 1).copied().unwrap_or(0.0);
        let high = self.gear_speeds.get(gear).copied().unwrap_or(self.max_speed);
        (low, high)
    }

    /// Torque multiplier for a gear (reverse and unknown gears get 1.0)
    pub fn gear_acceleration_multiplier(&self, gear: u8) -> f32 {
        if gear == 0 {
            return 1.0;
        }
        self.gear_acceleration_multipliers
            .get(gear as usize - 1)
            .copied()
            .unwrap_or(1.0)
    }

    /// Decode a tuning set from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        if tuning.version != Self::VERSION {
            log::warn!(
                "Vehicle tuning version {} differs from supported version {}",
                tuning.version,
                Self::VERSION
            );
        }
        Ok(tuning)
    }

    /// Encode this tuning set as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        use std::f32::consts::PI;
        Self {
            version: Self::VERSION,

            max_speed: 55.56,
            max_reverse_speed: 13.9,
            forward_acceleration: 7.8,
            backward_acceleration: -4.0,
            min_speed_threshold: 0.1,

            friction_coefficient: 0.9982,
            friction_base: 0.994,
            friction_log_offset: 4.6,
            friction_min_ratio: 0.01,
            drift_friction_coefficient: 0.992,

            turn_speed: 1.5,
            steering_decay_rate: 0.85,
            steering_zero_threshold: 0.01,
            turn_rate_min_speed: 0.3,
            turn_rate_low_speed: 3.0,
            turn_rate_medium_speed: 15.0,
            turn_rate_points: [0.05, 0.15, 0.5, 1.0],
            turn_rate_at_max_speed: 0.6,

            drift_angle_max: PI / 3.0,
            drift_angle_multiplier: 1.2,
            drift_exit_retention: 0.5,
            drift_decay_rate: 0.95,

            nitrous_duration: 5.0,
            nitrous_acceleration: 14.0,
            nitrous_max_speed: 69.44,

            gear_policy: GearPolicy::Hysteresis,
            gear_speeds: vec![0.0, 10.0, 20.0, 45.0, 70.0],
            gear_acceleration_multipliers: vec![1.5, 1.2, 1.0, 0.8],
            gear_downshift_margin: 1.0,
            idle_rpm: 1000.0,
            gear_shift_down_rpm: 2500.0,
            max_rpm: 7000.0,

            initial_rotation: PI,
            default_scale: 1.0,
            min_scale: 0.1,
            min_acceleration_multiplier: 0.1,
            max_acceleration_multiplier: 5.0,
        }
    }
}

/// Spacing rules for procedural level content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    pub wall_segment_length: f32,
    /// Trees keep this far from the perimeter
    pub tree_wall_margin: f32,
    /// Trees keep clear of the spawn point
    pub tree_min_distance_from_center: f32,
    pub tree_min_spacing: f32,
    /// Tree attempt budget is `count * tree_attempts_per_tree`
    pub tree_attempts_per_tree: u32,
    pub powerup_spawn_margin: f32,
    pub powerup_min_distance_from_center: f32,
    pub powerup_min_spacing: f32,
    pub powerup_attempt_budget: u32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            wall_segment_length: WALL_LENGTH,
            tree_wall_margin: 5.0,
            tree_min_distance_from_center: 10.0,
            tree_min_spacing: 5.0,
            tree_attempts_per_tree: 20,
            powerup_spawn_margin: 10.0,
            powerup_min_distance_from_center: 0.0,
            powerup_min_spacing: 4.0,
            powerup_attempt_budget: 100,
        }
    }
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Run seed for reproducible layouts
    pub seed: u64,
    /// Side length of the square play area
    pub play_area_size: f32,
    pub tree_count: usize,
    pub powerup_count: usize,
    pub placement: PlacementTuning,
    pub vehicle: VehicleTuning,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            play_area_size: 100.0,
            tree_count: 20,
            powerup_count: 5,
            placement: PlacementTuning::default(),
            vehicle: VehicleTuning::default(),
        }
    }
}

impl WorldConfig {
    /// Decode a world configuration from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Encode this configuration as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
