//! Bilsim - arcade vehicle simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle dynamics, collisions, level layout)
//! - `tuning`: Data-driven vehicle and placement balance

pub mod sim;
pub mod tuning;

pub use tuning::{GearPolicy, PlacementTuning, VehicleTuning, WorldConfig};

use glam::{Vec2, Vec3};

/// Standard object dimensions, shared between physics and rendering
pub mod consts {
    /// Default simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Vehicle footprint (width, height, length)
    pub const VEHICLE_WIDTH: f32 = 1.0;
    pub const VEHICLE_HEIGHT: f32 = 0.5;
    pub const VEHICLE_LENGTH: f32 = 2.0;

    /// Perimeter wall segments
    pub const WALL_LENGTH: f32 = 5.0;
    pub const WALL_THICKNESS: f32 = 2.0;
    pub const WALL_HEIGHT: f32 = 2.5;

    /// Trees are a square footprint around the trunk
    pub const TREE_COLLISION_RADIUS: f32 = 0.5;
    pub const TREE_HEIGHT: f32 = 6.0;

    /// Nitrous canisters
    pub const POWERUP_SIZE: f32 = 0.8;
    pub const POWERUP_HEIGHT: f32 = 0.4;
    /// Spin speed for pickup feedback (radians per second)
    pub const POWERUP_SPIN_SPEED: f32 = 2.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Project a world position onto the ground (XZ) plane
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Heading (rotation about Y) to a unit direction on the ground plane.
///
/// Rotation 0 faces +Z, π/2 faces +X.
#[inline]
pub fn heading_to_planar(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}
