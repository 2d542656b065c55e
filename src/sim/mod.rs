//! Deterministic simulation module
//!
//! All driving logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by insertion index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod obstacles;
pub mod placement;
pub mod powerups;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use collision::{
    COINCIDENT_EPSILON, CollisionResult, ObstacleContact, check_circle_collision, collect_powerups,
    intersects, resolve_obstacle_collision,
};
pub use entity::{EntityTransform, Obstacle, ObstacleKind, Powerup, PowerupKind, WallOrientation};
pub use obstacles::ObstacleManager;
pub use placement::{PlacementGenerator, RngState, Sample, WallSlot, wall_layout};
pub use powerups::PowerupManager;
pub use state::{SimEvent, World};
pub use tick::{ControlInput, tick};
pub use vehicle::{Drifting, Drivable, NitrousCapable, Vehicle, VehicleTelemetry};
