//! Shared transform record and the static level entities
//!
//! Every simulated object carries an `EntityTransform`. Collision only looks
//! at the ground plane (XZ); Y is carried for renderers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_angle;

/// Position, heading, footprint and liveness of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTransform {
    position: Vec3,
    initial_position: Vec3,
    /// Heading about Y, radians in [0, 2π)
    rotation: f32,
    initial_rotation: f32,
    /// (width, height, length)
    size: Vec3,
    collision_radius: f32,
    active: bool,
}

impl EntityTransform {
    pub fn new(position: Vec3, rotation: f32, size: Vec3) -> Self {
        let rotation = wrap_angle(rotation);
        Self {
            position,
            initial_position: position,
            rotation,
            initial_rotation: rotation,
            size,
            collision_radius: footprint_radius(size),
            active: true,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.collision_radius
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = wrap_angle(rotation);
    }

    /// Resize the footprint; the collision radius follows
    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
        self.collision_radius = footprint_radius(size);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Restore the constructor transform and re-arm the entity
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.rotation = self.initial_rotation;
        self.active = true;
    }
}

/// Bounding circle of a (width, length) footprint so rotation never matters
#[inline]
fn footprint_radius(size: Vec3) -> f32 {
    let half_width = size.x / 2.0;
    let half_length = size.z / 2.0;
    (half_width * half_width + half_length * half_length).sqrt()
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Tree,
}

/// Which axis a wall segment runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Along X (north/south sides)
    #[default]
    Horizontal,
    /// Along Z (east/west sides)
    Vertical,
}

/// A static obstacle: perimeter wall segment or tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub transform: EntityTransform,
    pub kind: ObstacleKind,
    /// Only meaningful for walls
    pub orientation: WallOrientation,
}

impl Obstacle {
    pub fn wall(position: Vec3, orientation: WallOrientation) -> Self {
        let size = match orientation {
            WallOrientation::Horizontal => Vec3::new(WALL_LENGTH, WALL_HEIGHT, WALL_THICKNESS),
            WallOrientation::Vertical => Vec3::new(WALL_THICKNESS, WALL_HEIGHT, WALL_LENGTH),
        };
        Self {
            transform: EntityTransform::new(position, 0.0, size),
            kind: ObstacleKind::Wall,
            orientation,
        }
    }

    pub fn tree(position: Vec3) -> Self {
        let diameter = TREE_COLLISION_RADIUS * 2.0;
        Self {
            transform: EntityTransform::new(position, 0.0, Vec3::new(diameter, TREE_HEIGHT, diameter)),
            kind: ObstacleKind::Tree,
            orientation: WallOrientation::default(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.transform.is_active()
    }

    pub fn reset(&mut self) {
        self.transform.reset();
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Nitrous,
}

/// A collectible power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub transform: EntityTransform,
    pub kind: PowerupKind,
    /// Spin speed in radians/sec (visual only)
    pub spin_speed: f32,
}

impl Powerup {
    pub fn new(position: Vec3, kind: PowerupKind) -> Self {
        Self {
            transform: EntityTransform::new(position, 0.0, Vec3::splat(POWERUP_SIZE)),
            kind,
            spin_speed: POWERUP_SPIN_SPEED,
        }
    }

    /// Spin for pickup feedback
    pub fn update(&mut self, dt: f32) {
        let rotation = self.transform.rotation() + self.spin_speed * dt;
        self.transform.set_rotation(rotation);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.transform.is_active()
    }

    pub fn reset(&mut self) {
        self.transform.reset();
    }
}
