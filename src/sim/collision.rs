//! Collision detection and response on the ground plane
//!
//! Every entity is approximated by its bounding circle in XZ. Obstacles push
//! the vehicle out and stop it; powerups are picked up without any
//! positional correction.

use glam::{Vec2, Vec3};

use super::entity::{EntityTransform, Obstacle, ObstacleKind, Powerup};
use super::vehicle::{NitrousCapable, Vehicle};
use crate::planar;

/// Centers closer than this are treated as coincident
pub const COINCIDENT_EPSILON: f32 = 0.001;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Normal in XZ pointing from the first entity toward the second
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub overlap: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            overlap: 0.0,
        }
    }
}

/// Circle-vs-circle test between two entities on the ground plane
///
/// Coincident centers report the full combined radius as overlap with a
/// fixed +X normal.
pub fn check_circle_collision(a: &EntityTransform, b: &EntityTransform) -> CollisionResult {
    let combined_radius = a.collision_radius() + b.collision_radius();
    let delta = planar(b.position()) - planar(a.position());
    let dist_sq = delta.length_squared();

    // Early out before the sqrt
    if dist_sq > combined_radius * combined_radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist <= COINCIDENT_EPSILON {
        return CollisionResult {
            hit: true,
            normal: Vec2::X,
            overlap: combined_radius,
        };
    }

    CollisionResult {
        hit: true,
        normal: delta / dist,
        overlap: combined_radius - dist,
    }
}

/// Quick overlap check
#[inline]
pub fn intersects(a: &EntityTransform, b: &EntityTransform) -> bool {
    check_circle_collision(a, b).hit
}

/// A resolved vehicle/obstacle contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleContact {
    /// Index into the obstacle slice
    pub index: usize,
    pub kind: ObstacleKind,
    pub normal: Vec2,
    pub overlap: f32,
}

/// Push the vehicle out of the first obstacle it overlaps and stop it
///
/// Only one contact is resolved per call, in obstacle order.
pub fn resolve_obstacle_collision(
    vehicle: &mut Vehicle,
    obstacles: &[Obstacle],
) -> Option<ObstacleContact> {
    let (index, obstacle, result) = obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_active())
        .map(|(i, o)| (i, o, check_circle_collision(vehicle.transform(), &o.transform)))
        .find(|(_, _, r)| r.hit)?;

    let correction = result.normal * result.overlap;
    let pos = vehicle.position();
    vehicle.set_position(Vec3::new(pos.x - correction.x, pos.y, pos.z - correction.y));
    vehicle.set_velocity(0.0);

    log::debug!(
        "Vehicle hit {:?} #{} (overlap {:.3})",
        obstacle.kind,
        index,
        result.overlap
    );

    Some(ObstacleContact {
        index,
        kind: obstacle.kind,
        normal: result.normal,
        overlap: result.overlap,
    })
}

/// Hand nitrous charges to the vehicle from any powerups it touches
///
/// Returns the indices of collected powerups. A vehicle already holding or
/// burning nitrous collects nothing.
pub fn collect_powerups(vehicle: &mut Vehicle, powerups: &mut [Powerup]) -> Vec<usize> {
    let mut collected = Vec::new();
    for (index, powerup) in powerups.iter_mut().enumerate() {
        if powerup.is_active()
            && !vehicle.has_nitrous()
            && !vehicle.is_nitrous_active()
            && intersects(vehicle.transform(), &powerup.transform)
        {
            vehicle.pickup_nitrous();
            powerup.transform.set_active(false);
            log::debug!("Nitrous collected from powerup #{}", index);
            collected.push(index);
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{PowerupKind, WallOrientation};
    use crate::tuning::VehicleTuning;
    use proptest::prelude::*;

    fn disc(x: f32, z: f32, radius: f32) -> EntityTransform {
        // Square footprint of side s has radius s/√2
        let side = radius * std::f32::consts::SQRT_2;
        EntityTransform::new(Vec3::new(x, 0.0, z), 0.0, Vec3::new(side, 1.0, side))
    }

    #[test]
    fn test_overlapping_circles() {
        let a = disc(0.0, 0.0, 1.0);
        let b = disc(1.5, 0.0, 1.0);
        let result = check_circle_collision(&a, &b);
        assert!(result.hit);
        assert!((result.overlap - 0.5).abs() < 1e-4);
        assert!((result.normal - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_separated_circles_miss() {
        let a = disc(0.0, 0.0, 1.0);
        let b = disc(0.0, 2.1, 1.0);
        assert!(!check_circle_collision(&a, &b).hit);
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn test_height_is_ignored() {
        let a = disc(0.0, 0.0, 1.0);
        let mut b = disc(0.5, 0.0, 1.0);
        b.set_position(Vec3::new(0.5, 100.0, 0.0));
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_coincident_centers_tie_break() {
        let a = disc(3.0, -2.0, 1.0);
        let b = disc(3.0, -2.0, 0.5);
        let result = check_circle_collision(&a, &b);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.overlap - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_pushes_out_and_stops() {
        let tuning = VehicleTuning::default();
        let mut vehicle = Vehicle::new(Vec3::ZERO, tuning);
        vehicle.set_velocity(10.0);

        let tree = Obstacle::tree(Vec3::new(1.0, 0.0, 0.0));
        let contact = resolve_obstacle_collision(&mut vehicle, std::slice::from_ref(&tree))
            .expect("vehicle overlaps the tree");

        assert_eq!(contact.index, 0);
        assert_eq!(contact.kind, ObstacleKind::Tree);
        assert_eq!(vehicle.velocity(), 0.0);
        // Pushed away from the tree, exactly out of penetration
        assert!(vehicle.position().x < 0.0);
        let after = check_circle_collision(vehicle.transform(), &tree.transform);
        assert!(!after.hit || after.overlap < 1e-4);
    }

    #[test]
    fn test_only_first_obstacle_resolved() {
        let mut vehicle = Vehicle::new(Vec3::ZERO, VehicleTuning::default());
        let obstacles = vec![
            Obstacle::tree(Vec3::new(0.5, 0.0, 0.0)),
            Obstacle::tree(Vec3::new(-0.5, 0.0, 0.0)),
        ];
        let contact = resolve_obstacle_collision(&mut vehicle, &obstacles).unwrap();
        assert_eq!(contact.index, 0);
        // Correction came from the first tree alone
        let expected_x = -contact.overlap;
        assert!((vehicle.position().x - expected_x).abs() < 1e-5);
    }

    #[test]
    fn test_inactive_obstacles_are_skipped() {
        let mut vehicle = Vehicle::new(Vec3::ZERO, VehicleTuning::default());
        let mut wall = Obstacle::wall(Vec3::ZERO, WallOrientation::Horizontal);
        wall.transform.set_active(false);
        vehicle.set_velocity(5.0);
        assert!(resolve_obstacle_collision(&mut vehicle, &[wall]).is_none());
        assert_eq!(vehicle.velocity(), 5.0);
    }

    #[test]
    fn test_powerup_pickup_only_when_eligible() {
        let mut vehicle = Vehicle::new(Vec3::ZERO, VehicleTuning::default());
        let mut powerups = vec![
            Powerup::new(Vec3::new(0.0, POWERUP_HEIGHT, 0.0), PowerupKind::Nitrous),
            Powerup::new(Vec3::new(0.2, POWERUP_HEIGHT, 0.0), PowerupKind::Nitrous),
        ];

        let collected = collect_powerups(&mut vehicle, &mut powerups);
        // Holding a charge blocks the second pickup
        assert_eq!(collected, vec![0]);
        assert!(vehicle.has_nitrous());
        assert!(!powerups[0].is_active());
        assert!(powerups[1].is_active());

        let pos_before = vehicle.position();
        assert!(collect_powerups(&mut vehicle, &mut powerups).is_empty());
        assert_eq!(vehicle.position(), pos_before);
    }

    #[test]
    fn test_multiple_powerups_when_eligible_again() {
        let mut vehicle = Vehicle::new(Vec3::ZERO, VehicleTuning::default());
        let mut powerups = vec![Powerup::new(Vec3::ZERO, PowerupKind::Nitrous)];
        assert_eq!(collect_powerups(&mut vehicle, &mut powerups), vec![0]);

        // Inactive powerups are never collected, even by an eligible vehicle
        vehicle.reset();
        assert!(collect_powerups(&mut vehicle, &mut powerups).is_empty());
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -50.0f32..50.0, az in -50.0f32..50.0, ar in 0.1f32..5.0,
            bx in -50.0f32..50.0, bz in -50.0f32..50.0, br in 0.1f32..5.0,
        ) {
            let a = disc(ax, az, ar);
            let b = disc(bx, bz, br);
            let ab = check_circle_collision(&a, &b);
            let ba = check_circle_collision(&b, &a);
            prop_assert_eq!(ab.hit, ba.hit);
            if ab.hit && ab.normal != Vec2::X {
                prop_assert!((ab.normal + ba.normal).length() < 1e-3);
            }
        }

        #[test]
        fn prop_no_hit_beyond_combined_radius(
            ax in -50.0f32..50.0, az in -50.0f32..50.0, ar in 0.1f32..5.0,
            br in 0.1f32..5.0, angle in 0.0f32..std::f32::consts::TAU, gap in 0.01f32..20.0,
        ) {
            let a = disc(ax, az, ar);
            let b_probe = disc(0.0, 0.0, br);
            let dist = a.collision_radius() + b_probe.collision_radius() + gap;
            let b = disc(ax + angle.cos() * dist, az + angle.sin() * dist, br);
            prop_assert!(!intersects(&a, &b));
        }
    }
}
