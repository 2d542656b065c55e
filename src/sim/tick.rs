//! Fixed timestep simulation tick
//!
//! Applies one tick of player input, integrates the vehicle and resolves
//! contacts against the level.

use super::state::{SimEvent, World};
use super::vehicle::{Drivable, Drifting, NitrousCapable};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Accelerate forward (wins over `brake`)
    pub throttle: bool,
    /// Brake / reverse
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Held to drift, released to recover
    pub drift: bool,
    /// Burn the held nitrous charge
    pub nitrous: bool,
    /// Put the vehicle back on its spawn point
    pub reset: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &ControlInput, dt: f32) {
    world.events.clear();

    if input.reset {
        world.reset();
    }

    // Drift follows the held state, toggled on edges only
    if input.drift != world.drift_held {
        if input.drift {
            world.vehicle.start_drift();
        } else {
            world.vehicle.stop_drift();
        }
        world.drift_held = input.drift;
    }

    if input.nitrous {
        world.vehicle.activate_nitrous();
    }

    if input.throttle {
        world.vehicle.accelerate_forward();
    } else if input.brake {
        world.vehicle.accelerate_backward();
    }

    let direction = if world.vehicle.velocity() >= 0.0 { 1.0 } else { -1.0 };
    if input.steer_left {
        world.vehicle.turn(dt * direction);
    }
    if input.steer_right {
        world.vehicle.turn(-dt * direction);
    }

    world.vehicle.update(dt);

    world.obstacles.update(dt);
    if let Some(contact) = world.obstacles.handle_collisions(&mut world.vehicle) {
        world.events.push(SimEvent::ObstacleHit {
            index: contact.index,
            kind: contact.kind,
        });
    }

    world.powerups.update(dt);
    for index in world.powerups.handle_collisions(&mut world.vehicle) {
        world.events.push(SimEvent::NitrousCollected { index });
    }

    let vehicle_events = world.vehicle.drain_events();
    world.events.extend(vehicle_events);

    world.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::entity::ObstacleKind;
    use crate::tuning::{PlacementTuning, WorldConfig};
    use glam::Vec3;

    fn world() -> World {
        // Powerups kept clear of the spawn point
        World::new(WorldConfig {
            play_area_size: 100.0,
            tree_count: 0,
            powerup_count: 3,
            placement: PlacementTuning {
                powerup_min_distance_from_center: 5.0,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn throttle() -> ControlInput {
        ControlInput {
            throttle: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_tick_keeps_vehicle_parked() {
        let mut w = world();
        tick(&mut w, &ControlInput::default(), SIM_DT);
        assert_eq!(w.vehicle.velocity(), 0.0);
        assert_eq!(w.vehicle.position(), Vec3::ZERO);
        assert_eq!(w.time_ticks, 1);
        assert!(w.events.is_empty());
    }

    #[test]
    fn test_throttle_moves_vehicle() {
        let mut w = world();
        for _ in 0..60 {
            tick(&mut w, &throttle(), SIM_DT);
        }
        assert!(w.vehicle.velocity() > 0.0);
        assert!(w.vehicle.position().length() > 0.0);
    }

    #[test]
    fn test_throttle_beats_brake() {
        let mut w = world();
        let input = ControlInput {
            throttle: true,
            brake: true,
            ..Default::default()
        };
        tick(&mut w, &input, SIM_DT);
        assert!(w.vehicle.velocity() > 0.0);
    }

    #[test]
    fn test_steering_left_increases_heading() {
        let mut w = world();
        for _ in 0..120 {
            tick(&mut w, &throttle(), SIM_DT);
        }
        let before = w.vehicle.rotation();
        let input = ControlInput {
            throttle: true,
            steer_left: true,
            ..Default::default()
        };
        tick(&mut w, &input, SIM_DT);
        assert!(w.vehicle.rotation() > before);
    }

    #[test]
    fn test_drift_follows_held_input() {
        let mut w = world();
        let held = ControlInput {
            throttle: true,
            drift: true,
            ..Default::default()
        };
        tick(&mut w, &held, SIM_DT);
        assert!(w.vehicle.is_drifting());
        tick(&mut w, &held, SIM_DT);
        assert!(w.vehicle.is_drifting());

        tick(&mut w, &throttle(), SIM_DT);
        assert!(!w.vehicle.is_drifting());
    }

    #[test]
    fn test_nitrous_cycle_emits_events() {
        let mut w = world();
        let target = w.powerups.powerups()[0].transform.position();
        w.vehicle.set_position(Vec3::new(target.x, 0.0, target.z));

        tick(&mut w, &ControlInput::default(), SIM_DT);
        assert_eq!(w.events, vec![SimEvent::NitrousCollected { index: 0 }]);
        assert!(w.vehicle.has_nitrous());

        let boost = ControlInput {
            nitrous: true,
            ..Default::default()
        };
        tick(&mut w, &boost, SIM_DT);
        assert!(w.events.contains(&SimEvent::NitrousActivated));
        assert!(w.vehicle.is_nitrous_active());

        // Burn runs out after its duration
        let ticks = (w.config.vehicle.nitrous_duration / SIM_DT) as usize + 2;
        let mut depleted = false;
        for _ in 0..ticks {
            tick(&mut w, &ControlInput::default(), SIM_DT);
            depleted |= w.events.contains(&SimEvent::NitrousDepleted);
        }
        assert!(depleted);
        assert!(!w.vehicle.is_nitrous_active());
    }

    #[test]
    fn test_wall_hit_reported() {
        let mut w = world();
        let wall = w
            .obstacles
            .obstacles()
            .iter()
            .position(|o| o.kind == ObstacleKind::Wall)
            .expect("walls generated");
        let p = w.obstacles.obstacles()[wall].transform.position();
        w.vehicle.set_position(Vec3::new(p.x, 0.0, p.z));

        tick(&mut w, &ControlInput::default(), SIM_DT);
        assert!(w.events.iter().any(|e| matches!(
            e,
            SimEvent::ObstacleHit {
                kind: ObstacleKind::Wall,
                ..
            }
        )));
        assert_eq!(w.vehicle.velocity(), 0.0);
    }

    #[test]
    fn test_reset_rearms_powerups() {
        let mut w = world();
        let target = w.powerups.powerups()[1].transform.position();
        w.vehicle.set_position(Vec3::new(target.x, 0.0, target.z));
        tick(&mut w, &ControlInput::default(), SIM_DT);
        assert_eq!(w.powerups.active_count(), 2);

        let reset = ControlInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut w, &reset, SIM_DT);
        assert_eq!(w.powerups.active_count(), 3);
        assert!(w.events.contains(&SimEvent::ResetRequested));
        assert!(!w.vehicle.has_nitrous());
        assert_eq!(w.vehicle.position(), Vec3::ZERO);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed and inputs stay identical
        let mut a = World::default();
        let mut b = World::default();

        let inputs = [
            throttle(),
            ControlInput {
                throttle: true,
                steer_left: true,
                ..Default::default()
            },
            ControlInput {
                throttle: true,
                drift: true,
                steer_right: true,
                ..Default::default()
            },
            ControlInput {
                brake: true,
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = inputs[(i / 37) % inputs.len()];
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.vehicle.telemetry(), b.vehicle.telemetry());
        assert_eq!(a.events, b.events);
        assert_eq!(a.time_ticks, b.time_ticks);
    }
}
