//! The player's vehicle
//!
//! Arcade physics with an automatic gearbox, speed-dependent steering,
//! logarithmic rolling friction, drift and a single-charge nitrous boost.
//! Everything is integrated in one step per tick; `dt` is trusted.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::EntityTransform;
use super::state::SimEvent;
use crate::consts::*;
use crate::tuning::{GearPolicy, VehicleTuning};
use crate::{heading_to_planar, planar};

/// Throttle and steering commands
pub trait Drivable {
    /// Accelerate using the vehicle's own acceleration multiplier
    fn accelerate_forward(&mut self);
    /// Accelerate with an explicit multiplier for this tick
    fn accelerate_forward_with(&mut self, multiplier: f32);
    fn accelerate_backward(&mut self);
    /// Steer by a signed amount (positive turns toward increasing heading)
    fn turn(&mut self, amount: f32);
}

/// Handbrake-style sliding
pub trait Drifting {
    fn start_drift(&mut self);
    fn stop_drift(&mut self);
    fn is_drifting(&self) -> bool;
    /// Offset between facing and travel direction (radians)
    fn drift_angle(&self) -> f32;
}

/// Single-charge boost
pub trait NitrousCapable {
    /// Burn the held charge. Returns false when there is nothing to burn or a
    /// burn is already running.
    fn activate_nitrous(&mut self) -> bool;
    fn pickup_nitrous(&mut self);
    fn has_nitrous(&self) -> bool;
    fn is_nitrous_active(&self) -> bool;
    fn nitrous_time_remaining(&self) -> f32;
}

/// Read-only snapshot for renderers, audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleTelemetry {
    pub position: Vec3,
    pub rotation: f32,
    pub size: Vec3,
    pub scale: f32,
    pub velocity: f32,
    pub drifting: bool,
    pub drift_angle: f32,
    pub has_nitrous: bool,
    pub nitrous_active: bool,
    pub nitrous_time_remaining: f32,
    pub gear: u8,
    pub rpm: f32,
    pub steering_input: f32,
}

/// The controlled vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    transform: EntityTransform,
    tuning: VehicleTuning,

    /// Signed speed along the heading (forward positive)
    velocity: f32,
    /// Set by throttle commands, consumed by the next `update`
    acceleration: f32,
    steering_input: f32,

    drifting: bool,
    drift_angle: f32,

    has_nitrous: bool,
    nitrous_active: bool,
    nitrous_time_remaining: f32,

    /// 0 = reverse, 1..=N forward
    current_gear: u8,
    rpm: f32,

    scale: f32,
    acceleration_multiplier: f32,

    events: Vec<SimEvent>,
}

impl Vehicle {
    pub fn new(position: Vec3, tuning: VehicleTuning) -> Self {
        let transform = EntityTransform::new(position, tuning.initial_rotation, base_size());
        let mut vehicle = Self {
            transform,
            velocity: 0.0,
            acceleration: 0.0,
            steering_input: 0.0,
            drifting: false,
            drift_angle: 0.0,
            has_nitrous: false,
            nitrous_active: false,
            nitrous_time_remaining: 0.0,
            current_gear: 1,
            rpm: tuning.idle_rpm,
            scale: 1.0,
            acceleration_multiplier: 1.0,
            events: Vec::new(),
            tuning,
        };
        vehicle.set_scale(vehicle.tuning.default_scale);
        vehicle
    }

    /// Advance the vehicle by one tick
    pub fn update(&mut self, dt: f32) {
        self.update_nitrous(dt);
        self.update_gear();
        self.update_velocity(dt);
        self.update_rpm();
        self.update_drift();
        self.update_position(dt);
        self.settle_controls();
    }

    /// Back to the spawn transform with a cold engine.
    ///
    /// Queues `SimEvent::ResetRequested` so cameras and managers can follow.
    pub fn reset(&mut self) {
        self.transform.reset();
        self.velocity = 0.0;
        self.acceleration = 0.0;
        self.steering_input = 0.0;
        self.drifting = false;
        self.drift_angle = 0.0;
        self.has_nitrous = false;
        self.nitrous_active = false;
        self.nitrous_time_remaining = 0.0;
        self.current_gear = 1;
        self.rpm = self.tuning.idle_rpm;
        self.events.push(SimEvent::ResetRequested);
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    #[inline]
    pub fn transform(&self) -> &EntityTransform {
        &self.transform
    }

    #[inline]
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.transform.size()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn current_gear(&self) -> u8 {
        self.current_gear
    }

    #[inline]
    pub fn rpm(&self) -> f32 {
        self.rpm
    }

    #[inline]
    pub fn steering_input(&self) -> f32 {
        self.steering_input
    }

    #[inline]
    pub fn acceleration_multiplier(&self) -> f32 {
        self.acceleration_multiplier
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.tuning.max_speed
    }

    /// Top speed right now (raised while nitrous burns)
    pub fn current_max_speed(&self) -> f32 {
        if self.nitrous_active {
            self.tuning.nitrous_max_speed
        } else {
            self.tuning.max_speed
        }
    }

    pub fn telemetry(&self) -> VehicleTelemetry {
        VehicleTelemetry {
            position: self.position(),
            rotation: self.rotation(),
            size: self.size(),
            scale: self.scale,
            velocity: self.velocity,
            drifting: self.drifting,
            drift_angle: self.drift_angle,
            has_nitrous: self.has_nitrous,
            nitrous_active: self.nitrous_active,
            nitrous_time_remaining: self.nitrous_time_remaining,
            gear: self.current_gear,
            rpm: self.rpm,
            steering_input: self.steering_input,
        }
    }

    /// Steering responsiveness (0..=1) at a given absolute speed
    pub fn turn_rate(&self, speed: f32) -> f32 {
        let t = &self.tuning;
        let [creep, slow, cruise, peak] = t.turn_rate_points;

        if speed < t.min_speed_threshold {
            0.0
        } else if speed < t.turn_rate_min_speed {
            lerp_band(speed, t.min_speed_threshold, t.turn_rate_min_speed, creep, slow)
        } else if speed < t.turn_rate_low_speed {
            lerp_band(speed, t.turn_rate_min_speed, t.turn_rate_low_speed, slow, cruise)
        } else if speed < t.turn_rate_medium_speed {
            lerp_band(speed, t.turn_rate_low_speed, t.turn_rate_medium_speed, cruise, peak)
        } else {
            // Less responsive at high speed
            let rate = lerp_band(speed, t.turn_rate_medium_speed, t.max_speed, peak, t.turn_rate_at_max_speed);
            let lo = peak.min(t.turn_rate_at_max_speed);
            let hi = peak.max(t.turn_rate_at_max_speed);
            rate.max(lo).min(hi)
        }
    }

    // === Setters ===

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    /// Overwrite speed (collision response); kept inside the speed envelope
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity
            .max(-self.tuning.max_reverse_speed)
            .min(self.current_max_speed());
    }

    /// Scale the body; the collision footprint follows
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(self.tuning.min_scale).max(f32::EPSILON);
        self.transform.set_size(base_size() * self.scale);
    }

    pub fn set_acceleration_multiplier(&mut self, multiplier: f32) {
        self.acceleration_multiplier = multiplier
            .max(self.tuning.min_acceleration_multiplier)
            .min(self.tuning.max_acceleration_multiplier);
    }

    // === Tick stages ===

    fn update_nitrous(&mut self, dt: f32) {
        if self.nitrous_active {
            self.nitrous_time_remaining -= dt;
            if self.nitrous_time_remaining <= TIMER_EPSILON {
                self.nitrous_active = false;
                self.nitrous_time_remaining = 0.0;
                log::debug!("Nitrous depleted");
                self.events.push(SimEvent::NitrousDepleted);
            }
        }
    }

    fn update_gear(&mut self) {
        let t = &self.tuning;
        let speed = self.velocity.abs();

        if self.velocity < 0.0 {
            self.current_gear = 0;
            return;
        }
        if speed < t.min_speed_threshold {
            self.current_gear = 1;
            return;
        }

        let top = t.num_gears().max(1);
        self.current_gear = match t.gear_policy {
            GearPolicy::Stateless => (1..=top).find(|&g| speed < t.gear_band(g).1).unwrap_or(top),
            GearPolicy::Hysteresis => {
                let mut gear = self.current_gear.clamp(1, top);
                while gear < top && speed >= t.gear_band(gear).1 {
                    gear += 1;
                }
                while gear > 1 && speed < t.gear_band(gear).0 - t.gear_downshift_margin {
                    gear -= 1;
                }
                gear
            }
        };
    }

    fn update_velocity(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.velocity *= self.friction();
        self.velocity = self
            .velocity
            .max(-self.tuning.max_reverse_speed)
            .min(self.current_max_speed());
    }

    /// Per-tick friction multiplier.
    ///
    /// Rolling friction eases off logarithmically with speed; drifting uses
    /// a flat, stickier coefficient.
    fn friction(&self) -> f32 {
        let t = &self.tuning;
        if self.drifting {
            return t.drift_friction_coefficient;
        }

        let ratio = (self.velocity.abs() / t.max_speed).max(t.friction_min_ratio).min(1.0);
        let curve = t.friction_base
            + ((ratio.ln() + t.friction_log_offset) / t.friction_log_offset)
                * (t.friction_coefficient - t.friction_base);
        curve.max(t.friction_base).min(t.friction_coefficient)
    }

    fn update_rpm(&mut self) {
        let t = &self.tuning;
        let speed = self.velocity.abs();
        if speed < t.min_speed_threshold {
            self.rpm = t.idle_rpm;
            return;
        }

        let (low, high) = t.gear_band(self.current_gear);
        let fraction = if high > low {
            ((speed - low) / (high - low)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.rpm = t.gear_shift_down_rpm + fraction * (t.max_rpm - t.gear_shift_down_rpm);
    }

    fn update_drift(&mut self) {
        if self.drifting {
            self.drift_angle *= self.tuning.drift_decay_rate;
        }
    }

    fn update_position(&mut self, dt: f32) {
        // Car slides at an angle while drifting
        let heading = if self.drifting {
            self.rotation() - self.drift_angle
        } else {
            self.rotation()
        };

        let step = heading_to_planar(heading) * self.velocity * dt;
        let pos = self.position();
        let ground = planar(pos) + step;
        self.transform.set_position(Vec3::new(ground.x, pos.y, ground.y));
    }

    fn settle_controls(&mut self) {
        self.acceleration = 0.0;

        // Steering wheel returns to center
        self.steering_input *= self.tuning.steering_decay_rate;
        if self.steering_input.abs() < self.tuning.steering_zero_threshold {
            self.steering_input = 0.0;
        }
    }
}

impl Drivable for Vehicle {
    fn accelerate_forward(&mut self) {
        self.accelerate_forward_with(self.acceleration_multiplier);
    }

    fn accelerate_forward_with(&mut self, multiplier: f32) {
        let base = if self.nitrous_active {
            self.tuning.nitrous_acceleration
        } else {
            self.tuning.forward_acceleration
        };
        self.acceleration =
            base * self.tuning.gear_acceleration_multiplier(self.current_gear) * multiplier;
    }

    fn accelerate_backward(&mut self) {
        self.acceleration = self.tuning.backward_acceleration;
    }

    fn turn(&mut self, amount: f32) {
        self.steering_input = amount;

        let rate = self.turn_rate(self.velocity.abs());
        // Steering inverts in reverse
        let direction = if self.velocity >= 0.0 { 1.0 } else { -1.0 };
        let delta = amount * self.tuning.turn_speed * rate * direction;

        self.transform.set_rotation(self.rotation() + delta);

        if self.drifting {
            let max = self.tuning.drift_angle_max.abs();
            self.drift_angle = (self.drift_angle + delta * self.tuning.drift_angle_multiplier)
                .max(-max)
                .min(max);
        }
    }
}

impl Drifting for Vehicle {
    fn start_drift(&mut self) {
        self.drifting = true;
    }

    fn stop_drift(&mut self) {
        self.drifting = false;
        self.drift_angle *= self.tuning.drift_exit_retention;
    }

    fn is_drifting(&self) -> bool {
        self.drifting
    }

    fn drift_angle(&self) -> f32 {
        self.drift_angle
    }
}

impl NitrousCapable for Vehicle {
    fn activate_nitrous(&mut self) -> bool {
        if !self.has_nitrous || self.nitrous_active {
            return false;
        }
        self.has_nitrous = false;
        self.nitrous_active = true;
        self.nitrous_time_remaining = self.tuning.nitrous_duration;
        log::debug!("Nitrous activated for {:.1}s", self.nitrous_time_remaining);
        self.events.push(SimEvent::NitrousActivated);
        true
    }

    fn pickup_nitrous(&mut self) {
        // One charge at a time; a running burn is not topped up
        if !self.nitrous_active {
            self.has_nitrous = true;
        }
    }

    fn has_nitrous(&self) -> bool {
        self.has_nitrous
    }

    fn is_nitrous_active(&self) -> bool {
        self.nitrous_active
    }

    fn nitrous_time_remaining(&self) -> f32 {
        self.nitrous_time_remaining
    }
}

/// Timers within this many seconds of zero have expired (absorbs f32
/// accumulation error over many small ticks)
const TIMER_EPSILON: f32 = 1e-4;

/// Unscaled vehicle footprint
fn base_size() -> Vec3 {
    Vec3::new(VEHICLE_WIDTH, VEHICLE_HEIGHT, VEHICLE_LENGTH)
}

/// Linear ramp from `y0` at `x0` to `y1` at `x1`
#[inline]
fn lerp_band(x: f32, x0: f32, x1: f32, y0: f32, y1: f32) -> f32 {
    let span = x1 - x0;
    if span <= 0.0 {
        return y1;
    }
    y0 + (x - x0) / span * (y1 - y0)
}
