//! Bilsim entry point
//!
//! Headless demo: builds a level, drives a scripted lap and logs telemetry.
//! Run with `RUST_LOG=info` (or `debug` for contacts).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bilsim::WorldConfig;
    use bilsim::consts::SIM_DT;
    use bilsim::sim::{SimEvent, World, tick};

    env_logger::init();

    let mut config = WorldConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        match parse_seed(&arg) {
            Some(seed) => config.seed = seed,
            None => log::warn!("Ignoring unparsable seed {:?}", arg),
        }
    }

    log::info!("Bilsim (native) starting with seed {:#x}", config.seed);
    let mut world = World::new(config);

    const LAP_SECONDS: f32 = 30.0;
    let total_ticks = (LAP_SECONDS / SIM_DT) as u64;
    let ticks_per_second = (1.0 / SIM_DT).round() as u64;

    let mut hits = 0;
    let mut pickups = 0;
    for t in 0..total_ticks {
        let input = scripted_input(t as f32 * SIM_DT);
        tick(&mut world, &input, SIM_DT);

        for event in &world.events {
            match event {
                SimEvent::ObstacleHit { index, kind } => {
                    hits += 1;
                    log::info!("Hit {:?} #{} at tick {}", kind, index, world.time_ticks);
                }
                SimEvent::NitrousCollected { index } => {
                    pickups += 1;
                    log::info!("Collected nitrous #{} at tick {}", index, world.time_ticks);
                }
                other => log::info!("{:?} at tick {}", other, world.time_ticks),
            }
        }

        if world.time_ticks % ticks_per_second == 0 {
            let telemetry = world.vehicle.telemetry();
            log::info!(
                "t={:>4.1}s pos=({:>6.1}, {:>6.1}) v={:>5.1} m/s gear={} rpm={:>4.0} drift={} nitrous={}",
                world.elapsed(SIM_DT),
                telemetry.position.x,
                telemetry.position.z,
                telemetry.velocity,
                telemetry.gear,
                telemetry.rpm,
                telemetry.drifting,
                telemetry.nitrous_active,
            );
        }
    }

    match serde_json::to_string_pretty(&world.vehicle.telemetry()) {
        Ok(json) => log::info!("Final telemetry:\n{}", json),
        Err(e) => log::error!("Failed to serialize telemetry: {}", e),
    }
    log::info!(
        "Lap done: {} obstacle hits, {} powerups collected, {} still active",
        hits,
        pickups,
        world.powerups.active_count()
    );

    /// Accepts decimal or `0x`-prefixed hex
    fn parse_seed(arg: &str) -> Option<u64> {
        match arg.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => arg.parse().ok(),
        }
    }

    /// A loose lap: straight, a drifting curve, a nitrous burst, a reverse
    /// and a reset.
    fn scripted_input(time: f32) -> bilsim::sim::ControlInput {
        let mut input = bilsim::sim::ControlInput::default();
        match time {
            t if t < 4.0 => input.throttle = true,
            t if t < 8.0 => {
                input.throttle = true;
                input.steer_left = true;
            }
            t if t < 11.0 => {
                input.throttle = true;
                input.steer_right = true;
                input.drift = true;
            }
            t if t < 16.0 => {
                input.throttle = true;
                input.nitrous = true;
            }
            t if t < 20.0 => input.brake = true,
            t if t < 22.0 => {
                input.brake = true;
                input.steer_left = true;
            }
            t if t < 22.0 + 1.0 / 60.0 => input.reset = true,
            _ => {
                input.throttle = true;
                input.steer_right = true;
            }
        }
        input
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host on the web; nothing to run here
}
