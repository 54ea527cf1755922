//! Walk a listener past a pair of walls and print the emitter's parameters
//!
//! Usage: cargo run --bin occlusion_walkthrough [config.json]

use sound_occlusion::prelude::*;
use std::env;
use std::process;
use std::sync::Arc;
use tracing::info;

const FRAME_RATE: f32 = 60.0;
const DURATION_SECS: f32 = 6.0;
const REPORT_EVERY_FRAMES: u32 = 15;

fn main() {
    sound_occlusion::init_logging();

    let config = match env::args().nth(1) {
        Some(path) => match OcclusionConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: Failed to load config '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => OcclusionConfig::default(),
    };
    let config = Arc::new(config);

    let mut world = World::new();
    for x in [8.0, 14.0] {
        world.spawn((
            AABB::default(),
            Transform::from_position(Vec3::new(x, 1.5, 0.0)).with_scale(Vec3::new(0.3, 3.0, 12.0)),
            Occluder::default(),
        ));
    }

    let voice = VoiceHandle::default();
    let emitter = match OcclusionEmitter::new(config.clone(), voice.clone()) {
        Ok(emitter) => emitter,
        Err(e) => {
            eprintln!("ERROR: Invalid occlusion config: {}", e);
            process::exit(1);
        }
    };
    world.spawn((Transform::from_position(Vec3::new(0.0, 1.0, 0.0)), emitter));
    let listener = world.spawn((AudioListener::default(), Transform::default()));

    info!(
        max_distance = config.max_distance,
        "Walking listener from behind two walls into the open"
    );

    let mut accumulator = TickAccumulator::default();
    let frame_time = 1.0 / FRAME_RATE;
    let frames = (DURATION_SECS * FRAME_RATE) as u32;

    println!(
        "{:>6} {:>18} {:>7} {:>9} {:>7}",
        "time", "listener", "gain", "cutoff", "blend"
    );

    for frame in 0..frames {
        let time = frame as f32 * frame_time;
        let position = listener_path(time / DURATION_SECS);
        if let Ok(transform) = world.get_mut::<Transform>(listener) {
            transform.position = position;
        }

        for _ in 0..accumulator.accumulate(frame_time) {
            occlusion_update_system(&mut world);
        }

        if frame % REPORT_EVERY_FRAMES == 0 {
            let params = voice.params();
            println!(
                "{:>5.2}s ({:>5.1}, {:>4.1}, {:>5.1}) {:>7.3} {:>9.0} {:>7.3}",
                time,
                position.x,
                position.y,
                position.z,
                params.gain,
                params.low_pass_cutoff.unwrap_or(0.0),
                params.spatial_blend
            );
        }
    }
}

/// Straight line from behind both walls to a point with clear line of sight
fn listener_path(progress: f32) -> Vec3 {
    let start = Vec3::new(20.0, 0.0, 0.0);
    let end = Vec3::new(20.0, 0.0, 24.0);
    start.lerp(end, progress.clamp(0.0, 1.0))
}
