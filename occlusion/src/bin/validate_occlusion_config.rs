//! CLI tool for validating occlusion configuration files
//!
//! Usage: cargo run --bin validate_occlusion_config <config.json>...

use sound_occlusion::audio::targets::compute_targets;
use sound_occlusion::config::{ConfigError, OcclusionConfig};
use std::env;
use std::process;

/// Distances sampled in the target preview, in metres
const PREVIEW_DISTANCES: [f32; 4] = [5.0, 20.0, 35.0, 49.0];

/// Obstruction counts sampled in the target preview
const PREVIEW_WALLS: [u32; 4] = [0, 1, 3, 6];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("sound_occlusion::config=debug")
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>...", args[0]);
        eprintln!("\nValidates occlusion configuration files and previews their target values.");
        eprintln!("\nExamples:");
        eprintln!("  {} assets/occlusion/default.json", args[0]);
        eprintln!("  {} assets/occlusion/*.json", args[0]);
        process::exit(1);
    }

    let mut all_valid = true;

    for config_path in &args[1..] {
        println!("=== Occlusion Config Report ===");
        println!("Config: {}", config_path);

        let config = match OcclusionConfig::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                if let Some(hint) = hint_for(&e) {
                    println!("    Fix: {}", hint);
                }
                all_valid = false;
                println!();
                continue;
            }
        };

        println!("Valid: true");
        print_summary(&config);
        print_preview(&config);
        println!();
    }

    if !all_valid {
        println!("Some configs failed validation");
        process::exit(1);
    } else {
        println!("All configs passed validation");
    }
}

fn hint_for(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::Io(_) => None,
        ConfigError::Json(_) => Some("Check field names and types against the default config"),
        ConfigError::NegativeSmoothing { .. } => {
            Some("Use 0 to apply targets instantly, or a value >= 1 for gradual changes")
        }
        ConfigError::NegativePerWall { .. } => {
            Some("Use a per_wall step of zero or more; zero disables the wall term")
        }
        ConfigError::InvertedBounds { .. } => Some("Swap the min and max values"),
        ConfigError::NonFinite { .. } => Some("Replace NaN or infinite values with finite numbers"),
        ConfigError::InvalidMaxDistance(_) => Some("Set max_distance to a positive length"),
    }
}

fn print_summary(config: &OcclusionConfig) {
    let stage = |enabled: bool| if enabled { "on" } else { "off" };

    println!("Max distance: {:.1}m", config.max_distance);
    println!("Height correction: {:.2}m", config.height_correction);
    println!("Occluder layers: {:#034b}", config.occluder_layers.bits());
    println!(
        "Gain: {} (min {}, max {}, per wall {}, smoothing {})",
        stage(config.gain.enabled),
        config.gain.min,
        config.gain.max,
        config.gain.per_wall,
        config.gain.smoothing
    );
    println!(
        "Cutoff: {} (per wall {}, distance coefficient {}, start {}m, smoothing {})",
        stage(config.cutoff.enabled),
        config.cutoff.per_wall,
        config.cutoff.distance_coefficient,
        config.cutoff.start_distance,
        config.cutoff.smoothing
    );
    println!(
        "Spatial blend: {} (max {}, per wall {}, smoothing {})",
        stage(config.spatial_blend.enabled),
        config.spatial_blend.max,
        config.spatial_blend.per_wall,
        config.spatial_blend.smoothing
    );

    for (name, smoothing) in [
        ("gain", config.gain.smoothing),
        ("cutoff", config.cutoff.smoothing),
        ("spatial blend", config.spatial_blend.smoothing),
    ] {
        if smoothing > 0.0 && smoothing < 1.0 {
            println!("WARNING: {} smoothing {} overshoots its target", name, smoothing);
        }
    }
}

fn print_preview(config: &OcclusionConfig) {
    println!("\nTARGETS:");
    println!("  {:>8} {:>6} {:>8} {:>10} {:>8}", "distance", "walls", "gain", "cutoff", "blend");
    for distance in PREVIEW_DISTANCES {
        if distance >= config.max_distance {
            continue;
        }
        for walls in PREVIEW_WALLS {
            let targets = compute_targets(distance, walls, config);
            println!(
                "  {:>8.1} {:>6} {:>8} {:>10} {:>8}",
                distance,
                walls,
                format_target(targets.gain, 3),
                format_target(targets.cutoff, 0),
                format_target(targets.spatial_blend, 3)
            );
        }
    }
}

fn format_target(value: Option<f32>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}
