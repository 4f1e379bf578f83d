//! Benchmark profiles for the Herd agent simulation.
//!
//! - [`reference_profile`]: the default 1000-agent world
//! - [`stress_profile`]: 20 000 agents on a larger map
//! - [`serial_profile`]: the reference world pinned to one worker

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use herd_engine::SimConfig;

/// Default world: 1000 agents, 4% leaders, 10000x5625 map.
///
/// The orphan sweep and housekeeping both run, so the profile measures
/// the full tick pipeline.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        ..SimConfig::default()
    }
}

/// 20x the reference population on a map with 4x the area.
pub fn stress_profile(seed: u64) -> SimConfig {
    SimConfig {
        population: 20_000,
        world_width: 20_000.0,
        world_height: 11_250.0,
        terrain_cols: 200,
        terrain_rows: 112,
        terrain_patches: 200,
        herd_max_size: 200,
        housekeeping_batch_size: 1000,
        seed,
        ..SimConfig::default()
    }
}

/// Reference world on a single worker, for comparing pool overhead.
pub fn serial_profile(seed: u64) -> SimConfig {
    SimConfig {
        worker_count: Some(1),
        ..reference_profile(seed)
    }
}
