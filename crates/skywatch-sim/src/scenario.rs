//! Demo scenario builder.
//!
//! Pure: produces spawn requests from the RNG alone, so the same seed
//! always yields the same population. The engine queues the requests
//! like any external spawn.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skywatch_core::commands::{SpawnProps, SpawnRequest};
use skywatch_core::constants::{
    SCENARIO_ALTITUDE_MAX, SCENARIO_ALTITUDE_MIN, SCENARIO_RING_JITTER, SCENARIO_RING_RADIUS,
    SCENARIO_TARGET_SPREAD,
};
use skywatch_core::enums::{EntityKind, TargetRole};

const TAG_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const SCENARIO_ROLES: [TargetRole; 5] = [
    TargetRole::Tank,
    TargetRole::Car,
    TargetRole::Infantry,
    TargetRole::Sam,
    TargetRole::Building,
];

/// Short uppercase-alphanumeric id tag, distinct from the hex ids used
/// for generated entities elsewhere.
fn short_tag(rng: &mut ChaCha8Rng) -> String {
    (0..3)
        .map(|_| TAG_CHARSET[rng.gen_range(0..TAG_CHARSET.len())] as char)
        .collect()
}

/// Build spawn requests for a demo population: `n_drones` on a
/// randomized ring in random-search mode, `n_targets` scattered on the
/// ground with randomized roles.
pub fn build_test_scenario(
    n_drones: usize,
    n_targets: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<SpawnRequest> {
    let mut requests = Vec::with_capacity(n_drones + n_targets);

    for index in 0..n_drones {
        let angle = index as f64 / n_drones.max(1) as f64 * TAU;
        let radius =
            SCENARIO_RING_RADIUS + rng.gen_range(-SCENARIO_RING_JITTER..SCENARIO_RING_JITTER);
        let position = DVec3::new(
            radius * angle.cos(),
            radius * angle.sin(),
            rng.gen_range(SCENARIO_ALTITUDE_MIN..SCENARIO_ALTITUDE_MAX),
        );
        requests.push(SpawnRequest {
            kind: EntityKind::Drone,
            id: Some(format!("drone-{}", short_tag(rng))),
            position,
            props: SpawnProps {
                mode: Some("random_search".to_string()),
                ..SpawnProps::default()
            },
        });
    }

    for _ in 0..n_targets {
        let position = DVec3::new(
            rng.gen_range(-SCENARIO_TARGET_SPREAD..SCENARIO_TARGET_SPREAD),
            rng.gen_range(-SCENARIO_TARGET_SPREAD..SCENARIO_TARGET_SPREAD),
            0.0,
        );
        requests.push(SpawnRequest {
            kind: EntityKind::Target,
            id: Some(format!("target-{}", short_tag(rng))),
            position,
            props: SpawnProps {
                role: SCENARIO_ROLES.choose(rng).copied(),
                ..SpawnProps::default()
            },
        });
    }

    requests
}
