//! Detection sweep: drone sensors against ground targets.
//!
//! Runs on its own cadence rather than every tick; pairwise distance
//! checks are the dominant cost of a large world. Detection is sticky
//! (a target once seen stays flagged) and never changes any drone's
//! mode.

use serde_json::json;

use skywatch_core::components::{Flags, Health, Ident, Kinematics, TargetState};
use skywatch_core::constants::DETECTION_CONFIDENCE;

use crate::store::WorldStore;

/// Run one detection cycle over every live drone/target pair.
pub fn run(store: &mut WorldStore) {
    let sim_time = store.clock.elapsed_secs;

    let sensors: Vec<(String, glam::DVec3, f64)> = store
        .world
        .query::<(&Ident, &Kinematics, &Health)>()
        .iter()
        .filter(|(_, (ident, _, health))| {
            ident.kind == skywatch_core::enums::EntityKind::Drone && !health.destroyed
        })
        .map(|(_, (ident, kin, _))| (ident.id.clone(), kin.position, kin.detection_radius))
        .collect();

    // Target id plus the closest detecting drone and its range.
    let mut newly_detected: Vec<(String, String, f64)> = Vec::new();

    for (_, (ident, kin, health, flags, state)) in store.world.query_mut::<(
        &Ident,
        &Kinematics,
        &Health,
        &mut Flags,
        &mut TargetState,
    )>() {
        if health.destroyed {
            continue;
        }
        let nearest = sensors
            .iter()
            .filter_map(|(id, position, radius)| {
                let distance = kin.position.distance(*position);
                (distance <= *radius).then(|| (id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((drone_id, distance)) = nearest else {
            continue;
        };

        let first = state.detection_count == 0;
        state.mark_detected(DETECTION_CONFIDENCE, sim_time, first);
        if !flags.detected {
            flags.detected = true;
            newly_detected.push((ident.id.clone(), drone_id.clone(), distance));
        }
    }

    for (id, drone_id, distance) in newly_detected {
        store.log_event(
            "target_detected",
            Some(&id),
            json!({
                "confidence": DETECTION_CONFIDENCE,
                "drone_id": drone_id,
                "distance": distance,
            }),
        );
    }
}
