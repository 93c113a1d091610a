//! Boundary enforcement: entities that leave the world volume are
//! steered back inside by retargeting, never teleported and never
//! mode-switched.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skywatch_core::components::{DroneBehavior, Ident, Kinematics, Nav, TargetState};
use skywatch_core::constants::{
    ALTITUDE_MAX, ALTITUDE_MIN, DRONE_RECOVERY_ALTITUDE, TARGET_RECOVERY_SPREAD, WORLD_BOUND,
};

use crate::store::WorldStore;

fn out_of_bounds(position: DVec3) -> bool {
    position.x.abs() > WORLD_BOUND
        || position.y.abs() > WORLD_BOUND
        || position.z < ALTITUDE_MIN
        || position.z > ALTITUDE_MAX
}

/// Retarget every out-of-bounds entity toward the interior.
pub fn run(store: &mut WorldStore, rng: &mut ChaCha8Rng) {
    for (_, (ident, kin, nav, _)) in store
        .world
        .query_mut::<(&Ident, &Kinematics, &mut Nav, &DroneBehavior)>()
    {
        if out_of_bounds(kin.position) {
            debug!(id = %ident.id, "drone out of bounds, retargeting to interior");
            nav.target_position = DVec3::new(0.0, 0.0, DRONE_RECOVERY_ALTITUDE);
        }
    }

    for (_, (ident, kin, nav, _)) in store
        .world
        .query_mut::<(&Ident, &Kinematics, &mut Nav, &TargetState)>()
    {
        if out_of_bounds(kin.position) {
            debug!(id = %ident.id, "target out of bounds, retargeting to interior");
            nav.target_position = DVec3::new(
                rng.gen_range(-TARGET_RECOVERY_SPREAD..TARGET_RECOVERY_SPREAD),
                rng.gen_range(-TARGET_RECOVERY_SPREAD..TARGET_RECOVERY_SPREAD),
                0.0,
            );
        }
    }
}
