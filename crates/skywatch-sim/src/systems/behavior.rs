//! Behavior system: one state-machine update per live entity per step.
//!
//! Cross-entity references are resolved through a contact table built in
//! a first read-only pass, so the mutable per-entity pass never needs a
//! second borrow of the world. Kamikaze strikes are collected and
//! resolved after iteration.

use rand_chacha::ChaCha8Rng;
use serde_json::json;

use skywatch_behavior::{drone, target, Contact, ContactTable};
use skywatch_core::components::{
    DroneBehavior, Flags, Health, Ident, Kinematics, Nav, Stamps, TargetState,
};
use skywatch_core::types::epoch_secs;

use crate::store::WorldStore;

/// Advance every non-destroyed entity by one effective timestep.
pub fn run(store: &mut WorldStore, rng: &mut ChaCha8Rng, dt: f64) {
    let sim_time = store.clock.elapsed_secs;
    let now = epoch_secs();

    let mut contacts = ContactTable::new();
    for (_, (ident, kin, health)) in store.world.query::<(&Ident, &Kinematics, &Health)>().iter()
    {
        contacts.insert(
            ident.id.clone(),
            Contact {
                kind: ident.kind,
                position: kin.position,
                heading: kin.heading,
                destroyed: health.destroyed,
            },
        );
    }

    // (attacker, victim) pairs resolved after the drone pass.
    let mut strikes: Vec<(String, String)> = Vec::new();

    for (_, (ident, kin, nav, health, stamps, behavior)) in store.world.query_mut::<(
        &Ident,
        &mut Kinematics,
        &mut Nav,
        &Health,
        &mut Stamps,
        &mut DroneBehavior,
    )>() {
        if health.destroyed {
            continue;
        }
        let outcome = drone::update(kin, nav, behavior, &contacts, sim_time, dt, rng);
        stamps.updated_at = now;
        if let Some(victim) = outcome.strike {
            strikes.push((ident.id.clone(), victim));
        }
    }

    for (_, (_ident, kin, nav, health, flags, stamps, state)) in store.world.query_mut::<(
        &Ident,
        &mut Kinematics,
        &mut Nav,
        &Health,
        &Flags,
        &mut Stamps,
        &mut TargetState,
    )>() {
        if health.destroyed {
            continue;
        }
        target::update(kin, nav, flags, state, sim_time, dt, rng);
        stamps.updated_at = now;
    }

    for (attacker, victim) in strikes {
        store.apply_damage(&victim, 1.0);
        store.apply_damage(&attacker, 1.0);
        store.log_event(
            "kamikaze_attack",
            Some(&attacker),
            json!({ "target_id": victim }),
        );
    }
}
