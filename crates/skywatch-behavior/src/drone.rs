//! Drone behavior state machine.
//!
//! One `update` call per tick: base physics, then an exhaustive dispatch
//! on the current mode. Every handler that references another entity
//! falls back to random search when the reference cannot be resolved;
//! that is the designed recovery path, not an error.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skywatch_core::components::{DroneBehavior, Kinematics, Nav};
use skywatch_core::constants::*;
use skywatch_core::enums::{DroneMode, EntityKind};

use crate::steering::{at_target, integrate, steer_air};
use crate::{live_contact, ContactTable};

/// Result of one drone tick.
#[derive(Debug, Default)]
pub struct DroneOutcome {
    /// Id of the target the drone struck this tick. The caller destroys
    /// both parties and logs the attack.
    pub strike: Option<String>,
}

/// Advance one drone by one effective timestep.
pub fn update(
    kin: &mut Kinematics,
    nav: &mut Nav,
    drone: &mut DroneBehavior,
    contacts: &ContactTable,
    sim_time: f64,
    dt: f64,
    rng: &mut ChaCha8Rng,
) -> DroneOutcome {
    integrate(kin, dt);

    let mut outcome = DroneOutcome::default();
    match drone.mode {
        DroneMode::RandomSearch => random_search(kin, nav, drone, sim_time, dt, rng),
        DroneMode::FollowTarget => follow_target(kin, nav, drone, contacts, dt),
        DroneMode::FollowTeammate => follow_teammate(kin, nav, drone, contacts, dt),
        DroneMode::WaypointMode => waypoint_mode(kin, nav, drone, dt),
        DroneMode::Kamikaze => outcome.strike = kamikaze(kin, nav, drone, contacts, dt),
        DroneMode::HoldPosition => hold_position(kin, sim_time),
    }

    kin.clamp_speed();
    outcome
}

/// Patrol: pick a fresh random point in the patrol disk every
/// `RANDOM_TARGET_INTERVAL` seconds of simulation time, or sooner on
/// arrival.
fn random_search(
    kin: &mut Kinematics,
    nav: &mut Nav,
    drone: &mut DroneBehavior,
    sim_time: f64,
    dt: f64,
    rng: &mut ChaCha8Rng,
) {
    let stale = sim_time - drone.last_retarget > RANDOM_TARGET_INTERVAL;
    if stale || at_target(kin, nav.target_position, drone.approach_threshold) {
        let angle: f64 = rng.gen_range(0.0..TAU);
        let distance: f64 = rng.gen_range(0.0..drone.patrol_radius);
        nav.target_position = DVec3::new(
            distance * angle.cos(),
            distance * angle.sin(),
            rng.gen_range(PATROL_ALTITUDE_MIN..PATROL_ALTITUDE_MAX),
        );
        drone.last_retarget = sim_time;
    }

    steer_air(
        kin,
        nav.target_position,
        drone.turn_rate,
        drone.approach_threshold,
        dt,
    );
}

/// Hold a distance band around the referenced target: close when beyond
/// `follow + band`, back off when inside `follow - band`, otherwise
/// orbit at a constant angular rate.
fn follow_target(
    kin: &mut Kinematics,
    nav: &mut Nav,
    drone: &mut DroneBehavior,
    contacts: &ContactTable,
    dt: f64,
) {
    let Some(contact) = drone
        .target_entity
        .as_deref()
        .and_then(|id| live_contact(contacts, id))
    else {
        drone.mode = DroneMode::RandomSearch;
        return;
    };

    let anchor = contact.position;
    let distance = kin.position.distance(anchor);
    let altitude = kin.position.z;

    if distance > drone.follow_distance + FOLLOW_BAND {
        nav.target_position = DVec3::new(anchor.x, anchor.y, altitude);
    } else if distance < drone.follow_distance - FOLLOW_BAND {
        let mut away = kin.position - anchor;
        away.z = 0.0;
        let away = away.normalize_or_zero();
        nav.target_position = DVec3::new(
            anchor.x + away.x * drone.follow_distance,
            anchor.y + away.y * drone.follow_distance,
            altitude,
        );
    } else {
        drone.orbit_phase += FOLLOW_ORBIT_RATE * dt;
        nav.target_position = DVec3::new(
            anchor.x + drone.follow_distance * drone.orbit_phase.cos(),
            anchor.y + drone.follow_distance * drone.orbit_phase.sin(),
            altitude,
        );
    }

    steer_air(
        kin,
        nav.target_position,
        drone.turn_rate,
        drone.approach_threshold,
        dt,
    );
}

/// Formation flying: hold a fixed offset behind-and-beside the teammate,
/// rotated into the teammate's heading frame.
fn follow_teammate(
    kin: &mut Kinematics,
    nav: &mut Nav,
    drone: &mut DroneBehavior,
    contacts: &ContactTable,
    dt: f64,
) {
    let Some(contact) = drone
        .teammate_entity
        .as_deref()
        .and_then(|id| live_contact(contacts, id))
    else {
        drone.mode = DroneMode::RandomSearch;
        return;
    };

    // Slot offset in the teammate frame: behind along the heading,
    // displaced to the side by half the follow distance.
    let (ox, oy) = (-drone.follow_distance, drone.follow_distance * 0.5);
    let (sin_h, cos_h) = contact.heading.sin_cos();
    nav.target_position = DVec3::new(
        contact.position.x + ox * cos_h - oy * sin_h,
        contact.position.y + ox * sin_h + oy * cos_h,
        contact.position.z,
    );

    steer_air(
        kin,
        nav.target_position,
        drone.turn_rate,
        drone.approach_threshold,
        dt,
    );
}

/// Fly the queued route; with the queue exhausted, settle into hold.
fn waypoint_mode(kin: &mut Kinematics, nav: &mut Nav, drone: &mut DroneBehavior, dt: f64) {
    if at_target(kin, nav.target_position, drone.approach_threshold) {
        match nav.next_waypoint() {
            Some(waypoint) => nav.target_position = waypoint,
            None => {
                drone.mode = DroneMode::HoldPosition;
                kin.velocity = DVec3::ZERO;
                return;
            }
        }
    }

    steer_air(
        kin,
        nav.target_position,
        drone.turn_rate,
        drone.approach_threshold,
        dt,
    );
}

/// Hunt and strike. Without an assigned target, lock the nearest live
/// target inside the hunting range; with one, chase it and detonate at
/// engagement range, destroying both parties.
fn kamikaze(
    kin: &mut Kinematics,
    nav: &mut Nav,
    drone: &mut DroneBehavior,
    contacts: &ContactTable,
    dt: f64,
) -> Option<String> {
    if !drone.kamikaze_enabled {
        drone.mode = DroneMode::RandomSearch;
        return None;
    }

    // Drop a stale lock before hunting.
    if let Some(id) = drone.target_entity.as_deref() {
        if live_contact(contacts, id).is_none() {
            drone.target_entity = None;
        }
    }

    if drone.target_entity.is_none() {
        drone.target_entity = nearest_target(kin.position, contacts, drone.hunting_range);
        if drone.target_entity.is_none() {
            drone.mode = DroneMode::RandomSearch;
            return None;
        }
    }

    let id = drone.target_entity.clone()?;
    let contact = live_contact(contacts, &id)?;
    nav.target_position = contact.position;

    steer_air(
        kin,
        nav.target_position,
        drone.turn_rate,
        drone.approach_threshold,
        dt,
    );

    if kin.position.distance(contact.position) <= drone.engagement_range {
        return Some(id);
    }
    None
}

/// Nearest live target within `range`, if any.
fn nearest_target(position: DVec3, contacts: &ContactTable, range: f64) -> Option<String> {
    contacts
        .iter()
        .filter(|(_, c)| c.kind == EntityKind::Target && !c.destroyed)
        .map(|(id, c)| (id, position.distance(c.position)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id.clone())
}

/// Stationary hover: zero forward velocity plus a small sinusoidal
/// perturbation for visual life.
fn hold_position(kin: &mut Kinematics, sim_time: f64) {
    let phase = sim_time * HOVER_FREQUENCY;
    kin.velocity = DVec3::new(
        HOVER_AMPLITUDE * phase.sin(),
        0.0,
        HOVER_AMPLITUDE * (phase * 0.7).cos(),
    );
}
