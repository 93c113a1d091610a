//! Tests for the drone and target state machines and the shared steering primitive.

use std::collections::HashMap;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skywatch_core::components::{
    drone_kinematics, target_kinematics, DroneBehavior, Flags, Nav, TargetState,
};
use skywatch_core::constants::*;
use skywatch_core::enums::{DroneMode, EntityKind, TargetMode};

use crate::steering::{at_target, steer_air};
use crate::{drone, target, Contact, ContactTable};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn contact(kind: EntityKind, position: DVec3) -> Contact {
    Contact {
        kind,
        position,
        heading: 0.0,
        destroyed: false,
    }
}

fn step_drone(
    kin: &mut skywatch_core::components::Kinematics,
    nav: &mut Nav,
    behavior: &mut DroneBehavior,
    contacts: &ContactTable,
    steps: usize,
    rng: &mut ChaCha8Rng,
) -> Option<String> {
    let mut struck = None;
    for i in 0..steps {
        let t = i as f64 * DT;
        let out = drone::update(kin, nav, behavior, contacts, t, DT, rng);
        if out.strike.is_some() {
            struck = out.strike;
            break;
        }
    }
    struck
}

#[test]
fn test_steer_air_turn_rate_clamp() {
    let mut kin = drone_kinematics(DVec3::ZERO);
    kin.heading = 0.0;
    // Target dead behind: a single small step cannot reverse heading.
    steer_air(&mut kin, DVec3::new(-100.0, 0.0, 0.0), DRONE_TURN_RATE, 5.0, DT);
    assert!(kin.heading.abs() <= DRONE_TURN_RATE * DT + 1e-9);
}

#[test]
fn test_steer_air_damps_inside_threshold() {
    let mut kin = drone_kinematics(DVec3::ZERO);
    kin.velocity = DVec3::new(10.0, 0.0, 0.0);
    let before = kin.velocity.length();
    steer_air(&mut kin, DVec3::new(1.0, 0.0, 0.0), DRONE_TURN_RATE, 5.0, DT);
    assert!(kin.velocity.length() < before);
}

#[test]
fn test_waypoint_route_then_hold() {
    let mut kin = drone_kinematics(DVec3::new(0.0, 0.0, 50.0));
    let mut nav = Nav::default();
    nav.target_position = kin.position;
    nav.add_waypoint(DVec3::new(60.0, 0.0, 50.0));
    nav.add_waypoint(DVec3::new(60.0, 60.0, 50.0));
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::WaypointMode;
    let contacts = ContactTable::new();
    let mut rng = rng();

    for i in 0..2400 {
        let t = i as f64 * DT;
        drone::update(&mut kin, &mut nav, &mut behavior, &contacts, t, DT, &mut rng);
        if behavior.mode == DroneMode::HoldPosition {
            break;
        }
    }

    assert_eq!(behavior.mode, DroneMode::HoldPosition);
    assert!(nav.waypoints.is_empty());
    assert!(
        kin.position.distance(DVec3::new(60.0, 60.0, 50.0))
            < DRONE_APPROACH_THRESHOLD + 2.0
    );
}

#[test]
fn test_waypoints_consumed_in_order() {
    let mut kin = drone_kinematics(DVec3::new(0.0, 0.0, 50.0));
    let mut nav = Nav::default();
    nav.target_position = kin.position;
    nav.add_waypoint(DVec3::new(40.0, 0.0, 50.0));
    nav.add_waypoint(DVec3::new(-40.0, 0.0, 50.0));
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::WaypointMode;
    let contacts = ContactTable::new();
    let mut rng = rng();

    // First tick pops the front waypoint since we start on target.
    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    assert_eq!(nav.target_position, DVec3::new(40.0, 0.0, 50.0));
    assert_eq!(nav.waypoints.len(), 1);
}

#[test]
fn test_kamikaze_strikes_nearby_target() {
    let mut kin = drone_kinematics(DVec3::new(0.0, 0.0, 30.0));
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::Kamikaze;
    let mut contacts = ContactTable::new();
    contacts.insert(
        "target-1".to_string(),
        contact(EntityKind::Target, DVec3::new(50.0, 0.0, 0.0)),
    );
    let mut rng = rng();

    let struck = step_drone(&mut kin, &mut nav, &mut behavior, &contacts, 3600, &mut rng);
    assert_eq!(struck.as_deref(), Some("target-1"));
    assert_eq!(behavior.target_entity.as_deref(), Some("target-1"));
}

#[test]
fn test_kamikaze_ignores_destroyed_target() {
    let mut kin = drone_kinematics(DVec3::new(0.0, 0.0, 30.0));
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::Kamikaze;
    behavior.target_entity = Some("target-1".to_string());
    let mut contacts = ContactTable::new();
    let mut dead = contact(EntityKind::Target, DVec3::new(50.0, 0.0, 0.0));
    dead.destroyed = true;
    contacts.insert("target-1".to_string(), dead);
    let mut rng = rng();

    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    // Stale lock dropped, no live target in range, drone reverts to search.
    assert_eq!(behavior.mode, DroneMode::RandomSearch);
    assert!(behavior.target_entity.is_none());
}

#[test]
fn test_kamikaze_out_of_range_falls_back() {
    let mut kin = drone_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::Kamikaze;
    let mut contacts = ContactTable::new();
    contacts.insert(
        "far".to_string(),
        contact(
            EntityKind::Target,
            DVec3::new(DRONE_HUNTING_RANGE + 100.0, 0.0, 0.0),
        ),
    );
    let mut rng = rng();

    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    assert_eq!(behavior.mode, DroneMode::RandomSearch);
}

#[test]
fn test_follow_target_missing_reference_falls_back() {
    let mut kin = drone_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::FollowTarget;
    behavior.target_entity = Some("gone".to_string());
    let contacts = ContactTable::new();
    let mut rng = rng();

    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    assert_eq!(behavior.mode, DroneMode::RandomSearch);
}

#[test]
fn test_follow_target_converges_to_band() {
    let mut kin = drone_kinematics(DVec3::new(200.0, 0.0, 40.0));
    let mut nav = Nav::default();
    nav.target_position = kin.position;
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::FollowTarget;
    behavior.target_entity = Some("anchor".to_string());
    let mut contacts = ContactTable::new();
    contacts.insert(
        "anchor".to_string(),
        contact(EntityKind::Target, DVec3::ZERO),
    );
    let mut rng = rng();

    for i in 0..3600 {
        let t = i as f64 * DT;
        drone::update(&mut kin, &mut nav, &mut behavior, &contacts, t, DT, &mut rng);
    }

    let horizontal = DVec3::new(kin.position.x, kin.position.y, 0.0).length();
    assert!(
        horizontal < behavior.follow_distance + FOLLOW_BAND + DRONE_APPROACH_THRESHOLD,
        "drone should settle near the follow band, was {horizontal}"
    );
}

#[test]
fn test_follow_teammate_missing_reference_falls_back() {
    let mut kin = drone_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::FollowTeammate;
    behavior.teammate_entity = None;
    let contacts = ContactTable::new();
    let mut rng = rng();

    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    assert_eq!(behavior.mode, DroneMode::RandomSearch);
}

#[test]
fn test_follow_teammate_offset_tracks_heading() {
    let mut kin = drone_kinematics(DVec3::new(5.0, 5.0, 50.0));
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::FollowTeammate;
    behavior.teammate_entity = Some("lead".to_string());
    let mut contacts = ContactTable::new();
    contacts.insert(
        "lead".to_string(),
        contact(EntityKind::Drone, DVec3::new(0.0, 0.0, 50.0)),
    );
    let mut rng = rng();

    drone::update(&mut kin, &mut nav, &mut behavior, &contacts, 0.0, DT, &mut rng);
    // Heading 0 (east): slot sits behind (west) and beside (north).
    assert!((nav.target_position.x - -behavior.follow_distance).abs() < 1e-9);
    assert!((nav.target_position.y - behavior.follow_distance * 0.5).abs() < 1e-9);
}

#[test]
fn test_random_search_retargets_on_interval() {
    let mut kin = drone_kinematics(DVec3::new(500.0, 500.0, 50.0));
    let mut nav = Nav::default();
    nav.target_position = DVec3::new(900.0, 900.0, 50.0);
    let mut behavior = DroneBehavior::default();
    let contacts = ContactTable::new();
    let mut rng = rng();

    let before = nav.target_position;
    drone::update(
        &mut kin,
        &mut nav,
        &mut behavior,
        &contacts,
        RANDOM_TARGET_INTERVAL + 1.0,
        DT,
        &mut rng,
    );
    assert_ne!(nav.target_position, before);
    assert!(nav.target_position.z >= PATROL_ALTITUDE_MIN);
    assert!(nav.target_position.z <= PATROL_ALTITUDE_MAX);
    assert!(
        DVec3::new(nav.target_position.x, nav.target_position.y, 0.0).length()
            <= behavior.patrol_radius
    );
}

#[test]
fn test_hold_position_hover_is_bounded() {
    let mut kin = drone_kinematics(DVec3::new(10.0, 20.0, 50.0));
    let mut nav = Nav::default();
    let mut behavior = DroneBehavior::default();
    behavior.mode = DroneMode::HoldPosition;
    let contacts = ContactTable::new();
    let mut rng = rng();

    let start = kin.position;
    for i in 0..600 {
        let t = i as f64 * DT;
        drone::update(&mut kin, &mut nav, &mut behavior, &contacts, t, DT, &mut rng);
        assert!(kin.velocity.length() <= HOVER_AMPLITUDE * 2.0_f64.sqrt() + 1e-9);
    }
    // Bounded hover: the oscillation never wanders far from the start.
    assert!(kin.position.distance(start) < HOVER_AMPLITUDE * 6.0);
}

#[test]
fn test_target_stays_on_ground() {
    let mut kin = target_kinematics(DVec3::new(0.0, 0.0, 12.0));
    kin.velocity = DVec3::new(0.0, 0.0, 5.0);
    let mut nav = Nav::default();
    let flags = Flags::default();
    let mut state = TargetState::default();
    state.mode = TargetMode::WaypointMode;
    nav.target_position = DVec3::new(100.0, 0.0, 0.0);
    let mut rng = rng();

    target::update(&mut kin, &mut nav, &flags, &mut state, 0.0, DT, &mut rng);
    assert_eq!(kin.position.z, 0.0);
    assert_eq!(kin.velocity.z, 0.0);
}

#[test]
fn test_target_patrol_regenerates_leg_on_arrival() {
    let mut kin = target_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    nav.target_position = kin.position;
    let flags = Flags::default();
    let mut state = TargetState::default();
    state.mode = TargetMode::WaypointMode;
    let mut rng = rng();

    // Arrival regenerates the leg immediately; no parking in between.
    target::update(&mut kin, &mut nav, &flags, &mut state, 10.0, DT, &mut rng);
    assert_eq!(state.leg_started, 10.0);
    assert_ne!(nav.target_position, DVec3::ZERO);
    assert_eq!(nav.target_position.z, 0.0);

    // Within a few seconds the unit is well under way.
    for i in 1..600 {
        let t = 10.0 + i as f64 * DT;
        target::update(&mut kin, &mut nav, &flags, &mut state, t, DT, &mut rng);
    }
    assert!(state.moving);
    assert!(kin.position.length() > 1.0);
}

#[test]
fn test_target_patrol_abandons_stale_leg() {
    let mut kin = target_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    nav.target_position = DVec3::new(10_000.0, 0.0, 0.0);
    let flags = Flags::default();
    let mut state = TargetState::default();
    state.mode = TargetMode::WaypointMode;
    let mut rng = rng();

    // First update starts the leg clock on the existing leg.
    target::update(&mut kin, &mut nav, &flags, &mut state, 0.0, DT, &mut rng);
    assert_eq!(state.leg_started, 0.0);
    assert_eq!(nav.target_position, DVec3::new(10_000.0, 0.0, 0.0));

    // Past the timeout the unreachable leg is replaced with a fresh one.
    let late = PATROL_LEG_TIMEOUT_SECS + 1.0;
    target::update(&mut kin, &mut nav, &flags, &mut state, late, DT, &mut rng);
    assert_eq!(state.leg_started, late);
    assert_ne!(nav.target_position, DVec3::new(10_000.0, 0.0, 0.0));
    assert!(kin.position.distance(nav.target_position) <= PATROL_LEG_MAX + 1.0);
}

#[test]
fn test_target_patrol_respects_speed_limit() {
    let mut kin = target_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    nav.target_position = DVec3::new(500.0, 0.0, 0.0);
    let flags = Flags::default();
    let mut state = TargetState::default();
    state.mode = TargetMode::WaypointMode;
    let mut rng = rng();

    for i in 0..120 {
        let t = i as f64 * DT;
        target::update(&mut kin, &mut nav, &flags, &mut state, t, DT, &mut rng);
        assert!(kin.velocity.length() <= state.patrol_speed + 1e-9);
    }
    assert!(state.moving);
    assert!(kin.position.x > 0.0);
}

#[test]
fn test_target_hold_jitter_is_small() {
    let mut kin = target_kinematics(DVec3::new(100.0, 100.0, 0.0));
    let mut nav = Nav::default();
    let flags = Flags::default();
    let mut state = TargetState::default();
    let start = kin.position;
    let mut rng = rng();

    // Ten minutes of hold: every reposition is a sub-meter nudge, so
    // total drift stays tightly bounded.
    for i in 0..36_000 {
        let t = i as f64 * DT;
        target::update(&mut kin, &mut nav, &flags, &mut state, t, DT, &mut rng);
    }
    assert!(kin.position.distance(start) < 20.0);
    assert_eq!(kin.position.z, 0.0);
}

#[test]
fn test_target_last_seen_follows_detection_flag() {
    let mut kin = target_kinematics(DVec3::ZERO);
    let mut nav = Nav::default();
    let mut state = TargetState::default();
    let mut rng = rng();

    let unseen = Flags::default();
    target::update(&mut kin, &mut nav, &unseen, &mut state, 5.0, DT, &mut rng);
    assert_eq!(state.last_seen, 0.0);

    let seen = Flags {
        detected: true,
        selected: false,
    };
    target::update(&mut kin, &mut nav, &seen, &mut state, 6.0, DT, &mut rng);
    assert_eq!(state.last_seen, 6.0);
}

#[test]
fn test_live_contact_filters_destroyed() {
    let mut contacts: HashMap<String, Contact> = HashMap::new();
    let mut dead = contact(EntityKind::Drone, DVec3::ZERO);
    dead.destroyed = true;
    contacts.insert("dead".to_string(), dead);
    contacts.insert("alive".to_string(), contact(EntityKind::Drone, DVec3::ZERO));

    assert!(crate::live_contact(&contacts, "dead").is_none());
    assert!(crate::live_contact(&contacts, "alive").is_some());
    assert!(crate::live_contact(&contacts, "missing").is_none());
}

#[test]
fn test_at_target_threshold() {
    let kin = drone_kinematics(DVec3::ZERO);
    assert!(at_target(&kin, DVec3::new(3.0, 0.0, 0.0), 5.0));
    assert!(!at_target(&kin, DVec3::new(8.0, 0.0, 0.0), 5.0));
}
