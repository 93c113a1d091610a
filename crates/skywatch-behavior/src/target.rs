//! Ground target behavior.
//!
//! Targets are surface units: after every update the position is pinned
//! to ground level and vertical velocity is cleared.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skywatch_core::components::{Flags, Kinematics, Nav, TargetState};
use skywatch_core::constants::*;
use skywatch_core::enums::TargetMode;

use crate::steering::{at_target, integrate, steer_ground};

/// Advance one target by one effective timestep.
pub fn update(
    kin: &mut Kinematics,
    nav: &mut Nav,
    flags: &Flags,
    target: &mut TargetState,
    sim_time: f64,
    dt: f64,
    rng: &mut ChaCha8Rng,
) {
    integrate(kin, dt);

    match target.mode {
        TargetMode::WaypointMode => waypoint_patrol(kin, nav, target, sim_time, dt, rng),
        TargetMode::HoldPosition => hold_position(kin, target, sim_time, rng),
    }

    // Surface units never leave the ground.
    kin.position.z = 0.0;
    kin.velocity.z = 0.0;

    kin.clamp_speed();
    if flags.detected {
        target.last_seen = sim_time;
    }
    target.update_observed_velocity(kin.velocity);
}

/// Drive the patrol route: pop the next waypoint on arrival, or pick a
/// random leg from the current position when the route is empty. A leg
/// that takes too long is abandoned and regenerated so a blocked target
/// never parks forever.
fn waypoint_patrol(
    kin: &mut Kinematics,
    nav: &mut Nav,
    target: &mut TargetState,
    sim_time: f64,
    dt: f64,
    rng: &mut ChaCha8Rng,
) {
    if target.leg_started < 0.0 {
        target.leg_started = sim_time;
    }
    let arrived = at_target(kin, nav.target_position, target.approach_threshold);
    let stale = sim_time - target.leg_started > PATROL_LEG_TIMEOUT_SECS;

    if arrived || stale {
        target.leg_started = sim_time;

        match nav.next_waypoint() {
            Some(waypoint) => nav.target_position = waypoint,
            None => {
                let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
                let leg: f64 = rng.gen_range(PATROL_LEG_MIN..PATROL_LEG_MAX);
                nav.target_position = DVec3::new(
                    kin.position.x + leg * angle.cos(),
                    kin.position.y + leg * angle.sin(),
                    0.0,
                );
            }
        }
    }

    steer_ground(
        kin,
        nav.target_position,
        target.patrol_speed,
        target.turn_rate,
        target.approach_threshold,
        dt,
    );
}

/// Sit still, with an occasional small reposition so a long-held post
/// does not look frozen.
fn hold_position(
    kin: &mut Kinematics,
    target: &mut TargetState,
    sim_time: f64,
    rng: &mut ChaCha8Rng,
) {
    kin.velocity = DVec3::ZERO;

    if sim_time - target.last_jitter >= JITTER_INTERVAL {
        target.last_jitter = sim_time;
        if rng.gen_bool(JITTER_CHANCE) {
            kin.position.x += rng.gen_range(-0.5..0.5);
            kin.position.y += rng.gen_range(-0.5..0.5);
            kin.heading += rng.gen_range(-0.5..0.5);
        }
    }
}
