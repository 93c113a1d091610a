//! Fundamental geometric and simulation types.
//!
//! Internal math uses `glam::DVec3` throughout (x = East, y = North,
//! z = Up / altitude, meters). Serialized floats go through `safe_float`
//! so the wire never carries inf or NaN.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{SPEED_MULTIPLIER_MAX, SPEED_MULTIPLIER_MIN};

/// Large finite sentinel used in place of +/- infinity on the wire.
pub const FLOAT_SENTINEL: f64 = 1_000_000.0;

/// Convert a float to a wire-safe value: +/-inf clamps to the sentinel,
/// NaN clamps to zero. Applied at every serialization boundary, never to
/// internal state.
pub fn safe_float(value: f64) -> f64 {
    if value.is_infinite() {
        if value > 0.0 {
            FLOAT_SENTINEL
        } else {
            -FLOAT_SENTINEL
        }
    } else if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Wall-clock epoch seconds, for creation/update timestamps and event logs.
pub fn epoch_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Sanitized 3-component vector as it appears on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3View {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3View {
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<DVec3> for Vec3View {
    fn from(v: DVec3) -> Self {
        Self {
            x: safe_float(v.x),
            y: safe_float(v.y),
            z: safe_float(v.z),
        }
    }
}

/// Simulation clock state owned by the world store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimClock {
    /// Whether the simulation loop is driving updates.
    pub running: bool,
    /// Speed multiplier, clamped to [0.1, 10.0].
    pub speed: f64,
    /// Elapsed simulation time in seconds (advances by the effective
    /// timestep each step).
    pub elapsed_secs: f64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            running: false,
            speed: 1.0,
            elapsed_secs: 0.0,
        }
    }
}

impl SimClock {
    /// Set the speed multiplier, clamped to the legal range.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(SPEED_MULTIPLIER_MIN, SPEED_MULTIPLIER_MAX);
    }

    /// Advance elapsed simulation time by one effective timestep.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed_secs += dt;
    }
}

/// Cumulative world counters, reported in every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub entities_created: u64,
    pub entities_destroyed: u64,
    pub events_logged: u64,
    pub messages_sent: u64,
}

/// Normalize an angle difference into (-pi, pi].
pub fn wrap_angle(mut angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}
