//! ECS components for hecs entities.
//!
//! Components are plain data structs; behavior logic lives in the
//! skywatch-behavior crate and the sim systems. The few methods here
//! guard invariants that must hold no matter who mutates the data
//! (health one-way destruction, clamped velocity, mode set membership).

use std::collections::VecDeque;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// Stable identity of an entity: external string id plus kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub id: String,
    pub kind: EntityKind,
}

/// Position, velocity, and the kinematic limits shared by every entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Heading in radians within the horizontal plane.
    pub heading: f64,
    pub max_speed: f64,
    pub detection_radius: f64,
    pub collision_radius: f64,
}

impl Kinematics {
    /// Clamp velocity magnitude to `max_speed`. Enforcement, not rejection.
    pub fn clamp_speed(&mut self) {
        let speed = self.velocity.length();
        if speed > self.max_speed && speed > 0.0 {
            self.velocity = self.velocity / speed * self.max_speed;
        }
    }
}

/// Health in [0, 1]; `destroyed` becomes true exactly when health reaches
/// zero and never reverts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub value: f64,
    pub destroyed: bool,
    /// Simulation-clock time destruction happened; negative while alive.
    pub destroyed_at: f64,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            value: 1.0,
            destroyed: false,
            destroyed_at: -1.0,
        }
    }
}

impl Health {
    pub fn apply_damage(&mut self, damage: f64) {
        self.value = (self.value - damage).max(0.0);
        if self.value <= 0.0 {
            self.destroyed = true;
        }
    }

    /// Healing a destroyed entity is a no-op: destruction is one-way.
    pub fn heal(&mut self, amount: f64) {
        if !self.destroyed {
            self.value = (self.value + amount).min(1.0);
        }
    }
}

/// Detection and selection flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Flags {
    pub detected: bool,
    pub selected: bool,
}

/// Navigation state: current steering target and the FIFO waypoint queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nav {
    pub target_position: DVec3,
    pub waypoints: VecDeque<DVec3>,
}

impl Nav {
    pub fn add_waypoint(&mut self, waypoint: DVec3) {
        self.waypoints.push_back(waypoint);
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
    }

    pub fn next_waypoint(&mut self) -> Option<DVec3> {
        self.waypoints.pop_front()
    }
}

/// Creation/last-update wall-clock timestamps (epoch seconds). Not part
/// of the round-trip contract; refreshed on every update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stamps {
    pub created_at: f64,
    pub updated_at: f64,
}

/// Drone behavior state machine data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneBehavior {
    pub mode: DroneMode,
    /// Weak reference to the followed/attacked entity, resolved through
    /// the world store each tick.
    pub target_entity: Option<String>,
    /// Weak reference to the formation teammate.
    pub teammate_entity: Option<String>,
    pub follow_distance: f64,
    pub kamikaze_enabled: bool,
    pub hunting_range: f64,
    pub turn_rate: f64,
    pub approach_threshold: f64,
    pub patrol_radius: f64,
    pub engagement_range: f64,
    /// Simulation-clock time of the last random-search retarget.
    pub last_retarget: f64,
    /// Angular phase of the follow-target orbit.
    pub orbit_phase: f64,
}

impl Default for DroneBehavior {
    fn default() -> Self {
        Self {
            mode: DroneMode::default(),
            target_entity: None,
            teammate_entity: None,
            follow_distance: DRONE_FOLLOW_DISTANCE,
            kamikaze_enabled: true,
            hunting_range: DRONE_HUNTING_RANGE,
            turn_rate: DRONE_TURN_RATE,
            approach_threshold: DRONE_APPROACH_THRESHOLD,
            patrol_radius: DRONE_PATROL_RADIUS,
            engagement_range: DRONE_ENGAGEMENT_RANGE,
            last_retarget: 0.0,
            orbit_phase: 0.0,
        }
    }
}

impl DroneBehavior {
    /// Sole mutation path for the mode. Unknown names leave the mode
    /// unchanged and return false.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match DroneMode::parse(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => false,
        }
    }

    pub fn set_follow_distance(&mut self, distance: f64) {
        self.follow_distance = distance.max(FOLLOW_DISTANCE_MIN);
    }

    /// Disabling kamikaze while in kamikaze mode reverts to random search.
    pub fn set_kamikaze_enabled(&mut self, enabled: bool) {
        self.kamikaze_enabled = enabled;
        if !enabled && self.mode == DroneMode::Kamikaze {
            self.mode = DroneMode::RandomSearch;
        }
    }
}

/// Target observation and behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetState {
    pub mode: TargetMode,
    /// Velocity estimate from external sensors, not simulation truth.
    pub observed_velocity: DVec3,
    /// Simulation-clock time the target was last seen by a sensor.
    pub last_seen: f64,
    /// Classification confidence in [0, 1]; running maximum.
    pub confidence: f64,
    pub role: TargetRole,
    pub affiliation: Affiliation,
    pub moving: bool,
    pub targeted: bool,
    pub patrol_speed: f64,
    pub turn_rate: f64,
    pub approach_threshold: f64,
    /// Simulation-clock time of the first detection.
    pub first_detected: f64,
    pub detection_count: u32,
    /// Simulation-clock time the current patrol leg began; negative
    /// until the first leg is issued.
    pub leg_started: f64,
    /// Simulation-clock time of the last hold-position jitter check.
    pub last_jitter: f64,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            mode: TargetMode::default(),
            observed_velocity: DVec3::ZERO,
            last_seen: 0.0,
            confidence: 0.0,
            role: TargetRole::default(),
            affiliation: Affiliation::default(),
            moving: false,
            targeted: false,
            patrol_speed: TARGET_PATROL_SPEED,
            turn_rate: TARGET_TURN_RATE,
            approach_threshold: TARGET_APPROACH_THRESHOLD,
            first_detected: 0.0,
            detection_count: 0,
            leg_started: -1.0,
            last_jitter: 0.0,
        }
    }
}

impl TargetState {
    /// Sole mutation path for the mode; see `DroneBehavior::set_mode`.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match TargetMode::parse(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => false,
        }
    }

    /// Record a sensor detection. Idempotent on the `detected` flag side;
    /// confidence is a running maximum and the count increments on every
    /// detection cycle.
    pub fn mark_detected(&mut self, confidence: f64, now: f64, first: bool) {
        if first {
            self.first_detected = now;
            self.detection_count = 1;
        } else {
            self.detection_count += 1;
        }
        self.confidence = self.confidence.max(confidence);
        self.last_seen = now;
    }

    pub fn update_observed_velocity(&mut self, velocity: DVec3) {
        self.observed_velocity = velocity;
        self.moving = velocity.length() > MOVING_SPEED_THRESHOLD;
    }
}

/// Default kinematics for a drone at the given position.
pub fn drone_kinematics(position: DVec3) -> Kinematics {
    Kinematics {
        position,
        velocity: DVec3::ZERO,
        heading: 0.0,
        max_speed: DRONE_MAX_SPEED,
        detection_radius: DRONE_DETECTION_RADIUS,
        collision_radius: DRONE_COLLISION_RADIUS,
    }
}

/// Default kinematics for a ground target at the given position.
pub fn target_kinematics(position: DVec3) -> Kinematics {
    Kinematics {
        position,
        velocity: DVec3::ZERO,
        heading: 0.0,
        max_speed: TARGET_MAX_SPEED,
        detection_radius: TARGET_DETECTION_RADIUS,
        collision_radius: TARGET_COLLISION_RADIUS,
    }
}
