//! Serialized world views: the wire contract handed to the transport
//! layer verbatim.
//!
//! Every float in these structs has passed through `safe_float`, so a
//! snapshot never carries inf or NaN regardless of what the simulation
//! math produced. Views deserialize too: snapshot restore is the
//! in-memory structural mirror of this form.

use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::events::{ChatMessage, SimulationEvent};
use crate::types::{Vec3View, WorldStats};

/// Canonical serialized form of one entity: the base record plus the
/// kind-specific section flattened into the same flat key-value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: String,
    pub kind: EntityKind,
    pub position: Vec3View,
    pub heading: f64,
    pub velocity: Vec3View,
    pub max_speed: f64,
    pub detection_radius: f64,
    pub collision_radius: f64,
    pub health: f64,
    pub detected: bool,
    pub selected: bool,
    pub destroyed: bool,
    pub target_position: Vec3View,
    pub waypoints: Vec<Vec3View>,
    /// Behavior mode by wire name.
    pub mode: String,
    pub created_at: f64,
    pub updated_at: f64,
    pub sort_index: usize,
    #[serde(flatten)]
    pub drone: Option<DroneView>,
    #[serde(flatten)]
    pub target: Option<TargetView>,
}

/// Drone-specific serialized fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneView {
    pub target_entity_id: Option<String>,
    pub teammate_entity_id: Option<String>,
    pub follow_distance: f64,
    pub kamikaze_enabled: bool,
    pub hunting_range: f64,
    pub turn_rate: f64,
    pub approach_threshold: f64,
    pub patrol_radius: f64,
    pub engagement_range: f64,
}

/// Target-specific serialized fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub observed_velocity: Vec3View,
    pub last_seen: f64,
    pub confidence: f64,
    /// Role by wire name (`tank`, `SAM`, ...).
    pub role: String,
    pub affiliation: String,
    pub is_moving: bool,
    pub is_targeted: bool,
    pub patrol_speed: f64,
    pub target_turn_rate: f64,
    pub target_approach_threshold: f64,
    pub first_detected: f64,
    pub detection_count: u32,
}

/// Serialized form of an entity group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub created_at: f64,
    pub sort_index: usize,
}

/// Complete, self-contained world snapshot. Reflects a state that
/// existed at one instant: it is built in one pass under the store lock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub entities: Vec<EntityView>,
    pub groups: Vec<GroupView>,
    pub selected_entities: Vec<String>,
    pub simulation_running: bool,
    pub simulation_speed: f64,
    pub simulation_time: f64,
    pub fps: f64,
    pub stats: WorldStats,
    pub recent_events: Vec<SimulationEvent>,
    pub recent_messages: Vec<ChatMessage>,
}

impl Default for EntityView {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: EntityKind::Drone,
            position: Vec3View::default(),
            heading: 0.0,
            velocity: Vec3View::default(),
            max_speed: 0.0,
            detection_radius: 0.0,
            collision_radius: 0.0,
            health: 1.0,
            detected: false,
            selected: false,
            destroyed: false,
            target_position: Vec3View::default(),
            waypoints: Vec::new(),
            mode: String::new(),
            created_at: 0.0,
            updated_at: 0.0,
            sort_index: 0,
            drone: None,
            target: None,
        }
    }
}

/// Engine performance counters for the monitoring surface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PerfStats {
    /// Simulation steps completed in the last wall-clock second.
    pub fps: f64,
    pub target_fps: f64,
    pub speed_multiplier: f64,
    pub entity_count: usize,
    /// Mean step duration over the rolling window, milliseconds.
    pub avg_frame_ms: f64,
    /// Worst step duration over the rolling window, milliseconds.
    pub max_frame_ms: f64,
    pub running: bool,
    pub paused: bool,
}
