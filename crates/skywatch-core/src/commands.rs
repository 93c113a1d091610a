//! Spawn requests queued by external commanders.
//!
//! Spawn and destroy are the only lifecycle mutations external code may
//! request, and both are queued rather than applied in place: the tick
//! loop drains them at step boundaries so the entity map is never
//! mutated mid-iteration.

use glam::DVec3;

use crate::enums::{Affiliation, EntityKind, TargetRole};

/// A queued request to create one entity.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    /// Caller-supplied id; generated when absent.
    pub id: Option<String>,
    pub position: DVec3,
    pub props: SpawnProps,
}

/// Optional overrides applied on top of the kind's defaults.
#[derive(Debug, Clone, Default)]
pub struct SpawnProps {
    /// Initial behavior mode by wire name; invalid names are ignored.
    pub mode: Option<String>,
    pub role: Option<TargetRole>,
    pub affiliation: Option<Affiliation>,
    pub kamikaze_enabled: Option<bool>,
    pub max_speed: Option<f64>,
    pub detection_radius: Option<f64>,
    pub follow_distance: Option<f64>,
    pub patrol_speed: Option<f64>,
    pub target_entity: Option<String>,
    pub teammate_entity: Option<String>,
    pub waypoints: Vec<DVec3>,
}
