//! Enumeration types used throughout the simulation.
//!
//! Behavior modes are closed enums rather than free-form strings: an
//! invalid mode cannot be represented, and every dispatch is an
//! exhaustive match. Wire names match the external command vocabulary
//! (`random_search`, `hold_position`, ...).

use serde::{Deserialize, Serialize};

/// Concrete entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Drone,
    Target,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Drone => "drone",
            EntityKind::Target => "target",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "drone" => Some(EntityKind::Drone),
            "target" => Some(EntityKind::Target),
            _ => None,
        }
    }
}

/// Drone behavior modes. Any mode may transition to any other valid mode;
/// set membership is the only legality check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneMode {
    /// Patrol random points within the patrol disk.
    #[default]
    RandomSearch,
    /// Maintain a distance band around a referenced target entity.
    FollowTarget,
    /// Formation flying on a fixed offset behind a referenced teammate.
    FollowTeammate,
    /// Navigate the queued waypoint route.
    WaypointMode,
    /// Hunt the nearest target in range and strike it, destroying both.
    Kamikaze,
    /// Stationary hover with a small sinusoidal perturbation.
    HoldPosition,
}

impl DroneMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DroneMode::RandomSearch => "random_search",
            DroneMode::FollowTarget => "follow_target",
            DroneMode::FollowTeammate => "follow_teammate",
            DroneMode::WaypointMode => "waypoint_mode",
            DroneMode::Kamikaze => "kamikaze",
            DroneMode::HoldPosition => "hold_position",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "random_search" => Some(DroneMode::RandomSearch),
            "follow_target" => Some(DroneMode::FollowTarget),
            "follow_teammate" => Some(DroneMode::FollowTeammate),
            "waypoint_mode" => Some(DroneMode::WaypointMode),
            "kamikaze" => Some(DroneMode::Kamikaze),
            "hold_position" => Some(DroneMode::HoldPosition),
            _ => None,
        }
    }
}

/// Target behavior modes (simulation-controlled movement only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Patrol queued or randomly generated nearby points.
    WaypointMode,
    /// Stationary, with rare positional/heading jitter.
    #[default]
    HoldPosition,
}

impl TargetMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetMode::WaypointMode => "waypoint_mode",
            TargetMode::HoldPosition => "hold_position",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "waypoint_mode" => Some(TargetMode::WaypointMode),
            "hold_position" => Some(TargetMode::HoldPosition),
            _ => None,
        }
    }
}

/// Target role / classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRole {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "tank")]
    Tank,
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "infantry")]
    Infantry,
    #[serde(rename = "SAM")]
    Sam,
    #[serde(rename = "ship")]
    Ship,
    #[serde(rename = "jammer")]
    Jammer,
    #[serde(rename = "building")]
    Building,
    #[serde(rename = "bunker")]
    Bunker,
}

impl TargetRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetRole::Unknown => "unknown",
            TargetRole::Tank => "tank",
            TargetRole::Car => "car",
            TargetRole::Infantry => "infantry",
            TargetRole::Sam => "SAM",
            TargetRole::Ship => "ship",
            TargetRole::Jammer => "jammer",
            TargetRole::Building => "building",
            TargetRole::Bunker => "bunker",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "unknown" => Some(TargetRole::Unknown),
            "tank" => Some(TargetRole::Tank),
            "car" => Some(TargetRole::Car),
            "infantry" => Some(TargetRole::Infantry),
            "SAM" => Some(TargetRole::Sam),
            "ship" => Some(TargetRole::Ship),
            "jammer" => Some(TargetRole::Jammer),
            "building" => Some(TargetRole::Building),
            "bunker" => Some(TargetRole::Bunker),
            _ => None,
        }
    }
}

/// Target affiliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affiliation {
    #[default]
    Hostile,
    Neutral,
    Friendly,
    Unknown,
}

impl Affiliation {
    pub fn as_str(self) -> &'static str {
        match self {
            Affiliation::Hostile => "hostile",
            Affiliation::Neutral => "neutral",
            Affiliation::Friendly => "friendly",
            Affiliation::Unknown => "unknown",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "hostile" => Some(Affiliation::Hostile),
            "neutral" => Some(Affiliation::Neutral),
            "friendly" => Some(Affiliation::Friendly),
            "unknown" => Some(Affiliation::Unknown),
            _ => None,
        }
    }
}

/// Chat message origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    User,
    System,
    Ai,
}
