//! Event and chat records kept in the world store's ring buffers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::MessageKind;
use crate::types::safe_float;

/// An append-only simulation event. Event types are open strings
/// (`entity_spawned`, `target_detected`, `kamikaze_attack`, ...) so the
/// command layer can log its own without touching this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Wall-clock epoch seconds.
    pub timestamp: f64,
    pub event_type: String,
    pub entity_id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl SimulationEvent {
    pub fn new(timestamp: f64, event_type: &str, entity_id: Option<String>, data: Value) -> Self {
        Self {
            timestamp: safe_float(timestamp),
            event_type: event_type.to_string(),
            entity_id,
            data,
        }
    }
}

/// A chat message relayed through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub timestamp: f64,
    pub sender: String,
    pub message: String,
    pub message_type: MessageKind,
}
