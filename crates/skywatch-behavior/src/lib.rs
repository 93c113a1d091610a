//! Behavior state machines for SKYWATCH entities.
//!
//! Per-tick update logic for drones and targets as pure component
//! manipulation: no ECS dependency, no store access. Cross-entity
//! references (follow target, teammate, kamikaze prey) are resolved
//! through a caller-built [`ContactTable`]; a missing reference is the
//! defined fallback to random search, never an error.

use std::collections::HashMap;

use glam::DVec3;

use skywatch_core::enums::EntityKind;

pub mod drone;
pub mod steering;
pub mod target;

#[cfg(test)]
mod tests;

/// Read-only view of another live entity, keyed by id in the table.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub kind: EntityKind,
    pub position: DVec3,
    pub heading: f64,
    pub destroyed: bool,
}

/// Snapshot of every entity visible to behavior code this tick.
pub type ContactTable = HashMap<String, Contact>;

/// Look up a live (non-destroyed) contact.
pub fn live_contact<'a>(contacts: &'a ContactTable, id: &str) -> Option<&'a Contact> {
    contacts.get(id).filter(|c| !c.destroyed)
}
