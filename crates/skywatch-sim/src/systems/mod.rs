//! Tick systems that operate on the world store each step.
//!
//! Systems mutate components through the store's hecs world; any event
//! they produce is collected into a buffer and logged after iteration so
//! the store's log methods never fight live query borrows.

pub mod behavior;
pub mod bounds;
pub mod cleanup;
pub mod detection;
pub mod snapshot;
