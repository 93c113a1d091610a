//! Simulation engine for SKYWATCH.
//!
//! Owns the authoritative world store (hecs ECS world plus selection,
//! groups, logs, and clock), runs the behavior/detection/bounds systems
//! at a fixed tick rate, and produces `WorldSnapshot`s for whatever
//! transport sits above it. Completely headless, enabling deterministic
//! testing.

pub mod engine;
pub mod scenario;
pub mod store;
pub mod systems;

pub use skywatch_core as core;

pub use engine::{SimConfig, SimulationEngine};
pub use store::WorldStore;
