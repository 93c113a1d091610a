//! Core types and definitions for the SKYWATCH swarm simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, spawn requests, snapshot views, events, and constants.
//! It has no dependency on the ECS or any runtime machinery.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;
