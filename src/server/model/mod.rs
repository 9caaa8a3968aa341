//! Server application models and type definitions.
//!
//! This module contains the shared application state handed to HTTP handlers and the scheduler,
//! and the typed records that flow through the combat-power refresh pipeline.

pub mod app;
pub mod combat_power;
