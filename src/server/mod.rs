//! Server application core modules.
//!
//! HTTP routing, the combat-power refresh pipeline, the Nexon OpenAPI and Google Sheets
//! clients, and the optional in-process scheduler.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod nexon;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod sheets;
pub mod startup;
pub mod util;
