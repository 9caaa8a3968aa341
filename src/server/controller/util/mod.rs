//! Utility functions for controller request handling.
//!
//! Bearer-token verification for the cron endpoint and lenient query parameter parsing.

pub mod auth;
pub mod query;
