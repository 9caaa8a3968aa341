//! Utility functions shared by the refresh pipeline and schedulers.

pub mod time;
