//! Combat-power refresh pipeline.
//!
//! [`refresh::RefreshOrchestrator`] walks the identifier list in batches under a time budget and
//! persists after every batch; [`batch::BatchProcessor`] fetches one batch from the game API.

pub mod batch;
pub mod config;
pub mod refresh;

pub use batch::{BatchProcessor, BatchResult, FetchOutcome};
pub use refresh::{RefreshOrchestrator, RefreshOutcome, StoppedReason};
