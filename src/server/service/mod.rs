//! Service layer for business logic and orchestration.
//!
//! Services coordinate the game API and the spreadsheet store. They borrow their collaborators
//! as trait objects, so handlers build them per request from the shared application state.

pub mod character;
pub mod combat_power;
pub mod leaderboard;
pub mod retry;
