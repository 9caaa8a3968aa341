//! Shared fixtures for maplerank integration tests.
//!
//! - [`fixtures::game_api::FakeGameApi`] and [`fixtures::store::MemoryTableStore`] stand in for
//!   the Nexon API and the spreadsheet when exercising the refresh pipeline
//! - [`TestSetup`] wraps a mockito server for testing the HTTP clients themselves
//! - [`fixtures::factory`] builds records with sensible defaults

pub mod error;
pub mod fixtures;
pub mod setup;

pub use error::TestError;
pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{
        fixtures::{
            factory,
            game_api::{FakeGameApi, StatResponse},
            store::{MemoryTableStore, StoreCall},
        },
        TestError, TestSetup,
    };
}
