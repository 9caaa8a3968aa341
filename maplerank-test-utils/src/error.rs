use maplerank::server::error::{nexon::NexonError, sheets::SheetsError, Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    NexonError(#[from] NexonError),
    #[error(transparent)]
    SheetsError(#[from] SheetsError),
    #[error(transparent)]
    AppError(#[from] Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
