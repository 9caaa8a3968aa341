use reqwest::StatusCode;

use super::{nexon::NexonError, sheets::SheetsError, Error};

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently (determinate answer or bad request)
    Fail,
}

/// Errors that know whether repeating the failed operation can help.
pub trait Retryable {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy;
}

impl Retryable for NexonError {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        // 404 is a determinate answer for the OCID; every other failure, including rate
        // limiting and 5xx, is treated as transient.
        if self.is_not_found() {
            ErrorRetryStrategy::Fail
        } else {
            ErrorRetryStrategy::Retry
        }
    }
}

impl Retryable for SheetsError {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::Request(err) => match err.status() {
                Some(status) => status_strategy(status),
                // Network error or connection issue
                None => ErrorRetryStrategy::Retry,
            },
            Self::Status { status, .. } => status_strategy(*status),
            // A malformed key won't fix itself between attempts
            Self::Token(_) => ErrorRetryStrategy::Fail,
        }
    }
}

impl Retryable for Error {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::NexonError(err) => err.to_retry_strategy(),
            Self::SheetsError(err) => err.to_retry_strategy(),
            Self::IoError(_) => ErrorRetryStrategy::Retry,
            Self::ConfigError(_)
            | Self::AuthError(_)
            | Self::BadRequest(_)
            | Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}

fn status_strategy(status: StatusCode) -> ErrorRetryStrategy {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        ErrorRetryStrategy::Retry
    } else {
        ErrorRetryStrategy::Fail
    }
}
