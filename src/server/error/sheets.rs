//! Google Sheets error types.
//!
//! Any of these reaching the refresh orchestrator aborts the run; work persisted by earlier
//! batches stays committed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decoding).
    #[error("Google Sheets request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Google returned a non-2xx status code.
    #[error("Google Sheets API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Signing the service-account assertion failed (usually a malformed private key).
    #[error("Failed to sign Google service account assertion: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
