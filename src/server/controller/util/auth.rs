use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::server::error::auth::AuthError;

/// Checks the `Authorization: Bearer <secret>` header of a cron request.
///
/// # Returns
/// - `Ok(())` - The header carries exactly `secret`
/// - `Err(AuthError::MissingCronToken)` - No `Authorization` header
/// - `Err(AuthError::InvalidCronToken)` - Wrong scheme or wrong secret
pub fn verify_cron_token(headers: &HeaderMap, secret: &str) -> Result<(), AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingCronToken);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidCronToken)?;

    if secret.is_empty() || token != secret {
        return Err(AuthError::InvalidCronToken);
    }

    Ok(())
}
