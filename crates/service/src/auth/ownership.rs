use super::domain::Claims;
use super::errors::AuthError;

/// Decide which email a "my reviews" listing may be scoped to.
///
/// The token's `email` claim is authoritative. A requested email that differs
/// is rejected; an absent one falls back to the token's own email, so there is
/// no unscoped path.
pub fn scope_email<'a>(claims: &'a Claims, requested: Option<&str>) -> Result<&'a str, AuthError> {
    let owner = claims.email().ok_or(AuthError::Mismatch)?;
    match requested {
        Some(req) if req != owner => Err(AuthError::Mismatch),
        _ => Ok(owner),
    }
}
