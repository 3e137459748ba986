use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::domain::{Claims, RESERVED_CLAIMS};
use super::errors::AuthError;

/// Issues and verifies HS256 access tokens with a server-held secret.
///
/// Holds no per-token state: verification depends only on the token and the
/// secret.
///
/// # Examples
/// ```
/// use service::auth::TokenService;
/// let svc = TokenService::new("secret", chrono::Duration::hours(24)).unwrap();
/// let mut payload = serde_json::Map::new();
/// payload.insert("email".into(), "a@x.com".into());
/// let token = svc.issue(payload.clone()).unwrap();
/// assert_eq!(svc.verify(&token).unwrap().identity, payload);
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Config("empty signing secret".into()));
        }
        if ttl <= Duration::zero() {
            return Err(AuthError::Config("token ttl must be positive".into()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Result<Self, AuthError> {
        Self::new(&cfg.jwt_secret, Duration::hours(cfg.token_ttl_hours))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `payload` as-is, stamped with `iat` and `exp = iat + ttl`.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String, AuthError> {
        self.issue_at(payload, Utc::now())
    }

    #[instrument(skip_all, fields(issued_at = %issued_at))]
    pub fn issue_at(&self, mut payload: Map<String, Value>, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        for key in RESERVED_CLAIMS {
            payload.remove(key);
        }
        let claims = Claims {
            identity: payload,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        debug!(exp = claims.exp, "token_issued");
        Ok(token)
    }

    /// Check signature and expiry (no leeway) and return the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        // audience is whatever the caller put in the payload; it is never asserted
        validation.validate_aud = false;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Invalid(e.to_string()))
    }

    /// Gate decision for a raw `Authorization` header value.
    pub fn verify_authorization(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::Missing)?;
        let token = bearer_token(header).ok_or_else(|| AuthError::Invalid("expected `Bearer <token>`".into()))?;
        self.verify(token)
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
