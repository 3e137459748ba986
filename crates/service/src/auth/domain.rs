use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registered claims the issuer owns; stripped from caller payloads.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Decoded token: the caller's identity payload plus issue/expiry times
/// (seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// The trusted identity used for scoped listings.
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}
