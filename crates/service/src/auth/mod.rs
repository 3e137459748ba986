//! Auth module: stateless bearer tokens and the ownership rule.
//!
//! - `domain`: decoded claims.
//! - `service`: token issuing and verification.
//! - `ownership`: scoping a listing to the verified identity.

pub mod domain;
pub mod errors;
pub mod ownership;
pub mod service;

pub use domain::Claims;
pub use errors::AuthError;
pub use service::TokenService;
