//! Service layer for the visa consultancy API.
//! - Repository traits per collection with MongoDB, JSON-file and in-memory implementations.
//! - Application services that validate input before touching the store.
//! - Stateless bearer tokens and the ownership rule for scoped listings.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod reviews;
pub mod repo;
pub mod runtime;
pub mod storage;

pub use errors::ServiceError;
