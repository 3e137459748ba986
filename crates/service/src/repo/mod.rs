//! Concrete repository implementations.
//!
//! - `mongo`: the production document store.
//! - `file`: JSON files on disk for local development.

pub mod file;
pub mod mongo;

pub use file::{FileReviewRepository, FileServiceRepository};
pub use mongo::{MongoReviewRepository, MongoServiceRepository};
