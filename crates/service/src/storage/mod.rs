//! Storage abstractions for service layer
//!
//! Contains the JSON file-backed map used by the file document backend.

pub mod json_map_store;
