//! Offered visa services: repository abstraction and application service.

pub mod repository;
pub mod service;

pub use repository::ServiceRepository;
pub use service::CatalogService;
