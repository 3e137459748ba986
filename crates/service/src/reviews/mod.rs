//! Reviews: repository abstraction and application service.

pub mod repository;
pub mod service;

pub use repository::ReviewRepository;
pub use service::ReviewService;
