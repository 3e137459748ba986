pub mod errors;
pub mod db;
pub mod id;
pub mod date;
pub mod visa_service;
pub mod review;

pub use errors::ModelError;
pub use review::{NewReview, Review, ReviewPatch};
pub use visa_service::{NewVisaService, VisaService};
