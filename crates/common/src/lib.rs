pub mod types;
pub mod utils;
pub mod env;

pub use types::{ApiResponse, Health};
