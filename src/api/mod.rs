pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use client::{ApiClient, JobOrderApi};
pub use error::ApiError;
pub use types::Ack;
