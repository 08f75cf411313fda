mod client;
pub mod dto;
mod error;

pub use client::{ApiClient, RetryConfig};
pub use error::{to_domain_error, ApiError, CallKind};
