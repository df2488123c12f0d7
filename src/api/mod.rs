//! Portal API client module

mod client;
mod error;
mod traits;

pub use client::PortalClient;
pub use error::ApiError;
pub use traits::{PortalApi, RegisterRequest, SubmissionReceipt, SubmissionRequest};

#[cfg(test)]
pub use traits::MockPortalApi;
