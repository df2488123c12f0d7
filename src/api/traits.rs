//! Trait abstraction for the portal client to enable mocking in tests

use async_trait::async_trait;

use crate::session::Session;
use crate::state::DocumentFile;

use super::error::ApiError;

/// Account creation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub verify_password: String,
    pub phone: String,
    pub company_name: String,
}

/// Everything a gate-entry submission carries: the validated fields plus
/// the three mandatory documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub vehicle_number: String,
    pub driver_phone: String,
    /// Omitted from the wire when empty
    pub helper_phone: Option<String>,
    pub driver_language: String,
    pub purchase_order: DocumentFile,
    pub vehicle_papers: DocumentFile,
    pub aadhaar_card: DocumentFile,
}

/// Parsed success response for a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// QR image source (data URI or URL)
    pub qr_code_image: String,
    pub vehicle_number: String,
    pub driver_phone: String,
}

/// Trait for portal operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Sign in and return the established session
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// Create an account; the backend signs the new user in
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError>;

    /// Best-effort token invalidation on the backend
    async fn logout(&self, refresh_token: &str) -> Result<(), ApiError>;

    /// Multipart submission of the entry form
    async fn create_submission(
        &self,
        token: &str,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, ApiError>;

    /// Fetch a QR image that was returned as a URL rather than a data URI
    async fn fetch_qr_image(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
