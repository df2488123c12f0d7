//! HTTP client for the gate-entry portal backend
//!
//! Thin reqwest wrapper: every call attaches the bearer token where one is
//! required, sends JSON or multipart, and funnels non-success statuses
//! through the shared error-message extraction.

use reqwest::multipart;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::{Session, User};
use crate::state::{DocumentFile, DocumentKind};

use super::error::{error_message, ApiError};
use super::traits::{PortalApi, RegisterRequest, SubmissionReceipt, SubmissionRequest};

/// Client for the portal REST API
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    /// Create a new client for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_response(response: reqwest::Response) -> Result<(u16, String), ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::Network)?;
        Ok((status, body))
    }

    fn ensure_success(status: u16, body: &str) -> Result<(), ApiError> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(ApiError::Status {
                status,
                message: error_message(status, body),
            })
        }
    }

    async fn document_part(file: &DocumentFile) -> Result<multipart::Part, ApiError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| ApiError::Document {
                file: file.file_name.clone(),
                source,
            })?;
        multipart::Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(file.kind.mime())
            .map_err(ApiError::Network)
    }
}

#[async_trait::async_trait]
impl PortalApi for PortalClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.endpoint("auth/login/"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ApiError::Network)?;

        let (status, body) = Self::read_response(response).await?;
        Self::ensure_success(status, &body)?;
        parse_auth_session(&body)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.endpoint("auth/register/"))
            .json(&json!({
                "email": request.email.as_str(),
                "username": request.username.as_str(),
                "password": request.password.as_str(),
                "verify_password": request.verify_password.as_str(),
                "phone": request.phone.as_str(),
                "company_name": request.company_name.as_str(),
            }))
            .send()
            .await
            .map_err(ApiError::Network)?;

        let (status, body) = Self::read_response(response).await?;
        Self::ensure_success(status, &body)?;
        parse_auth_session(&body)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("auth/logout/"))
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await
            .map_err(ApiError::Network)?;

        let (status, body) = Self::read_response(response).await?;
        Self::ensure_success(status, &body)
    }

    async fn create_submission(
        &self,
        token: &str,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, ApiError> {
        let mut form = multipart::Form::new()
            .text("vehicle_number", request.vehicle_number.clone())
            .text("driver_phone", request.driver_phone.clone())
            .text("driver_language", request.driver_language.clone());

        if let Some(helper_phone) = &request.helper_phone {
            if !helper_phone.is_empty() {
                form = form.text("helper_phone", helper_phone.clone());
            }
        }

        let documents = [
            (DocumentKind::PurchaseOrder, &request.purchase_order),
            (DocumentKind::VehiclePapers, &request.vehicle_papers),
            (DocumentKind::AadhaarCard, &request.aadhaar_card),
        ];
        for (kind, file) in documents {
            form = form.part(kind.part_name(), Self::document_part(file).await?);
        }

        tracing::debug!(
            vehicle = %request.vehicle_number,
            "Submitting gate-entry request"
        );

        let response = self
            .http
            .post(self.endpoint("submissions/create/"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let (status, body) = Self::read_response(response).await?;
        Self::ensure_success(status, &body)?;
        parse_submission_response(&body, request)
    }

    async fn fetch_qr_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ApiError::Status {
                status,
                message: "Unable to download QR code.".to_string(),
            });
        }
        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        Ok(bytes.to_vec())
    }
}

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Deserialize)]
struct AuthEnvelope {
    user: User,
    tokens: TokenPair,
}

/// Parse the `{ user, tokens: { access, refresh } }` auth envelope
fn parse_auth_session(body: &str) -> Result<Session, ApiError> {
    let envelope: AuthEnvelope =
        serde_json::from_str(body).map_err(|_| ApiError::UnexpectedResponse)?;
    Ok(Session {
        access_token: envelope.tokens.access,
        refresh_token: envelope.tokens.refresh,
        user: envelope.user,
    })
}

/// First non-empty string value among the given keys
fn string_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Parse a submission success body.
///
/// The backend wraps the submission object in an envelope in newer
/// deployments and returns it bare in older ones, with either camelCase
/// or snake_case keys; missing echo fields fall back to what was sent.
/// A body without a QR image is `MissingQr` even on HTTP 200.
fn parse_submission_response(
    body: &str,
    request: &SubmissionRequest,
) -> Result<SubmissionReceipt, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|_| ApiError::UnexpectedResponse)?;
    let submission = value.get("submission").unwrap_or(&value);

    let qr_code_image = string_field(submission, &["qrCodeImage", "qr_code_image"])
        .ok_or(ApiError::MissingQr)?
        .to_string();
    let vehicle_number = string_field(submission, &["vehicleNumber", "vehicle_number"])
        .unwrap_or(&request.vehicle_number)
        .to_string();
    let driver_phone = string_field(submission, &["driverPhone", "driver_phone"])
        .unwrap_or(&request.driver_phone)
        .to_string();

    Ok(SubmissionReceipt {
        qr_code_image,
        vehicle_number,
        driver_phone,
    })
}
