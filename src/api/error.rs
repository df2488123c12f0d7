//! API error taxonomy
//!
//! Distinguishes transport failures, server rejections, and the one odd
//! case the portal cares about: an HTTP 200 whose body carries no QR
//! image.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error status; the message is the
    /// best-effort server-provided text.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never completed
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] reqwest::Error),

    /// An attached document vanished or became unreadable before upload
    #[error("Could not read {file}. Re-attach the document and try again.")]
    Document {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP 200 but no QR image in the body
    #[error("Submission succeeded but QR code is unavailable. Contact support.")]
    MissingQr,

    /// A success response that could not be interpreted
    #[error("The server returned an unexpected response.")]
    UnexpectedResponse,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Best-effort human message for an error response body.
///
/// Prefers the server's own `error`/`message` text, then a flattened view
/// of a 400 field-error object, then a status-specific fallback.
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if let Some(value) = &parsed {
        if let Some(text) = value.get("error").and_then(|v| v.as_str()) {
            return text.to_string();
        }
        if let Some(text) = value.get("message").and_then(|v| v.as_str()) {
            return text.to_string();
        }
        if status == 400 {
            if let Some(object) = value.as_object() {
                let field_errors: Vec<String> = object
                    .iter()
                    .map(|(field, errors)| {
                        let joined = match errors {
                            serde_json::Value::Array(items) => items
                                .iter()
                                .filter_map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                            other => other.as_str().unwrap_or_default().to_string(),
                        };
                        format!("{field}: {joined}")
                    })
                    .collect();
                if !field_errors.is_empty() {
                    return format!("Validation errors:\n{}", field_errors.join("\n"));
                }
            }
        }
    }

    match status {
        401 => "Authentication failed. Please sign in again.".to_string(),
        403 => "You don't have permission to perform this action.".to_string(),
        500..=599 => "Server error. Please try again later.".to_string(),
        _ => "Unable to submit entry. Please try again.".to_string(),
    }
}
