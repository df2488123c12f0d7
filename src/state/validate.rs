//! Field validation and input normalization
//!
//! All functions here are pure. The normalizers are idempotent and are
//! applied after every keystroke, so a field value is always in canonical
//! form by the time a validator sees it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Vehicle registrations: uppercase letters, digits, hyphens, spaces.
static VEHICLE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9\- ]+$").expect("Invalid regex pattern"));

/// Indian mobile numbers in canonical form.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+91\d{10}$").expect("Invalid regex pattern"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"));

/// Maximum length of a vehicle registration number
pub const VEHICLE_NUMBER_MAX: usize = 50;

/// Uppercase, strip anything outside `[A-Z0-9- ]`, truncate to 50 chars.
pub fn normalize_vehicle_number(input: &str) -> String {
    input
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-' || *c == ' ')
        .take(VEHICLE_NUMBER_MAX)
        .collect()
}

/// Canonicalize a phone number to `+91` followed by up to 10 digits.
///
/// Non-digits are stripped, one leading country code `91` is dropped, and
/// the remainder is truncated to 10 digits. Empty input stays empty.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    let without_country = digits.strip_prefix("91").unwrap_or(&digits);
    let trimmed: String = without_country.chars().take(10).collect();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("+91{trimmed}")
    }
}

/// Validate a vehicle registration number, returning an error message on failure.
pub fn validate_vehicle_number(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Vehicle number is required.".to_string());
    }
    if trimmed.len() < 2 || trimmed.len() > VEHICLE_NUMBER_MAX {
        return Some("Vehicle number must be between 2 and 50 characters.".to_string());
    }
    if !VEHICLE_NUMBER_RE.is_match(trimmed) {
        return Some("Use only uppercase letters, numbers, spaces, or hyphens.".to_string());
    }
    None
}

/// Validate a required phone number against the `+91XXXXXXXXXX` form.
pub fn validate_phone(value: &str, label: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{label} is required."));
    }
    if !PHONE_RE.is_match(value) {
        return Some(format!("{label} must follow +91XXXXXXXXXX format."));
    }
    None
}

/// Validate an optional phone number: empty is fine, anything else must be canonical.
pub fn validate_optional_phone(value: &str, label: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if !PHONE_RE.is_match(value) {
        return Some(format!("{label} must follow +91XXXXXXXXXX format."));
    }
    None
}

/// Validate an email address.
pub fn validate_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Email is required.".to_string());
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Some("Enter a valid email address.".to_string());
    }
    None
}
