//! Form field value objects

use crate::state::validate::{normalize_phone, normalize_vehicle_number};

/// Normalization applied to a field after every edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFilter {
    #[default]
    Free,
    /// Uppercased, restricted charset, max 50 chars
    VehicleNumber,
    /// Canonical `+91` form
    Phone,
}

impl InputFilter {
    fn apply(&self, value: &str) -> String {
        match self {
            Self::Free => value.to_string(),
            Self::VehicleNumber => normalize_vehicle_number(value),
            Self::Phone => normalize_phone(value),
        }
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub filter: InputFilter,
    pub is_secret: bool,
}

impl FormField {
    /// Create a new free-text field
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            value: String::new(),
            filter: InputFilter::Free,
            is_secret: false,
        }
    }

    /// Create a masked field for passwords
    pub fn secret(name: &'static str, label: &'static str) -> Self {
        Self {
            is_secret: true,
            ..Self::text(name, label)
        }
    }

    /// Create a vehicle registration field
    pub fn vehicle_number(name: &'static str, label: &'static str) -> Self {
        Self {
            filter: InputFilter::VehicleNumber,
            ..Self::text(name, label)
        }
    }

    /// Create a phone number field
    pub fn phone(name: &'static str, label: &'static str) -> Self {
        Self {
            filter: InputFilter::Phone,
            ..Self::text(name, label)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Replace the value, normalizing through the field's filter
    pub fn set_value(&mut self, value: &str) {
        self.value = self.filter.apply(value);
    }

    /// Push a character and re-normalize
    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
        self.value = self.filter.apply(&self.value);
    }

    /// Remove the last character and re-normalize
    pub fn pop_char(&mut self) {
        self.value.pop();
        self.value = self.filter.apply(&self.value);
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Get the display value for rendering (masked for secrets)
    pub fn display_value(&self) -> String {
        if self.is_secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
