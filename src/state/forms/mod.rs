//! Form domain layer
//!
//! Field value objects, per-form state structs, and the error map shared
//! by all of them.

mod auth_forms;
mod entry_form;
mod field;

pub use auth_forms::*;
pub use entry_form::*;
pub use field::*;

use std::collections::HashMap;

/// Field name → human-readable message.
///
/// Entries are merged in on validation failure and cleared one field at a
/// time as the user edits, so unrelated errors survive a partial fix.
#[derive(Debug, Clone, Default)]
pub struct ErrorMap {
    entries: HashMap<&'static str, String>,
}

impl ErrorMap {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &'static str, message: String) {
        self.entries.insert(field, message);
    }

    /// Clear a single field's error (called on edit)
    pub fn clear(&mut self, field: &str) {
        self.entries.remove(field);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any of the given fields currently has an error
    pub fn any_of(&self, fields: &[&'static str]) -> bool {
        fields.iter().any(|f| self.entries.contains_key(f))
    }
}

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    /// The text field at the cursor, if the cursor is on one
    fn active_field_mut(&mut self) -> Option<&mut FormField>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_map_merge_and_clear() {
        let mut errors = ErrorMap::default();
        errors.set("vehicle_number", "Vehicle number is required.".to_string());
        errors.set("driver_phone", "Driver phone number is required.".to_string());
        assert_eq!(errors.len(), 2);

        errors.clear("vehicle_number");
        assert!(errors.get("vehicle_number").is_none());
        assert_eq!(
            errors.get("driver_phone"),
            Some("Driver phone number is required.")
        );
    }

    #[test]
    fn test_error_map_any_of() {
        let mut errors = ErrorMap::default();
        errors.set("helper_phone", "bad".to_string());
        assert!(errors.any_of(&["driver_phone", "helper_phone"]));
        assert!(!errors.any_of(&["vehicle_number"]));
    }
}
