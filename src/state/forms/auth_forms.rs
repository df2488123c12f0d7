//! Login and registration form state

use super::field::FormField;
use super::{ErrorMap, Form};
use crate::state::validate::{validate_email, validate_phone};

/// Sign-in form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub errors: ErrorMap,
    pub active_field_index: usize,
    /// 0 = Sign in, 1 = Register
    pub selected_button: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("email", "Email"),
            password: FormField::secret("password", "Password"),
            errors: ErrorMap::default(),
            active_field_index: 0,
            selected_button: 0,
        }
    }

    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == 2
    }

    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    /// Validate before calling the backend; merges failures into the map
    pub fn validate(&mut self) -> bool {
        let mut clean = true;
        if let Some(message) = validate_email(self.email.as_str()) {
            self.errors.set("email", message);
            clean = false;
        }
        if self.password.as_str().is_empty() {
            self.errors.set("password", "Password is required.".to_string());
            clean = false;
        }
        clean
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.active_field_mut() {
            field.push_char(c);
            let name = field.name;
            self.errors.clear(name);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.pop_char();
            let name = field.name;
            self.errors.clear(name);
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        3 // email, password, buttons
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
    fn active_field_mut(&mut self) -> Option<&mut FormField> {
        match self.active_field_index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }
}

/// Account creation form
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: FormField,
    pub username: FormField,
    pub password: FormField,
    pub verify_password: FormField,
    pub phone: FormField,
    pub company_name: FormField,
    pub errors: ErrorMap,
    pub active_field_index: usize,
    /// 0 = Create account, 1 = Back
    pub selected_button: usize,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("email", "Email"),
            username: FormField::text("username", "Username"),
            password: FormField::secret("password", "Password"),
            verify_password: FormField::secret("verify_password", "Verify Password"),
            phone: FormField::phone("phone", "Phone (+91)"),
            company_name: FormField::text("company_name", "Company Name"),
            errors: ErrorMap::default(),
            active_field_index: 0,
            selected_button: 0,
        }
    }

    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == 6
    }

    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    pub fn validate(&mut self) -> bool {
        let mut clean = true;
        if let Some(message) = validate_email(self.email.as_str()) {
            self.errors.set("email", message);
            clean = false;
        }
        let username = self.username.as_str().trim();
        if username.is_empty() {
            self.errors.set("username", "Username is required.".to_string());
            clean = false;
        } else if username.len() < 3 {
            self.errors
                .set("username", "Username must be at least 3 characters.".to_string());
            clean = false;
        }
        if self.password.as_str().is_empty() {
            self.errors.set("password", "Password is required.".to_string());
            clean = false;
        } else if self.password.as_str().len() < 8 {
            self.errors
                .set("password", "Password must be at least 8 characters.".to_string());
            clean = false;
        }
        if self.verify_password.as_str().is_empty() {
            self.errors.set(
                "verify_password",
                "Please confirm your password.".to_string(),
            );
            clean = false;
        } else if self.verify_password.as_str() != self.password.as_str() {
            self.errors
                .set("verify_password", "Passwords do not match.".to_string());
            clean = false;
        }
        if let Some(message) = validate_phone(self.phone.as_str(), "Phone number") {
            self.errors.set("phone", message);
            clean = false;
        }
        if self.company_name.as_str().trim().is_empty() {
            self.errors
                .set("company_name", "Company name is required.".to_string());
            clean = false;
        }
        clean
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.active_field_mut() {
            field.push_char(c);
            let name = field.name;
            self.errors.clear(name);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.pop_char();
            let name = field.name;
            self.errors.clear(name);
        }
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegisterForm {
    fn field_count(&self) -> usize {
        7 // six fields + buttons
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(6);
    }
    fn active_field_mut(&mut self) -> Option<&mut FormField> {
        match self.active_field_index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.username),
            2 => Some(&mut self.password),
            3 => Some(&mut self.verify_password),
            4 => Some(&mut self.phone),
            5 => Some(&mut self.company_name),
            _ => None,
        }
    }
}
