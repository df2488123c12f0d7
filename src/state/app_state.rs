//! Application state definitions

use std::path::PathBuf;

use crate::session::Session;

use super::forms::{EntryForm, LoginForm, RegisterForm};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Register,
    Entry,
    Success,
}

/// Severity of a transient notice shown above the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Transient toast-style message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

/// Ephemeral result of a successful submission; replaces the form view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessResult {
    /// QR image source as returned by the server (data URI or URL)
    pub qr_code_image: String,
    pub vehicle_number: String,
    pub driver_phone: String,
    /// Where the decoded QR image landed on disk, once written
    pub qr_saved_to: Option<PathBuf>,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    pub current_view: View,

    // Forms
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    pub entry_form: EntryForm,

    // Auth
    pub session: Option<Session>,

    // Submission lifecycle
    /// True while a request is in flight; blocks re-submission
    pub loading: bool,
    /// Form-level banner for submission/auth failures
    pub submit_error: Option<String>,
    pub success: Option<SuccessResult>,

    // UI state
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .and_then(Session::bearer_token)
            .is_some()
    }

    pub fn push_notice(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            message: message.into(),
            level,
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Enter the signed-in portal view
    pub fn enter_portal(&mut self, session: Session) {
        self.session = Some(session);
        self.login_form = LoginForm::new();
        self.register_form = RegisterForm::new();
        self.submit_error = None;
        self.current_view = View::Entry;
    }

    /// Record a successful submission and swap the form out for the result
    pub fn record_success(&mut self, result: SuccessResult) {
        self.success = Some(result);
        self.submit_error = None;
        self.entry_form = EntryForm::new();
        self.current_view = View::Success;
    }

    /// Start a fresh entry after viewing a success result
    pub fn start_new_entry(&mut self) {
        self.success = None;
        self.submit_error = None;
        self.entry_form = EntryForm::new();
        self.current_view = View::Entry;
    }

    /// Drop the session and all portal state, back to the login screen
    pub fn sign_out(&mut self) {
        self.session = None;
        self.entry_form = EntryForm::new();
        self.login_form = LoginForm::new();
        self.register_form = RegisterForm::new();
        self.success = None;
        self.submit_error = None;
        self.notice = None;
        self.current_view = View::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            user: User {
                email: "ops@gatepass.io".to_string(),
                username: "gatekeeper".to_string(),
                phone: None,
                company_name: None,
            },
        }
    }

    #[test]
    fn test_default_starts_on_login() {
        let state = AppState::default();
        assert_eq!(state.current_view, View::Login);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_enter_portal_switches_view_and_resets_auth_forms() {
        let mut state = AppState::default();
        state.login_form.email.set_value("ops@gatepass.io");
        state.enter_portal(session());

        assert_eq!(state.current_view, View::Entry);
        assert!(state.is_authenticated());
        assert_eq!(state.login_form.email.as_str(), "");
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let mut state = AppState::default();
        let mut s = session();
        s.access_token.clear();
        state.session = Some(s);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_record_success_replaces_form_view() {
        let mut state = AppState::default();
        state.enter_portal(session());
        state.entry_form.vehicle_number.set_value("MH 12 AB 1234");
        state.submit_error = Some("old banner".to_string());

        state.record_success(SuccessResult {
            qr_code_image: "data:image/png;base64,QQ==".to_string(),
            vehicle_number: "MH 12 AB 1234".to_string(),
            driver_phone: "+919876543210".to_string(),
            qr_saved_to: None,
        });

        assert_eq!(state.current_view, View::Success);
        assert!(state.submit_error.is_none());
        assert_eq!(state.entry_form.vehicle_number.as_str(), "");
    }

    #[test]
    fn test_start_new_entry_clears_success() {
        let mut state = AppState::default();
        state.enter_portal(session());
        state.record_success(SuccessResult {
            qr_code_image: "data:...".to_string(),
            vehicle_number: "MH".to_string(),
            driver_phone: "+91".to_string(),
            qr_saved_to: None,
        });

        state.start_new_entry();
        assert_eq!(state.current_view, View::Entry);
        assert!(state.success.is_none());
    }

    #[test]
    fn test_sign_out_resets_everything() {
        let mut state = AppState::default();
        state.enter_portal(session());
        state.entry_form.vehicle_number.set_value("MH 12");
        state.push_notice("hello", NoticeLevel::Info);

        state.sign_out();
        assert_eq!(state.current_view, View::Login);
        assert!(state.session.is_none());
        assert!(state.notice.is_none());
        assert_eq!(state.entry_form.vehicle_number.as_str(), "");
    }
}
