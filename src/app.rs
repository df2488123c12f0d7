//! Application state and core logic

use anyhow::Result;
use base64::Engine;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::api::{PortalApi, PortalClient, RegisterRequest, SubmissionRequest};
use crate::config::PortalConfig;
use crate::session::SessionStore;
use crate::state::{
    AppState, DraftStore, EntryDraft, Form, NoticeLevel, Step, SuccessResult, View,
};

/// Filename-safe rendition of a vehicle number
static FILENAME_SANITIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9-]+").expect("Invalid regex pattern"));

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Portal API client
    api: Box<dyn PortalApi>,
    /// User configuration
    pub config: PortalConfig,
    session_store: SessionStore,
    draft_store: DraftStore,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance against the real backend
    pub fn new(config: PortalConfig) -> Self {
        let api = Box::new(PortalClient::new(config.api_url()));
        Self::with_parts(config, api, SessionStore::new(), DraftStore::new())
    }

    /// Wire an App from its parts (used directly by tests)
    pub fn with_parts(
        config: PortalConfig,
        api: Box<dyn PortalApi>,
        session_store: SessionStore,
        draft_store: DraftStore,
    ) -> Self {
        let mut state = AppState::default();

        // Resume a persisted session and any half-finished form
        if let Some(session) = session_store.load() {
            tracing::info!(user = %session.user.email, "Resuming persisted session");
            state.enter_portal(session);
            if let Some(draft) = draft_store.load() {
                state.entry_form = draft.into_form();
                state.push_notice("Restored your saved entry draft", NoticeLevel::Info);
            }
        }

        Self {
            state,
            api,
            config,
            session_store,
            draft_store,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Stash the in-progress form before the process exits
    pub fn on_exit(&mut self) {
        if self.state.current_view == View::Entry && self.state.is_authenticated() {
            if let Err(err) = self.draft_store.save(&EntryDraft::from_form(&self.state.entry_form))
            {
                tracing::warn!("Failed to save entry draft: {err}");
            }
        }
    }

    /// Handle a key event for the current view
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // One request in flight at a time; input resumes when it settles
        if self.state.loading {
            return Ok(());
        }
        self.state.clear_notice();

        match self.state.current_view {
            View::Login => self.handle_login_key(key).await,
            View::Register => self.handle_register_key(key).await,
            View::Entry => self.handle_entry_key(key).await,
            View::Success => self.handle_success_key(key).await,
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<()> {
        let form = &mut self.state.login_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right if form.is_buttons_row_active() => form.next_button(),
            KeyCode::Enter if form.is_buttons_row_active() => {
                if form.selected_button == 0 {
                    self.sign_in().await;
                } else {
                    self.state.submit_error = None;
                    self.state.current_view = View::Register;
                }
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Esc => self.quit = true,
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn handle_register_key(&mut self, key: KeyEvent) -> Result<()> {
        let form = &mut self.state.register_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right if form.is_buttons_row_active() => form.next_button(),
            KeyCode::Enter if form.is_buttons_row_active() => {
                if form.selected_button == 0 {
                    self.create_account().await;
                } else {
                    self.state.submit_error = None;
                    self.state.current_view = View::Login;
                }
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Esc => {
                self.state.submit_error = None;
                self.state.current_view = View::Login;
            }
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn handle_entry_key(&mut self, key: KeyEvent) -> Result<()> {
        // Sign out from anywhere in the form
        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.sign_out().await;
            return Ok(());
        }

        let form = &mut self.state.entry_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left if form.is_buttons_row_active() => form.prev_button(),
            KeyCode::Right if form.is_buttons_row_active() => form.next_button(),
            KeyCode::Left if form.is_language_active() => form.cycle_language_back(),
            KeyCode::Right if form.is_language_active() => form.cycle_language(),
            KeyCode::Char(' ') if form.is_language_active() => form.cycle_language(),
            KeyCode::Enter if form.is_buttons_row_active() => {
                self.activate_entry_button().await;
            }
            KeyCode::Enter => {
                // Attach on document inputs, otherwise move along
                if let Some(kind) = form.active_document_kind() {
                    form.attach_document(kind);
                } else {
                    form.next_field();
                }
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Delete => {
                if let Some(kind) = form.active_document_kind() {
                    form.clear_document(kind);
                }
            }
            KeyCode::Esc => {
                if form.step != Step::Vehicle {
                    form.previous_step();
                }
            }
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn handle_success_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.sign_out().await;
            return Ok(());
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Esc => self.state.start_new_entry(),
            KeyCode::Char('d') => self.save_qr_again().await,
            _ => {}
        }
        Ok(())
    }

    /// Back/Continue/Submit, depending on step and selection
    async fn activate_entry_button(&mut self) {
        let form = &mut self.state.entry_form;
        let has_back = form.step != Step::Vehicle;
        let is_back = has_back && form.selected_button == 0;

        if is_back {
            form.previous_step();
            return;
        }
        if form.step == Step::Documents {
            self.submit_entry().await;
            return;
        }
        if form.advance_step() {
            let draft = EntryDraft::from_form(&self.state.entry_form);
            if let Err(err) = self.draft_store.save(&draft) {
                tracing::warn!("Failed to save entry draft: {err}");
            }
        } else {
            self.state.push_notice(
                "Please fill in all required fields before proceeding.",
                NoticeLevel::Warning,
            );
        }
    }

    async fn sign_in(&mut self) {
        if !self.state.login_form.validate() {
            return;
        }
        let email = self.state.login_form.email.as_str().trim().to_string();
        let password = self.state.login_form.password.as_str().to_string();

        self.state.loading = true;
        let result = self.api.login(&email, &password).await;
        self.state.loading = false;

        match result {
            Ok(session) => {
                if let Err(err) = self.session_store.save(&session) {
                    tracing::warn!("Failed to persist session: {err}");
                }
                let username = session.user.username.clone();
                self.state.enter_portal(session);
                if let Some(draft) = self.draft_store.load() {
                    self.state.entry_form = draft.into_form();
                    self.state
                        .push_notice("Restored your saved entry draft", NoticeLevel::Info);
                } else {
                    self.state
                        .push_notice(format!("Signed in as {username}"), NoticeLevel::Info);
                }
            }
            Err(err) => {
                tracing::warn!("Login failed: {err}");
                self.state.submit_error = Some(err.to_string());
            }
        }
    }

    async fn create_account(&mut self) {
        if !self.state.register_form.validate() {
            return;
        }
        let form = &self.state.register_form;
        let request = RegisterRequest {
            email: form.email.as_str().trim().to_string(),
            username: form.username.as_str().trim().to_string(),
            password: form.password.as_str().to_string(),
            verify_password: form.verify_password.as_str().to_string(),
            phone: form.phone.as_str().to_string(),
            company_name: form.company_name.as_str().trim().to_string(),
        };

        self.state.loading = true;
        let result = self.api.register(&request).await;
        self.state.loading = false;

        match result {
            Ok(session) => {
                if let Err(err) = self.session_store.save(&session) {
                    tracing::warn!("Failed to persist session: {err}");
                }
                let username = session.user.username.clone();
                self.state.enter_portal(session);
                self.state
                    .push_notice(format!("Welcome, {username}"), NoticeLevel::Info);
            }
            Err(err) => {
                tracing::warn!("Registration failed: {err}");
                self.state.submit_error = Some(err.to_string());
            }
        }
    }

    async fn sign_out(&mut self) {
        // Backend invalidation is best-effort; local state clears regardless
        if let Some(session) = &self.state.session {
            if let Err(err) = self.api.logout(&session.refresh_token).await {
                tracing::warn!("Logout call failed: {err}");
            }
        }
        if let Err(err) = self.session_store.clear() {
            tracing::warn!("Failed to clear persisted session: {err}");
        }
        if let Err(err) = self.draft_store.clear() {
            tracing::warn!("Failed to clear entry draft: {err}");
        }
        self.state.sign_out();
    }

    /// Assemble the wire request from a fully validated form
    fn build_submission_request(&self) -> Option<SubmissionRequest> {
        let form = &self.state.entry_form;
        if !form.documents.is_complete() {
            return None;
        }
        let helper_phone = match form.helper_phone.as_str() {
            "" => None,
            phone => Some(phone.to_string()),
        };
        Some(SubmissionRequest {
            vehicle_number: form.vehicle_number.as_str().trim().to_string(),
            driver_phone: form.driver_phone.as_str().to_string(),
            helper_phone,
            driver_language: form.language.code().to_string(),
            purchase_order: form.documents.purchase_order.clone()?,
            vehicle_papers: form.documents.vehicle_papers.clone()?,
            aadhaar_card: form.documents.aadhaar_card.clone()?,
        })
    }

    /// Validate everything and fire the one multipart request.
    ///
    /// Precondition order matters: a missing session token fails before any
    /// validation or network traffic.
    async fn submit_entry(&mut self) {
        if self.state.loading {
            return;
        }

        let Some(token) = self
            .state
            .session
            .as_ref()
            .and_then(|s| s.bearer_token())
            .map(str::to_string)
        else {
            self.state.submit_error =
                Some("Your session has expired. Please sign in again to submit.".to_string());
            return;
        };

        if let Err(step) = self.state.entry_form.validate_all() {
            self.state.submit_error =
                Some("Please fix the highlighted errors before submitting.".to_string());
            self.state.entry_form.goto_step(step);
            return;
        }

        let Some(request) = self.build_submission_request() else {
            // validate_all guarantees filled slots; treat a gap as a bug
            tracing::error!("Submission request built from incomplete form");
            return;
        };

        self.state.loading = true;
        self.state.submit_error = None;
        let result = self.api.create_submission(&token, &request).await;
        self.state.loading = false;

        match result {
            Ok(receipt) => {
                tracing::info!(vehicle = %receipt.vehicle_number, "Submission accepted");
                let mut success = SuccessResult {
                    qr_code_image: receipt.qr_code_image,
                    vehicle_number: receipt.vehicle_number,
                    driver_phone: receipt.driver_phone,
                    qr_saved_to: None,
                };
                match self.persist_qr(&success.qr_code_image, &success.vehicle_number).await {
                    Ok(path) => success.qr_saved_to = Some(path),
                    Err(err) => {
                        tracing::warn!("Could not write QR image: {err}");
                        self.state.push_notice(
                            "Unable to save the QR code image to disk.",
                            NoticeLevel::Warning,
                        );
                    }
                }
                if let Err(err) = self.draft_store.clear() {
                    tracing::warn!("Failed to clear entry draft: {err}");
                }
                self.state.record_success(success);
            }
            Err(err) => {
                tracing::warn!("Submission failed: {err}");
                self.state.submit_error = Some(err.to_string());
            }
        }
    }

    /// Decode or download the QR image and write it next to earlier passes
    async fn persist_qr(&self, source: &str, vehicle_number: &str) -> Result<PathBuf> {
        let bytes = if source.starts_with("data:") {
            decode_data_uri(source)
                .ok_or_else(|| anyhow::anyhow!("QR image data URI is malformed"))?
        } else {
            self.api.fetch_qr_image(source).await?
        };

        let dir = self.config.qr_output_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!(
            "entry-qr-{}.png",
            sanitize_for_filename(vehicle_number)
        ));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Re-save the QR from the success screen
    async fn save_qr_again(&mut self) {
        let Some(success) = self.state.success.clone() else {
            return;
        };
        match self
            .persist_qr(&success.qr_code_image, &success.vehicle_number)
            .await
        {
            Ok(path) => {
                if let Some(s) = self.state.success.as_mut() {
                    s.qr_saved_to = Some(path.clone());
                }
                self.state.push_notice(
                    format!("QR code saved to {}", path.display()),
                    NoticeLevel::Info,
                );
            }
            Err(err) => {
                tracing::warn!("Could not write QR image: {err}");
                self.state.push_notice(
                    "Unable to download QR code. Please try again.",
                    NoticeLevel::Warning,
                );
            }
        }
    }
}

/// `vehicle number` → `vehicle-number`, collapsing runs of other characters
fn sanitize_for_filename(value: &str) -> String {
    let replaced = FILENAME_SANITIZER.replace_all(value, "-");
    let trimmed = replaced.trim_matches('-');
    if trimmed.is_empty() {
        "vehicle".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract the payload of a `data:<mime>;base64,<payload>` URI
fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let (meta, payload) = uri.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}
