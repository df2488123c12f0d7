//! The three-step gate-entry form

use super::field::FormField;
use super::{ErrorMap, Form};
use crate::state::documents::{inspect_file, DocumentKind, DocumentSet};
use crate::state::validate::{validate_optional_phone, validate_phone, validate_vehicle_number};
use std::path::Path;

/// Preferred contact language for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageCode {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Kn,
    Ml,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::En,
        LanguageCode::Hi,
        LanguageCode::Ta,
        LanguageCode::Te,
        LanguageCode::Kn,
        LanguageCode::Ml,
    ];

    /// Wire code sent to the backend
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Kn => "kn",
            Self::Ml => "ml",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::En => "English (en)",
            Self::Hi => "Hindi (hi)",
            Self::Ta => "Tamil (ta)",
            Self::Te => "Telugu (te)",
            Self::Kn => "Kannada (kn)",
            Self::Ml => "Malayalam (ml)",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The fixed step sequence of the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Vehicle,
    Driver,
    Documents,
}

impl Step {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            Self::Vehicle => 0,
            Self::Driver => 1,
            Self::Documents => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle Information",
            Self::Driver => "Driver Information",
            Self::Documents => "Document Uploads",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Vehicle => "Identify the vehicle entering the facility",
            Self::Driver => "Capture driver contact preferences",
            Self::Documents => "Provide mandatory verification documents",
        }
    }

    /// Fields owned by this step, by name
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Vehicle => &["vehicle_number"],
            Self::Driver => &["driver_phone", "helper_phone", "driver_language"],
            Self::Documents => &["purchase_order", "vehicle_papers", "aadhaar_card"],
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Vehicle => Some(Self::Driver),
            Self::Driver => Some(Self::Documents),
            Self::Documents => None,
        }
    }

    pub fn prev(&self) -> Option<Self> {
        match self {
            Self::Vehicle => None,
            Self::Driver => Some(Self::Vehicle),
            Self::Documents => Some(Self::Driver),
        }
    }
}

/// Multi-step entry form state
#[derive(Debug, Clone)]
pub struct EntryForm {
    pub vehicle_number: FormField,
    pub driver_phone: FormField,
    pub helper_phone: FormField,
    pub language: LanguageCode,
    /// Path inputs for the three document slots
    pub purchase_order_input: FormField,
    pub vehicle_papers_input: FormField,
    pub aadhaar_card_input: FormField,
    pub documents: DocumentSet,
    pub errors: ErrorMap,
    pub step: Step,
    pub active_field_index: usize,
    /// Which button is selected when on the buttons row (Back/Continue/Submit)
    pub selected_button: usize,
}

impl EntryForm {
    pub fn new() -> Self {
        Self {
            vehicle_number: FormField::vehicle_number("vehicle_number", "Vehicle Number"),
            driver_phone: FormField::phone("driver_phone", "Driver Phone (+91)"),
            helper_phone: FormField::phone("helper_phone", "Helper Phone (+91, optional)"),
            language: LanguageCode::default(),
            purchase_order_input: FormField::text("purchase_order", "Purchase Order (path)"),
            vehicle_papers_input: FormField::text("vehicle_papers", "Vehicle Papers (path)"),
            aadhaar_card_input: FormField::text("aadhaar_card", "Driver Aadhaar Card (path)"),
            documents: DocumentSet::default(),
            errors: ErrorMap::default(),
            step: Step::default(),
            active_field_index: 0,
            selected_button: 0,
        }
    }

    /// Returns true if the buttons row is currently active
    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == self.field_count() - 1
    }

    /// Number of buttons on the current step's buttons row
    pub fn button_count(&self) -> usize {
        match self.step {
            Step::Vehicle => 1, // Continue
            Step::Driver | Step::Documents => 2, // Back, Continue/Submit
        }
    }

    /// Move to the next button (wraps around)
    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % self.button_count();
    }

    /// Move to the previous button (wraps around)
    pub fn prev_button(&mut self) {
        if self.selected_button == 0 {
            self.selected_button = self.button_count() - 1;
        } else {
            self.selected_button -= 1;
        }
    }

    /// Whether the cursor sits on the language selector
    pub fn is_language_active(&self) -> bool {
        self.step == Step::Driver && self.active_field_index == 2
    }

    /// The document slot under the cursor, if on the documents step
    pub fn active_document_kind(&self) -> Option<DocumentKind> {
        if self.step != Step::Documents {
            return None;
        }
        match self.active_field_index {
            0 => Some(DocumentKind::PurchaseOrder),
            1 => Some(DocumentKind::VehiclePapers),
            2 => Some(DocumentKind::AadhaarCard),
            _ => None,
        }
    }

    fn document_input(&self, kind: DocumentKind) -> &FormField {
        match kind {
            DocumentKind::PurchaseOrder => &self.purchase_order_input,
            DocumentKind::VehiclePapers => &self.vehicle_papers_input,
            DocumentKind::AadhaarCard => &self.aadhaar_card_input,
        }
    }

    pub fn document_input_mut(&mut self, kind: DocumentKind) -> &mut FormField {
        match kind {
            DocumentKind::PurchaseOrder => &mut self.purchase_order_input,
            DocumentKind::VehiclePapers => &mut self.vehicle_papers_input,
            DocumentKind::AadhaarCard => &mut self.aadhaar_card_input,
        }
    }

    /// Type a character into the field under the cursor, clearing its error
    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.active_field_mut() {
            field.push_char(c);
            let name = field.name;
            self.errors.clear(name);
        }
    }

    /// Backspace in the field under the cursor, clearing its error
    pub fn backspace(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.pop_char();
            let name = field.name;
            self.errors.clear(name);
        }
    }

    /// Cycle the language selector forward
    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
        self.errors.clear("driver_language");
    }

    /// Cycle the language selector backward
    pub fn cycle_language_back(&mut self) {
        self.language = self.language.prev();
        self.errors.clear("driver_language");
    }

    /// Attach the file named by a slot's path input.
    ///
    /// Browse-style and drop-style selection both land here. Terminals
    /// paste dropped paths shell-quoted, so surrounding quotes are
    /// stripped. Rejected files set the slot's error and leave the slot
    /// untouched; accepted files overwrite the slot and clear any prior
    /// error.
    pub fn attach_document(&mut self, kind: DocumentKind) {
        let path = self
            .document_input(kind)
            .as_str()
            .trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string();
        if path.is_empty() {
            self.errors
                .set(kind.part_name(), format!("{} is required.", kind.label()));
            return;
        }
        self.attach_document_path(kind, Path::new(&path));
    }

    /// Single intake handler for a concrete path (typed or dropped)
    pub fn attach_document_path(&mut self, kind: DocumentKind, path: &Path) {
        match inspect_file(path) {
            Ok(file) => {
                self.document_input_mut(kind)
                    .set_value(&path.to_string_lossy());
                self.documents.set(kind, file);
                self.errors.clear(kind.part_name());
            }
            Err(err) => {
                self.errors.set(kind.part_name(), err.to_string());
            }
        }
    }

    /// Empty a slot and its path input
    pub fn clear_document(&mut self, kind: DocumentKind) {
        self.documents.clear(kind);
        self.document_input_mut(kind).clear();
        self.errors.clear(kind.part_name());
    }

    /// Compute the validation error for one field, if any
    fn field_error(&self, name: &str) -> Option<String> {
        match name {
            "vehicle_number" => validate_vehicle_number(self.vehicle_number.as_str()),
            "driver_phone" => validate_phone(self.driver_phone.as_str(), "Driver phone number"),
            "helper_phone" => {
                validate_optional_phone(self.helper_phone.as_str(), "Helper phone number")
            }
            // The selector always holds a valid variant
            "driver_language" => None,
            "purchase_order" | "vehicle_papers" | "aadhaar_card" => {
                let kind = match name {
                    "purchase_order" => DocumentKind::PurchaseOrder,
                    "vehicle_papers" => DocumentKind::VehiclePapers,
                    _ => DocumentKind::AadhaarCard,
                };
                if self.documents.get(kind).is_none() {
                    Some(format!("{} is required.", kind.label()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Validate a set of fields, merging failures into the error map.
    /// Returns true when every given field is clean.
    fn validate_fields(&mut self, fields: &[&'static str]) -> bool {
        let mut clean = true;
        for &name in fields {
            if let Some(message) = self.field_error(name) {
                self.errors.set(name, message);
                clean = false;
            }
        }
        clean
    }

    /// Validate the current step and advance on success.
    /// A step with unresolved errors never advances.
    pub fn advance_step(&mut self) -> bool {
        if !self.validate_fields(self.step.fields()) {
            return false;
        }
        if let Some(next) = self.step.next() {
            self.step = next;
            self.active_field_index = 0;
            self.selected_button = 0;
            true
        } else {
            false
        }
    }

    /// Go back one step; never validates
    pub fn previous_step(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            self.active_field_index = 0;
            self.selected_button = 0;
        }
    }

    /// Re-validate the union of all fields. On failure returns the first
    /// step owning an error so the caller can jump there.
    pub fn validate_all(&mut self) -> Result<(), Step> {
        let mut clean = true;
        for step in [Step::Vehicle, Step::Driver, Step::Documents] {
            if !self.validate_fields(step.fields()) {
                clean = false;
            }
        }
        if clean {
            return Ok(());
        }
        for step in [Step::Vehicle, Step::Driver, Step::Documents] {
            if self.errors.any_of(step.fields()) {
                return Err(step);
            }
        }
        Ok(())
    }

    /// Jump to a step (used after failed final validation)
    pub fn goto_step(&mut self, step: Step) {
        self.step = step;
        self.active_field_index = 0;
        self.selected_button = 0;
    }
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for EntryForm {
    fn field_count(&self) -> usize {
        // step fields + buttons row
        self.step.fields().len() + 1
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
        self.selected_button = self.button_count().saturating_sub(1);
    }
    fn active_field_mut(&mut self) -> Option<&mut FormField> {
        match (self.step, self.active_field_index) {
            (Step::Vehicle, 0) => Some(&mut self.vehicle_number),
            (Step::Driver, 0) => Some(&mut self.driver_phone),
            (Step::Driver, 1) => Some(&mut self.helper_phone),
            // Driver index 2 is the language selector
            (Step::Documents, 0) => Some(&mut self.purchase_order_input),
            (Step::Documents, 1) => Some(&mut self.vehicle_papers_input),
            (Step::Documents, 2) => Some(&mut self.aadhaar_card_input),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pdf_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"%PDF-1.4 test").expect("write");
        file.flush().expect("flush");
        file
    }

    fn filled_vehicle_step(form: &mut EntryForm) {
        form.vehicle_number.set_value("MH 12 AB 1234");
    }

    fn filled_driver_step(form: &mut EntryForm) {
        form.driver_phone.set_value("9876543210");
    }

    #[test]
    fn test_new_starts_on_vehicle_step() {
        let form = EntryForm::new();
        assert_eq!(form.step, Step::Vehicle);
        assert_eq!(form.active_field_index, 0);
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_advance_blocked_by_empty_vehicle_number() {
        let mut form = EntryForm::new();
        assert!(!form.advance_step());
        assert_eq!(form.step, Step::Vehicle);
        assert_eq!(
            form.errors.get("vehicle_number"),
            Some("Vehicle number is required.")
        );
    }

    #[test]
    fn test_advance_with_valid_vehicle_number() {
        let mut form = EntryForm::new();
        filled_vehicle_step(&mut form);
        assert!(form.advance_step());
        assert_eq!(form.step, Step::Driver);
    }

    #[test]
    fn test_advance_driver_step_requires_driver_phone_only() {
        let mut form = EntryForm::new();
        filled_vehicle_step(&mut form);
        form.advance_step();

        assert!(!form.advance_step());
        assert_eq!(form.step, Step::Driver);
        assert!(form.errors.get("driver_phone").is_some());
        // Helper phone is optional
        assert!(form.errors.get("helper_phone").is_none());

        filled_driver_step(&mut form);
        assert!(form.advance_step());
        assert_eq!(form.step, Step::Documents);
    }

    #[test]
    fn test_partial_helper_phone_blocks_step() {
        let mut form = EntryForm::new();
        filled_vehicle_step(&mut form);
        form.advance_step();
        filled_driver_step(&mut form);
        form.helper_phone.set_value("98765");

        assert!(!form.advance_step());
        assert!(form.errors.get("helper_phone").is_some());
    }

    #[test]
    fn test_unrelated_errors_persist_across_validation() {
        let mut form = EntryForm::new();
        form.errors
            .set("aadhaar_card", "Driver Aadhaar Card is required.".to_string());
        assert!(!form.advance_step());
        // The vehicle-step failure does not erase the documents-step entry
        assert!(form.errors.get("aadhaar_card").is_some());
        assert!(form.errors.get("vehicle_number").is_some());
    }

    #[test]
    fn test_editing_clears_only_that_fields_error() {
        let mut form = EntryForm::new();
        assert!(!form.advance_step());
        form.errors
            .set("driver_phone", "Driver phone number is required.".to_string());

        form.input_char('m');
        assert!(form.errors.get("vehicle_number").is_none());
        assert!(form.errors.get("driver_phone").is_some());
    }

    #[test]
    fn test_attach_document_accepts_and_fills_slot() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);

        form.purchase_order_input
            .set_value(&file.path().to_string_lossy());
        form.attach_document(DocumentKind::PurchaseOrder);

        assert!(form.documents.get(DocumentKind::PurchaseOrder).is_some());
        assert!(form.errors.get("purchase_order").is_none());
    }

    #[test]
    fn test_attach_document_unquotes_dropped_path() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);

        // A drag-dropped path arrives shell-quoted
        form.purchase_order_input
            .set_value(&format!("'{}'", file.path().display()));
        form.attach_document(DocumentKind::PurchaseOrder);

        assert!(form.documents.get(DocumentKind::PurchaseOrder).is_some());
    }

    #[test]
    fn test_attach_document_rejection_leaves_slot_empty() {
        let mut bad = NamedTempFile::new().expect("temp file");
        bad.write_all(b"plain text, not a document").expect("write");
        bad.flush().expect("flush");

        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);
        form.vehicle_papers_input
            .set_value(&bad.path().to_string_lossy());
        form.attach_document(DocumentKind::VehiclePapers);

        assert!(form.documents.get(DocumentKind::VehiclePapers).is_none());
        assert_eq!(
            form.errors.get("vehicle_papers"),
            Some("Only PDF, JPG, JPEG, or PNG files are accepted.")
        );
    }

    #[test]
    fn test_accepted_file_clears_prior_error() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);
        form.errors
            .set("aadhaar_card", "Driver Aadhaar Card is required.".to_string());

        form.attach_document_path(DocumentKind::AadhaarCard, file.path());
        assert!(form.errors.get("aadhaar_card").is_none());
        assert!(form.documents.get(DocumentKind::AadhaarCard).is_some());
    }

    #[test]
    fn test_documents_step_blocks_until_all_slots_filled() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);

        form.attach_document_path(DocumentKind::PurchaseOrder, file.path());
        assert!(!form.advance_step());
        assert_eq!(form.step, Step::Documents);
        assert!(form.errors.get("vehicle_papers").is_some());
        assert!(form.errors.get("aadhaar_card").is_some());
    }

    #[test]
    fn test_validate_all_reports_first_failing_step() {
        let mut form = EntryForm::new();
        filled_vehicle_step(&mut form);
        // Driver phone left empty, documents left empty
        assert_eq!(form.validate_all(), Err(Step::Driver));
    }

    #[test]
    fn test_validate_all_passes_on_complete_form() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        filled_vehicle_step(&mut form);
        filled_driver_step(&mut form);
        for kind in DocumentKind::ALL {
            form.attach_document_path(kind, file.path());
        }
        assert_eq!(form.validate_all(), Ok(()));
    }

    #[test]
    fn test_previous_step_never_validates() {
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);
        form.previous_step();
        assert_eq!(form.step, Step::Driver);
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_field_cycling_includes_buttons_row() {
        let mut form = EntryForm::new();
        // Vehicle step: field 0 + buttons row
        assert_eq!(form.field_count(), 2);
        form.next_field();
        assert!(form.is_buttons_row_active());
        form.next_field();
        assert_eq!(form.active_field(), 0);
    }

    #[test]
    fn test_language_cycling() {
        let mut form = EntryForm::new();
        assert_eq!(form.language, LanguageCode::En);
        form.cycle_language();
        assert_eq!(form.language, LanguageCode::Hi);
        form.cycle_language_back();
        assert_eq!(form.language, LanguageCode::En);
        form.cycle_language_back();
        assert_eq!(form.language, LanguageCode::Ml);
    }

    #[test]
    fn test_language_round_trips_through_code() {
        for lang in LanguageCode::ALL {
            assert_eq!(LanguageCode::from_code(lang.code()), Some(lang));
        }
        assert_eq!(LanguageCode::from_code("xx"), None);
    }

    #[test]
    fn test_clear_document_empties_slot_and_input() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.goto_step(Step::Documents);
        form.attach_document_path(DocumentKind::PurchaseOrder, file.path());
        assert!(form.documents.get(DocumentKind::PurchaseOrder).is_some());

        form.clear_document(DocumentKind::PurchaseOrder);
        assert!(form.documents.get(DocumentKind::PurchaseOrder).is_none());
        assert_eq!(form.purchase_order_input.as_str(), "");
    }

    #[test]
    fn test_button_count_per_step() {
        let mut form = EntryForm::new();
        assert_eq!(form.button_count(), 1);
        form.goto_step(Step::Driver);
        assert_eq!(form.button_count(), 2);
        form.goto_step(Step::Documents);
        assert_eq!(form.button_count(), 2);
    }
}
