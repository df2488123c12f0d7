//! Draft persistence for the in-progress entry form
//!
//! Mirrors the web portal habit of stashing the half-filled form so a
//! closed terminal does not lose work. Saved on step transitions and on
//! exit, cleared after a successful submission and on logout. Restored
//! document paths are re-run through intake validation; a path that no
//! longer passes simply drops the slot.

use anyhow::Result;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::documents::DocumentKind;
use super::forms::{EntryForm, LanguageCode, Step};

/// Serialized snapshot of the entry form
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryDraft {
    pub current_step: usize,
    pub vehicle_number: String,
    pub driver_phone: String,
    pub helper_phone: String,
    pub driver_language: String,
    #[serde(default)]
    pub purchase_order_path: Option<String>,
    #[serde(default)]
    pub vehicle_papers_path: Option<String>,
    #[serde(default)]
    pub aadhaar_card_path: Option<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl EntryDraft {
    /// Snapshot the form for persistence
    pub fn from_form(form: &EntryForm) -> Self {
        let slot_path = |kind: DocumentKind| {
            form.documents
                .get(kind)
                .map(|f| f.path.to_string_lossy().into_owned())
        };
        Self {
            current_step: form.step.index(),
            vehicle_number: form.vehicle_number.as_str().to_string(),
            driver_phone: form.driver_phone.as_str().to_string(),
            helper_phone: form.helper_phone.as_str().to_string(),
            driver_language: form.language.code().to_string(),
            purchase_order_path: slot_path(DocumentKind::PurchaseOrder),
            vehicle_papers_path: slot_path(DocumentKind::VehiclePapers),
            aadhaar_card_path: slot_path(DocumentKind::AadhaarCard),
            saved_at: Some(Utc::now()),
        }
    }

    /// Rebuild a form from the snapshot. Field values pass back through
    /// their normalizers; document paths go through the attach handler so
    /// stale or tampered files are rejected the normal way, then any
    /// intake error from restoration is dropped.
    pub fn into_form(self) -> EntryForm {
        let mut form = EntryForm::new();
        form.vehicle_number.set_value(&self.vehicle_number);
        form.driver_phone.set_value(&self.driver_phone);
        form.helper_phone.set_value(&self.helper_phone);
        if let Some(language) = LanguageCode::from_code(&self.driver_language) {
            form.language = language;
        }

        let slots = [
            (DocumentKind::PurchaseOrder, &self.purchase_order_path),
            (DocumentKind::VehiclePapers, &self.vehicle_papers_path),
            (DocumentKind::AadhaarCard, &self.aadhaar_card_path),
        ];
        for (kind, path) in slots {
            if let Some(path) = path {
                form.attach_document_path(kind, std::path::Path::new(path));
            }
        }
        form.errors.clear_all();

        let step = match self.current_step {
            1 => Step::Driver,
            2 => Step::Documents,
            _ => Step::Vehicle,
        };
        form.goto_step(step);
        form
    }
}

/// Loads and saves the draft file under the platform data directory
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    path_override: Option<PathBuf>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn at(path: PathBuf) -> Self {
        Self {
            path_override: Some(path),
        }
    }

    fn draft_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path_override {
            return Some(path.clone());
        }
        ProjectDirs::from("io", "gatepass", "gatepass-tui")
            .map(|dirs| dirs.data_dir().join("draft.json"))
    }

    pub fn load(&self) -> Option<EntryDraft> {
        let path = self.draft_path()?;
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(draft) => Some(draft),
            Err(err) => {
                tracing::warn!("Discarding unreadable draft file: {err}");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    pub fn save(&self, draft: &EntryDraft) -> Result<()> {
        if let Some(path) = self.draft_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(draft)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(path) = self.draft_path() {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn pdf_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"%PDF-1.4 draft").expect("write");
        file.flush().expect("flush");
        file
    }

    #[test]
    fn test_snapshot_and_restore_fields() {
        let mut form = EntryForm::new();
        form.vehicle_number.set_value("mh 12 ab 1234");
        form.driver_phone.set_value("9876543210");
        form.language = LanguageCode::Hi;
        form.goto_step(Step::Driver);

        let restored = EntryDraft::from_form(&form).into_form();
        assert_eq!(restored.vehicle_number.as_str(), "MH 12 AB 1234");
        assert_eq!(restored.driver_phone.as_str(), "+919876543210");
        assert_eq!(restored.language, LanguageCode::Hi);
        assert_eq!(restored.step, Step::Driver);
        assert!(restored.errors.is_empty());
    }

    #[test]
    fn test_restore_reattaches_documents() {
        let file = pdf_file();
        let mut form = EntryForm::new();
        form.attach_document_path(DocumentKind::PurchaseOrder, file.path());

        let restored = EntryDraft::from_form(&form).into_form();
        assert!(restored.documents.get(DocumentKind::PurchaseOrder).is_some());
    }

    #[test]
    fn test_restore_drops_stale_document_path() {
        let mut draft = EntryDraft {
            vehicle_number: "MH 12".to_string(),
            ..Default::default()
        };
        draft.aadhaar_card_path = Some("/vanished/aadhaar.pdf".to_string());

        let restored = draft.into_form();
        assert!(restored.documents.get(DocumentKind::AadhaarCard).is_none());
        // Restoration failures are silent; the step re-validates on advance
        assert!(restored.errors.is_empty());
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        let draft = EntryDraft {
            driver_language: "xx".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.into_form().language, LanguageCode::En);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::at(dir.path().join("draft.json"));

        let draft = EntryDraft {
            current_step: 2,
            vehicle_number: "KA-05-HX-99".to_string(),
            driver_phone: "+919876543210".to_string(),
            driver_language: "ta".to_string(),
            ..Default::default()
        };
        store.save(&draft).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.current_step, 2);
        assert_eq!(loaded.vehicle_number, "KA-05-HX-99");
        assert_eq!(loaded.driver_language, "ta");
    }

    #[test]
    fn test_store_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        let store = DraftStore::at(path.clone());

        store.save(&EntryDraft::default()).unwrap();
        assert!(path.exists());
        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_draft_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        fs::write(&path, "][").unwrap();

        let store = DraftStore::at(path.clone());
        assert!(store.load().is_none());
        assert!(!path.exists());
    }
}
