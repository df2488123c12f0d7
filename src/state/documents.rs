//! Document intake for the upload step
//!
//! Files are accepted from a path (typed or dropped onto the terminal) and
//! checked before they ever reach a slot: content type is sniffed from the
//! leading bytes and the size is capped. A rejected file never occupies a
//! slot.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upload size cap (5MB)
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// The three mandatory document slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PurchaseOrder,
    VehiclePapers,
    AadhaarCard,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::PurchaseOrder,
        DocumentKind::VehiclePapers,
        DocumentKind::AadhaarCard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "Purchase Order",
            Self::VehiclePapers => "Vehicle Papers",
            Self::AadhaarCard => "Driver Aadhaar Card",
        }
    }

    /// Multipart part name on the wire
    pub fn part_name(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "purchase_order",
            Self::VehiclePapers => "vehicle_papers",
            Self::AadhaarCard => "aadhaar_card",
        }
    }
}

/// Accepted file types, sniffed from content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Jpeg,
    Png,
}

impl FileKind {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Sniff the file type from the first bytes of the content.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"%PDF") {
            Some(Self::Pdf)
        } else if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// Why a file was refused
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Could not read the file: {0}")]
    Unreadable(#[from] io::Error),
    #[error("Only PDF, JPG, JPEG, or PNG files are accepted.")]
    UnsupportedType,
    #[error("File must be 5MB or smaller.")]
    TooLarge,
}

/// A file accepted into a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: FileKind,
    pub size: u64,
}

impl fmt::Display for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} KB)", self.file_name, self.size.div_ceil(1024))
    }
}

/// Stat and sniff a candidate file without loading it fully.
pub fn inspect_file(path: &Path) -> Result<DocumentFile, IntakeError> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(IntakeError::TooLarge);
    }

    let mut header = [0u8; 8];
    let mut file = fs::File::open(path)?;
    let read = file.read(&mut header)?;
    let kind = FileKind::sniff(&header[..read]).ok_or(IntakeError::UnsupportedType)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    Ok(DocumentFile {
        path: path.to_path_buf(),
        file_name,
        kind,
        size: metadata.len(),
    })
}

/// The three named slots, each holding at most one accepted file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    pub purchase_order: Option<DocumentFile>,
    pub vehicle_papers: Option<DocumentFile>,
    pub aadhaar_card: Option<DocumentFile>,
}

impl DocumentSet {
    pub fn get(&self, kind: DocumentKind) -> Option<&DocumentFile> {
        match kind {
            DocumentKind::PurchaseOrder => self.purchase_order.as_ref(),
            DocumentKind::VehiclePapers => self.vehicle_papers.as_ref(),
            DocumentKind::AadhaarCard => self.aadhaar_card.as_ref(),
        }
    }

    /// Accepted files overwrite whatever was in the slot.
    pub fn set(&mut self, kind: DocumentKind, file: DocumentFile) {
        match kind {
            DocumentKind::PurchaseOrder => self.purchase_order = Some(file),
            DocumentKind::VehiclePapers => self.vehicle_papers = Some(file),
            DocumentKind::AadhaarCard => self.aadhaar_card = Some(file),
        }
    }

    pub fn clear(&mut self, kind: DocumentKind) {
        match kind {
            DocumentKind::PurchaseOrder => self.purchase_order = None,
            DocumentKind::VehiclePapers => self.vehicle_papers = None,
            DocumentKind::AadhaarCard => self.aadhaar_card = None,
        }
    }

    /// All three slots must be filled before submission.
    pub fn is_complete(&self) -> bool {
        DocumentKind::ALL.iter().all(|k| self.get(*k).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn temp_file_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(bytes).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn test_sniff_known_headers() {
        assert_eq!(FileKind::sniff(b"%PDF-1.7 ..."), Some(FileKind::Pdf));
        assert_eq!(FileKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(FileKind::Jpeg));
        assert_eq!(FileKind::sniff(&PNG_HEADER), Some(FileKind::Png));
    }

    #[test]
    fn test_sniff_rejects_unknown_and_short_headers() {
        assert_eq!(FileKind::sniff(b"GIF89a"), None);
        assert_eq!(FileKind::sniff(b"%P"), None);
        assert_eq!(FileKind::sniff(b""), None);
    }

    #[test]
    fn test_inspect_accepts_pdf() {
        let file = temp_file_with(b"%PDF-1.4\nfake body");
        let doc = inspect_file(file.path()).expect("pdf accepted");
        assert_eq!(doc.kind, FileKind::Pdf);
        assert_eq!(doc.kind.mime(), "application/pdf");
        assert_eq!(doc.size, 18);
    }

    #[test]
    fn test_inspect_rejects_unknown_content() {
        let file = temp_file_with(b"hello world, not a document");
        let err = inspect_file(file.path()).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedType));
    }

    #[test]
    fn test_inspect_rejects_oversize() {
        let file = NamedTempFile::new().expect("temp file");
        file.as_file()
            .set_len(MAX_FILE_SIZE + 1)
            .expect("grow temp file");
        let err = inspect_file(file.path()).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge));
    }

    #[test]
    fn test_inspect_accepts_exactly_max_size() {
        let file = temp_file_with(&PNG_HEADER);
        file.as_file().set_len(MAX_FILE_SIZE).expect("grow temp file");
        let doc = inspect_file(file.path()).expect("png at the cap accepted");
        assert_eq!(doc.kind, FileKind::Png);
        assert_eq!(doc.size, MAX_FILE_SIZE);
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = inspect_file(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, IntakeError::Unreadable(_)));
    }

    #[test]
    fn test_document_set_overwrites_slot() {
        let first = temp_file_with(b"%PDF-1.4 one");
        let second = temp_file_with(b"%PDF-1.4 two");
        let mut set = DocumentSet::default();

        set.set(
            DocumentKind::PurchaseOrder,
            inspect_file(first.path()).unwrap(),
        );
        set.set(
            DocumentKind::PurchaseOrder,
            inspect_file(second.path()).unwrap(),
        );

        let stored = set.get(DocumentKind::PurchaseOrder).unwrap();
        assert_eq!(stored.path, second.path());
        assert!(set.get(DocumentKind::VehiclePapers).is_none());
    }

    #[test]
    fn test_document_set_completeness() {
        let file = temp_file_with(b"%PDF-1.4");
        let doc = inspect_file(file.path()).unwrap();

        let mut set = DocumentSet::default();
        assert!(!set.is_complete());

        set.set(DocumentKind::PurchaseOrder, doc.clone());
        set.set(DocumentKind::VehiclePapers, doc.clone());
        assert!(!set.is_complete());

        set.set(DocumentKind::AadhaarCard, doc);
        assert!(set.is_complete());

        set.clear(DocumentKind::VehiclePapers);
        assert!(!set.is_complete());
    }

}
