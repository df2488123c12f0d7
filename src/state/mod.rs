//! Application state module

mod app_state;
pub mod documents;
mod draft;
mod forms;
pub mod validate;

pub use app_state::*;
pub use documents::{DocumentFile, DocumentKind, DocumentSet, FileKind, IntakeError};
pub use draft::*;
pub use forms::*;
