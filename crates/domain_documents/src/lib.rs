//! Evidence Documents
//!
//! Turns a generated claim into the PDF documents that accompany it.
//!
//! ```text
//! Claim + DocumentConfig -> DocumentGenerator::form_data -> FormData
//! TemplateSpec -> TemplateStore (file or blank form) -> template bytes
//! template bytes + FormData -> fill_pdf_bytes -> PDF
//! ```

pub mod form;
pub mod pdf;
pub mod template;
pub mod generators;
pub mod registry;
pub mod error;

pub use form::{FieldKind, FieldSpec, FieldValue, FormData, TemplateSpec};
pub use pdf::{blank_form, fill_pdf_bytes, read_form_fields, read_form_values};
pub use template::TemplateStore;
pub use generators::DocumentGenerator;
pub use registry::{DocumentRegistry, RenderedDocument};
pub use error::DocumentError;
