//! Document generation errors

use thiserror::Error;

use domain_claims::DocumentType;

/// Errors that can occur while building form data or filling a PDF
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The template field has a type other than text, checkbox or choice, or
    /// the supplied value does not fit the field's type
    #[error("Unsupported field type {field_type} for field {field}")]
    UnknownFieldType { field: String, field_type: String },

    #[error("Cannot generate {document}: claim is missing {field}")]
    MissingClaimField { document: DocumentType, field: String },

    #[error("Template has no field named {0}")]
    UnknownField(String),

    #[error("Invalid option {value} for choice field {field}")]
    InvalidOption { field: String, value: String },

    #[error("No generator registered for {0}")]
    NoGenerator(DocumentType),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Template I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    pub fn missing(document: DocumentType, field: impl Into<String>) -> Self {
        DocumentError::MissingClaimField {
            document,
            field: field.into(),
        }
    }

    pub fn pdf(message: impl Into<String>) -> Self {
        DocumentError::Pdf(message.into())
    }
}

impl From<lopdf::Error> for DocumentError {
    fn from(err: lopdf::Error) -> Self {
        DocumentError::Pdf(err.to_string())
    }
}
