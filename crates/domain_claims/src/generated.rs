//! Generated claims and the documents attached to them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use core_kernel::ClaimId;

use crate::claim::Claim;
use crate::error::ClaimError;

/// Evidence document kinds that can accompany a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Certification of the employee's own serious health condition
    Hcp,
    CaringCertification,
    PregnancyMaternity,
    BirthCertificate,
    AdoptionCertificate,
    FosterPlacement,
    MassId,
    OutOfStateId,
}

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        DocumentType::Hcp,
        DocumentType::CaringCertification,
        DocumentType::PregnancyMaternity,
        DocumentType::BirthCertificate,
        DocumentType::AdoptionCertificate,
        DocumentType::FosterPlacement,
        DocumentType::MassId,
        DocumentType::OutOfStateId,
    ];

    /// Document category the claims API files the upload under
    pub fn api_category(&self) -> &'static str {
        match self {
            DocumentType::Hcp => "Own serious health condition form",
            DocumentType::CaringCertification => "Care for a family member form",
            DocumentType::PregnancyMaternity => "Pregnancy/Maternity form",
            DocumentType::BirthCertificate
            | DocumentType::AdoptionCertificate
            | DocumentType::FosterPlacement => "Child bonding evidence form",
            DocumentType::MassId | DocumentType::OutOfStateId => "Identification Proof",
        }
    }

    /// File stem used when the document is written to disk
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentType::Hcp => "hcp",
            DocumentType::CaringCertification => "caring_certification",
            DocumentType::PregnancyMaternity => "pregnancy_maternity",
            DocumentType::BirthCertificate => "birth_certificate",
            DocumentType::AdoptionCertificate => "adoption_certificate",
            DocumentType::FosterPlacement => "foster_placement",
            DocumentType::MassId => "mass_id",
            DocumentType::OutOfStateId => "out_of_state_id",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.file_stem())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Per-document generation options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Produce an intentionally inconsistent document
    #[serde(default)]
    pub invalid: bool,
}

impl DocumentConfig {
    pub fn invalid() -> Self {
        Self { invalid: true }
    }
}

/// A document requested for a claim, with the path once it is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    #[serde(default)]
    pub config: DocumentConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
}

/// How benefits are paid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_method")]
pub enum PaymentPreference {
    Ach {
        routing_number: String,
        account_number: String,
        account_type: AccountType,
    },
    Check,
    Debit,
}

impl PaymentPreference {
    pub fn method_name(&self) -> &'static str {
        match self {
            PaymentPreference::Ach { .. } => "Elec Funds Transfer",
            PaymentPreference::Check => "Check",
            PaymentPreference::Debit => "Debit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployerDecision {
    Approve,
    Deny,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudStatus {
    Yes,
    #[default]
    No,
    Unknown,
}

/// The employer's review of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerResponse {
    pub hours_worked_per_week: Decimal,
    pub decision: EmployerDecision,
    pub fraud: FraudStatus,
    #[serde(default)]
    pub believe_relationship_accurate: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A claim plus everything needed to submit it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedClaim {
    pub id: ClaimId,
    /// Name of the scenario the claim was generated from
    pub scenario: String,
    pub claim: Claim,
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
    pub payment_preference: PaymentPreference,
    #[serde(default)]
    pub employer_response: Option<EmployerResponse>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl GeneratedClaim {
    /// Records where a rendered document was written
    pub fn attach_document(&mut self, document_type: DocumentType, path: PathBuf) -> Result<(), ClaimError> {
        let request = self
            .documents
            .iter_mut()
            .find(|d| d.document_type == document_type)
            .ok_or(ClaimError::DocumentNotRequested(document_type))?;
        request.path = Some(path);
        Ok(())
    }

    pub fn document(&self, document_type: DocumentType) -> Option<&DocumentRequest> {
        self.documents.iter().find(|d| d.document_type == document_type)
    }

    pub fn document_types(&self) -> impl Iterator<Item = DocumentType> + '_ {
        self.documents.iter().map(|d| d.document_type)
    }
}
