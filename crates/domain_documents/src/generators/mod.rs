//! Form data generators, one per document type
//!
//! Generators are pure: the same claim and config always give the same
//! `FormData`. Anything that looks random (provider names, case numbers) is
//! derived from the claim itself.

mod bonding;
mod caring;
mod identity;
mod medical;

pub use bonding::{AdoptionCertificateGenerator, BirthCertificateGenerator, FosterPlacementGenerator};
pub use caring::CaringCertificationGenerator;
pub use identity::{MassIdGenerator, OutOfStateIdGenerator};
pub use medical::{HcpGenerator, PregnancyMaternityGenerator};

use chrono::{Duration, NaiveDate};

use domain_claims::{Claim, DocumentConfig, DocumentType};

use crate::error::DocumentError;
use crate::form::{FormData, TemplateSpec};

/// Builds the form data for one kind of evidence document
pub trait DocumentGenerator: Send + Sync {
    fn document_type(&self) -> DocumentType;

    /// Template file and field schema this generator fills
    fn template(&self) -> TemplateSpec;

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError>;
}

const PROVIDERS: [&str; 6] = [
    "Dr. Helen Okafor",
    "Dr. Marcus Bell",
    "Dr. Priya Raman",
    "Dr. Thomas Reyes",
    "Dr. Grace Whitfield",
    "Dr. Samuel Dunn",
];

const RELATIVE_FIRST_NAMES: [&str; 6] = ["Eleanor", "Walter", "Rosa", "Henry", "June", "Arthur"];

/// Stable number derived from the applicant's SSN
pub(crate) fn claim_hash(claim: &Claim) -> u64 {
    claim
        .tax_identifier
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b - b'0')))
}

pub(crate) fn provider_name(claim: &Claim) -> &'static str {
    PROVIDERS[(claim_hash(claim) % PROVIDERS.len() as u64) as usize]
}

pub(crate) fn relative_first_name(claim: &Claim) -> &'static str {
    RELATIVE_FIRST_NAMES[(claim_hash(claim) / 7 % RELATIVE_FIRST_NAMES.len() as u64) as usize]
}

/// Applicant name as printed on the document; swapped when the document is
/// meant to be inconsistent with the claim
pub(crate) fn applicant_name(claim: &Claim, config: &DocumentConfig) -> (String, String) {
    if config.invalid {
        (claim.last_name.clone(), claim.first_name.clone())
    } else {
        (claim.first_name.clone(), claim.last_name.clone())
    }
}

/// Shifts a date a year back for invalid documents
pub(crate) fn document_date(date: NaiveDate, config: &DocumentConfig) -> NaiveDate {
    if config.invalid {
        date - Duration::days(365)
    } else {
        date
    }
}

/// Leave start/end and the three leave-type checkboxes shared by the
/// certification forms
pub(crate) fn leave_fields(form: FormData, claim: &Claim, config: &DocumentConfig) -> FormData {
    let details = &claim.leave_details;
    let dates = claim.leave_dates();
    form.date("leave_start_date", document_date(dates.start, config))
        .date("leave_end_date", document_date(dates.end, config))
        .checkbox("continuous", details.has_continuous_leave_periods())
        .checkbox("intermittent", details.has_intermittent_leave_periods())
        .checkbox("reduced_schedule", details.has_reduced_schedule_leave_periods())
}

pub(crate) const LEAVE_TEXT_FIELDS: [&str; 2] = ["leave_start_date", "leave_end_date"];
pub(crate) const LEAVE_CHECKBOXES: [&str; 3] = ["continuous", "intermittent", "reduced_schedule"];

pub(crate) fn ssn_last4(claim: &Claim) -> String {
    let digits: String = claim.tax_identifier.chars().filter(char::is_ascii_digit).collect();
    digits[digits.len().saturating_sub(4)..].to_string()
}
