use chrono::{Datelike, Duration};

use domain_claims::{Claim, DocumentConfig, DocumentType};

use super::{applicant_name, claim_hash, DocumentGenerator};
use crate::error::DocumentError;
use crate::form::{FormData, TemplateSpec};

const LICENSE_CLASSES: [&str; 3] = ["D", "M", "ID"];
const NEIGHBOUR_STATES: [&str; 6] = ["NY", "NH", "CT", "RI", "VT", "ME"];

fn identity_template(file_name: &str, title: &str) -> TemplateSpec {
    TemplateSpec::new(file_name, title).text(&[
        "first_name",
        "last_name",
        "date_of_birth",
        "id_number",
        "address",
        "expiration_date",
    ])
}

/// The applicant's birthday five years after the leave starts
fn expiration(claim: &Claim) -> chrono::NaiveDate {
    let start = claim.leave_dates().start;
    let dob = claim.date_of_birth;
    dob.with_year(start.year() + 5)
        .unwrap_or_else(|| start + Duration::days(5 * 365))
}

/// Massachusetts driver's license or state ID
pub struct MassIdGenerator;

impl DocumentGenerator for MassIdGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::MassId
    }

    fn template(&self) -> TemplateSpec {
        identity_template("license-mass.pdf", "Commonwealth of Massachusetts").choice("license_class", &LICENSE_CLASSES)
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let mass_id = claim
            .mass_id
            .clone()
            .ok_or_else(|| DocumentError::missing(DocumentType::MassId, "mass_id"))?;
        let (first, last) = applicant_name(claim, config);
        let class = LICENSE_CLASSES[(claim_hash(claim) % LICENSE_CLASSES.len() as u64) as usize];

        Ok(FormData::new()
            .text("first_name", first)
            .text("last_name", last)
            .date("date_of_birth", claim.date_of_birth)
            .text("id_number", mass_id)
            .text("address", claim.residential_address.single_line())
            .date("expiration_date", expiration(claim))
            .choice("license_class", class))
    }
}

/// Driver's license from another state
pub struct OutOfStateIdGenerator;

impl DocumentGenerator for OutOfStateIdGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::OutOfStateId
    }

    fn template(&self) -> TemplateSpec {
        identity_template("license-out-of-state.pdf", "Driver License").choice("issuing_state", &NEIGHBOUR_STATES)
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let (first, last) = applicant_name(claim, config);
        let hash = claim_hash(claim);
        let state = NEIGHBOUR_STATES[(hash % NEIGHBOUR_STATES.len() as u64) as usize];

        Ok(FormData::new()
            .text("first_name", first)
            .text("last_name", last)
            .date("date_of_birth", claim.date_of_birth)
            .text("id_number", format!("{}{:09}", state, hash % 1_000_000_000))
            .text("address", claim.residential_address.single_line())
            .date("expiration_date", expiration(claim))
            .choice("issuing_state", state))
    }
}
