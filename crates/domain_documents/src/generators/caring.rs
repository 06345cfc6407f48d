use chrono::Datelike;

use domain_claims::{Claim, DocumentConfig, DocumentType};

use super::{
    applicant_name, claim_hash, leave_fields, provider_name, relative_first_name, DocumentGenerator,
    LEAVE_CHECKBOXES, LEAVE_TEXT_FIELDS,
};
use crate::error::DocumentError;
use crate::form::{FormData, TemplateSpec};

const RELATIONSHIPS: [&str; 6] = ["Child", "Parent", "Spouse", "Sibling", "Grandparent", "Grandchild"];

/// Provider certification for caring for a family member
pub struct CaringCertificationGenerator;

impl DocumentGenerator for CaringCertificationGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::CaringCertification
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("caring-v2.pdf", "Certification of Your Family Member's Serious Health Condition")
            .text(&[
                "employee_first_name",
                "employee_last_name",
                "family_member_first_name",
                "family_member_last_name",
                "family_member_dob",
                "provider_name",
            ])
            .text(&LEAVE_TEXT_FIELDS)
            .checkbox(&LEAVE_CHECKBOXES)
            .choice("relationship", &RELATIONSHIPS)
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let (first, last) = applicant_name(claim, config);
        let relationship = RELATIONSHIPS[(claim_hash(claim) % RELATIONSHIPS.len() as u64) as usize];
        // Parents and grandparents are older than the applicant, everyone else younger
        let years: i32 = match relationship {
            "Parent" => -28,
            "Grandparent" => -55,
            "Spouse" | "Sibling" => 2,
            _ => 25,
        };
        let dob = claim
            .date_of_birth
            .with_year(claim.date_of_birth.year() + years)
            .unwrap_or(claim.date_of_birth);

        let form = FormData::new()
            .text("employee_first_name", first)
            .text("employee_last_name", last.clone())
            .text("family_member_first_name", relative_first_name(claim))
            .text("family_member_last_name", last)
            .date("family_member_dob", dob)
            .choice("relationship", relationship)
            .text("provider_name", provider_name(claim));

        Ok(leave_fields(form, claim, config))
    }
}
