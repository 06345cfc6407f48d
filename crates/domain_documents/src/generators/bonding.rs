use chrono::NaiveDate;

use domain_claims::{Claim, DocumentConfig, DocumentType};

use super::{applicant_name, claim_hash, document_date, relative_first_name, DocumentGenerator};
use crate::error::DocumentError;
use crate::form::{FormData, TemplateSpec};

fn required_date(
    value: Option<NaiveDate>,
    document: DocumentType,
    field: &str,
) -> Result<NaiveDate, DocumentError> {
    value.ok_or_else(|| DocumentError::missing(document, field))
}

/// Birth certificate naming the applicant as parent
pub struct BirthCertificateGenerator;

impl DocumentGenerator for BirthCertificateGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::BirthCertificate
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("birth-certificate.pdf", "Certificate of Live Birth").text(&[
            "child_first_name",
            "child_last_name",
            "child_birth_date",
            "place_of_birth",
            "parent_first_name",
            "parent_last_name",
            "parent_dob",
            "certificate_number",
        ])
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let birth = required_date(
            claim.leave_details.child_birth_date,
            DocumentType::BirthCertificate,
            "child_birth_date",
        )?;
        let (first, last) = applicant_name(claim, config);

        Ok(FormData::new()
            .text("child_first_name", relative_first_name(claim))
            .text("child_last_name", claim.last_name.clone())
            .date("child_birth_date", document_date(birth, config))
            .text("place_of_birth", claim.residential_address.city.clone())
            .text("parent_first_name", first)
            .text("parent_last_name", last)
            .date("parent_dob", claim.date_of_birth)
            .text("certificate_number", format!("{}-{:06}", birth.format("%Y"), claim_hash(claim) % 1_000_000)))
    }
}

/// Court decree of adoption
pub struct AdoptionCertificateGenerator;

impl DocumentGenerator for AdoptionCertificateGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::AdoptionCertificate
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("adoption-certificate.pdf", "Decree of Adoption")
            .text(&[
                "child_first_name",
                "child_last_name",
                "placement_date",
                "adoptive_parent_first_name",
                "adoptive_parent_last_name",
                "case_number",
            ])
            .choice("court", &["Probate and Family Court", "Juvenile Court"])
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let placement = required_date(
            claim.leave_details.child_placement_date,
            DocumentType::AdoptionCertificate,
            "child_placement_date",
        )?;
        let (first, last) = applicant_name(claim, config);
        let court = if claim_hash(claim) % 2 == 0 {
            "Probate and Family Court"
        } else {
            "Juvenile Court"
        };

        Ok(FormData::new()
            .text("child_first_name", relative_first_name(claim))
            .text("child_last_name", claim.last_name.clone())
            .date("placement_date", document_date(placement, config))
            .text("adoptive_parent_first_name", first)
            .text("adoptive_parent_last_name", last)
            .choice("court", court)
            .text("case_number", format!("AD{:08}", claim_hash(claim) % 100_000_000)))
    }
}

/// Placement letter from a foster care agency
pub struct FosterPlacementGenerator;

impl DocumentGenerator for FosterPlacementGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::FosterPlacement
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("foster-placement.pdf", "Foster Care Placement Letter").text(&[
            "agency_name",
            "child_first_name",
            "placement_date",
            "foster_parent_first_name",
            "foster_parent_last_name",
            "caseworker_name",
        ])
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let placement = required_date(
            claim.leave_details.child_placement_date,
            DocumentType::FosterPlacement,
            "child_placement_date",
        )?;
        let (first, last) = applicant_name(claim, config);

        Ok(FormData::new()
            .text("agency_name", "Department of Children and Families")
            .text("child_first_name", relative_first_name(claim))
            .date("placement_date", document_date(placement, config))
            .text("foster_parent_first_name", first)
            .text("foster_parent_last_name", last)
            .text("caseworker_name", "Case Worker"))
    }
}
