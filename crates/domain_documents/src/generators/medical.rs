use chrono::Duration;

use domain_claims::{Claim, DocumentConfig, DocumentType, LeavePeriod};

use super::{
    applicant_name, document_date, leave_fields, provider_name, ssn_last4, DocumentGenerator,
    LEAVE_CHECKBOXES, LEAVE_TEXT_FIELDS,
};
use crate::error::DocumentError;
use crate::form::{format_date, FormData, TemplateSpec};

const PROVIDER_TYPES: [&str; 4] = ["Physician", "Nurse Practitioner", "Physician Assistant", "Chiropractor"];

/// Healthcare provider certification of the employee's own condition
pub struct HcpGenerator;

impl DocumentGenerator for HcpGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::Hcp
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("hcp-v3.pdf", "Certification of Your Serious Health Condition")
            .text(&[
                "employee_first_name",
                "employee_last_name",
                "employee_dob",
                "employee_ssn_last4",
                "condition_start_date",
                "provider_name",
                "frequency",
                "signature_date",
            ])
            .text(&LEAVE_TEXT_FIELDS)
            .checkbox(&LEAVE_CHECKBOXES)
            .choice("provider_type", &PROVIDER_TYPES)
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let (first, last) = applicant_name(claim, config);
        let start = claim.leave_dates().start;

        let frequency = match &claim.leave_details.leave_period {
            LeavePeriod::Intermittent {
                frequency,
                frequency_interval,
                frequency_interval_basis,
                duration,
                duration_basis,
                ..
            } => format!(
                "{} episode(s) every {} {:?}, {} {:?} each",
                frequency, frequency_interval, frequency_interval_basis, duration, duration_basis
            ),
            LeavePeriod::ReducedSchedule { minutes_off, .. } => {
                format!("{} minutes off per week", minutes_off.total())
            }
            LeavePeriod::Continuous { .. } => String::new(),
        };

        let form = FormData::new()
            .text("employee_first_name", first)
            .text("employee_last_name", last)
            .date("employee_dob", claim.date_of_birth)
            .text("employee_ssn_last4", ssn_last4(claim))
            .date("condition_start_date", document_date(start - Duration::days(7), config))
            .text("provider_name", provider_name(claim))
            .choice("provider_type", PROVIDER_TYPES[0])
            .text("frequency", frequency)
            .text("signature_date", format_date(document_date(start - Duration::days(3), config)));

        Ok(leave_fields(form, claim, config))
    }
}

/// Provider certification of pregnancy or recent birth
pub struct PregnancyMaternityGenerator;

impl DocumentGenerator for PregnancyMaternityGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::PregnancyMaternity
    }

    fn template(&self) -> TemplateSpec {
        TemplateSpec::new("pregnancy-maternity.pdf", "Certification of Pregnancy or Recent Birth")
            .text(&[
                "employee_first_name",
                "employee_last_name",
                "employee_dob",
                "expected_delivery_date",
                "provider_name",
            ])
            .text(&LEAVE_TEXT_FIELDS)
            .checkbox(&LEAVE_CHECKBOXES)
            .checkbox(&["recent_birth"])
    }

    fn form_data(&self, claim: &Claim, config: &DocumentConfig) -> Result<FormData, DocumentError> {
        let (first, last) = applicant_name(claim, config);
        let details = &claim.leave_details;
        let delivery = details
            .child_birth_date
            .unwrap_or_else(|| claim.leave_dates().start + Duration::days(14));

        let form = FormData::new()
            .text("employee_first_name", first)
            .text("employee_last_name", last)
            .date("employee_dob", claim.date_of_birth)
            .date("expected_delivery_date", document_date(delivery, config))
            .text("provider_name", provider_name(claim))
            .checkbox("recent_birth", details.child_birth_date.is_some());

        Ok(leave_fields(form, claim, config))
    }
}
