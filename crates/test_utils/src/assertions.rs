//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types and generated
//! files that give more meaningful error messages than standard assertions.

use std::path::Path;

use core_kernel::Money;
use domain_claims::{DocumentType, GeneratedClaim};
use domain_documents::read_form_fields;
use domain_employment::Employer;

/// Asserts that two Money values are equal to the cent
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.round_to_cents(),
        expected.round_to_cents(),
        "Money mismatch: actual={}, expected={}",
        actual.amount(),
        expected.amount()
    );
}

/// Asserts that a string is an SSN in `NNN-NN-NNNN` form
pub fn assert_ssn_format(ssn: &str) {
    let parts: Vec<&str> = ssn.split('-').collect();
    let valid = parts.len() == 3
        && [3, 2, 4].iter().zip(&parts).all(|(len, part)| {
            part.len() == *len && part.chars().all(|c| c.is_ascii_digit())
        });
    assert!(valid, "Expected SSN in NNN-NN-NNNN form, got '{}'", ssn);
}

/// Asserts that a string is a FEIN in `NN-NNNNNNN` form
pub fn assert_fein_format(fein: &str) {
    let valid = match fein.split_once('-') {
        Some((prefix, rest)) => {
            prefix.len() == 2
                && rest.len() == 7
                && prefix.chars().chain(rest.chars()).all(|c| c.is_ascii_digit())
        }
        None => false,
    };
    assert!(valid, "Expected FEIN in NN-NNNNNNN form, got '{}'", fein);
}

/// Asserts that every line of a fixed-width file has the width of its record type
///
/// `widths` maps the leading record-type character to a line width; lines
/// without a mapped prefix use `default_width`.
pub fn assert_fixed_width(contents: &str, default_width: usize, widths: &[(char, usize)]) {
    for (number, line) in contents.lines().enumerate() {
        let expected = line
            .chars()
            .next()
            .and_then(|c| widths.iter().find(|(kind, _)| *kind == c))
            .map(|(_, width)| *width)
            .unwrap_or(default_width);
        assert_eq!(
            line.chars().count(),
            expected,
            "Line {} has width {}, expected {}: '{}'",
            number + 1,
            line.chars().count(),
            expected,
            line
        );
    }
}

/// Asserts that the claim is filed against one of the employers
pub fn assert_claim_employer_known(claim: &GeneratedClaim, employers: &[Employer]) {
    assert!(
        employers.iter().any(|e| e.fein == claim.claim.employer_fein),
        "Claim {} is filed against unknown employer FEIN {}",
        claim.id,
        claim.claim.employer_fein
    );
}

/// Asserts that the claim's leave starts after the employer was notified
pub fn assert_notified_before_leave(claim: &GeneratedClaim) {
    let details = &claim.claim.leave_details;
    if let Some(notified) = details.employer_notification_date {
        let start = details.leave_period.dates().start;
        assert!(
            notified <= start,
            "Claim {} notified employer on {} after leave start {}",
            claim.id,
            notified,
            start
        );
    }
}

/// Asserts that a document was written for the claim and is a readable PDF form
pub fn assert_document_written(claim: &GeneratedClaim, document_type: DocumentType) {
    let request = claim
        .document(document_type)
        .unwrap_or_else(|| panic!("Claim {} did not request {}", claim.id, document_type));
    let path = request
        .path
        .as_deref()
        .unwrap_or_else(|| panic!("Claim {} has no file for {}", claim.id, document_type));
    assert_pdf_form(path);
}

/// Asserts that the file is a PDF with at least one form field
pub fn assert_pdf_form(path: &Path) {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", path.display());
    let fields = read_form_fields(&bytes).unwrap_or_else(|e| panic!("{} has no form: {}", path.display(), e));
    assert!(!fields.is_empty(), "{} has no form fields", path.display());
}
