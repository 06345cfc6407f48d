//! Behavioural tests for domain_documents

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use domain_claims::{
    ClaimGenerator, DocumentConfig, DocumentType, EmployeeSource, GeneratedClaim, GeneratorConfig,
    ScenarioCatalog,
};
use domain_employment::{EmployerPool, EmployerSpec};

use domain_documents::form::format_date;
use domain_documents::{
    read_form_fields, read_form_values, DocumentError, DocumentRegistry, FieldValue, TemplateStore,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn claim(scenario: &str, seed: u64) -> GeneratedClaim {
    let employers = EmployerPool::generate(3, &EmployerSpec::default(), as_of(), &mut StdRng::seed_from_u64(seed));
    let catalog = ScenarioCatalog::builtin();
    ClaimGenerator::new(GeneratorConfig { seed, as_of: as_of() })
        .generate(catalog.get(scenario).unwrap(), &mut EmployeeSource::Employers(&employers))
        .unwrap()
}

// ============================================================================
// Form Data Tests
// ============================================================================

mod form_data_tests {
    use super::*;

    #[test]
    fn test_form_data_is_deterministic() {
        let registry = DocumentRegistry::standard();
        let claim = claim("medical_intermittent", 4);
        let generator = registry.generator(DocumentType::Hcp).unwrap();

        let a = generator.form_data(&claim.claim, &DocumentConfig::default()).unwrap();
        let b = generator.form_data(&claim.claim, &DocumentConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_generator_fills_only_template_fields() {
        let registry = DocumentRegistry::standard();
        let claims = [
            claim("medical_continuous", 1),
            claim("caring_continuous", 1),
            claim("pregnancy_continuous", 1),
            claim("bonding_newborn", 1),
            claim("bonding_adoption", 1),
            claim("bonding_foster", 1),
        ];

        for generated in &claims {
            for request in &generated.documents {
                let generator = registry.generator(request.document_type).unwrap();
                let template = generator.template();
                let data = generator.form_data(&generated.claim, &request.config).unwrap();
                for (name, _) in data.iter() {
                    assert!(template.field(name).is_some(), "{} missing {}", request.document_type, name);
                }
            }
        }
    }

    #[test]
    fn test_birth_certificate_requires_birth_date() {
        let registry = DocumentRegistry::standard();
        let mut generated = claim("bonding_newborn", 2);
        generated.claim.leave_details.child_birth_date = None;

        let result = registry
            .generator(DocumentType::BirthCertificate)
            .unwrap()
            .form_data(&generated.claim, &DocumentConfig::default());

        match result {
            Err(DocumentError::MissingClaimField { document, field }) => {
                assert_eq!(document, DocumentType::BirthCertificate);
                assert_eq!(field, "child_birth_date");
            }
            other => panic!("expected missing field error, got {:?}", other),
        }
    }

    #[test]
    fn test_foster_placement_requires_placement_date() {
        let registry = DocumentRegistry::standard();
        let generated = claim("medical_continuous", 2);
        let result = registry
            .generator(DocumentType::FosterPlacement)
            .unwrap()
            .form_data(&generated.claim, &DocumentConfig::default());
        assert!(matches!(result, Err(DocumentError::MissingClaimField { .. })));
    }

    #[test]
    fn test_invalid_document_is_inconsistent() {
        let registry = DocumentRegistry::standard();
        let generated = claim("medical_continuous", 3);
        let generator = registry.generator(DocumentType::Hcp).unwrap();

        let valid = generator.form_data(&generated.claim, &DocumentConfig::default()).unwrap();
        let invalid = generator.form_data(&generated.claim, &DocumentConfig::invalid()).unwrap();

        let start = generated.claim.leave_dates().start;
        assert_eq!(
            valid.get("leave_start_date"),
            Some(&FieldValue::Text(format_date(start)))
        );
        assert_eq!(
            invalid.get("leave_start_date"),
            Some(&FieldValue::Text(format_date(start - Duration::days(365))))
        );
        assert_eq!(
            invalid.get("employee_first_name"),
            Some(&FieldValue::Text(generated.claim.last_name.clone()))
        );
    }
}

// ============================================================================
// Rendering Tests
// ============================================================================

mod rendering_tests {
    use super::*;

    #[test]
    fn test_render_all_round_trips_values() {
        let registry = DocumentRegistry::standard();
        let generated = claim("bonding_newborn", 5);
        let templates = TemplateStore::synthetic();

        let rendered = registry.render_all(&generated, &templates).unwrap();
        assert_eq!(rendered.len(), 2);

        for document in rendered {
            let generator = registry.generator(document.document_type).unwrap();
            let expected = generator
                .form_data(&generated.claim, &DocumentConfig::default())
                .unwrap();
            let values = read_form_values(&document.bytes).unwrap();
            for (name, value) in expected.iter() {
                assert_eq!(values.get(name), Some(value), "{}", name);
            }
        }
    }

    #[test]
    fn test_template_loaded_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DocumentRegistry::standard();
        let store = TemplateStore::new(dir.path());

        let written = store.materialize(registry.templates().iter()).unwrap();
        assert_eq!(written, DocumentType::ALL.len());

        let template = registry.generator(DocumentType::MassId).unwrap().template();
        let bytes = store.load(&template).unwrap();
        let fields = read_form_fields(&bytes).unwrap();
        assert_eq!(fields.get("license_class").map(String::as_str), Some("Ch"));
        assert_eq!(fields.get("first_name").map(String::as_str), Some("Tx"));
    }

    #[test]
    fn test_missing_template_falls_back_to_blank_form() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DocumentRegistry::standard();
        let generated = claim("medical_continuous", 6);

        let rendered = registry
            .render_all(&generated, &TemplateStore::new(dir.path().join("absent")))
            .unwrap();
        assert!(rendered.iter().all(|d| d.bytes.starts_with(b"%PDF")));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_rendering_is_deterministic(seed in any::<u64>()) {
        let registry = DocumentRegistry::standard();
        let generated = claim("caring_continuous", seed);
        let request = generated.document(DocumentType::CaringCertification).unwrap().clone();
        let templates = TemplateStore::synthetic();

        let a = registry.render(&generated, &request, &templates).unwrap();
        let b = registry.render(&generated, &request, &templates).unwrap();
        prop_assert_eq!(
            read_form_values(&a.bytes).unwrap(),
            read_form_values(&b.bytes).unwrap()
        );
    }
}
