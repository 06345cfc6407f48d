//! Behavioural tests for domain_claims

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use domain_employment::{EmployeePool, EmployeeSpec, EmployerPool, EmployerSpec};

use domain_claims::{
    BondingDate, ClaimError, ClaimGenerator, ClaimSpec, DocumentType, EmployeeSource, GeneratorConfig,
    LeavePeriod, LeavePeriodKind, LeaveReason, ReasonQualifier, ScenarioCatalog, ScenarioMix,
    ScenarioSpec, WorkPatternSpec,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn config(seed: u64) -> GeneratorConfig {
    GeneratorConfig { seed, as_of: as_of() }
}

fn employers() -> EmployerPool {
    EmployerPool::generate(4, &EmployerSpec::default(), as_of(), &mut StdRng::seed_from_u64(100))
}

fn employees(employers: &EmployerPool, count: usize) -> EmployeePool {
    EmployeePool::generate(count, &EmployeeSpec::eligible(), employers, as_of(), &mut StdRng::seed_from_u64(200)).unwrap()
}

fn scenario(kind: LeavePeriodKind) -> ScenarioSpec {
    ScenarioSpec::new(
        "test",
        EmployeeSpec::eligible(),
        ClaimSpec::new(LeaveReason::SeriousHealthCondition, kind).with_doc(DocumentType::Hcp),
    )
}

// ============================================================================
// Generator Tests
// ============================================================================

mod generator_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_claims() {
        let employers = employers();
        let catalog = ScenarioCatalog::builtin();
        let mix = ScenarioMix::parse("medical_continuous=2,bonding_newborn=1,caring_continuous=1").unwrap();

        let run = |seed| {
            let mut generator = ClaimGenerator::new(config(seed));
            generator
                .generate_many(&catalog, &mix, 12, &mut EmployeeSource::Employers(&employers))
                .unwrap()
        };

        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }

    #[test]
    fn test_pool_of_fifty_fails_on_fifty_first_claim() {
        let employers = employers();
        let mut pool = employees(&employers, 50);
        let mut generator = ClaimGenerator::new(config(1));
        let scenario = scenario(LeavePeriodKind::Continuous);
        let mut source = EmployeeSource::Pool {
            employees: &mut pool,
            employers: &employers,
            allow_new_employees: false,
        };

        let mut generated = 0;
        let mut failure = None;
        for _ in 0..100 {
            match generator.generate(&scenario, &mut source) {
                Ok(_) => generated += 1,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        assert_eq!(generated, 50);
        assert!(matches!(
            failure,
            Some(ClaimError::EmployeePoolExhausted { pool_size: 50, used: 50, .. })
        ));
    }

    #[test]
    fn test_exhausted_pool_grows_when_new_employees_allowed() {
        let employers = employers();
        let mut pool = employees(&employers, 5);
        let mut generator = ClaimGenerator::new(config(1));
        let scenario = scenario(LeavePeriodKind::Continuous);
        {
            let mut source = EmployeeSource::Pool {
                employees: &mut pool,
                employers: &employers,
                allow_new_employees: true,
            };
            for _ in 0..8 {
                generator.generate(&scenario, &mut source).unwrap();
            }
        }
        assert_eq!(pool.len(), 8);
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn test_new_employee_without_employers_fails() {
        let empty = EmployerPool::default();
        let mut generator = ClaimGenerator::new(config(1));
        let result = generator.generate(&scenario(LeavePeriodKind::Continuous), &mut EmployeeSource::Employers(&empty));
        assert!(matches!(result, Err(ClaimError::MissingEmployer)));
    }

    #[test]
    fn test_bonding_dates_follow_qualifier() {
        let employers = employers();
        let catalog = ScenarioCatalog::builtin();
        let mut generator = ClaimGenerator::new(config(3));
        let mut source = EmployeeSource::Employers(&employers);

        let newborn = generator.generate(catalog.get("bonding_newborn").unwrap(), &mut source).unwrap();
        let details = &newborn.claim.leave_details;
        let start = details.leave_period.start_date();
        let birth = details.child_birth_date.unwrap();
        assert!(birth < start && birth >= start - Duration::days(30));
        assert!(details.child_placement_date.is_none());

        let foster = generator.generate(catalog.get("bonding_foster").unwrap(), &mut source).unwrap();
        assert!(foster.claim.leave_details.child_placement_date.unwrap() > as_of());
        assert!(foster.claim.leave_details.child_birth_date.is_none());

        let far = generator.generate(catalog.get("bonding_far_past_denial").unwrap(), &mut source).unwrap();
        let far_start = far.claim.leave_details.leave_period.start_date();
        assert!(far.claim.leave_details.child_birth_date.unwrap() < far_start - Duration::days(365));
        assert!(far.employer_response.is_some());
    }

    #[test]
    fn test_bonding_without_date_is_missing_field() {
        let employers = employers();
        let spec = ScenarioSpec::new(
            "bonding",
            EmployeeSpec::eligible(),
            ClaimSpec::new(LeaveReason::ChildBonding, LeavePeriodKind::Continuous)
                .with_qualifier(ReasonQualifier::Newborn),
        );
        let result = ClaimGenerator::new(config(1)).generate(&spec, &mut EmployeeSource::Employers(&employers));
        assert!(matches!(result, Err(ClaimError::MissingRequiredField(f)) if f == "bonding_date"));
    }

    #[test]
    fn test_reduced_schedule_fits_work_pattern() {
        let employers = employers();
        let spec = ScenarioSpec::new(
            "reduced",
            EmployeeSpec::eligible(),
            ClaimSpec::new(LeaveReason::SeriousHealthCondition, LeavePeriodKind::ReducedSchedule)
                .with_work_pattern(WorkPatternSpec::RotatingShift),
        );
        let claim = ClaimGenerator::new(config(1))
            .generate(&spec, &mut EmployeeSource::Employers(&employers))
            .unwrap();

        match claim.claim.leave_details.leave_period {
            LeavePeriod::ReducedSchedule { minutes_off, .. } => {
                assert!(minutes_off.fits_within(&claim.claim.work_pattern.minutes));
                assert_eq!(minutes_off.monday, 360);
                assert_eq!(minutes_off.wednesday, 0);
            }
            other => panic!("unexpected leave period {:?}", other),
        }
    }

    #[test]
    fn test_short_claim_is_at_most_a_week() {
        let employers = employers();
        let catalog = ScenarioCatalog::builtin();
        let mut generator = ClaimGenerator::new(config(8));
        let mut source = EmployeeSource::Employers(&employers);
        for _ in 0..20 {
            let claim = generator.generate(catalog.get("medical_short").unwrap(), &mut source).unwrap();
            assert!(claim.claim.leave_dates().days() <= 7);
        }
    }

    #[test]
    fn test_documents_follow_scenario() {
        let employers = employers();
        let catalog = ScenarioCatalog::builtin();
        let mut generator = ClaimGenerator::new(config(8));
        let mut claim = generator
            .generate(catalog.get("bonding_adoption").unwrap(), &mut EmployeeSource::Employers(&employers))
            .unwrap();

        let types: Vec<DocumentType> = claim.document_types().collect();
        assert_eq!(types, vec![DocumentType::AdoptionCertificate, DocumentType::OutOfStateId]);

        claim
            .attach_document(DocumentType::AdoptionCertificate, "documents/a.pdf".into())
            .unwrap();
        assert!(claim.document(DocumentType::AdoptionCertificate).unwrap().path.is_some());
        assert!(matches!(
            claim.attach_document(DocumentType::Hcp, "documents/b.pdf".into()),
            Err(ClaimError::DocumentNotRequested(DocumentType::Hcp))
        ));
    }

    #[test]
    fn test_unknown_scenario_in_mix() {
        let employers = employers();
        let mix = ScenarioMix::single("does_not_exist");
        let result = ClaimGenerator::new(config(1)).generate_many(
            &ScenarioCatalog::builtin(),
            &mix,
            3,
            &mut EmployeeSource::Employers(&employers),
        );
        assert!(matches!(result, Err(ClaimError::UnknownScenario(_))));
    }

    #[test]
    fn test_claim_json_round_trip() {
        let employers = employers();
        let claim = ClaimGenerator::new(config(2))
            .generate(&scenario(LeavePeriodKind::Intermittent), &mut EmployeeSource::Employers(&employers))
            .unwrap();
        let json = serde_json::to_string(&claim).unwrap();
        let restored: domain_claims::GeneratedClaim = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, claim);
    }

    #[test]
    fn test_catalog_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.json");
        let catalog = ScenarioCatalog::new(vec![ScenarioSpec::new(
            "custom",
            EmployeeSpec::ineligible(),
            ClaimSpec::new(LeaveReason::ChildBonding, LeavePeriodKind::Continuous)
                .with_qualifier(ReasonQualifier::Adoption)
                .with_bonding_date(BondingDate::Past),
        )]);
        std::fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();

        let loaded = ScenarioCatalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.get("custom").unwrap(), catalog.get("custom").unwrap());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn flags_strategy() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exactly_one_leave_period_matches_flags(seed in any::<u64>(), flags in flags_strategy()) {
        let employers = employers();
        let (continuous, intermittent, reduced) = flags;
        let mut spec = ClaimSpec::new(LeaveReason::SeriousHealthCondition, LeavePeriodKind::Continuous);
        spec.has_continuous_leave_periods = continuous;
        spec.has_intermittent_leave_periods = intermittent;
        spec.has_reduced_schedule_leave_periods = reduced;
        let scenario = ScenarioSpec::new("prop", EmployeeSpec::eligible(), spec);

        let result = ClaimGenerator::new(config(seed)).generate(&scenario, &mut EmployeeSource::Employers(&employers));
        let set = [continuous, intermittent, reduced].iter().filter(|f| **f).count();

        if set == 1 {
            let generated = result.unwrap();
            let details = &generated.claim.leave_details;
            prop_assert_eq!(details.has_continuous_leave_periods(), continuous);
            prop_assert_eq!(details.has_intermittent_leave_periods(), intermittent);
            prop_assert_eq!(details.has_reduced_schedule_leave_periods(), reduced);
            prop_assert!(details.leave_period.start_date() <= details.leave_period.end_date());
        } else {
            prop_assert!(matches!(result, Err(ClaimError::UnsupportedLeaveCombination(_))));
        }
    }

    #[test]
    fn prop_mix_counts_sum_to_total(weights in prop::collection::vec(1u32..20, 1..6), total in 0usize..500) {
        let entries = weights.iter().enumerate().map(|(i, w)| (format!("s{}", i), *w)).collect();
        let mix = ScenarioMix::new(entries).unwrap();
        let counts = mix.counts(total);
        prop_assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), total);
    }
}
