//! Behavioural tests for domain_employment

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

use core_kernel::{Money, Quarter};

use domain_employment::{
    EmployeeFactory, EmployeePool, EmployeeSpec, EmployerPool, EmployerSpec, EmploymentError,
    EmploymentValidator, WageSpec, WAGE_HISTORY_QUARTERS,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn employers(seed: u64) -> EmployerPool {
    let mut rng = StdRng::seed_from_u64(seed);
    EmployerPool::generate(5, &EmployerSpec::default(), as_of(), &mut rng)
}

// ============================================================================
// Factory Tests
// ============================================================================

mod factory_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_employee() {
        let pool = employers(1);
        let a = EmployeeFactory::generate(&EmployeeSpec::eligible(), &pool, as_of(), &mut StdRng::seed_from_u64(9)).unwrap();
        let b = EmployeeFactory::generate(&EmployeeSpec::eligible(), &pool, as_of(), &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_annual_wages_split_over_last_four_quarters() {
        let pool = employers(1);
        let spec = EmployeeSpec {
            wages: WageSpec::Annual(Money::from_dollars(40_001)),
            ..Default::default()
        };
        let employee = EmployeeFactory::generate(&spec, &pool, as_of(), &mut StdRng::seed_from_u64(2)).unwrap();

        let occupation = employee.primary_occupation().unwrap();
        assert_eq!(occupation.wages.len(), WAGE_HISTORY_QUARTERS);
        assert_eq!(occupation.wages[0].quarter, Quarter::new(2023, 2).unwrap());
        assert_eq!(occupation.wages[3].quarter, Quarter::new(2024, 1).unwrap());
        assert_eq!(employee.annual_wages().amount(), dec!(40001));
    }

    #[test]
    fn test_ineligible_wages_fall_below_floor() {
        let pool = employers(1);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            let employee = EmployeeFactory::generate(&EmployeeSpec::ineligible(), &pool, as_of(), &mut rng).unwrap();
            assert!(!employee.is_eligible());
        }
    }

    #[test]
    fn test_mass_id_requested() {
        let pool = employers(1);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            let employee = EmployeeFactory::generate(&EmployeeSpec::eligible().with_mass_id(), &pool, as_of(), &mut rng).unwrap();
            assert!(employee.mass_id.is_some());
        }
    }

    #[test]
    fn test_no_employers_is_an_error() {
        let result = EmployeeFactory::generate(
            &EmployeeSpec::eligible(),
            &EmployerPool::default(),
            as_of(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(EmploymentError::NoEmployers)));
    }

    #[test]
    fn test_unknown_employer_fein_is_an_error() {
        let spec = EmployeeSpec {
            employer_fein: Some("00-0000000".to_string()),
            ..Default::default()
        };
        let result = EmployeeFactory::generate(&spec, &employers(1), as_of(), &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(EmploymentError::EmployerNotFound(_))));
    }
}

// ============================================================================
// Pool Tests
// ============================================================================

mod pool_tests {
    use super::*;

    #[test]
    fn test_pool_exhausts_after_every_employee_is_used() {
        let pool = employers(3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut employees = EmployeePool::generate(50, &EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();

        for _ in 0..50 {
            employees.pick(&EmployeeSpec::eligible(), &mut rng).unwrap();
        }

        let err = employees.pick(&EmployeeSpec::eligible(), &mut rng).unwrap_err();
        assert!(matches!(err, EmploymentError::EmployeePoolExhausted { pool_size: 50, used: 50 }));
    }

    #[test]
    fn test_pick_skips_employees_that_do_not_match() {
        let pool = employers(3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut employees = EmployeePool::generate(10, &EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();

        let result = employees.pick(&EmployeeSpec::ineligible(), &mut rng);
        assert!(matches!(result, Err(EmploymentError::EmployeePoolExhausted { .. })));
        assert_eq!(employees.remaining(), 10);
    }

    #[test]
    fn test_pool_serialization_keeps_used_set() {
        let pool = employers(3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut employees = EmployeePool::generate(3, &EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();
        let picked = employees.pick(&EmployeeSpec::eligible(), &mut rng).unwrap();

        let json = serde_json::to_string(&employees).unwrap();
        let restored: EmployeePool = serde_json::from_str(&json).unwrap();
        assert!(restored.is_used(&picked.id));
        assert_eq!(restored.remaining(), 2);
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_generated_records_validate() {
        let pool = employers(5);
        let mut rng = StdRng::seed_from_u64(5);
        let employees = EmployeePool::generate(25, &EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();

        let result = EmploymentValidator::validate_all(employees.iter(), &pool);
        assert!(result.is_valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_employee_with_foreign_employer_fails() {
        let pool = employers(5);
        let mut rng = StdRng::seed_from_u64(5);
        let employee = EmployeeFactory::generate(&EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();

        let result = EmploymentValidator::validate_employee(&employee, &employers(6));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("unknown employer")));
    }

    #[test]
    fn test_forbidden_ssn_area_fails() {
        let pool = employers(5);
        let mut rng = StdRng::seed_from_u64(5);
        let mut employee = EmployeeFactory::generate(&EmployeeSpec::eligible(), &pool, as_of(), &mut rng).unwrap();
        employee.tax_identifier = "666-12-3456".to_string();

        let result = EmploymentValidator::validate_employee(&employee, &pool);
        assert!(!result.is_valid);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_eligible_employees_clear_the_floor(seed in any::<u64>()) {
        let pool = employers(seed);
        let employee = EmployeeFactory::generate(
            &EmployeeSpec::eligible(),
            &pool,
            as_of(),
            &mut StdRng::seed_from_u64(seed),
        ).unwrap();

        prop_assert!(employee.is_eligible());
        prop_assert!(domain_employment::validation::is_valid_ssn(&employee.tax_identifier));
        prop_assert!(pool.find_by_fein(&employee.occupations[0].employer_fein).is_some());
    }
}
