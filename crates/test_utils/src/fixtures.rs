//! Pre-built Test Fixtures
//!
//! Ready-to-use, seeded test data. Everything here is deterministic so
//! tests can compare whole values.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

use core_kernel::{Money, Quarter};
use domain_claims::{ClaimGenerator, EmployeeSource, GeneratedClaim, GeneratorConfig, ScenarioCatalog, ScenarioMix};
use domain_employment::{Address, EmployeePool, EmployeeSpec, EmployerPool, EmployerSpec};

/// Fixture for temporal test data
pub struct DateFixtures;

impl DateFixtures {
    /// Reference date every generated fixture is relative to (May 15, 2024)
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    /// Quarter containing `as_of`
    pub fn current_quarter() -> Quarter {
        Quarter::containing(Self::as_of())
    }

    /// Timestamp used in DOR file names
    pub fn dor_timestamp() -> NaiveDateTime {
        Self::as_of().and_hms_opt(9, 30, 0).unwrap()
    }
}

/// Fixture for money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical quarterly wage
    pub fn quarterly_wage() -> Money {
        Money::new(dec!(12500.00))
    }

    /// Below the base-period eligibility threshold
    pub fn low_wage() -> Money {
        Money::new(dec!(450.00))
    }
}

/// Fixture for address test data
pub struct AddressFixtures;

impl AddressFixtures {
    pub fn boston() -> Address {
        Address::new("1 Ashburton Pl", "Boston", "MA", "02108")
    }

    pub fn worcester() -> Address {
        Address::new("455 Main St", "Worcester", "MA", "01608")
    }
}

/// Fixture for seeded employer and employee pools
pub struct PoolFixtures;

impl PoolFixtures {
    pub fn employers(count: usize, seed: u64) -> EmployerPool {
        EmployerPool::generate(
            count,
            &EmployerSpec::default(),
            DateFixtures::as_of(),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    pub fn employees(employers: &EmployerPool, count: usize, seed: u64) -> EmployeePool {
        EmployeePool::generate(
            count,
            &EmployeeSpec::eligible(),
            employers,
            DateFixtures::as_of(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }
}

/// Fixture for generated claims
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// `count` claims from the built-in catalog, applicants generated per claim
    pub fn generated(count: usize, mix: &str, seed: u64) -> Vec<GeneratedClaim> {
        let employers = PoolFixtures::employers(3, seed);
        let mix = ScenarioMix::parse(mix).unwrap();
        let mut generator = ClaimGenerator::new(GeneratorConfig {
            seed,
            as_of: DateFixtures::as_of(),
        });
        generator
            .generate_many(
                &ScenarioCatalog::builtin(),
                &mix,
                count,
                &mut EmployeeSource::Employers(&employers),
            )
            .unwrap()
    }

    /// `count` continuous medical leave claims
    pub fn medical(count: usize, seed: u64) -> Vec<GeneratedClaim> {
        Self::generated(count, "medical_continuous", seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_fixtures_are_deterministic() {
        assert_eq!(ClaimFixtures::medical(3, 7), ClaimFixtures::medical(3, 7));
    }

    #[test]
    fn test_current_quarter() {
        let quarter = DateFixtures::current_quarter();
        assert_eq!((quarter.year, quarter.number), (2024, 2));
    }
}
