//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Money, Quarter};
use domain_claims::{DurationBasis, FrequencyBasis, LeavePeriod, WeekdayMinutes, WorkPattern};

/// Strategy for non-negative amounts in cents, up to ten million dollars
pub fn cents_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy for non-negative Money values
pub fn money_strategy() -> impl Strategy<Value = Money> {
    cents_strategy().prop_map(Money::from_cents)
}

/// Strategy for contribution percentages between 0% and 2%
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..200u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for dates between 2020 and 2029
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> + Clone {
    (0i64..3650).prop_map(|days| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(days))
}

/// Strategy for quarters between 2015 and 2034
pub fn quarter_strategy() -> impl Strategy<Value = Quarter> {
    (2015i32..2035, 1u32..=4).prop_map(|(year, number)| Quarter { year, number })
}

/// Strategy for SSNs in `NNN-NN-NNNN` form
pub fn ssn_strategy() -> impl Strategy<Value = String> {
    (1u32..900, 1u32..100, 1u32..10_000).prop_map(|(area, group, serial)| {
        format!("{:03}-{:02}-{:04}", area, group, serial)
    })
}

/// Strategy for work patterns with at least one working day
pub fn work_pattern_strategy() -> impl Strategy<Value = WorkPattern> {
    proptest::array::uniform7(prop_oneof![Just(0u32), 60u32..=720u32])
        .prop_filter("at least one working day", |minutes| minutes.iter().any(|m| *m > 0))
        .prop_map(WorkPattern::custom)
}

/// Strategy for leave periods of any kind, one to 180 days long
pub fn leave_period_strategy() -> impl Strategy<Value = LeavePeriod> {
    let range = (date_strategy(), 0i64..180).prop_map(|(start, len)| (start, start + Duration::days(len)));
    prop_oneof![
        range.clone().prop_map(|(start_date, end_date)| LeavePeriod::Continuous { start_date, end_date }),
        (range.clone(), 1u32..5, 1u32..8).prop_map(|((start_date, end_date), frequency, duration)| {
            LeavePeriod::Intermittent {
                start_date,
                end_date,
                frequency,
                frequency_interval: 1,
                frequency_interval_basis: FrequencyBasis::Weeks,
                duration,
                duration_basis: DurationBasis::Hours,
            }
        }),
        (range, proptest::array::uniform7(0u32..=240)).prop_map(|((start_date, end_date), off)| {
            LeavePeriod::ReducedSchedule {
                start_date,
                end_date,
                minutes_off: WeekdayMinutes::from_array(off),
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_leave_periods_are_ordered(period in leave_period_strategy()) {
            let dates = period.dates();
            prop_assert!(dates.start <= dates.end);
        }

        #[test]
        fn test_ssns_are_well_formed(ssn in ssn_strategy()) {
            crate::assertions::assert_ssn_format(&ssn);
        }
    }
}
