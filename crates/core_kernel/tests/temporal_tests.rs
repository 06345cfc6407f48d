//! Unit tests for the temporal module
//!
//! Covers inclusive date ranges and calendar quarter arithmetic.

use chrono::NaiveDate;
use core_kernel::temporal::{DateRange, Quarter, TemporalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod date_range {
    use super::*;

    #[test]
    fn test_starting_spans_requested_days() {
        let range = DateRange::starting(date(2024, 2, 27), 4).unwrap();
        assert_eq!(range.end, date(2024, 3, 1));
        assert_eq!(range.days(), 4);
    }

    #[test]
    fn test_starting_rejects_zero_days() {
        assert!(DateRange::starting(date(2024, 1, 1), 0).is_err());
    }

    #[test]
    fn test_contains_both_ends() {
        let range = DateRange::bounded(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert!(range.contains(date(2024, 1, 10)));
        assert!(range.contains(date(2024, 1, 20)));
        assert!(!range.contains(date(2024, 1, 21)));
    }

    #[test]
    fn test_overlap() {
        let a = DateRange::bounded(date(2024, 1, 1), date(2024, 1, 10)).unwrap();
        let b = DateRange::bounded(date(2024, 1, 10), date(2024, 1, 12)).unwrap();
        let c = DateRange::bounded(date(2024, 1, 11), date(2024, 1, 12)).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_reversed_range_is_error() {
        let result = DateRange::bounded(date(2024, 1, 2), date(2024, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }
}

mod quarter {
    use super::*;

    #[test]
    fn test_containing() {
        assert_eq!(Quarter::containing(date(2024, 3, 31)), Quarter::new(2024, 1).unwrap());
        assert_eq!(Quarter::containing(date(2024, 4, 1)), Quarter::new(2024, 2).unwrap());
    }

    #[test]
    fn test_previous_wraps_year() {
        let q = Quarter::new(2024, 1).unwrap();
        assert_eq!(q.previous(), Quarter::new(2023, 4).unwrap());
        assert_eq!(q.previous().next(), q);
    }

    #[test]
    fn test_invalid_quarter_number() {
        assert_eq!(Quarter::new(2024, 5), Err(TemporalError::InvalidQuarter(5)));
    }

    #[test]
    fn test_leap_year_q1_end() {
        assert_eq!(Quarter::new(2024, 1).unwrap().end(), date(2024, 3, 31));
        assert_eq!(Quarter::new(2023, 3).unwrap().end(), date(2023, 9, 30));
    }

    #[test]
    fn test_display() {
        assert_eq!(Quarter::new(2023, 2).unwrap().to_string(), "2023Q2");
    }
}
