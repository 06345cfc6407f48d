//! Calendar types for leave dates and wage reporting
//!
//! This module provides:
//! - `DateRange`: an inclusive span of days, used for leave periods
//! - `Quarter`: a calendar quarter, the unit in which wages are reported

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Invalid quarter: {0} (expected 1-4)")]
    InvalidQuarter(u32),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a bounded range; `start` may equal `end` for a single day
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a range starting at `start` and spanning `days` calendar days
    pub fn starting(start: NaiveDate, days: u32) -> Result<Self, TemporalError> {
        if days == 0 {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: start.to_string(),
            });
        }
        let end = start
            .checked_add_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| TemporalError::OutOfRange(start.to_string()))?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A calendar quarter (Q1 = January through March)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub number: u32,
}

impl Quarter {
    pub fn new(year: i32, number: u32) -> Result<Self, TemporalError> {
        if !(1..=4).contains(&number) {
            return Err(TemporalError::InvalidQuarter(number));
        }
        Ok(Self { year, number })
    }

    /// Returns the quarter that contains the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: (date.month() - 1) / 3 + 1,
        }
    }

    /// First day of the quarter
    pub fn start(&self) -> NaiveDate {
        let month = (self.number - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the quarter
    pub fn end(&self) -> NaiveDate {
        self.next().start().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn previous(&self) -> Self {
        if self.number == 1 {
            Self { year: self.year - 1, number: 4 }
        } else {
            Self { year: self.year, number: self.number - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.number == 4 {
            Self { year: self.year + 1, number: 1 }
        } else {
            Self { year: self.year, number: self.number + 1 }
        }
    }

    /// The `n` most recent complete quarters before `date`, oldest first
    pub fn last_n(date: NaiveDate, n: usize) -> Vec<Self> {
        let mut quarters = Vec::with_capacity(n);
        let mut current = Self::containing(date).previous();
        for _ in 0..n {
            quarters.push(current);
            current = current.previous();
        }
        quarters.reverse();
        quarters
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let result = DateRange::bounded(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_date_range_days_is_inclusive() {
        let range = DateRange::bounded(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(range.days(), 1);
        assert_eq!(range.iter_days().count(), 1);
    }

    #[test]
    fn test_quarter_bounds() {
        let q = Quarter::new(2024, 1).unwrap();
        assert_eq!(q.start(), date(2024, 1, 1));
        assert_eq!(q.end(), date(2024, 3, 31));
        assert_eq!(Quarter::new(2024, 4).unwrap().end(), date(2024, 12, 31));
    }

    #[test]
    fn test_last_n_quarters_excludes_current() {
        let quarters = Quarter::last_n(date(2024, 5, 15), 4);
        assert_eq!(
            quarters,
            vec![
                Quarter::new(2023, 2).unwrap(),
                Quarter::new(2023, 3).unwrap(),
                Quarter::new(2023, 4).unwrap(),
                Quarter::new(2024, 1).unwrap(),
            ]
        );
    }
}
