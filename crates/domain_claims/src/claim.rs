//! Leave application body
//!
//! A `Claim` is exactly what gets sent to the claims API when an
//! application is updated. The leave period is a single enum value, so the
//! `has_*_leave_periods` flags the API expects are derived from it rather
//! than stored next to it.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{DateRange, EmployeeId};
use domain_employment::Address;

/// Why the employee is taking leave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeaveReason {
    #[serde(rename = "Serious Health Condition - Employee")]
    SeriousHealthCondition,
    #[serde(rename = "Child Bonding")]
    ChildBonding,
    #[serde(rename = "Care for a Family Member")]
    CareForFamilyMember,
    #[serde(rename = "Pregnancy/Maternity")]
    PregnancyMaternity,
}

impl LeaveReason {
    /// The reason string used by the claims API
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveReason::SeriousHealthCondition => "Serious Health Condition - Employee",
            LeaveReason::ChildBonding => "Child Bonding",
            LeaveReason::CareForFamilyMember => "Care for a Family Member",
            LeaveReason::PregnancyMaternity => "Pregnancy/Maternity",
        }
    }
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refines a child bonding reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonQualifier {
    Newborn,
    Adoption,
    #[serde(rename = "Foster Care")]
    FosterCare,
}

impl ReasonQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonQualifier::Newborn => "Newborn",
            ReasonQualifier::Adoption => "Adoption",
            ReasonQualifier::FosterCare => "Foster Care",
        }
    }
}

/// Minutes per weekday, Sunday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayMinutes {
    pub sunday: u32,
    pub monday: u32,
    pub tuesday: u32,
    pub wednesday: u32,
    pub thursday: u32,
    pub friday: u32,
    pub saturday: u32,
}

impl WeekdayMinutes {
    pub const WEEK: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn from_array(minutes: [u32; 7]) -> Self {
        let [sunday, monday, tuesday, wednesday, thursday, friday, saturday] = minutes;
        Self {
            sunday,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
        }
    }

    pub fn to_array(&self) -> [u32; 7] {
        [
            self.sunday,
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
    }

    pub fn get(&self, day: Weekday) -> u32 {
        self.to_array()[day.num_days_from_sunday() as usize]
    }

    pub fn total(&self) -> u32 {
        self.to_array().iter().sum()
    }

    /// Applies `f` to every day
    pub fn map(&self, f: impl Fn(u32) -> u32) -> Self {
        Self::from_array(self.to_array().map(f))
    }

    /// Returns true if no day exceeds the same day in `other`
    pub fn fits_within(&self, other: &WeekdayMinutes) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a <= b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkPatternType {
    Fixed,
    Rotating,
}

/// One day of a work pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPatternDay {
    pub day_of_week: Weekday,
    pub minutes: u32,
}

/// The employee's regular weekly schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPattern {
    pub work_pattern_type: WorkPatternType,
    pub minutes: WeekdayMinutes,
}

impl WorkPattern {
    /// Monday to Friday, eight hours a day
    pub fn standard() -> Self {
        Self {
            work_pattern_type: WorkPatternType::Fixed,
            minutes: WeekdayMinutes::from_array([0, 480, 480, 480, 480, 480, 0]),
        }
    }

    /// Twelve-hour shifts on Monday, Tuesday, Thursday and Saturday
    pub fn rotating_shift() -> Self {
        Self {
            work_pattern_type: WorkPatternType::Rotating,
            minutes: WeekdayMinutes::from_array([0, 720, 720, 0, 720, 0, 720]),
        }
    }

    pub fn custom(minutes: [u32; 7]) -> Self {
        Self {
            work_pattern_type: WorkPatternType::Fixed,
            minutes: WeekdayMinutes::from_array(minutes),
        }
    }

    /// The seven pattern days, Sunday first
    pub fn days(&self) -> Vec<WorkPatternDay> {
        WeekdayMinutes::WEEK
            .iter()
            .map(|day| WorkPatternDay {
                day_of_week: *day,
                minutes: self.minutes.get(*day),
            })
            .collect()
    }

    pub fn weekly_minutes(&self) -> u32 {
        self.minutes.total()
    }

    pub fn hours_per_week(&self) -> Decimal {
        (Decimal::from(self.weekly_minutes()) / Decimal::from(60)).round_dp(2)
    }
}

/// Unit for intermittent leave frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyBasis {
    Days,
    Weeks,
    Months,
}

/// Unit for the length of each intermittent absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationBasis {
    Minutes,
    Hours,
    Days,
}

/// Leave period variant without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeavePeriodKind {
    Continuous,
    Intermittent,
    ReducedSchedule,
}

impl LeavePeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeavePeriodKind::Continuous => "continuous",
            LeavePeriodKind::Intermittent => "intermittent",
            LeavePeriodKind::ReducedSchedule => "reduced_schedule",
        }
    }
}

/// The single leave period of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LeavePeriod {
    Continuous {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Intermittent {
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: u32,
        frequency_interval: u32,
        frequency_interval_basis: FrequencyBasis,
        duration: u32,
        duration_basis: DurationBasis,
    },
    ReducedSchedule {
        start_date: NaiveDate,
        end_date: NaiveDate,
        minutes_off: WeekdayMinutes,
    },
}

impl LeavePeriod {
    pub fn kind(&self) -> LeavePeriodKind {
        match self {
            LeavePeriod::Continuous { .. } => LeavePeriodKind::Continuous,
            LeavePeriod::Intermittent { .. } => LeavePeriodKind::Intermittent,
            LeavePeriod::ReducedSchedule { .. } => LeavePeriodKind::ReducedSchedule,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        match self {
            LeavePeriod::Continuous { start_date, .. }
            | LeavePeriod::Intermittent { start_date, .. }
            | LeavePeriod::ReducedSchedule { start_date, .. } => *start_date,
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        match self {
            LeavePeriod::Continuous { end_date, .. }
            | LeavePeriod::Intermittent { end_date, .. }
            | LeavePeriod::ReducedSchedule { end_date, .. } => *end_date,
        }
    }

    /// The leave span; a period with reversed dates is clamped to its start
    pub fn dates(&self) -> DateRange {
        let start = self.start_date();
        DateRange::bounded(start, self.end_date()).unwrap_or(DateRange { start, end: start })
    }
}

/// Leave details section of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDetails {
    pub reason: LeaveReason,
    #[serde(default)]
    pub reason_qualifier: Option<ReasonQualifier>,
    #[serde(default)]
    pub pregnant_or_recent_birth: bool,
    #[serde(default)]
    pub child_birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub child_placement_date: Option<NaiveDate>,
    pub employer_notified: bool,
    #[serde(default)]
    pub employer_notification_date: Option<NaiveDate>,
    pub leave_period: LeavePeriod,
}

impl LeaveDetails {
    pub fn has_continuous_leave_periods(&self) -> bool {
        self.leave_period.kind() == LeavePeriodKind::Continuous
    }

    pub fn has_intermittent_leave_periods(&self) -> bool {
        self.leave_period.kind() == LeavePeriodKind::Intermittent
    }

    pub fn has_reduced_schedule_leave_periods(&self) -> bool {
        self.leave_period.kind() == LeavePeriodKind::ReducedSchedule
    }

    /// Birth or placement date, whichever applies
    pub fn bonding_date(&self) -> Option<NaiveDate> {
        self.child_birth_date.or(self.child_placement_date)
    }
}

/// A paid leave application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// SSN, `NNN-NN-NNNN`
    pub tax_identifier: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub mass_id: Option<String>,
    pub has_state_id: bool,
    pub employer_fein: String,
    pub residential_address: Address,
    pub phone: String,
    pub email: String,
    pub hours_worked_per_week: Decimal,
    pub work_pattern: WorkPattern,
    pub leave_details: LeaveDetails,
}

impl Claim {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn leave_dates(&self) -> DateRange {
        self.leave_details.leave_period.dates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flags_follow_variant() {
        let details = LeaveDetails {
            reason: LeaveReason::SeriousHealthCondition,
            reason_qualifier: None,
            pregnant_or_recent_birth: false,
            child_birth_date: None,
            child_placement_date: None,
            employer_notified: true,
            employer_notification_date: Some(date(2024, 5, 1)),
            leave_period: LeavePeriod::ReducedSchedule {
                start_date: date(2024, 6, 1),
                end_date: date(2024, 6, 30),
                minutes_off: WeekdayMinutes::default(),
            },
        };

        assert!(details.has_reduced_schedule_leave_periods());
        assert!(!details.has_continuous_leave_periods());
        assert!(!details.has_intermittent_leave_periods());
    }

    #[test]
    fn test_standard_pattern_is_forty_hours() {
        let pattern = WorkPattern::standard();
        assert_eq!(pattern.weekly_minutes(), 2400);
        assert_eq!(pattern.hours_per_week(), Decimal::from(40));
        assert_eq!(pattern.days()[0].day_of_week, Weekday::Sun);
        assert_eq!(pattern.days()[1].minutes, 480);
    }

    #[test]
    fn test_rotating_shift_days() {
        let minutes = WorkPattern::rotating_shift().minutes;
        assert_eq!(minutes.get(Weekday::Mon), 720);
        assert_eq!(minutes.get(Weekday::Wed), 0);
        assert_eq!(minutes.get(Weekday::Sat), 720);
    }

    #[test]
    fn test_leave_period_serializes_with_tag() {
        let period = LeavePeriod::Continuous {
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 14),
        };
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["type"], "continuous");
        assert_eq!(period.dates().days(), 14);
    }

    #[test]
    fn test_reason_serializes_as_api_string() {
        let json = serde_json::to_string(&LeaveReason::ChildBonding).unwrap();
        assert_eq!(json, "\"Child Bonding\"");
    }
}
