//! Claims API request and response bodies

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_claims::{
    AccountType, Claim, DurationBasis, FrequencyBasis, LeavePeriod, PaymentPreference, WeekdayMinutes,
    WorkPattern, WorkPatternType,
};
use domain_employment::Address;

/// Envelope wrapping every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Application state returned by create, submit and complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub application_id: String,
    #[serde(default)]
    pub fineos_absence_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body of a rejected request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiFieldError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressBody {
    pub line_1: String,
    pub line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<&Address> for AddressBody {
    fn from(address: &Address) -> Self {
        Self {
            line_1: address.line_1.clone(),
            line_2: address.line_2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkPatternDayBody {
    pub day_of_week: &'static str,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkPatternBody {
    pub work_pattern_type: &'static str,
    pub work_pattern_days: Vec<WorkPatternDayBody>,
}

impl From<&WorkPattern> for WorkPatternBody {
    fn from(pattern: &WorkPattern) -> Self {
        Self {
            work_pattern_type: match pattern.work_pattern_type {
                WorkPatternType::Fixed => "Fixed",
                WorkPatternType::Rotating => "Rotating",
            },
            work_pattern_days: pattern
                .days()
                .into_iter()
                .map(|day| WorkPatternDayBody {
                    day_of_week: day_name(day.day_of_week),
                    minutes: day.minutes,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinuousPeriodBody {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntermittentPeriodBody {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: u32,
    pub frequency_interval: u32,
    pub frequency_interval_basis: &'static str,
    pub duration: u32,
    pub duration_basis: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedSchedulePeriodBody {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sunday_off_minutes: u32,
    pub monday_off_minutes: u32,
    pub tuesday_off_minutes: u32,
    pub wednesday_off_minutes: u32,
    pub thursday_off_minutes: u32,
    pub friday_off_minutes: u32,
    pub saturday_off_minutes: u32,
}

impl ReducedSchedulePeriodBody {
    fn new(start_date: NaiveDate, end_date: NaiveDate, off: &WeekdayMinutes) -> Self {
        Self {
            start_date,
            end_date,
            sunday_off_minutes: off.sunday,
            monday_off_minutes: off.monday,
            tuesday_off_minutes: off.tuesday,
            wednesday_off_minutes: off.wednesday,
            thursday_off_minutes: off.thursday,
            friday_off_minutes: off.friday,
            saturday_off_minutes: off.saturday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveDetailsBody {
    pub reason: &'static str,
    pub reason_qualifier: Option<&'static str>,
    pub pregnant_or_recent_birth: bool,
    pub child_birth_date: Option<NaiveDate>,
    pub child_placement_date: Option<NaiveDate>,
    pub employer_notified: bool,
    pub employer_notification_date: Option<NaiveDate>,
    pub continuous_leave_periods: Vec<ContinuousPeriodBody>,
    pub intermittent_leave_periods: Vec<IntermittentPeriodBody>,
    pub reduced_schedule_leave_periods: Vec<ReducedSchedulePeriodBody>,
}

/// Body of `PATCH /applications/{id}`
///
/// The API carries one list per leave-period kind plus a flag for each; a
/// claim always fills exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationBody {
    pub first_name: String,
    pub last_name: String,
    pub tax_identifier: String,
    pub date_of_birth: NaiveDate,
    pub has_state_id: bool,
    pub mass_id: Option<String>,
    pub employer_fein: String,
    pub residential_address: AddressBody,
    pub phone: PhoneBody,
    pub email: String,
    pub hours_worked_per_week: Decimal,
    pub work_pattern: WorkPatternBody,
    pub has_continuous_leave_periods: bool,
    pub has_intermittent_leave_periods: bool,
    pub has_reduced_schedule_leave_periods: bool,
    pub leave_details: LeaveDetailsBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneBody {
    pub phone_number: String,
    pub phone_type: &'static str,
}

impl From<&Claim> for ApplicationBody {
    fn from(claim: &Claim) -> Self {
        let details = &claim.leave_details;
        let mut continuous = Vec::new();
        let mut intermittent = Vec::new();
        let mut reduced = Vec::new();

        match &details.leave_period {
            LeavePeriod::Continuous { start_date, end_date } => continuous.push(ContinuousPeriodBody {
                start_date: *start_date,
                end_date: *end_date,
            }),
            LeavePeriod::Intermittent {
                start_date,
                end_date,
                frequency,
                frequency_interval,
                frequency_interval_basis,
                duration,
                duration_basis,
            } => intermittent.push(IntermittentPeriodBody {
                start_date: *start_date,
                end_date: *end_date,
                frequency: *frequency,
                frequency_interval: *frequency_interval,
                frequency_interval_basis: frequency_name(*frequency_interval_basis),
                duration: *duration,
                duration_basis: duration_name(*duration_basis),
            }),
            LeavePeriod::ReducedSchedule {
                start_date,
                end_date,
                minutes_off,
            } => reduced.push(ReducedSchedulePeriodBody::new(*start_date, *end_date, minutes_off)),
        }

        Self {
            first_name: claim.first_name.clone(),
            last_name: claim.last_name.clone(),
            tax_identifier: claim.tax_identifier.clone(),
            date_of_birth: claim.date_of_birth,
            has_state_id: claim.has_state_id,
            mass_id: claim.mass_id.clone(),
            employer_fein: claim.employer_fein.clone(),
            residential_address: AddressBody::from(&claim.residential_address),
            phone: PhoneBody {
                phone_number: claim.phone.clone(),
                phone_type: "Cell",
            },
            email: claim.email.clone(),
            hours_worked_per_week: claim.hours_worked_per_week,
            work_pattern: WorkPatternBody::from(&claim.work_pattern),
            has_continuous_leave_periods: details.has_continuous_leave_periods(),
            has_intermittent_leave_periods: details.has_intermittent_leave_periods(),
            has_reduced_schedule_leave_periods: details.has_reduced_schedule_leave_periods(),
            leave_details: LeaveDetailsBody {
                reason: details.reason.as_str(),
                reason_qualifier: details.reason_qualifier.as_ref().map(|q| q.as_str()),
                pregnant_or_recent_birth: details.pregnant_or_recent_birth,
                child_birth_date: details.child_birth_date,
                child_placement_date: details.child_placement_date,
                employer_notified: details.employer_notified,
                employer_notification_date: details.employer_notification_date,
                continuous_leave_periods: continuous,
                intermittent_leave_periods: intermittent,
                reduced_schedule_leave_periods: reduced,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPreferenceFields {
    pub payment_method: &'static str,
    pub routing_number: Option<String>,
    pub account_number: Option<String>,
    pub bank_account_type: Option<&'static str>,
}

/// Body of `POST /applications/{id}/submit_payment_preference`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPreferenceBody {
    pub payment_preference: PaymentPreferenceFields,
}

impl From<&PaymentPreference> for PaymentPreferenceBody {
    fn from(preference: &PaymentPreference) -> Self {
        let fields = match preference {
            PaymentPreference::Ach {
                routing_number,
                account_number,
                account_type,
            } => PaymentPreferenceFields {
                payment_method: preference.method_name(),
                routing_number: Some(routing_number.clone()),
                account_number: Some(account_number.clone()),
                bank_account_type: Some(match account_type {
                    AccountType::Checking => "Checking",
                    AccountType::Savings => "Savings",
                }),
            },
            PaymentPreference::Check | PaymentPreference::Debit => PaymentPreferenceFields {
                payment_method: preference.method_name(),
                routing_number: None,
                account_number: None,
                bank_account_type: None,
            },
        };
        Self {
            payment_preference: fields,
        }
    }
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn frequency_name(basis: FrequencyBasis) -> &'static str {
    match basis {
        FrequencyBasis::Days => "Days",
        FrequencyBasis::Weeks => "Weeks",
        FrequencyBasis::Months => "Months",
    }
}

fn duration_name(basis: DurationBasis) -> &'static str {
    match basis {
        DurationBasis::Minutes => "Minutes",
        DurationBasis::Hours => "Hours",
        DurationBasis::Days => "Days",
    }
}
