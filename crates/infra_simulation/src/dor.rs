//! Department of Revenue fixture files
//!
//! Two fixed-width files are produced per export:
//!
//! - `DORDFMLEMP_<YYYYMMDDHHMMSS>`: one record per employer
//! - `DORDFML_<YYYYMMDDHHMMSS>`: for every employer and quarter an `A`
//!   record, followed by a `B` wage record for each of its employees
//!
//! Text is left-aligned and space padded, amounts are right-aligned with two
//! decimals, booleans are `T`/`F` and dates `YYYYMMDD`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use core_kernel::{EmployerId, Money, Quarter, Rate};
use domain_employment::{Employee, EmployeePool, Employer, EmployerPool, Occupation};

use crate::error::SimulationError;

pub const EMPLOYER_FILE_PREFIX: &str = "DORDFMLEMP_";
pub const WAGE_FILE_PREFIX: &str = "DORDFML_";

const ACCOUNT_KEY: usize = 14;
const NAME: usize = 255;
const FEIN: usize = 14;
const STREET: usize = 255;
const CITY: usize = 30;
const STATE: usize = 2;
const ZIP: usize = 9;
const COUNTRY: usize = 3;
const DATE: usize = 8;
const TIMESTAMP: usize = 14;
const SSN: usize = 9;
const AMOUNT: usize = 20;

/// Width of a `DORDFMLEMP_` line, excluding the newline
pub const EMPLOYER_RECORD_WIDTH: usize =
    ACCOUNT_KEY + NAME + FEIN + STREET + CITY + STATE + ZIP + COUNTRY + NAME + 1 + 1 + DATE + DATE + TIMESTAMP;
/// Width of an `A` line
pub const EMPLOYER_QUARTER_RECORD_WIDTH: usize =
    1 + ACCOUNT_KEY + DATE + NAME + FEIN + 1 + 1 + DATE + DATE + TIMESTAMP;
/// Width of a `B` line
pub const WAGE_RECORD_WIDTH: usize = 1 + ACCOUNT_KEY + DATE + NAME + NAME + SSN + 1 + 1 + AMOUNT * 6;

/// Contribution shares applied to quarterly wages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionRates {
    pub employee_medical: Rate,
    pub employer_medical: Rate,
    pub employee_family: Rate,
    pub employer_family: Rate,
}

impl Default for ContributionRates {
    fn default() -> Self {
        Self {
            employee_medical: Rate::from_percentage(dec!(0.2736)),
            employer_medical: Rate::from_percentage(dec!(0.1824)),
            employee_family: Rate::from_percentage(dec!(0.114)),
            employer_family: Rate::from_percentage(dec!(0.0)),
        }
    }
}

/// Builds one fixed-width line
struct Record {
    line: String,
}

impl Record {
    fn new() -> Self {
        Self { line: String::new() }
    }

    fn kind(mut self, kind: char) -> Self {
        self.line.push(kind);
        self
    }

    /// Left-aligned, truncated to `width`
    ///
    /// Non-ASCII characters become `?` so every column keeps its byte offset.
    fn text(mut self, value: &str, width: usize) -> Self {
        let value: String = value
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .take(width)
            .collect();
        self.line.push_str(&format!("{:<width$}", value, width = width));
        self
    }

    /// Right-aligned with two decimals
    fn amount(mut self, field: &'static str, value: Money) -> Result<Self, SimulationError> {
        let formatted = format!("{:.2}", value.round_to_cents().amount());
        if formatted.len() > AMOUNT {
            return Err(SimulationError::FieldTooWide {
                field,
                width: AMOUNT,
                value: formatted,
            });
        }
        self.line.push_str(&format!("{:>width$}", formatted, width = AMOUNT));
        Ok(self)
    }

    fn flag(mut self, value: bool) -> Self {
        self.line.push(if value { 'T' } else { 'F' });
        self
    }

    fn date(self, value: Option<NaiveDate>) -> Self {
        let formatted = value.map(|d| d.format("%Y%m%d").to_string()).unwrap_or_default();
        self.text(&formatted, DATE)
    }

    fn timestamp(self, value: NaiveDateTime) -> Self {
        let formatted = value.format("%Y%m%d%H%M%S").to_string();
        self.text(&formatted, TIMESTAMP)
    }

    fn finish(self) -> String {
        self.line
    }
}

/// Formats the employer file record for `employer`
pub fn employer_record(employer: &Employer) -> String {
    let address = &employer.address;
    let street = match &address.line_2 {
        Some(line_2) => format!("{} {}", address.line_1, line_2),
        None => address.line_1.clone(),
    };
    Record::new()
        .text(&employer.account_key, ACCOUNT_KEY)
        .text(&employer.name, NAME)
        .text(&employer.fein_digits(), FEIN)
        .text(&street, STREET)
        .text(&address.city, CITY)
        .text(&address.state, STATE)
        .text(&address.zip, ZIP)
        .text("USA", COUNTRY)
        .text(&employer.dba, NAME)
        .flag(employer.family_exemption)
        .flag(employer.medical_exemption)
        .date(employer.exemption_commence_date)
        .date(employer.exemption_cease_date)
        .timestamp(employer.updated_date.naive_utc())
        .finish()
}

/// Formats the `A` record opening `employer`'s filing for `quarter`
pub fn employer_quarter_record(employer: &Employer, quarter: Quarter) -> String {
    Record::new()
        .kind('A')
        .text(&employer.account_key, ACCOUNT_KEY)
        .date(Some(quarter.end()))
        .text(&employer.name, NAME)
        .text(&employer.fein_digits(), FEIN)
        .flag(employer.family_exemption)
        .flag(employer.medical_exemption)
        .date(employer.exemption_commence_date)
        .date(employer.exemption_cease_date)
        .timestamp(employer.updated_date.naive_utc())
        .finish()
}

/// Formats the `B` wage record of one employee for one quarter
pub fn wage_record(
    employer: &Employer,
    employee: &Employee,
    occupation: &Occupation,
    quarter: Quarter,
    rates: &ContributionRates,
) -> Result<String, SimulationError> {
    let quarter_wages = occupation.wages_for(quarter).unwrap_or_default();
    let ytd_wages: Money = occupation
        .wages
        .iter()
        .filter(|w| w.quarter.year == quarter.year && w.quarter <= quarter)
        .map(|w| w.amount)
        .sum();

    Ok(Record::new()
        .kind('B')
        .text(&employer.account_key, ACCOUNT_KEY)
        .date(Some(quarter.end()))
        .text(&employee.first_name, NAME)
        .text(&employee.last_name, NAME)
        .text(&employee.ssn_digits(), SSN)
        .flag(false)
        .flag(false)
        .amount("ytd_wages", ytd_wages)?
        .amount("quarter_wages", quarter_wages)?
        .amount("employee_medical", rates.employee_medical.apply(&quarter_wages))?
        .amount("employer_medical", rates.employer_medical.apply(&quarter_wages))?
        .amount("employee_family", rates.employee_family.apply(&quarter_wages))?
        .amount("employer_family", rates.employer_family.apply(&quarter_wages))?
        .finish())
}

/// Paths of one DOR export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DorFiles {
    pub employer_file: PathBuf,
    pub wage_file: PathBuf,
}

/// Writes DOR files stamped with a fixed export time
pub struct DorExporter {
    timestamp: NaiveDateTime,
    rates: ContributionRates,
}

impl DorExporter {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            rates: ContributionRates::default(),
        }
    }

    pub fn with_rates(mut self, rates: ContributionRates) -> Self {
        self.rates = rates;
        self
    }

    fn stamp(&self) -> String {
        self.timestamp.format("%Y%m%d%H%M%S").to_string()
    }

    pub fn employer_file_name(&self) -> String {
        format!("{}{}", EMPLOYER_FILE_PREFIX, self.stamp())
    }

    pub fn wage_file_name(&self) -> String {
        format!("{}{}", WAGE_FILE_PREFIX, self.stamp())
    }

    /// Writes both files into `dir` covering `quarters`
    pub fn export(
        &self,
        dir: &Path,
        employers: &EmployerPool,
        employees: &EmployeePool,
        quarters: &[Quarter],
    ) -> Result<DorFiles, SimulationError> {
        std::fs::create_dir_all(dir)?;
        let employer_file = dir.join(self.employer_file_name());
        let wage_file = dir.join(self.wage_file_name());

        self.write_employers(BufWriter::new(File::create(&employer_file)?), employers)?;
        let records = self.write_wages(BufWriter::new(File::create(&wage_file)?), employers, employees, quarters)?;

        info!(
            employers = employers.len(),
            wage_records = records,
            file = %wage_file.display(),
            "Wrote DOR files"
        );
        Ok(DorFiles {
            employer_file,
            wage_file,
        })
    }

    pub fn write_employers<W: Write>(&self, mut writer: W, employers: &EmployerPool) -> Result<(), SimulationError> {
        for employer in employers.iter() {
            writer.write_all(employer_record(employer).as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes `A` and `B` records, returning the number of `B` records
    pub fn write_wages<W: Write>(
        &self,
        mut writer: W,
        employers: &EmployerPool,
        employees: &EmployeePool,
        quarters: &[Quarter],
    ) -> Result<usize, SimulationError> {
        let mut workforce: BTreeMap<EmployerId, Vec<(&Employee, &Occupation)>> = BTreeMap::new();
        for employee in employees.iter() {
            for occupation in &employee.occupations {
                workforce
                    .entry(occupation.employer_id)
                    .or_default()
                    .push((employee, occupation));
            }
        }

        let mut wage_records = 0;
        for employer in employers.iter() {
            let staff = workforce.get(&employer.id).map(Vec::as_slice).unwrap_or(&[]);
            for &quarter in quarters {
                writer.write_all(employer_quarter_record(employer, quarter).as_bytes())?;
                writer.write_all(b"\n")?;
                for (employee, occupation) in staff {
                    if occupation.wages_for(quarter).is_none() {
                        continue;
                    }
                    let line = wage_record(employer, employee, occupation, quarter, &self.rates)?;
                    writer.write_all(line.as_bytes())?;
                    writer.write_all(b"\n")?;
                    wage_records += 1;
                }
            }
        }
        writer.flush()?;
        Ok(wage_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_text_is_padded_and_truncated() {
        let line = Record::new().text("abc", 5).text("abcdefgh", 4).finish();
        assert_eq!(line, "abc  abcd");
    }

    #[test]
    fn test_non_ascii_text_keeps_byte_width() {
        let line = Record::new().text("José Müller", 8).text("x", 2).finish();
        assert_eq!(line, "Jos? M?lx ");
        assert_eq!(line.len(), 10);
    }

    #[test]
    fn test_amount_is_right_aligned() {
        let line = Record::new()
            .amount("wages", Money::from_cents(123456))
            .unwrap()
            .finish();
        assert_eq!(line.len(), AMOUNT);
        assert!(line.ends_with("1234.56"));
        assert!(line.starts_with(' '));
    }

    #[test]
    fn test_flags_and_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let line = Record::new().flag(true).flag(false).date(Some(date)).date(None).finish();
        assert_eq!(line, "TF20240331        ");
    }

    #[test]
    fn test_file_names_carry_timestamp() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(13, 4, 5)
            .unwrap();
        let exporter = DorExporter::new(timestamp);
        assert_eq!(exporter.employer_file_name(), "DORDFMLEMP_20240515130405");
        assert_eq!(exporter.wage_file_name(), "DORDFML_20240515130405");
    }

    proptest! {
        #[test]
        fn test_text_width_is_fixed(value in "\\PC{0,40}", width in 1usize..30) {
            let line = Record::new().text(&value, width).finish();
            prop_assert_eq!(line.len(), width);
        }

        #[test]
        fn test_amount_width_is_fixed(cents in 0i64..1_000_000_000_000) {
            let line = Record::new().amount("wages", Money::from_cents(cents)).unwrap().finish();
            prop_assert_eq!(line.len(), AMOUNT);
            let expected_cents = format!("{:02}", cents % 100);
            prop_assert!(line.trim_start().ends_with(&expected_cents));
        }
    }
}
