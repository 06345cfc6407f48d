//! Scenario descriptors, the built-in catalog, and weighted mixes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use domain_employment::EmployeeSpec;

use crate::claim::{DurationBasis, FrequencyBasis, LeavePeriodKind, LeaveReason, ReasonQualifier, WorkPattern};
use crate::error::ClaimError;
use crate::generated::{DocumentConfig, DocumentType, EmployerDecision, FraudStatus};

/// When the child arrived relative to the leave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondingDate {
    /// More than a year before the leave starts, outside the benefit year
    FarPast,
    /// Shortly before the leave starts
    Past,
    /// Shortly after the generation date
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPatternSpec {
    #[default]
    Standard,
    RotatingShift,
    /// Minutes per day, Sunday first
    Custom([u32; 7]),
}

impl WorkPatternSpec {
    pub fn build(&self) -> WorkPattern {
        match self {
            WorkPatternSpec::Standard => WorkPattern::standard(),
            WorkPatternSpec::RotatingShift => WorkPattern::rotating_shift(),
            WorkPatternSpec::Custom(minutes) => WorkPattern::custom(*minutes),
        }
    }
}

/// Frequency and duration of intermittent absences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermittentSpec {
    pub frequency: u32,
    pub frequency_interval: u32,
    pub frequency_interval_basis: FrequencyBasis,
    pub duration: u32,
    pub duration_basis: DurationBasis,
}

impl Default for IntermittentSpec {
    fn default() -> Self {
        Self {
            frequency: 1,
            frequency_interval: 1,
            frequency_interval_basis: FrequencyBasis::Weeks,
            duration: 1,
            duration_basis: DurationBasis::Days,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSpec {
    #[default]
    Ach,
    Check,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerResponseSpec {
    pub decision: EmployerDecision,
    #[serde(default)]
    pub fraud: FraudStatus,
    #[serde(default)]
    pub comment: Option<String>,
}

/// What kind of claim a scenario produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSpec {
    pub reason: LeaveReason,
    #[serde(default)]
    pub reason_qualifier: Option<ReasonQualifier>,
    #[serde(default)]
    pub has_continuous_leave_periods: bool,
    #[serde(default)]
    pub has_intermittent_leave_periods: bool,
    #[serde(default)]
    pub has_reduced_schedule_leave_periods: bool,
    /// Fixed leave start and end; random when absent
    #[serde(default)]
    pub leave_dates: Option<(NaiveDate, NaiveDate)>,
    /// Leave of a week or less
    #[serde(default)]
    pub short_claim: bool,
    #[serde(default)]
    pub work_pattern: WorkPatternSpec,
    #[serde(default)]
    pub intermittent: Option<IntermittentSpec>,
    #[serde(default)]
    pub bonding_date: Option<BondingDate>,
    #[serde(default)]
    pub pregnant_or_recent_birth: bool,
    #[serde(default)]
    pub docs: BTreeMap<DocumentType, DocumentConfig>,
    #[serde(default)]
    pub employer_response: Option<EmployerResponseSpec>,
    #[serde(default)]
    pub payment: PaymentSpec,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ClaimSpec {
    /// A claim spec with a single leave-period flag set
    pub fn new(reason: LeaveReason, kind: LeavePeriodKind) -> Self {
        Self {
            reason,
            reason_qualifier: None,
            has_continuous_leave_periods: kind == LeavePeriodKind::Continuous,
            has_intermittent_leave_periods: kind == LeavePeriodKind::Intermittent,
            has_reduced_schedule_leave_periods: kind == LeavePeriodKind::ReducedSchedule,
            leave_dates: None,
            short_claim: false,
            work_pattern: WorkPatternSpec::default(),
            intermittent: None,
            bonding_date: None,
            pregnant_or_recent_birth: false,
            docs: BTreeMap::new(),
            employer_response: None,
            payment: PaymentSpec::default(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: ReasonQualifier) -> Self {
        self.reason_qualifier = Some(qualifier);
        self
    }

    pub fn with_bonding_date(mut self, bonding_date: BondingDate) -> Self {
        self.bonding_date = Some(bonding_date);
        self
    }

    pub fn with_doc(mut self, document_type: DocumentType) -> Self {
        self.docs.insert(document_type, DocumentConfig::default());
        self
    }

    pub fn with_work_pattern(mut self, work_pattern: WorkPatternSpec) -> Self {
        self.work_pattern = work_pattern;
        self
    }

    pub fn with_employer_response(mut self, decision: EmployerDecision) -> Self {
        self.employer_response = Some(EmployerResponseSpec {
            decision,
            fraud: FraudStatus::No,
            comment: None,
        });
        self
    }

    pub fn short(mut self) -> Self {
        self.short_claim = true;
        self
    }

    /// The single leave-period kind the flags describe
    pub fn leave_period_kind(&self) -> Result<LeavePeriodKind, ClaimError> {
        let flagged: Vec<LeavePeriodKind> = [
            (self.has_continuous_leave_periods, LeavePeriodKind::Continuous),
            (self.has_intermittent_leave_periods, LeavePeriodKind::Intermittent),
            (self.has_reduced_schedule_leave_periods, LeavePeriodKind::ReducedSchedule),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, kind)| kind)
        .collect();

        match flagged.as_slice() {
            [kind] => Ok(*kind),
            [] => Err(ClaimError::unsupported("no leave-period type selected")),
            many => Err(ClaimError::unsupported(format!(
                "exactly one leave-period type is supported, got {}",
                many.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
            ))),
        }
    }

    /// Checks the reason and qualifier pairing
    pub fn check_reason(&self) -> Result<(), ClaimError> {
        match (self.reason, self.reason_qualifier) {
            (LeaveReason::ChildBonding, None) => Err(ClaimError::unsupported(
                "child bonding requires a reason qualifier",
            )),
            (LeaveReason::ChildBonding, Some(_)) => Ok(()),
            (reason, Some(qualifier)) => Err(ClaimError::unsupported(format!(
                "qualifier {} does not apply to {}",
                qualifier.as_str(),
                reason
            ))),
            (_, None) => Ok(()),
        }
    }
}

/// A named claim recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub employee: EmployeeSpec,
    pub claim: ClaimSpec,
}

impl ScenarioSpec {
    pub fn new(name: impl Into<String>, employee: EmployeeSpec, claim: ClaimSpec) -> Self {
        Self {
            name: name.into(),
            employee,
            claim,
        }
    }
}

/// Named scenarios available to a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCatalog {
    scenarios: Vec<ScenarioSpec>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<ScenarioSpec>) -> Self {
        Self { scenarios }
    }

    /// The scenarios shipped with the generator
    pub fn builtin() -> Self {
        use DocumentType as Doc;
        use LeavePeriodKind::*;
        use LeaveReason::*;

        let with_id = EmployeeSpec::eligible().with_mass_id();

        Self::new(vec![
            ScenarioSpec::new(
                "medical_continuous",
                with_id.clone(),
                ClaimSpec::new(SeriousHealthCondition, Continuous).with_doc(Doc::Hcp).with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "medical_intermittent",
                with_id.clone(),
                ClaimSpec::new(SeriousHealthCondition, Intermittent).with_doc(Doc::Hcp).with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "medical_reduced",
                with_id.clone(),
                ClaimSpec::new(SeriousHealthCondition, ReducedSchedule)
                    .with_work_pattern(WorkPatternSpec::RotatingShift)
                    .with_doc(Doc::Hcp)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "medical_short",
                with_id.clone(),
                ClaimSpec::new(SeriousHealthCondition, Continuous)
                    .short()
                    .with_doc(Doc::Hcp)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "bonding_newborn",
                with_id.clone(),
                ClaimSpec::new(ChildBonding, Continuous)
                    .with_qualifier(ReasonQualifier::Newborn)
                    .with_bonding_date(BondingDate::Past)
                    .with_doc(Doc::BirthCertificate)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "bonding_adoption",
                EmployeeSpec::eligible(),
                ClaimSpec::new(ChildBonding, Continuous)
                    .with_qualifier(ReasonQualifier::Adoption)
                    .with_bonding_date(BondingDate::Past)
                    .with_doc(Doc::AdoptionCertificate)
                    .with_doc(Doc::OutOfStateId),
            ),
            ScenarioSpec::new(
                "bonding_foster",
                with_id.clone(),
                ClaimSpec::new(ChildBonding, Continuous)
                    .with_qualifier(ReasonQualifier::FosterCare)
                    .with_bonding_date(BondingDate::Future)
                    .with_doc(Doc::FosterPlacement)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "bonding_far_past_denial",
                with_id.clone(),
                ClaimSpec::new(ChildBonding, Continuous)
                    .with_qualifier(ReasonQualifier::Newborn)
                    .with_bonding_date(BondingDate::FarPast)
                    .with_employer_response(EmployerDecision::Deny)
                    .with_doc(Doc::BirthCertificate)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "caring_continuous",
                with_id.clone(),
                ClaimSpec::new(CareForFamilyMember, Continuous)
                    .with_employer_response(EmployerDecision::Approve)
                    .with_doc(Doc::CaringCertification)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "pregnancy_continuous",
                with_id.clone(),
                ClaimSpec::new(PregnancyMaternity, Continuous)
                    .with_doc(Doc::PregnancyMaternity)
                    .with_doc(Doc::MassId),
            ),
            ScenarioSpec::new(
                "ineligible_medical",
                EmployeeSpec::ineligible().with_mass_id(),
                ClaimSpec::new(SeriousHealthCondition, Continuous).with_doc(Doc::Hcp).with_doc(Doc::MassId),
            ),
        ])
    }

    pub fn from_json_str(json: &str) -> Result<Self, ClaimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClaimError> {
        let path = path.as_ref();
        let catalog = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), scenarios = catalog.len(), "Loaded scenario catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&ScenarioSpec, ClaimError> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ClaimError::UnknownScenario(name.to_string()))
    }

    /// Adds a scenario, replacing one with the same name
    pub fn insert(&mut self, scenario: ScenarioSpec) {
        match self.scenarios.iter_mut().find(|s| s.name == scenario.name) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioSpec> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Weighted scenario selection for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMix {
    entries: Vec<(String, u32)>,
}

impl ScenarioMix {
    pub fn new(entries: Vec<(String, u32)>) -> Result<Self, ClaimError> {
        if entries.iter().map(|(_, w)| u64::from(*w)).sum::<u64>() == 0 {
            return Err(ClaimError::InvalidMix("weights must not all be zero".to_string()));
        }
        Ok(Self { entries })
    }

    /// A mix with a single scenario
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            entries: vec![(name.into(), 1)],
        }
    }

    /// Parses `name=weight,name=weight`; a bare name has weight 1
    pub fn parse(input: &str) -> Result<Self, ClaimError> {
        let entries = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((name, weight)) => weight
                    .trim()
                    .parse::<u32>()
                    .map(|w| (name.trim().to_string(), w))
                    .map_err(|_| ClaimError::InvalidMix(format!("invalid weight in {}", part))),
                None => Ok((part.to_string(), 1)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// Checks every scenario in the mix exists in the catalog
    pub fn validate(&self, catalog: &ScenarioCatalog) -> Result<(), ClaimError> {
        for (name, _) in &self.entries {
            catalog.get(name)?;
        }
        Ok(())
    }

    /// Splits `total` claims across the scenarios in proportion to their
    /// weights using the largest remainder method; ties go to the earlier entry
    pub fn counts(&self, total: usize) -> Vec<(String, usize)> {
        let weight_sum: u64 = self.entries.iter().map(|(_, w)| u64::from(*w)).sum();
        if weight_sum == 0 {
            return self.entries.iter().map(|(n, _)| (n.clone(), 0)).collect();
        }

        let total = total as u64;
        let mut counts: Vec<(String, usize)> = Vec::with_capacity(self.entries.len());
        let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(self.entries.len());
        let mut assigned = 0u64;

        for (index, (name, weight)) in self.entries.iter().enumerate() {
            let exact = total * u64::from(*weight);
            let floor = exact / weight_sum;
            assigned += floor;
            counts.push((name.clone(), floor as usize));
            remainders.push((index, exact % weight_sum));
        }

        remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (index, _) in remainders.into_iter().take((total - assigned) as usize) {
            counts[index].1 += 1;
        }

        counts
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }
}
