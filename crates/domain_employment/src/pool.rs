//! Employer and employee pools
//!
//! Pools are generated once per simulation and persisted alongside the
//! claims. The employee pool tracks which employees have already been used
//! so that each claim gets a distinct applicant.

use chrono::NaiveDate;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use core_kernel::EmployeeId;

use crate::employee::{Employee, EmployeeSpec};
use crate::employer::{Employer, EmployerSpec};
use crate::error::EmploymentError;
use crate::factory::{EmployeeFactory, EmployerFactory};

/// A set of employers that employees are attached to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployerPool {
    employers: Vec<Employer>,
}

impl EmployerPool {
    pub fn new(employers: Vec<Employer>) -> Self {
        Self { employers }
    }

    /// Generates `count` employers from the same spec
    pub fn generate<R: Rng>(count: usize, spec: &EmployerSpec, as_of: NaiveDate, rng: &mut R) -> Self {
        let employers = (0..count)
            .map(|_| EmployerFactory::generate(spec, as_of, rng))
            .collect();
        info!(count, "Generated employer pool");
        Self { employers }
    }

    /// Picks an employer, weighted by size
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&Employer> {
        let weights = self.employers.iter().map(|e| e.size.weight());
        let index = WeightedIndex::new(weights).ok()?;
        self.employers.get(index.sample(rng))
    }

    pub fn find_by_fein(&self, fein: &str) -> Option<&Employer> {
        self.employers.iter().find(|e| e.fein == fein)
    }

    pub fn push(&mut self, employer: Employer) {
        self.employers.push(employer);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employer> {
        self.employers.iter()
    }

    pub fn len(&self) -> usize {
        self.employers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employers.is_empty()
    }

    pub fn into_inner(self) -> Vec<Employer> {
        self.employers
    }
}

/// A set of employees with usage tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePool {
    employees: Vec<Employee>,
    #[serde(default)]
    used: BTreeSet<EmployeeId>,
}

impl EmployeePool {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees,
            used: BTreeSet::new(),
        }
    }

    /// Generates `count` employees matching `spec`, attached to `employers`
    pub fn generate<R: Rng>(
        count: usize,
        spec: &EmployeeSpec,
        employers: &EmployerPool,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> Result<Self, EmploymentError> {
        let employees = (0..count)
            .map(|_| EmployeeFactory::generate(spec, employers, as_of, rng))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count, employers = employers.len(), "Generated employee pool");
        Ok(Self::new(employees))
    }

    /// Picks an unused employee matching `spec` and marks it used
    pub fn pick<R: Rng>(&mut self, spec: &EmployeeSpec, rng: &mut R) -> Result<Employee, EmploymentError> {
        let candidates: Vec<usize> = self
            .employees
            .iter()
            .enumerate()
            .filter(|(_, e)| !self.used.contains(&e.id) && e.matches(spec))
            .map(|(i, _)| i)
            .collect();

        let index = *candidates.choose(rng).ok_or_else(|| {
            warn!(
                pool_size = self.employees.len(),
                used = self.used.len(),
                "No unused employee matches the request"
            );
            EmploymentError::EmployeePoolExhausted {
                pool_size: self.employees.len(),
                used: self.used.len(),
            }
        })?;

        let employee = self.employees[index].clone();
        self.used.insert(employee.id);
        Ok(employee)
    }

    /// Adds an employee that was generated outside the pool, marking it used
    pub fn add_used(&mut self, employee: Employee) {
        self.used.insert(employee.id);
        self.employees.push(employee);
    }

    pub fn mark_used(&mut self, id: EmployeeId) {
        self.used.insert(id);
    }

    pub fn is_used(&self, id: &EmployeeId) -> bool {
        self.used.contains(id)
    }

    pub fn used_ids(&self) -> impl Iterator<Item = &EmployeeId> {
        self.used.iter()
    }

    /// Number of employees not yet used
    pub fn remaining(&self) -> usize {
        self.employees.iter().filter(|e| !self.used.contains(&e.id)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
