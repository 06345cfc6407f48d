//! Streaming claim writer
//!
//! Claims are appended to `claims.json` one element at a time, and a row
//! per claim goes to the `claims.csv` index, so a run never holds its whole
//! claim set in memory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use domain_claims::GeneratedClaim;

use crate::error::SimulationError;
use crate::storage::SimulationStorage;

/// One row of the CSV claim index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimIndexRow {
    pub id: String,
    pub scenario: String,
    pub name: String,
    pub ssn: String,
    pub fein: String,
    pub reason: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub documents: usize,
}

impl From<&GeneratedClaim> for ClaimIndexRow {
    fn from(generated: &GeneratedClaim) -> Self {
        let claim = &generated.claim;
        let dates = claim.leave_dates();
        Self {
            id: generated.id.to_string(),
            scenario: generated.scenario.clone(),
            name: claim.full_name(),
            ssn: claim.tax_identifier.clone(),
            fein: claim.employer_fein.clone(),
            reason: claim.leave_details.reason.as_str().to_string(),
            leave_type: claim.leave_details.leave_period.kind().as_str().to_string(),
            start_date: dates.start,
            end_date: dates.end,
            documents: generated.documents.len(),
        }
    }
}

/// Writes claims to a JSON array and a CSV index as they are produced
pub struct ClaimStreamWriter {
    json: BufWriter<File>,
    index: csv::Writer<File>,
    written: usize,
}

impl ClaimStreamWriter {
    /// Opens the claim files of `storage`, truncating any previous run
    pub fn create(storage: &SimulationStorage) -> Result<Self, SimulationError> {
        Self::open(&storage.claims_file(), &storage.claims_index_file())
    }

    pub fn open(json_path: &Path, index_path: &Path) -> Result<Self, SimulationError> {
        let mut json = BufWriter::new(File::create(json_path)?);
        json.write_all(b"[")?;
        let index = csv::Writer::from_path(index_path)?;
        Ok(Self {
            json,
            index,
            written: 0,
        })
    }

    pub fn write(&mut self, claim: &GeneratedClaim) -> Result<(), SimulationError> {
        if self.written > 0 {
            self.json.write_all(b",")?;
        }
        self.json.write_all(b"\n")?;
        serde_json::to_writer(&mut self.json, claim)?;
        self.index.serialize(ClaimIndexRow::from(claim))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Closes the JSON array and flushes both files, returning the claim count
    pub fn finish(mut self) -> Result<usize, SimulationError> {
        self.json.write_all(b"\n]\n")?;
        self.json.flush()?;
        self.index.flush()?;
        Ok(self.written)
    }
}

/// Reads back a claim file written by [`ClaimStreamWriter`]
pub fn read_claims(path: &Path) -> Result<Vec<GeneratedClaim>, SimulationError> {
    if !path.is_file() {
        return Err(SimulationError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_claim_index(path: &Path) -> Result<Vec<ClaimIndexRow>, SimulationError> {
    if !path.is_file() {
        return Err(SimulationError::MissingFile(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<ClaimIndexRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SimulationStorage::new(dir.path());

        let writer = ClaimStreamWriter::create(&storage).unwrap();
        assert_eq!(writer.finish().unwrap(), 0);

        assert!(read_claims(&storage.claims_file()).unwrap().is_empty());
        assert!(read_claim_index(&storage.claims_index_file()).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_claims_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_claims(&dir.path().join("claims.json"));
        assert!(matches!(result, Err(SimulationError::MissingFile(_))));
    }
}
