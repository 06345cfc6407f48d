//! On-disk layout of a simulation
//!
//! ```text
//! <root>/
//!   employers.json
//!   employees.json
//!   used_employees.json
//!   claims.json
//!   claims.csv
//!   documents/<claim id>/<document type>.pdf
//!   dor/DORDFMLEMP_<timestamp>
//!   dor/DORDFML_<timestamp>
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use core_kernel::{ClaimId, EmployeeId};
use domain_claims::DocumentType;
use domain_employment::{Employee, EmployeePool, EmployerPool};

use crate::error::SimulationError;

const EMPLOYERS_FILE: &str = "employers.json";
const EMPLOYEES_FILE: &str = "employees.json";
const USED_EMPLOYEES_FILE: &str = "used_employees.json";
const CLAIMS_FILE: &str = "claims.json";
const CLAIMS_INDEX_FILE: &str = "claims.csv";
const DOCUMENTS_DIR: &str = "documents";
const DOR_DIR: &str = "dor";

/// Paths of one simulation's fixture directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationStorage {
    root: PathBuf,
}

impl SimulationStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn employers_file(&self) -> PathBuf {
        self.root.join(EMPLOYERS_FILE)
    }

    pub fn employees_file(&self) -> PathBuf {
        self.root.join(EMPLOYEES_FILE)
    }

    pub fn used_employees_file(&self) -> PathBuf {
        self.root.join(USED_EMPLOYEES_FILE)
    }

    pub fn claims_file(&self) -> PathBuf {
        self.root.join(CLAIMS_FILE)
    }

    pub fn claims_index_file(&self) -> PathBuf {
        self.root.join(CLAIMS_INDEX_FILE)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.root.join(DOCUMENTS_DIR)
    }

    pub fn claim_documents_dir(&self, claim_id: &ClaimId) -> PathBuf {
        self.documents_dir().join(claim_id.to_string())
    }

    pub fn document_file(&self, claim_id: &ClaimId, document_type: DocumentType) -> PathBuf {
        self.claim_documents_dir(claim_id).join(document_type.file_name())
    }

    pub fn dor_dir(&self) -> PathBuf {
        self.root.join(DOR_DIR)
    }

    /// Creates the root, documents and DOR directories
    pub fn prepare(&self) -> Result<(), SimulationError> {
        fs::create_dir_all(self.documents_dir())?;
        fs::create_dir_all(self.dor_dir())?;
        debug!(root = %self.root.display(), "Prepared simulation directory");
        Ok(())
    }

    pub fn has_employers(&self) -> bool {
        self.employers_file().is_file()
    }

    pub fn has_employees(&self) -> bool {
        self.employees_file().is_file()
    }

    pub fn save_employers(&self, employers: &EmployerPool) -> Result<(), SimulationError> {
        write_json(&self.employers_file(), employers)?;
        info!(count = employers.len(), "Saved employers");
        Ok(())
    }

    pub fn load_employers(&self) -> Result<EmployerPool, SimulationError> {
        read_json(&self.employers_file())
    }

    /// Writes the employees and, separately, the ids already used by claims
    pub fn save_employees(&self, employees: &EmployeePool) -> Result<(), SimulationError> {
        let records: Vec<&Employee> = employees.iter().collect();
        let used: Vec<&EmployeeId> = employees.used_ids().collect();
        write_json(&self.employees_file(), &records)?;
        write_json(&self.used_employees_file(), &used)?;
        info!(count = records.len(), used = used.len(), "Saved employees");
        Ok(())
    }

    /// Loads the employee pool, restoring its used set when present
    pub fn load_employees(&self) -> Result<EmployeePool, SimulationError> {
        let records: Vec<Employee> = read_json(&self.employees_file())?;
        let mut pool = EmployeePool::new(records);

        let used_file = self.used_employees_file();
        if used_file.is_file() {
            let used: Vec<EmployeeId> = read_json(&used_file)?;
            for id in used {
                pool.mark_used(id);
            }
        }
        Ok(pool)
    }

    /// Writes bytes to `path`, creating parent directories
    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), SimulationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SimulationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SimulationError> {
    if !path.is_file() {
        return Err(SimulationError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let storage = SimulationStorage::new("/tmp/sim");
        let id = ClaimId::new();

        assert_eq!(storage.claims_file(), PathBuf::from("/tmp/sim/claims.json"));
        assert_eq!(storage.claims_index_file(), PathBuf::from("/tmp/sim/claims.csv"));
        assert_eq!(storage.dor_dir(), PathBuf::from("/tmp/sim/dor"));
        assert_eq!(
            storage.document_file(&id, DocumentType::Hcp),
            PathBuf::from("/tmp/sim/documents")
                .join(id.to_string())
                .join(DocumentType::Hcp.file_name())
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SimulationStorage::new(dir.path());

        assert!(!storage.has_employers());
        assert!(matches!(
            storage.load_employers(),
            Err(SimulationError::MissingFile(_))
        ));
    }
}
