//! PDF template lookup

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::form::TemplateSpec;
use crate::pdf::blank_form;

/// Loads PDF templates from a directory
///
/// A template missing from the directory, or a store with no directory at
/// all, falls back to a blank form synthesised from the `TemplateSpec`.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    dir: Option<PathBuf>,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A store that always synthesises blank forms
    pub fn synthetic() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Returns the template bytes for `spec`
    pub fn load(&self, spec: &TemplateSpec) -> Result<Vec<u8>, DocumentError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(&spec.file_name);
            if path.is_file() {
                debug!(path = %path.display(), "Loading PDF template");
                return Ok(std::fs::read(&path)?);
            }
            warn!(path = %path.display(), "Template not found, using a blank form");
        }
        blank_form(spec)
    }

    /// Writes blank forms for every spec that has no file yet
    pub fn materialize<'a>(&self, specs: impl IntoIterator<Item = &'a TemplateSpec>) -> Result<usize, DocumentError> {
        let dir = match &self.dir {
            Some(dir) => dir,
            None => return Ok(0),
        };
        std::fs::create_dir_all(dir)?;
        let mut written = 0;
        for spec in specs {
            let path = dir.join(&spec.file_name);
            if !path.exists() {
                std::fs::write(&path, blank_form(spec)?)?;
                written += 1;
            }
        }
        Ok(written)
    }
}
