//! Storage for the "consent previously granted" flag.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::orchestrator::config::ConsentPersistence;
use crate::orchestrator::errors::ConsentStoreError;

const GRANTED_MARKER: &str = "granted";

/// Reads and writes the consent flag.
pub trait ConsentStore {
    /// Returns whether consent was granted on a previous visit. Absence means not granted.
    fn load(&self) -> Result<bool, ConsentStoreError>;

    /// Records that consent was granted.
    fn save(&mut self) -> Result<(), ConsentStoreError>;
}

/// Consent that lives only as long as the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionConsent;

impl ConsentStore for SessionConsent {
    fn load(&self) -> Result<bool, ConsentStoreError> {
        Ok(false)
    }

    fn save(&mut self) -> Result<(), ConsentStoreError> {
        Ok(())
    }
}

/// Consent persisted as a small marker file.
#[derive(Debug, Clone)]
pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConsentStore for FileConsentStore {
    fn load(&self) -> Result<bool, ConsentStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim() == GRANTED_MARKER),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self) -> Result<(), ConsentStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, GRANTED_MARKER)?;
        Ok(())
    }
}

impl ConsentPersistence {
    /// Opens the store this persistence mode describes.
    pub fn open_store(&self) -> Box<dyn ConsentStore> {
        match self {
            Self::Session => Box::new(SessionConsent),
            Self::Persisted(path) => Box::new(FileConsentStore::new(path.clone())),
        }
    }
}
