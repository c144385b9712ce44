use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{CredentialRecord, Credentials};

/// Key under which a website is stored and looked up.
pub fn normalize_website(website: &str) -> String {
    website.to_lowercase()
}

/// Flat JSON file mapping lowercase website names to credentials.
///
/// Nothing is cached: every `find` reads the whole file and every `save`
/// reads it once and rewrites it in full.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole mapping. A missing file is `StorageNotFound`.
    pub fn load(&self) -> Result<Credentials, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::StorageNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let credentials: Credentials = serde_json::from_str(&raw)?;
        debug!(entries = credentials.len(), "loaded data file");
        Ok(credentials)
    }

    pub fn save(&self, website: &str, email: &str, password: &str) -> Result<(), StoreError> {
        let mut missing = Vec::new();
        if website.is_empty() {
            missing.push("website");
        }
        if password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(StoreError::Validation(missing));
        }

        let key = normalize_website(website);
        let mut credentials = match self.load() {
            Ok(credentials) => credentials,
            Err(StoreError::StorageNotFound(_)) => Credentials::default(),
            Err(e) => return Err(e),
        };
        let replaced = credentials.upsert(
            key.clone(),
            CredentialRecord {
                email: email.to_string(),
                password: password.to_string(),
            },
        );
        self.persist(&credentials)?;
        info!(website = %key, replaced = replaced.is_some(), "credential saved");
        Ok(())
    }

    pub fn find(&self, website: &str) -> Result<CredentialRecord, StoreError> {
        let key = normalize_website(website);
        let credentials = self.load()?;
        credentials
            .get(&key)
            .cloned()
            .ok_or(StoreError::EntryNotFound(key))
    }

    fn persist(&self, credentials: &Credentials) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(credentials)?;
        atomic_write(&self.path, data.as_bytes())?;
        restrict_file(&self.path)?;
        Ok(())
    }
}

pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
        restrict_dir(parent)?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn restrict_file(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

pub(crate) fn restrict_dir(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
