use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// One or more required fields were empty at save time.
    #[error("Missing required field(s): {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    /// The backing file does not exist yet.
    #[error("No data file found at {}", .0.display())]
    StorageNotFound(PathBuf),

    /// The backing file exists but has no entry for the key.
    #[error("No details for '{0}' exist")]
    EntryNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a website -> credential mapping.
    #[error("Data file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::StorageNotFound(_) | StoreError::EntryNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_missing_fields() {
        let err = StoreError::Validation(vec!["website", "password"]);
        assert_eq!(
            err.to_string(),
            "Missing required field(s): website, password"
        );
    }

    #[test]
    fn not_found_classification() {
        assert!(StoreError::StorageNotFound(PathBuf::from("data.json")).is_not_found());
        assert!(StoreError::EntryNotFound("github".into()).is_not_found());
        let io = StoreError::from(std::io::Error::other("disk full"));
        assert!(!io.is_not_found());
    }
}
