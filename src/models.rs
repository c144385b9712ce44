use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub email: String,
    pub password: String,
}

/// Everything in the data file: lowercase website name -> record.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credentials {
    entries: BTreeMap<String, CredentialRecord>,
}

impl Credentials {
    pub fn get(&self, key: &str) -> Option<&CredentialRecord> {
        self.entries.get(key)
    }

    /// Inserts or replaces the record stored under `key`.
    pub fn upsert(&mut self, key: String, record: CredentialRecord) -> Option<CredentialRecord> {
        self.entries.insert(key, record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three input fields of the form. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize)]
pub struct FormState {
    pub website: String,
    pub email: String,
    pub password: String,
}

impl FormState {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn clear_website(&mut self) {
        self.website.clear();
    }

    pub fn clear_password(&mut self) {
        self.password.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_as_flat_object() {
        let mut creds = Credentials::default();
        creds.upsert(
            "github".into(),
            CredentialRecord {
                email: "me@x.com".into(),
                password: "abc123!!".into(),
            },
        );
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "github": { "email": "me@x.com", "password": "abc123!!" } })
        );
    }

    #[test]
    fn upsert_replaces_existing_record() {
        let mut creds = Credentials::default();
        let first = CredentialRecord {
            email: "a@x.com".into(),
            password: "one".into(),
        };
        let second = CredentialRecord {
            email: "b@x.com".into(),
            password: "two".into(),
        };
        assert!(creds.upsert("site".into(), first.clone()).is_none());
        assert_eq!(creds.upsert("site".into(), second.clone()), Some(first));
        assert_eq!(creds.get("site"), Some(&second));
        assert_eq!(creds.len(), 1);
    }

    #[test]
    fn clear_password_keeps_other_fields() {
        let mut form = FormState {
            website: "site".into(),
            email: "me@x.com".into(),
            password: "secret".into(),
        };
        form.clear_password();
        assert!(form.password.is_empty());
        assert_eq!(form.website, "site");
        assert_eq!(form.email, "me@x.com");
    }
}
