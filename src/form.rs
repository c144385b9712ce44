//! Form actions: generate, save and search.
//!
//! Each action consumes the current [`FormState`] and hands back the next one
//! together with the [`Feedback`] the UI should show. Nothing here touches the
//! terminal.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::generator;
use crate::models::FormState;
use crate::storage::CredentialStore;

/// Where generated passwords go. Write-only.
pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    Save,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Short-lived footer message.
    Status(String),
    /// Modal that must be dismissed.
    Dialog(Dialog),
}

pub const MISSING_INFO_TITLE: &str = "Missing Information";
pub const MISSING_INFO_MESSAGE: &str = "Please fill in the missing information!";
pub const NO_DATA_FILE_MESSAGE: &str = "No data file found.";
pub const NO_ENTRY_MESSAGE: &str = "No details for the website exists.";

pub struct FormController<C> {
    store: CredentialStore,
    clipboard: C,
}

impl<C: ClipboardSink> FormController<C> {
    pub fn new(store: CredentialStore, clipboard: C) -> Self {
        Self { store, clipboard }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn dispatch(&mut self, action: Action, form: FormState) -> (FormState, Feedback) {
        match action {
            Action::Generate => self.generate(form),
            Action::Save => self.save(form),
            Action::Search => self.search(form),
        }
    }

    pub fn generate(&mut self, mut form: FormState) -> (FormState, Feedback) {
        form.clear_password();
        form.password = generator::generate();
        let feedback = match self.clipboard.copy_text(&form.password) {
            Ok(()) => {
                info!("generated password copied to clipboard");
                Feedback::Status("Generated password copied to clipboard".into())
            }
            Err(e) => {
                warn!("clipboard unavailable: {e:#}");
                Feedback::Status(format!("Generated password (clipboard error: {e})"))
            }
        };
        (form, feedback)
    }

    pub fn save(&self, mut form: FormState) -> (FormState, Feedback) {
        match self.store.save(&form.website, &form.email, &form.password) {
            Ok(()) => {
                let status = format!("Saved {}", form.website);
                form.clear_website();
                form.clear_password();
                (form, Feedback::Status(status))
            }
            Err(StoreError::Validation(fields)) => {
                info!(?fields, "save rejected");
                (
                    form,
                    Feedback::Dialog(Dialog::error(MISSING_INFO_TITLE, MISSING_INFO_MESSAGE)),
                )
            }
            Err(e) => {
                error!(path = %self.store.path().display(), "save failed: {e}");
                (form, Feedback::Dialog(unexpected_failure(&e)))
            }
        }
    }

    pub fn search(&self, mut form: FormState) -> (FormState, Feedback) {
        let dialog = match self.store.find(&form.website) {
            Ok(record) => {
                info!(website = %crate::storage::normalize_website(&form.website), "search hit");
                Dialog::info(
                    form.website.clone(),
                    format!("Email: {}\nPassword: {}", record.email, record.password),
                )
            }
            Err(StoreError::StorageNotFound(path)) => {
                info!(path = %path.display(), "search without data file");
                Dialog::error("Error", NO_DATA_FILE_MESSAGE)
            }
            Err(StoreError::EntryNotFound(key)) => {
                info!(website = %key, "search miss");
                Dialog::error("Error", NO_ENTRY_MESSAGE)
            }
            Err(e) => {
                error!(path = %self.store.path().display(), "search failed: {e}");
                unexpected_failure(&e)
            }
        };
        form.clear_website();
        (form, Feedback::Dialog(dialog))
    }
}

fn unexpected_failure(err: &StoreError) -> Dialog {
    Dialog::error("Error", format!("Something went wrong: {err}"))
}
