pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod generator;
pub mod logging;
pub mod models;
pub mod storage;
pub mod ui;

pub use error::StoreError;
pub use form::{Action, ClipboardSink, Dialog, DialogKind, Feedback, FormController};
pub use models::{CredentialRecord, Credentials, FormState};
pub use storage::CredentialStore;
