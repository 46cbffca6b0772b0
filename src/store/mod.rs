//! Persistence: the storage port, its JSON file implementation, the
//! config upgrade applied on load and the application-level store.

pub mod app;
pub mod json_file;
pub mod migrate;

pub use app::AppStore;
pub use json_file::JsonFileStore;
pub use migrate::upgrade_ai_config;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::tokens::TokenStoreError;
use crate::config;
use crate::models::{AiConfig, Patient};

/// Everything the application persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub version: String,
    pub updated_at: DateTime<Utc>,
    pub patients: Vec<Patient>,
    pub config: AiConfig,
}

impl AppState {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: config::STATE_VERSION.to_string(),
            updated_at: now,
            patients: Vec::new(),
            config: AiConfig::default(),
        }
    }
}

/// Load/save boundary for `AppState`.
///
/// `load` returns `None` when there is nothing usable: no stored state, a
/// different version tag, or contents that are not JSON.
pub trait StoragePort {
    fn load(&self) -> Result<Option<AppState>, StorageError>;
    fn save(&self, state: &AppState) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Paciente no encontrado: {0}")]
    PatientNotFound(String),

    #[error(transparent)]
    Token(#[from] TokenStoreError),
}
