//! Experiment persistence
//!
//! Callers hold an [`ExperimentStore`] trait object chosen once at startup
//! by [`open_store`]; both strategies behave identically, including
//! newest-first listing and cascading deletes.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::model::{Experiment, ExperimentWithResponses, NewResponse, ResponseRecord};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Corrupt record {id}: {message}")]
  Corrupt { id: String, message: String },

  #[error("Experiment not found: {0}")]
  ExperimentNotFound(Uuid),

  #[error("Experiment already exists: {0}")]
  DuplicateExperiment(Uuid),

  #[error("Storage connection is unavailable")]
  Poisoned,
}

impl StorageError {
  pub(crate) fn corrupt(id: impl Into<String>, message: impl ToString) -> Self {
    Self::Corrupt { id: id.into(), message: message.to_string() }
  }
}

pub type SharedStore = Arc<dyn ExperimentStore>;

#[async_trait]
pub trait ExperimentStore: Send + Sync {
  /// Short name of the strategy, reported by `/status`
  fn backend_name(&self) -> &'static str;

  async fn create_experiment(&self, id: Uuid, prompt: &str) -> Result<Experiment, StorageError>;

  async fn get_experiment(&self, id: Uuid) -> Result<Option<Experiment>, StorageError>;

  /// Experiments ordered newest first
  async fn get_all_experiments(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<Experiment>, StorageError>;

  /// Removes the experiment and every response that references it
  async fn delete_experiment(&self, id: Uuid) -> Result<(), StorageError>;

  /// Persist a response; fails if its experiment does not exist
  async fn create_response(&self, response: NewResponse) -> Result<ResponseRecord, StorageError>;

  /// Responses of one experiment in insertion order
  async fn get_responses(&self, experiment_id: Uuid) -> Result<Vec<ResponseRecord>, StorageError>;

  async fn get_experiment_with_responses(
    &self,
    id: Uuid,
  ) -> Result<Option<ExperimentWithResponses>, StorageError> {
    let Some(experiment) = self.get_experiment(id).await? else {
      return Ok(None);
    };
    let responses = self.get_responses(id).await?;
    Ok(Some(ExperimentWithResponses { experiment, responses }))
  }
}

/// Open the store selected by configuration
pub fn open_store(config: &StorageConfig) -> Result<SharedStore, StorageError> {
  match config.backend {
    StorageBackend::Memory => {
      info!("using in-memory experiment store");
      Ok(Arc::new(MemoryStore::new()))
    }
    StorageBackend::Sqlite => {
      let path = config.database_path();
      info!(path = %path.display(), "using sqlite experiment store");
      Ok(Arc::new(SqliteStore::open(&path)?))
    }
  }
}
