use assay::ValidationError;
use thiserror::Error;
use uuid::Uuid;

use crate::completion::CompletionError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum ExplorerError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Storage(#[from] StorageError),

  #[error(transparent)]
  Completion(#[from] CompletionError),

  #[error("Configuration error: {message}")]
  Config { message: String },

  #[error("Export failed: {message}")]
  Export { message: String },

  #[error("Experiment not found: {id}")]
  NotFound { id: Uuid },
}

impl ExplorerError {
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  pub fn export(message: impl Into<String>) -> Self {
    Self::Export { message: message.into() }
  }

  pub fn not_found(id: Uuid) -> Self {
    Self::NotFound { id }
  }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
