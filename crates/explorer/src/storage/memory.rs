use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ExperimentStore, StorageError};
use crate::model::{Experiment, NewResponse, ResponseRecord};

/// Process-local store, contents vanish on exit
#[derive(Default)]
pub struct MemoryStore {
  inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
  /// Insertion order, oldest first
  experiments: Vec<Experiment>,
  responses: HashMap<Uuid, Vec<ResponseRecord>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ExperimentStore for MemoryStore {
  fn backend_name(&self) -> &'static str {
    "memory"
  }

  async fn create_experiment(&self, id: Uuid, prompt: &str) -> Result<Experiment, StorageError> {
    let mut tables = self.inner.write().await;
    if tables.experiments.iter().any(|experiment| experiment.id == id) {
      return Err(StorageError::DuplicateExperiment(id));
    }

    let experiment = Experiment::new(id, prompt);
    tables.experiments.push(experiment.clone());
    Ok(experiment)
  }

  async fn get_experiment(&self, id: Uuid) -> Result<Option<Experiment>, StorageError> {
    let tables = self.inner.read().await;
    Ok(tables.experiments.iter().find(|experiment| experiment.id == id).cloned())
  }

  async fn get_all_experiments(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<Experiment>, StorageError> {
    let tables = self.inner.read().await;
    Ok(tables.experiments.iter().rev().skip(offset).take(limit).cloned().collect())
  }

  async fn delete_experiment(&self, id: Uuid) -> Result<(), StorageError> {
    let mut tables = self.inner.write().await;
    tables.experiments.retain(|experiment| experiment.id != id);
    tables.responses.remove(&id);
    Ok(())
  }

  async fn create_response(&self, response: NewResponse) -> Result<ResponseRecord, StorageError> {
    let mut tables = self.inner.write().await;
    if !tables.experiments.iter().any(|experiment| experiment.id == response.experiment_id) {
      return Err(StorageError::ExperimentNotFound(response.experiment_id));
    }

    let record = response.into_record(Utc::now());
    tables.responses.entry(record.experiment_id).or_default().push(record.clone());
    Ok(record)
  }

  async fn get_responses(&self, experiment_id: Uuid) -> Result<Vec<ResponseRecord>, StorageError> {
    let tables = self.inner.read().await;
    Ok(tables.responses.get(&experiment_id).cloned().unwrap_or_default())
  }
}
