//! Shared state handed to every handler

use std::sync::Arc;

use crate::completion::{CompletionService, OpenAiClient};
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::experiment::{ExperimentRunner, RunnerOptions};
use crate::storage::{open_store, SharedStore};

#[derive(Clone)]
pub struct AppState {
  pub store: SharedStore,
  pub runner: Arc<ExperimentRunner>,
}

impl AppState {
  pub fn new(store: SharedStore, completion: Arc<dyn CompletionService>, options: RunnerOptions) -> Self {
    let runner = Arc::new(ExperimentRunner::new(store.clone(), completion, options));
    Self { store, runner }
  }

  /// Build the store and completion client described by `config`
  pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
    let store = open_store(&config.storage)?;
    let completion = Arc::new(OpenAiClient::new(config.completion.clone())?);
    Ok(Self::new(store, completion, RunnerOptions::from(config)))
  }
}
