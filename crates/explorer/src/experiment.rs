//! Parameter sweep orchestration
//!
//! A sweep validates the request, records the experiment, then fans one
//! completion per grid point out to the completion service with bounded
//! concurrency. Every grid point yields exactly one response record: a
//! failed completion becomes an `Error: ...` placeholder with zeroed
//! metrics instead of failing the sweep.

use assay::{calculate_quality_metrics, ParameterPoint, SweepRequest};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::completion::{CompletionRequest, CompletionService};
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::model::{Experiment, GenerateResponse, NewResponse, ResponseRecord};
use crate::storage::SharedStore;

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
  /// Completions in flight at once, at least 1
  pub concurrency: usize,
  pub max_tokens: u32,
}

impl Default for RunnerOptions {
  fn default() -> Self {
    Self { concurrency: 10, max_tokens: 500 }
  }
}

impl From<&ExplorerConfig> for RunnerOptions {
  fn from(config: &ExplorerConfig) -> Self {
    Self { concurrency: config.runner.concurrency, max_tokens: config.completion.max_tokens }
  }
}

pub struct ExperimentRunner {
  store: SharedStore,
  completion: Arc<dyn CompletionService>,
  options: RunnerOptions,
}

impl ExperimentRunner {
  pub fn new(store: SharedStore, completion: Arc<dyn CompletionService>, options: RunnerOptions) -> Self {
    Self { store, completion, options }
  }

  pub fn store(&self) -> &SharedStore {
    &self.store
  }

  /// Run a full sweep; responses come back in grid order
  pub async fn run(&self, request: &SweepRequest) -> Result<GenerateResponse> {
    let grid = request.grid()?;
    let experiment = self.store.create_experiment(Uuid::new_v4(), &request.prompt).await?;

    info!(experiment_id = %experiment.id, variations = grid.len(), "starting parameter sweep");

    let responses: Vec<ResponseRecord> = stream::iter(grid)
      .map(|point| self.generate_variation(&experiment, point))
      .buffered(self.options.concurrency.max(1))
      .collect()
      .await;

    let failed = responses.iter().filter(|response| response.is_failed()).count();
    if failed > 0 {
      warn!(experiment_id = %experiment.id, failed, total = responses.len(), "sweep finished with failures");
    } else {
      info!(experiment_id = %experiment.id, total = responses.len(), "sweep finished");
    }

    Ok(GenerateResponse { experiment, responses })
  }

  async fn generate_variation(&self, experiment: &Experiment, point: ParameterPoint) -> ResponseRecord {
    let request = CompletionRequest {
      prompt: experiment.prompt.clone(),
      temperature: point.temperature,
      top_p: point.top_p,
      max_tokens: self.options.max_tokens,
    };

    let response = match self.completion.complete(&request).await {
      Ok(content) => {
        let metrics = calculate_quality_metrics(&content, &experiment.prompt);
        debug!(
          temperature = point.temperature,
          top_p = point.top_p,
          overall = metrics.overall_score,
          "scored completion"
        );
        NewResponse::scored(experiment.id, point, content, metrics)
      }
      Err(error) => {
        warn!(temperature = point.temperature, top_p = point.top_p, %error, "completion failed");
        NewResponse::failed(experiment.id, point, &error)
      }
    };

    match self.store.create_response(response.clone()).await {
      Ok(record) => record,
      Err(error) => {
        warn!(experiment_id = %experiment.id, %error, "failed to persist response");
        response.into_record(Utc::now())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::completion::{CompletionError, MockCompletionService};
  use crate::error::ExplorerError;
  use crate::storage::{ExperimentStore, MemoryStore};

  const ANSWER: &str = "Tides are caused by the gravitational pull of the moon. \
    The oceans bulge toward it on one side of the planet. \
    In conclusion, the moon and the sun together shape the tides.";

  fn request(variations: usize) -> SweepRequest {
    SweepRequest {
      prompt: "Explain tides".to_string(),
      temperature_min: 0.0,
      temperature_max: 1.0,
      top_p_min: 0.5,
      top_p_max: 1.0,
      variations,
    }
  }

  fn runner(mock: MockCompletionService) -> (ExperimentRunner, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let runner = ExperimentRunner::new(store.clone(), Arc::new(mock), RunnerOptions::default());
    (runner, store)
  }

  #[tokio::test]
  async fn test_sweep_scores_every_grid_point() {
    let mut mock = MockCompletionService::new();
    mock.expect_complete().times(4).returning(|_| Ok(ANSWER.to_string()));
    let (runner, store) = runner(mock);

    let result = runner.run(&request(4)).await.unwrap();

    let points: Vec<_> = result.responses.iter().map(|r| (r.temperature, r.top_p)).collect();
    assert_eq!(points, vec![(0.0, 0.5), (0.0, 1.0), (1.0, 0.5), (1.0, 1.0)]);
    assert!(result.responses.iter().all(|r| !r.is_failed() && r.metrics.overall_score > 0));

    let stored = store.get_responses(result.experiment.id).await.unwrap();
    assert_eq!(stored.len(), 4);
  }

  #[tokio::test]
  async fn test_failed_completions_become_placeholders() {
    let mut mock = MockCompletionService::new();
    mock.expect_complete().returning(|request| {
      if request.temperature > 0.5 {
        Err(CompletionError::RateLimited)
      } else {
        Ok(ANSWER.to_string())
      }
    });
    let (runner, store) = runner(mock);

    let result = runner.run(&request(4)).await.unwrap();

    assert_eq!(result.responses.len(), 4);
    let failed: Vec<_> = result.responses.iter().filter(|r| r.is_failed()).collect();
    assert_eq!(failed.len(), 2);
    for response in failed {
      assert_eq!(response.content, "Error: Rate limit exceeded. Please try again later.");
      assert_eq!(response.metrics.coherence.explanation, "Generation failed");
      assert_eq!(response.metrics.overall_score, 0);
    }

    let stored = store.get_experiment_with_responses(result.experiment.id).await.unwrap().unwrap();
    assert_eq!(stored.responses.len(), 4);
  }

  #[tokio::test]
  async fn test_prompt_and_max_tokens_are_forwarded() {
    let mut mock = MockCompletionService::new();
    mock
      .expect_complete()
      .withf(|request| request.prompt == "Explain tides" && request.max_tokens == 120)
      .times(1)
      .returning(|_| Ok(String::new()));

    let store = Arc::new(MemoryStore::new());
    let options = RunnerOptions { concurrency: 1, max_tokens: 120 };
    let runner = ExperimentRunner::new(store, Arc::new(mock), options);

    let result = runner.run(&request(1)).await.unwrap();
    assert_eq!(result.responses[0].temperature, 0.5);
    assert_eq!(result.responses[0].top_p, 0.75);
    assert_eq!(result.responses[0].metrics.coherence.explanation, "Empty response");
  }

  #[tokio::test]
  async fn test_invalid_request_creates_nothing() {
    let mut mock = MockCompletionService::new();
    mock.expect_complete().never();
    let (runner, store) = runner(mock);

    let mut invalid = request(3);
    invalid.temperature_min = 1.5;

    let error = runner.run(&invalid).await.unwrap_err();
    assert!(matches!(error, ExplorerError::Validation(_)));
    assert!(store.get_all_experiments(50, 0).await.unwrap().is_empty());
  }
}
