//! Experiment and response records

use assay::{ParameterPoint, QualityMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::completion::CompletionError;

/// A single user submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
  pub id: Uuid,
  pub prompt: String,
  pub created_at: DateTime<Utc>,
}

/// One scored completion for one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
  pub id: Uuid,
  pub experiment_id: Uuid,
  pub temperature: f64,
  pub top_p: f64,
  pub content: String,
  pub metrics: QualityMetrics,
  pub created_at: DateTime<Utc>,
}

/// A response that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
  pub id: Uuid,
  pub experiment_id: Uuid,
  pub temperature: f64,
  pub top_p: f64,
  pub content: String,
  pub metrics: QualityMetrics,
}

/// An experiment together with all of its responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentWithResponses {
  #[serde(flatten)]
  pub experiment: Experiment,
  pub responses: Vec<ResponseRecord>,
}

/// Result of running a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
  pub experiment: Experiment,
  pub responses: Vec<ResponseRecord>,
}

impl Experiment {
  pub fn new(id: Uuid, prompt: &str) -> Self {
    Self { id, prompt: prompt.to_string(), created_at: Utc::now() }
  }
}

impl NewResponse {
  pub fn scored(
    experiment_id: Uuid,
    point: ParameterPoint,
    content: String,
    metrics: QualityMetrics,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      experiment_id,
      temperature: point.temperature,
      top_p: point.top_p,
      content,
      metrics,
    }
  }

  /// Placeholder for a grid point whose completion could not be generated
  pub fn failed(experiment_id: Uuid, point: ParameterPoint, error: &CompletionError) -> Self {
    Self::scored(experiment_id, point, format!("Error: {error}"), QualityMetrics::failed())
  }

  pub fn into_record(self, created_at: DateTime<Utc>) -> ResponseRecord {
    ResponseRecord {
      id: self.id,
      experiment_id: self.experiment_id,
      temperature: self.temperature,
      top_p: self.top_p,
      content: self.content,
      metrics: self.metrics,
      created_at,
    }
  }
}

impl ResponseRecord {
  pub fn parameters(&self) -> ParameterPoint {
    ParameterPoint { temperature: self.temperature, top_p: self.top_p }
  }

  /// True for placeholders recorded after a failed completion
  pub fn is_failed(&self) -> bool {
    self.metrics == QualityMetrics::failed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_failed_placeholder() {
    let point = ParameterPoint { temperature: 0.7, top_p: 0.9 };
    let response = NewResponse::failed(Uuid::new_v4(), point, &CompletionError::RateLimited);

    assert_eq!(response.content, "Error: Rate limit exceeded. Please try again later.");
    assert_eq!(response.metrics.overall_score, 0);

    let record = response.into_record(Utc::now());
    assert!(record.is_failed());
    assert_eq!(record.parameters(), point);
  }

  #[test]
  fn test_experiment_with_responses_is_flattened() {
    let experiment = Experiment::new(Uuid::new_v4(), "Hello");
    let combined = ExperimentWithResponses { experiment: experiment.clone(), responses: Vec::new() };

    let json = serde_json::to_value(&combined).unwrap();
    assert_eq!(json["prompt"], "Hello");
    assert_eq!(json["id"], experiment.id.to_string());
    assert!(json["responses"].as_array().unwrap().is_empty());
  }
}
