//! Aggregate statistics over the responses of one experiment

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ResponseRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
  pub response_count: usize,
  /// Rounded mean of the overall scores
  pub average_overall: u8,
  pub best_coherence: u8,
  /// Rounded mean of space-separated piece counts
  pub average_word_count: usize,
  /// First response holding the highest overall score
  pub best_response_id: Uuid,
}

impl ExperimentSummary {
  /// `None` when there is nothing to summarize
  pub fn from_responses(responses: &[ResponseRecord]) -> Option<Self> {
    let first = responses.first()?;
    let count = responses.len() as f64;

    let total_overall: f64 = responses.iter().map(|r| f64::from(r.metrics.overall_score)).sum();
    let total_words: usize = responses.iter().map(|r| r.content.split(' ').count()).sum();
    let best_coherence = responses.iter().map(|r| r.metrics.coherence.score).max().unwrap_or(0);

    let best = responses.iter().skip(1).fold(first, |best, current| {
      if current.metrics.overall_score > best.metrics.overall_score {
        current
      } else {
        best
      }
    });

    Some(Self {
      response_count: responses.len(),
      average_overall: (total_overall / count).round() as u8,
      best_coherence,
      average_word_count: (total_words as f64 / count).round() as usize,
      best_response_id: best.id,
    })
  }
}

/// Responses ordered by ascending temperature, ties keep their order
pub fn by_temperature(responses: &[ResponseRecord]) -> Vec<&ResponseRecord> {
  let mut sorted: Vec<&ResponseRecord> = responses.iter().collect();
  sorted.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));
  sorted
}

/// Coarse quality band used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
  Excellent,
  Good,
  Moderate,
  Poor,
}

impl ScoreBand {
  pub fn from_score(score: u8) -> Self {
    match score {
      85.. => Self::Excellent,
      70..=84 => Self::Good,
      50..=69 => Self::Moderate,
      _ => Self::Poor,
    }
  }
}
