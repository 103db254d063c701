//! Quality metrics for generated text
//!
//! Five independent scorers each map a completion to a [`MetricDetail`]
//! (score in 0..=100 plus a short explanation). [`calculate_quality_metrics`]
//! runs all of them and folds the scores into a weighted overall score.

use serde::{Deserialize, Serialize};

pub mod coherence;
pub mod completeness;
pub mod length;
pub mod lexical;
pub mod readability;

const EMPTY_RESPONSE: &str = "Empty response";
const GENERATION_FAILED: &str = "Generation failed";

// Types and Data Structures
// =========================

/// Score and human readable explanation for a single metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDetail {
  pub score: u8,
  pub explanation: String,
}

/// Full quality report for one completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
  pub coherence: MetricDetail,
  pub lexical_diversity: MetricDetail,
  pub completeness: MetricDetail,
  pub readability: MetricDetail,
  pub length_appropriate: MetricDetail,
  /// Weighted combination of the five scores, never set independently
  pub overall_score: u8,
}

/// The closed set of scoring strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
  Coherence,
  LexicalDiversity,
  Completeness,
  Readability,
  LengthAppropriateness,
}

impl MetricDetail {
  pub fn new(score: u8, explanation: impl Into<String>) -> Self {
    Self { score, explanation: explanation.into() }
  }

  pub(crate) fn empty_response() -> Self {
    Self::new(0, EMPTY_RESPONSE)
  }

  /// Clamp a running score into 0..=100
  pub(crate) fn clamped(score: i32, explanation: impl Into<String>) -> Self {
    Self::new(score.clamp(0, 100) as u8, explanation)
  }
}

impl Metric {
  /// Every metric, in aggregation order
  pub const ALL: [Metric; 5] = [
    Metric::Coherence,
    Metric::LexicalDiversity,
    Metric::Completeness,
    Metric::Readability,
    Metric::LengthAppropriateness,
  ];

  /// Contribution of this metric to the overall score
  pub fn weight(self) -> f64 {
    match self {
      Metric::Coherence => 0.25,
      Metric::LexicalDiversity => 0.15,
      Metric::Completeness => 0.25,
      Metric::Readability => 0.20,
      Metric::LengthAppropriateness => 0.15,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Metric::Coherence => "Coherence",
      Metric::LexicalDiversity => "Lexical Diversity",
      Metric::Completeness => "Completeness",
      Metric::Readability => "Readability",
      Metric::LengthAppropriateness => "Length Appropriateness",
    }
  }

  /// Score a completion. Only length appropriateness looks at the prompt.
  pub fn score(self, content: &str, prompt: &str) -> MetricDetail {
    match self {
      Metric::Coherence => coherence::score(content),
      Metric::LexicalDiversity => lexical::score(content),
      Metric::Completeness => completeness::score(content),
      Metric::Readability => readability::score(content),
      Metric::LengthAppropriateness => length::score(content, prompt),
    }
  }
}

impl QualityMetrics {
  /// Assemble a report from the five details, deriving the overall score
  pub fn from_details(
    coherence: MetricDetail,
    lexical_diversity: MetricDetail,
    completeness: MetricDetail,
    readability: MetricDetail,
    length_appropriate: MetricDetail,
  ) -> Self {
    let overall_score = weighted_score([
      coherence.score,
      lexical_diversity.score,
      completeness.score,
      readability.score,
      length_appropriate.score,
    ]);

    Self { coherence, lexical_diversity, completeness, readability, length_appropriate, overall_score }
  }

  /// Placeholder report for a completion that could not be generated
  pub fn failed() -> Self {
    let detail = || MetricDetail::new(0, GENERATION_FAILED);
    Self::from_details(detail(), detail(), detail(), detail(), detail())
  }

  pub fn detail(&self, metric: Metric) -> &MetricDetail {
    match metric {
      Metric::Coherence => &self.coherence,
      Metric::LexicalDiversity => &self.lexical_diversity,
      Metric::Completeness => &self.completeness,
      Metric::Readability => &self.readability,
      Metric::LengthAppropriateness => &self.length_appropriate,
    }
  }

  /// True when the overall score matches the weighted formula
  pub fn is_consistent(&self) -> bool {
    let scores = Metric::ALL.map(|metric| self.detail(metric).score);
    self.overall_score == weighted_score(scores)
  }
}

/// Weighted, rounded combination of per-metric scores given in [`Metric::ALL`] order
pub fn weighted_score(scores: [u8; 5]) -> u8 {
  let total = Metric::ALL
    .iter()
    .zip(scores)
    .fold(0.0_f64, |acc, (metric, score)| acc + f64::from(score) * metric.weight());

  total.round().clamp(0.0, 100.0) as u8
}

/// Calculate every quality metric for a completion
pub fn calculate_quality_metrics(content: &str, prompt: &str) -> QualityMetrics {
  let [coherence, lexical_diversity, completeness, readability, length_appropriate] =
    Metric::ALL.map(|metric| metric.score(content, prompt));

  QualityMetrics::from_details(
    coherence,
    lexical_diversity,
    completeness,
    readability,
    length_appropriate,
  )
}
