//! Coherence: sentence structure, capitalization, punctuation and flow

use once_cell::sync::Lazy;
use regex::Regex;

use super::MetricDetail;
use crate::text;

static LEADING_CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]").unwrap());
static EXCESSIVE_PUNCTUATION: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"[!?]{3,}|\.{4,}").unwrap());

const MIN_CAPITALIZATION_RATIO: f64 = 0.8;
const MIN_LENGTH_DEVIATION: f64 = 2.0;
const MAX_LENGTH_DEVIATION: f64 = 15.0;
const MIN_PARAGRAPH_CHARS: usize = 50;
const MAX_PARAGRAPH_CHARS: usize = 2000;

pub fn score(content: &str) -> MetricDetail {
  if content.trim().is_empty() {
    return MetricDetail::empty_response();
  }

  let sentences = text::sentences(content);
  if sentences.is_empty() {
    return MetricDetail::new(20, "No complete sentences found");
  }

  let mut score: i32 = 100;
  let mut issues: Vec<&str> = Vec::new();

  let capitalized = sentences.iter().filter(|s| LEADING_CAPITAL.is_match(s)).count();
  if (capitalized as f64 / sentences.len() as f64) < MIN_CAPITALIZATION_RATIO {
    score -= 20;
    issues.push("inconsistent capitalization");
  }

  if EXCESSIVE_PUNCTUATION.is_match(content) {
    score -= 15;
    issues.push("excessive punctuation");
  }

  let lengths: Vec<f64> = sentences.iter().map(|s| text::piece_count(s) as f64).collect();
  let deviation = standard_deviation(&lengths);
  if deviation < MIN_LENGTH_DEVIATION {
    score -= 10;
    issues.push("overly uniform sentence length");
  } else if deviation > MAX_LENGTH_DEVIATION {
    score -= 10;
    issues.push("highly varied sentence length");
  }

  let paragraphs = text::paragraphs(content);
  if paragraphs.len() > 1 && !paragraphs.iter().all(|p| reasonable_paragraph(p)) {
    score -= 10;
    issues.push("inconsistent paragraph structure");
  }

  let score = score.max(0);
  let issues = issues.join(", ");

  let explanation = if score >= 85 {
    "Excellent coherence with proper structure and flow".to_string()
  } else if score >= 70 {
    format!("Good coherence with minor issues: {issues}")
  } else if score >= 50 {
    format!("Moderate coherence. Issues: {issues}")
  } else {
    format!("Poor coherence. Issues: {issues}")
  };

  MetricDetail::clamped(score, explanation)
}

fn reasonable_paragraph(paragraph: &str) -> bool {
  let length = paragraph.chars().count();
  length > MIN_PARAGRAPH_CHARS && length < MAX_PARAGRAPH_CHARS
}

/// Population standard deviation
fn standard_deviation(values: &[f64]) -> f64 {
  let count = values.len() as f64;
  let mean = values.iter().sum::<f64>() / count;
  let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
  variance.sqrt()
}
