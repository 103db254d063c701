//! Lexical diversity: vocabulary richness via the type-token ratio

use std::collections::HashSet;

use super::MetricDetail;
use crate::text;

// Ratios between 0.3 and 0.8 map linearly onto 40..100
const RATIO_FLOOR: f64 = 0.3;
const RATIO_SPAN: f64 = 0.5;
const LONG_TEXT_TOKENS: usize = 100;
const LONG_TEXT_RATIO: f64 = 0.5;
const LONG_TEXT_BONUS: i32 = 5;

pub fn score(content: &str) -> MetricDetail {
  if content.trim().is_empty() {
    return MetricDetail::empty_response();
  }

  let tokens = text::lexical_tokens(content);
  if tokens.is_empty() {
    return MetricDetail::new(0, "No valid words found");
  }

  let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
  let ratio = unique.len() as f64 / tokens.len() as f64;

  let mut score =
    ((ratio - RATIO_FLOOR) / RATIO_SPAN * 60.0 + 40.0).clamp(0.0, 100.0).round() as i32;

  if tokens.len() > LONG_TEXT_TOKENS && ratio > LONG_TEXT_RATIO {
    score = (score + LONG_TEXT_BONUS).min(100);
  }

  let percent_unique = (ratio * 100.0).round() as i64;
  let explanation = if score >= 85 {
    format!(
      "Excellent vocabulary diversity ({} unique words from {} total)",
      unique.len(),
      tokens.len()
    )
  } else if score >= 70 {
    format!("Good vocabulary richness with {percent_unique}% unique words")
  } else if score >= 50 {
    "Moderate diversity, some repetition detected".to_string()
  } else {
    format!("Low diversity, high repetition ({percent_unique}% unique)")
  };

  MetricDetail::clamped(score, explanation)
}
