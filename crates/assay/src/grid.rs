//! Sampling-parameter grids
//!
//! Turns a temperature range, a top-p range and a variation count into
//! concrete, evenly spaced parameter combinations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal;

pub const TEMPERATURE_BOUNDS: (f64, f64) = (0.0, 2.0);
pub const TOP_P_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const MIN_VARIATIONS: usize = 1;
pub const MAX_VARIATIONS: usize = 10;
pub const MAX_PROMPT_CHARS: usize = 2000;

/// One concrete (temperature, top_p) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterPoint {
  pub temperature: f64,
  pub top_p: f64,
}

/// A user submission: prompt plus the ranges to sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRequest {
  pub prompt: String,
  pub temperature_min: f64,
  pub temperature_max: f64,
  pub top_p_min: f64,
  pub top_p_max: f64,
  pub variations: usize,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
  #[error("Prompt is required")]
  EmptyPrompt,

  #[error("Prompt too long ({length} characters, maximum {max})")]
  PromptTooLong { length: usize, max: usize },

  #[error("{parameter} must be between {min} and {max}, got {value}")]
  OutOfRange { parameter: &'static str, value: f64, min: f64, max: f64 },

  #[error("Variations must be between {min} and {max}, got {value}")]
  VariationCount { value: usize, min: usize, max: usize },

  #[error("Temperature min cannot be greater than max")]
  TemperatureRange,

  #[error("Top P min cannot be greater than max")]
  TopPRange,
}

impl SweepRequest {
  /// Check the request against the accepted bounds.
  ///
  /// Nothing is corrected silently: the first violation is returned.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.prompt.trim().is_empty() {
      return Err(ValidationError::EmptyPrompt);
    }

    let length = self.prompt.chars().count();
    if length > MAX_PROMPT_CHARS {
      return Err(ValidationError::PromptTooLong { length, max: MAX_PROMPT_CHARS });
    }

    self.validate_ranges()
  }

  /// Check only the parameter ranges and variation count, ignoring the prompt
  pub fn validate_ranges(&self) -> Result<(), ValidationError> {
    check_bounds("temperatureMin", self.temperature_min, TEMPERATURE_BOUNDS)?;
    check_bounds("temperatureMax", self.temperature_max, TEMPERATURE_BOUNDS)?;
    check_bounds("topPMin", self.top_p_min, TOP_P_BOUNDS)?;
    check_bounds("topPMax", self.top_p_max, TOP_P_BOUNDS)?;

    if !(MIN_VARIATIONS..=MAX_VARIATIONS).contains(&self.variations) {
      return Err(ValidationError::VariationCount {
        value: self.variations,
        min: MIN_VARIATIONS,
        max: MAX_VARIATIONS,
      });
    }

    if self.temperature_min > self.temperature_max {
      return Err(ValidationError::TemperatureRange);
    }

    if self.top_p_min > self.top_p_max {
      return Err(ValidationError::TopPRange);
    }

    Ok(())
  }

  /// Validate, then lay out the parameter grid for this request
  pub fn grid(&self) -> Result<Vec<ParameterPoint>, ValidationError> {
    self.validate()?;

    Ok(generate_parameter_combinations(
      self.temperature_min,
      self.temperature_max,
      self.top_p_min,
      self.top_p_max,
      self.variations,
    ))
  }
}

fn check_bounds(
  parameter: &'static str,
  value: f64,
  (min, max): (f64, f64),
) -> Result<(), ValidationError> {
  // NaN fails both comparisons and is rejected here too
  if value >= min && value <= max {
    Ok(())
  } else {
    Err(ValidationError::OutOfRange { parameter, value, min, max })
  }
}

/// Generate `count` evenly spaced parameter combinations.
///
/// A single variation sits at the midpoint of both ranges. Otherwise each
/// parameter gets `ceil(sqrt(count))` evenly spaced steps and the grid is
/// walked row-major (temperature outer, top-p inner) until `count` points
/// are collected. Values are rounded to two decimals and clamped to their
/// range.
///
/// # Panics
///
/// Panics if `count` is zero or either range has `min > max`. Callers are
/// expected to have validated the request (see [`SweepRequest::validate`]).
pub fn generate_parameter_combinations(
  temp_min: f64,
  temp_max: f64,
  top_p_min: f64,
  top_p_max: f64,
  count: usize,
) -> Vec<ParameterPoint> {
  assert!(count >= 1, "parameter grid needs at least one variation");
  assert!(temp_min <= temp_max, "temperature min {temp_min} exceeds max {temp_max}");
  assert!(top_p_min <= top_p_max, "top_p min {top_p_min} exceeds max {top_p_max}");

  if count == 1 {
    return vec![ParameterPoint {
      temperature: bounded(round2((temp_min + temp_max) / 2.0), temp_min, temp_max),
      top_p: bounded(round2((top_p_min + top_p_max) / 2.0), top_p_min, top_p_max),
    }];
  }

  let steps = (count as f64).sqrt().ceil() as usize;
  let divisor = steps.saturating_sub(1).max(1) as f64;
  let temp_step = (temp_max - temp_min) / divisor;
  let top_p_step = (top_p_max - top_p_min) / divisor;

  let mut points = Vec::with_capacity(count);

  'rows: for i in 0..steps {
    for j in 0..steps {
      if points.len() >= count {
        break 'rows;
      }

      points.push(ParameterPoint {
        temperature: bounded(round2(temp_min + i as f64 * temp_step), temp_min, temp_max),
        top_p: bounded(round2(top_p_min + j as f64 * top_p_step), top_p_min, top_p_max),
      });
    }
  }

  points.truncate(count);
  points
}

fn round2(value: f64) -> f64 {
  decimal::round_to(value, 2)
}

fn bounded(value: f64, min: f64, max: f64) -> f64 {
  value.max(min).min(max)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request() -> SweepRequest {
    SweepRequest {
      prompt: "Explain quantum tunnelling".to_string(),
      temperature_min: 0.2,
      temperature_max: 1.0,
      top_p_min: 0.5,
      top_p_max: 1.0,
      variations: 4,
    }
  }

  fn pairs(points: &[ParameterPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.temperature, p.top_p)).collect()
  }

  #[test]
  fn test_single_variation_uses_midpoint() {
    let points = generate_parameter_combinations(0.0, 2.0, 0.0, 1.0, 1);
    assert_eq!(points, vec![ParameterPoint { temperature: 1.0, top_p: 0.5 }]);
  }

  #[test]
  fn test_two_by_two_grid_is_row_major() {
    let points = generate_parameter_combinations(0.0, 1.0, 0.0, 1.0, 4);
    assert_eq!(pairs(&points), vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]);
  }

  #[test]
  fn test_partial_grid_is_truncated() {
    let points = generate_parameter_combinations(0.0, 2.0, 0.0, 1.0, 5);
    assert_eq!(
      pairs(&points),
      vec![(0.0, 0.0), (0.0, 0.5), (0.0, 1.0), (1.0, 0.0), (1.0, 0.5)]
    );
  }

  #[test]
  fn test_values_are_rounded_and_bounded() {
    let points = generate_parameter_combinations(0.1, 0.8, 0.3, 0.9, 9);
    assert_eq!(points.len(), 9);
    assert_eq!(points[1].top_p, 0.6);
    assert_eq!(points[3].temperature, 0.45);
    for point in points {
      assert!((0.1..=0.8).contains(&point.temperature));
      assert!((0.3..=0.9).contains(&point.top_p));
    }
  }

  #[test]
  fn test_rounding_follows_stored_decimal_value() {
    // 0.5 + 0.615 is stored just below 1.115
    let points = generate_parameter_combinations(0.5, 1.73, 0.0, 1.0, 9);
    assert_eq!(points[3], ParameterPoint { temperature: 1.11, top_p: 0.0 });
    assert_eq!(points[4].top_p, 0.5);
  }

  #[test]
  fn test_degenerate_range_repeats_value() {
    let points = generate_parameter_combinations(0.7, 0.7, 0.9, 0.9, 3);
    assert_eq!(pairs(&points), vec![(0.7, 0.9); 3]);
  }

  #[test]
  #[should_panic(expected = "at least one variation")]
  fn test_zero_count_panics() {
    generate_parameter_combinations(0.0, 1.0, 0.0, 1.0, 0);
  }

  #[test]
  fn test_validate_accepts_well_formed_request() {
    assert_eq!(request().validate(), Ok(()));
    assert_eq!(request().grid().unwrap().len(), 4);
  }

  #[test]
  fn test_validate_rejects_bad_requests() {
    let mut bad = request();
    bad.prompt = "   ".to_string();
    assert_eq!(bad.validate(), Err(ValidationError::EmptyPrompt));

    let mut bad = request();
    bad.prompt = "x".repeat(2001);
    assert_eq!(bad.validate(), Err(ValidationError::PromptTooLong { length: 2001, max: 2000 }));

    let mut bad = request();
    bad.temperature_max = 2.5;
    assert!(matches!(
      bad.validate(),
      Err(ValidationError::OutOfRange { parameter: "temperatureMax", .. })
    ));

    let mut bad = request();
    bad.top_p_min = f64::NAN;
    assert!(matches!(bad.validate(), Err(ValidationError::OutOfRange { parameter: "topPMin", .. })));

    let mut bad = request();
    bad.variations = 11;
    assert_eq!(
      bad.validate(),
      Err(ValidationError::VariationCount { value: 11, min: 1, max: 10 })
    );

    let mut bad = request();
    bad.variations = 0;
    assert!(bad.grid().is_err());

    let mut bad = request();
    bad.temperature_min = 1.5;
    assert_eq!(bad.validate(), Err(ValidationError::TemperatureRange));
    assert_eq!(
      ValidationError::TemperatureRange.to_string(),
      "Temperature min cannot be greater than max"
    );

    let mut bad = request();
    bad.top_p_min = 1.0;
    bad.top_p_max = 0.9;
    assert_eq!(bad.validate(), Err(ValidationError::TopPRange));
  }

  #[test]
  fn test_validate_ranges_ignores_prompt() {
    let mut ranges_only = request();
    ranges_only.prompt = String::new();
    assert_eq!(ranges_only.validate_ranges(), Ok(()));

    ranges_only.top_p_max = 0.1;
    assert_eq!(ranges_only.validate_ranges(), Err(ValidationError::TopPRange));
  }

  #[test]
  fn test_request_uses_camel_case_json() {
    let json = r#"{"prompt":"Hi","temperatureMin":0,"temperatureMax":1,"topPMin":0.5,"topPMax":1,"variations":2}"#;
    let parsed: SweepRequest = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.top_p_min, 0.5);
    assert_eq!(parsed.variations, 2);
  }
}
