//! Length appropriateness: response length compared to what the prompt asks for

use once_cell::sync::Lazy;
use regex::Regex;

use super::MetricDetail;
use crate::text;

static REQUIRES_DETAIL: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(explain|describe|elaborate|discuss|analyze|compare|why|how)\b").unwrap()
});
static REQUESTS_BREVITY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(brief|short|concise|summary|summarize|quick)\b").unwrap()
});

/// Expected response length in words, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedLength {
  pub min: usize,
  pub max: usize,
}

impl ExpectedLength {
  /// Derive the expected range from the prompt.
  ///
  /// Prompt size sets the baseline, then detail keywords widen it and
  /// brevity keywords narrow it, in that order.
  pub fn for_prompt(prompt: &str) -> Self {
    let prompt_words = text::piece_count(prompt);

    let mut expected = if prompt_words > 50 {
      Self { min: 100, max: 500 }
    } else if prompt_words < 10 {
      Self { min: 30, max: 200 }
    } else {
      Self { min: 50, max: 300 }
    };

    if REQUIRES_DETAIL.is_match(prompt) {
      expected.min = expected.min.max(80);
      expected.max = expected.max.max(400);
    }

    if REQUESTS_BREVITY.is_match(prompt) {
      expected.min = expected.min.min(30);
      expected.max = expected.max.min(150);
    }

    expected
  }
}

pub fn score(content: &str, prompt: &str) -> MetricDetail {
  if content.trim().is_empty() {
    return MetricDetail::empty_response();
  }

  let words = text::piece_count(content);
  let ExpectedLength { min, max } = ExpectedLength::for_prompt(prompt);

  if (words as f64) < min as f64 * 0.5 {
    MetricDetail::new(30, format!("Too brief ({words} words). Expected {min}-{max} words"))
  } else if words < min {
    MetricDetail::new(70, format!("Somewhat brief ({words} words). Could be more detailed"))
  } else if words > max * 2 {
    MetricDetail::new(50, format!("Excessively long ({words} words). Expected {min}-{max} words"))
  } else if words > max {
    MetricDetail::new(75, format!("Slightly verbose ({words} words)"))
  } else {
    MetricDetail::new(100, format!("Appropriate length ({words} words) for the given prompt"))
  }
}
