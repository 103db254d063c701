//! Completeness: adequate length, enough sentences and visible structure

use once_cell::sync::Lazy;
use regex::Regex;

use super::MetricDetail;
use crate::text;

static INTRODUCTION: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)\b(first|firstly|to begin|initially|let me|let's)\b").unwrap());
static TRANSITION: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(however|furthermore|additionally|moreover|nevertheless|meanwhile)\b").unwrap()
});
static CONCLUSION: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(in conclusion|to conclude|finally|in summary|overall|therefore)\b").unwrap()
});

const STRUCTURE_BONUS: i32 = 5;
const STRUCTURE_EXPECTED_WORDS: usize = 100;

pub fn score(content: &str) -> MetricDetail {
  if content.trim().is_empty() {
    return MetricDetail::empty_response();
  }

  let word_count = text::piece_count(content);
  let sentence_count = text::sentences(content).len();

  let mut score: i32 = 100;
  let mut issues: Vec<&str> = Vec::new();

  if word_count < 20 {
    score -= 40;
    issues.push("too brief");
  } else if word_count < 50 {
    score -= 20;
    issues.push("somewhat brief");
  } else if word_count > 1000 {
    score -= 10;
    issues.push("potentially excessive length");
  }

  if sentence_count < 3 {
    score -= 20;
    issues.push("insufficient detail");
  }

  let bonus = structure_bonus(content);

  // Penalty and bonus never both apply
  if word_count > STRUCTURE_EXPECTED_WORDS && bonus == 0 {
    score -= 15;
    issues.push("lacks clear structure");
  } else {
    score = (score + bonus).min(100);
  }

  let score = score.max(0);
  let issues = issues.join(", ");

  let explanation = if score >= 85 {
    format!("Complete and well-structured response ({word_count} words, {sentence_count} sentences)")
  } else if score >= 70 {
    format!("Good completeness with {word_count} words")
  } else if score >= 50 {
    format!("Adequate but {issues}")
  } else {
    format!("Incomplete: {issues}")
  };

  MetricDetail::clamped(score, explanation)
}

/// Bonus for introduction, transition and conclusion cues
fn structure_bonus(content: &str) -> i32 {
  [&*INTRODUCTION, &*TRANSITION, &*CONCLUSION]
    .iter()
    .filter(|cue| cue.is_match(content))
    .count() as i32
    * STRUCTURE_BONUS
}
