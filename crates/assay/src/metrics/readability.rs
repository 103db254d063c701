//! Readability based on the Flesch Reading Ease formula

use super::MetricDetail;
use crate::{decimal, text};

pub fn score(content: &str) -> MetricDetail {
  if content.trim().is_empty() {
    return MetricDetail::empty_response();
  }

  let sentences = text::sentences(content);
  let words = text::words(content);

  if sentences.is_empty() || words.is_empty() {
    return MetricDetail::new(20, "Invalid text structure");
  }

  let syllables: usize = words.iter().map(|word| text::count_syllables(word)).sum();

  let words_per_sentence = words.len() as f64 / sentences.len() as f64;
  let syllables_per_word = syllables as f64 / words.len() as f64;

  let score = flesch_reading_ease(words_per_sentence, syllables_per_word).clamp(0.0, 100.0).round()
    as i32;

  let explanation = if score >= 80 {
    format!("Highly readable text (avg {} words/sentence)", one_decimal(words_per_sentence))
  } else if score >= 60 {
    "Good readability, conversational style".to_string()
  } else if score >= 50 {
    "Moderate readability, fairly complex".to_string()
  } else if score >= 30 {
    format!("Challenging readability (avg {} words/sentence)", one_decimal(words_per_sentence))
  } else {
    "Very complex text, may be hard to follow".to_string()
  };

  MetricDetail::clamped(score, explanation)
}

pub fn flesch_reading_ease(words_per_sentence: f64, syllables_per_word: f64) -> f64 {
  206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word
}

fn one_decimal(value: f64) -> String {
  decimal::to_fixed(value, 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty() {
    assert_eq!(score(""), MetricDetail::new(0, "Empty response"));
  }

  #[test]
  fn test_punctuation_only_is_invalid() {
    assert_eq!(score("... !!"), MetricDetail::new(20, "Invalid text structure"));
  }

  #[test]
  fn test_simple_text_is_highly_readable() {
    let detail = score("The cat sat on the mat. The dog ran to the park.");
    assert_eq!(detail.score, 100);
    assert_eq!(detail.explanation, "Highly readable text (avg 6.0 words/sentence)");
  }

  #[test]
  fn test_average_is_rounded_from_stored_value() {
    // 61 words over 20 sentences, 3.05 is stored just below the tie
    let content = format!("{}The dog ran far.", "The cat ran. ".repeat(19));
    let detail = score(&content);
    assert_eq!(detail.score, 100);
    assert_eq!(detail.explanation, "Highly readable text (avg 3.0 words/sentence)");
  }

  #[test]
  fn test_conversational_band() {
    let detail = score("The river carried water past the quiet garden and under the narrow stone bridge.");
    assert_eq!(detail.score, 72);
    assert_eq!(detail.explanation, "Good readability, conversational style");
  }

  #[test]
  fn test_moderate_band() {
    let detail = score(
      "Morning sunlight slowly warmed the quiet garden. \
       Gentle breezes carried perfume toward the distant village.",
    );
    assert_eq!(detail.score, 53);
    assert_eq!(detail.explanation, "Moderate readability, fairly complex");
  }

  #[test]
  fn test_challenging_band() {
    let detail = score("Careful gardeners water their flowers early, before the heat of the day arrives.");
    assert_eq!(detail.score, 44);
    assert_eq!(detail.explanation, "Challenging readability (avg 13.0 words/sentence)");
  }

  #[test]
  fn test_dense_text_is_complex() {
    let detail = score(
      "Institutional interoperability considerations necessitate comprehensive organizational \
       restructuring initiatives, particularly regarding administrative responsibilities.",
    );
    assert_eq!(detail.score, 0);
    assert_eq!(detail.explanation, "Very complex text, may be hard to follow");
  }

  #[test]
  fn test_one_decimal_rounds_ties_up() {
    assert_eq!(one_decimal(2.25), "2.3");
    assert_eq!(one_decimal(6.0), "6.0");
    assert_eq!(one_decimal(7.3333), "7.3");
    assert_eq!(one_decimal(61.0 / 20.0), "3.0");
  }
}
