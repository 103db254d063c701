//! Text splitting helpers shared by the metric scorers
//!
//! The splitting rules are intentionally naive: sentences end at runs of
//! `.`, `!` or `?`, words are whitespace separated and paragraphs are
//! separated by blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").unwrap());
static VOWEL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());

/// Trimmed, non-empty sentences of the text
pub fn sentences(text: &str) -> Vec<&str> {
  SENTENCE_BREAK.split(text).map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Number of pieces produced by splitting on whitespace runs.
///
/// Nothing is filtered, so leading or trailing whitespace yields an extra
/// empty piece. Word counts that feed the completeness and length checks
/// depend on this.
pub fn piece_count(text: &str) -> usize {
  WHITESPACE.split(text).count()
}

/// Non-empty whitespace separated words
pub fn words(text: &str) -> Vec<&str> {
  WHITESPACE.split(text).filter(|w| !w.is_empty()).collect()
}

/// Paragraphs separated by blank lines, untrimmed, skipping blank ones
pub fn paragraphs(text: &str) -> Vec<&str> {
  PARAGRAPH_BREAK.split(text).filter(|p| !p.trim().is_empty()).collect()
}

/// Lower-cased vocabulary tokens longer than two characters.
///
/// Punctuation and other non-word characters become separators.
pub fn lexical_tokens(text: &str) -> Vec<String> {
  let lowered = text.to_lowercase();
  let cleaned = NON_WORD.replace_all(&lowered, " ");

  WHITESPACE
    .split(&cleaned)
    .filter(|token| token.chars().count() > 2)
    .map(str::to_string)
    .collect()
}

/// Approximate the number of syllables in a single word
pub fn count_syllables(word: &str) -> usize {
  let word: String =
    word.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()).collect();

  if word.len() <= 3 {
    return 1;
  }

  let groups = VOWEL_GROUP.find_iter(&word).count();
  let mut count = if groups == 0 { 1 } else { groups };

  // silent e
  if word.ends_with('e') {
    count -= 1;
  }

  count.max(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sentences_trim_and_skip_empty() {
    let found = sentences("Hello there.  How are you?! Fine...");
    assert_eq!(found, vec!["Hello there", "How are you", "Fine"]);

    assert!(sentences("...!?").is_empty());
    assert!(sentences("").is_empty());
  }

  #[test]
  fn test_piece_count_keeps_edge_pieces() {
    assert_eq!(piece_count("one two three"), 3);
    assert_eq!(piece_count("one  two\n\tthree"), 3);
    assert_eq!(piece_count(" one two"), 3);
    assert_eq!(piece_count("one two\n"), 3);
    assert_eq!(piece_count(""), 1);
  }

  #[test]
  fn test_words_filters_empty_pieces() {
    assert_eq!(words("  one two\n"), vec!["one", "two"]);
    assert!(words("   ").is_empty());
  }

  #[test]
  fn test_paragraphs() {
    let text = "First paragraph.\n\nSecond paragraph.\n   \nThird.";
    assert_eq!(paragraphs(text).len(), 3);
    assert_eq!(paragraphs("single block\nwith a line break").len(), 1);
  }

  #[test]
  fn test_lexical_tokens() {
    let tokens = lexical_tokens("The cat's hat, and a DOG-house!");
    assert_eq!(tokens, vec!["the", "cat", "hat", "and", "dog", "house"]);
  }

  #[test]
  fn test_count_syllables() {
    assert_eq!(count_syllables(""), 1);
    assert_eq!(count_syllables("the"), 1);
    assert_eq!(count_syllables("make"), 1);
    assert_eq!(count_syllables("water"), 2);
    assert_eq!(count_syllables("beautiful"), 3);
    assert_eq!(count_syllables("Reading,"), 2);
    assert_eq!(count_syllables("rhythm"), 1);
    assert_eq!(count_syllables("1234"), 1);
  }
}
