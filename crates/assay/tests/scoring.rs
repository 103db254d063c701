use assay::{calculate_quality_metrics, Metric, MetricDetail, QualityMetrics};

const PHOTOSYNTHESIS: &str = "Photosynthesis is the process plants use to turn light into food. \
  First, chlorophyll in the leaves captures energy from sunlight. \
  The plant then pulls water up from its roots and takes carbon dioxide from the air. \
  However, none of this happens without the right enzymes working inside the chloroplasts. \
  Those enzymes rearrange the molecules into glucose, which the plant stores or burns for growth. \
  Oxygen escapes through small pores on the underside of each leaf. \
  In summary, light, water and carbon dioxide become sugar and oxygen.";

#[test]
fn test_well_written_answer_scores_high() {
  let metrics = calculate_quality_metrics(PHOTOSYNTHESIS, "Explain how photosynthesis works");

  assert!(metrics.coherence.score >= 85, "{:?}", metrics.coherence);
  assert!(metrics.lexical_diversity.score >= 70, "{:?}", metrics.lexical_diversity);
  assert!(metrics.completeness.score >= 85, "{:?}", metrics.completeness);
  assert_eq!(metrics.length_appropriate.score, 100);
  assert!(metrics.is_consistent());
}

#[test]
fn test_empty_answer_scores_zero() {
  let metrics = calculate_quality_metrics("", "anything");

  assert_eq!(metrics.overall_score, 0);
  for metric in Metric::ALL {
    assert_eq!(metrics.detail(metric), &MetricDetail::new(0, "Empty response"));
  }
}

#[test]
fn test_three_clean_sentences_are_coherent() {
  let content = "Rust guarantees memory safety without a garbage collector. \
                 Ownership rules are checked at compile time. \
                 As a result, entire classes of bugs simply cannot occur in safe code, \
                 which makes large systems far easier to maintain.";
  let metrics = calculate_quality_metrics(content, "Why use Rust?");

  assert!(metrics.coherence.score >= 85);
  assert_eq!(metrics.coherence.explanation, "Excellent coherence with proper structure and flow");
}

#[test]
fn test_repetitive_answer_has_low_diversity() {
  let content = ["alpha", "bravo", "charlie", "delta", "echo"].repeat(40).join(" ");
  let metrics = calculate_quality_metrics(&content, "Say something");

  assert!(metrics.lexical_diversity.score < 50);
  assert!(metrics.lexical_diversity.explanation.starts_with("Low diversity"));
}

#[test]
fn test_json_round_trip_preserves_explanations() {
  let metrics = calculate_quality_metrics(PHOTOSYNTHESIS, "Explain \"photosynthesis\", briefly");
  let json = serde_json::to_string(&metrics).unwrap();
  let decoded: QualityMetrics = serde_json::from_str(&json).unwrap();

  assert_eq!(decoded, metrics);
}
