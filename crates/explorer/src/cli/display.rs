//! Display formatting utilities for CLI output

use assay::{Metric, QualityMetrics};
use colored::*;

use crate::model::{Experiment, ResponseRecord};
use crate::summary::{ExperimentSummary, ScoreBand};

/// Color a score by its band
pub fn colored_score(score: u8) -> ColoredString {
  let text = format!("{score:>3}");
  match ScoreBand::from_score(score) {
    ScoreBand::Excellent => text.green().bold(),
    ScoreBand::Good => text.blue(),
    ScoreBand::Moderate => text.yellow(),
    ScoreBand::Poor => text.red(),
  }
}

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current_line));
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

pub fn print_metrics(metrics: &QualityMetrics) {
  println!("  {} {}", "Overall".bold(), colored_score(metrics.overall_score));
  for metric in Metric::ALL {
    let detail = metrics.detail(metric);
    println!(
      "  {:<24} {}  {}",
      metric.label(),
      colored_score(detail.score),
      detail.explanation.dimmed()
    );
  }
}

pub fn print_experiment_header(experiment: &Experiment) {
  println!("{} {}", "Experiment".bold(), experiment.id.to_string().cyan());
  println!("  {} {}", "Created:".dimmed(), experiment.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
  println!("  {}", "Prompt:".dimmed());
  for line in wrap_text(&experiment.prompt, 76) {
    println!("    {line}");
  }
}

pub fn print_response(index: usize, response: &ResponseRecord, show_content: bool) {
  let label = format!(
    "#{} temperature={} top_p={}",
    index + 1,
    response.temperature,
    response.top_p
  );
  if response.is_failed() {
    println!("\n{} {}", label.bold(), "failed".red());
  } else {
    println!("\n{}", label.bold());
  }

  print_metrics(&response.metrics);

  if show_content {
    println!();
    for line in wrap_text(&response.content, 76) {
      println!("    {line}");
    }
  }
}

pub fn print_summary(summary: &ExperimentSummary) {
  println!("\n{}", "Summary".bold().underline());
  println!("  Responses:          {}", summary.response_count);
  println!("  Avg overall score:  {}", colored_score(summary.average_overall));
  println!("  Best coherence:     {}", colored_score(summary.best_coherence));
  println!("  Avg word count:     {}", summary.average_word_count);
  println!("  Best response:      {}", summary.best_response_id.to_string().cyan());
}

/// One-line listing entry
pub fn experiment_line(experiment: &Experiment) -> String {
  let prompt: String = experiment.prompt.chars().take(60).collect();
  let ellipsis = if experiment.prompt.chars().count() > 60 { "..." } else { "" };
  format!(
    "{}  {}  {}{}",
    experiment.id.to_string().cyan(),
    experiment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
    prompt.replace('\n', " "),
    ellipsis
  )
}
