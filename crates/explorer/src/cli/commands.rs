//! Command handlers for the explorer CLI

use anyhow::{anyhow, Context, Result};
use assay::{calculate_quality_metrics, generate_parameter_combinations, SweepRequest};
use clap::Args;
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::display;
use crate::completion::OpenAiClient;
use crate::config::ExplorerConfig;
use crate::experiment::{ExperimentRunner, RunnerOptions};
use crate::export::{self, ExportFormat};
use crate::storage::{open_store, SharedStore};
use crate::summary::{self, ExperimentSummary};

/// Sampling ranges shared by `run` and `grid`
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
  /// Lowest temperature to try
  #[arg(long, default_value_t = 0.0)]
  pub temp_min: f64,
  /// Highest temperature to try
  #[arg(long, default_value_t = 1.0)]
  pub temp_max: f64,
  /// Lowest top-p to try
  #[arg(long, default_value_t = 0.5)]
  pub top_p_min: f64,
  /// Highest top-p to try
  #[arg(long, default_value_t = 1.0)]
  pub top_p_max: f64,
  /// Number of parameter combinations (1-10)
  #[arg(short = 'n', long, default_value_t = 4)]
  pub variations: usize,
}

impl RangeArgs {
  pub fn into_request(self, prompt: String) -> SweepRequest {
    SweepRequest {
      prompt,
      temperature_min: self.temp_min,
      temperature_max: self.temp_max,
      top_p_min: self.top_p_min,
      top_p_max: self.top_p_max,
      variations: self.variations,
    }
  }
}

fn store(config: &ExplorerConfig) -> Result<SharedStore> {
  open_store(&config.storage).context("failed to open experiment store")
}

fn parse_id(id: &str) -> Result<Uuid> {
  Uuid::parse_str(id).map_err(|_| anyhow!("'{id}' is not a valid experiment id"))
}

/// Run a sweep against the configured completion service
pub async fn run_experiment(config: &ExplorerConfig, prompt: String, ranges: RangeArgs, show_content: bool) -> Result<()> {
  let request = ranges.into_request(prompt);
  request.validate()?;

  let completion = Arc::new(OpenAiClient::new(config.completion.clone())?);
  let runner = ExperimentRunner::new(store(config)?, completion, RunnerOptions::from(config));

  println!("{} {} variations...", "Running".bold(), request.variations);
  let result = runner.run(&request).await?;

  display::print_experiment_header(&result.experiment);
  for (index, response) in result.responses.iter().enumerate() {
    display::print_response(index, response, show_content);
  }
  if let Some(summary) = ExperimentSummary::from_responses(&result.responses) {
    display::print_summary(&summary);
  }

  Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
  match input {
    Some(path) if path != Path::new("-") => {
      std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
    _ => {
      let mut content = String::new();
      std::io::stdin().read_to_string(&mut content).context("failed to read stdin")?;
      Ok(content)
    }
  }
}

/// Score text from a file or stdin without calling any completion service
pub fn score_text(prompt: &str, input: Option<PathBuf>, json: bool) -> Result<()> {
  let content = read_input(input.as_deref())?;
  let metrics = calculate_quality_metrics(&content, prompt);

  if json {
    println!("{}", serde_json::to_string_pretty(&metrics)?);
  } else {
    display::print_metrics(&metrics);
  }
  Ok(())
}

/// Print the parameter grid a sweep would use
pub fn show_grid(ranges: RangeArgs, json: bool) -> Result<()> {
  let request = ranges.into_request(String::new());
  request.validate_ranges()?;

  let points = generate_parameter_combinations(
    request.temperature_min,
    request.temperature_max,
    request.top_p_min,
    request.top_p_max,
    request.variations,
  );

  if json {
    println!("{}", serde_json::to_string_pretty(&points)?);
  } else {
    for (index, point) in points.iter().enumerate() {
      println!("{:>2}. temperature={:<5} top_p={}", index + 1, point.temperature, point.top_p);
    }
  }
  Ok(())
}

pub async fn list_experiments(config: &ExplorerConfig, limit: usize, offset: usize) -> Result<()> {
  let experiments = store(config)?.get_all_experiments(limit, offset).await?;

  if experiments.is_empty() {
    println!("{}", "No experiments found.".yellow());
    return Ok(());
  }

  for experiment in &experiments {
    println!("{}", display::experiment_line(experiment));
  }
  Ok(())
}

pub async fn show_experiment(config: &ExplorerConfig, id: &str, show_content: bool) -> Result<()> {
  let id = parse_id(id)?;
  let experiment = store(config)?
    .get_experiment_with_responses(id)
    .await?
    .ok_or_else(|| anyhow!("Experiment not found: {id}"))?;

  display::print_experiment_header(&experiment.experiment);
  let ordered = summary::by_temperature(&experiment.responses);
  for (index, response) in ordered.into_iter().enumerate() {
    display::print_response(index, response, show_content);
  }
  if let Some(summary) = ExperimentSummary::from_responses(&experiment.responses) {
    display::print_summary(&summary);
  }

  Ok(())
}

pub async fn export_experiment(
  config: &ExplorerConfig,
  id: &str,
  format: ExportFormat,
  output: Option<PathBuf>,
) -> Result<()> {
  let id = parse_id(id)?;
  let experiment = store(config)?
    .get_experiment_with_responses(id)
    .await?
    .ok_or_else(|| anyhow!("Experiment not found: {id}"))?;

  let body = export::encode(&experiment, format)?;
  match output {
    Some(path) => {
      std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
      println!("{} {}", "Exported to".green(), path.display());
    }
    None => print!("{body}"),
  }
  Ok(())
}

pub async fn delete_experiment(config: &ExplorerConfig, id: &str) -> Result<()> {
  let id = parse_id(id)?;
  let store = store(config)?;

  if store.get_experiment(id).await?.is_none() {
    return Err(anyhow!("Experiment not found: {id}"));
  }

  store.delete_experiment(id).await?;
  println!("{} {}", "Deleted experiment".green(), id);
  Ok(())
}
