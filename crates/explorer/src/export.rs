//! JSON and CSV export of an experiment with its responses

use assay::{MetricDetail, QualityMetrics};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ExplorerError, Result};
use crate::model::{ExperimentWithResponses, ResponseRecord};

pub const CSV_HEADERS: [&str; 16] = [
  "Response ID",
  "Temperature",
  "Top P",
  "Content",
  "Overall Score",
  "Coherence Score",
  "Coherence Explanation",
  "Lexical Diversity Score",
  "Lexical Diversity Explanation",
  "Completeness Score",
  "Completeness Explanation",
  "Readability Score",
  "Readability Explanation",
  "Length Appropriateness Score",
  "Length Appropriateness Explanation",
  "Created At",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
  #[default]
  Json,
  Csv,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Json => "json",
      Self::Csv => "csv",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::Json => "application/json",
      Self::Csv => "text/csv",
    }
  }

  /// Download name for an exported experiment
  pub fn file_name(self, id: Uuid) -> String {
    format!("experiment-{id}.{}", self.extension())
  }
}

impl fmt::Display for ExportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

impl FromStr for ExportFormat {
  type Err = ExplorerError;

  fn from_str(value: &str) -> Result<Self> {
    match value.to_ascii_lowercase().as_str() {
      "json" => Ok(Self::Json),
      "csv" => Ok(Self::Csv),
      other => Err(ExplorerError::export(format!("unsupported format '{other}'"))),
    }
  }
}

pub fn encode(experiment: &ExperimentWithResponses, format: ExportFormat) -> Result<String> {
  match format {
    ExportFormat::Json => encode_json(experiment),
    ExportFormat::Csv => encode_csv(experiment),
  }
}

pub fn encode_json(experiment: &ExperimentWithResponses) -> Result<String> {
  serde_json::to_string_pretty(experiment).map_err(|e| ExplorerError::export(e.to_string()))
}

pub fn decode_json(input: &str) -> Result<ExperimentWithResponses> {
  serde_json::from_str(input).map_err(|e| ExplorerError::export(e.to_string()))
}

fn timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Encode as CSV: an `Experiment:`/`Created:` preamble, a blank line, the
/// header row and one row per response
pub fn encode_csv(experiment: &ExperimentWithResponses) -> Result<String> {
  let mut preamble = csv::Writer::from_writer(Vec::new());
  preamble
    .write_record([format!("Experiment: {}", experiment.experiment.prompt)])
    .map_err(|e| ExplorerError::export(e.to_string()))?;
  preamble
    .write_record([format!("Created: {}", timestamp(&experiment.experiment.created_at))])
    .map_err(|e| ExplorerError::export(e.to_string()))?;

  let mut output = preamble.into_inner().map_err(|e| ExplorerError::export(e.to_string()))?;
  // an empty record would be written as `""`
  output.push(b'\n');

  let mut writer = csv::Writer::from_writer(output);
  writer.write_record(CSV_HEADERS).map_err(|e| ExplorerError::export(e.to_string()))?;
  for response in &experiment.responses {
    writer.write_record(csv_row(response)).map_err(|e| ExplorerError::export(e.to_string()))?;
  }

  let output = writer.into_inner().map_err(|e| ExplorerError::export(e.to_string()))?;
  String::from_utf8(output).map_err(|e| ExplorerError::export(e.to_string()))
}

fn csv_row(response: &ResponseRecord) -> Vec<String> {
  let metrics = &response.metrics;
  let mut row = vec![
    response.id.to_string(),
    response.temperature.to_string(),
    response.top_p.to_string(),
    response.content.clone(),
    metrics.overall_score.to_string(),
  ];
  for detail in [
    &metrics.coherence,
    &metrics.lexical_diversity,
    &metrics.completeness,
    &metrics.readability,
    &metrics.length_appropriate,
  ] {
    row.push(detail.score.to_string());
    row.push(detail.explanation.clone());
  }
  row.push(timestamp(&response.created_at));
  row
}

/// Read the response rows of a CSV export back into records of `experiment_id`
pub fn decode_csv_rows(input: &str, experiment_id: Uuid) -> Result<Vec<ResponseRecord>> {
  let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(input.as_bytes());

  let mut records = Vec::new();
  let mut in_body = false;
  for record in reader.records() {
    let record = record.map_err(|e| ExplorerError::export(e.to_string()))?;
    if !in_body {
      in_body = record.iter().eq(CSV_HEADERS.iter().copied());
      continue;
    }
    if record.len() == 1 && record[0].is_empty() {
      continue;
    }
    records.push(parse_row(&record, experiment_id)?);
  }

  if !in_body {
    return Err(ExplorerError::export("missing CSV header row"));
  }
  Ok(records)
}

fn parse_row(record: &csv::StringRecord, experiment_id: Uuid) -> Result<ResponseRecord> {
  if record.len() != CSV_HEADERS.len() {
    return Err(ExplorerError::export(format!(
      "expected {} columns, found {}",
      CSV_HEADERS.len(),
      record.len()
    )));
  }

  let field = |index: usize| &record[index];
  let score = |index: usize| -> Result<u8> {
    field(index).parse().map_err(|_| ExplorerError::export(format!("invalid {}", CSV_HEADERS[index])))
  };
  let number = |index: usize| -> Result<f64> {
    field(index).parse().map_err(|_| ExplorerError::export(format!("invalid {}", CSV_HEADERS[index])))
  };
  let detail = |index: usize| -> Result<MetricDetail> { Ok(MetricDetail::new(score(index)?, field(index + 1))) };

  Ok(ResponseRecord {
    id: Uuid::parse_str(field(0)).map_err(|e| ExplorerError::export(e.to_string()))?,
    experiment_id,
    temperature: number(1)?,
    top_p: number(2)?,
    content: field(3).to_string(),
    metrics: QualityMetrics {
      overall_score: score(4)?,
      coherence: detail(5)?,
      lexical_diversity: detail(7)?,
      completeness: detail(9)?,
      readability: detail(11)?,
      length_appropriate: detail(13)?,
    },
    created_at: DateTime::parse_from_rfc3339(field(15))
      .map(|at| at.with_timezone(&Utc))
      .map_err(|e| ExplorerError::export(e.to_string()))?,
  })
}
