//! REST API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Experiment, ExperimentWithResponses};
use crate::summary::ExperimentSummary;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 100;

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  #[serde(default)]
  pub stack: Vec<String>,

  #[serde(default)]
  pub context: serde_json::Value,
}

// Status/Version Endpoints
// =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  /// Active storage strategy
  pub storage: String,
  pub version: String,
}

// Experiment Endpoints
// ====================

/// Query for GET /api/experiments
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListExperimentsQuery {
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

impl ListExperimentsQuery {
  /// Limit defaults to 50 and is capped at 100, offset is floored at 0
  pub fn resolve(&self) -> (usize, usize) {
    let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(0, MAX_LIST_LIMIT);
    let offset = self.offset.unwrap_or(0).max(0);
    (limit as usize, offset as usize)
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListExperimentsResponse {
  pub experiments: Vec<Experiment>,
  pub limit: usize,
  pub offset: usize,
}

/// Response for GET /api/experiments/{id}
#[derive(Debug, Serialize, Deserialize)]
pub struct ExperimentDetailResponse {
  pub experiment: ExperimentWithResponses,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub summary: Option<ExperimentSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
  pub success: bool,
}

/// Query for GET /api/export/{id}
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportQuery {
  pub format: Option<String>,
}

// Implementation helpers
// =====================

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors: Vec::new(), data }
  }

  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: VersionInfo::current(), transaction_id, errors, data: () }
  }
}

impl VersionInfo {
  fn current() -> Self {
    let version = env!("CARGO_PKG_VERSION");
    Self { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string(), stack: Vec::new(), context: serde_json::Value::Null }
  }
}
