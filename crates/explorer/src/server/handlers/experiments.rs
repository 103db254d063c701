//! Experiment endpoint handlers

use assay::SweepRequest;
use axum::{
  extract::{rejection::JsonRejection, Json, Path, Query, State},
  http::{header, StatusCode},
  response::{IntoResponse, Json as ResponseJson, Response},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ExplorerError;
use crate::export::{self, ExportFormat};
use crate::model::{ExperimentWithResponses, GenerateResponse};
use crate::server::state::AppState;
use crate::server::types::{
  ApiError, BaseResponse, DeleteResponse, ExperimentDetailResponse, ExportQuery, ListExperimentsQuery,
  ListExperimentsResponse,
};
use crate::summary::ExperimentSummary;

type Failure = (StatusCode, ResponseJson<BaseResponse<()>>);

fn failure(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> Failure {
  let error = ApiError::new(key, message);
  (status, ResponseJson(BaseResponse::<()>::error(vec![error], transaction_id)))
}

/// Translate a library error into an HTTP failure
fn error_response(error: ExplorerError, transaction_id: Uuid) -> Failure {
  match &error {
    ExplorerError::Validation(e) => {
      failure(StatusCode::BAD_REQUEST, "validation_failed", &e.to_string(), transaction_id)
    }
    ExplorerError::NotFound { .. } => {
      failure(StatusCode::NOT_FOUND, "experiment_not_found", "Experiment not found", transaction_id)
    }
    ExplorerError::Export { message } => {
      failure(StatusCode::BAD_REQUEST, "invalid_export", message, transaction_id)
    }
    _ => {
      error!(%transaction_id, %error, "request failed");
      failure(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", &error.to_string(), transaction_id)
    }
  }
}

async fn load_experiment(
  state: &AppState,
  id: Uuid,
) -> Result<ExperimentWithResponses, ExplorerError> {
  state.store.get_experiment_with_responses(id).await?.ok_or_else(|| ExplorerError::not_found(id))
}

/// POST /api/generate - Run a parameter sweep
///
/// Bodies that do not deserialize into a [`SweepRequest`] are reported the
/// same way as requests that fail range validation.
pub async fn generate(
  State(state): State<AppState>,
  payload: Result<Json<SweepRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<BaseResponse<GenerateResponse>>), Failure> {
  let transaction_id = Uuid::new_v4();

  let Json(request) = payload.map_err(|rejection| {
    warn!(%transaction_id, error = %rejection.body_text(), "malformed sweep request");
    failure(StatusCode::BAD_REQUEST, "validation_failed", &rejection.body_text(), transaction_id)
  })?;

  match state.runner.run(&request).await {
    Ok(result) => {
      info!(%transaction_id, experiment_id = %result.experiment.id, "experiment generated");
      Ok((StatusCode::CREATED, ResponseJson(BaseResponse::success(result, transaction_id))))
    }
    Err(e) => {
      if matches!(e, ExplorerError::Validation(_)) {
        warn!(%transaction_id, error = %e, "rejected sweep request");
      }
      Err(error_response(e, transaction_id))
    }
  }
}

/// GET /api/experiments - Page through experiments, newest first
pub async fn list_experiments(
  State(state): State<AppState>,
  Query(query): Query<ListExperimentsQuery>,
) -> Result<ResponseJson<BaseResponse<ListExperimentsResponse>>, Failure> {
  let transaction_id = Uuid::new_v4();
  let (limit, offset) = query.resolve();

  let experiments = state
    .store
    .get_all_experiments(limit, offset)
    .await
    .map_err(|e| error_response(e.into(), transaction_id))?;

  let response = ListExperimentsResponse { experiments, limit, offset };
  Ok(ResponseJson(BaseResponse::success(response, transaction_id)))
}

/// GET /api/experiments/{id} - Experiment with its responses
pub async fn get_experiment(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<ResponseJson<BaseResponse<ExperimentDetailResponse>>, Failure> {
  let transaction_id = Uuid::new_v4();

  let experiment = load_experiment(&state, id).await.map_err(|e| error_response(e, transaction_id))?;
  let summary = ExperimentSummary::from_responses(&experiment.responses);

  Ok(ResponseJson(BaseResponse::success(ExperimentDetailResponse { experiment, summary }, transaction_id)))
}

/// DELETE /api/experiments/{id} - Remove an experiment and its responses
pub async fn delete_experiment(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<ResponseJson<BaseResponse<DeleteResponse>>, Failure> {
  let transaction_id = Uuid::new_v4();

  state.store.delete_experiment(id).await.map_err(|e| error_response(e.into(), transaction_id))?;
  info!(%transaction_id, experiment_id = %id, "experiment deleted");

  Ok(ResponseJson(BaseResponse::success(DeleteResponse { success: true }, transaction_id)))
}

/// GET /api/export/{id} - Download an experiment as JSON or CSV
pub async fn export_experiment(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
  Query(query): Query<ExportQuery>,
) -> Result<Response, Failure> {
  let transaction_id = Uuid::new_v4();

  let format = match query.format.as_deref() {
    Some(format) => format.parse::<ExportFormat>().map_err(|e| error_response(e, transaction_id))?,
    None => ExportFormat::Json,
  };

  let experiment = load_experiment(&state, id).await.map_err(|e| error_response(e, transaction_id))?;
  let body = export::encode(&experiment, format).map_err(|e| {
    error!(%transaction_id, error = %e, "export encoding failed");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", &e.to_string(), transaction_id)
  })?;

  let headers = [
    (header::CONTENT_TYPE, format.content_type().to_string()),
    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", format.file_name(id))),
  ];
  Ok((headers, body).into_response())
}
