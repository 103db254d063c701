use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use super::{ExperimentStore, StorageError};
use crate::model::{Experiment, NewResponse, ResponseRecord};

const SCHEMA: &str = "
  PRAGMA foreign_keys = ON;

  CREATE TABLE IF NOT EXISTS experiments (
    id TEXT PRIMARY KEY,
    prompt TEXT NOT NULL,
    created_at TEXT NOT NULL
  );

  CREATE TABLE IF NOT EXISTS responses (
    id TEXT PRIMARY KEY,
    experiment_id TEXT NOT NULL,
    temperature REAL NOT NULL,
    top_p REAL NOT NULL,
    content TEXT NOT NULL,
    metrics TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (experiment_id) REFERENCES experiments(id) ON DELETE CASCADE
  );

  CREATE INDEX IF NOT EXISTS idx_responses_experiment_id ON responses(experiment_id);
  CREATE INDEX IF NOT EXISTS idx_experiments_created_at ON experiments(created_at DESC);
";

/// SQLite-backed store
///
/// Timestamps are stored as fixed-width RFC 3339 text so that ordering by
/// the column is chronological.
pub struct SqliteStore {
  connection: Mutex<Connection>,
}

type ExperimentRow = (String, String, String);
type ResponseRow = (String, String, f64, f64, String, String, String);

impl SqliteStore {
  /// Open (creating if needed) the database file at `path`
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    Self::initialize(Connection::open(path)?)
  }

  pub fn open_in_memory() -> Result<Self, StorageError> {
    Self::initialize(Connection::open_in_memory()?)
  }

  fn initialize(connection: Connection) -> Result<Self, StorageError> {
    connection.execute_batch(SCHEMA)?;
    Ok(Self { connection: Mutex::new(connection) })
  }

  fn with_connection<T>(
    &self,
    f: impl FnOnce(&Connection) -> Result<T, StorageError>,
  ) -> Result<T, StorageError> {
    let connection = self.connection.lock().map_err(|_| StorageError::Poisoned)?;
    f(&connection)
  }
}

fn timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(id: &str, value: &str) -> Result<DateTime<Utc>, StorageError> {
  DateTime::parse_from_rfc3339(value)
    .map(|at| at.with_timezone(&Utc))
    .map_err(|e| StorageError::corrupt(id, e))
}

fn parse_uuid(id: &str, value: &str) -> Result<Uuid, StorageError> {
  Uuid::parse_str(value).map_err(|e| StorageError::corrupt(id, e))
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
  matches!(error, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

fn experiment_from_row((id, prompt, created_at): ExperimentRow) -> Result<Experiment, StorageError> {
  Ok(Experiment {
    id: parse_uuid(&id, &id)?,
    created_at: parse_timestamp(&id, &created_at)?,
    prompt,
  })
}

fn response_from_row(row: ResponseRow) -> Result<ResponseRecord, StorageError> {
  let (id, experiment_id, temperature, top_p, content, metrics, created_at) = row;
  Ok(ResponseRecord {
    id: parse_uuid(&id, &id)?,
    experiment_id: parse_uuid(&id, &experiment_id)?,
    temperature,
    top_p,
    content,
    metrics: serde_json::from_str(&metrics).map_err(|e| StorageError::corrupt(&id, e))?,
    created_at: parse_timestamp(&id, &created_at)?,
  })
}

#[async_trait]
impl ExperimentStore for SqliteStore {
  fn backend_name(&self) -> &'static str {
    "sqlite"
  }

  async fn create_experiment(&self, id: Uuid, prompt: &str) -> Result<Experiment, StorageError> {
    let experiment = Experiment::new(id, prompt);
    self.with_connection(|connection| {
      connection
        .execute(
          "INSERT INTO experiments (id, prompt, created_at) VALUES (?1, ?2, ?3)",
          params![experiment.id.to_string(), experiment.prompt, timestamp(&experiment.created_at)],
        )
        .map_err(|e| {
          if is_constraint_violation(&e) {
            StorageError::DuplicateExperiment(id)
          } else {
            e.into()
          }
        })?;
      Ok(())
    })?;
    Ok(experiment)
  }

  async fn get_experiment(&self, id: Uuid) -> Result<Option<Experiment>, StorageError> {
    let row = self.with_connection(|connection| {
      Ok(
        connection
          .query_row(
            "SELECT id, prompt, created_at FROM experiments WHERE id = ?1",
            params![id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?,
      )
    })?;
    row.map(experiment_from_row).transpose()
  }

  async fn get_all_experiments(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<Experiment>, StorageError> {
    let rows: Vec<ExperimentRow> = self.with_connection(|connection| {
      let mut statement = connection.prepare(
        "SELECT id, prompt, created_at FROM experiments
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1 OFFSET ?2",
      )?;
      let rows = statement
        .query_map(params![limit as i64, offset as i64], |row| {
          Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
      Ok(rows)
    })?;
    rows.into_iter().map(experiment_from_row).collect()
  }

  async fn delete_experiment(&self, id: Uuid) -> Result<(), StorageError> {
    self.with_connection(|connection| {
      connection.execute("DELETE FROM experiments WHERE id = ?1", params![id.to_string()])?;
      Ok(())
    })
  }

  async fn create_response(&self, response: NewResponse) -> Result<ResponseRecord, StorageError> {
    let record = response.into_record(Utc::now());
    let metrics =
      serde_json::to_string(&record.metrics).map_err(|e| StorageError::corrupt(record.id.to_string(), e))?;

    self.with_connection(|connection| {
      connection
        .execute(
          "INSERT INTO responses (id, experiment_id, temperature, top_p, content, metrics, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            record.id.to_string(),
            record.experiment_id.to_string(),
            record.temperature,
            record.top_p,
            record.content,
            metrics,
            timestamp(&record.created_at),
          ],
        )
        .map_err(|e| {
          if is_constraint_violation(&e) {
            StorageError::ExperimentNotFound(record.experiment_id)
          } else {
            e.into()
          }
        })?;
      Ok(())
    })?;
    Ok(record)
  }

  async fn get_responses(&self, experiment_id: Uuid) -> Result<Vec<ResponseRecord>, StorageError> {
    let rows: Vec<ResponseRow> = self.with_connection(|connection| {
      let mut statement = connection.prepare(
        "SELECT id, experiment_id, temperature, top_p, content, metrics, created_at
         FROM responses WHERE experiment_id = ?1
         ORDER BY created_at ASC, rowid ASC",
      )?;
      let rows = statement
        .query_map(params![experiment_id.to_string()], |row| {
          Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
          ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
      Ok(rows)
    })?;
    rows.into_iter().map(response_from_row).collect()
  }
}
