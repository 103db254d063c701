use assay::{calculate_quality_metrics, ParameterPoint, QualityMetrics};
use explorer::completion::CompletionError;
use explorer::storage::{ExperimentStore, MemoryStore, SqliteStore, StorageError};
use explorer::NewResponse;
use tempfile::TempDir;
use uuid::Uuid;

const CONTENT: &str = "The water cycle moves water between the sea, the sky and the land.";

fn scored(experiment_id: Uuid, temperature: f64) -> NewResponse {
  let point = ParameterPoint { temperature, top_p: 0.9 };
  NewResponse::scored(experiment_id, point, CONTENT.to_string(), calculate_quality_metrics(CONTENT, "Water?"))
}

async fn exercise_crud(store: &dyn ExperimentStore) {
  let id = Uuid::new_v4();
  let experiment = store.create_experiment(id, "Describe the water cycle").await.unwrap();
  assert_eq!(experiment.id, id);
  assert_eq!(store.get_experiment(id).await.unwrap(), Some(experiment.clone()));

  let first = store.create_response(scored(id, 0.0)).await.unwrap();
  let failed = NewResponse::failed(
    id,
    ParameterPoint { temperature: 1.0, top_p: 0.9 },
    &CompletionError::ServiceUnavailable,
  );
  let second = store.create_response(failed).await.unwrap();

  let responses = store.get_responses(id).await.unwrap();
  assert_eq!(responses, vec![first, second.clone()]);
  assert_eq!(responses[1].metrics, QualityMetrics::failed());

  let combined = store.get_experiment_with_responses(id).await.unwrap().unwrap();
  assert_eq!(combined.experiment, experiment);
  assert_eq!(combined.responses.len(), 2);

  store.delete_experiment(id).await.unwrap();
  assert_eq!(store.get_experiment(id).await.unwrap(), None);
  assert!(store.get_responses(id).await.unwrap().is_empty());
  assert!(store.get_experiment_with_responses(id).await.unwrap().is_none());
}

async fn exercise_listing(store: &dyn ExperimentStore) {
  let mut ids = Vec::new();
  for index in 0..5 {
    let id = Uuid::new_v4();
    store.create_experiment(id, &format!("Prompt {index}")).await.unwrap();
    ids.push(id);
  }

  let newest_first: Vec<Uuid> = store.get_all_experiments(50, 0).await.unwrap().iter().map(|e| e.id).collect();
  let mut expected = ids.clone();
  expected.reverse();
  assert_eq!(newest_first, expected);

  let page: Vec<Uuid> = store.get_all_experiments(2, 1).await.unwrap().iter().map(|e| e.id).collect();
  assert_eq!(page, vec![ids[3], ids[2]]);

  assert!(store.get_all_experiments(10, 5).await.unwrap().is_empty());
}

async fn exercise_orphan_response(store: &dyn ExperimentStore) {
  let missing = Uuid::new_v4();
  let error = store.create_response(scored(missing, 0.5)).await.unwrap_err();
  assert!(matches!(error, StorageError::ExperimentNotFound(id) if id == missing));
}

async fn exercise_duplicate(store: &dyn ExperimentStore) {
  let id = Uuid::new_v4();
  store.create_experiment(id, "once").await.unwrap();
  let error = store.create_experiment(id, "twice").await.unwrap_err();
  assert!(matches!(error, StorageError::DuplicateExperiment(_)));
}

#[tokio::test]
async fn test_memory_store() {
  let store = MemoryStore::new();
  assert_eq!(store.backend_name(), "memory");

  exercise_crud(&store).await;
  exercise_listing(&store).await;
  exercise_orphan_response(&store).await;
  exercise_duplicate(&store).await;
}

#[tokio::test]
async fn test_sqlite_store() {
  let temp_dir = TempDir::new().unwrap();
  let store = SqliteStore::open(temp_dir.path().join("nested").join("experiments.db")).unwrap();
  assert_eq!(store.backend_name(), "sqlite");

  exercise_crud(&store).await;
  exercise_listing(&store).await;
  exercise_orphan_response(&store).await;
  exercise_duplicate(&store).await;
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("experiments.db");
  let id = Uuid::new_v4();

  let written = {
    let store = SqliteStore::open(&path).unwrap();
    store.create_experiment(id, "Persist me").await.unwrap();
    store.create_response(scored(id, 0.3)).await.unwrap()
  };

  let store = SqliteStore::open(&path).unwrap();
  let combined = store.get_experiment_with_responses(id).await.unwrap().unwrap();
  assert_eq!(combined.experiment.prompt, "Persist me");
  assert_eq!(combined.responses, vec![written]);
}

#[tokio::test]
async fn test_open_store_follows_config() {
  let store = explorer::storage::open_store(&explorer::config::StorageConfig::memory()).unwrap();
  assert_eq!(store.backend_name(), "memory");

  let temp_dir = TempDir::new().unwrap();
  let config = explorer::config::StorageConfig::sqlite(temp_dir.path().join("sweeps.db"));
  let store = explorer::storage::open_store(&config).unwrap();
  assert_eq!(store.backend_name(), "sqlite");
  assert!(temp_dir.path().join("sweeps.db").exists());
}
