//! Integration tests for `SqliteStore` against an in-memory database.

use maize_core::{
  Error as CoreError,
  history::History,
  prediction::{NewPrediction, OwnerId, PredictionInputs, Readings},
  store::PredictionStore,
  submission::Submission,
};
use serde_json::json;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn readings(nitrogen: f64) -> Readings {
  Readings {
    rainfall: 120.0,
    temperature: 25.0,
    nitrogen,
    phosphorus: 20.0,
    potassium: 20.0,
    ph: 6.5,
  }
}

fn new_prediction(owner: &OwnerId, nitrogen: f64) -> NewPrediction {
  NewPrediction {
    owner:  owner.clone(),
    scored: PredictionInputs {
      readings:     readings(nitrogen),
      seed_variety: Some("DK 777".into()),
    }
    .score(),
  }
}

fn body(value: serde_json::Value) -> Submission {
  serde_json::from_value(value).unwrap()
}

// ─── Raw store operations ────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_roundtrip() {
  let s = store().await;
  let alice = OwnerId::new("alice");

  let inserted = s.insert(new_prediction(&alice, 40.0)).await.unwrap();
  assert_eq!(inserted.yield_estimate, 6.7);

  let fetched = s
    .get_for_owner(&alice, inserted.prediction_id)
    .await
    .unwrap()
    .expect("row exists");
  assert_eq!(fetched, inserted);
}

#[tokio::test]
async fn get_requires_matching_owner() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let bob = OwnerId::new("bob");

  let inserted = s.insert(new_prediction(&alice, 40.0)).await.unwrap();
  assert!(
    s.get_for_owner(&bob, inserted.prediction_id)
      .await
      .unwrap()
      .is_none()
  );
  assert!(s.get_for_owner(&alice, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_scoped_and_newest_first() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let bob = OwnerId::new("bob");

  let first = s.insert(new_prediction(&alice, 10.0)).await.unwrap();
  s.insert(new_prediction(&bob, 20.0)).await.unwrap();
  let second = s.insert(new_prediction(&alice, 30.0)).await.unwrap();
  let third = s.insert(new_prediction(&alice, 40.0)).await.unwrap();

  let ids: Vec<Uuid> = s
    .list_for_owner(&alice)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.prediction_id)
    .collect();
  assert_eq!(
    ids,
    vec![third.prediction_id, second.prediction_id, first.prediction_id]
  );
  assert_eq!(s.list_for_owner(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_inputs_keeps_created_at() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let inserted = s.insert(new_prediction(&alice, 40.0)).await.unwrap();

  let replacement = PredictionInputs {
    readings:     readings(10.0),
    seed_variety: None,
  }
  .score();
  let updated = s
    .replace_inputs(&alice, inserted.prediction_id, replacement)
    .await
    .unwrap()
    .expect("row exists");

  assert_eq!(updated.readings.nitrogen, 10.0);
  assert_eq!(updated.yield_estimate, 5.2);
  assert_eq!(updated.seed_variety, None);
  assert_eq!(updated.created_at, inserted.created_at);
  assert_eq!(updated.prediction_id, inserted.prediction_id);
}

#[tokio::test]
async fn replace_inputs_for_foreign_owner_changes_nothing() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let bob = OwnerId::new("bob");
  let inserted = s.insert(new_prediction(&alice, 40.0)).await.unwrap();

  let replacement = PredictionInputs {
    readings:     readings(0.0),
    seed_variety: None,
  }
  .score();
  let result = s
    .replace_inputs(&bob, inserted.prediction_id, replacement)
    .await
    .unwrap();
  assert!(result.is_none());

  let still = s
    .get_for_owner(&alice, inserted.prediction_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(still, inserted);
}

#[tokio::test]
async fn delete_is_scoped_to_owner() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let bob = OwnerId::new("bob");
  let inserted = s.insert(new_prediction(&alice, 40.0)).await.unwrap();

  assert!(!s.delete_for_owner(&bob, inserted.prediction_id).await.unwrap());
  assert!(s.delete_for_owner(&alice, inserted.prediction_id).await.unwrap());
  assert!(!s.delete_for_owner(&alice, inserted.prediction_id).await.unwrap());
  assert!(s.list_for_owner(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn reopening_a_file_store_keeps_rows() {
  let dir = std::env::temp_dir().join(format!("maize-store-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("predictions.sqlite3");
  let alice = OwnerId::new("alice");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(new_prediction(&alice, 40.0)).await.unwrap().prediction_id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.get_for_owner(&alice, id).await.unwrap().is_some());
  drop(s);
  std::fs::remove_dir_all(&dir).ok();
}

// ─── Lifecycle over SQLite ───────────────────────────────────────────────────

#[tokio::test]
async fn history_update_roundtrip() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let history = History::new(&s, &alice);

  let created = history
    .create(body(json!({
      "rainfall": 120, "temperature": 25, "nitrogen": 40,
      "phosphorus": 20, "potassium": 20, "ph": 6.5,
    })))
    .await
    .unwrap();
  let id = created.prediction.prediction_id;

  for nitrogen in [35, 20, 10] {
    history
      .update(id, body(json!({ "nitrogen": nitrogen })))
      .await
      .unwrap();
  }

  let fetched = history.get(id).await.unwrap();
  assert_eq!(fetched.prediction.readings.nitrogen, 10.0);
  assert_eq!(fetched.prediction.readings.temperature, 25.0);
  assert_eq!(fetched.prediction.yield_estimate, 5.2);
  assert_eq!(fetched.prediction.created_at, created.prediction.created_at);
  assert_eq!(fetched, history.get(id).await.unwrap());
}

#[tokio::test]
async fn history_isolates_owners() {
  let s = store().await;
  let alice = OwnerId::new("alice");
  let bob = OwnerId::new("bob");

  let id = History::new(&s, &alice)
    .create(body(json!({
      "rainfall": "50", "temperature": "35", "nitrogen": "0",
      "phosphorus": "0", "potassium": "0", "ph": "9",
    })))
    .await
    .unwrap()
    .prediction
    .prediction_id;

  let as_bob = History::new(&s, &bob);
  assert!(as_bob.list().await.unwrap().is_empty());
  assert!(matches!(as_bob.get(id).await, Err(CoreError::PredictionNotFound(_))));
  assert!(matches!(as_bob.delete(id).await, Err(CoreError::PredictionNotFound(_))));

  let mine = History::new(&s, &alice).get(id).await.unwrap();
  assert_eq!(mine.prediction.yield_estimate, 0.8);
}
