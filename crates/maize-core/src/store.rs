//! The `PredictionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `maize-store-sqlite`).
//! [`crate::history::History`] and the server depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::prediction::{NewPrediction, OwnerId, Prediction, ScoredInputs};

/// Abstraction over a prediction store backend.
///
/// Every read and write except `insert` is scoped to an owner. Backends must
/// match on id and owner together, so a foreign id behaves exactly like a
/// missing one.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PredictionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record. The store assigns `prediction_id` and
  /// `created_at`.
  fn insert(
    &self,
    input: NewPrediction,
  ) -> impl Future<Output = Result<Prediction, Self::Error>> + Send + '_;

  /// All records owned by `owner`, newest first.
  fn list_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
  ) -> impl Future<Output = Result<Vec<Prediction>, Self::Error>> + Send + 'a;

  /// The record with `id`, if `owner` owns it.
  fn get_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Prediction>, Self::Error>> + Send + 'a;

  /// Overwrite the inputs and yield of an owned record, leaving
  /// `created_at` untouched. Returns the updated record, or `None` if
  /// `owner` has no record with `id`.
  fn replace_inputs<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
    scored: ScoredInputs,
  ) -> impl Future<Output = Result<Option<Prediction>, Self::Error>> + Send + 'a;

  /// Delete an owned record. Returns `false` if `owner` has no record with
  /// `id`.
  fn delete_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
