//! Handlers for `/predictions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/predictions` | Body: six readings + optional `seed_variety`; returns 201 |
//! | `GET`    | `/predictions` | Caller's history, newest first |
//! | `GET`    | `/predictions/summary` | Count, mean/best yield, latest record |
//! | `GET`    | `/predictions/:id` | 404 if missing or not the caller's |
//! | `PATCH`/`PUT` | `/predictions/:id` | Any subset of fields; yield recomputed |
//! | `DELETE` | `/predictions/:id` | Returns `{"deleted": id}` |
//!
//! Every response record carries `recommendations` derived at request time.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use maize_core::{
  history::{Deleted, History},
  prediction::{AdvisedPrediction, HistorySummary},
  store::PredictionStore,
  submission::Submission,
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  handlers::{ApiJson, ApiPath},
};

/// `POST /predictions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
  ApiJson(body): ApiJson<Submission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let created = History::new(&*state.store, &owner).create(body).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /predictions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
) -> Result<Json<Vec<AdvisedPrediction>>, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let predictions = History::new(&*state.store, &owner).list().await?;
  Ok(Json(predictions))
}

/// `GET /predictions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AdvisedPrediction>, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let prediction = History::new(&*state.store, &owner).get(id).await?;
  Ok(Json(prediction))
}

/// `PATCH /predictions/:id` and `PUT /predictions/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<Submission>,
) -> Result<Json<AdvisedPrediction>, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let updated = History::new(&*state.store, &owner).update(id, body).await?;
  Ok(Json(updated))
}

/// `DELETE /predictions/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Deleted>, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let deleted = History::new(&*state.store, &owner).delete(id).await?;
  Ok(Json(deleted))
}

/// `GET /predictions/summary`
pub async fn summary<S>(
  State(state): State<AppState<S>>,
  Caller(owner): Caller,
) -> Result<Json<HistorySummary>, ApiError>
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let summary = History::new(&*state.store, &owner).summary().await?;
  Ok(Json(summary))
}
