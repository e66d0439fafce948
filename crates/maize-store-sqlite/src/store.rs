//! [`SqliteStore`] — the SQLite implementation of [`PredictionStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use maize_core::{
  prediction::{NewPrediction, OwnerId, Prediction, ScoredInputs},
  store::PredictionStore,
};

use crate::{
  encode::{COLUMNS, RawPrediction, encode_dt, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A prediction store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PredictionStore impl ────────────────────────────────────────────────────

impl PredictionStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewPrediction) -> Result<Prediction> {
    let (inputs, yield_estimate) = input.scored.into_parts();
    let prediction = Prediction {
      prediction_id: Uuid::new_v4(),
      owner: input.owner,
      readings: inputs.readings,
      seed_variety: inputs.seed_variety,
      yield_estimate,
      // Truncated to the stored precision so the returned record equals a
      // later read of the same row.
      created_at: Utc::now().trunc_subsecs(6),
    };

    let id_str   = encode_uuid(prediction.prediction_id);
    let owner    = prediction.owner.as_str().to_owned();
    let r        = prediction.readings;
    let variety  = prediction.seed_variety.clone();
    let at_str   = encode_dt(prediction.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO predictions (
             prediction_id, owner, rainfall, temperature, nitrogen,
             phosphorus, potassium, ph, seed_variety, yield_estimate,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            owner,
            r.rainfall,
            r.temperature,
            r.nitrogen,
            r.phosphorus,
            r.potassium,
            r.ph,
            variety,
            yield_estimate,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(prediction)
  }

  async fn list_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
  ) -> Result<Vec<Prediction>> {
    let owner_str = owner.as_str().to_owned();

    let raws: Vec<RawPrediction> = self
      .conn
      .call(move |conn| {
        // rowid breaks ties between records created in the same microsecond.
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM predictions
           WHERE owner = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawPrediction::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrediction::into_prediction).collect()
  }

  async fn get_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
  ) -> Result<Option<Prediction>> {
    let id_str    = encode_uuid(id);
    let owner_str = owner.as_str().to_owned();

    let raw: Option<RawPrediction> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COLUMNS} FROM predictions
                 WHERE prediction_id = ?1 AND owner = ?2"
              ),
              rusqlite::params![id_str, owner_str],
              RawPrediction::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPrediction::into_prediction).transpose()
  }

  async fn replace_inputs<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
    scored: ScoredInputs,
  ) -> Result<Option<Prediction>> {
    let (inputs, yield_estimate) = scored.into_parts();
    let id_str    = encode_uuid(id);
    let owner_str = owner.as_str().to_owned();
    let r         = inputs.readings;
    let variety   = inputs.seed_variety;

    let raw: Option<RawPrediction> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE predictions SET
                   rainfall = ?3, temperature = ?4, nitrogen = ?5,
                   phosphorus = ?6, potassium = ?7, ph = ?8,
                   seed_variety = ?9, yield_estimate = ?10
                 WHERE prediction_id = ?1 AND owner = ?2
                 RETURNING {COLUMNS}"
              ),
              rusqlite::params![
                id_str,
                owner_str,
                r.rainfall,
                r.temperature,
                r.nitrogen,
                r.phosphorus,
                r.potassium,
                r.ph,
                variety,
                yield_estimate,
              ],
              RawPrediction::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPrediction::into_prediction).transpose()
  }

  async fn delete_for_owner<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: Uuid,
  ) -> Result<bool> {
    let id_str    = encode_uuid(id);
    let owner_str = owner.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM predictions WHERE prediction_id = ?1 AND owner = ?2",
          rusqlite::params![id_str, owner_str],
        )?;
        Ok(n)
      })
      .await?;

    Ok(removed > 0)
  }
}
