//! [`History`]: one caller's view of their prediction records.
//!
//! Every operation is scoped to the owner the `History` was built for. Yield
//! is computed on every write and recommendations on every read.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  prediction::{AdvisedPrediction, HistorySummary, NewPrediction, OwnerId},
  scoring::round2,
  store::PredictionStore,
  submission::Submission,
};

/// Confirmation returned by [`History::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deleted {
  pub deleted: Uuid,
}

/// The record lifecycle for a single owner over a [`PredictionStore`].
pub struct History<'a, S> {
  store: &'a S,
  owner: &'a OwnerId,
}

impl<'a, S: PredictionStore> History<'a, S> {
  pub fn new(store: &'a S, owner: &'a OwnerId) -> Self { Self { store, owner } }

  /// Validate a submission, score it, and persist it under this owner.
  pub async fn create(&self, submission: Submission) -> Result<AdvisedPrediction> {
    let scored = submission.into_new()?.score();
    let prediction = self
      .store
      .insert(NewPrediction { owner: self.owner.clone(), scored })
      .await
      .map_err(Error::store)?;

    tracing::info!(
      owner = %self.owner,
      id = %prediction.prediction_id,
      yield_estimate = prediction.yield_estimate,
      "prediction created"
    );
    Ok(prediction.advise())
  }

  /// All of this owner's records, newest first.
  pub async fn list(&self) -> Result<Vec<AdvisedPrediction>> {
    let predictions = self
      .store
      .list_for_owner(self.owner)
      .await
      .map_err(Error::store)?;

    tracing::debug!(owner = %self.owner, count = predictions.len(), "listed predictions");
    Ok(predictions.into_iter().map(|p| p.advise()).collect())
  }

  pub async fn get(&self, id: Uuid) -> Result<AdvisedPrediction> {
    tracing::debug!(owner = %self.owner, %id, "fetching prediction");
    self
      .store
      .get_for_owner(self.owner, id)
      .await
      .map_err(Error::store)?
      .map(|p| p.advise())
      .ok_or(Error::PredictionNotFound(id))
  }

  /// Replace any subset of the inputs and recompute the yield from the
  /// merged set. `created_at` is preserved.
  pub async fn update(
    &self,
    id: Uuid,
    submission: Submission,
  ) -> Result<AdvisedPrediction> {
    submission.check_update()?;

    let current = self
      .store
      .get_for_owner(self.owner, id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PredictionNotFound(id))?;

    let scored = submission.merge_into(&current.inputs())?.score();
    let updated = self
      .store
      .replace_inputs(self.owner, id, scored)
      .await
      .map_err(Error::store)?
      // deleted between the read and the write
      .ok_or(Error::PredictionNotFound(id))?;

    tracing::info!(
      owner = %self.owner,
      %id,
      yield_estimate = updated.yield_estimate,
      "prediction updated"
    );
    Ok(updated.advise())
  }

  pub async fn delete(&self, id: Uuid) -> Result<Deleted> {
    let removed = self
      .store
      .delete_for_owner(self.owner, id)
      .await
      .map_err(Error::store)?;

    if !removed {
      return Err(Error::PredictionNotFound(id));
    }
    tracing::info!(owner = %self.owner, %id, "prediction deleted");
    Ok(Deleted { deleted: id })
  }

  /// Count, mean and best yield over the whole history, plus the latest
  /// record.
  pub async fn summary(&self) -> Result<HistorySummary> {
    let predictions = self
      .store
      .list_for_owner(self.owner)
      .await
      .map_err(Error::store)?;

    let total = predictions.len();
    let yields = predictions.iter().map(|p| p.yield_estimate);
    // Scale before summing; unbounded nutrient terms can push the plain sum
    // past f64::MAX.
    let average_yield = (total > 0).then(|| {
      round2(yields.clone().map(|y| y / total as f64).sum::<f64>())
    });
    let best_yield = yields.reduce(f64::max);
    let latest = predictions.into_iter().next().map(|p| p.advise());

    Ok(HistorySummary { total, average_yield, best_yield, latest })
  }
}
