//! [`WaterPointRepository`] — owns the persisted water-point collection.
//!
//! The whole collection lives under one key. Every mutation is a full
//! read-modify-write: load, change in memory, write everything back. There is
//! no locking or compare-and-swap, so two mutations in flight at once race and
//! the later write wins. Callers are expected to issue operations one at a
//! time.
//!
//! Each operation comes in two forms. `try_*` returns a tagged [`Error`];
//! the plain form logs the failure and collapses it to `false` (or an empty
//! list), which is all a single-alert UI needs.

use uuid::Uuid;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  filter::ListFilter,
  geo::Coordinates,
  payload::{self, STORAGE_KEY},
  store::KeyValueStore,
  water_point::{MAX_RATING, NewReport, NewWaterPoint, Report, WaterPoint, WaterPointPatch},
};

pub struct WaterPointRepository<S, C = SystemClock> {
  store: S,
  clock: C,
}

impl<S: KeyValueStore> WaterPointRepository<S> {
  pub fn new(store: S) -> Self { Self::with_clock(store, SystemClock) }
}

impl<S: KeyValueStore, C: Clock> WaterPointRepository<S, C> {
  pub fn with_clock(store: S, clock: C) -> Self { Self { store, clock } }

  // ── Loading and saving ────────────────────────────────────────────────────

  async fn load(&self) -> Result<Vec<WaterPoint>> {
    let raw = self.store.get(STORAGE_KEY).await.map_err(Error::storage)?;
    match raw {
      Some(raw) => payload::decode(&raw),
      None => Ok(Vec::new()),
    }
  }

  /// Load ahead of a write. A corrupt payload counts as empty so the write
  /// replaces it; a payload from a newer build is never overwritten.
  async fn load_for_write(&self) -> Result<Vec<WaterPoint>> {
    match self.load().await {
      Err(Error::Serialization(e)) => {
        tracing::warn!(error = %e, "stored water points are corrupt; starting from empty");
        Ok(Vec::new())
      }
      other => other,
    }
  }

  async fn save(&self, points: &[WaterPoint]) -> Result<()> {
    let raw = payload::encode(points)?;
    self.store.set(STORAGE_KEY, raw).await.map_err(Error::storage)?;
    tracing::debug!(count = points.len(), "saved water points");
    Ok(())
  }

  fn position(points: &[WaterPoint], id: Uuid) -> Result<usize> {
    points.iter().position(|p| p.id == id).ok_or(Error::NotFound(id))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The collection in insertion order.
  pub async fn try_list(&self) -> Result<Vec<WaterPoint>> { self.load().await }

  /// The collection in insertion order; empty if nothing was ever written or
  /// the stored payload cannot be read.
  pub async fn list(&self) -> Vec<WaterPoint> {
    self.try_list().await.unwrap_or_else(|e| {
      tracing::error!(error = %e, "failed to load water points");
      Vec::new()
    })
  }

  /// A single record, re-read from storage.
  pub async fn get(&self, id: Uuid) -> Option<WaterPoint> {
    self.list().await.into_iter().find(|p| p.id == id)
  }

  /// [`list`](Self::list) with `filter` applied.
  pub async fn list_filtered(
    &self,
    filter: ListFilter,
    user_location: Option<Coordinates>,
  ) -> Vec<WaterPoint> {
    filter.apply(self.list().await, user_location)
  }

  // ── Whole-collection writes ───────────────────────────────────────────────

  /// Persist `points` verbatim, overwriting whatever was stored.
  pub async fn try_replace_all(&self, points: &[WaterPoint]) -> Result<()> {
    self.save(points).await
  }

  pub async fn replace_all(&self, points: &[WaterPoint]) -> bool {
    outcome("replace_all", None, self.try_replace_all(points).await)
  }

  /// Drop the stored collection entirely.
  pub async fn try_clear(&self) -> Result<()> {
    self.store.remove(STORAGE_KEY).await.map_err(Error::storage)
  }

  pub async fn clear(&self) -> bool { outcome("clear", None, self.try_clear().await) }

  // ── Record mutations ──────────────────────────────────────────────────────

  /// Append a fully-populated record. Its id must not already be present.
  pub async fn try_create(&self, point: WaterPoint) -> Result<()> {
    point.validate()?;
    let mut points = self.load_for_write().await?;
    if points.iter().any(|p| p.id == point.id) {
      return Err(Error::validation(format!("duplicate id {}", point.id)));
    }
    points.push(point);
    self.save(&points).await
  }

  pub async fn create(&self, point: WaterPoint) -> bool {
    let id = point.id;
    outcome("create", Some(id), self.try_create(point).await)
  }

  /// Build a record from form input with a fresh id and persist it.
  pub async fn register(&self, draft: NewWaterPoint) -> Result<WaterPoint> {
    let point = draft.into_water_point(Uuid::new_v4(), self.clock.now())?;
    self.try_create(point.clone()).await?;
    tracing::debug!(id = %point.id, name = %point.name, "registered water point");
    Ok(point)
  }

  /// Merge `patch` over the record and refresh `last_update`.
  pub async fn try_update(&self, id: Uuid, patch: WaterPointPatch) -> Result<WaterPoint> {
    let mut points = self.load_for_write().await?;
    let index = Self::position(&points, id)?;

    let mut updated = points[index].clone();
    patch.apply_to(&mut updated);
    updated.last_update = self.clock.now();
    updated.validate()?;

    points[index] = updated.clone();
    self.save(&points).await?;
    Ok(updated)
  }

  pub async fn update(&self, id: Uuid, patch: WaterPointPatch) -> bool {
    outcome("update", Some(id), self.try_update(id, patch).await)
  }

  /// Remove the record with `id`. Removing an id that is not present still
  /// rewrites the collection and succeeds.
  pub async fn try_remove(&self, id: Uuid) -> Result<()> {
    let mut points = self.load_for_write().await?;
    points.retain(|p| p.id != id);
    self.save(&points).await
  }

  pub async fn remove(&self, id: Uuid) -> bool {
    outcome("remove", Some(id), self.try_remove(id).await)
  }

  /// Append a report dated now. Does not touch `last_update`.
  pub async fn try_append_report(&self, id: Uuid, report: NewReport) -> Result<Report> {
    let report = report.into_report(self.clock.now())?;
    let mut points = self.load_for_write().await?;
    let index = Self::position(&points, id)?;

    points[index].reports.push(report.clone());
    self.save(&points).await?;
    Ok(report)
  }

  pub async fn append_report(&self, id: Uuid, report: NewReport) -> bool {
    outcome("append_report", Some(id), self.try_append_report(id, report).await)
  }

  /// Record a rating: it becomes the current `rating`, is appended to the
  /// `ratings` history, and refreshes `last_update`.
  pub async fn try_set_rating(&self, id: Uuid, value: f64) -> Result<WaterPoint> {
    if !value.is_finite() || !(1.0..=MAX_RATING).contains(&value) {
      return Err(Error::validation(format!("rating must be between 1 and 5, got {value}")));
    }
    let mut points = self.load_for_write().await?;
    let index = Self::position(&points, id)?;

    let point = &mut points[index];
    point.rating = value;
    point.ratings.push(value);
    point.last_update = self.clock.now();
    let updated = point.clone();

    self.save(&points).await?;
    Ok(updated)
  }

  pub async fn set_rating(&self, id: Uuid, value: f64) -> bool {
    outcome("set_rating", Some(id), self.try_set_rating(id, value).await)
  }
}

/// Log a failed operation and collapse the result to a success flag.
fn outcome<T>(op: &'static str, id: Option<Uuid>, result: Result<T>) -> bool {
  match result {
    Ok(_) => true,
    Err(Error::NotFound(missing)) => {
      tracing::warn!(op = op, id = %missing, "water point not found");
      false
    }
    Err(Error::Validation(reason)) => {
      tracing::warn!(op = op, id = ?id, %reason, "rejected invalid water point data");
      false
    }
    Err(e) => {
      tracing::error!(op = op, id = ?id, error = %e, "water point operation failed");
      false
    }
  }
}
