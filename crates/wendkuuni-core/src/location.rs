//! Device position lookup.
//!
//! Hosts supply a [`LocationProvider`]; a denied permission or a failed query
//! is returned to the caller as-is, never retried here.

use std::future::Future;

use thiserror::Error;

use crate::geo::Coordinates;

#[derive(Debug, Error)]
pub enum LocationError {
  #[error("location permission denied")]
  PermissionDenied,

  #[error("location unavailable: {0}")]
  Unavailable(String),
}

pub trait LocationProvider: Send + Sync {
  /// Ask for the current position.
  fn current_location(
    &self,
  ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send + '_;
}

/// A provider that always answers with the same configured position, or
/// denies access when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
  position: Option<Coordinates>,
}

impl FixedLocation {
  pub fn new(position: Coordinates) -> Self { Self { position: Some(position) } }

  pub fn denied() -> Self { Self { position: None } }

  pub fn from_option(position: Option<Coordinates>) -> Self { Self { position } }
}

impl LocationProvider for FixedLocation {
  async fn current_location(&self) -> Result<Coordinates, LocationError> {
    let position = self.position.ok_or(LocationError::PermissionDenied)?;
    if !position.is_valid() {
      return Err(LocationError::Unavailable(format!(
        "invalid coordinates {}, {}",
        position.latitude, position.longitude
      )));
    }
    Ok(position)
  }
}
