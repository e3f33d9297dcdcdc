//! List views over the collection: everything, nearest first, cheapest
//! first, or working points only.

use std::{fmt, str::FromStr};

use crate::{
  Error, Result,
  geo::{Coordinates, distance_between},
  water_point::WaterPoint,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
  /// Insertion order.
  #[default]
  All,
  /// Nearest to the user first. Without a user location the order is left
  /// untouched.
  Nearby,
  /// Lowest price first.
  Cheap,
  /// Only points whose status is `functional`.
  Functional,
}

impl ListFilter {
  pub const ALL: [Self; 4] = [Self::All, Self::Nearby, Self::Cheap, Self::Functional];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Nearby => "nearby",
      Self::Cheap => "cheap",
      Self::Functional => "functional",
    }
  }

  /// Apply the filter. Sorting is stable, so ties keep insertion order.
  pub fn apply(
    self,
    mut points: Vec<WaterPoint>,
    user_location: Option<Coordinates>,
  ) -> Vec<WaterPoint> {
    match self {
      Self::All => {}
      Self::Nearby => {
        if let Some(origin) = user_location {
          sort_by_distance(&mut points, origin);
        }
      }
      Self::Cheap => points.sort_by_key(|p| p.price),
      Self::Functional => points.retain(|p| p.status.is_functional()),
    }
    points
  }
}

impl fmt::Display for ListFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ListFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|f| f.as_str() == s.trim())
      .ok_or_else(|| Error::validation(format!("unknown filter {s:?}")))
  }
}

/// Stable sort, nearest to `origin` first.
pub fn sort_by_distance(points: &mut [WaterPoint], origin: Coordinates) {
  points.sort_by(|a, b| {
    distance_between(a.location, origin).total_cmp(&distance_between(b.location, origin))
  });
}

/// The point closest to `origin`, if any.
pub fn nearest(points: &[WaterPoint], origin: Coordinates) -> Option<&WaterPoint> {
  points.iter().min_by(|a, b| {
    distance_between(a.location, origin).total_cmp(&distance_between(b.location, origin))
  })
}
