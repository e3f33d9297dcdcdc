//! Water points — the sole persisted entity — and their embedded reports.
//!
//! Field names on the wire follow the layout already written to devices
//! (`lastUpdate`, report `type`), so existing payloads keep loading.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result, geo::Coordinates};

/// Highest value a single rating submission may carry.
pub const MAX_RATING: f64 = 5.0;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether water can currently be drawn at the point.
///
/// Any stored code other than `functional` or `broken` loads as
/// [`Status::Unknown`] carrying the raw code, and is written back unchanged,
/// so a single odd record survives rewrites of the collection. `Unknown` is
/// never accepted on writes to that record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
  Functional,
  Broken,
  Unknown(String),
}

impl Status {
  /// The stored code.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Functional => "functional",
      Self::Broken => "broken",
      Self::Unknown(code) => code,
    }
  }

  /// Total mapping from a stored code.
  pub fn from_code(code: &str) -> Self {
    match code {
      "functional" => Self::Functional,
      "broken" => Self::Broken,
      other => Self::Unknown(other.to_owned()),
    }
  }

  pub fn is_functional(&self) -> bool { matches!(self, Self::Functional) }

  pub fn is_known(&self) -> bool { !matches!(self, Self::Unknown(_)) }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Status {
  type Err = Error;

  /// Strict parse for user input; `unknown` is rejected.
  fn from_str(s: &str) -> Result<Self> {
    match Self::from_code(s.trim()) {
      Self::Unknown(_) => Err(Error::validation(format!(
        "unknown status {s:?} (expected functional or broken)"
      ))),
      status => Ok(status),
    }
  }
}

impl Serialize for Status {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Status {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let code = String::deserialize(deserializer)?;
    Ok(Self::from_code(&code))
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Category of a community problem report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
  /// Breakdown.
  Panne,
  /// Leak.
  Fuite,
  Autre,
}

impl ReportKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Panne => "panne",
      Self::Fuite => "fuite",
      Self::Autre => "autre",
    }
  }
}

impl fmt::Display for ReportKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ReportKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "panne" => Ok(Self::Panne),
      "fuite" => Ok(Self::Fuite),
      "autre" => Ok(Self::Autre),
      other => Err(Error::validation(format!(
        "unknown report type {other:?} (expected panne, fuite or autre)"
      ))),
    }
  }
}

/// A stored report. `date` is assigned by the repository at append time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
  #[serde(rename = "type")]
  pub kind:        ReportKind,
  pub description: String,
  pub date:        DateTime<Utc>,
}

/// Caller-supplied part of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
  pub kind:        ReportKind,
  pub description: String,
}

impl NewReport {
  pub fn new(kind: ReportKind, description: impl Into<String>) -> Self {
    Self { kind, description: description.into() }
  }

  /// Validate and stamp the report.
  pub fn into_report(self, date: DateTime<Utc>) -> Result<Report> {
    let description = self.description.trim();
    if description.is_empty() {
      return Err(Error::validation("report description is empty"));
    }
    Ok(Report {
      kind: self.kind,
      description: description.to_owned(),
      date,
    })
  }
}

// ─── Water point ─────────────────────────────────────────────────────────────

/// A registered place where water can be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterPoint {
  /// Assigned at creation; never changes.
  pub id:          Uuid,
  pub name:        String,
  pub district:    String,
  /// Price of a 20 L can, in FCFA.
  pub price:       u32,
  pub status:      Status,
  /// `0` when unrated, otherwise the last submitted rating.
  #[serde(default)]
  pub rating:      f64,
  /// Every rating ever submitted, oldest first.
  #[serde(default)]
  pub ratings:     Vec<f64>,
  /// Append-only, oldest first.
  #[serde(default)]
  pub reports:     Vec<Report>,
  pub location:    Coordinates,
  pub last_update: DateTime<Utc>,
}

impl WaterPoint {
  /// Check the record-level invariants enforced on every write.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::validation("name is empty"));
    }
    if self.district.trim().is_empty() {
      return Err(Error::validation("district is empty"));
    }
    if self.price == 0 {
      return Err(Error::validation("price must be greater than zero"));
    }
    if !self.status.is_known() {
      return Err(Error::validation("status must be functional or broken"));
    }
    if !self.location.is_valid() {
      return Err(Error::validation(format!(
        "location out of range: {}, {}",
        self.location.latitude, self.location.longitude
      )));
    }
    if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
      return Err(Error::validation(format!("rating out of range: {}", self.rating)));
    }
    Ok(())
  }

  /// Mean of the rating history, or the scalar `rating` when no history
  /// exists (records written before history was kept).
  pub fn average_rating(&self) -> f64 {
    if self.ratings.is_empty() {
      return self.rating;
    }
    self.ratings.iter().sum::<f64>() / self.ratings.len() as f64
  }

  /// Up to `n` reports, most recent first.
  pub fn recent_reports(&self, n: usize) -> impl Iterator<Item = &Report> {
    self.reports.iter().rev().take(n)
  }
}

/// The fields a user fills in when registering a new water point.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaterPoint {
  pub name:     String,
  pub district: String,
  pub price:    u32,
  pub status:   Status,
  pub location: Coordinates,
}

impl NewWaterPoint {
  /// Build the full record: trimmed text fields, no rating, no reports.
  pub fn into_water_point(self, id: Uuid, now: DateTime<Utc>) -> Result<WaterPoint> {
    let point = WaterPoint {
      id,
      name: self.name.trim().to_owned(),
      district: self.district.trim().to_owned(),
      price: self.price,
      status: self.status,
      rating: 0.0,
      ratings: Vec::new(),
      reports: Vec::new(),
      location: self.location,
      last_update: now,
    };
    point.validate()?;
    Ok(point)
  }
}

/// A shallow partial update: every `Some` field replaces the stored one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterPointPatch {
  pub name:     Option<String>,
  pub district: Option<String>,
  pub price:    Option<u32>,
  pub status:   Option<Status>,
  pub location: Option<Coordinates>,
  pub rating:   Option<f64>,
}

impl WaterPointPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Merge onto `point`. Does not touch `last_update` or run validation.
  pub fn apply_to(self, point: &mut WaterPoint) {
    if let Some(name) = self.name {
      point.name = name.trim().to_owned();
    }
    if let Some(district) = self.district {
      point.district = district.trim().to_owned();
    }
    if let Some(price) = self.price {
      point.price = price;
    }
    if let Some(status) = self.status {
      point.status = status;
    }
    if let Some(location) = self.location {
      point.location = location;
    }
    if let Some(rating) = self.rating {
      point.rating = rating;
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use serde_json::json;

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap() }

  fn draft() -> NewWaterPoint {
    NewWaterPoint {
      name:     "  Fontaine du marché ".into(),
      district: "Gounghin".into(),
      price:    25,
      status:   Status::Functional,
      location: Coordinates::new(12.36, -1.53),
    }
  }

  #[test]
  fn draft_is_trimmed_and_blank() {
    let point = draft().into_water_point(Uuid::new_v4(), now()).unwrap();
    assert_eq!(point.name, "Fontaine du marché");
    assert_eq!(point.rating, 0.0);
    assert!(point.ratings.is_empty());
    assert!(point.reports.is_empty());
    assert_eq!(point.last_update, now());
  }

  #[test]
  fn draft_rejects_blank_name_and_zero_price() {
    let blank = NewWaterPoint { name: "   ".into(), ..draft() };
    assert!(matches!(
      blank.into_water_point(Uuid::new_v4(), now()),
      Err(Error::Validation(_))
    ));

    let free = NewWaterPoint { price: 0, ..draft() };
    assert!(matches!(
      free.into_water_point(Uuid::new_v4(), now()),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn unknown_status_loads_but_fails_validation() {
    let status: Status = serde_json::from_value(json!("en_travaux")).unwrap();
    assert_eq!(status, Status::Unknown("en_travaux".into()));
    assert_eq!(serde_json::to_value(&status).unwrap(), json!("en_travaux"));
    assert!("en_travaux".parse::<Status>().is_err());
    assert_eq!("broken".parse::<Status>().unwrap(), Status::Broken);
  }

  #[test]
  fn serialises_with_legacy_field_names() {
    let mut point = draft().into_water_point(Uuid::new_v4(), now()).unwrap();
    point.reports.push(Report {
      kind:        ReportKind::Fuite,
      description: "fuite au robinet".into(),
      date:        now(),
    });

    let value = serde_json::to_value(&point).unwrap();
    assert_eq!(value["status"], "functional");
    assert!(value.get("lastUpdate").is_some());
    assert_eq!(value["reports"][0]["type"], "fuite");
    assert_eq!(value["location"]["latitude"], 12.36);
  }

  #[test]
  fn legacy_record_without_reports_loads() {
    let value = json!({
      "id": "7d0c3f3e-3b0e-4c4e-9b8e-2f7f1d6b9a10",
      "name": "Puits",
      "district": "Tampouy",
      "price": 10,
      "status": "broken",
      "location": { "latitude": 12.4, "longitude": -1.55 },
      "lastUpdate": "2024-11-02T10:15:00.000Z"
    });
    let point: WaterPoint = serde_json::from_value(value).unwrap();
    assert!(point.reports.is_empty());
    assert_eq!(point.rating, 0.0);
    assert_eq!(point.status, Status::Broken);
  }

  #[test]
  fn patch_merges_only_present_fields() {
    let mut point = draft().into_water_point(Uuid::new_v4(), now()).unwrap();
    let before = point.clone();

    WaterPointPatch { price: Some(30), ..Default::default() }.apply_to(&mut point);

    assert_eq!(point.price, 30);
    assert_eq!(point.name, before.name);
    assert_eq!(point.status, before.status);
    assert_eq!(point.location, before.location);
  }

  #[test]
  fn average_falls_back_to_scalar_rating() {
    let mut point = draft().into_water_point(Uuid::new_v4(), now()).unwrap();
    point.rating = 3.0;
    assert_eq!(point.average_rating(), 3.0);

    point.ratings = vec![4.0, 5.0, 3.0];
    assert_eq!(point.average_rating(), 4.0);
  }

  #[test]
  fn recent_reports_newest_first() {
    let mut point = draft().into_water_point(Uuid::new_v4(), now()).unwrap();
    for (i, kind) in [ReportKind::Panne, ReportKind::Fuite, ReportKind::Autre, ReportKind::Panne]
      .into_iter()
      .enumerate()
    {
      point.reports.push(Report {
        kind,
        description: format!("report {i}"),
        date: now(),
      });
    }

    let recent: Vec<_> = point.recent_reports(3).map(|r| r.description.as_str()).collect();
    assert_eq!(recent, ["report 3", "report 2", "report 1"]);
  }

  #[test]
  fn report_description_is_required() {
    assert!(NewReport::new(ReportKind::Autre, "  ").into_report(now()).is_err());
    let report = NewReport::new(ReportKind::Panne, " pas d'eau ").into_report(now()).unwrap();
    assert_eq!(report.description, "pas d'eau");
    assert_eq!(report.date, now());
  }
}
