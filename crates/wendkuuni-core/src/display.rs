//! Presentation helpers: labels, colours, star strings, dates, prices.
//!
//! Every function here is total. Unknown statuses, out-of-range ratings and
//! unparseable timestamps map to a fixed fallback instead of failing.

use chrono::{DateTime, Utc};

use crate::{
  geo::Coordinates,
  water_point::{ReportKind, Status},
};

/// Number of glyphs produced by [`stars`].
pub const STAR_COUNT: usize = 5;

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

/// Shown in place of a missing or invalid timestamp.
pub const TIMESTAMP_PLACEHOLDER: &str = "Non disponible";

pub fn status_label(status: &Status) -> &'static str {
  match status {
    Status::Functional => "Fonctionnel",
    Status::Broken => "En panne",
    Status::Unknown(_) => "Inconnu",
  }
}

/// Hex colour used to render a status.
pub fn status_color(status: &Status) -> &'static str {
  match status {
    Status::Functional => "#4CAF50",
    Status::Broken => "#F44336",
    Status::Unknown(_) => "#9E9E9E",
  }
}

pub fn report_kind_label(kind: ReportKind) -> &'static str {
  match kind {
    ReportKind::Panne => "PANNE",
    ReportKind::Fuite => "FUITE",
    ReportKind::Autre => "AUTRE",
  }
}

/// Fixed-width star string. The rating is clamped to `0..=5` and rounded to
/// the nearest whole star; NaN counts as zero.
pub fn stars(rating: f64) -> String {
  let filled = if rating.is_nan() {
    0
  } else {
    rating.clamp(0.0, STAR_COUNT as f64).round() as usize
  };
  let mut out = String::with_capacity(STAR_COUNT * FILLED_STAR.len_utf8());
  out.extend(std::iter::repeat_n(FILLED_STAR, filled));
  out.extend(std::iter::repeat_n(EMPTY_STAR, STAR_COUNT - filled));
  out
}

/// `dd/mm/YYYY HH:MM`, in UTC.
pub fn format_datetime(at: DateTime<Utc>) -> String {
  at.format("%d/%m/%Y %H:%M").to_string()
}

/// Render an RFC 3339 string, or [`TIMESTAMP_PLACEHOLDER`] if it is absent or
/// does not parse.
pub fn format_timestamp(raw: Option<&str>) -> String {
  raw
    .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
    .map(|dt| format_datetime(dt.with_timezone(&Utc)))
    .unwrap_or_else(|| TIMESTAMP_PLACEHOLDER.to_owned())
}

pub fn format_price(price: u32) -> String { format!("{price} FCFA") }

/// Metres below one kilometre, otherwise kilometres with one decimal.
pub fn format_distance(km: f64) -> String {
  if km < 1.0 {
    format!("{} m", (km * 1000.0).round() as i64)
  } else {
    format!("{km:.1} km")
  }
}

/// Web map search URL centred on `location`.
pub fn map_url(location: Coordinates) -> String {
  format!(
    "https://www.google.com/maps/search/?api=1&query={},{}",
    location.latitude, location.longitude
  )
}
