//! Plain-text rendering of water points.

use wendkuuni_core::{
  display::{
    format_datetime, format_distance, format_price, map_url, report_kind_label,
    stars, status_label,
  },
  geo::{Coordinates, distance_between},
  water_point::WaterPoint,
};

/// Reports shown on the detail view.
pub const RECENT_REPORTS: usize = 3;

/// One line per point; distance is appended when the user position is known.
pub fn list(points: &[WaterPoint], user_location: Option<Coordinates>) -> String {
  if points.is_empty() {
    return "Aucun point d'eau enregistré.\n".to_owned();
  }

  let mut out = String::new();
  for point in points {
    out.push_str(&format!(
      "{}  {} ({})  {}  {}  {}",
      point.id,
      point.name,
      point.district,
      format_price(point.price),
      status_label(&point.status),
      stars(point.rating),
    ));
    if let Some(origin) = user_location {
      out.push_str("  ");
      out.push_str(&format_distance(distance_between(point.location, origin)));
    }
    out.push('\n');
  }
  out
}

/// The detail view: summary, map link, and the latest reports.
pub fn detail(point: &WaterPoint) -> String {
  let mut lines = vec![
    format!("{} — {}", point.name, status_label(&point.status)),
    format!("  Quartier             {}", point.district),
    format!("  Prix du bidon (20L)  {}", format_price(point.price)),
    format!(
      "  Évaluation           {} ({:.1} sur {} avis)",
      stars(point.rating),
      point.average_rating(),
      point.ratings.len(),
    ),
    format!("  Dernière mise à jour {}", format_datetime(point.last_update)),
    format!("  Carte                {}", map_url(point.location)),
  ];

  if !point.reports.is_empty() {
    lines.push("Rapports récents".to_owned());
    lines.extend(point.recent_reports(RECENT_REPORTS).map(|report| {
      format!(
        "  [{}] {} — {}",
        report_kind_label(report.kind),
        report.description,
        format_datetime(report.date),
      )
    }));
  }

  let mut out = lines.join("\n");
  out.push('\n');
  out
}
