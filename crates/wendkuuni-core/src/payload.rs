//! Encoding of the water-point collection stored under [`STORAGE_KEY`].
//!
//! Current payloads are an envelope `{"version": 1, "waterPoints": [...]}`.
//! A bare JSON array is the unversioned layout written by earlier releases;
//! it is read as version 0 and rewritten as an envelope on the next save.

use serde::{Deserialize, Serialize, de::Error as _};
use serde_json::Value;

use crate::{Error, Result, water_point::WaterPoint};

/// Namespaced key so the collection cannot collide with other host data.
pub const STORAGE_KEY: &str = "@wend_kuuni_eau:water_points";

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
  version:      u32,
  water_points: &'a [WaterPoint],
}

/// `version` is checked before this is decoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
  #[serde(default)]
  water_points: Vec<WaterPoint>,
}

pub fn encode(points: &[WaterPoint]) -> Result<String> {
  let envelope = EnvelopeRef { version: CURRENT_VERSION, water_points: points };
  Ok(serde_json::to_string(&envelope)?)
}

/// Decode a stored payload.
///
/// Fails with [`Error::Serialization`] on malformed input and
/// [`Error::UnsupportedVersion`] on envelopes newer than [`CURRENT_VERSION`].
pub fn decode(raw: &str) -> Result<Vec<WaterPoint>> {
  let value: Value = serde_json::from_str(raw)?;
  match value {
    Value::Array(_) => Ok(serde_json::from_value(value)?),
    Value::Object(ref map) => {
      let found = map
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| serde_json::Error::custom("envelope without a numeric version"))?;
      if found > u64::from(CURRENT_VERSION) {
        return Err(Error::UnsupportedVersion {
          found:     u32::try_from(found).unwrap_or(u32::MAX),
          supported: CURRENT_VERSION,
        });
      }
      let envelope: Envelope = serde_json::from_value(value)?;
      Ok(envelope.water_points)
    }
    _ => Err(serde_json::Error::custom("expected an array or a versioned envelope").into()),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{geo::Coordinates, water_point::Status};

  fn point(name: &str) -> WaterPoint {
    WaterPoint {
      id:          Uuid::new_v4(),
      name:        name.into(),
      district:    "Dapoya".into(),
      price:       15,
      status:      Status::Functional,
      rating:      0.0,
      ratings:     vec![],
      reports:     vec![],
      location:    Coordinates::new(12.38, -1.51),
      last_update: Utc::now(),
    }
  }

  #[test]
  fn writes_versioned_envelope() {
    let raw = encode(&[point("a")]).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], CURRENT_VERSION);
    assert_eq!(value["waterPoints"][0]["name"], "a");
  }

  #[test]
  fn reads_back_what_it_writes() {
    let points = vec![point("a"), point("b")];
    assert_eq!(decode(&encode(&points).unwrap()).unwrap(), points);
  }

  #[test]
  fn reads_legacy_bare_array() {
    let points = vec![point("legacy")];
    let raw = serde_json::to_string(&points).unwrap();
    assert_eq!(decode(&raw).unwrap(), points);
  }

  #[test]
  fn rejects_newer_version() {
    let raw = r#"{"version": 7, "waterPoints": []}"#;
    assert!(matches!(
      decode(raw),
      Err(Error::UnsupportedVersion { found: 7, supported: CURRENT_VERSION })
    ));
  }

  #[test]
  fn malformed_payloads_are_serialization_errors() {
    for raw in ["{not json", "42", r#"{"waterPoints": []}"#, r#"[{"id": 1}]"#] {
      assert!(matches!(decode(raw), Err(Error::Serialization(_))), "{raw}");
    }
  }
}
