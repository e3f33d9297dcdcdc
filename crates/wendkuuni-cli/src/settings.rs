//! Runtime settings, layered from `wendkuuni.toml` and `WENDKUUNI_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use wendkuuni_core::geo::Coordinates;

const DEFAULT_STORE_PATH: &str = "~/.local/share/wendkuuni/water_points.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding the collection. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Fallback position used when no `--lat`/`--lon` is given.
  #[serde(default)]
  pub home_latitude:  Option<f64>,
  #[serde(default)]
  pub home_longitude: Option<f64>,
}

fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

impl Settings {
  /// Read `path` (optional) and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("WENDKUUNI"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn home_location(&self) -> Option<Coordinates> {
    match (self.home_latitude, self.home_longitude) {
      (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
      _ => None,
    }
  }

  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
