//! `wendkuuni` — command-line front end for the water-point registry.
//!
//! # Usage
//!
//! ```
//! wendkuuni add --name "Borne fontaine" --district Gounghin --price 25 --lat 12.36 --lon -1.53
//! wendkuuni list --filter nearby --lat 12.37 --lon -1.52
//! wendkuuni rate <id> 4
//! ```

mod commands;
mod output;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wendkuuni_core::WaterPointRepository;
use wendkuuni_store_sqlite::SqliteStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find, register and report on community water points")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "wendkuuni.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Diagnostics go to stderr so command output stays clean.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store_path = settings.resolved_store_path();
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = %store_path.display(), "store opened");

  let repo = WaterPointRepository::new(store);
  commands::run(&repo, cli.command, settings.home_location()).await
}
