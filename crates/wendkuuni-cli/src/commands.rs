//! Subcommand handlers. Each one stands in for a screen of the mobile app.

use anyhow::{Result, anyhow, bail};
use clap::{Args, Subcommand};
use uuid::Uuid;
use wendkuuni_core::{
  WaterPointRepository,
  filter::ListFilter,
  geo::Coordinates,
  location::{FixedLocation, LocationError, LocationProvider},
  store::KeyValueStore,
  water_point::{NewReport, NewWaterPoint, ReportKind, Status, WaterPointPatch},
};

use crate::output;

// ─── Arguments ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List water points.
  List {
    /// all, nearby, cheap or functional.
    #[arg(long, default_value = "all")]
    filter:   ListFilter,
    #[command(flatten)]
    position: PositionArgs,
  },

  /// Show one water point with its latest reports.
  Show { id: Uuid },

  /// Register a new water point at the current position.
  Add {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    district: String,
    /// Price of a 20 L can, in FCFA.
    #[arg(long, default_value_t = 25)]
    price:    u32,
    #[arg(long, default_value = "functional")]
    status:   Status,
    #[command(flatten)]
    position: PositionArgs,
  },

  /// Change fields of an existing water point.
  Edit {
    id:       Uuid,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    price:    Option<u32>,
    #[arg(long)]
    status:   Option<Status>,
    #[command(flatten)]
    position: PositionArgs,
  },

  /// Delete a water point.
  Delete { id: Uuid },

  /// Report a problem at a water point.
  Report {
    id:          Uuid,
    /// panne, fuite or autre.
    #[arg(long, default_value = "panne")]
    kind:        ReportKind,
    #[arg(long)]
    description: String,
  },

  /// Rate a water point from 1 to 5.
  Rate {
    id:    Uuid,
    #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
    value: u8,
  },
}

/// An explicit position; overrides the configured home location.
#[derive(Args, Debug, Default)]
pub struct PositionArgs {
  #[arg(long, requires = "lon", allow_negative_numbers = true)]
  pub lat: Option<f64>,
  #[arg(long, requires = "lat", allow_negative_numbers = true)]
  pub lon: Option<f64>,
}

impl PositionArgs {
  fn coordinates(&self) -> Option<Coordinates> {
    Some(Coordinates::new(self.lat?, self.lon?))
  }

  /// The flags if given, else `home`.
  pub fn provider(&self, home: Option<Coordinates>) -> FixedLocation {
    FixedLocation::from_option(self.coordinates().or(home))
  }
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// Run `command`, writing user-facing output to stdout.
pub async fn run<S>(
  repo: &WaterPointRepository<S>,
  command: Command,
  home: Option<Coordinates>,
) -> Result<()>
where
  S: KeyValueStore,
{
  match command {
    Command::List { filter, position } => {
      let user_location = match position.provider(home).current_location().await {
        Ok(here) => Some(here),
        Err(e) => {
          if filter == ListFilter::Nearby {
            tracing::warn!(error = %e, "no position; nearby list keeps insertion order");
          }
          None
        }
      };
      let points = repo.list_filtered(filter, user_location).await;
      print!("{}", output::list(&points, user_location));
    }

    Command::Show { id } => {
      let point = repo
        .get(id)
        .await
        .ok_or_else(|| anyhow!("Point d'eau introuvable : {id}"))?;
      print!("{}", output::detail(&point));
    }

    Command::Add { name, district, price, status, position } => {
      let location = match position.provider(home).current_location().await {
        Ok(here) => here,
        Err(LocationError::PermissionDenied) => bail!(
          "Localisation requise : passez --lat/--lon ou configurez home_latitude/home_longitude."
        ),
        Err(e) => bail!("Impossible de récupérer la localisation : {e}"),
      };
      let draft = NewWaterPoint { name, district, price, status, location };
      let point = repo
        .register(draft)
        .await
        .map_err(|e| anyhow!("Le point d'eau n'a pas pu être ajouté : {e}"))?;
      println!("Le point d'eau a été ajouté : {}", point.id);
    }

    Command::Edit { id, name, district, price, status, position } => {
      let patch = WaterPointPatch {
        name,
        district,
        price,
        status,
        location: position.coordinates(),
        rating: None,
      };
      if patch.is_empty() {
        bail!("Rien à modifier.");
      }
      if !repo.update(id, patch).await {
        bail!("Une erreur est survenue lors de la mise à jour.");
      }
      println!("Le point d'eau a été mis à jour.");
    }

    Command::Delete { id } => {
      if !repo.remove(id).await {
        bail!("Impossible de supprimer le point d'eau.");
      }
      println!("Le point d'eau a été supprimé.");
    }

    Command::Report { id, kind, description } => {
      if description.trim().is_empty() {
        bail!("Description requise : veuillez décrire le problème.");
      }
      if !repo.append_report(id, NewReport::new(kind, description)).await {
        bail!("Le rapport n'a pas pu être enregistré.");
      }
      println!("Merci ! Votre rapport a bien été envoyé.");
    }

    Command::Rate { id, value } => {
      if !repo.set_rating(id, f64::from(value)).await {
        bail!("La note n'a pas pu être enregistrée.");
      }
      println!("Merci ! Votre note a été enregistrée.");
    }
  }
  Ok(())
}
