use std::env;
use url::Url;

use crate::surface::{PanOptions, TileLayer};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_ZOOM: u8 = 13;
const MAX_ZOOM: u8 = 19;
const DEFAULT_STORAGE_SLOT: &str = "workouts";
const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_TILE_ATTRIBUTION: &str =
  "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const DEFAULT_PAN_SECONDS: f64 = 1.0;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {reason}")]
  Invalid { name: String, reason: String },
}

impl ConfigError {
  fn invalid(name: &str, reason: impl Into<String>) -> Self {
    Self::Invalid {
      name: name.to_string(),
      reason: reason.into(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// App Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub zoom_level: u8,
  pub storage_slot: String,
  pub tiles: TileLayer,
  pub pan: PanOptions,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      zoom_level: DEFAULT_ZOOM,
      storage_slot: DEFAULT_STORAGE_SLOT.to_string(),
      tiles: TileLayer {
        url_template: DEFAULT_TILE_URL.to_string(),
        attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
      },
      pan: PanOptions {
        animate: true,
        duration_seconds: DEFAULT_PAN_SECONDS,
      },
    }
  }
}

impl AppConfig {
  /// Read overrides from the environment; unset variables keep defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(raw) = var("WORKOUT_MAP_ZOOM") {
      let zoom: u8 = raw
        .parse()
        .map_err(|_| ConfigError::invalid("WORKOUT_MAP_ZOOM", format!("{:?} is not a zoom level", raw)))?;
      if zoom > MAX_ZOOM {
        return Err(ConfigError::invalid(
          "WORKOUT_MAP_ZOOM",
          format!("{} exceeds max zoom {}", zoom, MAX_ZOOM),
        ));
      }
      config.zoom_level = zoom;
    }

    if let Some(slot) = var("WORKOUT_MAP_STORAGE_SLOT") {
      config.storage_slot = slot;
    }

    if let Some(template) = var("WORKOUT_MAP_TILE_URL") {
      validate_tile_template(&template)?;
      config.tiles.url_template = template;
    }

    if let Some(attribution) = var("WORKOUT_MAP_TILE_ATTRIBUTION") {
      config.tiles.attribution = attribution;
    }

    if let Some(raw) = var("WORKOUT_MAP_PAN_SECONDS") {
      let seconds: f64 = raw
        .parse()
        .map_err(|_| ConfigError::invalid("WORKOUT_MAP_PAN_SECONDS", format!("{:?} is not a number", raw)))?;
      if !(seconds.is_finite() && seconds > 0.0) {
        return Err(ConfigError::invalid("WORKOUT_MAP_PAN_SECONDS", "must be greater than zero"));
      }
      config.pan.duration_seconds = seconds;
    }

    Ok(config)
  }
}

/// Blank values count as unset
fn var(name: &str) -> Option<String> {
  env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A tile template must become an http(s) URL once its `{s}`, `{z}`, `{x}`,
/// `{y}` placeholders are filled in.
fn validate_tile_template(template: &str) -> Result<(), ConfigError> {
  for placeholder in ["{z}", "{x}", "{y}"] {
    if !template.contains(placeholder) {
      return Err(ConfigError::invalid(
        "WORKOUT_MAP_TILE_URL",
        format!("missing {} placeholder", placeholder),
      ));
    }
  }

  let sample = template
    .replace("{s}", "a")
    .replace("{z}", "0")
    .replace("{x}", "0")
    .replace("{y}", "0")
    .replace("{r}", "");

  let url = Url::parse(&sample).map_err(|e| ConfigError::invalid("WORKOUT_MAP_TILE_URL", e.to_string()))?;
  match url.scheme() {
    "http" | "https" => Ok(()),
    other => Err(ConfigError::invalid(
      "WORKOUT_MAP_TILE_URL",
      format!("unsupported scheme {}", other),
    )),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
