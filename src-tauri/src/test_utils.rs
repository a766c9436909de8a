//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - A recording map/page surface
//! - Form factories

use crate::form::WorkoutForm;
use crate::models::{ActivityType, Coords};
use crate::render::MarkerSpec;
use crate::surface::{MapSurface, PanOptions, Presenter, TileLayer};
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Recording Surface
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
  CreateView { center: Coords, zoom: u8 },
  TileLayer(TileLayer),
  AddMarker(MarkerSpec),
  PanTo { center: Coords, zoom: u8, options: PanOptions },
  ShowForm,
  HideForm,
  MetricField(ActivityType),
  AppendRow(String),
  ErrorModal(bool),
  Alert(String),
  Reload,
}

/// Stands in for the webview. Clones share one call log, so a test can
/// hand one copy to the controller and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
  calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl RecordingSurface {
  fn record(&self, call: SurfaceCall) {
    self.calls.lock().unwrap().push(call);
  }

  pub fn calls(&self) -> Vec<SurfaceCall> {
    self.calls.lock().unwrap().clone()
  }

  pub fn count<F: Fn(&SurfaceCall) -> bool>(&self, predicate: F) -> usize {
    self.calls.lock().unwrap().iter().filter(|c| predicate(*c)).count()
  }

  pub fn clear(&self) {
    self.calls.lock().unwrap().clear();
  }
}

impl MapSurface for RecordingSurface {
  fn create_view(&self, center: Coords, zoom: u8) {
    self.record(SurfaceCall::CreateView { center, zoom });
  }

  fn add_tile_layer(&self, layer: &TileLayer) {
    self.record(SurfaceCall::TileLayer(layer.clone()));
  }

  fn add_marker(&self, marker: &MarkerSpec) {
    self.record(SurfaceCall::AddMarker(marker.clone()));
  }

  fn pan_to(&self, center: Coords, zoom: u8, options: &PanOptions) {
    self.record(SurfaceCall::PanTo { center, zoom, options: *options });
  }
}

impl Presenter for RecordingSurface {
  fn show_form(&self) {
    self.record(SurfaceCall::ShowForm);
  }

  fn hide_form(&self) {
    self.record(SurfaceCall::HideForm);
  }

  fn show_metric_field(&self, activity_type: ActivityType) {
    self.record(SurfaceCall::MetricField(activity_type));
  }

  fn append_row(&self, html: &str) {
    self.record(SurfaceCall::AppendRow(html.to_string()));
  }

  fn set_error_modal(&self, visible: bool) {
    self.record(SurfaceCall::ErrorModal(visible));
  }

  fn alert(&self, message: &str) {
    self.record(SurfaceCall::Alert(message.to_string()));
  }

  fn reload(&self) {
    self.record(SurfaceCall::Reload);
  }
}

/// ---------------------------------------------------------------------------
/// Form Factories
/// ---------------------------------------------------------------------------

pub fn running_form(distance: &str, duration: &str, cadence: &str) -> WorkoutForm {
  WorkoutForm {
    activity_type: ActivityType::Running,
    distance: distance.to_string(),
    duration: duration.to_string(),
    cadence: cadence.to_string(),
    elevation: String::new(),
  }
}

pub fn cycling_form(distance: &str, duration: &str, elevation: &str) -> WorkoutForm {
  WorkoutForm {
    activity_type: ActivityType::Cycling,
    distance: distance.to_string(),
    duration: duration.to_string(),
    cadence: String::new(),
    elevation: elevation.to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'storage_slots'",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_recording_surface_shares_log_between_clones() {
    let surface = RecordingSurface::default();
    let handle = surface.clone();

    surface.show_form();
    surface.append_row("<li></li>");

    assert_eq!(
      handle.calls(),
      vec![SurfaceCall::ShowForm, SurfaceCall::AppendRow("<li></li>".to_string())]
    );

    handle.clear();
    assert!(surface.calls().is_empty());
  }
}
