//! Workout map controller
//!
//! Owns the workout store and mediates between the map surface, the entry
//! form, the rendered list, the error modal, and the persistence slot.
//! Every method reacts to one external event:
//!
//! - geolocation fix / failure -> map view + stored markers, or a blocking alert
//! - map click -> pending location + open form
//! - form submit -> validate, append, marker, row, hide form, persist
//! - list row click -> animated pan to that workout
//! - close button / overlay / Escape -> dismiss the error modal

use serde::Serialize;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::form::{FormState, ValidationError, WorkoutForm};
use crate::modal::{DismissTrigger, ErrorModal, ModalState};
use crate::models::{ActivityType, Coords, Workout};
use crate::render::{render_workout_row, MarkerSpec};
use crate::store::{clear_slot, StoreError, WorkoutStore};
use crate::surface::{MapSurface, Presenter};

pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Can not get your position!";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
  #[error("Map is not available")]
  MapUnavailable,

  #[error("No map location selected")]
  NoPendingLocation,

  #[error("Invalid input: {0}")]
  Invalid(#[from] ValidationError),

  #[error("Unknown workout: {0}")]
  UnknownWorkout(String),

  #[error("Storage error: {0}")]
  Store(#[from] StoreError),
}

impl Serialize for ControllerError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Map Lifecycle
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapStatus {
  /// Waiting for the one-shot geolocation answer
  Pending,
  Ready { center: Coords },
  /// Geolocation denied or failed; stays this way until the page reloads
  Unavailable,
}

/// ---------------------------------------------------------------------------
/// Controller
/// ---------------------------------------------------------------------------

pub struct WorkoutMap<S> {
  surface: S,
  db: DbPool,
  config: AppConfig,
  map_status: MapStatus,
  pending: Option<Coords>,
  store: WorkoutStore,
  form: FormState,
  modal: ErrorModal,
}

impl<S: MapSurface + Presenter> WorkoutMap<S> {
  /// Build the controller and restore stored workouts.
  pub async fn load(db: DbPool, config: AppConfig, surface: S) -> Self {
    let store = WorkoutStore::rehydrate(&db, &config.storage_slot).await;

    Self {
      surface,
      db,
      config,
      map_status: MapStatus::Pending,
      pending: None,
      store,
      form: FormState::default(),
      modal: ErrorModal::default(),
    }
  }

  /// A page (re)load is up. Map, form, modal and pending click start over
  /// with the fresh DOM, then every stored workout is listed. Markers wait
  /// for the map.
  pub fn start(&mut self) {
    self.map_status = MapStatus::Pending;
    self.pending = None;
    self.form = FormState::default();
    self.modal = ErrorModal::default();

    for workout in self.store.iter() {
      self.surface.append_row(&render_workout_row(workout));
    }
    tracing::debug!(count = self.store.len(), "Rendered stored workouts");
  }

  /// First geolocation fix centers the map and drops markers for stored
  /// workouts. Returns false if the answer was already handled.
  pub fn position_acquired(&mut self, coords: Coords) -> bool {
    if self.map_status != MapStatus::Pending {
      tracing::debug!(?coords, status = ?self.map_status, "Ignoring repeated position");
      return false;
    }

    self.surface.create_view(coords, self.config.zoom_level);
    self.surface.add_tile_layer(&self.config.tiles);
    self.map_status = MapStatus::Ready { center: coords };

    for workout in self.store.iter() {
      self.surface.add_marker(&MarkerSpec::for_workout(workout));
    }

    tracing::info!(
      lat = coords.lat,
      lng = coords.lng,
      markers = self.store.len(),
      "Map loaded"
    );
    true
  }

  pub fn position_failed(&mut self, reason: &str) -> bool {
    if self.map_status != MapStatus::Pending {
      return false;
    }

    tracing::warn!(reason, "Geolocation unavailable, map disabled");
    self.map_status = MapStatus::Unavailable;
    self.surface.alert(POSITION_UNAVAILABLE_MESSAGE);
    true
  }

  /// A click on the map picks the location for the next workout.
  pub fn map_clicked(&mut self, coords: Coords) -> Result<(), ControllerError> {
    if !self.map_ready() {
      return Err(ControllerError::MapUnavailable);
    }

    self.pending = Some(coords);
    self.form.open();
    self.surface.show_form();
    Ok(())
  }

  /// The type selector changed; show the metric field for `selected`.
  pub fn activity_type_changed(&mut self, selected: ActivityType) {
    self.form.select_activity_type(selected);
    self.surface.show_metric_field(selected);
  }

  /// Validate and record a workout at the pending location.
  ///
  /// A rejected form raises the error modal and leaves everything else,
  /// including the open form, untouched.
  pub async fn submit(&mut self, form: &WorkoutForm) -> Result<Workout, ControllerError> {
    let coords = self.pending.ok_or(ControllerError::NoPendingLocation)?;

    let input = match form.validate() {
      Ok(input) => input,
      Err(e) => {
        tracing::debug!(error = %e, "Rejected workout form");
        if self.modal.show() {
          self.surface.set_error_modal(true);
        }
        return Err(e.into());
      }
    };

    let workout = self.store.append(input.into_workout(coords)).clone();

    self.surface.add_marker(&MarkerSpec::for_workout(&workout));
    self.surface.append_row(&render_workout_row(&workout));

    self.pending = None;
    self.form.close();
    self.surface.hide_form();

    tracing::info!(
      id = workout.id(),
      activity = %workout.activity_type(),
      distance = workout.distance(),
      duration = workout.duration(),
      "Workout logged"
    );

    self.store.persist(&self.db).await?;
    Ok(workout)
  }

  /// Pan to the workout behind a clicked list row.
  pub fn workout_selected(&self, id: &str) -> Result<(), ControllerError> {
    if !self.map_ready() {
      return Err(ControllerError::MapUnavailable);
    }

    let workout = self
      .store
      .find(id)
      .ok_or_else(|| ControllerError::UnknownWorkout(id.to_string()))?;

    self
      .surface
      .pan_to(workout.coords(), self.config.zoom_level, &self.config.pan);
    Ok(())
  }

  pub fn dismiss_error(&mut self, trigger: DismissTrigger) -> bool {
    let changed = self.modal.dismiss(trigger);
    if changed {
      self.surface.set_error_modal(false);
    }
    changed
  }

  pub fn key_pressed(&mut self, key: &str) -> bool {
    let changed = self.modal.handle_key(key);
    if changed {
      self.surface.set_error_modal(false);
    }
    changed
  }

  /// Wipe the persistence slot and have the page start over.
  pub async fn reset(&mut self) -> Result<(), ControllerError> {
    clear_slot(&self.db, &self.config.storage_slot).await?;
    self.store = WorkoutStore::empty(self.config.storage_slot.clone());
    self.pending = None;
    self.form.close();

    tracing::info!(slot = %self.config.storage_slot, "Workouts reset");
    self.surface.reload();
    Ok(())
  }

  pub fn workouts(&self) -> &[Workout] {
    self.store.as_slice()
  }

  pub fn modal_state(&self) -> ModalState {
    self.modal.state()
  }

  pub fn pending_location(&self) -> Option<Coords> {
    self.pending
  }

  pub fn map_status(&self) -> MapStatus {
    self.map_status
  }

  pub fn form(&self) -> &FormState {
    &self.form
  }

  fn map_ready(&self) -> bool {
    matches!(self.map_status, MapStatus::Ready { .. })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
