//! Tauri commands: one per event the webview forwards

use std::sync::Arc;
use tauri::State;

use crate::controller::{ControllerError, MapStatus};
use crate::db::AppState;
use crate::form::WorkoutForm;
use crate::modal::{DismissTrigger, ModalState};
use crate::models::{ActivityType, Coords, Workout};

/// ---------------------------------------------------------------------------
/// Page Lifecycle
/// ---------------------------------------------------------------------------

/// Called once per page load, after the event listeners are attached. Resets
/// the per-page map, form and modal state, then renders the list rows for
/// stored workouts and returns them.
#[tauri::command]
pub async fn app_started(state: State<'_, Arc<AppState>>) -> Result<Vec<Workout>, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.start();
  Ok(app.workouts().to_vec())
}

#[tauri::command]
pub async fn get_workouts(state: State<'_, Arc<AppState>>) -> Result<Vec<Workout>, ControllerError> {
  Ok(state.workouts.lock().await.workouts().to_vec())
}

#[tauri::command]
pub async fn reset_workouts(state: State<'_, Arc<AppState>>) -> Result<(), ControllerError> {
  state.workouts.lock().await.reset().await
}

/// ---------------------------------------------------------------------------
/// Geolocation
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn position_acquired(
  state: State<'_, Arc<AppState>>,
  latitude: f64,
  longitude: f64,
) -> Result<MapStatus, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.position_acquired(Coords::new(latitude, longitude));
  Ok(app.map_status())
}

#[tauri::command]
pub async fn position_failed(
  state: State<'_, Arc<AppState>>,
  reason: Option<String>,
) -> Result<MapStatus, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.position_failed(reason.as_deref().unwrap_or("geolocation unsupported"));
  Ok(app.map_status())
}

/// ---------------------------------------------------------------------------
/// Map and Form
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn map_clicked(
  state: State<'_, Arc<AppState>>,
  lat: f64,
  lng: f64,
) -> Result<(), ControllerError> {
  state.workouts.lock().await.map_clicked(Coords::new(lat, lng))
}

/// Carries the selector's current value.
#[tauri::command]
pub async fn activity_type_changed(
  state: State<'_, Arc<AppState>>,
  activity_type: ActivityType,
) -> Result<ActivityType, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.activity_type_changed(activity_type);
  Ok(app.form().activity_type())
}

#[tauri::command]
pub async fn submit_workout(
  state: State<'_, Arc<AppState>>,
  form: WorkoutForm,
) -> Result<Workout, ControllerError> {
  state.workouts.lock().await.submit(&form).await
}

/// Row clicks carry the row's `data-id`.
#[tauri::command]
pub async fn workout_selected(
  state: State<'_, Arc<AppState>>,
  id: String,
) -> Result<(), ControllerError> {
  state.workouts.lock().await.workout_selected(&id)
}

/// ---------------------------------------------------------------------------
/// Error Modal
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn close_error_modal(
  state: State<'_, Arc<AppState>>,
) -> Result<ModalState, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.dismiss_error(DismissTrigger::CloseButton);
  Ok(app.modal_state())
}

#[tauri::command]
pub async fn overlay_clicked(
  state: State<'_, Arc<AppState>>,
) -> Result<ModalState, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.dismiss_error(DismissTrigger::Overlay);
  Ok(app.modal_state())
}

#[tauri::command]
pub async fn key_pressed(
  state: State<'_, Arc<AppState>>,
  key: String,
) -> Result<ModalState, ControllerError> {
  let mut app = state.workouts.lock().await;
  app.key_pressed(&key);
  Ok(app.modal_state())
}
