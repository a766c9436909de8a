pub mod commands;
pub mod config;
pub mod controller;
pub mod db;
pub mod form;
pub mod modal;
pub mod models;
pub mod render;
pub mod store;
pub mod surface;

#[cfg(test)]
mod test_utils;

use config::AppConfig;
use controller::WorkoutMap;
use db::AppState;
use std::sync::Arc;
use surface::WebviewSurface;
use tauri::Manager;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Structured logging; RUST_LOG overrides the default filter
fn init_logging() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,workout_map_lib=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  init_logging();

  let config = match AppConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      tracing::error!(error = %e, "Invalid configuration, using defaults");
      AppConfig::default()
    }
  };

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(move |app| {
      // Initialize database and restore workouts
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        let pool = match db::initialize_db(&app_handle).await {
          Ok(pool) => pool,
          Err(e) => {
            tracing::error!(error = %e, "Failed to initialize database, workouts will not be saved");
            db::initialize_memory_db().await.map_err(|e| {
              tracing::error!(error = %e, "Failed to open in-memory database");
              e
            })?
          }
        };

        let surface = WebviewSurface::new(app_handle.clone());
        let workouts = WorkoutMap::load(pool.clone(), config, surface).await;
        let state = Arc::new(AppState {
          db: pool,
          workouts: Mutex::new(workouts),
        });
        app_handle.manage(state);
        tracing::info!("Workout map ready");
        Ok::<(), Box<dyn std::error::Error>>(())
      })?;
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::workouts::app_started,
      commands::workouts::get_workouts,
      commands::workouts::reset_workouts,
      commands::workouts::position_acquired,
      commands::workouts::position_failed,
      commands::workouts::map_clicked,
      commands::workouts::activity_type_changed,
      commands::workouts::submit_workout,
      commands::workouts::workout_selected,
      commands::workouts::close_error_modal,
      commands::workouts::overlay_clicked,
      commands::workouts::key_pressed,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
