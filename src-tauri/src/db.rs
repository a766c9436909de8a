use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::PathBuf;
use tauri::Manager;
use tokio::sync::Mutex;

use crate::controller::WorkoutMap;
use crate::surface::WebviewSurface;

pub type DbPool = SqlitePool;

/// Application state shared by all commands
pub struct AppState {
  pub db: DbPool,
  pub workouts: Mutex<WorkoutMap<WebviewSurface>>,
}

/// Get the path to the database file
/// Stored in: ~/Library/Application Support/com.samleuthold.workout-map/workout-map.db
fn get_db_path<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> Result<PathBuf, Box<dyn std::error::Error>> {
  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;

  // Create directory if it doesn't exist
  fs::create_dir_all(&data_dir)?;

  Ok(data_dir.join("workout-map.db"))
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> Result<DbPool, Box<dyn std::error::Error>> {
  let db_path = get_db_path(app)?;
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "Initializing database");

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// Migrated in-memory database, used when the on-disk one can't be opened.
/// Nothing written here outlives the process.
///
/// A single connection, since every new connection to `sqlite::memory:`
/// opens a separate empty database.
pub async fn initialize_memory_db() -> Result<DbPool, Box<dyn std::error::Error>> {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}
