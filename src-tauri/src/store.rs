//! Workout store and its persistence slot
//!
//! The whole ordered list of workouts is serialized as one JSON array and
//! written to a named slot in the `storage_slots` table after every append.
//! On startup the slot is read back; a missing or unreadable blob yields an
//! empty store without bothering the user.

use sqlx::SqlitePool;

use crate::models::Workout;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Slot Access
/// ---------------------------------------------------------------------------

pub async fn read_slot(pool: &SqlitePool, name: &str) -> Result<Option<String>, StoreError> {
  let value = sqlx::query_scalar::<_, String>("SELECT value FROM storage_slots WHERE name = ?1")
    .bind(name)
    .fetch_optional(pool)
    .await?;
  Ok(value)
}

/// Overwrite the slot with `value`, creating it if needed.
pub async fn write_slot(pool: &SqlitePool, name: &str, value: &str) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO storage_slots (name, value, updated_at)
    VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(name) DO UPDATE SET
      value = excluded.value,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(name)
  .bind(value)
  .execute(pool)
  .await?;
  Ok(())
}

pub async fn clear_slot(pool: &SqlitePool, name: &str) -> Result<(), StoreError> {
  sqlx::query("DELETE FROM storage_slots WHERE name = ?1")
    .bind(name)
    .execute(pool)
    .await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Workout Store
/// ---------------------------------------------------------------------------

/// Append-only, in creation order.
#[derive(Debug, Clone)]
pub struct WorkoutStore {
  slot: String,
  workouts: Vec<Workout>,
}

impl WorkoutStore {
  pub fn empty(slot: impl Into<String>) -> Self {
    Self {
      slot: slot.into(),
      workouts: Vec::new(),
    }
  }

  /// Load the store from its slot. Absent data, a read failure, or a blob
  /// that doesn't parse all fall back to an empty store.
  pub async fn rehydrate(pool: &SqlitePool, slot: &str) -> Self {
    let raw = match read_slot(pool, slot).await {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        tracing::debug!(slot, "No stored workouts");
        return Self::empty(slot);
      }
      Err(e) => {
        tracing::warn!(slot, error = %e, "Failed to read stored workouts, starting empty");
        return Self::empty(slot);
      }
    };

    match Self::from_json(slot, &raw) {
      Ok(store) => {
        tracing::info!(slot, count = store.len(), "Restored workouts");
        store
      }
      Err(e) => {
        tracing::warn!(slot, error = %e, "Stored workouts unreadable, starting empty");
        Self::empty(slot)
      }
    }
  }

  /// Parse a serialized store; each record gets its variant metrics rebuilt.
  pub fn from_json(slot: impl Into<String>, raw: &str) -> Result<Self, StoreError> {
    let workouts: Vec<Workout> = serde_json::from_str(raw)?;
    Ok(Self {
      slot: slot.into(),
      workouts: workouts.into_iter().map(Workout::rehydrated).collect(),
    })
  }

  pub fn to_json(&self) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&self.workouts)?)
  }

  /// Write the full store to its slot.
  pub async fn persist(&self, pool: &SqlitePool) -> Result<(), StoreError> {
    let blob = self.to_json()?;
    write_slot(pool, &self.slot, &blob).await?;
    tracing::debug!(slot = %self.slot, count = self.len(), "Persisted workouts");
    Ok(())
  }

  pub fn append(&mut self, workout: Workout) -> &Workout {
    self.workouts.push(workout);
    &self.workouts[self.workouts.len() - 1]
  }

  /// Linear scan; the list is small.
  pub fn find(&self, id: &str) -> Option<&Workout> {
    self.workouts.iter().find(|w| w.id() == id)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
    self.workouts.iter()
  }

  pub fn as_slice(&self) -> &[Workout] {
    &self.workouts
  }

  pub fn len(&self) -> usize {
    self.workouts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.workouts.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
