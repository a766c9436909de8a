//! Entry form: raw input coercion, validation, and the selected activity type
//!
//! The form only produces a [`Workout`] once every required field passes.
//! Distance, duration and cadence must be finite and strictly positive.
//! Elevation gain only needs to be finite, so flat or downhill rides are
//! accepted.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, Coords, Workout};

/// ---------------------------------------------------------------------------
/// Raw Form Input
/// ---------------------------------------------------------------------------

/// Field values exactly as typed. Only the metric field matching
/// `activity_type` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutForm {
  pub activity_type: ActivityType,
  #[serde(default)]
  pub distance: String,
  #[serde(default)]
  pub duration: String,
  #[serde(default)]
  pub cadence: String,
  #[serde(default)]
  pub elevation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
  Distance,
  Duration,
  Cadence,
  Elevation,
}

impl std::fmt::Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Field::Distance => write!(f, "distance"),
      Field::Duration => write!(f, "duration"),
      Field::Cadence => write!(f, "cadence"),
      Field::Elevation => write!(f, "elevation"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
  #[error("{field} must be a number, got {raw:?}")]
  NotANumber { field: Field, raw: String },

  #[error("{field} must be greater than zero, got {value}")]
  NotPositive { field: Field, value: f64 },
}

impl ValidationError {
  pub fn field(&self) -> Field {
    match self {
      ValidationError::NotANumber { field, .. } | ValidationError::NotPositive { field, .. } => {
        *field
      }
    }
  }
}

/// Validated numbers, ready to become a [`Workout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
  Running { distance: f64, duration: f64, cadence: f64 },
  Cycling { distance: f64, duration: f64, elevation_gain: f64 },
}

impl WorkoutInput {
  pub fn into_workout(self, coords: Coords) -> Workout {
    match self {
      WorkoutInput::Running { distance, duration, cadence } => {
        Workout::running(coords, distance, duration, cadence)
      }
      WorkoutInput::Cycling { distance, duration, elevation_gain } => {
        Workout::cycling(coords, distance, duration, elevation_gain)
      }
    }
  }
}

impl WorkoutForm {
  pub fn validate(&self) -> Result<WorkoutInput, ValidationError> {
    let distance = positive(Field::Distance, &self.distance)?;
    let duration = positive(Field::Duration, &self.duration)?;

    match self.activity_type {
      ActivityType::Running => Ok(WorkoutInput::Running {
        distance,
        duration,
        cadence: positive(Field::Cadence, &self.cadence)?,
      }),
      ActivityType::Cycling => Ok(WorkoutInput::Cycling {
        distance,
        duration,
        elevation_gain: finite(Field::Elevation, &self.elevation)?,
      }),
    }
  }
}

/// Numeric coercion as a browser number input does it: blank reads as zero,
/// anything unparseable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return 0.0;
  }
  trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn finite(field: Field, raw: &str) -> Result<f64, ValidationError> {
  let value = coerce_number(raw);
  if value.is_finite() {
    Ok(value)
  } else {
    Err(ValidationError::NotANumber {
      field,
      raw: raw.to_string(),
    })
  }
}

fn positive(field: Field, raw: &str) -> Result<f64, ValidationError> {
  let value = finite(field, raw)?;
  if value > 0.0 {
    Ok(value)
  } else {
    Err(ValidationError::NotPositive { field, value })
  }
}

/// ---------------------------------------------------------------------------
/// Form UI State
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FormState {
  visible: bool,
  activity_type: ActivityType,
}

impl FormState {
  pub fn open(&mut self) {
    self.visible = true;
  }

  /// Hide the form. The selected type is kept for the next entry.
  pub fn close(&mut self) {
    self.visible = false;
  }

  /// Follow the type selector. Setting the current type again is a no-op.
  pub fn select_activity_type(&mut self, activity_type: ActivityType) {
    self.activity_type = activity_type;
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn activity_type(&self) -> ActivityType {
    self.activity_type
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
