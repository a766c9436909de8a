use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ---------------------------------------------------------------------------
/// Coordinates
/// ---------------------------------------------------------------------------

/// A map location, persisted as `[lat, lng]` like the map widget reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
  pub lat: f64,
  pub lng: f64,
}

impl Coords {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }
}

impl From<[f64; 2]> for Coords {
  fn from([lat, lng]: [f64; 2]) -> Self {
    Self { lat, lng }
  }
}

impl From<Coords> for [f64; 2] {
  fn from(c: Coords) -> Self {
    [c.lat, c.lng]
  }
}

/// ---------------------------------------------------------------------------
/// Activity Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
  #[default]
  Running,
  Cycling,
}

impl ActivityType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ActivityType::Running => "running",
      ActivityType::Cycling => "cycling",
    }
  }

  /// Capitalized name used in descriptions ("Running on April 14")
  pub fn label(&self) -> &'static str {
    match self {
      ActivityType::Running => "Running",
      ActivityType::Cycling => "Cycling",
    }
  }

  pub fn emoji(&self) -> &'static str {
    match self {
      ActivityType::Running => "🏃‍",
      ActivityType::Cycling => "🚴‍",
    }
  }
}

impl std::fmt::Display for ActivityType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Workout Record
/// ---------------------------------------------------------------------------

/// Variant payload. The derived metric is stored next to its inputs so the
/// persisted blob stays readable without recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
  #[serde(rename_all = "camelCase")]
  Running {
    /// steps/min
    cadence: f64,
    /// min/km
    #[serde(default)]
    pace: f64,
  },
  #[serde(rename_all = "camelCase")]
  Cycling {
    /// meters; older blobs call it `elevation`
    #[serde(alias = "elevation")]
    elevation_gain: f64,
    /// km/h
    #[serde(default)]
    speed: f64,
  },
}

/// One logged activity. Built through [`Workout::running`] or
/// [`Workout::cycling`]; everything except the interaction counter is fixed
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
  id: String,
  #[serde(alias = "date")]
  created_at: DateTime<Utc>,
  coords: Coords,
  /// km
  distance: f64,
  /// minutes
  duration: f64,
  description: String,
  #[serde(default)]
  clicks: u32,
  #[serde(flatten)]
  kind: WorkoutKind,
}

impl Workout {
  pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
    let kind = WorkoutKind::Running {
      cadence,
      pace: pace(distance, duration),
    };
    Self::build(coords, distance, duration, kind, Utc::now())
  }

  pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
    let kind = WorkoutKind::Cycling {
      elevation_gain,
      speed: speed(distance, duration),
    };
    Self::build(coords, distance, duration, kind, Utc::now())
  }

  fn build(
    coords: Coords,
    distance: f64,
    duration: f64,
    kind: WorkoutKind,
    created_at: DateTime<Utc>,
  ) -> Self {
    let activity_type = match kind {
      WorkoutKind::Running { .. } => ActivityType::Running,
      WorkoutKind::Cycling { .. } => ActivityType::Cycling,
    };

    Self {
      id: Uuid::now_v7().to_string(),
      created_at,
      coords,
      distance,
      duration,
      description: describe(activity_type, created_at),
      clicks: 0,
      kind,
    }
  }

  /// Restore variant behavior on a record read back from storage: the
  /// derived metric is recomputed from distance/duration, the description
  /// and interaction count are kept as stored.
  pub fn rehydrated(mut self) -> Self {
    self.kind = match self.kind {
      WorkoutKind::Running { cadence, .. } => WorkoutKind::Running {
        cadence,
        pace: pace(self.distance, self.duration),
      },
      WorkoutKind::Cycling { elevation_gain, .. } => WorkoutKind::Cycling {
        elevation_gain,
        speed: speed(self.distance, self.duration),
      },
    };
    self
  }

  /// Record that the user interacted with this workout.
  pub fn click(&mut self) {
    self.clicks += 1;
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn coords(&self) -> Coords {
    self.coords
  }

  pub fn distance(&self) -> f64 {
    self.distance
  }

  pub fn duration(&self) -> f64 {
    self.duration
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn clicks(&self) -> u32 {
    self.clicks
  }

  pub fn kind(&self) -> &WorkoutKind {
    &self.kind
  }

  pub fn activity_type(&self) -> ActivityType {
    match self.kind {
      WorkoutKind::Running { .. } => ActivityType::Running,
      WorkoutKind::Cycling { .. } => ActivityType::Cycling,
    }
  }

  /// min/km, running only
  pub fn pace(&self) -> Option<f64> {
    match self.kind {
      WorkoutKind::Running { pace, .. } => Some(pace),
      WorkoutKind::Cycling { .. } => None,
    }
  }

  /// km/h, cycling only
  pub fn speed(&self) -> Option<f64> {
    match self.kind {
      WorkoutKind::Cycling { speed, .. } => Some(speed),
      WorkoutKind::Running { .. } => None,
    }
  }
}

fn pace(distance: f64, duration: f64) -> f64 {
  duration / distance
}

fn speed(distance: f64, duration: f64) -> f64 {
  distance / (duration / 60.0)
}

/// "<Label> on <Month> <day>" on the local calendar
fn describe(activity_type: ActivityType, created_at: DateTime<Utc>) -> String {
  let local = created_at.with_timezone(&Local);
  format!("{} on {}", activity_type.label(), local.format("%B %-d"))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_running_pace_and_description() {
    let w = Workout::running(Coords::new(40.0, -3.0), 5.0, 30.0, 150.0);

    assert_eq!(w.pace(), Some(6.0));
    assert_eq!(w.speed(), None);
    assert_eq!(w.activity_type(), ActivityType::Running);

    let month = w.created_at().with_timezone(&Local).format("%B").to_string();
    assert!(w.description().starts_with("Running on "));
    assert!(w.description().contains(&month));
  }

  #[test]
  fn test_cycling_speed() {
    let w = Workout::cycling(Coords::new(40.0, -3.0), 20.0, 60.0, 400.0);
    assert_eq!(w.speed(), Some(20.0));
    assert_eq!(w.pace(), None);
    assert!(w.description().starts_with("Cycling on "));

    // 45 minutes for 30 km = 40 km/h
    let w = Workout::cycling(Coords::new(0.0, 0.0), 30.0, 45.0, 0.0);
    assert!((w.speed().unwrap() - 40.0).abs() < 1e-9);
  }

  #[test]
  fn test_description_uses_fixed_creation_date() {
    let created = Local.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap().with_timezone(&Utc);
    let kind = WorkoutKind::Running { cadence: 170.0, pace: 5.0 };
    let w = Workout::build(Coords::new(1.0, 2.0), 10.0, 50.0, kind, created);
    assert_eq!(w.description(), "Running on April 14");
  }

  #[test]
  fn test_ids_are_unique() {
    let ids: std::collections::HashSet<String> = (0..200)
      .map(|_| Workout::running(Coords::new(0.0, 0.0), 1.0, 1.0, 1.0).id().to_string())
      .collect();
    assert_eq!(ids.len(), 200);
  }

  #[test]
  fn test_click_counts_up() {
    let mut w = Workout::cycling(Coords::new(0.0, 0.0), 1.0, 1.0, 0.0);
    assert_eq!(w.clicks(), 0);
    w.click();
    w.click();
    assert_eq!(w.clicks(), 2);
  }

  #[test]
  fn test_persisted_layout() {
    let w = Workout::running(Coords::new(40.0, -3.0), 5.0, 30.0, 150.0);
    let value = serde_json::to_value(&w).unwrap();

    assert_eq!(value["type"], "running");
    assert_eq!(value["coords"], serde_json::json!([40.0, -3.0]));
    assert_eq!(value["cadence"], 150.0);
    assert_eq!(value["pace"], 6.0);
    assert_eq!(value["id"], w.id());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("elevationGain").is_none());
  }

  #[test]
  fn test_rehydrate_recomputes_stale_metric() {
    let json = r#"{
      "type": "cycling",
      "coords": [51.5, -0.1],
      "distance": 20,
      "duration": 60,
      "elevation": 400,
      "speed": 999,
      "id": "1712345678",
      "date": "2024-04-14T10:00:00.000Z",
      "description": "Cycling on April 14",
      "clicks": 3
    }"#;

    let w: Workout = serde_json::from_str(json).unwrap();
    assert_eq!(w.speed(), Some(999.0));

    let w = w.rehydrated();
    assert_eq!(w.speed(), Some(20.0));
    assert_eq!(w.description(), "Cycling on April 14");
    assert_eq!(w.clicks(), 3);
    assert_eq!(w.id(), "1712345678");
    match w.kind() {
      WorkoutKind::Cycling { elevation_gain, .. } => assert_eq!(*elevation_gain, 400.0),
      _ => panic!("Wrong variant"),
    }
  }
}
