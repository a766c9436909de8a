//! Markup for the workout list and the marker popup
//!
//! The webview inserts these verbatim, so every interpolated value goes
//! through [`escape_html`].

use serde::Serialize;

use crate::models::{Coords, Workout, WorkoutKind};

const POPUP_MAX_WIDTH: u32 = 250;
const POPUP_MIN_WIDTH: u32 = 100;

/// ---------------------------------------------------------------------------
/// Marker Popup
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
  pub workout_id: String,
  pub coords: Coords,
  pub content: String,
  pub class_name: String,
  pub max_width: u32,
  pub min_width: u32,
  pub auto_close: bool,
  pub close_on_click: bool,
}

impl MarkerSpec {
  /// Popups stay open so every logged workout remains labelled on the map.
  pub fn for_workout(workout: &Workout) -> Self {
    let activity_type = workout.activity_type();
    Self {
      workout_id: workout.id().to_string(),
      coords: workout.coords(),
      content: format!("{} {}", activity_type.emoji(), escape_html(workout.description())),
      class_name: format!("{}-popup", activity_type.as_str()),
      max_width: POPUP_MAX_WIDTH,
      min_width: POPUP_MIN_WIDTH,
      auto_close: false,
      close_on_click: false,
    }
  }
}

/// ---------------------------------------------------------------------------
/// List Row
/// ---------------------------------------------------------------------------

pub fn render_workout_row(workout: &Workout) -> String {
  let activity_type = workout.activity_type();
  let mut html = String::with_capacity(1024);

  html.push_str(&format!(
    r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>
"#,
    kind = activity_type.as_str(),
    id = escape_html(workout.id()),
    title = escape_html(workout.description()),
  ));

  html.push_str(&detail(activity_type.emoji(), &workout.distance().to_string(), "km"));
  html.push_str(&detail("⏱", &workout.duration().to_string(), "min"));

  match workout.kind() {
    WorkoutKind::Running { cadence, pace } => {
      html.push_str(&detail("⚡️", &format!("{:.1}", pace), "min/km"));
      html.push_str(&detail("🦶", &cadence.to_string(), "spm"));
    }
    WorkoutKind::Cycling { elevation_gain, speed } => {
      // Halves round up, as the page's number formatting does
      html.push_str(&detail("⚡️", &speed.round().to_string(), "km/h"));
      html.push_str(&detail("⛰", &elevation_gain.to_string(), "m"));
    }
  }

  html.push_str("</li>");
  html
}

fn detail(icon: &str, value: &str, unit: &str) -> String {
  format!(
    r#"  <div class="workout__details">
    <span class="workout__icon">{}</span>
    <span class="workout__value">{}</span>
    <span class="workout__unit">{}</span>
  </div>
"#,
    icon,
    escape_html(value),
    unit
  )
}

pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}
