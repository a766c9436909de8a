//! Seams between the controller and the webview
//!
//! The controller never touches the map widget or the DOM directly. It
//! issues commands through [`MapSurface`] and [`Presenter`]; the webview
//! implementation turns each command into a Tauri event that the frontend
//! script applies to Leaflet and the page.

use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime, Wry};

use crate::models::{ActivityType, Coords};
use crate::render::MarkerSpec;

/// ---------------------------------------------------------------------------
/// Command Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
  pub url_template: String,
  pub attribution: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanOptions {
  pub animate: bool,
  pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewPayload {
  center: Coords,
  zoom: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PanPayload {
  center: Coords,
  zoom: u8,
  #[serde(flatten)]
  options: PanOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormPayload {
  visible: bool,
  reset: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricFieldPayload {
  activity_type: ActivityType,
}

#[derive(Debug, Clone, Serialize)]
struct RowPayload {
  html: String,
}

#[derive(Debug, Clone, Serialize)]
struct ModalPayload {
  visible: bool,
}

#[derive(Debug, Clone, Serialize)]
struct AlertPayload {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Collaborator Traits
/// ---------------------------------------------------------------------------

/// The interactive map widget. Clicks come back through the
/// `map_clicked` command once a view exists.
pub trait MapSurface {
  fn create_view(&self, center: Coords, zoom: u8);
  fn add_tile_layer(&self, layer: &TileLayer);
  fn add_marker(&self, marker: &MarkerSpec);
  fn pan_to(&self, center: Coords, zoom: u8, options: &PanOptions);
}

/// Form, list, and modal elements of the page.
pub trait Presenter {
  fn show_form(&self);
  /// Hide the form and clear its inputs.
  fn hide_form(&self);
  fn show_metric_field(&self, activity_type: ActivityType);
  fn append_row(&self, html: &str);
  fn set_error_modal(&self, visible: bool);
  fn alert(&self, message: &str);
  fn reload(&self);
}

/// ---------------------------------------------------------------------------
/// Webview Implementation
/// ---------------------------------------------------------------------------

pub mod events {
  pub const MAP_VIEW: &str = "map://view";
  pub const MAP_TILES: &str = "map://tiles";
  pub const MAP_MARKER: &str = "map://marker";
  pub const MAP_PAN: &str = "map://pan";
  pub const UI_FORM: &str = "ui://form";
  pub const UI_METRIC_FIELD: &str = "ui://metric-field";
  pub const UI_ROW: &str = "ui://row";
  pub const UI_MODAL: &str = "ui://modal";
  pub const UI_ALERT: &str = "ui://alert";
  pub const UI_RELOAD: &str = "ui://reload";
}

pub struct WebviewSurface<R: Runtime = Wry> {
  app: AppHandle<R>,
}

impl<R: Runtime> WebviewSurface<R> {
  pub fn new(app: AppHandle<R>) -> Self {
    Self { app }
  }

  fn send<P: Serialize + Clone>(&self, event: &str, payload: P) {
    // A closed window just drops the event
    if let Err(e) = self.app.emit(event, payload) {
      tracing::warn!(event, error = %e, "Failed to emit surface event");
    }
  }
}

impl<R: Runtime> MapSurface for WebviewSurface<R> {
  fn create_view(&self, center: Coords, zoom: u8) {
    self.send(events::MAP_VIEW, ViewPayload { center, zoom });
  }

  fn add_tile_layer(&self, layer: &TileLayer) {
    self.send(events::MAP_TILES, layer.clone());
  }

  fn add_marker(&self, marker: &MarkerSpec) {
    self.send(events::MAP_MARKER, marker.clone());
  }

  fn pan_to(&self, center: Coords, zoom: u8, options: &PanOptions) {
    self.send(
      events::MAP_PAN,
      PanPayload {
        center,
        zoom,
        options: *options,
      },
    );
  }
}

impl<R: Runtime> Presenter for WebviewSurface<R> {
  fn show_form(&self) {
    self.send(events::UI_FORM, FormPayload { visible: true, reset: false });
  }

  fn hide_form(&self) {
    self.send(events::UI_FORM, FormPayload { visible: false, reset: true });
  }

  fn show_metric_field(&self, activity_type: ActivityType) {
    self.send(events::UI_METRIC_FIELD, MetricFieldPayload { activity_type });
  }

  fn append_row(&self, html: &str) {
    self.send(events::UI_ROW, RowPayload { html: html.to_string() });
  }

  fn set_error_modal(&self, visible: bool) {
    self.send(events::UI_MODAL, ModalPayload { visible });
  }

  fn alert(&self, message: &str) {
    self.send(events::UI_ALERT, AlertPayload { message: message.to_string() });
  }

  fn reload(&self) {
    self.send(events::UI_RELOAD, ());
  }
}
