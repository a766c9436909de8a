//! Error modal + overlay state machine
//!
//! Hidden -> Shown on a rejected submission, Shown -> Hidden on the close
//! button, an overlay click, or Escape. Every transition is guarded, so a
//! repeated trigger is a no-op and callers only touch the UI when the
//! returned flag is true.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
  #[default]
  Hidden,
  Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissTrigger {
  CloseButton,
  Overlay,
  EscapeKey,
}

#[derive(Debug, Default)]
pub struct ErrorModal {
  state: ModalState,
}

impl ErrorModal {
  pub fn state(&self) -> ModalState {
    self.state
  }

  pub fn is_shown(&self) -> bool {
    self.state == ModalState::Shown
  }

  /// Returns true if the modal went from hidden to shown.
  pub fn show(&mut self) -> bool {
    if self.is_shown() {
      return false;
    }
    self.state = ModalState::Shown;
    true
  }

  /// Returns true if the modal went from shown to hidden.
  pub fn dismiss(&mut self, trigger: DismissTrigger) -> bool {
    if !self.is_shown() {
      return false;
    }
    tracing::debug!(?trigger, "Error modal dismissed");
    self.state = ModalState::Hidden;
    true
  }

  /// Keyboard handler; only Escape closes the modal.
  pub fn handle_key(&mut self, key: &str) -> bool {
    if key == "Escape" {
      self.dismiss(DismissTrigger::EscapeKey)
    } else {
      false
    }
  }
}
