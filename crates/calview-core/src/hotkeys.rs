use std::collections::HashMap;

use tracing::trace;

use crate::view::ViewMode;

/// Everything a navigation trigger can
/// ask the calendar to do.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Command {
  SetView(ViewMode),
  Next,
  Prev,
  Today
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
  enabled:  bool,
  bindings: HashMap<String, Command>
}

impl Default for KeyBindings {
  fn default() -> Self {
    Self::new(true)
  }
}

impl KeyBindings {
  pub fn new(enabled: bool) -> Self {
    let mut bindings = Self {
      enabled,
      bindings: HashMap::new()
    };
    bindings.install_defaults();
    bindings
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(
    &mut self,
    enabled: bool
  ) {
    self.enabled = enabled;
  }

  pub fn bind(
    &mut self,
    key: impl Into<String>,
    command: Command
  ) {
    self
      .bindings
      .insert(key.into(), command);
  }

  pub fn unbind(&mut self, key: &str) {
    self.bindings.remove(key);
  }

  pub fn resolve(
    &self,
    key: &str
  ) -> Option<Command> {
    if !self.enabled {
      trace!(key, "hotkeys disabled");
      return None;
    }
    self.bindings.get(key).copied()
  }

  fn install_defaults(&mut self) {
    self.bind(
      "m",
      Command::SetView(ViewMode::Month)
    );
    self.bind(
      "w",
      Command::SetView(ViewMode::Week)
    );
    self.bind(
      "y",
      Command::SetView(ViewMode::Year)
    );
    self.bind(
      "d",
      Command::SetView(ViewMode::Day)
    );
    self.bind("ArrowRight", Command::Next);
    self.bind("ArrowLeft", Command::Prev);
    self.bind("t", Command::Today);
  }
}
