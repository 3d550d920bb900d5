use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{
  Locale,
  NaiveDateTime,
  Utc
};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

use crate::hotkeys::KeyBindings;
use crate::label::parse_locale;
use crate::view::ViewMode;

const DEFAULT_LOCALE: &str = "es_AR";

fn config_true() -> bool {
  true
}

fn config_default_version() -> u32 {
  1
}

fn config_default_locale() -> String {
  DEFAULT_LOCALE.to_string()
}

fn config_default_view() -> ViewMode {
  ViewMode::None
}

fn config_default_visible_events()
-> usize {
  2
}

fn config_default_hour_end() -> u32 {
  23
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct CalendarConfig {
  #[serde(
    default = "config_default_version"
  )]
  pub version:        u32,
  #[serde(
    default = "config_default_locale"
  )]
  pub locale:         String,
  #[serde(default)]
  pub timezone:       Option<String>,
  #[serde(
    default = "config_default_view"
  )]
  pub default_view:   ViewMode,
  #[serde(default = "config_true")]
  pub enable_hotkeys: bool,
  #[serde(default)]
  pub month:          MonthViewConfig,
  #[serde(default)]
  pub day_view:       DayViewConfig
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct MonthViewConfig {
  #[serde(
    default = "config_default_visible_events"
  )]
  pub visible_events: usize
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct DayViewConfig {
  #[serde(default)]
  pub hour_start: u32,
  #[serde(
    default = "config_default_hour_end"
  )]
  pub hour_end:   u32
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      version:        config_default_version(),
      locale:         config_default_locale(),
      timezone:       None,
      default_view:   config_default_view(),
      enable_hotkeys: true,
      month:          MonthViewConfig::default(),
      day_view:       DayViewConfig::default()
    }
  }
}

impl Default for MonthViewConfig {
  fn default() -> Self {
    Self {
      visible_events:
        config_default_visible_events()
    }
  }
}

impl Default for DayViewConfig {
  fn default() -> Self {
    Self {
      hour_start: 0,
      hour_end:   config_default_hour_end()
    }
  }
}

impl CalendarConfig {
  /// Parses and sanitizes a TOML
  /// document. Unknown view modes and
  /// locales are errors.
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(raw)
        .context(
          "failed parsing calendar \
           config"
        )?;
    config.sanitize();
    parse_locale(&config.locale)?;

    info!(
      version = config.version,
      locale = %config.locale,
      view = %config.default_view,
      timezone = ?config.timezone,
      "loaded calendar config"
    );
    Ok(config)
  }

  #[tracing::instrument]
  pub fn load(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml_str(&raw)
      .with_context(|| {
        format!(
          "invalid config {}",
          path.display()
        )
      })
  }

  pub fn locale(&self) -> Locale {
    parse_locale(&self.locale)
      .unwrap_or(Locale::es_AR)
  }

  pub fn key_bindings(
    &self
  ) -> KeyBindings {
    KeyBindings::new(
      self.enable_hotkeys
    )
  }

  /// Configured timezone, falling back
  /// to UTC when unset or invalid.
  pub fn timezone(&self) -> Tz {
    self
      .timezone
      .as_deref()
      .and_then(parse_timezone)
      .unwrap_or(chrono_tz::UTC)
  }

  /// Wall-clock "now" in the configured
  /// timezone.
  pub fn now(&self) -> NaiveDateTime {
    Utc::now()
      .with_timezone(&self.timezone())
      .naive_local()
  }

  fn sanitize(&mut self) {
    if self.locale.trim().is_empty() {
      self.locale =
        config_default_locale();
    }

    if self.month.visible_events == 0 {
      warn!(
        "month.visible_events must be \
         positive; using default"
      );
      self.month.visible_events =
        config_default_visible_events();
    }

    if self.day_view.hour_start > 23 {
      self.day_view.hour_start = 23;
    }
    if self.day_view.hour_end > 23 {
      self.day_view.hour_end = 23;
    }
    if self.day_view.hour_end
      < self.day_view.hour_start
    {
      self.day_view.hour_end =
        self.day_view.hour_start;
    }
  }
}

fn parse_timezone(raw: &str) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(err) => {
      error!(
        timezone = %trimmed,
        error = %err,
        "invalid timezone id"
      );
      None
    }
  }
}
