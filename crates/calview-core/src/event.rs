use std::collections::HashSet;

use chrono::{
  NaiveDate,
  NaiveDateTime
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  warn
};

use crate::error::{
  CalendarError,
  RejectedEvent
};

const EVENT_TIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M"
];

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
  #[default]
  Default,
  Blue,
  Green,
  Pink,
  Purple
}

impl EventColor {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Default => "default",
      | Self::Blue => "blue",
      | Self::Green => "green",
      | Self::Pink => "pink",
      | Self::Purple => "purple"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Event {
  pub id:    String,
  pub title: String,

  #[serde(with = "event_time_serde")]
  pub start: NaiveDateTime,

  #[serde(with = "event_time_serde")]
  pub end:   NaiveDateTime,

  #[serde(default)]
  pub color: EventColor
}

impl Event {
  pub fn new(
    id: impl Into<String>,
    title: impl Into<String>,
    start: NaiveDateTime,
    end: NaiveDateTime
  ) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      start,
      end,
      color: EventColor::Default
    }
  }

  #[must_use]
  pub fn with_color(
    mut self,
    color: EventColor
  ) -> Self {
    self.color = color;
    self
  }

  pub fn is_valid(&self) -> bool {
    self.end >= self.start
  }

  pub fn validate(
    &self
  ) -> Result<(), CalendarError> {
    if self.is_valid() {
      return Ok(());
    }
    Err(CalendarError::InvalidEvent {
      id:    self.id.clone(),
      start: self.start,
      end:   self.end
    })
  }

  /// Whole minutes between start and
  /// end, truncated toward zero.
  pub fn duration_minutes(&self) -> i64 {
    (self.end - self.start).num_minutes()
  }

  pub fn start_date(&self) -> NaiveDate {
    self.start.date()
  }
}

/// Events accepted into a calendar,
/// plus the ones that were turned away.
#[derive(Debug, Clone, Default)]
pub struct EventSet {
  accepted: Vec<Event>,
  rejected: Vec<RejectedEvent>
}

impl EventSet {
  #[tracing::instrument(skip_all)]
  pub fn from_events<I>(
    events: I
  ) -> Self
  where
    I: IntoIterator<Item = Event>
  {
    let mut seen = HashSet::new();
    let mut set = Self::default();

    for event in events {
      if let Err(reason) =
        event.validate()
      {
        warn!(
          id = %event.id,
          start = %event.start,
          end = %event.end,
          "rejecting event that ends before it starts"
        );
        set.rejected.push(
          RejectedEvent {
            id: event.id,
            reason
          }
        );
        continue;
      }

      if !seen.insert(event.id.clone())
      {
        warn!(id = %event.id, "rejecting event with duplicate id");
        set.rejected.push(
          RejectedEvent {
            reason:
              CalendarError::DuplicateEventId(
                event.id.clone()
              ),
            id: event.id
          }
        );
        continue;
      }

      set.accepted.push(event);
    }

    debug!(
      accepted = set.accepted.len(),
      rejected = set.rejected.len(),
      "event set built"
    );
    set
  }

  pub fn events(&self) -> &[Event] {
    &self.accepted
  }

  pub fn rejected(
    &self
  ) -> &[RejectedEvent] {
    &self.rejected
  }

  pub fn rejected_ids(
    &self
  ) -> Vec<&str> {
    self
      .rejected
      .iter()
      .map(|entry| entry.id.as_str())
      .collect()
  }

  pub fn find(
    &self,
    id: &str
  ) -> Option<&Event> {
    self
      .accepted
      .iter()
      .find(|event| event.id == id)
  }

  pub fn len(&self) -> usize {
    self.accepted.len()
  }

  pub fn is_empty(&self) -> bool {
    self.accepted.is_empty()
  }
}

/// Parses `YYYY-MM-DDTHH:MM[:SS]`
/// (a space may stand in for `T`) or
/// a bare `YYYY-MM-DD`, which means
/// midnight.
pub fn parse_event_time(
  raw: &str
) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  for format in EVENT_TIME_FORMATS {
    if let Ok(parsed) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return Some(parsed);
    }
  }

  NaiveDate::parse_from_str(
    trimmed, "%Y-%m-%d"
  )
  .ok()
  .and_then(|date| {
    date.and_hms_opt(0, 0, 0)
  })
}

pub mod event_time_serde {
  use chrono::NaiveDateTime;
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  pub fn serialize<S>(
    dt: &NaiveDateTime,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.serialize_str(
      &dt
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
    )
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<NaiveDateTime, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw = String::deserialize(
      deserializer
    )?;
    super::parse_event_time(&raw)
      .ok_or_else(|| {
        serde::de::Error::custom(
          format!(
            "invalid event time: {raw}"
          )
        )
      })
  }
}
