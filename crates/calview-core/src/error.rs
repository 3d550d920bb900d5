use chrono::NaiveDateTime;

#[derive(
  thiserror::Error,
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub enum CalendarError {
  #[error(
    "event {id} ends at {end} before \
     it starts at {start}"
  )]
  InvalidEvent {
    id:    String,
    start: NaiveDateTime,
    end:   NaiveDateTime
  },
  #[error("duplicate event id: {0}")]
  DuplicateEventId(String),
  #[error("unknown view mode: {0}")]
  UnknownViewMode(String),
  #[error("unknown locale: {0}")]
  InvalidLocale(String)
}

/// An event that was kept out of the
/// calendar, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEvent {
  pub id:     String,
  pub reason: CalendarError
}
