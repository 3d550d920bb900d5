//! Date-grid, event-slotting and
//! navigation logic for a calendar
//! widget. Produces plain data; drawing
//! is left to the caller.

pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod hotkeys;
pub mod label;
pub mod slot;
pub mod state;
pub mod view;

pub use config::CalendarConfig;
pub use error::{
  CalendarError,
  RejectedEvent
};
pub use event::{
  Event,
  EventColor,
  EventSet
};
pub use grid::{
  DayCell,
  HourCell,
  ViewGrid
};
pub use hotkeys::{
  Command,
  KeyBindings
};
pub use slot::{
  AgendaDay,
  DaySlot,
  SlottedEvent
};
pub use state::{
  CalendarViewState,
  Snapshot
};
pub use view::ViewMode;
