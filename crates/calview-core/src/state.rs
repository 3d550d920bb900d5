use std::fmt;

use chrono::{
  Datelike,
  NaiveDate,
  NaiveDateTime
};
use tracing::debug;

use crate::error::{
  CalendarError,
  RejectedEvent
};
use crate::event::{
  Event,
  EventSet
};
use crate::grid::{
  ViewGrid,
  grid_for_view,
  shift_anchor
};
use crate::hotkeys::Command;
use crate::slot::{
  AgendaDay,
  DaySlot,
  SlottedEvent,
  agenda,
  slot_events_for_day,
  slot_events_for_hour
};
use crate::view::ViewMode;

pub type ChangeViewHook =
  Box<dyn FnMut(ViewMode)>;
pub type EventClickHook =
  Box<dyn FnMut(&Event)>;

/// What every transition hands back.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Snapshot {
  pub view:   ViewMode,
  pub anchor: NaiveDateTime
}

/// View mode, anchor date and events of
/// one calendar widget.
///
/// `today` is captured once at
/// construction; `jump_to_today` always
/// returns to that instant.
pub struct CalendarViewState {
  view:           ViewMode,
  anchor:         NaiveDateTime,
  today:          NaiveDateTime,
  preferred_day:  Option<u32>,
  events:         EventSet,
  on_change_view: Option<ChangeViewHook>,
  on_event_click: Option<EventClickHook>
}

impl fmt::Debug for CalendarViewState {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("CalendarViewState")
      .field("view", &self.view)
      .field("anchor", &self.anchor)
      .field("today", &self.today)
      .field("events", &self.events.len())
      .field(
        "rejected",
        &self.events.rejected().len()
      )
      .finish_non_exhaustive()
  }
}

impl CalendarViewState {
  /// Starts with no view, anchored at
  /// `today`.
  pub fn new(
    today: NaiveDateTime,
    events: Vec<Event>
  ) -> Self {
    Self {
      view: ViewMode::None,
      anchor: today,
      today,
      preferred_day: None,
      events: EventSet::from_events(
        events
      ),
      on_change_view: None,
      on_event_click: None
    }
  }

  #[must_use]
  pub fn with_view(
    mut self,
    view: ViewMode
  ) -> Self {
    self.view = view;
    self
  }

  #[must_use]
  pub fn with_anchor(
    mut self,
    anchor: NaiveDateTime
  ) -> Self {
    self.anchor = anchor;
    self
  }

  #[must_use]
  pub fn on_change_view<F>(
    mut self,
    hook: F
  ) -> Self
  where
    F: FnMut(ViewMode) + 'static
  {
    self.on_change_view =
      Some(Box::new(hook));
    self
  }

  #[must_use]
  pub fn on_event_click<F>(
    mut self,
    hook: F
  ) -> Self
  where
    F: FnMut(&Event) + 'static
  {
    self.on_event_click =
      Some(Box::new(hook));
    self
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      view:   self.view,
      anchor: self.anchor
    }
  }

  pub fn view(&self) -> ViewMode {
    self.view
  }

  pub fn anchor(&self) -> NaiveDateTime {
    self.anchor
  }

  pub fn today(&self) -> NaiveDateTime {
    self.today
  }

  pub fn events(&self) -> &EventSet {
    &self.events
  }

  pub fn rejected(
    &self
  ) -> &[RejectedEvent] {
    self.events.rejected()
  }

  #[tracing::instrument(skip(self), fields(from = %self.view))]
  pub fn set_view(
    &mut self,
    view: ViewMode
  ) -> Snapshot {
    if self.view != view {
      debug!(to = %view, "view changed");
    }
    self.view = view;
    if let Some(hook) =
      self.on_change_view.as_mut()
    {
      hook(view);
    }
    self.snapshot()
  }

  pub fn set_view_key(
    &mut self,
    key: &str
  ) -> Result<Snapshot, CalendarError> {
    let view = key.parse::<ViewMode>()?;
    Ok(self.set_view(view))
  }

  pub fn next(&mut self) -> Snapshot {
    self.step(1)
  }

  pub fn prev(&mut self) -> Snapshot {
    self.step(-1)
  }

  #[tracing::instrument(skip(self))]
  pub fn jump_to_today(
    &mut self
  ) -> Snapshot {
    self.set_date(self.today)
  }

  pub fn set_date(
    &mut self,
    date: NaiveDateTime
  ) -> Snapshot {
    debug!(from = %self.anchor, to = %date, "anchor set");
    self.anchor = date;
    self.preferred_day = None;
    self.snapshot()
  }

  /// Replaces the event collection and
  /// returns the events that were turned
  /// away.
  pub fn set_events(
    &mut self,
    events: Vec<Event>
  ) -> &[RejectedEvent] {
    self.events =
      EventSet::from_events(events);
    self.events.rejected()
  }

  pub fn apply(
    &mut self,
    command: Command
  ) -> Snapshot {
    match command {
      | Command::SetView(view) => {
        self.set_view(view)
      }
      | Command::Next => self.next(),
      | Command::Prev => self.prev(),
      | Command::Today => {
        self.jump_to_today()
      }
    }
  }

  pub fn click_event(
    &mut self,
    id: &str
  ) -> Option<&Event> {
    let event = self.events.find(id)?;
    if let Some(hook) =
      self.on_event_click.as_mut()
    {
      hook(event);
    }
    Some(event)
  }

  pub fn grid(&self) -> ViewGrid {
    grid_for_view(
      self.view,
      self.anchor.date()
    )
  }

  pub fn hour_slots(
    &self,
    hour: NaiveDateTime
  ) -> Vec<SlottedEvent<'_>> {
    slot_events_for_hour(
      self.events.events(),
      hour
    )
  }

  pub fn day_slot(
    &self,
    day: NaiveDate
  ) -> DaySlot<'_> {
    slot_events_for_day(
      self.events.events(),
      day
    )
  }

  pub fn agenda(
    &self
  ) -> Vec<AgendaDay<'_>> {
    agenda(
      self.events.events(),
      self.view,
      self.anchor.date()
    )
  }

  #[tracing::instrument(skip(self), fields(view = %self.view))]
  fn step(
    &mut self,
    direction: i32
  ) -> Snapshot {
    if !self.view.is_navigable() {
      debug!("no view selected; navigation ignored");
      return self.snapshot();
    }

    let preferred = match self.view {
      | ViewMode::Month
      | ViewMode::Year => {
        *self
          .preferred_day
          .get_or_insert(self.anchor.day())
      }
      | _ => {
        self.preferred_day = None;
        self.anchor.day()
      }
    };

    let shifted = shift_anchor(
      self.anchor,
      self.view,
      direction,
      preferred
    );
    debug!(from = %self.anchor, to = %shifted, "anchor stepped");
    self.anchor = shifted;
    self.snapshot()
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;

  fn at(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .and_then(|date| {
      date.and_hms_opt(10, 45, 0)
    })
    .expect("valid datetime")
  }

  #[test]
  fn navigation_without_view_is_a_no_op() {
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    );
    let before = state.snapshot();
    assert_eq!(state.next(), before);
    assert_eq!(state.prev(), before);
  }

  #[test]
  fn steps_follow_the_active_view() {
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    )
    .with_view(ViewMode::Day);

    assert_eq!(state.next().anchor, at(2025, 2, 13));
    state.set_view(ViewMode::Week);
    assert_eq!(state.next().anchor, at(2025, 2, 20));
    state.set_view(ViewMode::Month);
    assert_eq!(state.next().anchor, at(2025, 3, 20));
    state.set_view(ViewMode::Year);
    assert_eq!(state.prev().anchor, at(2024, 3, 20));
  }

  #[test]
  fn month_round_trip_restores_end_of_month()
  {
    let mut state = CalendarViewState::new(
      at(2025, 1, 31),
      vec![]
    )
    .with_view(ViewMode::Month);

    assert_eq!(state.next().anchor, at(2025, 2, 28));
    assert_eq!(state.prev().anchor, at(2025, 1, 31));
  }

  #[test]
  fn day_step_forgets_preferred_day() {
    let mut state = CalendarViewState::new(
      at(2025, 1, 31),
      vec![]
    )
    .with_view(ViewMode::Month);

    state.next();
    state.set_view(ViewMode::Day);
    assert_eq!(state.next().anchor, at(2025, 3, 1));
    state.set_view(ViewMode::Month);
    assert_eq!(state.prev().anchor, at(2025, 2, 1));
  }

  #[test]
  fn set_date_forgets_preferred_day() {
    let mut state = CalendarViewState::new(
      at(2025, 1, 31),
      vec![]
    )
    .with_view(ViewMode::Month);

    assert_eq!(state.next().anchor, at(2025, 2, 28));
    assert_eq!(
      state.set_date(at(2025, 4, 15)).anchor,
      at(2025, 4, 15)
    );
    assert_eq!(state.next().anchor, at(2025, 5, 15));
  }

  #[test]
  fn jump_to_today_forgets_preferred_day() {
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    )
    .with_view(ViewMode::Month)
    .with_anchor(at(2025, 1, 31));

    assert_eq!(state.next().anchor, at(2025, 2, 28));
    assert_eq!(
      state.jump_to_today().anchor,
      at(2025, 2, 12)
    );
    assert_eq!(state.next().anchor, at(2025, 3, 12));
  }

  #[test]
  fn set_view_notifies_every_call() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    )
    .on_change_view(move |view| {
      sink.borrow_mut().push(view);
    });

    let first = state.set_view(ViewMode::Week);
    let second = state.set_view(ViewMode::Week);
    assert_eq!(first, second);
    assert_eq!(
      *seen.borrow(),
      vec![ViewMode::Week, ViewMode::Week]
    );
  }

  #[test]
  fn unknown_view_key_leaves_state_untouched(
  ) {
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    )
    .with_view(ViewMode::Day);

    assert!(matches!(
      state.set_view_key("fortnight"),
      Err(CalendarError::UnknownViewMode(_))
    ));
    assert_eq!(state.view(), ViewMode::Day);
    assert_eq!(
      state
        .set_view_key("month")
        .map(|snap| snap.view),
      Ok(ViewMode::Month)
    );
  }

  #[test]
  fn click_fires_hook_for_known_events() {
    let clicked = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&clicked);
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![Event::new(
        "2",
        "event B",
        at(2025, 2, 14),
        at(2025, 2, 14)
      )]
    )
    .on_event_click(move |event| {
      *sink.borrow_mut() =
        Some(event.id.clone());
    });

    assert!(state.click_event("missing").is_none());
    assert_eq!(*clicked.borrow(), None);
    assert!(state.click_event("2").is_some());
    assert_eq!(
      clicked.borrow().as_deref(),
      Some("2")
    );
  }

  #[test]
  fn set_events_reports_rejections() {
    let mut state = CalendarViewState::new(
      at(2025, 2, 12),
      vec![]
    );
    let rejected = state.set_events(vec![
      Event::new(
        "bad",
        "backwards",
        at(2025, 2, 12),
        at(2025, 2, 11)
      ),
    ]);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].id, "bad");
    assert!(state.events().is_empty());
  }
}
