//! Placement of events inside generated
//! cells.
//!
//! Events whose end precedes their start
//! never come out of these functions;
//! `EventSet` reports them to the caller.

use std::collections::BTreeMap;

use chrono::{
  NaiveDate,
  NaiveDateTime,
  Timelike
};
use tracing::debug;

use crate::event::Event;
use crate::grid::{
  HourCell,
  view_window
};
use crate::view::ViewMode;

const MINUTES_PER_HOUR: f64 = 60.0;

/// An event positioned inside an hour
/// row. Percentages are relative to the
/// row height; `height_percent` above
/// 100 spills into the following rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SlottedEvent<'a> {
  pub event:          &'a Event,
  pub top_percent:    f64,
  pub height_percent: f64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot<'a> {
  pub date:   NaiveDate,
  pub events: Vec<&'a Event>,
  pub total:  usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaDay<'a> {
  pub date:   NaiveDate,
  pub events: Vec<&'a Event>
}

/// Events starting inside the same hour
/// as `hour`, in input order.
pub fn slot_events_for_hour(
  events: &[Event],
  hour: NaiveDateTime
) -> Vec<SlottedEvent<'_>> {
  let cell = HourCell::of(hour);
  let slotted = valid_events(events)
    .filter(|event| cell.contains(event.start))
    .map(|event| {
      SlottedEvent {
        event,
        top_percent: percent_of_hour(
          i64::from(event.start.minute())
        ),
        height_percent: percent_of_hour(
          event.duration_minutes()
        )
      }
    })
    .collect::<Vec<_>>();

  if !slotted.is_empty() {
    debug!(
      %hour,
      count = slotted.len(),
      "slotted events into hour"
    );
  }
  slotted
}

/// Events starting on the calendar day
/// of `day`, in input order.
pub fn events_for_day(
  events: &[Event],
  day: NaiveDate
) -> Vec<&Event> {
  valid_events(events)
    .filter(|event| {
      event.start_date() == day
    })
    .collect()
}

pub fn slot_events_for_day(
  events: &[Event],
  day: NaiveDate
) -> DaySlot<'_> {
  let events = events_for_day(events, day);
  DaySlot {
    date: day,
    total: events.len(),
    events
  }
}

/// Events of the view's period grouped by
/// start day, earliest first.
pub fn agenda(
  events: &[Event],
  view: ViewMode,
  anchor: NaiveDate
) -> Vec<AgendaDay<'_>> {
  let Some((start, end)) =
    view_window(view, anchor)
  else {
    return Vec::new();
  };

  let mut by_day: BTreeMap<
    NaiveDate,
    Vec<&Event>
  > = BTreeMap::new();
  for event in valid_events(events) {
    let day = event.start_date();
    if day < start || day > end {
      continue;
    }
    by_day.entry(day).or_default().push(event);
  }

  let days = by_day
    .into_iter()
    .map(|(date, mut events)| {
      events.sort_by_key(|event| {
        event.start
      });
      AgendaDay { date, events }
    })
    .collect::<Vec<_>>();

  debug!(
    %view,
    %start,
    %end,
    days = days.len(),
    "agenda collected"
  );
  days
}

fn valid_events(
  events: &[Event]
) -> impl Iterator<Item = &Event> {
  events.iter().filter(|event| {
    event.is_valid()
  })
}

fn percent_of_hour(minutes: i64) -> f64 {
  minutes as f64 * 100.0
    / MINUTES_PER_HOUR
}
