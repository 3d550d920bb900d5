//! Calendar cell generation for the day,
//! week, month and year views.
//!
//! Every function here is total: a step
//! that would leave chrono's date range
//! returns the input date unchanged. Near
//! `NaiveDate::MIN`/`MAX` that makes one
//! direction of `next`/`prev` a no-op, so
//! the two no longer undo each other there.

use chrono::{
  Datelike,
  Days,
  Months,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  Timelike,
  Weekday
};
use tracing::trace;

use crate::view::ViewMode;

pub const MONTH_GRID_CELLS: usize = 42;
pub const MONTH_GRID_COLUMNS: usize = 7;
pub const WEEK_DAY_COLUMNS: usize = 5;
pub const HOURS_PER_DAY: usize = 24;

/// One day of a month grid.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DayCell {
  pub date:             NaiveDate,
  pub in_current_month: bool
}

/// One hour bucket of a day or week
/// column.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct HourCell {
  pub date: NaiveDate,
  pub hour: u32
}

impl HourCell {
  /// The bucket an instant falls in.
  pub fn of(instant: NaiveDateTime) -> Self {
    Self {
      date: instant.date(),
      hour: instant.hour()
    }
  }

  pub fn start(&self) -> NaiveDateTime {
    self.date.and_time(
      NaiveTime::from_hms_opt(
        self.hour, 0, 0
      )
      .unwrap_or(NaiveTime::MIN)
    )
  }

  pub fn contains(
    &self,
    instant: NaiveDateTime
  ) -> bool {
    instant.date() == self.date
      && instant.hour() == self.hour
  }
}

pub type MonthGrid =
  [DayCell; MONTH_GRID_CELLS];
pub type DayHours =
  [HourCell; HOURS_PER_DAY];
pub type WeekColumns =
  [DayHours; WEEK_DAY_COLUMNS];

/// The cells a renderer needs for the
/// active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewGrid {
  None,
  Day(DayHours),
  Week(WeekColumns),
  Month(MonthGrid),
  Year(Box<[MonthGrid; 12]>)
}

pub fn grid_for_view(
  view: ViewMode,
  anchor: NaiveDate
) -> ViewGrid {
  match view {
    | ViewMode::None => ViewGrid::None,
    | ViewMode::Day => {
      ViewGrid::Day(day_hours(anchor))
    }
    | ViewMode::Week => {
      ViewGrid::Week(week_columns(
        anchor
      ))
    }
    | ViewMode::Month => {
      ViewGrid::Month(month_cells(
        anchor
      ))
    }
    | ViewMode::Year => {
      ViewGrid::Year(Box::new(
        year_month_grids(anchor)
      ))
    }
  }
}

/// 42 consecutive days starting on the
/// Sunday on or before the first of the
/// anchor's month.
pub fn month_cells(
  anchor: NaiveDate
) -> MonthGrid {
  let grid_start = start_of_week(
    month_start(anchor),
    Weekday::Sun
  );
  trace!(
    %anchor,
    %grid_start,
    "generating month cells"
  );

  std::array::from_fn(|offset| {
    let date = add_days(
      grid_start,
      offset as i64
    );
    DayCell {
      date,
      in_current_month: date.year()
        == anchor.year()
        && date.month() == anchor.month()
    }
  })
}

/// Monday through Friday of the anchor's
/// Sunday-started week, 24 hours each.
pub fn week_columns(
  anchor: NaiveDate
) -> WeekColumns {
  let sunday =
    start_of_week(anchor, Weekday::Sun);
  trace!(%anchor, %sunday, "generating week columns");

  std::array::from_fn(|column| {
    day_hours(add_days(
      sunday,
      column as i64 + 1
    ))
  })
}

pub fn day_hours(
  anchor: NaiveDate
) -> DayHours {
  std::array::from_fn(|hour| {
    HourCell {
      date: anchor,
      hour: hour as u32
    }
  })
}

pub fn year_month_grids(
  anchor: NaiveDate
) -> [MonthGrid; 12] {
  let january = anchor
    .with_ordinal(1)
    .unwrap_or(anchor);
  std::array::from_fn(|index| {
    month_cells(
      january
        .checked_add_months(Months::new(
          index as u32
        ))
        .unwrap_or(january)
    )
  })
}

/// First and last calendar day covered
/// by a view, inclusive.
pub fn view_window(
  view: ViewMode,
  anchor: NaiveDate
) -> Option<(NaiveDate, NaiveDate)> {
  match view {
    | ViewMode::None => None,
    | ViewMode::Day => {
      Some((anchor, anchor))
    }
    | ViewMode::Week => {
      let sunday = start_of_week(
        anchor,
        Weekday::Sun
      );
      Some((
        add_days(sunday, 1),
        add_days(
          sunday,
          WEEK_DAY_COLUMNS as i64
        )
      ))
    }
    | ViewMode::Month => {
      Some((
        month_start(anchor),
        month_end(anchor)
      ))
    }
    | ViewMode::Year => {
      let january = anchor
        .with_ordinal(1)
        .unwrap_or(anchor);
      let december = anchor
        .with_month(12)
        .unwrap_or(anchor);
      Some((january, month_end(december)))
    }
  }
}

/// Moves the anchor by `step` units of
/// the view. Month and year steps land
/// on `preferred_day` clamped to the
/// target month's length.
pub fn shift_anchor(
  anchor: NaiveDateTime,
  view: ViewMode,
  step: i32,
  preferred_day: u32
) -> NaiveDateTime {
  let date = anchor.date();
  let shifted = match view {
    | ViewMode::None => date,
    | ViewMode::Day => {
      add_days(date, i64::from(step))
    }
    | ViewMode::Week => {
      add_days(
        date,
        i64::from(step) * 7
      )
    }
    | ViewMode::Month => {
      shift_months(
        date,
        step,
        preferred_day
      )
    }
    | ViewMode::Year => {
      shift_months(
        date,
        step.saturating_mul(12),
        preferred_day
      )
    }
  };
  shifted.and_time(anchor.time())
}

pub fn shift_months(
  date: NaiveDate,
  months: i32,
  preferred_day: u32
) -> NaiveDate {
  let first = month_start(date);
  let step = Months::new(months.unsigned_abs());
  let target = if months >= 0 {
    first.checked_add_months(step)
  } else {
    first.checked_sub_months(step)
  };
  let Some(target) = target else {
    return date;
  };

  let day = preferred_day
    .clamp(1, month_end(target).day());
  target.with_day(day).unwrap_or(target)
}

pub fn month_start(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

pub fn month_end(
  date: NaiveDate
) -> NaiveDate {
  month_start(date)
    .checked_add_months(Months::new(1))
    .and_then(|next| next.pred_opt())
    .unwrap_or(date)
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  let step = Days::new(days.unsigned_abs());
  let shifted = if days >= 0 {
    date.checked_add_days(step)
  } else {
    date.checked_sub_days(step)
  };
  shifted.unwrap_or(date)
}

pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let back = day
    .weekday()
    .days_since(week_start);
  add_days(day, -i64::from(back))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  #[test]
  fn month_grid_starts_on_preceding_sunday(
  ) {
    let cells =
      month_cells(date(2025, 2, 12));
    assert_eq!(cells[0].date, date(2025, 1, 26));
    assert!(!cells[0].in_current_month);
    assert_eq!(cells[6].date, date(2025, 2, 1));
    assert!(cells[6].in_current_month);
    assert_eq!(
      cells[41].date,
      date(2025, 3, 8)
    );
  }

  #[test]
  fn month_starting_on_sunday_begins_grid_on_the_first(
  ) {
    let cells =
      month_cells(date(2026, 2, 20));
    assert_eq!(cells[0].date, date(2026, 2, 1));
    assert_eq!(
      cells
        .iter()
        .filter(|cell| cell.in_current_month)
        .count(),
      28
    );
  }

  #[test]
  fn month_grid_holds_for_every_anchor() {
    let mut anchor = date(2023, 11, 1);
    while anchor < date(2026, 3, 1) {
      let cells = month_cells(anchor);
      assert_eq!(cells.len(), MONTH_GRID_CELLS);
      assert_eq!(
        cells[0].date.weekday(),
        Weekday::Sun
      );
      for pair in cells.windows(2) {
        assert_eq!(
          add_days(pair[0].date, 1),
          pair[1].date
        );
      }
      let own = cells
        .iter()
        .find(|cell| cell.date == anchor)
        .expect("anchor inside grid");
      assert!(own.in_current_month);
      anchor = add_days(anchor, 1);
    }
  }

  #[test]
  fn week_columns_are_monday_to_friday() {
    for anchor in [
      date(2025, 2, 9),
      date(2025, 2, 12),
      date(2025, 2, 15)
    ] {
      let columns = week_columns(anchor);
      let days = columns
        .iter()
        .map(|hours| hours[0].date)
        .collect::<Vec<_>>();
      assert_eq!(
        days,
        (10..=14)
          .map(|day| date(2025, 2, day))
          .collect::<Vec<_>>()
      );
      assert!(columns.iter().all(|hours| {
        hours
          .iter()
          .enumerate()
          .all(|(idx, cell)| {
            cell.hour == idx as u32
              && cell.date == hours[0].date
          })
      }));
    }
  }

  #[test]
  fn day_hours_cover_the_whole_day() {
    let hours =
      day_hours(date(2025, 2, 12));
    assert_eq!(hours.len(), HOURS_PER_DAY);
    assert_eq!(
      hours[9].start(),
      date(2025, 2, 12)
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
    );
    assert_eq!(hours[23].hour, 23);
  }

  #[test]
  fn hour_cell_contains_only_its_hour() {
    let cell = HourCell {
      date: date(2025, 2, 12),
      hour: 9
    };
    let inside = date(2025, 2, 12)
      .and_hms_opt(9, 59, 59)
      .expect("valid time");
    let next_hour = date(2025, 2, 12)
      .and_hms_opt(10, 0, 0)
      .expect("valid time");
    let next_day = date(2025, 2, 13)
      .and_hms_opt(9, 30, 0)
      .expect("valid time");
    assert!(cell.contains(inside));
    assert!(!cell.contains(next_hour));
    assert!(!cell.contains(next_day));
  }

  #[test]
  fn month_shift_clamps_then_restores_preferred_day(
  ) {
    let jan31 = date(2025, 1, 31);
    let feb = shift_months(jan31, 1, 31);
    assert_eq!(feb, date(2025, 2, 28));
    assert_eq!(
      shift_months(feb, -1, 31),
      jan31
    );
    assert_eq!(
      shift_months(date(2025, 1, 15), -1, 15),
      date(2024, 12, 15)
    );
  }

  #[test]
  fn steps_past_the_date_range_stay_put() {
    assert_eq!(
      add_days(NaiveDate::MAX, 1),
      NaiveDate::MAX
    );
    assert_eq!(
      shift_months(NaiveDate::MAX, 1, 31),
      NaiveDate::MAX
    );
    assert_eq!(
      shift_months(NaiveDate::MIN, -1, 1),
      NaiveDate::MIN
    );
    assert_eq!(
      month_end(date(2024, 2, 10)),
      date(2024, 2, 29)
    );
    assert_eq!(
      start_of_week(date(2025, 2, 9), Weekday::Sun),
      date(2025, 2, 9)
    );
  }

  #[test]
  fn hour_cell_of_instant_matches_grid_cell() {
    let instant = date(2025, 2, 12)
      .and_hms_opt(9, 30, 0)
      .expect("valid time");
    assert_eq!(
      HourCell::of(instant),
      day_hours(date(2025, 2, 12))[9]
    );
  }

  #[test]
  fn year_shift_handles_leap_day() {
    let leap = date(2024, 2, 29)
      .and_hms_opt(8, 15, 0)
      .expect("valid time");
    let next = shift_anchor(
      leap,
      ViewMode::Year,
      1,
      29
    );
    assert_eq!(
      next,
      date(2025, 2, 28)
        .and_hms_opt(8, 15, 0)
        .expect("valid time")
    );
    assert_eq!(
      shift_anchor(next, ViewMode::Year, -1, 29),
      leap
    );
  }

  #[test]
  fn view_windows_match_grids() {
    let anchor = date(2025, 2, 12);
    assert_eq!(
      view_window(ViewMode::Week, anchor),
      Some((date(2025, 2, 10), date(2025, 2, 14)))
    );
    assert_eq!(
      view_window(ViewMode::Month, anchor),
      Some((date(2025, 2, 1), date(2025, 2, 28)))
    );
    assert_eq!(
      view_window(ViewMode::Year, anchor),
      Some((date(2025, 1, 1), date(2025, 12, 31)))
    );
    assert_eq!(
      view_window(ViewMode::None, anchor),
      None
    );
  }

  #[test]
  fn year_grid_has_one_month_per_slot() {
    let ViewGrid::Year(months) =
      grid_for_view(
        ViewMode::Year,
        date(2025, 6, 1)
      )
    else {
      panic!("expected year grid");
    };
    for (index, month) in
      months.iter().enumerate()
    {
      let first = month
        .iter()
        .find(|cell| cell.in_current_month)
        .expect("month has days");
      assert_eq!(
        first.date,
        date(2025, index as u32 + 1, 1)
      );
    }
  }
}
