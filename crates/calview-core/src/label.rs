//! Locale-aware labels for calendar
//! headers. The actual formatting is
//! delegated to an injected
//! [`DateLabelFormatter`].

use chrono::{
  Duration,
  Locale,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Utc
};

use crate::error::CalendarError;
use crate::view::ViewMode;

const ACRONYMS: [&str; 1] = ["rrhh"];

pub trait DateLabelFormatter {
  fn format(
    &self,
    date: NaiveDateTime,
    pattern: &str,
    locale: Locale
  ) -> String;
}

impl<F> DateLabelFormatter for F
where
  F: Fn(NaiveDateTime, &str, Locale) -> String
{
  fn format(
    &self,
    date: NaiveDateTime,
    pattern: &str,
    locale: Locale
  ) -> String {
    self(date, pattern, locale)
  }
}

/// Formats with chrono's localized
/// strftime tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoFormatter;

impl DateLabelFormatter for ChronoFormatter {
  fn format(
    &self,
    date: NaiveDateTime,
    pattern: &str,
    locale: Locale
  ) -> String {
    Utc
      .from_utc_datetime(&date)
      .format_localized(pattern, locale)
      .to_string()
  }
}

pub fn parse_locale(
  raw: &str
) -> Result<Locale, CalendarError> {
  let normalized =
    raw.trim().replace('-', "_");
  Locale::try_from(normalized.as_str())
    .map_err(|_| {
      CalendarError::InvalidLocale(
        raw.to_string()
      )
    })
}

pub fn capitalize(text: &str) -> String {
  if ACRONYMS.contains(&text) {
    return text.to_uppercase();
  }

  let mut chars = text.chars();
  match chars.next() {
    | Some(first) => {
      first
        .to_uppercase()
        .chain(chars)
        .collect()
    }
    | None => String::new()
  }
}

pub fn hour_label(hour: u32) -> String {
  format!("{hour}:00hs")
}

pub struct Labels<F> {
  formatter: F,
  locale:    Locale
}

impl<F: DateLabelFormatter> Labels<F> {
  pub fn new(
    formatter: F,
    locale: Locale
  ) -> Self {
    Self { formatter, locale }
  }

  pub fn locale(&self) -> Locale {
    self.locale
  }

  pub fn format(
    &self,
    date: NaiveDateTime,
    pattern: &str
  ) -> String {
    self
      .formatter
      .format(date, pattern, self.locale)
  }

  /// Header shown next to the navigation
  /// buttons.
  pub fn current_date_label(
    &self,
    view: ViewMode,
    anchor: NaiveDateTime
  ) -> String {
    let pattern = match view {
      | ViewMode::Day => "%d %B %Y",
      | _ => "%B %Y"
    };
    self.format(anchor, pattern)
  }

  pub fn month_label(
    &self,
    anchor: NaiveDateTime
  ) -> String {
    capitalize(&self.format(anchor, "%B"))
  }

  pub fn day_column_label(
    &self,
    date: NaiveDate
  ) -> String {
    capitalize(&self.format(
      date.and_time(NaiveTime::MIN),
      "%A, %d/%m"
    ))
  }

  pub fn picker_label(
    &self,
    anchor: NaiveDateTime
  ) -> String {
    self.format(anchor, "%d/%m/%Y")
  }

  /// Two-letter uppercase weekday names,
  /// Sunday first.
  pub fn weekday_headers(
    &self
  ) -> [String; 7] {
    // 2025-02-09 is a Sunday.
    let sunday =
      NaiveDate::from_ymd_opt(2025, 2, 9)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN);
    std::array::from_fn(|offset| {
      let day = sunday
        + Duration::days(offset as i64);
      self
        .format(day, "%a")
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 12)
      .and_then(|date| {
        date.and_hms_opt(9, 30, 0)
      })
      .expect("valid datetime")
  }

  #[test]
  fn capitalizes_first_letter_and_acronyms()
  {
    assert_eq!(capitalize("febrero"), "Febrero");
    assert_eq!(capitalize("ética"), "Ética");
    assert_eq!(capitalize("rrhh"), "RRHH");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn current_date_label_depends_on_view()
  {
    let labels =
      Labels::new(ChronoFormatter, Locale::en_US);
    assert_eq!(
      labels.current_date_label(
        ViewMode::Month,
        anchor()
      ),
      "February 2025"
    );
    assert_eq!(
      labels.current_date_label(
        ViewMode::Day,
        anchor()
      ),
      "12 February 2025"
    );
  }

  #[test]
  fn weekday_headers_start_on_sunday() {
    let labels =
      Labels::new(ChronoFormatter, Locale::en_US);
    assert_eq!(
      labels.weekday_headers(),
      ["SU", "MO", "TU", "WE", "TH", "FR", "SA"]
    );
  }

  #[test]
  fn injected_formatter_receives_pattern_and_locale(
  ) {
    let labels = Labels::new(
      |date: NaiveDateTime,
       pattern: &str,
       locale: Locale| {
        format!(
          "{pattern}|{locale:?}|{}",
          date.format("%Y-%m-%d")
        )
      },
      Locale::es_AR
    );
    assert_eq!(
      labels.picker_label(anchor()),
      "%d/%m/%Y|es_AR|2025-02-12"
    );
    assert_eq!(
      labels.day_column_label(
        anchor().date()
      ),
      "%A, %d/%m|es_AR|2025-02-12"
    );
  }

  #[test]
  fn parses_locale_ids() {
    assert_eq!(
      parse_locale("es-AR"),
      Ok(Locale::es_AR)
    );
    assert_eq!(
      parse_locale("xx_YY"),
      Err(CalendarError::InvalidLocale(
        "xx_YY".to_string()
      ))
    );
  }

  #[test]
  fn hour_labels_match_time_table() {
    assert_eq!(hour_label(0), "0:00hs");
    assert_eq!(hour_label(23), "23:00hs");
  }
}
