use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

use crate::error::CalendarError;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum ViewMode {
  #[default]
  None,
  Day,
  Week,
  Month,
  Year
}

impl ViewMode {
  pub fn all() -> [Self; 5] {
    [
      Self::None,
      Self::Day,
      Self::Week,
      Self::Month,
      Self::Year
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::None => "none",
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::Month => "month",
      | Self::Year => "year"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::None => "No view",
      | Self::Day => "Day",
      | Self::Week => "Week",
      | Self::Month => "Month",
      | Self::Year => "Year"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "none" | "no_view" => {
        Some(Self::None)
      }
      | "day" => Some(Self::Day),
      | "week" => Some(Self::Week),
      | "month" => Some(Self::Month),
      | "year" | "agenda" => {
        Some(Self::Year)
      }
      | _ => None
    }
  }

  /// Whether `next`/`prev` move the
  /// anchor in this mode.
  pub fn is_navigable(self) -> bool {
    !matches!(self, Self::None)
  }
}

impl FromStr for ViewMode {
  type Err = CalendarError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::from_key(s).ok_or_else(|| {
      CalendarError::UnknownViewMode(
        s.to_string()
      )
    })
  }
}

impl TryFrom<String> for ViewMode {
  type Error = CalendarError;

  fn try_from(
    value: String
  ) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ViewMode> for String {
  fn from(view: ViewMode) -> Self {
    view.as_key().to_string()
  }
}

impl fmt::Display for ViewMode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}
