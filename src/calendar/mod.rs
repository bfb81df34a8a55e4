mod grid;
mod nav;
mod widget;
pub(crate) use self::grid::{MonthGrid, OutOfTimeError};
pub(crate) use self::nav::Navigation;
pub(crate) use self::widget::MonthView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Canonical `YYYY-MM-DD` identity of a calendar day, used as the key of the
/// entry table and for matching grid cells to entries
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct DateKey(Date);

impl DateKey {
    pub(crate) fn date(self) -> Date {
        self.0
    }

    /// Render the date the way the detail line shows it, e.g. "February 10,
    /// 2024"
    pub(crate) fn long_form(self) -> String {
        format!("{} {}, {}", self.0.month(), self.0.day(), self.0.year())
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(YMD_FMT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<DateKey, ParseDateKeyError> {
        Date::parse(s, YMD_FMT)
            .map(DateKey)
            .map_err(|source| ParseDateKeyError {
                value: s.to_owned(),
                source,
            })
    }
}

impl TryFrom<String> for DateKey {
    type Error = ParseDateKeyError;

    fn try_from(s: String) -> Result<DateKey, ParseDateKeyError> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> String {
        key.to_string()
    }
}

#[derive(Debug, Error)]
#[error("invalid date key {value:?}")]
pub(crate) struct ParseDateKeyError {
    value: String,
    source: time::error::Parse,
}

/// One cell of a month grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayDescriptor {
    pub(crate) key: DateKey,
    pub(crate) in_current_month: bool,
}

impl DayDescriptor {
    pub(super) fn new(date: Date, in_current_month: bool) -> DayDescriptor {
        DayDescriptor {
            key: DateKey(date),
            in_current_month,
        }
    }

    pub(crate) fn date(&self) -> Date {
        self.key.0
    }

    pub(crate) fn day(&self) -> u8 {
        self.key.0.day()
    }
}
