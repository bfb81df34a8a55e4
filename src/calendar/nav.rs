use super::{DateKey, MonthGrid, OutOfTimeError};
use time::Month;

const MONTHS_IN_YEAR: i64 = 12;

/// Which month is on screen and which of its days, if any, is selected
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Navigation {
    year: i32,
    month: Month,
    selected: Option<DateKey>,
}

impl Navigation {
    pub(crate) fn new(year: i32, month: Month) -> Navigation {
        Navigation {
            year,
            month,
            selected: None,
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    /// Move `delta` months forwards (or backwards, if negative), wrapping
    /// into the adjacent year as needed, and return the grid for the new
    /// month.  The selection is always cleared.  If the new month cannot be
    /// displayed, the navigation is left as it was.
    pub(crate) fn shift_month(&mut self, delta: i32) -> Result<MonthGrid, OutOfTimeError> {
        let (year, month) = offset_month(self.year, self.month, delta).ok_or(OutOfTimeError)?;
        self.go_to(year, month)
    }

    pub(crate) fn go_to(&mut self, year: i32, month: Month) -> Result<MonthGrid, OutOfTimeError> {
        let grid = MonthGrid::build(year, month)?;
        self.year = year;
        self.month = month;
        self.selected = None;
        Ok(grid)
    }

    // Callers are responsible for only selecting days in the current month
    pub(crate) fn select(&mut self, key: DateKey) {
        self.selected = Some(key);
    }
}

fn offset_month(year: i32, month: Month, delta: i32) -> Option<(i32, Month)> {
    let index = i64::from(year) * MONTHS_IN_YEAR + i64::from(u8::from(month)) - 1 + i64::from(delta);
    let year = i32::try_from(index.div_euclid(MONTHS_IN_YEAR)).ok()?;
    let month = u8::try_from(index.rem_euclid(MONTHS_IN_YEAR) + 1).ok()?;
    Month::try_from(month).ok().map(|month| (year, month))
}
