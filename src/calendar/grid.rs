use super::{DateKey, DayDescriptor};
use std::iter::successors;
use thiserror::Error;
use time::{
    util::is_leap_year,
    Date,
    Month::{self, *},
};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// The cells of a month as displayed: complete Sunday-to-Saturday weeks,
/// padded with days from the adjacent months
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    first: Date,
    // Invariant: length is a nonzero multiple of DAYS_IN_WEEK
    days: Vec<DayDescriptor>,
}

impl MonthGrid {
    pub(crate) fn build(year: i32, month: Month) -> Result<MonthGrid, OutOfTimeError> {
        let first = Date::from_calendar_date(year, month, 1).map_err(|_| OutOfTimeError)?;
        let leading = usize::from(first.weekday().number_days_from_sunday());
        let total = (leading + usize::from(days_in_month(year, month))).div_ceil(DAYS_IN_WEEK)
            * DAYS_IN_WEEK;
        let mut before = iter_days_before(first).take(leading).collect::<Vec<_>>();
        if before.len() < leading {
            return Err(OutOfTimeError);
        }
        before.reverse();
        let days = before
            .into_iter()
            .chain(successors(Some(first), |d| d.next_day()))
            .take(total)
            .map(|date| DayDescriptor::new(date, date.year() == year && date.month() == month))
            .collect::<Vec<_>>();
        if days.len() < total {
            return Err(OutOfTimeError);
        }
        Ok(MonthGrid { first, days })
    }

    pub(crate) fn year(&self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first.month()
    }

    pub(crate) fn first_day(&self) -> DateKey {
        DateKey::from(self.first)
    }

    #[cfg(test)]
    pub(crate) fn days(&self) -> &[DayDescriptor] {
        &self.days
    }

    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[DayDescriptor]> + '_ {
        self.days.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn get(&self, key: DateKey) -> Option<&DayDescriptor> {
        self.days.iter().find(|d| d.key == key)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

pub(crate) fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        February if is_leap_year(year) => 29,
        February => 28,
        April | June | September | November => 30,
        January | March | May | July | August | October | December => 31,
    }
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const MONTHS: [Month; 12] = [
        January, February, March, April, May, June, July, August, September, October,
        November, December,
    ];

    fn in_month_days(grid: &MonthGrid) -> Vec<u8> {
        grid.days()
            .iter()
            .filter(|d| d.in_current_month)
            .map(DayDescriptor::day)
            .collect()
    }

    #[test]
    fn test_across_year_start() {
        let grid = MonthGrid::build(2025, January).unwrap();
        assert_eq!(grid.days().len(), 35);
        let first = grid.days().first().unwrap();
        assert_eq!(first.date(), date!(2024 - 12 - 29));
        assert!(!first.in_current_month);
        let weeks = grid.weeks().collect::<Vec<_>>();
        assert_eq!(weeks.len(), 5);
        let opening = weeks[0]
            .iter()
            .map(|d| (d.date(), d.in_current_month))
            .collect::<Vec<_>>();
        assert_eq!(
            opening,
            [
                (date!(2024 - 12 - 29), false),
                (date!(2024 - 12 - 30), false),
                (date!(2024 - 12 - 31), false),
                (date!(2025 - 01 - 01), true),
                (date!(2025 - 01 - 02), true),
                (date!(2025 - 01 - 03), true),
                (date!(2025 - 01 - 04), true),
            ]
        );
        let last = grid.days().last().unwrap();
        assert_eq!(last.date(), date!(2025 - 02 - 01));
        assert!(!last.in_current_month);
    }

    #[test]
    fn test_across_year_end() {
        let grid = MonthGrid::build(2023, December).unwrap();
        // December 1, 2023 is a Friday
        assert_eq!(grid.days()[0].date(), date!(2023 - 11 - 26));
        assert_eq!(grid.days()[5].date(), date!(2023 - 12 - 01));
        assert_eq!(grid.days().len(), 42);
        assert_eq!(grid.days()[41].date(), date!(2024 - 01 - 06));
        assert!(!grid.days()[41].in_current_month);
    }

    #[test]
    fn test_no_padding() {
        // February 2015 starts on a Sunday and fills exactly four weeks
        let grid = MonthGrid::build(2015, February).unwrap();
        assert_eq!(grid.days().len(), 28);
        assert!(grid.days().iter().all(|d| d.in_current_month));
        assert_eq!(grid.first_day().date(), date!(2015 - 02 - 01));
    }

    #[test]
    fn test_leap_years() {
        let days = |year, month| in_month_days(&MonthGrid::build(year, month).unwrap()).len();
        assert_eq!(days(2024, February), 29);
        assert_eq!(days(2023, February), 28);
        assert_eq!(days(2000, February), 29);
        assert_eq!(days(1900, February), 28);
        assert_eq!(days(2023, April), 30);
        assert_eq!(days(2023, August), 31);
    }

    #[test]
    fn test_whole_weeks() {
        for year in [1899, 1900, 1999, 2000, 2023, 2024, 2025, 2100] {
            for month in MONTHS {
                let grid = MonthGrid::build(year, month).unwrap();
                let len = grid.days().len();
                let n = days_in_month(year, month);
                assert_eq!(len % DAYS_IN_WEEK, 0, "{year}-{month}: {len} cells");
                assert!(len >= usize::from(n), "{year}-{month}: {len} cells");
                assert!(len < usize::from(n) + 2 * DAYS_IN_WEEK, "{year}-{month}");
                assert_eq!(
                    in_month_days(&grid),
                    (1..=n).collect::<Vec<_>>(),
                    "{year}-{month}"
                );
                assert!(grid
                    .days()
                    .iter()
                    .filter(|d| !d.in_current_month)
                    .all(|d| d.date().month() != month));
                assert!(grid
                    .days()
                    .windows(2)
                    .all(|w| w[0].date().next_day() == Some(w[1].date())));
                assert_eq!(
                    grid.days()[0].date().weekday(),
                    time::Weekday::Sunday,
                    "{year}-{month}"
                );
            }
        }
    }

    #[test]
    fn test_get() {
        let grid = MonthGrid::build(2025, January).unwrap();
        let inside = grid.get(DateKey::from(date!(2025 - 01 - 22))).unwrap();
        assert!(inside.in_current_month);
        let padding = grid.get(DateKey::from(date!(2024 - 12 - 30))).unwrap();
        assert!(!padding.in_current_month);
        assert_eq!(grid.get(DateKey::from(date!(2025 - 02 - 14))), None);
    }

    #[test]
    fn test_end_of_time() {
        // December 31, 9999 is a Friday, so the grid would need January 1 of
        // the year 10000
        assert_eq!(
            MonthGrid::build(9999, December),
            Err(OutOfTimeError)
        );
        assert_eq!(
            MonthGrid::build(10000, January),
            Err(OutOfTimeError)
        );
        assert!(MonthGrid::build(9999, November).is_ok());
    }
}
