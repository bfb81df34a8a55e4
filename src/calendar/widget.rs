use super::{DateKey, MonthGrid};
use crate::journal::EntryTable;
use crate::theme::{
    BASE_STYLE, CHIP_STYLE, OTHER_MONTH_STYLE, PREVIEW_STYLE, SELECTED_STYLE, TITLE_STYLE,
    WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::Date;

static WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of columns per day of week, including the one-column gap before
/// the next day
const DAY_WIDTH: u16 = 11;

/// Number of columns a day's text may occupy
const CELL_WIDTH: u16 = DAY_WIDTH - 1;

/// Width of the calendar in columns
pub(crate) const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by the title, the weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar: the day number, a
/// preview of its entry, and the entry's numbers
const WEEK_LINES: u16 = 3;

const ACS_HLINE: char = '─';

/// Number of lines needed to draw a month with `weeks` weeks
#[cfg(test)]
fn height_for_weeks(weeks: usize) -> u16 {
    u16::try_from(weeks)
        .unwrap_or(u16::MAX)
        .saturating_mul(WEEK_LINES)
        .saturating_add(HEADER_LINES)
}

/// A month laid out as a grid of days, each decorated with the day's entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MonthView<'a> {
    grid: &'a MonthGrid,
    entries: &'a EntryTable,
    selected: Option<DateKey>,
    today: Date,
}

impl<'a> MonthView<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, entries: &'a EntryTable, today: Date) -> Self {
        MonthView {
            grid,
            entries,
            selected: None,
            today,
        }
    }

    pub(crate) fn selected(mut self, selected: Option<DateKey>) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for MonthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(&format!("{} {}", self.grid.month(), self.grid.year()));
        canvas.draw_header();
        for (week_no, week) in std::iter::zip(0u16.., self.grid.weeks()) {
            for (col, day) in std::iter::zip(0u16.., week) {
                let number = if day.date() == self.today {
                    format!("[{:2}]", day.day())
                } else {
                    format!(" {:2} ", day.day())
                };
                let base = if day.in_current_month {
                    BASE_STYLE
                } else {
                    OTHER_MONTH_STYLE
                };
                let number_style = if self.selected == Some(day.key) {
                    SELECTED_STYLE
                } else {
                    base
                };
                canvas.draw_cell_line(week_no, col, 0, &number, number_style);
                let Some(entry) = self.entries.get(&day.key) else {
                    continue;
                };
                if let Some(preview) = entry.preview() {
                    let style = if day.in_current_month {
                        PREVIEW_STYLE
                    } else {
                        base
                    };
                    canvas.draw_cell_line(week_no, col, 1, &preview, style);
                }
                let chips = entry.chips();
                if !chips.is_empty() {
                    let style = if day.in_current_month { CHIP_STYLE } else { base };
                    canvas.draw_cell_line(week_no, col, 2, &chips.join(" "), style);
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, x, title, MAIN_WIDTH, TITLE_STYLE);
    }

    fn draw_header(&mut self) {
        for (col, name) in std::iter::zip(0u16.., WEEKDAYS) {
            self.mvprint(1, col * DAY_WIDTH + 1, name, CELL_WIDTH, WEEKDAY_STYLE);
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    // `line` is the line within the week's row: 0 for the day number, 1 for
    // the preview, 2 for the chips
    fn draw_cell_line(&mut self, week_no: u16, col: u16, line: u16, s: &str, style: Style) {
        self.mvprint(
            HEADER_LINES + week_no * WEEK_LINES + line,
            col * DAY_WIDTH + 1,
            s,
            CELL_WIDTH,
            style,
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, max_width: u16, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width())
                .unwrap_or(u16::MAX)
                .min(max_width);
            // Using a Paragraph lets us truncate text that extends beyond its
            // cell or the calendar's area, though we need to be sure that the
            // Rect passed to the Paragraph is entirely within the frame lest
            // a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(
            y,
            x,
            String::from(ch).repeat(length.into()),
            length,
            BASE_STYLE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::JournalEntry;
    use time::{macros::date, Month};

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn entries() -> EntryTable {
        let mut entries = EntryTable::new();
        entries.insert(
            DateKey::from(date!(2015 - 02 - 03)),
            JournalEntry {
                screen_time: Some(2.5),
                pickups: Some(12),
                ..JournalEntry::default()
            },
        );
        entries.insert(
            DateKey::from(date!(2015 - 02 - 10)),
            JournalEntry {
                school: "valentine cards".to_owned(),
                pickups: Some(0),
                ..JournalEntry::default()
            },
        );
        entries
    }

    #[test]
    fn test_render_month() {
        let grid = MonthGrid::build(2015, Month::February).unwrap();
        let entries = entries();
        let view = MonthView::new(&grid, &entries, date!(2015 - 02 - 14))
            .selected(Some(DateKey::from(date!(2015 - 02 - 10))));
        let area = Rect::new(0, 0, MAIN_WIDTH, height_for_weeks(4));
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        let lines = (0..area.height).map(|y| row(&buffer, y)).collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "                                February 2015                                ",
                " Sun        Mon        Tue        Wed        Thu        Fri        Sat       ",
                "─────────────────────────────────────────────────────────────────────────────",
                "   1          2          3          4          5          6          7       ",
                "                                                                             ",
                "                       2.5h 12 pi                                            ",
                "   8          9         10         11         12         13        [14]      ",
                "                       valentine                                             ",
                "                                                                             ",
                "  15         16         17         18         19         20         21       ",
                "                                                                             ",
                "                                                                             ",
                "  22         23         24         25         26         27         28       ",
                "                                                                             ",
                "                                                                             ",
            ]
        );
        // The selected day
        assert!(buffer[(24, 6)].modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(13, 6)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(23, 7)].fg, PREVIEW_STYLE.fg.unwrap());
        assert_eq!(buffer[(23, 5)].fg, CHIP_STYLE.fg.unwrap());
    }

    #[test]
    fn test_other_months_dimmed() {
        let grid = MonthGrid::build(2025, Month::January).unwrap();
        let entries = EntryTable::new();
        let view = MonthView::new(&grid, &entries, date!(2025 - 01 - 22));
        let area = Rect::new(0, 0, 100, height_for_weeks(5));
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        // The calendar is centered, starting at column 11
        assert_eq!(
            row(&buffer, 3),
            format!(
                "{:11}{}{:12}",
                "",
                "  29         30         31          1          2          3          4       ",
                ""
            )
        );
        assert_eq!(buffer[(13, 3)].fg, Color::DarkGray);
        assert_eq!(buffer[(47, 3)].fg, Color::White);
        assert_eq!(
            row(&buffer, 15).trim(),
            "26         27         28         29         30         31          1"
        );
        assert_eq!(buffer[(80, 15)].fg, Color::DarkGray);
        assert!(row(&buffer, 12).contains("[22]"));
    }

    #[test]
    fn test_height() {
        assert_eq!(height_for_weeks(4), 15);
        assert_eq!(height_for_weeks(6), 21);
    }
}
