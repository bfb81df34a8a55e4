use crate::calendar::DateKey;
use crate::journal::{Field, RawFields};
use crate::theme::{
    form::{FOCUSED_LABEL_STYLE, HINT_STYLE, LABEL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
};

const OUTER_WIDTH: u16 = 54;
const OUTER_HEIGHT: u16 = 12;

/// Columns given to each field's label, including the space after it
const LABEL_WIDTH: usize = 16;

const CURSOR: char = '_';

static HINT: &str = "TAB next field · ESC done";

/// Pop-up for editing the entry of the selected day
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EntryForm<'a> {
    key: DateKey,
    fields: &'a RawFields,
    focus: Field,
}

impl<'a> EntryForm<'a> {
    pub(crate) fn new(key: DateKey, fields: &'a RawFields, focus: Field) -> Self {
        EntryForm { key, fields, focus }
    }

    fn to_text(self, width: u16) -> Text<'static> {
        let value_width = usize::from(width).saturating_sub(LABEL_WIDTH);
        let mut lines = vec![Line::styled("", BASE_STYLE)];
        for field in Field::ALL {
            let mut value = self.fields.get(field).to_owned();
            let label_style = if field == self.focus {
                value.push(CURSOR);
                FOCUSED_LABEL_STYLE
            } else {
                LABEL_STYLE
            };
            lines.push(Line::from_iter([
                Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
                Span::styled(tail(&value, value_width), BASE_STYLE),
            ]));
        }
        lines.push(Line::styled("", BASE_STYLE));
        lines.push(Line::styled(HINT, HINT_STYLE));
        Text::from(lines)
    }
}

impl Widget for EntryForm<'_> {
    /*
     * ......................................................
     * .┌─────────────── February 10, 2024 ────────────────┐.
     * .│                                                  │.
     * .│School          lab report_                       │.
     * .│Career                                            │.
     * .│Personal                                          │.
     * .│Screen time (h) 2.5                               │.
     * .│Pickups         12                                │.
     * .│                                                  │.
     * .│TAB next field · ESC done                         │.
     * .└──────────────────────────────────────────────────┘.
     * ......................................................
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(format!(" {} ", self.key.long_form()))
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        self.to_text(text_area.width).render(text_area, buf);
    }
}

// The last `width` characters of `s`, so that the end of a long value (where
// the cursor is) stays visible
fn tail(s: &str, width: usize) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(width)).collect()
}
