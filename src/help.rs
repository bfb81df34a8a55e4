use crate::theme::form::LABEL_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

const KEYS_WIDTH: usize = 22;

static BROWSING: &[(&str, &str)] = &[
    ("ARROWS, h j k l", "Move the selection"),
    ("n, >, PAGE DOWN", "Next month"),
    ("p, <, PAGE UP", "Previous month"),
    ("t, HOME", "Jump to today"),
    ("ENTER, e", "Edit the selected day"),
    ("x, DELETE", "Clear the selected day"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static EDITING: &[(&str, &str)] = &[
    ("TAB, DOWN", "Next field"),
    ("SHIFT-TAB, UP", "Previous field"),
    ("ESC, ENTER", "Back to the calendar"),
];

static FOOTER: &str = "Press any key to dismiss.";

/// Pop-up listing the key bindings
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text(self) -> Text<'static> {
        let mut lines = Vec::new();
        for (heading, bindings) in [("Calendar", BROWSING), ("Edit form", EDITING)] {
            lines.push(Line::styled(heading, LABEL_STYLE));
            lines.extend(bindings.iter().map(|&(keys, what)| {
                Line::from_iter([Span::raw(format!("  {keys:<KEYS_WIDTH$}")), Span::raw(what)])
            }));
            lines.push(Line::raw(""));
        }
        lines.push(Line::raw(FOOTER));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // Leave a column of padding on either side of the border
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
