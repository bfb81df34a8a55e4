use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Days belonging to the months before and after the one on screen
pub(crate) const OTHER_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

pub(crate) const PREVIEW_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const CHIP_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);

pub(crate) const WARNING_STYLE: Style = BASE_STYLE
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

pub(crate) mod form {
    use super::*;

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const FOCUSED_LABEL_STYLE: Style = LABEL_STYLE.add_modifier(Modifier::UNDERLINED);

    pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);
}
