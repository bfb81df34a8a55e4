use crate::calendar::MonthView;
use crate::form::EntryForm;
use crate::help::Help;
use crate::journal::{Field, Storage};
use crate::session::{Session, SessionError};
use crate::theme::{form::HINT_STYLE, BASE_STYLE, CHIP_STYLE, PREVIEW_STYLE, WARNING_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, warn};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

/// Number of lines below the calendar: the selected day's summary and a line
/// for warnings
const STATUS_LINES: u16 = 2;

static SEPARATOR: &str = "  ·  ";

static NO_SELECTION: &str = "Select a day";

static HINT: &str = "Press ? for help";

#[derive(Debug)]
pub(crate) struct App<S> {
    session: Session<S>,
    today: Date,
    state: AppState,
    // Set when the last change could not be saved; cleared by the next
    // successful save
    notice: Option<String>,
}

impl<S: Storage> App<S> {
    pub(crate) fn new(session: Session<S>, today: Date) -> App<S> {
        App {
            session,
            today,
            state: AppState::Browsing,
            notice: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize and anything else
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Browsing => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Char('n' | '>') | KeyCode::PageDown => self.shift_month(1),
                KeyCode::Char('p' | '<') | KeyCode::PageUp => self.shift_month(-1),
                KeyCode::Char('t') | KeyCode::Home => self.jump_to_today(),
                KeyCode::Char('e') | KeyCode::Enter => {
                    if self.session.selected().is_some() {
                        self.state = AppState::Editing(Field::School);
                        true
                    } else {
                        false
                    }
                }
                KeyCode::Char('x') | KeyCode::Delete => {
                    let r = self.session.clear_day();
                    self.after_save(r)
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Editing(field) => match key {
                KeyCode::Esc | KeyCode::Enter => {
                    self.state = AppState::Browsing;
                    true
                }
                KeyCode::Tab | KeyCode::Down => {
                    self.state = AppState::Editing(field.next());
                    true
                }
                KeyCode::BackTab | KeyCode::Up => {
                    self.state = AppState::Editing(field.previous());
                    true
                }
                KeyCode::Backspace => {
                    if self.session.form().get(field).is_empty() {
                        false
                    } else {
                        self.edit(field, |value| {
                            value.pop();
                        })
                    }
                }
                KeyCode::Char(c) => self.edit(field, |value| value.push(c)),
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_selection(&mut self, days: i64) -> bool {
        self.session.move_selection(days).is_ok()
    }

    fn shift_month(&mut self, delta: i32) -> bool {
        self.session.shift_month(delta).is_ok()
    }

    fn jump_to_today(&mut self) -> bool {
        self.session.jump_to(self.today).is_ok()
    }

    fn edit<F: FnOnce(&mut String)>(&mut self, field: Field, edit: F) -> bool {
        let r = self.session.edit_field(field, edit).map(|_| ());
        self.after_save(r)
    }

    // A failed save still counts as a valid keypress: the change is kept in
    // memory and the user is warned instead
    fn after_save(&mut self, r: Result<(), SessionError>) -> bool {
        match r {
            Ok(()) => {
                if self.notice.take().is_some() {
                    debug!("event=notice_clear");
                }
                true
            }
            Err(e @ SessionError::Store(_)) => {
                warn!("event=save_notice error={e}");
                self.notice = Some(format!(
                    "Warning: {e}; changes are kept until the next successful save"
                ));
                true
            }
            Err(_) => false,
        }
    }

    fn status_text(&self) -> Text<'static> {
        let summary = match self.session.selected() {
            Some(key) => {
                let mut spans = vec![Span::styled(key.long_form(), BASE_STYLE)];
                if let Some(entry) = self.session.selected_entry() {
                    if let Some(preview) = entry.preview() {
                        spans.push(Span::styled(SEPARATOR, BASE_STYLE));
                        spans.push(Span::styled(preview, PREVIEW_STYLE));
                    }
                    let chips = entry.chips();
                    if !chips.is_empty() {
                        spans.push(Span::styled(SEPARATOR, BASE_STYLE));
                        spans.push(Span::styled(chips.join(" "), CHIP_STYLE));
                    }
                }
                Line::from(spans)
            }
            None => Line::styled(NO_SELECTION, HINT_STYLE),
        };
        let second = match &self.notice {
            Some(notice) => Line::styled(notice.clone(), WARNING_STYLE),
            None => Line::styled(HINT, HINT_STYLE),
        };
        Text::from(vec![summary.centered(), second.centered()])
    }
}

impl<S: Storage> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_LINES)]).areas(area);
        MonthView::new(self.session.grid(), self.session.entries(), self.today)
            .selected(self.session.selected())
            .render(cal_area, buf);
        Paragraph::new(self.status_text()).render(status_area, buf);
        match self.state {
            AppState::Editing(field) => {
                if let Some(key) = self.session.selected() {
                    EntryForm::new(key, self.session.form(), field).render(area, buf);
                }
            }
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Browsing | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Editing(Field),
    Helping,
    Quitting,
}
