use crate::calendar::{DateKey, MonthGrid, Navigation, OutOfTimeError};
use crate::journal::{EntryStore, EntryTable, Field, JournalEntry, RawFields, Storage, StoreError};
use log::debug;
use thiserror::Error;
use time::{Date, Duration, Month};

/// Everything the user is looking at and editing: the month on screen, the
/// selected day, the edit form for that day, and the entry store behind them
#[derive(Debug)]
pub(crate) struct Session<S> {
    nav: Navigation,
    grid: MonthGrid,
    store: EntryStore<S>,
    // Blank whenever nothing is selected
    form: RawFields,
}

impl<S: Storage> Session<S> {
    pub(crate) fn new(store: EntryStore<S>, year: i32, month: Month) -> Result<Self, OutOfTimeError> {
        let grid = MonthGrid::build(year, month)?;
        Ok(Session {
            nav: Navigation::new(year, month),
            grid,
            store,
            form: RawFields::default(),
        })
    }

    /// Open on the month containing `date`, with `date` selected
    pub(crate) fn open_at(store: EntryStore<S>, date: Date) -> Result<Self, OutOfTimeError> {
        let mut session = Session::new(store, date.year(), date.month())?;
        session.select_unchecked(DateKey::from(date));
        Ok(session)
    }

    pub(crate) fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub(crate) fn entries(&self) -> &EntryTable {
        self.store.entries()
    }

    pub(crate) fn selected(&self) -> Option<DateKey> {
        self.nav.selected()
    }

    pub(crate) fn selected_entry(&self) -> Option<&JournalEntry> {
        self.selected().and_then(|key| self.store.get(key))
    }

    pub(crate) fn form(&self) -> &RawFields {
        &self.form
    }

    pub(crate) fn shift_month(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        self.grid = self.nav.shift_month(delta)?;
        self.form = RawFields::default();
        debug!(
            "event=month_shift year={} month={}",
            self.nav.year(),
            self.nav.month()
        );
        Ok(())
    }

    /// Show the month containing `date` and select `date`
    pub(crate) fn jump_to(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        self.grid = self.nav.go_to(date.year(), date.month())?;
        self.select_unchecked(DateKey::from(date));
        Ok(())
    }

    /// Select a day of the month on screen and load its entry into the form.
    /// Days from the neighboring months cannot be selected.
    pub(crate) fn select(&mut self, key: DateKey) -> Result<(), SessionError> {
        match self.grid.get(key) {
            Some(day) if day.in_current_month => {
                self.select_unchecked(key);
                Ok(())
            }
            _ => Err(SessionError::OutsideMonth(key)),
        }
    }

    /// Select the day `days` days after (or before, if negative) the current
    /// selection.  With nothing selected, the first of the month is selected
    /// instead.
    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), SessionError> {
        let Some(current) = self.selected() else {
            self.select_unchecked(self.grid.first_day());
            return Ok(());
        };
        let target = current
            .date()
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.select(DateKey::from(target))
    }

    /// Apply `edit` to one field of the form, then store the entry the whole
    /// form now describes
    pub(crate) fn edit_field<F>(
        &mut self,
        field: Field,
        edit: F,
    ) -> Result<Option<JournalEntry>, SessionError>
    where
        F: FnOnce(&mut String),
    {
        let key = self.selected().ok_or(SessionError::NoSelection)?;
        edit(self.form.get_mut(field));
        Ok(self.store.put(key, &self.form)?)
    }

    pub(crate) fn clear_day(&mut self) -> Result<(), SessionError> {
        let key = self.selected().ok_or(SessionError::NoSelection)?;
        self.form = RawFields::default();
        self.store.clear(key)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> EntryStore<S> {
        self.store
    }

    fn select_unchecked(&mut self, key: DateKey) {
        self.nav.select(key);
        self.form = self.store.get(key).map(RawFields::from).unwrap_or_default();
        debug!("event=day_select key={key}");
    }
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("no day is selected")]
    NoSelection,
    #[error("{0} is not in the month being shown")]
    OutsideMonth(DateKey),
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
