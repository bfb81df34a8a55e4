use super::entry::{JournalEntry, RawFields};
use super::storage::{Storage, StorageError};
use crate::calendar::DateKey;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the storage slot holding the serialized entry table
pub(crate) const SLOT_NAME: &str = "lockedInCalendarData_v1";

pub(crate) type EntryTable = BTreeMap<DateKey, JournalEntry>;

/// The table of all journal entries, written back to storage in full after
/// every change
#[derive(Debug)]
pub(crate) struct EntryStore<S> {
    storage: S,
    entries: EntryTable,
}

impl<S: Storage> EntryStore<S> {
    /// Read the entry table from storage.  A missing, unreadable, or corrupt
    /// table is logged and replaced with an empty one.
    pub(crate) fn load(storage: S) -> EntryStore<S> {
        let entries = match storage.read(SLOT_NAME) {
            Ok(Some(text)) => match parse_table(&text) {
                Ok(entries) => {
                    info!(
                        "event=entries_load status=ok slot={SLOT_NAME} count={}",
                        entries.len()
                    );
                    entries
                }
                Err(e) => {
                    warn!("event=entries_load status=corrupt slot={SLOT_NAME} error={e}");
                    EntryTable::new()
                }
            },
            Ok(None) => {
                info!("event=entries_load status=absent slot={SLOT_NAME}");
                EntryTable::new()
            }
            Err(e) => {
                warn!(
                    "event=entries_load status=error slot={SLOT_NAME} path={} error={}",
                    e.path().display(),
                    error_chain(&e)
                );
                EntryTable::new()
            }
        };
        EntryStore { storage, entries }
    }

    pub(crate) fn get(&self, key: DateKey) -> Option<&JournalEntry> {
        self.entries.get(&key)
    }

    /// Normalize `fields` and store the result under `key`, or remove `key`
    /// if the result is empty, then save the table.
    ///
    /// The in-memory table is updated even if saving fails.
    pub(crate) fn put(
        &mut self,
        key: DateKey,
        fields: &RawFields,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let entry = JournalEntry::from_fields(fields);
        if let Some(e) = &entry {
            self.entries.insert(key, e.clone());
        } else {
            self.entries.remove(&key);
        }
        self.persist()?;
        Ok(entry)
    }

    pub(crate) fn clear(&mut self, key: DateKey) -> Result<(), StoreError> {
        self.entries.remove(&key);
        self.persist()
    }

    pub(crate) fn entries(&self) -> &EntryTable {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        match self.save() {
            Ok(()) => {
                debug!(
                    "event=entries_save status=ok slot={SLOT_NAME} count={}",
                    self.entries.len()
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    "event=entries_save status=error slot={SLOT_NAME} error={}",
                    error_chain(&e)
                );
                Err(e)
            }
        }
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let text = serialize_table(&self.entries)?;
        self.storage.write(SLOT_NAME, &text)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to serialize journal entries")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to save journal entries")]
    Save(#[from] StorageError),
}

pub(crate) fn parse_table(text: &str) -> Result<EntryTable, serde_json::Error> {
    serde_json::from_str(text)
}

pub(crate) fn serialize_table(entries: &EntryTable) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        s.push_str(": ");
        s.push_str(&cause.to_string());
        source = cause.source();
    }
    s
}
