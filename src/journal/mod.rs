mod entry;
mod storage;
mod store;
pub(crate) use self::entry::{Field, JournalEntry, RawFields};
pub(crate) use self::storage::{FileStorage, Storage};
#[cfg(test)]
pub(crate) use self::storage::MemoryStorage;
pub(crate) use self::store::{EntryStore, EntryTable, StoreError};
