//! Local history of asked questions and their answers

mod entry;
mod store;

pub use entry::HistoryEntry;
pub use store::{DeleteReport, HistoryError, HistoryStore, MAX_ENTRIES, MAX_TEXT_LENGTH};
