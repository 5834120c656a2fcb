use serde::Serialize;
use thiserror::Error;

use crate::domain::mood_entry::MoodEntry;
use crate::domain::sheets::mood_row::{decode_row, is_header_row};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Credentials missing, invalid or expired. Needs an operator.
    #[error("Spreadsheet credentials are missing or were rejected")]
    Auth,
    /// The configured spreadsheet ID does not resolve. Needs an operator.
    #[error("Configured spreadsheet could not be found")]
    NotFound,
    #[error("Spreadsheet is temporarily unavailable")]
    Transient,
    #[error("Spreadsheet rejected the request")]
    Rejected,
}

impl StoreError {
    /// Only transient failures are worth retrying, with backoff, by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    pub spreadsheet_id: String,
    pub title: String,
    pub sheets: Vec<String>,
}

/// Rows read from the store, decoded into entries on iteration.
///
/// The sequence is finite and restartable: every call to [`MoodEntries::iter`]
/// walks the same rows from the start. Header and undecodable rows are skipped.
#[derive(Debug, Clone, Default)]
pub struct MoodEntries {
    rows: Vec<Vec<String>>,
}

impl MoodEntries {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> MoodEntriesIter<'_> {
        MoodEntriesIter {
            rows: self.rows.iter().enumerate(),
        }
    }
}

impl<'a> IntoIterator for &'a MoodEntries {
    type Item = MoodEntry;
    type IntoIter = MoodEntriesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct MoodEntriesIter<'a> {
    rows: std::iter::Enumerate<std::slice::Iter<'a, Vec<String>>>,
}

impl Iterator for MoodEntriesIter<'_> {
    type Item = MoodEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, cells) in self.rows.by_ref() {
            if cells.iter().all(|cell| cell.trim().is_empty()) || is_header_row(cells) {
                continue;
            }
            match decode_row(cells) {
                Ok(entry) => return Some(entry),
                Err(error) => {
                    tracing::warn!(row = index + 1, %error, "Skipping undecodable mood row");
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.rows.size_hint().1)
    }
}

/// Append-only persistence for mood entries. No update or delete.
#[async_trait::async_trait]
pub trait MoodRepository: Send + Sync {
    /// Writes one entry as one row.
    async fn append(&self, entry: &MoodEntry) -> error_stack::Result<(), StoreError>;

    /// Writes several entries in a single request. An empty slice does nothing.
    async fn append_many(&self, entries: &[MoodEntry]) -> error_stack::Result<(), StoreError>;

    /// Reads every stored entry in sheet order.
    async fn list_entries(&self) -> error_stack::Result<MoodEntries, StoreError>;

    /// Creates the backing sheet and its header row when missing.
    async fn ensure_sheet(&self) -> error_stack::Result<(), StoreError>;

    async fn sheet_info(&self) -> error_stack::Result<SheetInfo, StoreError>;
}
