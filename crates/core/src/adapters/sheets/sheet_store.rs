use std::sync::Arc;

use error_stack::{Report, ResultExt};
use google_sheets4::api::ValueRange;
use tracing::{info, instrument, warn};

use crate::domain::mood_entry::MoodEntry;
use crate::domain::sheets::a1_notation::A1Notation;
use crate::domain::sheets::mood_row::{encode_row, header_row, is_header_row, MoodColumn};
use crate::ports::mood_repository::{MoodEntries, MoodRepository, SheetInfo, StoreError};

use super::{
    spreadsheet_manager::SpreadsheetManagerError, spreadsheet_read::SpreadsheetRead,
    spreadsheet_write::SpreadsheetWrite, value_range_factory::ValueRangeFactory,
};

impl From<SpreadsheetManagerError> for StoreError {
    fn from(error: SpreadsheetManagerError) -> Self {
        match error {
            SpreadsheetManagerError::Unauthorized => StoreError::Auth,
            SpreadsheetManagerError::SpreadsheetNotFound => StoreError::NotFound,
            SpreadsheetManagerError::Transient => StoreError::Transient,
            SpreadsheetManagerError::Rejected => StoreError::Rejected,
        }
    }
}

fn store_error(report: Report<SpreadsheetManagerError>) -> Report<StoreError> {
    let kind = StoreError::from(*report.current_context());
    report.change_context(kind)
}

/// Mood entries kept as rows of one sheet, one entry per row, header first.
pub struct SheetStore<S> {
    spreadsheet: Arc<S>,
    sheet_name: Box<str>,
}

impl<S> SheetStore<S>
where
    S: SpreadsheetRead + SpreadsheetWrite + Send + Sync,
{
    pub fn new(spreadsheet: Arc<S>, sheet_name: impl Into<Box<str>>) -> Self {
        Self {
            spreadsheet,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn data_range(&self) -> A1Notation {
        A1Notation::columns(&self.sheet_name, 0, MoodColumn::last_index())
    }

    fn header_range(&self) -> A1Notation {
        A1Notation::row(&self.sheet_name, 1, 0, MoodColumn::last_index())
    }

    async fn write_header(&self) -> error_stack::Result<(), StoreError> {
        self.spreadsheet
            .write_range(&self.header_range(), ValueRange::from_single_row(header_row()))
            .await
            .map_err(store_error)
    }
}

#[async_trait::async_trait]
impl<S> MoodRepository for SheetStore<S>
where
    S: SpreadsheetRead + SpreadsheetWrite + Send + Sync,
{
    #[instrument(skip(self, entry), fields(sheet = %self.sheet_name))]
    async fn append(&self, entry: &MoodEntry) -> error_stack::Result<(), StoreError> {
        self.append_many(std::slice::from_ref(entry)).await
    }

    #[instrument(skip(self, entries), fields(sheet = %self.sheet_name, count = entries.len()))]
    async fn append_many(&self, entries: &[MoodEntry]) -> error_stack::Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let rows = entries.iter().map(encode_row).collect();
        self.spreadsheet
            .append_rows(&self.data_range(), ValueRange::from_rows(rows))
            .await
            .map_err(store_error)
    }

    #[instrument(skip(self), fields(sheet = %self.sheet_name))]
    async fn list_entries(&self) -> error_stack::Result<MoodEntries, StoreError> {
        let rows = self
            .spreadsheet
            .read_rows(&self.data_range())
            .await
            .map_err(store_error)?;

        Ok(MoodEntries::from_rows(rows))
    }

    #[instrument(skip(self), fields(sheet = %self.sheet_name))]
    async fn ensure_sheet(&self) -> error_stack::Result<(), StoreError> {
        let info = self.sheet_info().await?;

        if !info.sheets.iter().any(|title| title.as_str() == &*self.sheet_name) {
            info!("Creating sheet");
            self.spreadsheet
                .add_sheet(&self.sheet_name)
                .await
                .map_err(store_error)?;
            return self.write_header().await;
        }

        let rows = self
            .spreadsheet
            .read_rows(&self.data_range())
            .await
            .map_err(store_error)?;

        match rows.first() {
            None => {
                info!("Writing header to empty sheet");
                self.write_header().await
            }
            Some(first) if !is_header_row(first) => {
                warn!("First row is not the expected header, leaving the sheet untouched");
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    #[instrument(skip(self))]
    async fn sheet_info(&self) -> error_stack::Result<SheetInfo, StoreError> {
        self.spreadsheet
            .fetch_metadata()
            .await
            .map_err(store_error)
            .attach_printable_lazy(|| format!("Sheet '{}'", self.sheet_name))
    }
}
