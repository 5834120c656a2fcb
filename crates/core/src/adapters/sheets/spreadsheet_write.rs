use error_stack::ResultExt;
use google_sheets4::api::{
    AddSheetRequest, BatchUpdateSpreadsheetRequest, Request, SheetProperties, ValueRange,
};
use tracing::instrument;

use crate::domain::sheets::a1_notation::A1Notation;

use super::spreadsheet_manager::{ClassifyApiError, SpreadsheetManager, SpreadsheetManagerError};

pub trait SpreadsheetWrite {
    /// Inserts `values` as new rows after the last non-empty row of `range`.
    fn append_rows(
        &self,
        range: &A1Notation,
        values: ValueRange,
    ) -> impl std::future::Future<Output = error_stack::Result<(), SpreadsheetManagerError>> + Send;

    /// Overwrites the cells of `range`.
    fn write_range(
        &self,
        range: &A1Notation,
        values: ValueRange,
    ) -> impl std::future::Future<Output = error_stack::Result<(), SpreadsheetManagerError>> + Send;

    fn add_sheet(
        &self,
        title: &str,
    ) -> impl std::future::Future<Output = error_stack::Result<(), SpreadsheetManagerError>> + Send;
}

impl SpreadsheetWrite for SpreadsheetManager {
    #[instrument(skip(values))]
    async fn append_rows(
        &self,
        range: &A1Notation,
        values: ValueRange,
    ) -> error_stack::Result<(), SpreadsheetManagerError> {
        self.hub
            .spreadsheets()
            .values_append(values, self.spreadsheet_id(), range.as_ref())
            .value_input_option("RAW")
            .insert_data_option("INSERT_ROWS")
            .doit()
            .await
            .classify_api_error()
            .attach_printable_lazy(|| format!("Failed to append rows to {}", range))?;

        Ok(())
    }

    #[instrument(skip(values))]
    async fn write_range(
        &self,
        range: &A1Notation,
        values: ValueRange,
    ) -> error_stack::Result<(), SpreadsheetManagerError> {
        self.hub
            .spreadsheets()
            .values_update(values, self.spreadsheet_id(), range.as_ref())
            .value_input_option("RAW")
            .doit()
            .await
            .classify_api_error()
            .attach_printable_lazy(|| format!("Failed to write range {}", range))?;

        Ok(())
    }

    #[instrument]
    async fn add_sheet(&self, title: &str) -> error_stack::Result<(), SpreadsheetManagerError> {
        let request = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![Request {
                add_sheet: Some(AddSheetRequest {
                    properties: Some(SheetProperties {
                        title: Some(title.to_string()),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            }]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .batch_update(request, self.spreadsheet_id())
            .doit()
            .await
            .classify_api_error()
            .attach_printable_lazy(|| format!("Failed to add sheet '{}'", title))?;

        Ok(())
    }
}
