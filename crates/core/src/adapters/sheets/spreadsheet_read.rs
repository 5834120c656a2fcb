use error_stack::ResultExt;
use tracing::instrument;

use crate::domain::sheets::a1_notation::A1Notation;
use crate::ports::mood_repository::SheetInfo;

use super::{
    spreadsheet_manager::{ClassifyApiError, SpreadsheetManager, SpreadsheetManagerError},
    string_rows::IntoStringRows,
};

pub trait SpreadsheetRead {
    /// Rows of `range` as plain text. A range with no values reads as no rows.
    fn read_rows(
        &self,
        range: &A1Notation,
    ) -> impl std::future::Future<
        Output = error_stack::Result<Vec<Vec<String>>, SpreadsheetManagerError>,
    > + Send;

    fn fetch_metadata(
        &self,
    ) -> impl std::future::Future<Output = error_stack::Result<SheetInfo, SpreadsheetManagerError>>
           + Send;
}

impl SpreadsheetRead for SpreadsheetManager {
    #[instrument]
    async fn read_rows(
        &self,
        range: &A1Notation,
    ) -> error_stack::Result<Vec<Vec<String>>, SpreadsheetManagerError> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(self.spreadsheet_id(), range.as_ref())
            .value_render_option("UNFORMATTED_VALUE")
            .doit()
            .await
            .classify_api_error()
            .attach_printable_lazy(|| format!("Failed to fetch values for range {}", range))?;

        Ok(value_range
            .values
            .map(IntoStringRows::into_string_rows)
            .unwrap_or_default())
    }

    #[instrument]
    async fn fetch_metadata(&self) -> error_stack::Result<SheetInfo, SpreadsheetManagerError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(self.spreadsheet_id())
            .doit()
            .await
            .classify_api_error()
            .attach_printable("Failed to fetch spreadsheet metadata")?;

        let title = spreadsheet
            .properties
            .and_then(|properties| properties.title)
            .unwrap_or_default();

        let sheets = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|properties| properties.title))
            .collect();

        Ok(SheetInfo {
            spreadsheet_id: self.spreadsheet_id().to_string(),
            title,
            sheets,
        })
    }
}
