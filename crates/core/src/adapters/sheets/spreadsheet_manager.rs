use error_stack::{Report, ResultExt};
use google_sheets4::Sheets;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;
use tracing::instrument;

use crate::adapters::config::sheets_config::SpreadsheetConfig;

use super::{
    auth::{self},
    http_client::{self, HttpsConnector},
};

pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    pub(super) hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpreadsheetManager {{ config: {:?} }}", self.config)
    }
}

/// Failure kinds of the Sheets API, as far as a caller can act on them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetManagerError {
    #[error("Google Sheets rejected the credentials")]
    Unauthorized,
    #[error("Spreadsheet or sheet not found")]
    SpreadsheetNotFound,
    #[error("Google Sheets is temporarily unavailable")]
    Transient,
    #[error("Google Sheets rejected the request")]
    Rejected,
}

impl SpreadsheetManagerError {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => SpreadsheetManagerError::Unauthorized,
            404 => SpreadsheetManagerError::SpreadsheetNotFound,
            408 | 429 | 500..=599 => SpreadsheetManagerError::Transient,
            _ => SpreadsheetManagerError::Rejected,
        }
    }

    pub fn from_api_error(error: &google_sheets4::Error) -> Self {
        use google_sheets4::Error as ApiError;

        match error {
            ApiError::BadRequest(body) => error_body_status(body)
                .map(Self::from_status)
                .unwrap_or(SpreadsheetManagerError::Rejected),
            ApiError::Failure(response) => Self::from_status(response.status().as_u16()),
            ApiError::MissingToken(_) | ApiError::MissingAPIKey => {
                SpreadsheetManagerError::Unauthorized
            }
            ApiError::HttpError(_)
            | ApiError::Io(_)
            | ApiError::Cancelled
            | ApiError::JsonDecodeError(_, _) => SpreadsheetManagerError::Transient,
            _ => SpreadsheetManagerError::Rejected,
        }
    }
}

/// Status code from a Google JSON error body: `{"error": {"code": 404, ...}}`.
fn error_body_status(body: &Value) -> Option<u16> {
    body.get("error")?
        .get("code")?
        .as_u64()
        .and_then(|code| u16::try_from(code).ok())
}

/// Classifies an API error, keeping the original as the report's source.
pub(super) fn classify(error: google_sheets4::Error) -> Report<SpreadsheetManagerError> {
    let kind = SpreadsheetManagerError::from_api_error(&error);
    Report::new(error).change_context(kind)
}

pub(super) trait ClassifyApiError<T> {
    fn classify_api_error(self) -> error_stack::Result<T, SpreadsheetManagerError>;
}

impl<T> ClassifyApiError<T> for Result<T, google_sheets4::Error> {
    fn classify_api_error(self) -> error_stack::Result<T, SpreadsheetManagerError> {
        self.map_err(classify)
    }
}

impl SpreadsheetManager {
    #[instrument(name = "SpreadsheetManager::new")]
    pub async fn new(
        config: SpreadsheetConfig,
    ) -> error_stack::Result<Self, SpreadsheetManagerError> {
        let client = http_client::http_client();
        let auth = auth::auth(&config, client.clone())
            .await
            .attach_printable_lazy(|| format!("Spreadsheet {}", config.spreadsheet_id))?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager { config, hub })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.config.spreadsheet_id
    }
}
