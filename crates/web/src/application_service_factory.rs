use error_stack::ResultExt;
use mood_tracker_core::{
    adapters::{
        config::app_config::AppConfig,
        sheets::{sheet_store::SheetStore, spreadsheet_manager::SpreadsheetManager},
    },
    application::service::MoodTrackerApplicationService,
    ports::{application_service::ApplicationService, mood_repository::MoodRepository},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Failed to connect to Google Sheets")]
    Spreadsheet,
    #[error("Failed to prepare the mood sheet")]
    Sheet,
}

pub struct ApplicationServiceFactory;

impl ApplicationServiceFactory {
    #[instrument(skip(config))]
    pub async fn create(
        config: &AppConfig,
    ) -> error_stack::Result<Arc<dyn ApplicationService>, FactoryError> {
        let spreadsheet_manager = Arc::new(
            SpreadsheetManager::new(config.sheets.clone())
                .await
                .change_context(FactoryError::Spreadsheet)?,
        );

        let store = SheetStore::new(spreadsheet_manager, config.sheets.sheet_name.clone());
        store
            .ensure_sheet()
            .await
            .change_context(FactoryError::Sheet)
            .attach_printable_lazy(|| format!("Sheet '{}'", store.sheet_name()))?;
        info!(sheet = store.sheet_name(), "Mood sheet ready");

        let repository: Arc<dyn MoodRepository> = Arc::new(store);
        Ok(Arc::new(MoodTrackerApplicationService::new(repository)))
    }
}
