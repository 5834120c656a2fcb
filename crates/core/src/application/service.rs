use crate::domain::mood_entry::{MoodEntry, MoodSubmission};
use crate::ports::application_service::{ApplicationService, ApplicationServiceError};
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::mood_repository::{MoodRepository, SheetInfo, StoreError};
use chrono::NaiveDate;
use error_stack::{report, Report, ResultExt};
use std::sync::Arc;
use tracing::{info, instrument};

pub const DEFAULT_RECENT_LIMIT: usize = 30;

pub struct MoodTrackerApplicationService {
    repository: Arc<dyn MoodRepository>,
    clock: Arc<dyn Clock>,
}

impl MoodTrackerApplicationService {
    pub fn new(repository: Arc<dyn MoodRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn MoodRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    async fn all_entries(&self) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError> {
        let entries = self
            .repository
            .list_entries()
            .await
            .map_err(storage_error)?;
        Ok(entries.iter().collect())
    }
}

fn storage_error(report: Report<StoreError>) -> Report<ApplicationServiceError> {
    let kind = *report.current_context();
    report.change_context(ApplicationServiceError::Storage(kind))
}

#[async_trait::async_trait]
impl ApplicationService for MoodTrackerApplicationService {
    #[instrument(skip(self, submission), fields(mood = submission.mood))]
    async fn log_mood(
        &self,
        submission: MoodSubmission,
    ) -> error_stack::Result<MoodEntry, ApplicationServiceError> {
        let entry = submission
            .into_entry(self.clock.now())
            .map_err(|e| report!(ApplicationServiceError::InvalidSubmission(e)))?;

        self.repository
            .append(&entry)
            .await
            .map_err(storage_error)
            .attach_printable_lazy(|| format!("Failed to log mood recorded at {}", entry.timestamp()))?;

        info!(timestamp = %entry.timestamp(), "Mood logged");
        Ok(entry)
    }

    #[instrument(skip(self))]
    async fn recent_entries(
        &self,
        limit: usize,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError> {
        let mut entries = self.all_entries().await?;
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.split_off(skip))
    }

    #[instrument(skip(self))]
    async fn entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError> {
        if start > end {
            return Err(report!(ApplicationServiceError::InvalidDateRange {
                start,
                end
            }));
        }

        let entries = self.all_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| (start..=end).contains(&entry.timestamp().date_naive()))
            .collect())
    }

    #[instrument(skip(self))]
    async fn entries_with_tag(
        &self,
        tag: &str,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError> {
        let entries = self.all_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.has_tag(tag))
            .collect())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> error_stack::Result<SheetInfo, ApplicationServiceError> {
        self.repository.sheet_info().await.map_err(storage_error)
    }
}
