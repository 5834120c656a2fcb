use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::mood_entry::{MoodEntry, MoodEntryError, MoodSubmission};
use crate::ports::mood_repository::{SheetInfo, StoreError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationServiceError {
    #[error("Invalid mood submission: {0}")]
    InvalidSubmission(MoodEntryError),
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Mood storage failed: {0}")]
    Storage(StoreError),
}

#[async_trait::async_trait]
pub trait ApplicationService: Send + Sync {
    /// Validates a submission, stamps it with the current time and stores it.
    async fn log_mood(
        &self,
        submission: MoodSubmission,
    ) -> error_stack::Result<MoodEntry, ApplicationServiceError>;

    /// The last `limit` entries, oldest first.
    async fn recent_entries(
        &self,
        limit: usize,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError>;

    /// Entries recorded on `start..=end` (UTC dates), oldest first.
    async fn entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError>;

    /// Entries carrying `tag`, compared case-insensitively against whole tags.
    async fn entries_with_tag(
        &self,
        tag: &str,
    ) -> error_stack::Result<Vec<MoodEntry>, ApplicationServiceError>;

    async fn health_check(&self) -> error_stack::Result<SheetInfo, ApplicationServiceError>;
}
