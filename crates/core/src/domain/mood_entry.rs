use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest note a single spreadsheet cell will hold.
pub const MAX_NOTE_CHARS: usize = 50_000;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const DEFAULT_SLEEP_HOURS: f64 = 8.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoodEntryError {
    #[error("{field} must be between 1 and 10, got {value}")]
    RatingOutOfRange { field: &'static str, value: i64 },
    #[error("sleep_hours must be between 0 and 24, got {0}")]
    SleepHoursOutOfRange(f64),
    #[error("notes are limited to {max} characters, got {len}")]
    NoteTooLong { len: usize, max: usize },
    #[error("tag '{0}' must not contain a comma")]
    InvalidTag(String),
}

/// A score on the 1-10 scale used for mood, stress and energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const NEUTRAL: Rating = Rating(5);

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Lenient parse used when reading cells back: accepts `"7"` as well as `"7.0"`.
    pub fn parse_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        let value = match cell.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                let float = cell.parse::<f64>().ok()?;
                if float.fract() != 0.0 {
                    return None;
                }
                float as i64
            }
        };
        Rating::try_from(value).ok()
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating {0} is outside 1..=10")]
pub struct InvalidRating(pub i64);

impl TryFrom<i64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Rating::MIN as i64..=Rating::MAX as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded mood. Entries are append-only: once written to the sheet they
/// are never updated or removed.
///
/// Fields are only set through the `with_*` methods, which normalize and
/// validate, so every entry reads back from its row unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodEntry {
    timestamp: DateTime<Utc>,
    mood_value: Rating,
    note: Option<String>,
    stress_level: Rating,
    energy_level: Rating,
    sleep_hours: f64,
    tags: Vec<String>,
}

impl MoodEntry {
    /// An entry with no note, no tags and neutral defaults elsewhere.
    pub fn new(timestamp: DateTime<Utc>, mood_value: Rating) -> Self {
        Self {
            timestamp,
            mood_value,
            note: None,
            stress_level: Rating::NEUTRAL,
            energy_level: Rating::NEUTRAL,
            sleep_hours: DEFAULT_SLEEP_HOURS,
            tags: Vec::new(),
        }
    }

    /// Trims the note; a blank note is no note.
    pub fn with_note(mut self, note: Option<String>) -> Result<Self, MoodEntryError> {
        let note = note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        if let Some(note) = &note {
            let len = note.chars().count();
            if len > MAX_NOTE_CHARS {
                return Err(MoodEntryError::NoteTooLong {
                    len,
                    max: MAX_NOTE_CHARS,
                });
            }
        }
        self.note = note;
        Ok(self)
    }

    pub fn with_stress_level(mut self, stress_level: Rating) -> Self {
        self.stress_level = stress_level;
        self
    }

    pub fn with_energy_level(mut self, energy_level: Rating) -> Self {
        self.energy_level = energy_level;
        self
    }

    pub fn with_sleep_hours(mut self, sleep_hours: f64) -> Result<Self, MoodEntryError> {
        if !is_valid_sleep_hours(sleep_hours) {
            return Err(MoodEntryError::SleepHoursOutOfRange(sleep_hours));
        }
        self.sleep_hours = sleep_hours;
        Ok(self)
    }

    /// Trims each tag and drops empty ones.
    pub fn with_tags<I, T>(mut self, tags: I) -> Result<Self, MoodEntryError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }
            // Tags share one cell, comma separated
            if tag.contains(',') {
                return Err(MoodEntryError::InvalidTag(tag.to_string()));
            }
            normalized.push(tag.to_string());
        }
        self.tags = normalized;
        Ok(self)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn mood_value(&self) -> Rating {
        self.mood_value
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn stress_level(&self) -> Rating {
        self.stress_level
    }

    pub fn energy_level(&self) -> Rating {
        self.energy_level
    }

    pub fn sleep_hours(&self) -> f64 {
        self.sleep_hours
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Case-insensitive exact match against any of the entry's tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

pub fn is_valid_sleep_hours(hours: f64) -> bool {
    hours.is_finite() && (0.0..=MAX_SLEEP_HOURS).contains(&hours)
}

/// What a user submits. The timestamp is never part of it; the server assigns one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoodSubmission {
    pub mood: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub stress_level: Option<i64>,
    #[serde(default)]
    pub energy_level: Option<i64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MoodSubmission {
    pub fn into_entry(self, timestamp: DateTime<Utc>) -> Result<MoodEntry, MoodEntryError> {
        let mood_value = rating_field("mood", self.mood)?;
        let stress_level = self
            .stress_level
            .map(|value| rating_field("stress_level", value))
            .transpose()?
            .unwrap_or(Rating::NEUTRAL);
        let energy_level = self
            .energy_level
            .map(|value| rating_field("energy_level", value))
            .transpose()?
            .unwrap_or(Rating::NEUTRAL);

        MoodEntry::new(timestamp, mood_value)
            .with_stress_level(stress_level)
            .with_energy_level(energy_level)
            .with_sleep_hours(self.sleep_hours.unwrap_or(DEFAULT_SLEEP_HOURS))?
            .with_note(self.notes)?
            .with_tags(self.tags)
    }
}

fn rating_field(field: &'static str, value: i64) -> Result<Rating, MoodEntryError> {
    Rating::try_from(value).map_err(|_| MoodEntryError::RatingOutOfRange { field, value })
}
