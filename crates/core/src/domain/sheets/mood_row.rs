use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use strum::{EnumCount, IntoEnumIterator};
use thiserror::Error;

use crate::domain::mood_entry::{
    is_valid_sleep_hours, MoodEntry, MoodEntryError, Rating, DEFAULT_SLEEP_HOURS,
};

/// Column layout of the mood sheet, in sheet order.
#[derive(strum::Display, strum::EnumIter, strum::EnumCount, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodColumn {
    #[strum(serialize = "Timestamp")]
    Timestamp,
    #[strum(serialize = "Date")]
    Date,
    #[strum(serialize = "Time")]
    Time,
    #[strum(serialize = "Mood Score")]
    MoodScore,
    #[strum(serialize = "Stress Level")]
    StressLevel,
    #[strum(serialize = "Energy Level")]
    EnergyLevel,
    #[strum(serialize = "Sleep Hours")]
    SleepHours,
    #[strum(serialize = "Notes")]
    Notes,
    #[strum(serialize = "Tags")]
    Tags,
}

impl MoodColumn {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn last_index() -> u32 {
        (MoodColumn::COUNT - 1) as u32
    }
}

/// Rows shorter than this carry no mood score and are skipped.
const MIN_CELLS: usize = MoodColumn::MoodScore as usize + 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowDecodeError {
    #[error("row has {0} cells, at least 4 are required")]
    TooShort(usize),
    #[error("unparsable timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("unparsable mood score '{0}'")]
    InvalidMood(String),
    #[error("unstorable entry: {0}")]
    InvalidEntry(#[from] MoodEntryError),
}

pub fn header_row() -> Vec<Value> {
    MoodColumn::iter()
        .map(|column| Value::String(column.to_string()))
        .collect()
}

pub fn is_header_row(cells: &[String]) -> bool {
    cells
        .first()
        .is_some_and(|cell| cell.trim() == MoodColumn::Timestamp.to_string())
}

pub fn encode_row(entry: &MoodEntry) -> Vec<Value> {
    let timestamp = entry.timestamp();
    vec![
        Value::String(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::String(timestamp.format("%Y-%m-%d").to_string()),
        Value::String(timestamp.format("%H:%M:%S").to_string()),
        Value::from(entry.mood_value().value()),
        Value::from(entry.stress_level().value()),
        Value::from(entry.energy_level().value()),
        Value::from(entry.sleep_hours()),
        Value::String(entry.note().unwrap_or_default().to_string()),
        Value::String(entry.tags().join(", ")),
    ]
}

pub fn decode_row(cells: &[String]) -> Result<MoodEntry, RowDecodeError> {
    if cells.len() < MIN_CELLS {
        return Err(RowDecodeError::TooShort(cells.len()));
    }

    let cell = |column: MoodColumn| cells.get(column.index()).map(|c| c.trim());

    let raw_timestamp = cell(MoodColumn::Timestamp).unwrap_or_default();
    let timestamp = parse_timestamp(raw_timestamp)
        .ok_or_else(|| RowDecodeError::InvalidTimestamp(raw_timestamp.to_string()))?;

    let raw_mood = cell(MoodColumn::MoodScore).unwrap_or_default();
    let mood_value =
        Rating::parse_cell(raw_mood).ok_or_else(|| RowDecodeError::InvalidMood(raw_mood.to_string()))?;

    let stress_level = cell(MoodColumn::StressLevel)
        .and_then(Rating::parse_cell)
        .unwrap_or(Rating::NEUTRAL);
    let energy_level = cell(MoodColumn::EnergyLevel)
        .and_then(Rating::parse_cell)
        .unwrap_or(Rating::NEUTRAL);
    let sleep_hours = cell(MoodColumn::SleepHours)
        .and_then(|c| c.parse::<f64>().ok())
        .filter(|hours| is_valid_sleep_hours(*hours))
        .unwrap_or(DEFAULT_SLEEP_HOURS);

    let note = cells.get(MoodColumn::Notes.index()).cloned();
    let tags = cell(MoodColumn::Tags)
        .map(|raw| raw.split(',').collect::<Vec<_>>())
        .unwrap_or_default();

    let entry = MoodEntry::new(timestamp, mood_value)
        .with_stress_level(stress_level)
        .with_energy_level(energy_level)
        .with_sleep_hours(sleep_hours)?
        .with_note(note)?
        .with_tags(tags)?;
    Ok(entry)
}

/// RFC 3339 first; offset-less ISO timestamps are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mood_entry::MAX_NOTE_CHARS;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn cell_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn entry_at(timestamp: DateTime<Utc>) -> MoodEntry {
        MoodEntry::new(timestamp, Rating::try_from(7).unwrap())
            .with_note(Some("long walk".to_string()))
            .unwrap()
            .with_stress_level(Rating::try_from(3).unwrap())
            .with_energy_level(Rating::try_from(6).unwrap())
            .with_sleep_hours(7.5)
            .unwrap()
            .with_tags(["outdoors", "friends"])
            .unwrap()
    }

    fn sample_entry() -> MoodEntry {
        entry_at(Utc.with_ymd_and_hms(2024, 5, 17, 21, 4, 9).unwrap())
    }

    fn reread(entry: &MoodEntry) -> Result<MoodEntry, RowDecodeError> {
        let cells: Vec<String> = encode_row(entry).iter().map(cell_text).collect();
        decode_row(&cells)
    }

    #[test]
    fn test_header_row_matches_layout() {
        let header: Vec<String> = header_row().iter().map(cell_text).collect();
        assert_eq!(
            header,
            strings(&[
                "Timestamp",
                "Date",
                "Time",
                "Mood Score",
                "Stress Level",
                "Energy Level",
                "Sleep Hours",
                "Notes",
                "Tags"
            ])
        );
        assert_eq!(MoodColumn::last_index(), 8);
        assert!(is_header_row(&header));
    }

    #[test]
    fn test_encode_row_layout() {
        let row = encode_row(&sample_entry());
        assert_eq!(row.len(), MoodColumn::COUNT);
        assert_eq!(row[0], Value::String("2024-05-17T21:04:09Z".to_string()));
        assert_eq!(row[1], Value::String("2024-05-17".to_string()));
        assert_eq!(row[2], Value::String("21:04:09".to_string()));
        assert_eq!(row[3], Value::from(7u8));
        assert_eq!(row[6], Value::from(7.5));
        assert_eq!(row[7], Value::String("long walk".to_string()));
        assert_eq!(row[8], Value::String("outdoors, friends".to_string()));
    }

    #[test]
    fn test_decode_encoded_row() {
        let entry = sample_entry();
        let cells: Vec<String> = encode_row(&entry).iter().map(cell_text).collect();
        assert_eq!(decode_row(&cells), Ok(entry));
    }

    #[test]
    fn test_decode_keeps_subsecond_precision() {
        let entry = entry_at(Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap());
        assert_eq!(reread(&entry).unwrap().timestamp(), entry.timestamp());
    }

    #[test]
    fn test_decode_minimal_row_uses_defaults() {
        let entry = decode_row(&strings(&["2024-01-02T08:00:00", "", "", "4"])).unwrap();
        assert_eq!(
            entry.timestamp(),
            Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()
        );
        assert_eq!(entry.mood_value().value(), 4);
        assert_eq!(entry.stress_level(), Rating::NEUTRAL);
        assert_eq!(entry.energy_level(), Rating::NEUTRAL);
        assert_eq!(entry.sleep_hours(), DEFAULT_SLEEP_HOURS);
        assert_eq!(entry.note(), None);
        assert!(entry.tags().is_empty());
    }

    #[test]
    fn test_decode_naive_timestamp_with_fraction() {
        let entry =
            decode_row(&strings(&["2024-01-02T08:00:00.250000", "", "", "4"])).unwrap();
        assert_eq!(entry.timestamp().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_decode_garbage_optional_cells_fall_back() {
        let entry = decode_row(&strings(&[
            "2024-01-02T08:00:00Z",
            "2024-01-02",
            "08:00:00",
            "9",
            "lots",
            "",
            "-3",
            "",
            " , ,",
        ]))
        .unwrap();
        assert_eq!(entry.stress_level(), Rating::NEUTRAL);
        assert_eq!(entry.sleep_hours(), DEFAULT_SLEEP_HOURS);
        assert!(entry.tags().is_empty());
    }

    #[test]
    fn test_decode_short_row() {
        assert_eq!(
            decode_row(&strings(&["2024-01-02T08:00:00Z", "", ""])),
            Err(RowDecodeError::TooShort(3))
        );
    }

    #[test]
    fn test_decode_bad_mood() {
        assert_eq!(
            decode_row(&strings(&["2024-01-02T08:00:00Z", "", "", "0"])),
            Err(RowDecodeError::InvalidMood("0".to_string()))
        );
    }

    #[test]
    fn test_decode_bad_timestamp() {
        assert_eq!(
            decode_row(&strings(&["yesterday", "", "", "5"])),
            Err(RowDecodeError::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_edge_entries_read_back_unchanged() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 6, 0, 0).unwrap();
        let entries = [
            MoodEntry::new(at, Rating::NEUTRAL)
                .with_note(Some("   ".to_string()))
                .unwrap(),
            MoodEntry::new(at, Rating::NEUTRAL)
                .with_note(Some("  padded note \n".to_string()))
                .unwrap(),
            MoodEntry::new(at, Rating::NEUTRAL)
                .with_tags([" spaced ", "", "x"])
                .unwrap(),
            MoodEntry::new(at, Rating::NEUTRAL)
                .with_sleep_hours(0.0)
                .unwrap(),
            MoodEntry::new(at, Rating::NEUTRAL)
                .with_sleep_hours(24.0)
                .unwrap(),
        ];
        for entry in entries {
            assert_eq!(reread(&entry), Ok(entry));
        }
    }

    #[test]
    fn test_unstorable_values_never_reach_a_row() {
        let entry = MoodEntry::new(Utc::now(), Rating::NEUTRAL);
        assert!(entry.clone().with_sleep_hours(f64::NAN).is_err());
        assert!(entry.clone().with_sleep_hours(-2.0).is_err());
        assert!(entry.with_tags(["one,two"]).is_err());
    }

    #[test]
    fn test_decode_overlong_note_is_rejected() {
        let mut cells = strings(&["2024-01-02T08:00:00Z", "", "", "5", "", "", ""]);
        cells.push("x".repeat(MAX_NOTE_CHARS + 1));
        assert!(matches!(
            decode_row(&cells),
            Err(RowDecodeError::InvalidEntry(MoodEntryError::NoteTooLong { .. }))
        ));
    }
}
