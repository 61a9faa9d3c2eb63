//! Day records and the weekly schedule derived from them
//!
//! The whereabouts service answers with an unordered list of
//! `{"date": "YYYY-MM-DD HH:MM:SS", "locationAm": "..."}` objects. This module
//! parses and sorts them, then pulls out the label for today and the labels
//! for the working week.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Format of the `date` field sent by the whereabouts service
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label shown when no record matches today
pub const UNKNOWN_LOCATION: &str = "unknown";

/// One day as it arrives over the wire
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDayRecord {
    pub date: String,
    #[serde(rename = "locationAm")]
    pub location_am: String,
}

/// One day with its date parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDateTime,
    pub location_am: String,
}

impl DayRecord {
    pub fn parse(raw: RawDayRecord) -> Result<Self> {
        let date = NaiveDateTime::parse_from_str(&raw.date, DATE_FORMAT)
            .with_context(|| format!("Invalid record date {:?}", raw.date))?;
        Ok(Self {
            date,
            location_am: raw.location_am,
        })
    }
}

/// Parse every record and sort them by date, oldest first
///
/// Any malformed date aborts the whole batch.
pub fn normalize(raw: Vec<RawDayRecord>) -> Result<Vec<DayRecord>> {
    let records = raw
        .into_iter()
        .map(DayRecord::parse)
        .collect::<Result<Vec<_>>>()?;
    Ok(sort_records(records))
}

/// Stable sort by date, records sharing a timestamp keep their source order
pub fn sort_records(mut records: Vec<DayRecord>) -> Vec<DayRecord> {
    records.sort_by_key(|record| record.date);
    records
}

/// Label of the record dated `today`, or [`UNKNOWN_LOCATION`]
///
/// When several records fall on the same day the last one in sorted order wins.
pub fn today_location(records: &[DayRecord], today: NaiveDate) -> String {
    records
        .iter()
        .rev()
        .find(|record| record.date.date() == today)
        .map(|record| record.location_am.clone())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

/// Labels of every record in sorted order
///
/// Slot `n` is drawn under weekday `n` (0 = Monday). Nothing ties a record's
/// date to its slot, see [`WeekSchedule::misaligned_slots`].
pub fn week_locations(records: &[DayRecord]) -> WeekSchedule {
    WeekSchedule {
        days: records
            .iter()
            .map(|record| (record.date.date(), record.location_am.clone()))
            .collect(),
    }
}

/// Positional list of weekday labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    days: Vec<(NaiveDate, String)>,
}

impl WeekSchedule {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Label for weekday slot `index`, `None` when the service sent fewer days
    pub fn label(&self, index: usize) -> Option<&str> {
        self.days.get(index).map(|(_, label)| label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(_, label)| label.as_str())
    }

    /// Slots whose record does not fall on the weekday it will be drawn under
    pub fn misaligned_slots(&self) -> Vec<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(index, (date, _))| date.weekday().num_days_from_monday() as usize != *index)
            .map(|(index, _)| index)
            .collect()
    }
}
