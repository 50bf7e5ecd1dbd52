//! Date parsing and normalization.
//!
//! Source timestamps arrive as ISO-8601 with or without an offset, or as a
//! bare `YYYY-MM-DD`. Everything the engine emits is date-only.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("empty date value")]
    Empty,
    #[error("unrecognized date '{0}'")]
    Unrecognized(String),
}

/// Parse a source timestamp into its calendar date.
///
/// Offsets are discarded rather than converted: the local calendar date the
/// source system recorded is the one that matters for the cutoff rule.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DateParseError::Empty);
    }

    if value.contains('T') {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Ok(parsed.naive_local().date());
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(parsed.date());
            }
        }
        return Err(DateParseError::Unrecognized(value.to_string()));
    }

    // "2024-03-01 10:00:00" style: only the leading token is the date
    let date_part = value.split_whitespace().next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|_| DateParseError::Unrecognized(value.to_string()))
}

/// Date-only rendering of a source date or timestamp.
///
/// Unparseable values are logged and dropped; the output never carries a
/// date it could not read.
pub fn date_only(raw: &str) -> Option<String> {
    match parse_date(raw) {
        Ok(date) => Some(date.format(DATE_FORMAT).to_string()),
        Err(DateParseError::Empty) => None,
        Err(err) => {
            tracing::debug!("dropping date: {err}");
            None
        }
    }
}

/// Creation date used by the cutoff rule: parsed value, or `sentinel` when
/// the field is missing or unparseable.
pub fn created_or_sentinel(raw: Option<&str>, sentinel: NaiveDate) -> NaiveDate {
    match raw.map(parse_date) {
        Some(Ok(date)) => date,
        Some(Err(DateParseError::Empty)) | None => sentinel,
        Some(Err(err)) => {
            tracing::warn!("could not parse created_at: {err}; using {sentinel}");
            sentinel
        }
    }
}
