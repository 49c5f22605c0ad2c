//! Row validation and normalization
//!
//! Raw CSV rows arrive as header-keyed string maps. Validation is pure and
//! synchronous: a row either normalizes into a typed record or is rejected
//! with a reason. Rejections are per-row and never abort a file.

use std::collections::HashMap;

use citybike_common::{DatasetKind, JourneyRecord, NormalizedRecord, StationRecord};
use thiserror::Error;

/// A parsed CSV row keyed by header name.
pub type RawRow = HashMap<String, String>;

/// Journeys shorter than this many seconds are discarded.
pub const MIN_DURATION_SECS: i64 = 10;

/// Journeys covering less than this many meters are discarded.
pub const MIN_DISTANCE_METERS: i64 = 10;

/// Why a row was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("empty value in column '{0}'")]
    EmptyValue(&'static str),

    #[error("non-numeric value '{value}' in column '{column}'")]
    NotNumeric {
        column: &'static str,
        value: String,
    },

    #[error("unparseable timestamp '{value}' in column '{column}'")]
    InvalidTimestamp {
        column: &'static str,
        value: String,
    },

    #[error("duration {0}s is below the 10s minimum")]
    DurationTooShort(i64),

    #[error("distance {0}m is below the 10m minimum")]
    DistanceTooShort(i64),
}

/// Validate a raw row and normalize it into a typed record for `kind`.
pub fn validate_and_normalize(
    row: &RawRow,
    kind: DatasetKind,
) -> Result<NormalizedRecord, RejectionReason> {
    match kind {
        DatasetKind::Station => validate_station(row).map(NormalizedRecord::Station),
        DatasetKind::Journey => validate_journey(row).map(NormalizedRecord::Journey),
    }
}

fn validate_station(row: &RawRow) -> Result<StationRecord, RejectionReason> {
    Ok(StationRecord {
        fid: require(row, "FID")?.to_string(),
        station_id: require_non_empty(row, "ID")?.to_string(),
        name_fi: require_non_empty(row, "Nimi")?.to_string(),
        name_sv: require_non_empty(row, "Namn")?.to_string(),
        name_en: require_non_empty(row, "Name")?.to_string(),
        address_fi: require(row, "Osoite")?.to_string(),
        address_sv: require(row, "Adress")?.to_string(),
        city_fi: require(row, "Kaupunki")?.to_string(),
        city_sv: require(row, "Stad")?.to_string(),
        operator: require(row, "Operaattor")?.to_string(),
        capacity: require(row, "Kapasiteet")?.to_string(),
        x: require_f64(row, "x")?,
        y: require_f64(row, "y")?,
    })
}

fn validate_journey(row: &RawRow) -> Result<JourneyRecord, RejectionReason> {
    let record = JourneyRecord {
        departure_time: require_timestamp(row, "Departure")?.to_string(),
        return_time: require_timestamp(row, "Return")?.to_string(),
        departure_station_id: require_non_empty(row, "Departure station id")?.to_string(),
        departure_station_name: require(row, "Departure station name")?.to_string(),
        return_station_id: require_non_empty(row, "Return station id")?.to_string(),
        return_station_name: require(row, "Return station name")?.to_string(),
        covered_distance: require_i64(row, "Covered distance (m)")?,
        duration: require_i64(row, "Duration (sec.)")?,
    };

    // Plausibility gates run after structural validation so a short AND
    // malformed row reports the structural problem.
    if record.duration < MIN_DURATION_SECS {
        return Err(RejectionReason::DurationTooShort(record.duration));
    }
    if record.covered_distance < MIN_DISTANCE_METERS {
        return Err(RejectionReason::DistanceTooShort(record.covered_distance));
    }

    Ok(record)
}

fn require<'a>(row: &'a RawRow, column: &'static str) -> Result<&'a str, RejectionReason> {
    row.get(column)
        .map(String::as_str)
        .ok_or(RejectionReason::MissingColumn(column))
}

fn require_non_empty<'a>(
    row: &'a RawRow,
    column: &'static str,
) -> Result<&'a str, RejectionReason> {
    let value = require(row, column)?;
    if value.trim().is_empty() {
        return Err(RejectionReason::EmptyValue(column));
    }
    Ok(value)
}

/// Timestamps are stored as their source text, but the text must parse as an
/// ISO-8601 datetime to be accepted.
fn require_timestamp<'a>(
    row: &'a RawRow,
    column: &'static str,
) -> Result<&'a str, RejectionReason> {
    let value = require_non_empty(row, column)?;
    if value.trim().parse::<chrono::NaiveDateTime>().is_err() {
        return Err(RejectionReason::InvalidTimestamp {
            column,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn require_f64(row: &RawRow, column: &'static str) -> Result<f64, RejectionReason> {
    let value = require_non_empty(row, column)?;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RejectionReason::NotNumeric {
            column,
            value: value.to_string(),
        })
}

/// Numeric columns may carry a fractional part in the source data; the
/// fraction is truncated.
fn require_i64(row: &RawRow, column: &'static str) -> Result<i64, RejectionReason> {
    require_f64(row, column).map(|v| v as i64)
}
