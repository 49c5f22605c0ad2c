//! Common types used across CityBike
//!
//! These are the normalized shapes one accepted CSV row is mapped into before
//! it is persisted. The database assigns its own identity on insert; the
//! source-data `station_id` is a loose reference only (a journey may point at
//! a station id with no matching station record).

use serde::{Deserialize, Serialize};

/// The two data domains ingested from the dataset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Station,
    Journey,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Station => "station",
            DatasetKind::Journey => "journey",
        }
    }

    /// Subdirectory of the dataset root holding this kind's CSV files.
    pub fn dataset_dir(&self) -> &'static str {
        match self {
            DatasetKind::Station => "stations",
            DatasetKind::Journey => "journeys",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated bike station row, ready for storage.
///
/// Names and addresses come trilingual/bilingual from the source data
/// (Finnish, Swedish, English). Capacity is kept as the source string; the
/// validator only requires it to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub fid: String,
    pub station_id: String,
    pub name_fi: String,
    pub name_sv: String,
    pub name_en: String,
    pub address_fi: String,
    pub address_sv: String,
    pub city_fi: String,
    pub city_sv: String,
    pub operator: String,
    pub capacity: String,
    pub x: f64,
    pub y: f64,
}

/// A validated journey row, ready for storage.
///
/// Departure/return times are carried as the source's ISO-8601 strings; the
/// validator checks they parse but storage keeps the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRecord {
    pub departure_time: String,
    pub return_time: String,
    pub departure_station_id: String,
    pub departure_station_name: String,
    pub return_station_id: String,
    pub return_station_name: String,
    /// Covered distance in meters.
    pub covered_distance: i64,
    /// Duration in seconds.
    pub duration: i64,
}

/// One accepted source row, tagged by dataset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedRecord {
    Station(StationRecord),
    Journey(JourneyRecord),
}

impl NormalizedRecord {
    pub fn kind(&self) -> DatasetKind {
        match self {
            NormalizedRecord::Station(_) => DatasetKind::Station,
            NormalizedRecord::Journey(_) => DatasetKind::Journey,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_kind_strings() {
        assert_eq!(DatasetKind::Station.as_str(), "station");
        assert_eq!(DatasetKind::Journey.as_str(), "journey");
        assert_eq!(DatasetKind::Station.dataset_dir(), "stations");
        assert_eq!(DatasetKind::Journey.dataset_dir(), "journeys");
    }

    #[test]
    fn test_normalized_record_kind() {
        let journey = NormalizedRecord::Journey(JourneyRecord {
            departure_time: "2021-05-01T10:00:00".to_string(),
            return_time: "2021-05-01T10:30:00".to_string(),
            departure_station_id: "001".to_string(),
            departure_station_name: "Kaivopuisto".to_string(),
            return_station_id: "002".to_string(),
            return_station_name: "Laivasillankatu".to_string(),
            covered_distance: 2043,
            duration: 500,
        });
        assert_eq!(journey.kind(), DatasetKind::Journey);
    }
}
