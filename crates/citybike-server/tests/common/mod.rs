//! Shared test fixtures for import integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use citybike_common::{DatasetKind, NormalizedRecord};
use citybike_server::ingest::{
    DatasetState, FileProgress, ImportError, ImportResult, ImportStore,
};

pub const JOURNEY_HEADER: &str = "Departure,Return,Departure station id,Departure station name,\
                                  Return station id,Return station name,Covered distance (m),Duration (sec.)";

pub const STATION_HEADER: &str =
    "FID,ID,Nimi,Namn,Name,Osoite,Adress,Kaupunki,Stad,Operaattor,Kapasiteet,x,y";

/// Build a journey CSV line with the given stations, distance, and duration.
pub fn journey_line(from: &str, to: &str, distance: &str, duration: &str) -> String {
    format!(
        "2021-05-31T23:57:25,2021-06-01T00:05:46,{from},Station {from},{to},Station {to},{distance},{duration}"
    )
}

/// Build a station CSV line with the given id and name.
pub fn station_line(id: &str, name: &str) -> String {
    format!("1,{id},{name},{name},{name},Osoite 1,Adress 1,Espoo,Esbo,Operator,10,24.84,60.16")
}

/// Write a CSV file into the kind's subdirectory of the dataset root.
pub fn write_dataset_file(root: &Path, kind: DatasetKind, name: &str, lines: &[&str]) -> PathBuf {
    let dir = root.join(kind.dataset_dir());
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[derive(Default)]
struct Inner {
    completed: HashMap<DatasetKind, bool>,
    cursors: HashMap<String, (DatasetKind, i64)>,
    records: Vec<NormalizedRecord>,
    /// Inserting any record referencing this station id fails, simulating a
    /// storage outage partway through a file.
    poison_station: Option<String>,
}

/// In-memory [`ImportStore`] with the same create-before-read contract as the
/// real one.
#[derive(Default)]
pub struct MemoryImportStore {
    inner: Mutex<Inner>,
}

impl MemoryImportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poison_station(&self, station_id: &str) {
        self.inner.lock().unwrap().poison_station = Some(station_id.to_string());
    }

    pub fn clear_poison(&self) {
        self.inner.lock().unwrap().poison_station = None;
    }

    pub fn records(&self) -> Vec<NormalizedRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn cursor(&self, file_path: &str) -> Option<i64> {
        self.inner
            .lock()
            .unwrap()
            .cursors
            .get(file_path)
            .map(|(_, line)| *line)
    }

    pub fn completed(&self, kind: DatasetKind) -> bool {
        self.inner
            .lock()
            .unwrap()
            .completed
            .get(&kind)
            .copied()
            .unwrap_or(false)
    }

    fn is_poisoned(inner: &Inner, record: &NormalizedRecord) -> bool {
        let Some(ref poisoned) = inner.poison_station else {
            return false;
        };
        match record {
            NormalizedRecord::Station(s) => s.station_id == *poisoned,
            NormalizedRecord::Journey(j) => j.departure_station_id == *poisoned,
        }
    }
}

#[async_trait]
impl ImportStore for MemoryImportStore {
    async fn dataset_state(&self, kind: DatasetKind) -> ImportResult<DatasetState> {
        let mut inner = self.inner.lock().unwrap();
        let completed = *inner.completed.entry(kind).or_insert(false);
        Ok(DatasetState { kind, completed })
    }

    async fn mark_dataset_completed(&self, kind: DatasetKind) -> ImportResult<()> {
        self.inner.lock().unwrap().completed.insert(kind, true);
        Ok(())
    }

    async fn get_or_create_tracker(
        &self,
        kind: DatasetKind,
        file_path: &str,
    ) -> ImportResult<FileProgress> {
        let mut inner = self.inner.lock().unwrap();
        inner.completed.entry(kind).or_insert(false);
        let (kind, next_line) = *inner
            .cursors
            .entry(file_path.to_string())
            .or_insert((kind, 1));
        Ok(FileProgress {
            file_path: file_path.to_string(),
            kind,
            next_line,
        })
    }

    async fn current_line(&self, file_path: &str) -> ImportResult<i64> {
        self.inner
            .lock()
            .unwrap()
            .cursors
            .get(file_path)
            .map(|(_, line)| *line)
            .ok_or_else(|| ImportError::TrackerNotFound {
                file_path: file_path.to_string(),
            })
    }

    async fn advance(&self, file_path: &str) -> ImportResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let (_, line) = inner.cursors.get_mut(file_path).ok_or_else(|| {
            ImportError::TrackerNotFound {
                file_path: file_path.to_string(),
            }
        })?;
        *line += 1;
        Ok(())
    }

    async fn insert(&self, record: &NormalizedRecord) -> ImportResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if Self::is_poisoned(&inner, record) {
            return Err(ImportError::Storage("simulated storage outage".to_string()));
        }
        inner.records.push(record.clone());
        Ok(())
    }
}
