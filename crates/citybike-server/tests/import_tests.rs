//! End-to-end import pipeline tests against an in-memory store

mod common;

use citybike_common::{DatasetKind, NormalizedRecord};
use citybike_server::ingest::{import_all, import_kind, pipeline, ImportError};

use common::{
    journey_line, station_line, write_dataset_file, MemoryImportStore, JOURNEY_HEADER,
    STATION_HEADER,
};

fn journey_departures(records: &[NormalizedRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| match r {
            NormalizedRecord::Journey(j) => Some(j.departure_station_id.clone()),
            NormalizedRecord::Station(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn test_journey_import_accepts_and_rejects_rows() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    // Four data rows: valid, too short a ride, wrong column count, valid.
    let rows = [
        journey_line("001", "002", "2043", "500"),
        journey_line("001", "002", "2043", "9"),
        "only,three,columns".to_string(),
        journey_line("003", "004", "1500", "320"),
    ];
    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[
            JOURNEY_HEADER,
            &rows[0],
            &rows[1],
            &rows[2],
            &rows[3],
        ],
    );

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    let records = store.records();
    assert_eq!(journey_departures(&records), vec!["001", "003"]);

    // Every consumed row advances the cursor, accepted or not.
    assert_eq!(store.cursor(&file.to_string_lossy()), Some(5));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_short_malformed_and_valid_rows_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    // Too short a ride, too short a distance, malformed departure date, valid.
    let rows = [
        journey_line("001", "002", "50", "5"),
        journey_line("001", "002", "5", "20"),
        "31/05/2021,2021-06-01T00:05:46,001,Station 001,002,Station 002,50,20".to_string(),
        journey_line("004", "002", "50", "20"),
    ];
    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &rows[0], &rows[1], &rows[2], &rows[3]],
    );

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    assert_eq!(journey_departures(&store.records()), vec!["004"]);
    assert_eq!(store.cursor(&file.to_string_lossy()), Some(5));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_completed_dataset_is_not_reimported() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &journey_line("001", "002", "2043", "500")],
    );

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();
    assert_eq!(store.records().len(), 1);

    // A second run is a no-op even though the file still has rows.
    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn test_resume_skips_already_imported_rows() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[
            JOURNEY_HEADER,
            &journey_line("001", "002", "2043", "500"),
            &journey_line("003", "004", "1500", "320"),
            &journey_line("005", "006", "800", "120"),
        ],
    );
    let path = file.to_string_lossy().to_string();

    use citybike_server::ingest::ImportStore;
    store
        .get_or_create_tracker(DatasetKind::Journey, &path)
        .await
        .unwrap();
    store.advance(&path).await.unwrap();
    store.advance(&path).await.unwrap();

    // Cursor at line 3: only the third data row is imported.
    pipeline::import_file(&store, DatasetKind::Journey, &file)
        .await
        .unwrap();

    assert_eq!(journey_departures(&store.records()), vec!["005"]);
    assert_eq!(store.cursor(&path), Some(4));
}

#[tokio::test]
async fn test_cursor_past_end_of_file_is_a_noop() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &journey_line("001", "002", "2043", "500")],
    );
    let path = file.to_string_lossy().to_string();

    use citybike_server::ingest::ImportStore;
    store
        .get_or_create_tracker(DatasetKind::Journey, &path)
        .await
        .unwrap();
    store.advance(&path).await.unwrap();

    pipeline::import_file(&store, DatasetKind::Journey, &file)
        .await
        .unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.cursor(&path), Some(2));
}

#[tokio::test]
async fn test_storage_failure_leaves_resumable_cursor() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[
            JOURNEY_HEADER,
            &journey_line("001", "002", "2043", "500"),
            &journey_line("666", "004", "1500", "320"),
            &journey_line("005", "006", "800", "120"),
        ],
    );
    let path = file.to_string_lossy().to_string();

    store.poison_station("666");

    let err = import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Storage(_)));

    // The first row landed, the failed row did not advance the cursor, and
    // the dataset stayed incomplete.
    assert_eq!(journey_departures(&store.records()), vec!["001"]);
    assert_eq!(store.cursor(&path), Some(2));
    assert!(!store.completed(DatasetKind::Journey));

    // The next run picks up exactly at the failed row.
    store.clear_poison();
    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    assert_eq!(journey_departures(&store.records()), vec!["001", "666", "005"]);
    assert_eq!(store.cursor(&path), Some(4));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_failing_file_does_not_disturb_sibling() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    // File A imports cleanly; file B hits a storage outage on its second row.
    let a = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &journey_line("001", "002", "2043", "500")],
    );
    let b = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-06.csv",
        &[
            JOURNEY_HEADER,
            &journey_line("003", "004", "1500", "320"),
            &journey_line("666", "004", "1500", "320"),
            &journey_line("005", "006", "800", "120"),
        ],
    );
    let a_path = a.to_string_lossy().to_string();
    let b_path = b.to_string_lossy().to_string();

    store.poison_station("666");

    let err = import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Storage(_)));

    // A ran to EOF with its records stored; B stopped at the failed row and
    // the kind stayed incomplete.
    let mut departures = journey_departures(&store.records());
    departures.sort();
    assert_eq!(departures, vec!["001", "003"]);
    assert_eq!(store.cursor(&a_path), Some(2));
    assert_eq!(store.cursor(&b_path), Some(2));
    assert!(!store.completed(DatasetKind::Journey));

    // The re-run resumes B from its cursor and leaves A's rows untouched.
    store.clear_poison();
    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    let mut departures = journey_departures(&store.records());
    departures.sort();
    assert_eq!(departures, vec!["001", "003", "005", "666"]);
    assert_eq!(store.cursor(&a_path), Some(2));
    assert_eq!(store.cursor(&b_path), Some(4));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_unregistered_file_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &journey_line("001", "002", "2043", "500")],
    );

    let err = pipeline::import_file(&store, DatasetKind::Journey, &file)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::TrackerNotFound { .. }));
}

#[tokio::test]
async fn test_missing_dataset_directory_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let err = import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Discovery { .. }));
    assert!(!store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_kinds_import_independently() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    // Stations are present; the journeys directory is missing entirely.
    write_dataset_file(
        root.path(),
        DatasetKind::Station,
        "stations.csv",
        &[STATION_HEADER, &station_line("501", "Hanasaari")],
    );

    let err = import_all(&store, root.path()).await.unwrap_err();
    assert!(matches!(err, ImportError::Discovery { .. }));

    assert!(store.completed(DatasetKind::Station));
    assert!(!store.completed(DatasetKind::Journey));
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn test_multiple_files_all_import() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let a = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-05.csv",
        &[JOURNEY_HEADER, &journey_line("001", "002", "2043", "500")],
    );
    let b = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "2021-06.csv",
        &[
            JOURNEY_HEADER,
            &journey_line("003", "004", "1500", "320"),
            &journey_line("005", "006", "800", "120"),
        ],
    );

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    let mut departures = journey_departures(&store.records());
    departures.sort();
    assert_eq!(departures, vec!["001", "003", "005"]);
    assert_eq!(store.cursor(&a.to_string_lossy()), Some(2));
    assert_eq!(store.cursor(&b.to_string_lossy()), Some(3));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_bom_prefixed_file_imports() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let dir = root.path().join(DatasetKind::Journey.dataset_dir());
    std::fs::create_dir_all(&dir).unwrap();
    let content = format!(
        "\u{feff}{JOURNEY_HEADER}\n{}",
        journey_line("001", "002", "2043", "500")
    );
    std::fs::write(dir.join("2021-05.csv"), content).unwrap();

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    // With the BOM consumed, the first header cell matches "Departure".
    assert_eq!(journey_departures(&store.records()), vec!["001"]);
}

#[tokio::test]
async fn test_header_only_file_completes() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let file = write_dataset_file(
        root.path(),
        DatasetKind::Journey,
        "empty.csv",
        &[JOURNEY_HEADER],
    );

    import_kind(&store, root.path(), DatasetKind::Journey)
        .await
        .unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.cursor(&file.to_string_lossy()), Some(1));
    assert!(store.completed(DatasetKind::Journey));
}

#[tokio::test]
async fn test_station_import_rejects_incomplete_rows() {
    let root = tempfile::tempdir().unwrap();
    let store = MemoryImportStore::new();

    let bad_row = "1,502,,Tomtas,Tomtas,Osoite,Adress,Espoo,Esbo,Op,10,24.8,60.1";
    let file = write_dataset_file(
        root.path(),
        DatasetKind::Station,
        "stations.csv",
        &[STATION_HEADER, &station_line("501", "Hanasaari"), bad_row],
    );

    import_kind(&store, root.path(), DatasetKind::Station)
        .await
        .unwrap();

    let records = store.records();
    assert_eq!(records.len(), 1);
    match &records[0] {
        NormalizedRecord::Station(s) => assert_eq!(s.station_id, "501"),
        other => panic!("expected station, got {other:?}"),
    }
    assert_eq!(store.cursor(&file.to_string_lossy()), Some(3));
}
