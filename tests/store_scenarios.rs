//! End-to-end scenarios for the binary record store

use std::fs;
use tempfile::TempDir;
use vehicle_store::{Operation, Outcome, RecordStore, StoreError, Vehicle, RECORD_SIZE};

fn civic() -> Vehicle {
    Vehicle::new(1, "Civic", "Honda", 6.5, 120)
}

fn golf() -> Vehicle {
    Vehicle::new(2, "Golf", "VW", 7.0, 110)
}

fn store_in(dir: &TempDir) -> RecordStore {
    RecordStore::new(dir.path().join("vehicles.bin"))
}

#[test]
fn test_duplicate_id_update_and_delete_hit_first_match() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.append(&civic()).unwrap();
    store.append(&golf()).unwrap();
    store.append(&civic()).unwrap();

    assert_eq!(store.records().unwrap(), vec![civic(), golf(), civic()]);

    // Only the first id=1 record changes
    assert_eq!(
        store.update_horsepower(1, 150).unwrap(),
        Outcome::Applied { index: 0 }
    );
    assert_eq!(
        store.records().unwrap(),
        vec![civic().with_horsepower(150), golf(), civic()]
    );

    // Only the first id=1 record goes; the later duplicate stays at 120
    assert_eq!(store.delete(1).unwrap(), Outcome::Applied { index: 0 });
    assert_eq!(store.records().unwrap(), vec![golf(), civic()]);
}

#[test]
fn test_trailing_partial_block_is_malformed() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.append(&civic()).unwrap();
    store.append(&golf()).unwrap();

    let mut bytes = fs::read(store.path()).unwrap();
    bytes.extend_from_slice(&[0u8; 10]);
    fs::write(store.path(), &bytes).unwrap();
    assert_eq!(bytes.len(), RECORD_SIZE * 2 + 10);

    let results: Vec<_> = store.scan().unwrap().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &civic());
    assert_eq!(results[1].as_ref().unwrap(), &golf());
    match &results[2] {
        Err(StoreError::MalformedRecord { index, .. }) => assert_eq!(*index, 2),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }

    assert!(store.records().unwrap_err().is_malformed());
}

#[test]
fn test_scan_twice_yields_same_sequence() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    for id in 0..10 {
        store
            .append(&Vehicle::new(id, format!("Model {}", id), "Make", id as f64, id * 10))
            .unwrap();
    }

    let first: Vec<_> = store.scan().unwrap().map(Result::unwrap).collect();
    let second: Vec<_> = store.scan().unwrap().map(Result::unwrap).collect();
    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
}

#[test]
fn test_append_goes_last() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.append(&civic()).unwrap();
    store.append(&golf()).unwrap();
    let before = store.records().unwrap();

    let extra = Vehicle::new(3, "Clio", "Renault", 5.2, 90);
    store.append(&extra).unwrap();

    let mut expected = before;
    expected.push(extra);
    assert_eq!(store.records().unwrap(), expected);
}

#[test]
fn test_empty_store_scans_to_nothing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), b"").unwrap();

    assert!(store.records().unwrap().is_empty());
    assert_eq!(store.update_horsepower(1, 1).unwrap(), Outcome::NotFound);
    assert_eq!(store.delete(1).unwrap(), Outcome::NotFound);
    assert_eq!(fs::metadata(store.path()).unwrap().len(), 0);
}

#[test]
fn test_delete_shrinks_by_one_block() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.append(&civic()).unwrap();
    store.append(&golf()).unwrap();
    let before = fs::read(store.path()).unwrap();

    assert!(store.delete(2).unwrap().is_applied());

    let after = fs::read(store.path()).unwrap();
    assert_eq!(after.len(), before.len() - RECORD_SIZE);
    assert_eq!(&after[..], &before[..RECORD_SIZE]);
}

#[test]
fn test_mutations_on_missing_store_are_io_errors() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(matches!(
        store.update_horsepower(1, 1),
        Err(StoreError::Io { .. })
    ));
    assert!(matches!(store.delete(1), Err(StoreError::Io { .. })));
    assert!(!store.exists());
}

#[test]
fn test_delete_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("copies");
    fs::create_dir(&nested).unwrap();
    let store = RecordStore::new(nested.join("vehicles.bin"));

    store.append(&civic()).unwrap();
    store.append(&golf()).unwrap();
    assert!(store.delete(1).unwrap().is_applied());

    let names: Vec<_> = fs::read_dir(&nested)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("vehicles.bin")]);
    assert_eq!(store.records().unwrap(), vec![golf()]);
}

#[cfg(target_os = "linux")]
#[test]
fn test_append_to_full_device_is_write_error() {
    let store = RecordStore::new("/dev/full");

    match store.append(&civic()) {
        Err(StoreError::Io { operation, path, .. }) => {
            assert_eq!(operation, Operation::Write);
            assert_eq!(path, std::path::PathBuf::from("/dev/full"));
        }
        other => panic!("expected write error, got {:?}", other),
    }
}
