#![no_main]
use libfuzzer_sys::fuzz_target;
use vehicle_store::{RecordStore, RECORD_SIZE};

fuzz_target!(|data: &[u8]| {
    let dir = match tempfile::TempDir::new() {
        Ok(d) => d,
        Err(_) => return,
    };
    let store = RecordStore::new(dir.path().join("fuzz.bin"));
    if std::fs::write(store.path(), data).is_err() {
        return;
    }

    let scan = match store.scan() {
        Ok(s) => s,
        Err(_) => return,
    };

    // At most one result per block plus one for a partial tail
    let results: Vec<_> = scan.collect();
    assert!(results.len() <= data.len() / RECORD_SIZE + 1);
    if let Some(pos) = results.iter().position(|r| r.is_err()) {
        assert_eq!(pos, results.len() - 1);
    }
});
