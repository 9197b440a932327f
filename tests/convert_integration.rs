//! Integration tests for the conversion pipeline

use std::fs;
use tempfile::TempDir;
use vehicle_store::{Config, Converter, FormatKind, Vehicle};

fn fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new(1, "Civic", "Honda", 6.5, 120),
        Vehicle::new(2, "Golf", "VW", 7.0, 110),
        Vehicle::new(3, "Clio", "Renault", 5.25, 90),
    ]
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        store_path: dir.path().join("copies/vehicles.bin"),
        input_dir: dir.path().join("data_in"),
        output_dir: dir.path().join("data_out"),
        ..Config::default()
    }
}

#[test]
fn test_every_source_written_in_every_format() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();

    for kind in FormatKind::ALL {
        kind.adapter()
            .write(&config.source_path(kind), &fleet())
            .unwrap();
    }

    let report = Converter::new(&config).run().unwrap();

    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.sources.len(), 4);
    assert_eq!(report.written.len(), 16);

    for source in FormatKind::ALL {
        for target in FormatKind::ALL {
            let out = config.output_path(source, target);
            assert!(out.is_file(), "missing {:?}", out);

            let read = target.adapter().read(&out).unwrap();
            assert!(read.skipped.is_empty());
            assert_eq!(read.records, fleet(), "{:?}", out);
        }
    }
}

#[test]
fn test_bad_text_rows_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();

    fs::write(
        config.source_path(FormatKind::Csv),
        "1;Civic;Honda;6.5;120\n\
         2;Golf;VW;not-a-number;110\n\
         3;Clio\n\
         4;Ibiza;Seat;5.5;95\n",
    )
    .unwrap();

    let report = Converter::new(&config).run().unwrap();

    let csv = report
        .sources
        .iter()
        .find(|s| s.kind == FormatKind::Csv)
        .unwrap();
    assert_eq!(csv.records, 2);
    assert_eq!(csv.skipped, 2);
    assert!(!report.is_clean());

    // The other three sources are missing
    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.written.len(), 4);

    let json = config.output_path(FormatKind::Csv, FormatKind::Json);
    let ids: Vec<_> = FormatKind::Json
        .adapter()
        .read(&json)
        .unwrap()
        .records
        .iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec![1, 4]);
}

#[test]
fn test_corrupt_binary_source_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();

    fs::write(config.source_path(FormatKind::Binary), [0u8; 50]).unwrap();
    FormatKind::Json
        .adapter()
        .write(&config.source_path(FormatKind::Json), &fleet())
        .unwrap();

    let report = Converter::new(&config).run().unwrap();

    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].kind, FormatKind::Json);
    assert!(report
        .failures
        .iter()
        .any(|f| f.path == config.source_path(FormatKind::Binary)));
    assert!(!config
        .output_path(FormatKind::Binary, FormatKind::Csv)
        .exists());
}

#[test]
fn test_nan_fuel_fails_json_output_instead_of_losing_it() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();

    let source = vec![Vehicle::new(1, "Civic", "Honda", f64::NAN, 120)];
    FormatKind::Binary
        .adapter()
        .write(&config.source_path(FormatKind::Binary), &source)
        .unwrap();

    let report = Converter::new(&config).run().unwrap();

    let json = config.output_path(FormatKind::Binary, FormatKind::Json);
    // The three other sources are missing and reported too
    assert_eq!(report.failures.len(), 4);
    let failed: Vec<_> = report.failures.iter().filter(|f| f.path == json).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].reason.contains("vehicle 1"));
    assert!(!json.exists());
    assert!(!report.is_clean());
    assert_eq!(report.written.len(), 3);

    let bin = config.output_path(FormatKind::Binary, FormatKind::Binary);
    let back = FormatKind::Binary.adapter().read(&bin).unwrap().records;
    assert!(back[0].fuel_consumption.is_nan());
}
