mod common;

use std::fs;

use landroute_lib::{
    load_dataset, resolve_dataset_path, write_borders, CountryDataset, CountryMetadataProvider,
    Error,
};

use common::{fixture_countries_path, fixture_dataset};

#[test]
fn raw_fixture_loads_every_coded_country() {
    let dataset = fixture_dataset();
    assert_eq!(dataset.len(), 35);

    let germany = dataset.get("DEU").expect("Germany present");
    assert_eq!(germany.cioc.as_deref(), Some("GER"));
    assert!(germany.names.iter().any(|name| name == "Deutschland"));

    let iceland = dataset.get("ISL").expect("Iceland present");
    assert!(iceland.borders.is_empty());
}

#[test]
fn borders_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out").join("borders.json");
    let dataset = fixture_dataset();

    write_borders(&dataset, &output).expect("borders written");
    let reloaded = CountryDataset::load(&output).expect("compact layout loads");

    assert_eq!(reloaded, dataset);
    assert_eq!(
        reloaded.countries().unwrap(),
        dataset.countries().unwrap()
    );

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(raw["AND"]["borders"], serde_json::json!(["ESP", "FRA"]));
    assert_eq!(raw["AND"]["cca3"], "AND");
}

#[test]
fn empty_dataset_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("borders.json");
    let empty = CountryDataset::from_json_str("[]").unwrap();

    let err = write_borders(&empty, &output).expect_err("nothing to write");
    assert!(matches!(err, Error::EmptyDataset));
    assert!(!output.exists());
}

#[test]
fn explicit_directory_resolves_to_countries_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture_countries_path(), dir.path().join("countries.json")).unwrap();

    let resolved = resolve_dataset_path(Some(dir.path())).unwrap();
    assert_eq!(resolved, dir.path().join("countries.json"));
    assert_eq!(load_dataset(Some(dir.path())).unwrap().len(), 35);
}

#[test]
fn missing_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere.json");

    let err = load_dataset(Some(missing.as_path())).expect_err("file absent");
    assert!(matches!(err, Error::DatasetNotFound { path } if path == missing));
}

#[test]
fn malformed_dataset_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countries.json");
    fs::write(&path, "{ \"broken\": ").unwrap();

    let err = CountryDataset::load(&path).expect_err("malformed");
    assert!(matches!(err, Error::Json(_)));
}
