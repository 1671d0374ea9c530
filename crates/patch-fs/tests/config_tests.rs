use patch_fs::{ConfigStore, Error};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    name: String,
    anchor: String,
}

#[rstest]
#[case("sample.toml", "name = \"Audit\"\nanchor = \"activeTab\"\n")]
#[case("sample.json", r#"{"name": "Audit", "anchor": "activeTab"}"#)]
#[case("sample.yaml", "name: Audit\nanchor: activeTab\n")]
#[case("sample.yml", "name: Audit\nanchor: activeTab\n")]
fn test_load_by_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let sample: Sample = ConfigStore::new().load(&path).unwrap();

    assert_eq!(
        sample,
        Sample {
            name: "Audit".into(),
            anchor: "activeTab".into(),
        }
    );
}

#[test]
fn test_load_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sample.ini");
    fs::write(&path, "name=Audit").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();

    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}

#[test]
fn test_load_malformed_reports_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sample.toml");
    fs::write(&path, "name = ").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();

    match err {
        Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = ConfigStore::new()
        .load::<Sample>(&temp.path().join("absent.toml"))
        .unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}
