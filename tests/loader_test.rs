//! Loading datasets from disk.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::time::Duration;

use gapminder_viz::data::{load, load_with_timeout, Timeline};
use gapminder_viz::{Error, ErrorKind};

const SAMPLE: &str = r#"[
  {"year": "1800", "countries": [
    {"country": "afghanistan", "continent": "asia", "income": 603, "life_exp": 28.21, "population": 3280000},
    {"country": "albania", "continent": "europe", "income": 667, "life_exp": 35.4, "population": 410445},
    {"country": "andorra", "continent": "europe", "income": null, "life_exp": null, "population": 2654}
  ]},
  {"year": "1801", "countries": [
    {"country": "afghanistan", "continent": "asia", "income": "603", "life_exp": "28.2", "population": 3280000},
    {"country": "albania", "continent": "europe", "income": 667, "life_exp": 0, "population": 411000}
  ]}
]"#;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_temp(SAMPLE);
    let timeline = load(file.path()).unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.base_year(), 1800);

    let first = timeline.get(0).unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.get("andorra").is_none());

    // String numerals are coerced; life_exp 0 is falsy and dropped.
    let second = timeline.get(1).unwrap();
    assert_eq!(second.len(), 1);
    let afghanistan = second.get("afghanistan").unwrap();
    assert!((afghanistan.income - 603.0).abs() < f64::EPSILON);
    assert!((afghanistan.life_exp - 28.2).abs() < 1e-9);
}

#[test]
fn test_load_missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Load);
}

#[test]
fn test_load_malformed_json() {
    let file = write_temp("{\"year\": 1800");
    let err = load(file.path()).unwrap_err();
    assert!(err.is_load_error());
}

#[test]
fn test_from_reader_matches_from_str() {
    let from_reader = Timeline::from_reader(SAMPLE.as_bytes()).unwrap();
    let from_str = Timeline::from_json_str(SAMPLE).unwrap();
    assert_eq!(from_reader.len(), from_str.len());
    assert_eq!(from_reader.get(1), from_str.get(1));
}

#[tokio::test]
async fn test_load_with_timeout_reads_file() {
    let file = write_temp(SAMPLE);
    let timeline = load_with_timeout(file.path(), Duration::from_secs(5), 1800).await.unwrap();
    assert_eq!(timeline.len(), 2);
}

#[tokio::test]
async fn test_load_with_timeout_unlabelled_years_use_base() {
    let file = write_temp(
        r#"[{"countries": [{"country": "a", "continent": "asia", "income": 1, "life_exp": 1, "population": 1}]},
            {"countries": []}]"#,
    );
    let timeline = load_with_timeout(file.path(), Duration::from_secs(5), 1950).await.unwrap();
    assert_eq!(timeline.base_year(), 1950);
    assert_eq!(timeline.year_at(1), 1951);
}

#[tokio::test]
async fn test_load_with_timeout_missing_file() {
    let err = load_with_timeout("/nonexistent/data.json", Duration::from_secs(1), 1800)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
}

/// A FIFO with no writer blocks the read until the timeout fires.
#[cfg(unix)]
#[tokio::test]
async fn test_load_with_timeout_fires_on_stalled_source() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = dir.path().join("stalled.json");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success());

    let timeout = Duration::from_millis(200);
    let err = load_with_timeout(&fifo, timeout, 1800).await.unwrap_err();

    assert!(matches!(err, Error::LoadTimeout(t) if t == timeout), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(err.to_string().contains("timed out"));

    // Release the blocked reader so the runtime can shut down.
    drop(std::fs::OpenOptions::new().write(true).open(&fifo).unwrap());
}
