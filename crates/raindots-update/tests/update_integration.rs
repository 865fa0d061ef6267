//! End-to-end runs against a mock weather source and a temp calendar file.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use raindots_calendar::CalendarStore;
use raindots_core::{DaytimeWindow, Region, RegionCode, RunMode};
use raindots_update::{DaySummaryBuilder, UpdateOrchestrator};
use raindots_weather::{RetryPolicy, WeatherClassifier};

fn test_regions() -> Vec<Region> {
    RegionCode::ALL
        .iter()
        .enumerate()
        .map(|(i, code)| Region {
            code: *code,
            latitude: 30.0 + i as f64,
            longitude: 34.0 + i as f64,
        })
        .collect()
}

fn orchestrator(
    server: &MockServer,
    calendar_path: &Path,
    mode: RunMode,
    bootstrap_days: u32,
) -> UpdateOrchestrator {
    let classifier = WeatherClassifier::with_base_url(
        server.uri(),
        RetryPolicy::zero_delay(1),
        DaytimeWindow::default(),
        "Asia/Jerusalem",
    )
    .unwrap();
    let builder = DaySummaryBuilder::new(classifier, test_regions(), Duration::ZERO);
    let store = CalendarStore::new(calendar_path);
    UpdateOrchestrator::new(builder, store, mode, bootstrap_days)
}

fn hourly_body(date: &str, precipitation: f64) -> serde_json::Value {
    let times: Vec<String> = (0..24).map(|h| format!("{date}T{h:02}:00")).collect();
    let readings: Vec<f64> = (0..24)
        .map(|h| if h == 12 { precipitation } else { 0.0 })
        .collect();
    serde_json::json!({ "hourly": { "time": times, "precipitation": readings } })
}

async fn mount_day(server: &MockServer, date: &str, precipitation: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("start_date", date))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(date, precipitation)))
        .mount(server)
        .await;
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 6).unwrap()
}

// Scenario A: fresh document, incremental, dry day everywhere.
#[tokio::test]
async fn test_incremental_run_on_empty_document() {
    let mock_server = MockServer::start().await;
    mount_day(&mock_server, "2026-01-05", 0.0).await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");
    let orch = orchestrator(&mock_server, &ics, RunMode::Incremental, 30);

    let report = orch.run(today()).await.unwrap();
    assert_eq!(report.added, 1);

    let events = CalendarStore::new(&ics).load();
    assert_eq!(events.len(), 1);
    let event = &events["2026-01-05@weather"];
    assert_eq!(event.summary, "🟡HF 🟡TA 🟡JM 🟡BS");
}

// Scenario B: bootstrap re-requesting an already-recorded day must not
// touch it.
#[tokio::test]
async fn test_bootstrap_preserves_existing_event_bytes() {
    let mock_server = MockServer::start().await;
    mount_day(&mock_server, "2026-01-03", 0.0).await;
    mount_day(&mock_server, "2026-01-04", 0.0).await;
    mount_day(&mock_server, "2026-01-05", 0.0).await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");

    // Recomputing 2026-01-04 from the mock would yield all-🟡, so any
    // overwrite is visible.
    let existing_block = "BEGIN:VEVENT\n\
UID:2026-01-04@weather\n\
DTSTAMP:20260105T040000Z\n\
DTSTART;VALUE=DATE:20260104\n\
DTEND;VALUE=DATE:20260104\n\
SUMMARY:🔵HF 🔵TA 🔵JM 🔵BS\n\
END:VEVENT";
    let doc = format!(
        "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//Rain Dots//IL//HE\n{existing_block}\nEND:VCALENDAR\n"
    );
    std::fs::write(&ics, &doc).unwrap();

    let orch = orchestrator(&mock_server, &ics, RunMode::Bootstrap, 3);
    let report = orch.run(today()).await.unwrap();

    assert_eq!(report.dates.len(), 3);
    assert_eq!(report.added, 2);

    let text = std::fs::read_to_string(&ics).unwrap();
    assert!(
        text.contains(existing_block),
        "pre-existing event must stay byte-identical"
    );
    assert_eq!(CalendarStore::new(&ics).load().len(), 3);
}

// Scenario C: successful response with an empty series renders the no-data
// glyph and does not abort the run.
#[tokio::test]
async fn test_empty_series_renders_unknown() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": { "time": [], "precipitation": [] }
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");
    let orch = orchestrator(&mock_server, &ics, RunMode::Incremental, 30);

    orch.run(today()).await.unwrap();

    let events = CalendarStore::new(&ics).load();
    assert_eq!(events["2026-01-05@weather"].summary, "⚪HF ⚪TA ⚪JM ⚪BS");
}

// Scenario D, bootstrap half: every request fails, yet each day is still
// written as all-unknown and the run completes.
#[tokio::test]
async fn test_bootstrap_survives_total_source_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");
    let orch = orchestrator(&mock_server, &ics, RunMode::Bootstrap, 2);

    let report = orch.run(today()).await.unwrap();
    assert_eq!(report.added, 2);

    let events = CalendarStore::new(&ics).load();
    assert_eq!(events.len(), 2);
    for event in events.values() {
        assert_eq!(event.summary, "⚪HF ⚪TA ⚪JM ⚪BS");
    }
}

// Scenario D, incremental half: the same failure is fatal when only one
// day is at stake.
#[tokio::test]
async fn test_incremental_fails_on_total_source_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");
    let orch = orchestrator(&mock_server, &ics, RunMode::Incremental, 30);

    let result = orch.run(today()).await;
    assert!(result.is_err());
    assert!(!ics.exists(), "a failed incremental run must not write");
}

// Running the same range twice with identical source data changes nothing.
#[tokio::test]
async fn test_rerun_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_day(&mock_server, "2026-01-05", 3.2).await;

    let dir = tempfile::tempdir().unwrap();
    let ics = dir.path().join("weather.ics");
    let orch = orchestrator(&mock_server, &ics, RunMode::Incremental, 30);

    let first = orch.run(today()).await.unwrap();
    assert_eq!(first.added, 1);
    let first_text = std::fs::read_to_string(&ics).unwrap();

    let second = orch.run(today()).await.unwrap();
    assert_eq!(second.added, 0);
    let second_text = std::fs::read_to_string(&ics).unwrap();

    assert_eq!(first_text, second_text);
}
