//! Report viewer lifecycle: load, retry, export

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use crate::common::FakeApi;
use uni_social::api::CONNECTION_ERROR_MESSAGE;
use uni_social::reports::{DownloadOutcome, ReportId, ReportState, ReportViewer};

#[tokio::test]
async fn test_load_computes_summary_and_keeps_row_order() {
    init_test_logging();
    log_test_step("Loading the authority ranking");

    let api = FakeApi::with_rows(json!([
        { "referente": "Ana", "correo": "a@x.edu", "score_autoridad": "50" },
        { "referente": "Bo", "correo": "b@x.edu", "score_autoridad": 80 }
    ]));
    let mut viewer = ReportViewer::for_report(ReportId::AuthorityRanking);
    assert!(viewer.is_loading());
    assert!(viewer.summary().is_none());

    viewer.load(&api).await;

    let summary = viewer.summary().unwrap();
    log_test_data("summary", &summary);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.max, 80.0);
    assert_eq!(summary.average, "65.0");
    assert_eq!(summary.top, "Ana");

    let names: Vec<String> = viewer.rows().iter().filter_map(|r| r.text("referente")).collect();
    assert_eq!(names, vec!["Ana", "Bo"]);
}

#[tokio::test]
async fn test_empty_preview_is_loaded_not_failed() {
    let api = FakeApi::with_rows(json!([]));
    let mut viewer = ReportViewer::for_report(ReportId::AreaDemand);
    viewer.load(&api).await;

    assert_eq!(viewer.state(), &ReportState::Loaded(Vec::new()));
    let summary = viewer.summary().unwrap();
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, "0");
    assert_eq!(summary.top, "N/A");
}

#[tokio::test]
async fn test_failure_then_retry_recovers() {
    let api = FakeApi::with_rows(json!([{ "area_conocimiento": "Álgebra", "total_solicitudes_area": 4 }]));
    api.set_offline(true);

    let mut viewer = ReportViewer::for_report(ReportId::AreaDemand);
    viewer.load(&api).await;
    assert_eq!(viewer.error(), Some(CONNECTION_ERROR_MESSAGE));
    assert!(viewer.summary().is_none());

    api.set_offline(false);
    assert!(viewer.retry(&api).await);
    assert!(viewer.error().is_none());
    assert_eq!(viewer.rows().len(), 1);
    assert_eq!(FakeApi::calls(&api.preview_calls), 2);

    // Nothing to retry once loaded
    assert!(!viewer.retry(&api).await);
    assert_eq!(FakeApi::calls(&api.preview_calls), 2);
}

#[tokio::test]
async fn test_pdf_download_does_not_touch_preview() {
    let api = FakeApi::with_rows(json!([{ "referente": "Ana", "score_autoridad": 1 }]));
    let mut viewer = ReportViewer::for_report(ReportId::AuthorityRanking);
    viewer.load(&api).await;
    let before = viewer.state().clone();

    let outcome = viewer.download_pdf(&api).await;
    assert_matches!(outcome, DownloadOutcome::Saved(_));
    assert_eq!(viewer.state(), &before);
    assert!(viewer.last_download().is_some());
    assert!(!viewer.is_downloading());
}

#[tokio::test]
async fn test_failed_pdf_download_produces_alert() {
    let api = FakeApi::new();
    let mut viewer = ReportViewer::for_report(ReportId::AuthorityRanking);
    viewer.load(&api).await;

    api.set_offline(true);
    let outcome = viewer.download_pdf(&api).await;
    assert_matches!(outcome, DownloadOutcome::Failed(ref alert) if alert.message.contains(CONNECTION_ERROR_MESSAGE));
    assert_eq!(viewer.state(), &ReportState::Loaded(Vec::new()));
    assert!(!viewer.is_downloading());
}

#[tokio::test]
async fn test_concurrent_download_is_skipped() {
    let api = FakeApi::new();
    let mut viewer = ReportViewer::for_report(ReportId::AreaDemand);

    assert_eq!(viewer.begin_download(), Some(ReportId::AreaDemand));
    assert_eq!(viewer.download_pdf(&api).await, DownloadOutcome::Skipped);
    assert_eq!(FakeApi::calls(&api.pdf_calls), 0);
}
