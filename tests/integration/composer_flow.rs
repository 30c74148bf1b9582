//! Post composer against the in-memory backend

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;

use crate::common::fixtures::png_file;
use crate::common::logging::{init_test_logging, log_test_step};
use crate::common::FakeApi;
use uni_social::api::CONNECTION_ERROR_MESSAGE;
use uni_social::composer::{publish, ComposerStatus, PostComposer, PostDraft, SubmitBlocked, SubmitOutcome};
use uni_social::host::{HostEvent, RecordingNotifier};
use uni_social::models::Visibility;

#[tokio::test]
async fn test_whitespace_post_never_reaches_backend() {
    init_test_logging();
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();

    let mut composer = PostComposer::new();
    composer.set_text(" \n  \t ");
    let result = composer.submit(&api, &notifier).await;

    assert_eq!(result, Err(SubmitBlocked::EmptyText));
    assert_eq!(api.network_calls(), 0);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_second_submit_in_flight_sends_one_post() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    let mut composer = PostComposer::new();
    composer.set_text("Primera");

    let submission = composer.begin_submit().unwrap();
    assert_eq!(composer.begin_submit(), Err(SubmitBlocked::InFlight));

    let result = publish(&api, &submission).await;
    assert_eq!(composer.finish_submit(result, &notifier), SubmitOutcome::Posted);
    assert_eq!(FakeApi::calls(&api.create_calls), 1);
}

#[tokio::test]
async fn test_image_post_carries_marker_line() {
    log_test_step("Publishing with an uploaded image");
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi {
        upload_url: Some("https://cdn.uni.edu/img/42.png".to_string()),
        ..FakeApi::new()
    };
    let notifier = RecordingNotifier::new();

    let mut composer = PostComposer::new();
    composer.set_text("Feria de ciencias");
    composer.set_visibility(Visibility::ConnectionsOnly);
    composer.attach_image(&png_file(dir.path(), "feria.png")).unwrap();

    let outcome = composer.submit(&api, &notifier).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Posted);

    let posts = api.sent_posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].texto, "Feria de ciencias\n\n[Imagen: https://cdn.uni.edu/img/42.png]");
    assert_eq!(posts[0].visibilidad, Visibility::ConnectionsOnly);

    assert_eq!(composer.draft(), &PostDraft::default());
    assert_eq!(notifier.events(), vec![HostEvent::PostCreated]);
}

#[tokio::test]
async fn test_upload_failure_posts_text_without_marker() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi {
        upload_fails: true,
        ..FakeApi::new()
    };

    let mut composer = PostComposer::new();
    composer.set_text("Solo texto");
    composer.attach_image(&png_file(dir.path(), "x.png")).unwrap();

    let outcome = composer.submit(&api, &RecordingNotifier::new()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Posted);
    assert_eq!(FakeApi::calls(&api.upload_calls), 1);

    let posts = api.sent_posts();
    assert_eq!(posts[0].texto, "Solo texto");
    assert!(!posts[0].texto.contains("[Imagen"));
}

#[tokio::test]
async fn test_rejection_keeps_draft_and_shows_message() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi {
        upload_url: Some("u".to_string()),
        create_rejection: Some("Publicación duplicada".to_string()),
        ..FakeApi::new()
    };
    let notifier = RecordingNotifier::new();

    let mut composer = PostComposer::new();
    composer.set_text("Hola");
    composer.attach_image(&png_file(dir.path(), "a.png")).unwrap();
    let before = composer.draft().clone();

    let outcome = composer.submit(&api, &notifier).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Failed("Publicación duplicada".to_string()));
    assert_eq!(composer.draft(), &before);
    assert!(composer.draft().preview.is_some());
    assert_eq!(composer.status(), ComposerStatus::Idle);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_offline_backend_shows_connection_message() {
    let api = FakeApi::new();
    api.offline.store(true, Ordering::SeqCst);

    let mut composer = PostComposer::new();
    composer.set_text("Hola");
    let outcome = composer.submit(&api, &RecordingNotifier::new()).await.unwrap();

    assert_matches!(outcome, SubmitOutcome::Failed(ref m) if m == CONNECTION_ERROR_MESSAGE);
    assert_eq!(composer.draft().text, "Hola");
    assert_eq!(composer.error(), Some(CONNECTION_ERROR_MESSAGE));
}
