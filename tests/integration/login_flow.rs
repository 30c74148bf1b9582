use pretty_assertions::assert_eq;

use crate::common::FakeApi;
use uni_social::api::{SocialApi, CONNECTION_ERROR_MESSAGE};
use uni_social::auth::{LoginBlocked, LoginForm, LoginOutcome};
use uni_social::host::{HostEvent, RecordingNotifier};

#[tokio::test]
async fn test_login_notifies_host_and_exposes_user() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();

    let mut form = LoginForm::new();
    form.set_email("ana@uni.edu");
    form.set_password("secreto");

    assert_eq!(form.submit(&api, &notifier).await, Ok(LoginOutcome::LoggedIn));
    assert_eq!(notifier.events(), vec![HostEvent::LoggedIn]);
    assert_eq!(api.get_current_user().unwrap().display_name(), "ana");
}

#[tokio::test]
async fn test_empty_password_is_validated_locally() {
    let api = FakeApi::new();
    let mut form = LoginForm::new();
    form.set_email("ana@uni.edu");

    assert_eq!(
        form.submit(&api, &RecordingNotifier::new()).await,
        Err(LoginBlocked::MissingFields)
    );
    assert_eq!(api.network_calls(), 0);
    assert!(form.error().is_some());
}

#[tokio::test]
async fn test_rejected_credentials_show_backend_message() {
    let api = FakeApi {
        login_rejection: Some("Contraseña incorrecta".to_string()),
        ..FakeApi::new()
    };
    let notifier = RecordingNotifier::new();

    let mut form = LoginForm::new();
    form.set_email("ana@uni.edu");
    form.set_password("mala");

    let outcome = form.submit(&api, &notifier).await.unwrap();
    assert_eq!(outcome, LoginOutcome::Failed("Contraseña incorrecta".to_string()));
    assert_eq!(form.error(), Some("Contraseña incorrecta"));
    assert!(notifier.events().is_empty());
    assert!(api.get_current_user().is_none());
}

#[tokio::test]
async fn test_unreachable_backend_shows_connection_message() {
    let api = FakeApi::new();
    api.set_offline(true);

    let mut form = LoginForm::new();
    form.set_email("ana@uni.edu");
    form.set_password("secreto");

    let outcome = form.submit(&api, &RecordingNotifier::new()).await.unwrap();
    assert_eq!(outcome, LoginOutcome::Failed(CONNECTION_ERROR_MESSAGE.to_string()));
    assert!(!form.is_submitting());
}
