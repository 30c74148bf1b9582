//! Terminal shell driven by key events, with requests answered by the in-memory backend

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::common::FakeApi;
use uni_social::ui::events::TuiEvent;
use uni_social::ui::{Screen, SocialTuiApp};

fn press(app: &mut SocialTuiApp, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
}

fn ctrl(app: &mut SocialTuiApp, c: char) {
    app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
        .unwrap();
}

fn type_text(app: &mut SocialTuiApp, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

async fn pump(app: &mut SocialTuiApp, rx: &mut mpsc::UnboundedReceiver<TuiEvent>) {
    let event = rx.recv().await.expect("a request result");
    app.handle_event(event).unwrap();
}

#[tokio::test]
async fn test_login_then_publish() {
    let api = Arc::new(FakeApi::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = SocialTuiApp::new(api.clone(), tx);
    assert_eq!(app.screen, Screen::Login);

    type_text(&mut app, "ana@uni.edu");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secreto");
    press(&mut app, KeyCode::Enter);
    assert!(app.login_view.form.is_submitting());

    pump(&mut app, &mut rx).await;
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.composer_view.user.as_ref().map(|u| u.display_name()), Some("ana"));

    type_text(&mut app, "Hola campus");
    ctrl(&mut app, 'v');
    ctrl(&mut app, 'p');
    pump(&mut app, &mut rx).await;

    let posts = api.sent_posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].texto, "Hola campus");
    assert!(app.composer_view.composer.draft().text.is_empty());
}

#[tokio::test]
async fn test_report_tabs_fetch_on_each_visit() {
    let api = Arc::new(FakeApi::with_rows(json!([
        { "referente": "Ana", "score_autoridad": 5 }
    ])));
    *api.user.lock().unwrap() = Some(Default::default());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = SocialTuiApp::new(api.clone(), tx);
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(FakeApi::calls(&api.preview_calls), 0);

    press(&mut app, KeyCode::Tab);
    pump(&mut app, &mut rx).await;
    assert_eq!(app.report_views[0].viewer.rows().len(), 1);

    press(&mut app, KeyCode::Tab);
    pump(&mut app, &mut rx).await;
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.current_view, 0);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.current_view, 1);
    assert!(app.report_views[0].viewer.is_loading());
    pump(&mut app, &mut rx).await;

    assert_eq!(FakeApi::calls(&api.preview_calls), 3);
    assert_eq!(app.report_views[0].viewer.rows().len(), 1);
}

#[tokio::test]
async fn test_escape_quits() {
    let api = Arc::new(FakeApi::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut app = SocialTuiApp::new(api, tx);

    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit);
}
