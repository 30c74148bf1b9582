//! Notifications widgets send to whoever hosts them

use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Events a widget raises towards the host shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    LoggedIn,
    PostCreated,
    SwitchToRegister,
}

/// Callback interface injected into widgets
pub trait HostNotifier: Send + Sync {
    fn on_login(&self);
    fn on_post_created(&self);
    fn on_switch_to_register(&self);
}

impl HostNotifier for mpsc::UnboundedSender<HostEvent> {
    fn on_login(&self) {
        if self.send(HostEvent::LoggedIn).is_err() {
            debug!("Host is gone, dropping login notification");
        }
    }

    fn on_post_created(&self) {
        if self.send(HostEvent::PostCreated).is_err() {
            debug!("Host is gone, dropping post notification");
        }
    }

    fn on_switch_to_register(&self) {
        if self.send(HostEvent::SwitchToRegister).is_err() {
            debug!("Host is gone, dropping register notification");
        }
    }
}

/// Notifier that just remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: HostEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl HostNotifier for RecordingNotifier {
    fn on_login(&self) {
        self.push(HostEvent::LoggedIn);
    }

    fn on_post_created(&self) {
        self.push(HostEvent::PostCreated);
    }

    fn on_switch_to_register(&self) {
        self.push(HostEvent::SwitchToRegister);
    }
}
