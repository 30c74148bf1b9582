use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::ApiError;
use crate::composer::PublishResult;
use crate::models::{LoginResponse, PreviewResponse};
use crate::reports::ReportId;

/// Unified TUI events
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    LoginFinished(Result<LoginResponse, ApiError>),
    PublishFinished(PublishResult),
    ReportLoaded(ReportId, Result<PreviewResponse, ApiError>),
    PdfFinished(ReportId, Result<PathBuf, ApiError>),
}

/// Event manager for handling all TUI events
pub struct EventManager {
    event_sender: mpsc::UnboundedSender<TuiEvent>,
    event_receiver: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventManager {
    /// Create a new event manager
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel::<TuiEvent>();
        Self {
            event_sender,
            event_receiver,
        }
    }

    /// Get a clone of the event sender for use in async tasks
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.event_sender.clone()
    }

    /// Try to receive an event (non-blocking)
    pub fn try_receive(&mut self) -> Option<TuiEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for a terminal event and queue it
    pub fn poll_terminal(&self, timeout: Duration) -> anyhow::Result<()> {
        if crossterm::event::poll(timeout)? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let _ = self.event_sender.send(TuiEvent::Key(key));
                }
                Event::Resize(w, h) => {
                    let _ = self.event_sender.send(TuiEvent::Resize(w, h));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}
