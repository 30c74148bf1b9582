use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{prelude::Rect, Frame};

use crate::composer::Submission;
use crate::reports::ReportId;

/// Work a view asks the app to run outside the render loop
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Publish(Submission),
    LoadReport(ReportId),
    DownloadReport(ReportId),
    SwitchToRegister,
}

/// View contract for all TUI views (non-async for trait object compatibility)
pub trait View {
    /// Render the view
    fn render(&self, f: &mut Frame, area: Rect);

    /// Get the view title
    fn get_title(&self) -> String;

    /// Get the view status text
    fn get_status(&self) -> String;

    /// Key hints shown in the status bar
    fn get_hints(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    /// Handle view-specific key events, optionally asking for async work
    fn handle_key(&mut self, _key: KeyEvent) -> Result<Option<Command>> {
        Ok(None) // Default: not handled
    }
}
