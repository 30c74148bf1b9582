use anyhow::Result;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    api::{HttpApiClient, SocialApi},
    composer::publish,
    host::HostEvent,
    models::Config,
    reports::{Alert, DownloadOutcome, ReportId},
    ui::{
        components::render_alert,
        composer_view::ComposerView,
        events::{EventManager, TuiEvent},
        layout::TuiLayout,
        login_view::LoginView,
        report_view::ReportView,
        Command, View,
    },
};

const REGISTER_NOTICE: &str = "El registro de cuentas se realiza en el portal web de la universidad.";
const POST_CREATED_NOTICE: &str = "¡Publicación creada!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

/// Terminal shell hosting the login form, the composer and the report tabs
pub struct SocialTuiApp {
    pub should_quit: bool,
    pub screen: Screen,
    pub current_view: usize, // 0 = composer, 1.. = reports
    pub login_view: LoginView,
    pub composer_view: ComposerView,
    pub report_views: Vec<ReportView>,
    pub alert: Option<Alert>,
    banner: Option<String>,
    api: Arc<dyn SocialApi>,
    event_sender: mpsc::UnboundedSender<TuiEvent>,
    host_sender: mpsc::UnboundedSender<HostEvent>,
    host_receiver: mpsc::UnboundedReceiver<HostEvent>,
}

impl SocialTuiApp {
    pub fn new(api: Arc<dyn SocialApi>, event_sender: mpsc::UnboundedSender<TuiEvent>) -> Self {
        let (host_sender, host_receiver) = mpsc::unbounded_channel();
        let user = api.get_current_user();
        let screen = if user.is_some() { Screen::Main } else { Screen::Login };
        info!("Starting on {:?} screen", screen);

        Self {
            should_quit: false,
            screen,
            current_view: 0,
            login_view: LoginView::new(),
            composer_view: ComposerView::new(user),
            report_views: ReportId::ALL.iter().map(|id| ReportView::new(*id)).collect(),
            alert: None,
            banner: None,
            api,
            event_sender,
            host_sender,
            host_receiver,
        }
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    fn tab_count(&self) -> usize {
        1 + self.report_views.len()
    }

    fn current(&self) -> &dyn View {
        match self.screen {
            Screen::Login => &self.login_view,
            Screen::Main => match self.current_view {
                0 => &self.composer_view,
                i => &self.report_views[i - 1],
            },
        }
    }

    fn current_mut(&mut self) -> &mut dyn View {
        match self.screen {
            Screen::Login => &mut self.login_view,
            Screen::Main => match self.current_view {
                0 => &mut self.composer_view,
                i => &mut self.report_views[i - 1],
            },
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let layout = TuiLayout::new(f.area());
        let view = self.current();

        let (titles, selected) = match self.screen {
            Screen::Login => (vec![view.get_title()], 0),
            Screen::Main => {
                let mut titles = vec![self.composer_view.get_title()];
                titles.extend(self.report_views.iter().map(|v| v.get_title()));
                (titles, self.current_view)
            }
        };
        let user = self
            .composer_view
            .user
            .as_ref()
            .map(|u| u.display_name().to_string())
            .unwrap_or_default();
        layout.render_tab_bar(f, titles, selected, &user);

        view.render(f, layout.content);

        let status = self.banner.clone().unwrap_or_else(|| view.get_status());
        layout.render_status_bar(f, &view.get_hints(), &status);

        if let Some(alert) = &self.alert {
            render_alert(f, alert);
        }
    }

    /// Apply one event from the loop channel
    pub fn handle_event(&mut self, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key)?,
            TuiEvent::Resize(w, h) => debug!("Terminal resized to {}x{}", w, h),
            TuiEvent::LoginFinished(result) => {
                self.login_view.form.finish_submit(result, &self.host_sender);
            }
            TuiEvent::PublishFinished(result) => {
                self.composer_view.composer.finish_submit(result, &self.host_sender);
            }
            TuiEvent::ReportLoaded(id, result) => {
                if let Some(view) = self.report_view_mut(id) {
                    view.viewer.finish_load(result);
                }
            }
            TuiEvent::PdfFinished(id, result) => {
                let outcome = match self.report_view_mut(id) {
                    Some(view) => view.viewer.finish_download(result),
                    None => DownloadOutcome::Skipped,
                };
                match outcome {
                    DownloadOutcome::Saved(path) => {
                        self.banner = Some(format!("PDF guardado en {}", path.display()));
                    }
                    DownloadOutcome::Failed(alert) => self.alert = Some(alert),
                    DownloadOutcome::Skipped => {}
                }
            }
        }
        self.process_host_events();
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // The popup swallows the key that dismisses it
        if self.alert.take().is_some() {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        let typing_path = self.screen == Screen::Main
            && self.current_view == 0
            && self.composer_view.is_typing_path();
        if !typing_path {
            match key.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Tab if self.screen == Screen::Main => {
                    self.select_tab((self.current_view + 1) % self.tab_count());
                    return Ok(());
                }
                KeyCode::BackTab if self.screen == Screen::Main => {
                    let count = self.tab_count();
                    self.select_tab((self.current_view + count - 1) % count);
                    return Ok(());
                }
                _ => {}
            }
        }

        self.banner = None;
        if let Some(command) = self.current_mut().handle_key(key)? {
            self.dispatch(command);
        }
        Ok(())
    }

    pub fn select_tab(&mut self, tab: usize) {
        if tab >= self.tab_count() {
            return;
        }
        self.current_view = tab;
        self.banner = None;
        if tab > 0 {
            if let Some(command) = self.report_views[tab - 1].activate() {
                self.dispatch(command);
            }
        }
    }

    fn report_view_mut(&mut self, id: ReportId) -> Option<&mut ReportView> {
        self.report_views.iter_mut().find(|v| v.viewer.id() == id)
    }

    /// Run a view's request off the render loop; the result comes back as a `TuiEvent`
    fn dispatch(&mut self, command: Command) {
        let api = Arc::clone(&self.api);
        let sender = self.event_sender.clone();

        match command {
            Command::Login { email, password } => {
                tokio::spawn(async move {
                    let result = api.login(&email, &password).await;
                    let _ = sender.send(TuiEvent::LoginFinished(result));
                });
            }
            Command::Publish(submission) => {
                tokio::spawn(async move {
                    let result = publish(api.as_ref(), &submission).await;
                    let _ = sender.send(TuiEvent::PublishFinished(result));
                });
            }
            Command::LoadReport(id) => {
                tokio::spawn(async move {
                    let result = api.get_report_preview(id).await;
                    let _ = sender.send(TuiEvent::ReportLoaded(id, result));
                });
            }
            Command::DownloadReport(id) => {
                tokio::spawn(async move {
                    let result = api.download_report_pdf(id).await;
                    let _ = sender.send(TuiEvent::PdfFinished(id, result));
                });
            }
            Command::SwitchToRegister => {
                self.login_view.form.switch_to_register(&self.host_sender);
                self.process_host_events();
            }
        }
    }

    fn process_host_events(&mut self) {
        while let Ok(event) = self.host_receiver.try_recv() {
            debug!("Host event: {:?}", event);
            match event {
                HostEvent::LoggedIn => {
                    self.screen = Screen::Main;
                    self.composer_view.user = self.api.get_current_user();
                    self.banner = None;
                    self.select_tab(0);
                }
                HostEvent::PostCreated => self.composer_view.set_notice(POST_CREATED_NOTICE),
                HostEvent::SwitchToRegister => self.banner = Some(REGISTER_NOTICE.to_string()),
            }
        }
    }
}

/// Run the interactive terminal app until the user quits
pub async fn run_app(config: Config) -> Result<()> {
    let api: Arc<dyn SocialApi> = Arc::new(HttpApiClient::new(&config)?);
    let mut events = EventManager::new();
    let mut app = SocialTuiApp::new(api, events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    // Restore the terminal even when the loop failed
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut SocialTuiApp,
    events: &mut EventManager,
) -> Result<()> {
    loop {
        let mut processed = false;
        while let Some(event) = events.try_receive() {
            app.handle_event(event)?;
            processed = true;
            if app.should_quit {
                info!("Quitting");
                return Ok(());
            }
        }

        terminal.draw(|f| app.draw(f))?;
        events.poll_terminal(Duration::ZERO)?;

        let delay_ms = if processed { 8 } else { 16 };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
