use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Centralized layout management to prevent conflicts between views
pub struct TuiLayout {
    pub tab_bar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

impl TuiLayout {
    /// Create a new layout from the given area
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(4), // Status bar
            ])
            .split(area);

        Self {
            tab_bar: chunks[0],
            content: chunks[1],
            status_bar: chunks[2],
        }
    }

    /// Render the tab bar
    pub fn render_tab_bar(&self, f: &mut Frame, titles: Vec<String>, selected_tab: usize, user: &str) {
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Red Universitaria · {}", user)),
            )
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .select(selected_tab);

        f.render_widget(tabs, self.tab_bar);
    }

    /// Render the status bar with the view's key hints
    pub fn render_status_bar(&self, f: &mut Frame, hints: &[(&str, &str)], status_text: &str) {
        let mut hint_spans = Vec::new();
        for (i, (key, action)) in hints.iter().enumerate() {
            if i > 0 {
                hint_spans.push(Span::styled(" • ", Style::default().fg(Color::Gray)));
            }
            hint_spans.push(Span::styled(
                key.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            hint_spans.push(Span::styled(format!(" {}", action), Style::default().fg(Color::Gray)));
        }

        let status_content = vec![
            Line::from(hint_spans),
            Line::from(vec![Span::styled(status_text.to_string(), Style::default().fg(Color::Cyan))]),
        ];

        let paragraph = Paragraph::new(status_content)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, self.status_bar);
    }
}

/// Helper struct for view-specific layouts
pub struct ViewLayout {
    pub title: Rect,
    pub main_content: Rect,
    pub footer: Rect,
}

impl ViewLayout {
    /// Create a view layout within the given content area
    pub fn new(content_area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Footer
            ])
            .split(content_area);

        Self {
            title: chunks[0],
            main_content: chunks[1],
            footer: chunks[2],
        }
    }

    /// Split main content into horizontal sections
    pub fn split_main_content_horizontal(&self, constraints: &[Constraint]) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(self.main_content)
            .to_vec()
    }
}

/// Report layout: title, summary cards, ranked table
pub struct ReportLayout {
    pub title: Rect,
    pub cards: Rect,
    pub table: Rect,
}

impl ReportLayout {
    pub fn new(content_area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(4), // Summary cards
                Constraint::Min(0),    // Table
            ])
            .split(content_area);

        Self {
            title: chunks[0],
            cards: chunks[1],
            table: chunks[2],
        }
    }
}

/// Rectangle centered in `area` taking the given percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
