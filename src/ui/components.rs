/// UI components shared by the views
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::layout::centered_rect;
use crate::reports::{Alert, MetricValue};

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, message: &str) {
    let loading = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title("Cargando"))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(loading, area);
}

/// Render an inline error, optionally with a retry hint
pub fn render_error(f: &mut Frame, area: Rect, error: &str, retry_key: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        error.to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))];
    if let Some(key) = retry_key {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Presiona ", Style::default().fg(Color::Gray)),
            Span::styled(key.to_string(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" para reintentar", Style::default().fg(Color::Gray)),
        ]));
    }

    let error_paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area);
}

/// Render a message in place of an empty table
pub fn render_empty(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::DarkGray));

    f.render_widget(paragraph, area);
}

/// Blocking popup; the app swallows input until it is dismissed
pub fn render_alert(f: &mut Frame, alert: &Alert) {
    let area = centered_rect(60, 25, f.area());
    let body = vec![
        Line::from(alert.message.clone()),
        Line::from(""),
        Line::from(Span::styled("Presiona cualquier tecla para continuar", Style::default().fg(Color::Gray))),
    ];

    let popup = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(alert.title.clone())
                .border_style(Style::default().fg(Color::Red)),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Row of summary cards
pub fn render_metric_cards(f: &mut Frame, area: Rect, metrics: &[MetricValue]) {
    if metrics.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = metrics
        .iter()
        .map(|_| Constraint::Ratio(1, metrics.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, chunk) in metrics.iter().zip(chunks.iter()) {
        let card = Paragraph::new(Span::styled(
            metric.value.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(metric.label));
        f.render_widget(card, *chunk);
    }
}

/// Style for the rank badge of a row; the first three stand out
pub fn rank_style(index: usize) -> Style {
    match index {
        0 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        1 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        2 => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Gray),
    }
}

/// Whether a row gets podium highlighting
pub fn is_podium(index: usize) -> bool {
    index < 3
}
