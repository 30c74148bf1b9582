use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::components::{
    is_podium, rank_style, render_empty, render_error, render_loading_indicator, render_metric_cards,
};
use super::layout::ReportLayout;
use super::view::{Command, View};
use crate::reports::{ReportId, ReportState, ReportViewer};

/// One report tab
pub struct ReportView {
    pub viewer: ReportViewer,
}

impl ReportView {
    pub fn new(id: ReportId) -> Self {
        Self {
            viewer: ReportViewer::for_report(id),
        }
    }

    /// Every time the tab is shown the preview is fetched again
    pub fn activate(&mut self) -> Option<Command> {
        self.viewer.begin_load().map(Command::LoadReport)
    }

    fn render_table(&self, f: &mut Frame, area: Rect) {
        let spec = self.viewer.spec();

        let mut header_cells = vec![Cell::from("#")];
        header_cells.extend(spec.columns.iter().map(|c| Cell::from(c.header)));
        let header = Row::new(header_cells)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .viewer
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut cells = vec![Cell::from(format!("{}", index + 1)).style(rank_style(index))];
                cells.extend(spec.columns.iter().map(|c| Cell::from(row.cell(c))));
                let style = if is_podium(index) {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths = vec![Constraint::Length(4)];
        let share = (96 / spec.columns.len().max(1)) as u16;
        widths.extend(spec.columns.iter().map(|_| Constraint::Percentage(share)));

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Ranking"));
        f.render_widget(table, area);
    }
}

impl View for ReportView {
    fn render(&self, f: &mut Frame, area: Rect) {
        let spec = self.viewer.spec();
        let layout = ReportLayout::new(area);

        let mut title_spans = vec![
            Span::styled(spec.title, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", spec.description), Style::default().fg(Color::Gray)),
        ];
        if self.viewer.is_downloading() {
            title_spans.push(Span::styled("  Descargando PDF...", Style::default().fg(Color::Yellow)));
        }
        let title = Paragraph::new(Line::from(title_spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(title, layout.title);

        match self.viewer.state() {
            ReportState::Loading => {
                render_loading_indicator(f, layout.cards.union(layout.table), "Cargando reporte...");
            }
            ReportState::Failed(message) => {
                render_error(f, layout.cards.union(layout.table), message, Some("R"));
            }
            ReportState::Loaded(rows) => {
                if let Some(summary) = self.viewer.summary() {
                    render_metric_cards(f, layout.cards, &summary.metrics);
                }
                if rows.is_empty() {
                    render_empty(f, layout.table, spec.empty_message);
                } else {
                    self.render_table(f, layout.table);
                }
            }
        }
    }

    fn get_title(&self) -> String {
        self.viewer.spec().title.to_string()
    }

    fn get_status(&self) -> String {
        match self.viewer.state() {
            ReportState::Loading => "Cargando...".to_string(),
            ReportState::Failed(_) => "Error al cargar el reporte".to_string(),
            ReportState::Loaded(rows) => match self.viewer.last_download() {
                Some(path) => format!("{} filas · PDF guardado en {}", rows.len(), path.display()),
                None => format!("{} filas", rows.len()),
            },
        }
    }

    fn get_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("R", "recargar"),
            ("D", "descargar PDF"),
            ("Tab", "cambiar vista"),
            ("Esc", "salir"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Command>> {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                Ok(self.viewer.begin_load().map(Command::LoadReport))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                Ok(self.viewer.begin_download().map(Command::DownloadReport))
            }
            _ => Ok(None),
        }
    }
}
