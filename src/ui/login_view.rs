use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::layout::centered_rect;
use super::view::{Command, View};
use crate::auth::{LoginField, LoginForm};

/// Login screen
#[derive(Default)]
pub struct LoginView {
    pub form: LoginForm,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_block(&self, title: &'static str, field: LoginField) -> Block<'static> {
        let style = if self.form.focus() == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        Block::default().borders(Borders::ALL).title(title).border_style(style)
    }
}

impl View for LoginView {
    fn render(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Email
                Constraint::Length(3), // Password
                Constraint::Length(3), // Button / error
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            "Iniciar sesión",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        let email = Paragraph::new(self.form.email().to_string())
            .block(self.field_block("Correo institucional", LoginField::Email));
        f.render_widget(email, chunks[1]);

        let password = Paragraph::new(self.form.masked_password())
            .block(self.field_block("Contraseña", LoginField::Password));
        f.render_widget(password, chunks[2]);

        let status = if self.form.is_submitting() {
            Line::from(Span::styled("Ingresando...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = self.form.error() {
            Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
        } else {
            Line::from(Span::styled("[ Ingresar ]", Style::default().fg(Color::Green)))
        };
        f.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);
    }

    fn get_title(&self) -> String {
        "Ingresar".to_string()
    }

    fn get_status(&self) -> String {
        if self.form.is_submitting() {
            "Verificando credenciales...".to_string()
        } else {
            "Ingresa con tu cuenta universitaria".to_string()
        }
    }

    fn get_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("Tab", "cambiar campo"),
            ("Enter", "ingresar"),
            ("Ctrl+R", "crear cuenta"),
            ("Esc", "salir"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Command>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                return Ok(Some(Command::SwitchToRegister));
            }
            return Ok(None);
        }

        // Credentials stay as submitted until the request finishes
        if self.form.is_submitting() {
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.form.toggle_focus(),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Enter => {
                if let Ok((email, password)) = self.form.begin_submit() {
                    return Ok(Some(Command::Login { email, password }));
                }
            }
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
        Ok(None)
    }
}
