use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::path::PathBuf;
use tracing::warn;

use super::layout::ViewLayout;
use super::view::{Command, View};
use crate::composer::{ComposerStatus, PostComposer};
use crate::models::CurrentUser;
use crate::utils::{format_bytes, truncate_chars};

/// Post composer screen
#[derive(Default)]
pub struct ComposerView {
    pub composer: PostComposer,
    pub user: Option<CurrentUser>,
    /// Path being typed after Ctrl+O
    path_input: Option<String>,
    notice: Option<String>,
}

impl ComposerView {
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn is_typing_path(&self) -> bool {
        self.path_input.is_some()
    }

    fn attach_typed_path(&mut self) {
        let Some(raw) = self.path_input.take() else {
            return;
        };
        let path = PathBuf::from(raw.trim());
        match self.composer.attach_image(&path) {
            Ok(()) => self.notice = Some(format!("Imagen lista: {}", path.display())),
            Err(e) => {
                warn!("Could not attach {}: {}", path.display(), e);
                self.notice = Some(format!("No se pudo adjuntar la imagen: {}", e));
            }
        }
    }

    fn image_line(&self) -> Line<'static> {
        let draft = self.composer.draft();
        match (&draft.image, &draft.preview) {
            (Some(image), Some(preview)) => Line::from(vec![
                Span::styled("Imagen: ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{} ({})", image.file_name, format_bytes(image.bytes.len()))),
                Span::styled(
                    format!("  vista previa {}", truncate_chars(preview, 32)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            _ => Line::from(Span::styled("Sin imagen", Style::default().fg(Color::DarkGray))),
        }
    }
}

impl View for ComposerView {
    fn render(&self, f: &mut Frame, area: Rect) {
        let layout = ViewLayout::new(area);
        let name = self.user.as_ref().map(|u| u.display_name()).unwrap_or("Usuario");

        let header = Paragraph::new(Line::from(vec![
            Span::styled("¿Qué quieres compartir, ", Style::default().fg(Color::Gray)),
            Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("?", Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Nueva publicación"));
        f.render_widget(header, layout.title);

        let sections = layout.split_main_content_horizontal(&[
            Constraint::Percentage(70), // Text
            Constraint::Percentage(30), // Options
        ]);

        let text_style = if self.composer.status() == ComposerStatus::Submitting {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let text = Paragraph::new(self.composer.draft().text.clone())
            .style(text_style)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Texto"));
        f.render_widget(text, sections[0]);

        let mut options = vec![
            Line::from(vec![
                Span::styled("Visibilidad: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    self.composer.draft().visibility.to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            self.image_line(),
        ];
        if let Some(input) = &self.path_input {
            options.push(Line::from(""));
            options.push(Line::from(Span::styled("Ruta de la imagen:", Style::default().fg(Color::Yellow))));
            options.push(Line::from(format!("{}_", input)));
        }
        let options = Paragraph::new(options)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Opciones"));
        f.render_widget(options, sections[1]);

        let footer = if self.composer.status() == ComposerStatus::Submitting {
            Line::from(Span::styled("Publicando...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = self.composer.error() {
            Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
        } else if let Some(notice) = &self.notice {
            Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Green)))
        } else if self.composer.can_submit() {
            Line::from(Span::styled("Listo para publicar", Style::default().fg(Color::Green)))
        } else {
            Line::from(Span::styled("Escribe algo para publicar", Style::default().fg(Color::DarkGray)))
        };
        f.render_widget(
            Paragraph::new(footer).block(Block::default().borders(Borders::ALL)),
            layout.footer,
        );
    }

    fn get_title(&self) -> String {
        "Publicar".to_string()
    }

    fn get_status(&self) -> String {
        match self.composer.status() {
            ComposerStatus::Submitting => "Publicando...".to_string(),
            ComposerStatus::Idle => format!(
                "{} caracteres · {}",
                self.composer.draft().text.chars().count(),
                self.composer.draft().visibility
            ),
        }
    }

    fn get_hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.is_typing_path() {
            return vec![("Enter", "adjuntar"), ("Esc", "cancelar")];
        }
        vec![
            ("Ctrl+P", "publicar"),
            ("Ctrl+V", "visibilidad"),
            ("Ctrl+O", "adjuntar imagen"),
            ("Ctrl+X", "quitar imagen"),
            ("Tab", "cambiar vista"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Command>> {
        if let Some(input) = self.path_input.as_mut() {
            match key.code {
                KeyCode::Enter => self.attach_typed_path(),
                KeyCode::Esc => self.path_input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return Ok(None);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        // Draft is frozen until the running submission finishes
        if self.composer.status() == ComposerStatus::Submitting
            && !(ctrl && key.code == KeyCode::Char('p'))
        {
            return Ok(None);
        }

        if ctrl {
            match key.code {
                KeyCode::Char('p') => {
                    self.notice = None;
                    if let Ok(submission) = self.composer.begin_submit() {
                        return Ok(Some(Command::Publish(submission)));
                    }
                }
                KeyCode::Char('v') => self.composer.cycle_visibility(),
                KeyCode::Char('o') => self.path_input = Some(String::new()),
                KeyCode::Char('x') => {
                    self.composer.remove_image();
                    self.notice = None;
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Enter => self.composer.push_char('\n'),
            KeyCode::Backspace => self.composer.pop_char(),
            KeyCode::Char(c) => self.composer.push_char(c),
            _ => {}
        }
        Ok(None)
    }
}
