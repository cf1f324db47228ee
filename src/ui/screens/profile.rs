use crossterm::event::{self, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::profile::ProfileWorkflow;
use crate::status::Navigation;
use crate::ui::components::utils::{key_press, popup_rect, split_vertical};
use crate::ui::styles::{header_style, secondary_line, status_line, ACCENT};
use crate::ui::{ScreenExit, TerminalGuard, UiRoute};

/// Profile details with an inline prompt for choosing a new picture.
pub async fn run_profile(workflow: &mut ProfileWorkflow) -> Result<ScreenExit> {
    let mut guard = TerminalGuard::new()?;
    // Some(path) while the picture prompt is open.
    let mut picking: Option<String> = None;

    loop {
        guard.terminal_mut().draw(|f| render(f, workflow, picking.as_deref()))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Some(key) = key_press(event::read()?) else {
            continue;
        };
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            guard.restore()?;
            return Ok(ScreenExit::Back);
        }

        if let Some(buffer) = picking.as_mut() {
            match key.code {
                KeyCode::Esc => picking = None,
                KeyCode::Enter => {
                    let trimmed = buffer.trim();
                    let path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
                    picking = None;
                    if workflow.upload(path.as_deref()).await == Navigation::Login {
                        guard.restore()?;
                        return Ok(ScreenExit::SignIn);
                    }
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(ch) if !ch.is_control() => buffer.push(ch),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                guard.restore()?;
                return Ok(ScreenExit::Back);
            }
            KeyCode::Char('u') => picking = Some(String::new()),
            KeyCode::Char('r') => {
                if workflow.load().await == Navigation::Login {
                    guard.restore()?;
                    return Ok(ScreenExit::SignIn);
                }
            }
            _ => {}
        }
    }
}

fn render(f: &mut Frame, workflow: &ProfileWorkflow, picking: Option<&str>) {
    let chunks = split_vertical(
        f.size(),
        &[
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ],
    );

    f.render_widget(
        Paragraph::new(Line::from(UiRoute::Profile.title()).style(header_style())),
        chunks[0],
    );
    f.render_widget(Paragraph::new(status_line(workflow.status())), chunks[1]);

    let label = |text: &'static str| {
        Span::styled(
            format!("{:<10}", text),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let value = |text: Option<&str>| match text {
        Some(text) => Span::raw(text.to_string()),
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    };
    let details = workflow.details();
    let lines = vec![
        Line::from(vec![
            label("Name"),
            value(details.and_then(|d| d.name.as_deref())),
        ]),
        Line::from(vec![
            label("Email"),
            value(details.and_then(|d| d.email.as_deref())),
        ]),
        Line::from(vec![label("Picture"), value(workflow.picture_url())]),
    ];
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Account"));
    f.render_widget(body, chunks[2]);

    let hint = if picking.is_some() {
        "Enter upload • Esc cancel"
    } else {
        "u change picture • r reload • Esc back"
    };
    f.render_widget(Paragraph::new(secondary_line(hint)), chunks[3]);

    if let Some(buffer) = picking {
        let area = popup_rect(70, 3, f.size());
        f.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", buffer))
            .style(Style::default().fg(ACCENT))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Path to image (png, jpg, gif, webp)"),
            );
        f.render_widget(input, area);
    }
}
