use crossterm::event::{self, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::Result;
use crate::ui::styles::{secondary_line, ACCENT};
use crate::ui::{
    components::utils::{key_press, popup_rect, split_vertical},
    TerminalGuard, UiRoute,
};
use crate::utils::mask;

/// Prompt for a session token. `reason` explains why the prompt opened, if it was forced.
pub fn run_sign_in(reason: Option<&str>) -> Result<Option<String>> {
    let mut guard = TerminalGuard::new()?;
    let mut buffer = String::new();
    let mut reveal = false;
    let mut error: Option<&'static str> = None;

    loop {
        guard.terminal_mut().draw(|f| {
            let size = f.size();
            let area = popup_rect(70, 9, size);
            f.render_widget(Clear, area);

            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("{}: paste your session token", UiRoute::SignIn.title()));
            f.render_widget(block.clone(), area);
            let inner = block.inner(area);

            let chunks = split_vertical(
                inner,
                &[
                    Constraint::Length(2),
                    Constraint::Length(3),
                    Constraint::Min(1),
                ],
            );

            let intro = match reason {
                Some(reason) => Line::from(reason.to_string().red()),
                None => secondary_line("The token is stored locally and sent as a Bearer header."),
            };
            f.render_widget(Paragraph::new(intro).wrap(Wrap { trim: true }), chunks[0]);

            let mut display = if reveal {
                buffer.clone()
            } else {
                mask(&buffer)
            };
            display.push('_');
            let input = Paragraph::new(display)
                .style(Style::default().fg(ACCENT))
                .block(Block::default().borders(Borders::ALL).title("Token"));
            f.render_widget(input, chunks[1]);

            let message =
                error.unwrap_or("Enter to save • Tab show/hide • Esc to cancel • Backspace delete");
            f.render_widget(Paragraph::new(secondary_line(message)), chunks[2]);
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Some(key) = key_press(event::read()?) {
                match key.code {
                    KeyCode::Esc => {
                        guard.restore()?;
                        return Ok(None);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        guard.restore()?;
                        return Ok(None);
                    }
                    KeyCode::Enter => {
                        let trimmed = buffer.trim();
                        if trimmed.is_empty() {
                            error = Some("Token cannot be empty");
                        } else {
                            guard.restore()?;
                            return Ok(Some(trimmed.to_string()));
                        }
                    }
                    KeyCode::Tab => reveal = !reveal,
                    KeyCode::Backspace => {
                        buffer.pop();
                        error = None;
                    }
                    KeyCode::Char(ch) if !ch.is_control() => {
                        buffer.push(ch);
                        error = None;
                    }
                    _ => {}
                }
            }
        }
    }
}
