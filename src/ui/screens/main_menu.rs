use crossterm::event::{self, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::Result;
use crate::status::Status;
use crate::ui::components::utils::key_press;
use crate::ui::styles::{header_style, secondary_line, selection_style, status_line};
use crate::ui::{MenuAction, TerminalGuard, UiRoute};

/// Static context rendered in the menu header.
pub struct MenuContext<'a> {
    pub api_url: &'a str,
    pub signed_in: bool,
    pub notice: Option<&'a Status>,
}

pub fn run_main_menu(ctx: &MenuContext<'_>) -> Result<MenuAction> {
    let mut guard = TerminalGuard::new()?;

    let items: Vec<(&str, &str, MenuAction)> = vec![
        (
            "Expenses",
            "List, search, sort and delete expenses",
            MenuAction::Expenses,
        ),
        (
            "Profile",
            "View details and change the profile picture",
            MenuAction::Profile,
        ),
        ("Sign In", "Store a session token", MenuAction::SignIn),
        ("Sign Out", "Forget the stored token", MenuAction::SignOut),
        ("Quit", "Exit expense-cli", MenuAction::Exit),
    ];
    let mut selected = 0usize;

    loop {
        guard.terminal_mut().draw(|f| {
            let size = f.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(size);

            let session = if ctx.signed_in {
                "signed in"
            } else {
                "not signed in"
            };
            let header = Paragraph::new(vec![
                Line::from(format!("Expense CLI · {}", UiRoute::MainMenu.title()))
                    .style(header_style()),
                secondary_line(format!("API: {} • {}", ctx.api_url, session)),
            ]);
            f.render_widget(header, chunks[0]);
            f.render_widget(Paragraph::new(status_line(ctx.notice)), chunks[1]);

            let list_items: Vec<ListItem> = items
                .iter()
                .enumerate()
                .map(|(i, (label, description, _))| {
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{:<12}", label),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(*description, Style::default().fg(Color::Gray)),
                    ]);
                    let mut item = ListItem::new(line);
                    if i == selected {
                        item = item.style(selection_style());
                    }
                    item
                })
                .collect();
            let list = List::new(list_items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Menu (↑/↓ or j/k)"),
            );
            f.render_widget(list, chunks[2]);

            f.render_widget(
                Paragraph::new(secondary_line(
                    "↑/↓ or j/k navigate • Enter select • Esc quit • Ctrl+C exit",
                )),
                chunks[3],
            );
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Some(k) = key_press(event::read()?) {
                match k.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        selected = selected.checked_sub(1).unwrap_or(items.len() - 1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        selected = (selected + 1) % items.len();
                    }
                    KeyCode::Enter => {
                        let action = items[selected].2;
                        guard.restore()?;
                        return Ok(action);
                    }
                    KeyCode::Esc | KeyCode::Char('q') => {
                        guard.restore()?;
                        return Ok(MenuAction::Exit);
                    }
                    KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                        guard.restore()?;
                        return Ok(MenuAction::Exit);
                    }
                    _ => {}
                }
            }
        }
    }
}
