use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::api::Expense;
use crate::error::Result;
use crate::expenses::{ExpenseListWorkflow, SortField};
use crate::status::Navigation;
use crate::ui::components::build_table;
use crate::ui::components::utils::{clamp_window, key_press};
use crate::ui::styles::{header_style, secondary_line, selection_style, status_line, ACCENT};
use crate::ui::{ScreenExit, TerminalGuard, UiRoute};
use crate::utils::{format_amount, format_expense_date, truncate_to_width};

enum Mode {
    Browse,
    Search,
    ConfirmDelete { id: String, title: String },
}

struct Cursor {
    selected: usize,
    offset: usize,
    capacity: usize,
}

/// Interactive expense table. The workflow must already be activated.
pub async fn run_expense_list(workflow: &mut ExpenseListWorkflow) -> Result<ScreenExit> {
    let mut guard = TerminalGuard::new()?;
    let mut mode = Mode::Browse;
    let mut cursor = Cursor {
        selected: 0,
        offset: 0,
        capacity: 1,
    };

    loop {
        {
            let view: &ExpenseListWorkflow = workflow;
            let rows = view.visible();
            let total = rows.len();
            clamp_window(&mut cursor.selected, &mut cursor.offset, total, cursor.capacity);
            let mut capacity = cursor.capacity;
            guard.terminal_mut().draw(|f| {
                capacity = render(f, view, &rows, &mode, &cursor);
            })?;
            cursor.capacity = capacity;
        }

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

        match &mode {
            Mode::Search => {
                if handle_search_key(workflow, key) {
                    mode = Mode::Browse;
                }
                cursor.selected = 0;
                cursor.offset = 0;
            }
            Mode::ConfirmDelete { id, title } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    log::debug!("Confirmed deletion of `{}`", title);
                    let id = id.clone();
                    mode = Mode::Browse;
                    if workflow.delete(&id).await == Navigation::Login {
                        guard.restore()?;
                        return Ok(ScreenExit::SignIn);
                    }
                }
                _ => mode = Mode::Browse,
            },
            Mode::Browse => {
                let total = workflow.visible().len();
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        guard.restore()?;
                        return Ok(ScreenExit::Back);
                    }
                    KeyCode::Char('/') => mode = Mode::Search,
                    KeyCode::Char('s') => workflow.cycle_sort_field(),
                    KeyCode::Char('d') => workflow.toggle_sort_order(),
                    KeyCode::Char('r') => {
                        if workflow.activate().await == Navigation::Login {
                            guard.restore()?;
                            return Ok(ScreenExit::SignIn);
                        }
                    }
                    KeyCode::Char('x') | KeyCode::Delete => {
                        if let Some(expense) = workflow.visible().get(cursor.selected) {
                            mode = Mode::ConfirmDelete {
                                id: expense.id.clone(),
                                title: expense.title.clone(),
                            };
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') if total > 0 => {
                        cursor.selected = (cursor.selected + 1) % total;
                    }
                    KeyCode::Up | KeyCode::Char('k') if total > 0 => {
                        cursor.selected = cursor.selected.checked_sub(1).unwrap_or(total - 1);
                    }
                    KeyCode::PageDown if total > 0 => {
                        cursor.selected = (cursor.selected + cursor.capacity).min(total - 1);
                    }
                    KeyCode::PageUp => {
                        cursor.selected = cursor.selected.saturating_sub(cursor.capacity);
                    }
                    KeyCode::Home => cursor.selected = 0,
                    KeyCode::End => cursor.selected = total.saturating_sub(1),
                    _ => {}
                }
            }
        }
    }
}

/// Apply a key to the search box. Returns true when editing is finished.
fn handle_search_key(workflow: &mut ExpenseListWorkflow, key: KeyEvent) -> bool {
    let mut search = workflow.query().search.clone();
    match key.code {
        KeyCode::Enter => return true,
        KeyCode::Esc => {
            workflow.set_search(String::new());
            return true;
        }
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char(ch) if !ch.is_control() => search.push(ch),
        _ => return false,
    }
    workflow.set_search(search);
    false
}

fn render(
    f: &mut Frame,
    workflow: &ExpenseListWorkflow,
    rows: &[&Expense],
    mode: &Mode,
    cursor: &Cursor,
) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(f.size());

    let title = Line::from(UiRoute::Expenses.title()).style(header_style());
    f.render_widget(Paragraph::new(title), chunks[0]);

    let query = workflow.query();
    let (search_text, search_style) = match mode {
        Mode::Search => (format!("{}_", query.search), Style::default().fg(ACCENT)),
        _ if query.search.is_empty() => (
            "Search expenses...".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        _ => (query.search.clone(), Style::default()),
    };
    let sort_label = format!("Sort: {} {}", query.field.label(), query.order.icon());
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .title(block::Title::from(sort_label).alignment(Alignment::Right)),
    );
    f.render_widget(search, chunks[1]);

    let status = match mode {
        Mode::ConfirmDelete { title, .. } => Line::from(
            format!("Delete \"{}\"? y to confirm, any other key to cancel", title)
                .yellow()
                .bold(),
        ),
        _ => status_line(workflow.status()),
    };
    f.render_widget(Paragraph::new(status), chunks[2]);

    let table_area = chunks[3];
    let capacity = (table_area.height.saturating_sub(3) as usize).max(1);
    let total = rows.len();
    let visible_end = (cursor.offset + capacity).min(total);
    let title_width = (table_area.width as usize / 3).max(8);

    let body: Vec<Row> = if total == 0 {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from("No expenses available").style(Style::default().fg(Color::Gray)),
        ])]
    } else {
        rows[cursor.offset..visible_end]
            .iter()
            .enumerate()
            .map(|(i, expense)| {
                let index = cursor.offset + i;
                let row = Row::new(vec![
                    Cell::from((index + 1).to_string()),
                    Cell::from(truncate_to_width(&expense.title, title_width)),
                    Cell::from(format_expense_date(expense.date)),
                    Cell::from(truncate_to_width(expense.category_name(), 20)),
                    Cell::from(format_amount(expense.amount)),
                ]);
                if index == cursor.selected {
                    row.style(selection_style())
                } else {
                    row
                }
            })
            .collect()
    };

    let header_columns: [(&str, Option<SortField>); 5] = [
        ("Sl", None),
        ("Title", Some(SortField::Title)),
        ("Date", Some(SortField::Date)),
        ("Category", Some(SortField::Category)),
        ("Amount", Some(SortField::Amount)),
    ];
    let header = Row::new(header_columns.iter().map(|(label, field)| {
        if *field == Some(query.field) {
            Cell::from(format!("{} {}", label, query.order.icon()))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Cell::from(*label).style(Style::default().fg(Color::Yellow))
        }
    }));

    let widths = vec![
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Length(12),
    ];
    let table = build_table(
        body,
        header,
        widths,
        format!("{} of {} expenses", total, workflow.expenses().len()),
    );
    f.render_widget(table, table_area);

    let hint = match mode {
        Mode::Browse => "/ search • s sort field • d flip order • x delete • r reload • ↑/↓ move • Esc back",
        Mode::Search => "Type to filter • Enter done • Esc clear",
        Mode::ConfirmDelete { .. } => "y delete • any other key cancel",
    };
    f.render_widget(Paragraph::new(secondary_line(hint)), chunks[4]);

    capacity
}
