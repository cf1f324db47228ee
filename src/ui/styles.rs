use std::borrow::Cow;

use ratatui::prelude::Stylize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use crate::status::Status;

/// Accent color used for prompts, highlights, and the header.
pub const ACCENT: Color = Color::Indexed(141);

/// Produce a dimmed line for secondary descriptions and hints.
pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}

pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn header_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Red for errors, green for successes, empty when there is nothing to report.
pub fn status_line(status: Option<&Status>) -> Line<'static> {
    match status {
        Some(Status::Error(msg)) => Line::from(msg.clone().red().bold()),
        Some(Status::Success(msg)) => Line::from(msg.clone().green().bold()),
        None => Line::default(),
    }
}
