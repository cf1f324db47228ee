use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Key presses only. Release and repeat events (sent on Windows) are dropped.
pub fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// A popup `percent_x` wide and `height` rows tall in the middle of `area`, clipped to it.
pub fn popup_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn split_vertical(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

/// Keep `selected` inside a window of `capacity` rows starting at `offset`.
pub fn clamp_window(selected: &mut usize, offset: &mut usize, total: usize, capacity: usize) {
    let capacity = capacity.max(1);
    if total == 0 {
        *selected = 0;
        *offset = 0;
        return;
    }
    if *selected >= total {
        *selected = total - 1;
    }
    if *selected >= *offset + capacity {
        *offset = *selected + 1 - capacity;
    }
    if *selected < *offset {
        *offset = *selected;
    }
    let max_offset = total.saturating_sub(capacity);
    if *offset > max_offset {
        *offset = max_offset;
    }
}
