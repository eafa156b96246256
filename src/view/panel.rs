use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, queue, style::{Color, SetForegroundColor, ResetColor, SetAttribute, Attribute}};

use crate::model::{PanelBody, TextPanelState};
use super::shared::fit_width;

/// Screen rectangle in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x
            && row >= self.y
            && col < self.x.saturating_add(self.width)
            && row < self.y.saturating_add(self.height)
    }
}

/// Overlay area for the text panel: below the header, inset from the edges.
pub fn panel_area(cols: u16, rows: u16) -> Rect {
    Rect {
        x: 2,
        y: 2,
        width: cols.saturating_sub(4),
        height: rows.saturating_sub(3),
    }
}

/// Rows of report text visible at once (border, title and hint excluded).
pub fn panel_page_size(cols: u16, rows: u16) -> usize {
    (panel_area(cols, rows).height.saturating_sub(4) as usize).max(1)
}

/// Index of the first visible line.
fn first_visible(total: usize, page: usize, state: &TextPanelState) -> usize {
    let bottom_start = total.saturating_sub(page);
    if state.auto_follow {
        bottom_start
    } else {
        bottom_start.saturating_sub(state.scroll_offset)
    }
}

pub fn render_panel(state: &TextPanelState, area: Rect, help: &str) -> io::Result<()> {
    let mut out = stdout();
    let inner = area.width.saturating_sub(2) as usize;
    let page = area.height.saturating_sub(4) as usize;

    // Top border with title
    let follow_indicator = if state.auto_follow { "FOLLOWING" } else { "PAUSED" };
    let title = format!(" {} - {} ", state.source.title(), follow_indicator);
    let title: String = title.chars().take(inner).collect();
    queue!(out, MoveTo(area.x, area.y), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "┌")?;
    queue!(out, ResetColor, SetAttribute(Attribute::Bold))?;
    if !state.auto_follow {
        queue!(out, SetForegroundColor(Color::Yellow))?;
    }
    write!(out, "{}", title)?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor, SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}┐", "─".repeat(inner.saturating_sub(title.chars().count())))?;
    queue!(out, ResetColor)?;

    let (lines, color): (Vec<&str>, Option<Color>) = match &state.body {
        PanelBody::Loading => (vec![state.source.loading_text()], Some(Color::DarkGrey)),
        PanelBody::Empty => (vec![state.source.empty_text()], Some(Color::DarkGrey)),
        PanelBody::Failed(message) => (vec![message.as_str()], Some(Color::Red)),
        PanelBody::Text(text) => (text.iter().map(String::as_str).collect(), None),
    };

    let start = first_visible(lines.len(), page, state);
    let end = (start + page).min(lines.len());

    for row in 0..page + 1 {
        let y = area.y + 1 + row as u16;
        queue!(out, MoveTo(area.x, y), SetForegroundColor(Color::DarkGrey))?;
        write!(out, "│")?;
        queue!(out, ResetColor)?;
        // First body row is padding under the title.
        let text = match row.checked_sub(1).map(|i| start + i) {
            Some(i) if i < end => lines[i],
            _ => "",
        };
        if let Some(c) = color {
            queue!(out, SetForegroundColor(c))?;
        }
        write!(out, " {}", fit_width(text, inner.saturating_sub(1)))?;
        queue!(out, ResetColor, SetForegroundColor(Color::DarkGrey))?;
        write!(out, "│")?;
        queue!(out, ResetColor)?;
    }

    // Hint row and bottom border
    let hint_y = area.y + page as u16 + 2;
    queue!(out, MoveTo(area.x, hint_y), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "│ {}│", fit_width(help, inner.saturating_sub(1)))?;
    queue!(out, MoveTo(area.x, hint_y + 1))?;
    write!(out, "└{}┘", "─".repeat(inner))?;
    queue!(out, ResetColor)?;

    out.flush()?;
    Ok(())
}
