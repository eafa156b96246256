mod shared;
mod header;
mod dashboard;
mod panel;
mod confirmation;

use std::io::{self, Write};
use crossterm::{execute, cursor, queue, style::{Color, SetForegroundColor, ResetColor}, terminal};

pub use dashboard::{DashboardFrame, tier_color};
pub use panel::{Rect, panel_area, panel_page_size};
pub use shared::{fit_width, truncate_str};

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 60;
pub const MIN_ROWS: u16 = 16;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard() -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = std::io::stdout();
            execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(Color::Yellow))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn render_header(
        out: &mut impl Write,
        current_view: &crate::model::AppView,
        base_url: &str,
        countdown: Option<u32>,
        last_update: Option<&str>,
    ) -> io::Result<()> {
        header::render_header(out, current_view, base_url, countdown, last_update)
    }

    pub fn render_dashboard(frame: &DashboardFrame<'_>) -> io::Result<()> {
        dashboard::render_dashboard(frame)
    }

    pub fn render_panel(state: &crate::model::TextPanelState, help: &str) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        panel::render_panel(state, panel_area(cols, rows), help)
    }

    pub fn render_confirmation(prompt: &str, seconds_left: u64) -> io::Result<()> {
        confirmation::render_confirmation(prompt, seconds_left)
    }

    pub fn render_notice(message: &str, is_error: bool) -> io::Result<()> {
        confirmation::render_notice(message, is_error)
    }
}
