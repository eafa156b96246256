use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, queue, style::{Color, SetBackgroundColor, SetForegroundColor, SetAttribute, Attribute, ResetColor}, terminal};

/// Full-width bar three rows above the bottom edge, over the dashboard.
fn render_bar(text: &str, background: Color) -> io::Result<()> {
    let mut out = stdout();
    let size = terminal::size()?;
    let y = size.1.saturating_sub(3);
    let width = size.0 as usize;

    queue!(out, MoveTo(0, y))?;
    queue!(out, SetBackgroundColor(background), SetForegroundColor(Color::White), SetAttribute(Attribute::Bold))?;
    write!(out, "{:<width$}", super::truncate_str(text, width), width = width)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    out.flush()?;
    Ok(())
}

pub fn render_confirmation(prompt: &str, seconds_left: u64) -> io::Result<()> {
    let line = format!("  {} (y to confirm, any other key to cancel, {}s)  ", prompt, seconds_left);
    render_bar(&line, Color::DarkRed)
}

/// Blocking message bar; any key dismisses it.
pub fn render_notice(message: &str, is_error: bool) -> io::Result<()> {
    let background = if is_error { Color::DarkRed } else { Color::DarkBlue };
    render_bar(&format!("  {} (press any key)  ", message), background)
}
