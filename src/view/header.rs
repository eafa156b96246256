use std::io::{self, Write};
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal,
};

use crate::model::AppView;

/// Title line with the backend URL on the left and refresh state on the right,
/// followed by a separator.
pub fn render_header(
    out: &mut impl Write,
    current_view: &AppView,
    base_url: &str,
    countdown: Option<u32>,
    last_update: Option<&str>,
) -> io::Result<()> {
    queue!(io::stdout(), SetAttribute(Attribute::Bold))?;
    write!(out, "  Switcher")?;
    queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
    if let AppView::Panel(source) = current_view {
        write!(out, " › {}", source.title())?;
    }
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "  {}", base_url)?;
    queue!(io::stdout(), ResetColor)?;

    let mut right = String::new();
    if let Some(seconds) = countdown {
        right.push_str(&format!("refresh in {}s", seconds));
    }
    if let Some(time) = last_update {
        if !right.is_empty() {
            right.push_str(" | ");
        }
        right.push_str(&format!("updated {}", time));
    }
    right.push(' ');

    let size = terminal::size()?;
    let col = (size.0 as usize).saturating_sub(right.chars().count());
    queue!(io::stdout(), cursor::MoveTo(col as u16, 0))?;
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}", right)?;
    queue!(io::stdout(), ResetColor)?;

    write!(out, "\r\n")?;
    let sep: String = "─".repeat(size.0 as usize);
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}\r\n", sep)?;
    queue!(io::stdout(), ResetColor)?;

    Ok(())
}
