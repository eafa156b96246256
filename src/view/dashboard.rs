use std::io::{self, Write, stdout};
use crossterm::{cursor, queue, style::{Color, SetForegroundColor, ResetColor}, terminal};

use crate::layout::{RenderTarget, TargetRegistry};
use crate::model::ServerSelector;
use crate::reconcile::{ButtonStyle, DashboardView, HealthTier};
use super::shared::{truncate_str, write_field, write_section_header, write_selectable, writeln};

pub fn tier_color(tier: HealthTier) -> Color {
    match tier {
        HealthTier::Online => Color::Green,
        HealthTier::Warning => Color::Yellow,
        HealthTier::Error => Color::Red,
    }
}

fn button_color(style: ButtonStyle) -> Color {
    match style {
        ButtonStyle::Success => Color::Green,
        ButtonStyle::Secondary => Color::Grey,
    }
}

/// Everything the dashboard body needs for one frame.
pub struct DashboardFrame<'a> {
    pub view: Option<&'a DashboardView>,
    pub selector: &'a ServerSelector,
    pub registry: &'a TargetRegistry,
    pub command_in_progress: bool,
    pub fetch_error: Option<&'a str>,
    pub help: &'a str,
}

pub fn render_dashboard(frame: &DashboardFrame<'_>) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, cursor::MoveTo(0, 2))?;

    let size = terminal::size()?;
    let width = size.0 as usize;
    // Header takes two rows, footer one.
    let body_rows = size.1.saturating_sub(3) as usize;
    let mut used = 0usize;

    match frame.view {
        None => {
            writeln(&mut out, "")?;
            writeln(&mut out, "  Waiting for the first status update...")?;
            if let Some(err) = frame.fetch_error {
                queue!(io::stdout(), SetForegroundColor(Color::Red))?;
                writeln(&mut out, &format!("  {}", truncate_str(err, width.saturating_sub(4))))?;
                queue!(io::stdout(), ResetColor)?;
            }
        }
        Some(view) => {
            used += render_status(&mut out, view)?;
            used += render_runtime(&mut out, view)?;
            used += render_versions(&mut out, view)?;

            let has_selector = frame.registry.contains(RenderTarget::ServerSelector);
            let has_button = view.switch_enabled.is_some() || frame.command_in_progress;
            // Selector header plus a few options, and the button row.
            let reserved = (if has_selector { 1 + MIN_SELECTOR_OPTIONS } else { 0 }) + usize::from(has_button);
            let room = body_rows.saturating_sub(used + reserved);
            used += render_down_stats(&mut out, view, room, width)?;

            let mut room = body_rows.saturating_sub(used);
            if has_button {
                room = room.saturating_sub(1);
            }
            if has_selector && room >= 2 {
                render_selector(&mut out, frame.selector, room - 1, width)?;
                used += 1 + (room - 1).min(frame.selector.options().len());
            }
            if has_button && used < body_rows {
                render_switch_button(&mut out, view, frame.command_in_progress)?;
            }
        }
    }

    // Footer
    let help_y = size.1.saturating_sub(1);
    queue!(
        out,
        cursor::MoveTo(1, help_y),
        SetForegroundColor(Color::DarkGrey),
        crossterm::style::Print(format!("{:<width$}", truncate_str(frame.help, width.saturating_sub(1)), width = width.saturating_sub(1))),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}

fn render_status(out: &mut impl Write, view: &DashboardView) -> io::Result<usize> {
    write_section_header(out, "  Status", false)?;
    let mut lines = 1;

    if let Some(server) = &view.current_server {
        write_field(out, "Current server", server, None)?;
        lines += 1;
    }
    if let Some(tier) = view.status_indicator {
        write_field(out, "Health", &format!("● {}", tier.label()), Some(tier_color(tier)))?;
        lines += 1;
    }
    if let Some(uptime) = &view.uptime {
        write_field(out, "Uptime", uptime, None)?;
        lines += 1;
    }
    if let Some((count, tier)) = view.error_count {
        write_field(out, "Errors", &count.to_string(), Some(tier_color(tier)))?;
        lines += 1;
    }
    if let Some(badge) = view.auto_switch_status {
        write_field(out, "Auto-switch", badge.text, Some(tier_color(badge.tier)))?;
        lines += 1;
    }
    if let Some(button) = view.auto_switch_button {
        write_field(out, "", &format!("[p] {}", button.label), Some(button_color(button.style)))?;
        lines += 1;
    }
    writeln(out, "")?;
    Ok(lines + 1)
}

fn render_runtime(out: &mut impl Write, view: &DashboardView) -> io::Result<usize> {
    let fields = [
        ("Goroutines", &view.goroutines),
        ("Memory", &view.memory_usage),
        ("Allocated", &view.memory_alloc),
        ("Started", &view.start_time),
    ];
    if fields.iter().all(|(_, v)| v.is_none()) {
        return Ok(0);
    }
    write_section_header(out, "  Runtime", false)?;
    let mut lines = 1;
    for (label, value) in fields {
        if let Some(value) = value {
            write_field(out, label, value, None)?;
            lines += 1;
        }
    }
    writeln(out, "")?;
    Ok(lines + 1)
}

fn render_versions(out: &mut impl Write, view: &DashboardView) -> io::Result<usize> {
    if view.naive_version.is_none() && view.switcher_version.is_none() {
        return Ok(0);
    }
    let mut parts = Vec::new();
    if let Some(v) = &view.naive_version {
        parts.push(format!("naive {}", v));
    }
    if let Some(v) = &view.switcher_version {
        parts.push(format!("switcher {}", v));
    }
    write_field(out, "Versions", &parts.join("  "), Some(Color::DarkGrey))?;
    writeln(out, "")?;
    Ok(2)
}

/// Options the selector always keeps room for.
const MIN_SELECTOR_OPTIONS: usize = 3;

/// Entries that fit in `max_lines`, with a trailing "... N more" line when
/// some had to be cut.
fn clip_lines(lines: &[String], max_lines: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines.to_vec();
    }
    let keep = max_lines.saturating_sub(1);
    let mut clipped = lines[..keep].to_vec();
    if max_lines > 0 {
        clipped.push(format!("... {} more", lines.len() - keep));
    }
    clipped
}

/// Renders into at most `room` rows (header and trailing blank included).
fn render_down_stats(out: &mut impl Write, view: &DashboardView, room: usize, width: usize) -> io::Result<usize> {
    let Some(stats) = &view.down_stats else {
        return Ok(0);
    };
    if room < 3 {
        return Ok(0);
    }
    let lines = clip_lines(stats, room - 2);
    write_section_header(out, "  Failure history", false)?;
    for line in &lines {
        writeln(out, &format!("    {}", truncate_str(line, width.saturating_sub(6))))?;
    }
    writeln(out, "")?;
    Ok(lines.len() + 2)
}

/// Option list, scrolled so the cursor stays inside `room` rows.
fn render_selector(out: &mut impl Write, selector: &ServerSelector, room: usize, width: usize) -> io::Result<()> {
    write_section_header(out, "  Switch to", false)?;
    let options = selector.options();
    let visible = room.clamp(1, options.len().max(1));
    let start = selector
        .cursor()
        .saturating_sub(visible - 1)
        .min(options.len().saturating_sub(visible));

    for (idx, option) in options.iter().enumerate().skip(start).take(visible) {
        let marker = if idx == selector.cursor() { "›" } else { " " };
        let line = format!("  {} {}", marker, truncate_str(&option.label, width.saturating_sub(6)));
        if option.disabled {
            queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
            writeln(out, &line)?;
            queue!(io::stdout(), ResetColor)?;
        } else {
            write_selectable(out, &line, idx == selector.cursor())?;
        }
    }
    Ok(())
}

fn render_switch_button(out: &mut impl Write, view: &DashboardView, busy: bool) -> io::Result<()> {
    if busy {
        queue!(io::stdout(), SetForegroundColor(Color::Yellow))?;
        writeln(out, "  Working...")?;
        queue!(io::stdout(), ResetColor)?;
        return Ok(());
    }
    match view.switch_enabled {
        Some(true) => {
            queue!(io::stdout(), SetForegroundColor(Color::Green))?;
            writeln(out, "  [Enter] Switch to selected server")?;
            queue!(io::stdout(), ResetColor)?;
        }
        Some(false) => {
            queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
            writeln(out, "  [Enter] Switch (pick another server first)")?;
            queue!(io::stdout(), ResetColor)?;
        }
        None => {}
    }
    Ok(())
}
