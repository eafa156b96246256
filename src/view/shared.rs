use std::io::{self, Write};
use crossterm::{queue, style::{Color, SetForegroundColor, SetBackgroundColor, ResetColor, Attribute, SetAttribute}};

/// Truncate a string to at most `max_len` characters (not bytes), appending "..."
/// if truncated. Safe for multi-byte UTF-8.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

/// Exactly `width` characters: cut when longer, space-padded when shorter.
/// Counts chars on both sides so borders stay aligned for non-ASCII text.
pub fn fit_width(s: &str, width: usize) -> String {
    let mut fitted: String = s.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat_n(' ', width - len));
    fitted
}

pub fn writeln(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{}\r\n", text)
}

pub fn write_section_header(out: &mut impl Write, text: &str, selected: bool) -> io::Result<()> {
    if selected {
        queue!(io::stdout(), SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
    } else {
        queue!(io::stdout(), SetAttribute(Attribute::Bold))?;
    }
    write!(out, "{}\r\n", text)?;
    queue!(io::stdout(), ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}

pub fn write_selectable(out: &mut impl Write, text: &str, selected: bool) -> io::Result<()> {
    if selected {
        queue!(io::stdout(), SetBackgroundColor(Color::DarkGrey), SetForegroundColor(Color::White))?;
    }
    write!(out, "{}\r\n", text)?;
    if selected {
        queue!(io::stdout(), ResetColor)?;
    }
    Ok(())
}

/// `  Label:      value` with the label padded to a common width. An empty
/// label indents the value under the previous one.
pub fn write_field(out: &mut impl Write, label: &str, value: &str, color: Option<Color>) -> io::Result<()> {
    let label = if label.is_empty() { String::new() } else { format!("{}:", label) };
    write!(out, "  {:<16}", label)?;
    if let Some(color) = color {
        queue!(io::stdout(), SetForegroundColor(color))?;
    }
    write!(out, "{}\r\n", value)?;
    if color.is_some() {
        queue!(io::stdout(), ResetColor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_utf8() {
        assert_eq!(truncate_str("café", 4), "café");
        // "日本語" has 3 chars; max_len 3 returns full, max_len 2 gives keep=0 so "..."
        assert_eq!(truncate_str("日本語", 3), "日本語");
        assert_eq!(truncate_str("hello世界", 6), "hel..."); // 7 chars, keep=3
    }

    #[test]
    fn fit_width_counts_chars_not_bytes() {
        assert_eq!(fit_width("ab", 4), "ab  ");
        assert_eq!(fit_width("héllo wörld", 5), "héllo");
        assert_eq!(fit_width("日本語", 5).chars().count(), 5);
        assert_eq!(fit_width("", 0), "");
    }

    #[test]
    fn write_field_pads_label() {
        let mut buf = Vec::new();
        write_field(&mut buf, "Uptime", "1h2m", None).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "  Uptime:         1h2m\r\n");
    }
}
