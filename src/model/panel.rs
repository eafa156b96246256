/// Which backend text report a panel shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelSource {
    Logs,
    Subscription,
    Ping,
}

impl PanelSource {
    pub fn title(&self) -> &'static str {
        match self {
            PanelSource::Logs => "Logs",
            PanelSource::Subscription => "Subscription refresh",
            PanelSource::Ping => "Server ping",
        }
    }

    pub fn loading_text(&self) -> &'static str {
        match self {
            PanelSource::Logs => "Loading logs...",
            PanelSource::Subscription => "Refreshing subscription...",
            PanelSource::Ping => "Pinging servers...",
        }
    }

    pub fn empty_text(&self) -> &'static str {
        match self {
            PanelSource::Logs => "No logs yet",
            PanelSource::Subscription => "Empty subscription report",
            PanelSource::Ping => "No ping results",
        }
    }

    pub fn error_prefix(&self) -> &'static str {
        match self {
            PanelSource::Logs => "Error loading logs",
            PanelSource::Subscription => "Error refreshing subscription",
            PanelSource::Ping => "Error pinging servers",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelBody {
    Loading,
    Text(Vec<String>),
    Empty,
    Failed(String),
}

// --- Text panel state ---

pub struct TextPanelState {
    pub source: PanelSource,
    pub body: PanelBody,
    pub scroll_offset: usize, // 0 = at bottom (following)
    pub auto_follow: bool,
}

impl TextPanelState {
    pub fn loading(source: PanelSource) -> Self {
        Self {
            source,
            body: PanelBody::Loading,
            scroll_offset: 0,
            auto_follow: true,
        }
    }

    /// Install a fetched report verbatim and jump to its end.
    pub fn set_text(&mut self, text: &str) {
        self.body = if text.trim().is_empty() {
            PanelBody::Empty
        } else {
            PanelBody::Text(text.lines().map(printable_line).collect())
        };
        self.scroll_offset = 0;
        self.auto_follow = true;
    }

    pub fn set_error(&mut self, message: &str) {
        self.body = PanelBody::Failed(format!("{}: {}", self.source.error_prefix(), message));
        self.scroll_offset = 0;
    }

    pub fn line_count(&self) -> usize {
        match &self.body {
            PanelBody::Text(lines) => lines.len(),
            _ => 1,
        }
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.auto_follow = false;
        let max_offset = self.line_count().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max_offset);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        if self.scroll_offset > amount {
            self.scroll_offset -= amount;
        } else {
            self.follow();
        }
    }

    pub fn follow(&mut self) {
        self.scroll_offset = 0;
        self.auto_follow = true;
    }
}

const TAB_WIDTH: usize = 4;

/// Expand tabs to the next tab stop and drop other control characters, so
/// report text cannot move the cursor or restyle the terminal.
fn printable_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else if !c.is_control() {
            out.push(c);
            col += 1;
        }
    }
    out
}
