/// Label of the leading "nothing selected" entry.
pub const SELECTOR_PLACEHOLDER: &str = "-- select a server to switch to --";

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorOption {
    /// `None` for the placeholder entry.
    pub value: Option<String>,
    pub label: String,
    /// The active server is listed but cannot be picked.
    pub disabled: bool,
}

impl SelectorOption {
    fn placeholder() -> Self {
        Self {
            value: None,
            label: SELECTOR_PLACEHOLDER.to_string(),
            disabled: false,
        }
    }
}

/// Target-server picker. Rebuilt from every snapshot; the user's choice
/// survives a rebuild only while the server is still in the pool.
#[derive(Clone, Debug)]
pub struct ServerSelector {
    options: Vec<SelectorOption>,
    cursor: usize,
}

impl Default for ServerSelector {
    fn default() -> Self {
        Self {
            options: vec![SelectorOption::placeholder()],
            cursor: 0,
        }
    }
}

impl ServerSelector {
    pub fn options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The chosen server, `None` while the placeholder is selected.
    pub fn selected(&self) -> Option<&str> {
        self.options.get(self.cursor).and_then(|o| o.value.as_deref())
    }

    /// Replace the option list. The previous selection is restored when it
    /// still appears in `servers`, otherwise the placeholder is selected.
    pub fn rebuild(&mut self, servers: &[String], current: Option<&str>) {
        let previous = self.selected().map(str::to_string);

        let mut options = Vec::with_capacity(servers.len() + 1);
        options.push(SelectorOption::placeholder());
        for server in servers {
            let is_current = current == Some(server.as_str());
            options.push(SelectorOption {
                value: Some(server.clone()),
                label: if is_current {
                    format!("{} (current)", server)
                } else {
                    server.clone()
                },
                disabled: is_current,
            });
        }
        self.options = options;

        self.cursor = previous
            .filter(|p| servers.iter().any(|s| s == p))
            .and_then(|p| {
                self.options
                    .iter()
                    .position(|o| o.value.as_deref() == Some(p.as_str()))
            })
            .unwrap_or(0);
    }

    /// Pick a server by value. Disabled or unknown entries are refused.
    pub fn select(&mut self, value: &str) -> bool {
        match self
            .options
            .iter()
            .position(|o| !o.disabled && o.value.as_deref() == Some(value))
        {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    /// Move to the next selectable entry below the cursor.
    pub fn select_next(&mut self) -> bool {
        let next = self
            .options
            .iter()
            .enumerate()
            .skip(self.cursor + 1)
            .find(|(_, o)| !o.disabled)
            .map(|(i, _)| i);
        self.move_to(next)
    }

    /// Move to the previous selectable entry above the cursor.
    pub fn select_prev(&mut self) -> bool {
        let prev = self.options[..self.cursor.min(self.options.len())]
            .iter()
            .rposition(|o| !o.disabled);
        self.move_to(prev)
    }

    fn move_to(&mut self, idx: Option<usize>) -> bool {
        match idx {
            Some(i) if i != self.cursor => {
                self.cursor = i;
                true
            }
            _ => false,
        }
    }

    /// Switching is only offered for a real selection other than the active server.
    pub fn can_switch(&self, current: Option<&str>) -> bool {
        match self.selected() {
            Some(sel) => Some(sel) != current,
            None => false,
        }
    }
}
