use crossterm::event::KeyCode;

/// Where a binding applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyScope {
    Dashboard,
    Panel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    SelectPrev,
    SelectNext,
    SwitchToSelected,
    SwitchToBest,
    ToggleAutoSwitch,
    CheckUpdates,
    ViewLogs,
    RefreshSubscription,
    PingServers,
    RefreshNow,
    ClosePanel,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Follow,
    Reload,
}

pub struct Binding {
    pub scope: KeyScope,
    pub codes: Vec<KeyCode>,
    pub action: InputAction,
    /// Footer text; empty hides the binding from the footer.
    pub hint: &'static str,
}

/// Key-to-action table, built once at startup. Input handling and the
/// footer help both read from it.
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn standard() -> Self {
        use InputAction::*;
        use KeyScope::{Dashboard, Panel};

        let bind = |scope, codes: &[KeyCode], action, hint| Binding {
            scope,
            codes: codes.to_vec(),
            action,
            hint,
        };

        Self {
            bindings: vec![
                bind(Dashboard, &[KeyCode::Char('q'), KeyCode::Esc], Quit, "q: Quit"),
                bind(Dashboard, &[KeyCode::Up], SelectPrev, ""),
                bind(Dashboard, &[KeyCode::Down], SelectNext, "↑/↓: Select"),
                bind(Dashboard, &[KeyCode::Enter, KeyCode::Char('s')], SwitchToSelected, "Enter: Switch"),
                bind(Dashboard, &[KeyCode::Char('b')], SwitchToBest, "b: Best server"),
                bind(Dashboard, &[KeyCode::Char('p')], ToggleAutoSwitch, "p: Pause/Resume"),
                bind(Dashboard, &[KeyCode::Char('u')], CheckUpdates, "u: Update"),
                bind(Dashboard, &[KeyCode::Char('l')], ViewLogs, "l: Logs"),
                bind(Dashboard, &[KeyCode::Char('S')], RefreshSubscription, "S: Subscription"),
                bind(Dashboard, &[KeyCode::Char('P')], PingServers, "P: Ping"),
                bind(Dashboard, &[KeyCode::Char('r')], RefreshNow, "r: Refresh"),
                bind(Panel, &[KeyCode::Char('q'), KeyCode::Esc, KeyCode::Left], ClosePanel, "q/Esc/←: Close"),
                bind(Panel, &[KeyCode::Up], ScrollUp, ""),
                bind(Panel, &[KeyCode::Down], ScrollDown, "↑/↓: Scroll"),
                bind(Panel, &[KeyCode::PageUp], PageUp, ""),
                bind(Panel, &[KeyCode::PageDown], PageDown, "PgUp/PgDn: Page"),
                bind(Panel, &[KeyCode::Char('f'), KeyCode::End], Follow, "f/End: Follow"),
                bind(Panel, &[KeyCode::Char('r')], Reload, "r: Reload"),
            ],
        }
    }

    pub fn lookup(&self, scope: KeyScope, code: KeyCode) -> Option<InputAction> {
        self.bindings
            .iter()
            .find(|b| b.scope == scope && b.codes.contains(&code))
            .map(|b| b.action)
    }

    pub fn help_line(&self, scope: KeyScope) -> String {
        self.bindings
            .iter()
            .filter(|b| b.scope == scope && !b.hint.is_empty())
            .map(|b| b.hint)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn scopes_resolve_same_key_differently() {
        let keymap = Keymap::standard();
        assert_eq!(keymap.lookup(KeyScope::Dashboard, KeyCode::Char('r')), Some(InputAction::RefreshNow));
        assert_eq!(keymap.lookup(KeyScope::Panel, KeyCode::Char('r')), Some(InputAction::Reload));
        assert_eq!(keymap.lookup(KeyScope::Panel, KeyCode::Esc), Some(InputAction::ClosePanel));
        assert_eq!(keymap.lookup(KeyScope::Dashboard, KeyCode::Char('z')), None);
    }

    #[test]
    fn no_key_bound_twice_in_a_scope() {
        let keymap = Keymap::standard();
        for scope in [KeyScope::Dashboard, KeyScope::Panel] {
            let mut seen = HashSet::new();
            for b in keymap.bindings.iter().filter(|b| b.scope == scope) {
                for code in &b.codes {
                    assert!(seen.insert(*code), "{:?} bound twice in {:?}", code, scope);
                }
            }
        }
    }

    #[test]
    fn help_line_skips_hidden_bindings() {
        let help = Keymap::standard().help_line(KeyScope::Panel);
        assert!(help.starts_with("q/Esc/←: Close"));
        assert!(help.contains("f/End: Follow"));
        assert!(!help.contains(" |  | "));
    }
}
