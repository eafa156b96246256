use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal;
use tracing::debug;

use crate::dispatch::Command;
use crate::model::{AppView, PanelSource, TextPanelState};
use crate::view::{panel_area, panel_page_size};

use super::keymap::InputAction;
use super::state::{Notice, PendingAction, PendingActionKind};
use super::App;

pub const BUSY_NOTICE: &str = "Another command is still running";

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key(app: &mut App, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    if app.notice.take().is_some() {
        return Some(InputResult::Consumed);
    }

    if let Some(pa) = app.pending_action.take() {
        if code == KeyCode::Char('y') || code == KeyCode::Char('Y') {
            confirm(app, pa.kind);
        } else {
            debug!(prompt = %pa.description, "confirmation cancelled");
        }
        return Some(InputResult::Consumed);
    }

    let action = app.keymap.lookup(app.key_scope(), code)?;
    apply_action(app, action)
}

pub fn handle_mouse(app: &mut App, mouse_event: MouseEvent) -> Option<InputResult> {
    if !matches!(app.app_view, AppView::Panel(_)) {
        return None;
    }
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (cols, rows) = terminal::size().ok()?;
            if panel_area(cols, rows).contains(mouse_event.column, mouse_event.row) {
                return None;
            }
            close_panel(app);
            Some(InputResult::Consumed)
        }
        MouseEventKind::ScrollUp => apply_action(app, InputAction::ScrollUp),
        MouseEventKind::ScrollDown => apply_action(app, InputAction::ScrollDown),
        _ => None,
    }
}

fn apply_action(app: &mut App, action: InputAction) -> Option<InputResult> {
    match action {
        InputAction::Quit => return Some(InputResult::Quit),
        InputAction::SelectPrev => {
            app.controller.select_prev();
        }
        InputAction::SelectNext => {
            app.controller.select_next();
        }
        InputAction::SwitchToSelected => {
            let command = app.controller.switch_to_selected_command()?;
            let Command::SwitchToSelected { target } = &command else {
                return None;
            };
            let description = format!("Switch to: {}?", target);
            ask(app, description, PendingActionKind::Dispatch(command));
        }
        InputAction::SwitchToBest => {
            let command = app.controller.switch_to_best_command();
            ask(
                app,
                "Switch to the best available server?".to_string(),
                PendingActionKind::Dispatch(command),
            );
        }
        InputAction::ToggleAutoSwitch => {
            let command = app.controller.toggle_auto_switch_command();
            dispatch(app, command);
        }
        InputAction::CheckUpdates => dispatch(app, Command::CheckUpdates),
        InputAction::ViewLogs => open_panel(app, PanelSource::Logs),
        InputAction::PingServers => open_panel(app, PanelSource::Ping),
        InputAction::RefreshSubscription => ask_refresh_subscription(app),
        InputAction::RefreshNow => app.controller.request_resync(),
        InputAction::ClosePanel => close_panel(app),
        InputAction::ScrollUp => scroll(app, |s, _| s.scroll_up(1)),
        InputAction::ScrollDown => scroll(app, |s, _| s.scroll_down(1)),
        InputAction::PageUp => scroll(app, |s, page| s.scroll_up(page)),
        InputAction::PageDown => scroll(app, |s, page| s.scroll_down(page)),
        InputAction::Follow => scroll(app, |s, _| s.follow()),
        InputAction::Reload => reload_panel(app),
    }
    Some(InputResult::Consumed)
}

fn ask(app: &mut App, description: String, kind: PendingActionKind) {
    app.pending_action = Some(PendingAction {
        description,
        kind,
        expires: Instant::now() + app.confirm_timeout,
    });
}

fn ask_refresh_subscription(app: &mut App) {
    ask(
        app,
        "Refresh the server subscription?".to_string(),
        PendingActionKind::RefreshSubscription,
    );
}

/// Fetching `/s` replaces the backend's server pool, so reloading that
/// report goes through the same prompt as opening it.
fn reload_panel(app: &mut App) {
    let source = app.controller.log_viewer.state().map(|s| s.source);
    if source == Some(PanelSource::Subscription) {
        ask_refresh_subscription(app);
    } else {
        app.controller.log_viewer.reload();
    }
}

fn confirm(app: &mut App, kind: PendingActionKind) {
    match kind {
        PendingActionKind::Dispatch(command) => dispatch(app, command),
        PendingActionKind::RefreshSubscription => open_panel(app, PanelSource::Subscription),
    }
}

fn dispatch(app: &mut App, command: Command) {
    if !app.controller.dispatch(command) {
        app.notice = Some(Notice::error(BUSY_NOTICE));
    }
}

fn open_panel(app: &mut App, source: PanelSource) {
    if app.controller.open_panel(source) {
        app.app_view = AppView::Panel(source);
    }
}

fn close_panel(app: &mut App) {
    app.controller.log_viewer.close();
    app.app_view = AppView::Dashboard;
}

fn scroll(app: &mut App, f: impl FnOnce(&mut TextPanelState, usize)) {
    let page = terminal::size()
        .map(|(cols, rows)| panel_page_size(cols, rows))
        .unwrap_or(24);
    if let Some(state) = app.controller.log_viewer.state_mut() {
        f(state, page);
    }
}
