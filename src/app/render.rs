use std::io;
use std::time::Instant;

use crossterm::{execute, cursor::MoveTo, terminal::Clear, terminal::ClearType};

use crate::model::AppView;
use crate::view::{DashboardFrame, Presenter};

use super::keymap::KeyScope;
use super::App;

pub fn render(app: &App) -> io::Result<()> {
    let mut out = io::stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let controller = &app.controller;
    let last_update = controller.view().and_then(|v| v.last_update.as_deref());
    Presenter::render_header(
        &mut out,
        &app.app_view,
        &app.base_url,
        controller.countdown_display(),
        last_update,
    )?;

    let dashboard_help = app.keymap.help_line(KeyScope::Dashboard);
    Presenter::render_dashboard(&DashboardFrame {
        view: controller.view(),
        selector: controller.selector(),
        registry: controller.registry(),
        command_in_progress: controller.command_in_progress(),
        fetch_error: controller.last_fetch_error(),
        help: &dashboard_help,
    })?;

    if let AppView::Panel(_) = app.app_view {
        if let Some(state) = controller.log_viewer.state() {
            Presenter::render_panel(state, &app.keymap.help_line(KeyScope::Panel))?;
        }
    }

    if let Some(ref pa) = app.pending_action {
        let left = pa.expires.saturating_duration_since(Instant::now());
        Presenter::render_confirmation(&pa.description, left.as_secs() + 1)?;
    } else if let Some(ref notice) = app.notice {
        Presenter::render_notice(&notice.message, notice.is_error)?;
    }

    Ok(())
}
