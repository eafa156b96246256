mod state;
mod event_loop;
mod render;
mod input;
mod keymap;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};
use tracing::info;

use crate::client::SwitcherClient;
use crate::config::PanelConfig;
use crate::controller::PanelController;
use crate::layout::TargetRegistry;
use crate::model::AppView;
use crate::view::Presenter;

pub use input::{InputResult, handle_key, handle_mouse};
pub use keymap::{Binding, InputAction, KeyScope, Keymap};
pub use state::{Notice, PendingAction, PendingActionKind};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Main application state.
pub struct App {
    pub controller: PanelController,
    pub keymap: Keymap,
    pub app_view: AppView,
    pub pending_action: Option<PendingAction>,
    pub notice: Option<Notice>,
    pub base_url: String,
    pub confirm_timeout: Duration,
    pub frame_rate: Duration,
}

impl App {
    pub fn new(controller: PanelController, config: &PanelConfig) -> Self {
        Self {
            controller,
            keymap: Keymap::standard(),
            app_view: AppView::Dashboard,
            pending_action: None,
            notice: None,
            base_url: config.base_url.clone(),
            confirm_timeout: config.confirm_timeout,
            frame_rate: Duration::from_millis(100),
        }
    }

    pub fn key_scope(&self) -> KeyScope {
        match self.app_view {
            AppView::Dashboard => KeyScope::Dashboard,
            AppView::Panel(_) => KeyScope::Panel,
        }
    }
}

/// Run the application. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(config: PanelConfig, should_quit: Arc<AtomicBool>) -> io::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );
    let client = SwitcherClient::new(&config.base_url).map_err(io::Error::other)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Clear(ClearType::All))?;

    // Targets are fixed for the session once the terminal size is known.
    let registry = terminal::size()
        .map(|(cols, rows)| TargetRegistry::for_viewport(cols, rows))
        .unwrap_or_default();
    let controller = PanelController::new(client, rt.handle().clone(), &config, registry);
    let mut app = App::new(controller, &config);

    info!(url = %config.base_url, "panel started");
    let result = main_loop(&mut app, &should_quit);

    app.controller.shutdown();
    restore_terminal();
    info!("panel stopped");
    result
}

fn main_loop(app: &mut App, should_quit: &AtomicBool) -> io::Result<()> {
    app.controller.start();
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }

        let now = Instant::now();

        if app.expire_pending_action(now) {
            needs_render = true;
        }
        if app.process_tick(now) {
            needs_render = true;
        }
        if app.poll_background(now) {
            needs_render = true;
        }

        if needs_render {
            if Presenter::render_size_guard()? {
                needs_render = false;
                if crossterm::event::poll(app.frame_rate)? {
                    let _ = crossterm::event::read()?;
                }
                continue;
            }

            render::render(app)?;
            needs_render = false;
        }

        let timeout = app.controller.until_next_tick(Instant::now()).min(app.frame_rate);
        if crossterm::event::poll(timeout)? {
            let result = match crossterm::event::read()? {
                Event::Key(key_event) => input::handle_key(app, key_event),
                Event::Mouse(mouse_event) => input::handle_mouse(app, mouse_event),
                Event::Resize(_, _) => Some(InputResult::Consumed),
                _ => None,
            };
            match result {
                Some(InputResult::Quit) => break,
                Some(InputResult::Consumed) => needs_render = true,
                None => {}
            }
        }
    }

    Ok(())
}
