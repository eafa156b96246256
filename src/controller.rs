//! The panel's single state owner: snapshot sync, countdown, selection,
//! command dispatch and the text panel all hang off [`PanelController`].

use std::time::{Duration, Instant};

use chrono::Local;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::client::SwitcherClient;
use crate::config::PanelConfig;
use crate::dispatch::{Command, CommandDispatcher, Completion, Resync};
use crate::layout::{RenderTarget, TargetRegistry};
use crate::log_viewer::LogViewer;
use crate::model::{AutoSwitchAction, PanelSource, ServerSelector, StatusSnapshot};
use crate::reconcile::{self, DashboardView};
use crate::scheduler::{Countdown, DelayedTask, Ticker};
use crate::sync::StatusSyncer;

pub struct PanelController {
    syncer: StatusSyncer,
    dispatcher: CommandDispatcher,
    pub log_viewer: LogViewer,
    selector: ServerSelector,
    registry: TargetRegistry,
    view: Option<DashboardView>,
    countdown: Countdown,
    countdown_display: Option<u32>,
    ticker: Ticker,
    resync: DelayedTask,
    resync_delay: Duration,
}

impl PanelController {
    pub fn new(
        client: SwitcherClient,
        handle: Handle,
        config: &PanelConfig,
        registry: TargetRegistry,
    ) -> Self {
        Self {
            syncer: StatusSyncer::new(
                client.clone(),
                handle.clone(),
                config.stale_fetch_after,
            ),
            dispatcher: CommandDispatcher::new(client.clone(), handle.clone()),
            log_viewer: LogViewer::new(client, handle),
            selector: ServerSelector::default(),
            registry,
            view: None,
            countdown: Countdown::new(config.countdown),
            countdown_display: None,
            ticker: Ticker::new(Duration::from_secs(1), Instant::now()),
            resync: DelayedTask::default(),
            resync_delay: config.resync_delay,
        }
    }

    /// Initial fetch; the countdown takes over from here.
    pub fn start(&mut self) {
        info!("starting status sync");
        self.syncer.request();
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn selector(&self) -> &ServerSelector {
        &self.selector
    }

    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        self.syncer.snapshot()
    }

    pub fn last_fetch_error(&self) -> Option<&str> {
        self.syncer.last_error()
    }

    pub fn countdown_display(&self) -> Option<u32> {
        self.countdown_display
    }

    pub fn current_server(&self) -> Option<&str> {
        self.snapshot().and_then(|s| s.current_server())
    }

    /// Derived from the last snapshot only; commands never set it.
    pub fn paused(&self) -> bool {
        self.snapshot().is_some_and(|s| s.auto_switch_paused)
    }

    pub fn resync_pending(&self) -> bool {
        self.resync.is_pending()
    }

    pub fn command_in_progress(&self) -> bool {
        self.dispatcher.in_progress()
    }

    // --- polling cycle ---

    /// Advance the one-second cadence. Returns true if the countdown moved.
    pub fn process_tick(&mut self, now: Instant) -> bool {
        if !self.ticker.due(now) {
            return false;
        }
        self.tick_second();
        true
    }

    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.ticker.until_next(now)
    }

    /// One countdown step; fetches status when the counter runs out.
    pub fn tick_second(&mut self) {
        let step = self.countdown.step();
        if self.registry.contains(RenderTarget::Countdown) {
            self.countdown_display = Some(step.display);
        }
        if step.fetch {
            self.syncer.request();
        }
    }

    /// Fetch now, superseding any scheduled resync.
    pub fn request_resync(&mut self) {
        self.resync.cancel();
        self.syncer.request();
    }

    pub fn fire_due_resync(&mut self, now: Instant) -> bool {
        if self.resync.fire_if_due(now) {
            debug!("scheduled resync due");
            self.syncer.request();
            return true;
        }
        false
    }

    /// Pick up finished status fetches and reconcile when the snapshot changed.
    pub fn poll_status(&mut self) -> bool {
        if !self.syncer.poll() {
            return false;
        }
        let Some(snapshot) = self.syncer.snapshot() else {
            return false;
        };
        self.view = Some(reconcile::reconcile(
            snapshot,
            &self.registry,
            &mut self.selector,
            Local::now(),
        ));
        true
    }

    // --- selection ---

    pub fn select_next(&mut self) -> bool {
        let moved = self.selector.select_next();
        self.refresh_switch_button();
        moved
    }

    pub fn select_prev(&mut self) -> bool {
        let moved = self.selector.select_prev();
        self.refresh_switch_button();
        moved
    }

    pub fn select_server(&mut self, server: &str) -> bool {
        let ok = self.selector.select(server);
        self.refresh_switch_button();
        ok
    }

    fn refresh_switch_button(&mut self) {
        let current = self.syncer.snapshot().and_then(|s| s.current_server());
        if let Some(view) = self.view.as_mut() {
            view.update_switch_button(&self.selector, current);
        }
    }

    // --- commands ---

    pub fn switch_to_best_command(&self) -> Command {
        Command::SwitchToBest {
            avoid: self.current_server().unwrap_or_default().to_string(),
        }
    }

    /// `None` without a selection, or when the selection is already active.
    pub fn switch_to_selected_command(&self) -> Option<Command> {
        if !self.selector.can_switch(self.current_server()) {
            return None;
        }
        self.selector.selected().map(|target| Command::SwitchToSelected {
            target: target.to_string(),
        })
    }

    pub fn toggle_auto_switch_command(&self) -> Command {
        Command::ToggleAutoSwitch(AutoSwitchAction::toggling(self.paused()))
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        self.dispatcher.dispatch(command)
    }

    /// Apply the resync policy of a finished command and hand it back for
    /// user feedback.
    pub fn poll_commands(&mut self, now: Instant) -> Option<Completion> {
        let completion = self.dispatcher.poll()?;
        if completion.succeeded() {
            match completion.command.resync() {
                Resync::Immediate => self.request_resync(),
                Resync::Delayed => {
                    debug!(delay_ms = self.resync_delay.as_millis() as u64, "resync scheduled");
                    self.resync.schedule(now + self.resync_delay);
                }
                Resync::None => {}
            }
        }
        Some(completion)
    }

    // --- text panel ---

    /// Open a text report. Returns false if this session has no panel target.
    pub fn open_panel(&mut self, source: PanelSource) -> bool {
        if !self.registry.contains(RenderTarget::LogsPanel) {
            return false;
        }
        self.log_viewer.open(source);
        true
    }

    pub fn poll_panel(&mut self) -> bool {
        match self.log_viewer.poll() {
            Some(loaded) => {
                // A refreshed subscription can change the server pool.
                if loaded.source == PanelSource::Subscription && loaded.succeeded {
                    self.request_resync();
                }
                true
            }
            None => false,
        }
    }

    pub fn shutdown(&mut self) {
        self.resync.cancel();
        self.syncer.cancel();
        self.log_viewer.close();
    }
}
