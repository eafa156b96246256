use std::time::Instant;

use tracing::debug;

use super::App;
use super::state::Notice;

impl App {
    /// Advance the countdown once per second.
    pub fn process_tick(&mut self, now: Instant) -> bool {
        self.controller.process_tick(now)
    }

    /// Drain everything the background tasks produced since the last frame.
    pub fn poll_background(&mut self, now: Instant) -> bool {
        let mut needs_render = false;

        if self.controller.poll_status() {
            needs_render = true;
        }
        if self.controller.fire_due_resync(now) {
            needs_render = true;
        }
        if let Some(completion) = self.controller.poll_commands(now) {
            if let Some(message) = completion.notice() {
                self.notice = Some(if completion.succeeded() {
                    Notice::info(message)
                } else {
                    Notice::error(message)
                });
            }
            needs_render = true;
        }
        if self.controller.poll_panel() {
            needs_render = true;
        }

        needs_render
    }

    /// Expire pending confirmation if timed out.
    pub fn expire_pending_action(&mut self, now: Instant) -> bool {
        if let Some(ref pa) = self.pending_action {
            if now > pa.expires {
                debug!(prompt = %pa.description, "confirmation expired");
                self.pending_action = None;
                return true;
            }
        }
        false
    }
}
