//! Administrative commands. Each one is fire-and-report: nothing local is
//! mutated, the caller resyncs to observe the backend's new state.

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::client::{ClientError, ClientResult, SwitcherClient};
use crate::model::{AutoSwitchAction, SwitchRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Let the backend pick, avoiding the server currently in use.
    SwitchToBest { avoid: String },
    SwitchToSelected { target: String },
    ToggleAutoSwitch(AutoSwitchAction),
    CheckUpdates,
}

/// How the status view should catch up after a successful command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resync {
    None,
    Immediate,
    /// Give the backend time to finish switching first.
    Delayed,
}

impl Command {
    pub fn resync(&self) -> Resync {
        match self {
            Command::SwitchToBest { .. } | Command::SwitchToSelected { .. } => Resync::Delayed,
            Command::ToggleAutoSwitch(_) => Resync::Immediate,
            Command::CheckUpdates => Resync::None,
        }
    }

    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            Command::SwitchToBest { .. } => Some("Switching to the best server..."),
            Command::SwitchToSelected { .. } => Some("Switching to the selected server..."),
            Command::ToggleAutoSwitch(_) => None,
            Command::CheckUpdates => Some("Update check started, see the logs for the result."),
        }
    }

    fn error_context(&self) -> &'static str {
        match self {
            Command::SwitchToBest { .. } | Command::SwitchToSelected { .. } => "Error switching server",
            Command::ToggleAutoSwitch(_) => "Error toggling auto-switch",
            Command::CheckUpdates => "Error checking for updates",
        }
    }

    async fn run(&self, client: &SwitcherClient) -> ClientResult<()> {
        match self {
            Command::SwitchToBest { avoid } => {
                client
                    .switch(&SwitchRequest::Avoid { avoid_server: avoid.clone() })
                    .await
            }
            Command::SwitchToSelected { target } => {
                client
                    .switch(&SwitchRequest::Select { target_server: target.clone() })
                    .await
            }
            Command::ToggleAutoSwitch(action) => client.set_auto_switch(*action).await,
            Command::CheckUpdates => client.trigger_update().await,
        }
    }
}

/// A finished command and what the backend said about it.
#[derive(Debug)]
pub struct Completion {
    pub command: Command,
    pub outcome: ClientResult<()>,
}

impl Completion {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Text for the user, if this outcome warrants one. Backend messages win
    /// over transport details.
    pub fn notice(&self) -> Option<String> {
        match &self.outcome {
            Ok(()) => self.command.success_notice().map(str::to_string),
            Err(ClientError::Rejected(message)) => Some(format!("Error: {}", message)),
            Err(e) => Some(format!("{}: {}", self.command.error_context(), e)),
        }
    }
}

/// Runs one command at a time in the background.
pub struct CommandDispatcher {
    client: SwitcherClient,
    handle: Handle,
    pending: Option<(Command, oneshot::Receiver<ClientResult<()>>)>,
}

impl CommandDispatcher {
    pub fn new(client: SwitcherClient, handle: Handle) -> Self {
        Self {
            client,
            handle,
            pending: None,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.pending.is_some()
    }

    /// Start `command`. Refused (returns `false`) while another is running.
    pub fn dispatch(&mut self, command: Command) -> bool {
        if self.pending.is_some() {
            warn!(?command, "command refused, another is in progress");
            return false;
        }

        info!(?command, "dispatching command");
        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        let task_command = command.clone();
        self.handle.spawn(async move {
            let outcome = task_command.run(&client).await;
            let _ = tx.send(outcome);
        });
        self.pending = Some((command, rx));
        true
    }

    /// Poll for the running command's completion.
    pub fn poll(&mut self) -> Option<Completion> {
        let (_, rx) = self.pending.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(ClientError::Interrupted),
        };
        let (command, _) = self.pending.take()?;

        match &outcome {
            Ok(()) => info!(?command, "command succeeded"),
            Err(e) => warn!(?command, error = %e, "command failed"),
        }
        Some(Completion { command, outcome })
    }
}
