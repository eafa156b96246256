//! On-demand text reports (logs, subscription refresh, ping), fetched once
//! per open and independent of the polling cycle.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::{ClientResult, SwitcherClient};
use crate::model::{PanelSource, TextPanelState};

struct Loaded {
    request_id: u64,
    result: ClientResult<String>,
}

/// A report that finished loading into the open panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLoaded {
    pub source: PanelSource,
    pub succeeded: bool,
}

pub struct LogViewer {
    client: SwitcherClient,
    handle: Handle,
    state: Option<TextPanelState>,
    request_id: u64,
    tx: mpsc::UnboundedSender<Loaded>,
    rx: mpsc::UnboundedReceiver<Loaded>,
}

impl LogViewer {
    pub fn new(client: SwitcherClient, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            handle,
            state: None,
            request_id: 0,
            tx,
            rx,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TextPanelState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut TextPanelState> {
        self.state.as_mut()
    }

    /// Show the loading placeholder and fetch `source` once.
    pub fn open(&mut self, source: PanelSource) {
        self.state = Some(TextPanelState::loading(source));
        self.fetch(source);
    }

    /// Fetch the open report again.
    pub fn reload(&mut self) {
        if let Some(source) = self.state.as_ref().map(|s| s.source) {
            self.open(source);
        }
    }

    /// Close the panel; a fetch still in flight is ignored when it lands.
    pub fn close(&mut self) {
        self.state = None;
        self.request_id += 1;
    }

    fn fetch(&mut self, source: PanelSource) {
        self.request_id += 1;
        let request_id = self.request_id;
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(?source, request_id, "loading text report");
        self.handle.spawn(async move {
            let result = match source {
                PanelSource::Logs => client.logs().await,
                PanelSource::Subscription => client.refresh_subscription().await,
                PanelSource::Ping => client.ping_report().await,
            };
            let _ = tx.send(Loaded { request_id, result });
        });
    }

    /// Move a finished fetch into the panel. Replies for a panel that has
    /// since been closed or reloaded are dropped.
    pub fn poll(&mut self) -> Option<PanelLoaded> {
        let mut loaded = None;
        while let Ok(msg) = self.rx.try_recv() {
            if msg.request_id != self.request_id {
                debug!(request_id = msg.request_id, "dropping superseded report");
                continue;
            }
            let Some(state) = self.state.as_mut() else { continue };
            let succeeded = match msg.result {
                Ok(text) => {
                    state.set_text(&text);
                    true
                }
                Err(e) => {
                    warn!(source = ?state.source, error = %e, "text report failed");
                    state.set_error(&e.to_string());
                    false
                }
            };
            loaded = Some(PanelLoaded { source: state.source, succeeded });
        }
        loaded
    }
}
