//! Status synchronization: owns the authoritative snapshot and the single
//! outstanding `/api/status` fetch.

use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{ClientError, SwitcherClient};
use crate::model::StatusSnapshot;

struct FetchOutcome {
    seq: u64,
    result: Result<StatusSnapshot, ClientError>,
}

struct InFlight {
    seq: u64,
    started: Instant,
    task: JoinHandle<()>,
}

/// Fetches run on the runtime and report back over a channel drained by
/// [`StatusSyncer::poll`]. At most one fetch is outstanding; requests made
/// meanwhile collapse into one follow-up fetch. Results are applied in issue
/// order, so a slow older reply can never overwrite a newer snapshot.
pub struct StatusSyncer {
    client: SwitcherClient,
    handle: Handle,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: Option<InFlight>,
    queued: bool,
    next_seq: u64,
    applied_seq: u64,
    stale_after: Duration,
    snapshot: Option<StatusSnapshot>,
    last_error: Option<String>,
}

impl StatusSyncer {
    pub fn new(client: SwitcherClient, handle: Handle, stale_after: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            handle,
            tx,
            rx,
            in_flight: None,
            queued: false,
            next_seq: 0,
            applied_seq: 0,
            stale_after,
            snapshot: None,
            last_error: None,
        }
    }

    /// Latest good snapshot. Failed fetches leave it untouched.
    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        self.snapshot.as_ref()
    }

    /// Error of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ask for a fresh snapshot. Returns `true` if a fetch was issued now,
    /// `false` if it was queued behind the one in flight.
    pub fn request(&mut self) -> bool {
        if let Some(in_flight) = self.in_flight.take() {
            if in_flight.started.elapsed() < self.stale_after {
                debug!(seq = in_flight.seq, "status fetch in flight, queueing resync");
                self.in_flight = Some(in_flight);
                self.queued = true;
                return false;
            }
            warn!(
                seq = in_flight.seq,
                elapsed_ms = in_flight.started.elapsed().as_millis() as u64,
                "abandoning stalled status fetch"
            );
            in_flight.task.abort();
        }
        self.issue();
        true
    }

    fn issue(&mut self) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let task = self.handle.spawn(async move {
            let result = client.status().await;
            let _ = tx.send(FetchOutcome { seq, result });
        });
        self.in_flight = Some(InFlight {
            seq,
            started: Instant::now(),
            task,
        });
        self.queued = false;
        debug!(seq, "status fetch issued");
    }

    /// Drain completed fetches. Returns `true` when the snapshot was replaced
    /// and the view needs reconciling.
    pub fn poll(&mut self) -> bool {
        let mut replaced = false;
        while let Ok(outcome) = self.rx.try_recv() {
            replaced |= self.apply(outcome);
        }
        if self.queued && self.in_flight.is_none() {
            self.issue();
        }
        replaced
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if self.in_flight.as_ref().is_some_and(|f| f.seq == outcome.seq) {
            self.in_flight = None;
        }
        match outcome.result {
            Ok(snapshot) => {
                if outcome.seq <= self.applied_seq {
                    debug!(
                        seq = outcome.seq,
                        applied = self.applied_seq,
                        "discarding out-of-order status reply"
                    );
                    return false;
                }
                self.applied_seq = outcome.seq;
                self.snapshot = Some(snapshot);
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!(seq = outcome.seq, error = %e, "status fetch failed");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Abort the outstanding fetch and drop any queued resync.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
        self.queued = false;
    }
}

impl Drop for StatusSyncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
