//! Lifecycle simulator
//!
//! Drives the provisioning state machine with timed stages. No resources
//! are touched; each stage is a sleep standing in for the real
//! orchestration call.
//!
//! Every accepted `provision`/`destroy` starts a *run*. A run's stages are
//! executed sequentially by one task, and each delayed transition only
//! fires if the run is still current and the status is the one the stage
//! expects. A run superseded by a newer one stops without touching the
//! status.

use crate::error::{LifecycleError, Result};
use crate::event::LifecycleEvent;
use crate::status::LifecycleStatus;
use mcpenv_config::LifecycleSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 64;

/// Simulated duration of each stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDelays {
    pub planning: Duration,
    pub applying: Duration,
    pub destroying: Duration,
    pub reset: Duration,
}

impl StageDelays {
    /// Same delay for every stage
    pub fn uniform(delay: Duration) -> Self {
        Self {
            planning: delay,
            applying: delay,
            destroying: delay,
            reset: delay,
        }
    }
}

impl From<&LifecycleSettings> for StageDelays {
    fn from(settings: &LifecycleSettings) -> Self {
        Self {
            planning: settings.planning_delay,
            applying: settings.applying_delay,
            destroying: settings.destroying_delay,
            reset: settings.reset_delay,
        }
    }
}

impl Default for StageDelays {
    fn default() -> Self {
        Self::from(&LifecycleSettings::default())
    }
}

/// Current status plus bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub status: LifecycleStatus,
    /// Id of the latest accepted run (0 before the first)
    pub run: u64,
    /// Sequence number of the latest event (0 before the first)
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Provision,
    Destroy,
}

impl RunKind {
    /// Status a run of this kind enters immediately
    fn entry_status(&self) -> LifecycleStatus {
        match self {
            RunKind::Provision => LifecycleStatus::Planning,
            RunKind::Destroy => LifecycleStatus::Destroying,
        }
    }

    fn allowed_from(&self, status: LifecycleStatus) -> bool {
        match self {
            RunKind::Provision => status.can_provision(),
            RunKind::Destroy => status.can_destroy(),
        }
    }
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunKind::Provision => write!(f, "provision"),
            RunKind::Destroy => write!(f, "destroy"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage ran; the run left the simulator in `status`
    Completed { status: LifecycleStatus },
    /// A newer run took over; `last` is the final status this run set
    Superseded { last: LifecycleStatus },
}

/// Handle to an accepted run
///
/// Dropping the handle does not stop the run.
#[derive(Debug)]
pub struct LifecycleRun {
    id: u64,
    kind: RunKind,
    task: JoinHandle<RunOutcome>,
}

impl LifecycleRun {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Wait for the run's last stage
    pub async fn wait(self) -> Result<RunOutcome> {
        let run = self.id;
        self.task
            .await
            .map_err(|source| LifecycleError::RunFailed { run, source })
    }
}

struct Shared {
    state: watch::Sender<Snapshot>,
    events: broadcast::Sender<LifecycleEvent>,
    delays: StageDelays,
}

impl Shared {
    /// Accept a new run if the guard allows it
    fn begin(&self, kind: RunKind) -> Option<u64> {
        let mut accepted = None;
        self.state.send_if_modified(|snapshot| {
            if !kind.allowed_from(snapshot.status) {
                return false;
            }
            snapshot.run += 1;
            accepted = Some(snapshot.run);
            self.transition(snapshot, kind.entry_status());
            true
        });
        accepted
    }

    /// Move `run` from `expected` to `next`, unless it was superseded
    fn advance(&self, run: u64, expected: LifecycleStatus, next: LifecycleStatus) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.run != run || snapshot.status != expected {
                return false;
            }
            self.transition(snapshot, next);
            true
        })
    }

    /// Apply a transition and publish its event.
    ///
    /// Runs under the watch channel's lock, so events go out in the order
    /// the transitions happened.
    fn transition(&self, snapshot: &mut Snapshot, next: LifecycleStatus) {
        let from = snapshot.status;
        snapshot.status = next;
        snapshot.sequence += 1;

        let event = LifecycleEvent::new(snapshot.sequence, snapshot.run, from, next);
        info!(
            run = snapshot.run,
            %from,
            to = %next,
            kind = %event.kind,
            "lifecycle transition"
        );
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    async fn drive(self: Arc<Self>, kind: RunKind, run: u64) -> RunOutcome {
        let delays = self.delays;
        let stages = match kind {
            RunKind::Provision => [
                (delays.planning, LifecycleStatus::Planning, LifecycleStatus::Applying),
                (delays.applying, LifecycleStatus::Applying, LifecycleStatus::Deployed),
            ],
            RunKind::Destroy => [
                (delays.destroying, LifecycleStatus::Destroying, LifecycleStatus::Destroyed),
                (delays.reset, LifecycleStatus::Destroyed, LifecycleStatus::Idle),
            ],
        };

        let mut last = kind.entry_status();
        for (delay, expected, next) in stages {
            tokio::time::sleep(delay).await;
            if !self.advance(run, expected, next) {
                debug!(run, %kind, %expected, "run superseded, dropping remaining stages");
                return RunOutcome::Superseded { last };
            }
            last = next;
        }

        info!(run, %kind, status = %last, "lifecycle run finished");
        RunOutcome::Completed { status: last }
    }
}

/// Simulated provisioning lifecycle
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct LifecycleSimulator {
    shared: Arc<Shared>,
}

impl LifecycleSimulator {
    pub fn new(delays: StageDelays) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state,
                events,
                delays,
            }),
        }
    }

    pub fn from_settings(settings: &LifecycleSettings) -> Self {
        Self::new(StageDelays::from(settings))
    }

    pub fn status(&self) -> LifecycleStatus {
        self.shared.state.borrow().status
    }

    pub fn snapshot(&self) -> Snapshot {
        *self.shared.state.borrow()
    }

    pub fn delays(&self) -> StageDelays {
        self.shared.delays
    }

    /// Receive every transition from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.shared.events.subscribe()
    }

    /// Observe the latest snapshot
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.shared.state.subscribe()
    }

    /// Start provisioning.
    ///
    /// Accepted from `idle`, `deployed` and `destroyed`; the status becomes
    /// `planning` before this returns. Returns `Ok(None)` (and changes
    /// nothing) while a run is planning, applying or destroying.
    ///
    /// Fails with [`LifecycleError::NoRuntime`] outside a Tokio runtime,
    /// leaving the status untouched.
    pub fn provision(&self) -> Result<Option<LifecycleRun>> {
        self.start(RunKind::Provision)
    }

    /// Start destroying.
    ///
    /// Accepted only from `deployed`; the status becomes `destroying` before
    /// this returns. Returns `Ok(None)` otherwise.
    pub fn destroy(&self) -> Result<Option<LifecycleRun>> {
        self.start(RunKind::Destroy)
    }

    fn start(&self, kind: RunKind) -> Result<Option<LifecycleRun>> {
        // resolve the runtime before touching state
        let handle = Handle::try_current().map_err(|_| LifecycleError::NoRuntime)?;

        let Some(run) = self.shared.begin(kind) else {
            debug!(%kind, status = %self.status(), "ignoring request in current status");
            return Ok(None);
        };

        let shared = Arc::clone(&self.shared);
        let task = handle.spawn(shared.drive(kind, run));
        Ok(Some(LifecycleRun { id: run, kind, task }))
    }
}

impl Default for LifecycleSimulator {
    fn default() -> Self {
        Self::new(StageDelays::default())
    }
}

impl std::fmt::Debug for LifecycleSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleSimulator")
            .field("snapshot", &self.snapshot())
            .field("delays", &self.shared.delays)
            .finish()
    }
}
