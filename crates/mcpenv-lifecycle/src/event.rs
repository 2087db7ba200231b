//! Lifecycle events and notifications

use crate::error::Result;
use crate::status::LifecycleStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of transition an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// → planning
    ProvisioningStarted,
    /// planning → applying
    ApplyingPlan,
    /// applying → deployed
    EnvironmentDeployed,
    /// deployed → destroying
    DestroyingStarted,
    /// destroying → destroyed
    AllDestroyed,
    /// destroyed → idle. Not surfaced as a notification.
    Reset,
}

impl EventKind {
    /// Kind for a transition into `status`
    pub fn entering(status: LifecycleStatus) -> Self {
        match status {
            LifecycleStatus::Planning => EventKind::ProvisioningStarted,
            LifecycleStatus::Applying => EventKind::ApplyingPlan,
            LifecycleStatus::Deployed => EventKind::EnvironmentDeployed,
            LifecycleStatus::Destroying => EventKind::DestroyingStarted,
            LifecycleStatus::Destroyed => EventKind::AllDestroyed,
            LifecycleStatus::Idle => EventKind::Reset,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EventKind::ProvisioningStarted => "Provisioning started",
            EventKind::ApplyingPlan => "Applying plan",
            EventKind::EnvironmentDeployed => "Environment deployed",
            EventKind::DestroyingStarted => "Destroying environment",
            EventKind::AllDestroyed => "All resources destroyed",
            EventKind::Reset => "Ready",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventKind::ProvisioningStarted => {
                "Planning infrastructure changes for the environment."
            }
            EventKind::ApplyingPlan => {
                "Creating network, compute, database and load balancer resources."
            }
            EventKind::EnvironmentDeployed => "All resources are up and running.",
            EventKind::DestroyingStarted => "Tearing down all provisioned resources.",
            EventKind::AllDestroyed => "The environment has been fully removed.",
            EventKind::Reset => "The environment can be provisioned again.",
        }
    }

    /// Whether this kind is surfaced to the user
    pub fn notifies(&self) -> bool {
        *self != EventKind::Reset
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::ProvisioningStarted => "provisioning-started",
            EventKind::ApplyingPlan => "applying-plan",
            EventKind::EnvironmentDeployed => "environment-deployed",
            EventKind::DestroyingStarted => "destroying-started",
            EventKind::AllDestroyed => "all-destroyed",
            EventKind::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// One accepted status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Monotonic per simulator, starting at 1
    pub sequence: u64,
    /// Run that produced the transition
    pub run: u64,
    pub from: LifecycleStatus,
    pub to: LifecycleStatus,
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl LifecycleEvent {
    pub(crate) fn new(sequence: u64, run: u64, from: LifecycleStatus, to: LifecycleStatus) -> Self {
        let kind = EventKind::entering(to);
        Self {
            sequence,
            run,
            from,
            to,
            kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            at: Utc::now(),
        }
    }

    /// User-facing notification, if this event produces one
    pub fn notification(&self) -> Option<Notification> {
        self.kind.notifies().then(|| Notification {
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            at: self.at,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}
