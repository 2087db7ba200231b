//! Lifecycle status

use serde::{Deserialize, Serialize};

/// Phase of an environment's simulated existence
///
/// ```text
/// idle → planning → applying → deployed
/// deployed → destroying → destroyed → idle
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// Nothing provisioned
    #[default]
    Idle,
    /// Working out what to create
    Planning,
    /// Creating resources
    Applying,
    /// All resources up
    Deployed,
    /// Tearing resources down
    Destroying,
    /// Everything removed; resets to idle shortly
    Destroyed,
}

impl LifecycleStatus {
    /// A provisioning run is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::Planning | LifecycleStatus::Applying | LifecycleStatus::Destroying
        )
    }

    pub fn can_provision(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::Idle | LifecycleStatus::Deployed | LifecycleStatus::Destroyed
        )
    }

    pub fn can_destroy(&self) -> bool {
        *self == LifecycleStatus::Deployed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "idle",
            LifecycleStatus::Planning => "planning",
            LifecycleStatus::Applying => "applying",
            LifecycleStatus::Deployed => "deployed",
            LifecycleStatus::Destroying => "destroying",
            LifecycleStatus::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
