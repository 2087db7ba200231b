//! mcpenv lifecycle
//!
//! Simulated provisioning for an environment. Nothing is created in any
//! cloud: each stage is a timed transition standing in for the future
//! orchestration call.
//!
//! ```text
//!   provision()                     destroy()
//!       │                               │
//!  idle ─┴─▶ planning ─▶ applying ─▶ deployed ─┴─▶ destroying ─▶ destroyed ─▶ idle
//!            (planning     (applying                 (destroying   (reset
//!             delay)        delay)                    delay)        delay)
//! ```
//!
//! Every transition is published as a [`LifecycleEvent`]; the
//! [`NotificationTray`] turns them into auto-dismissing notifications.

pub mod error;
pub mod event;
pub mod notify;
pub mod simulator;
pub mod status;

// Re-exports
pub use error::{LifecycleError, Result};
pub use event::{EventKind, LifecycleEvent, Notification};
pub use notify::NotificationTray;
pub use simulator::{
    LifecycleRun, LifecycleSimulator, RunKind, RunOutcome, Snapshot, StageDelays,
};
pub use status::LifecycleStatus;
