//! mcpenv
//!
//! マルチクラウド環境ビルダー。環境設定を編集し、JSON/YAML ドキュメントとして
//! プレビューし、シミュレートされたプロビジョニングを実行します。
//!
//! ```no_run
//! use mcpenv::{EnvironmentController, Settings};
//!
//! # async fn demo() -> mcpenv::Result<()> {
//! let mut env = EnvironmentController::new(&Settings::default())?;
//! env.update_field("region", serde_json::json!("eu-west-1"))?;
//! println!("{}", env.preview_json()?);
//!
//! if let Some(run) = env.provision()? {
//!     run.wait().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod telemetry;

pub use controller::EnvironmentController;
pub use error::{Error, Result};
pub use telemetry::{LOG_ENV, init_tracing, init_tracing_with};

pub use mcpenv_config::{
    EnvironmentDefaults, LifecycleSettings, NotificationSettings, Settings,
};
pub use mcpenv_core::{
    Change, ComputeConfig, ConfigUpdate, DatabaseConfig, DatabaseEngine, DatabaseSize,
    DatabaseTier, EnvironmentConfig, EnvironmentDocument, EnvironmentModel, Exposure, Field,
    LoadBalancerConfig, NetworkConfig, Options, Orchestrator, Provider, Tags, ValidationError,
};
pub use mcpenv_lifecycle::{
    EventKind, LifecycleEvent, LifecycleRun, LifecycleSimulator, LifecycleStatus, Notification,
    NotificationTray, RunKind, RunOutcome, Snapshot, StageDelays,
};
