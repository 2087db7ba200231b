//! 環境コントローラー
//!
//! 環境モデルとライフサイクルを一元的に所有する。設定の編集とライフサイクルの
//! 実行は独立しており、実行中に編集してもドキュメントが変わるだけで実行には
//! 影響しない。

use crate::error::Result;
use mcpenv_config::Settings;
use mcpenv_core::{
    Change, ConfigUpdate, EnvironmentConfig, EnvironmentDocument, EnvironmentModel, Provider,
    Tags,
};
use mcpenv_lifecycle::{
    LifecycleEvent, LifecycleRun, LifecycleSimulator, LifecycleStatus, Notification,
    NotificationTray, Snapshot,
};
use std::sync::OnceLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug)]
pub struct EnvironmentController {
    model: EnvironmentModel,
    lifecycle: LifecycleSimulator,
    tray: NotificationTray,
    listener: OnceLock<JoinHandle<()>>,
}

impl EnvironmentController {
    /// `settings.defaults` を初期値として環境を作成
    pub fn new(settings: &Settings) -> Result<Self> {
        let defaults = &settings.defaults;
        let config = EnvironmentConfig {
            name: defaults.name.clone(),
            provider: defaults.provider.parse::<Provider>()?,
            region: defaults.region.clone(),
            ..EnvironmentConfig::default()
        };
        Self::with_config(config, settings)
    }

    /// 指定した設定から作成
    pub fn with_config(config: EnvironmentConfig, settings: &Settings) -> Result<Self> {
        let model = EnvironmentModel::new(config)?;
        info!(
            environment = %model.config().name,
            provider = %model.config().provider,
            "environment ready"
        );
        Ok(Self {
            model,
            lifecycle: LifecycleSimulator::from_settings(&settings.lifecycle),
            tray: NotificationTray::new(settings.notifications),
            listener: OnceLock::new(),
        })
    }

    /// 設定ファイルと環境変数から設定を読み込んで作成
    pub fn load() -> Result<Self> {
        let settings = Settings::load()?;
        Self::new(&settings)
    }

    pub fn config(&self) -> &EnvironmentConfig {
        self.model.config()
    }

    pub fn tags(&self) -> &Tags {
        self.model.tags()
    }

    pub fn revision(&self) -> u64 {
        self.model.revision()
    }

    pub fn document(&self) -> &EnvironmentDocument {
        self.model.document()
    }

    /// 現在のドキュメントを整形済み JSON で取得
    pub fn preview_json(&self) -> Result<String> {
        Ok(self.model.document().to_json_pretty()?)
    }

    pub fn export_yaml(&self) -> Result<String> {
        Ok(self.model.document().to_yaml()?)
    }

    pub fn update(&mut self, update: ConfigUpdate) -> Result<Change> {
        let field = update.field();
        self.model.update(update).map_err(|e| {
            warn!(%field, error = %e, "configuration change rejected");
            e.into()
        })
    }

    pub fn update_field(&mut self, field: &str, value: serde_json::Value) -> Result<Change> {
        self.model.update_field(field, value).map_err(|e| {
            warn!(field, error = %e, "configuration change rejected");
            e.into()
        })
    }

    pub fn update_tag(&mut self, key: &str, value: &str) -> Result<Change> {
        self.model.update_tag(key, value).map_err(|e| {
            warn!(key, error = %e, "tag rejected");
            e.into()
        })
    }

    pub fn status(&self) -> LifecycleStatus {
        self.lifecycle.status()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lifecycle.snapshot()
    }

    pub fn lifecycle(&self) -> &LifecycleSimulator {
        &self.lifecycle
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// 表示中の通知
    pub fn notifications(&self) -> Vec<Notification> {
        self.tray.active()
    }

    pub fn tray(&self) -> &NotificationTray {
        &self.tray
    }

    /// 現在の設定でプロビジョニングを開始
    ///
    /// 実行中の場合は `Ok(None)` を返す。Tokio ランタイム外では
    /// `LifecycleError::NoRuntime` になる。
    pub fn provision(&self) -> Result<Option<LifecycleRun>> {
        self.ensure_listener()?;
        let Some(run) = self.lifecycle.provision()? else {
            return Ok(None);
        };
        info!(
            environment = %self.model.config().name,
            revision = self.model.revision(),
            run = run.id(),
            "provisioning requested"
        );
        Ok(Some(run))
    }

    /// デプロイ済みの環境を削除
    ///
    /// `deployed` 以外では `Ok(None)` を返す。
    pub fn destroy(&self) -> Result<Option<LifecycleRun>> {
        self.ensure_listener()?;
        let Some(run) = self.lifecycle.destroy()? else {
            return Ok(None);
        };
        info!(
            environment = %self.model.config().name,
            run = run.id(),
            "destroy requested"
        );
        Ok(Some(run))
    }

    // 最初の遷移より前に購読して通知の取りこぼしを防ぐ
    fn ensure_listener(&self) -> Result<()> {
        if self.listener.get().is_none() {
            let listener = self.tray.attach(self.lifecycle.subscribe())?;
            if let Err(extra) = self.listener.set(listener) {
                extra.abort();
            }
        }
        Ok(())
    }
}

impl Drop for EnvironmentController {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mcpenv_core::ValidationError;
    use mcpenv_lifecycle::LifecycleError;

    #[test]
    fn test_new_uses_default_seed() {
        let env = EnvironmentController::new(&Settings::default()).unwrap();
        assert_eq!(env.config().name, "mcp-demo");
        assert_eq!(env.config().provider, Provider::Aws);
        assert_eq!(env.status(), LifecycleStatus::Idle);
        assert_eq!(env.revision(), 0);
    }

    #[test]
    fn test_new_rejects_unknown_provider() {
        let mut settings = Settings::default();
        settings.defaults.provider = "digitalocean".to_string();

        let err = EnvironmentController::new(&settings).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownVariant { field: "provider", .. })
        ));
    }

    #[test]
    fn test_edits_work_without_runtime() {
        let mut env = EnvironmentController::new(&Settings::default()).unwrap();
        env.update(ConfigUpdate::Provider(Provider::Azure)).unwrap();
        env.update_tag("owner", "infra").unwrap();

        assert_eq!(env.document().spec.provider, Provider::Azure);
        assert_eq!(env.revision(), 2);
        assert!(env.notifications().is_empty());
    }

    #[test]
    fn test_provision_without_runtime_is_an_error() {
        let env = EnvironmentController::new(&Settings::default()).unwrap();

        assert!(matches!(
            env.provision(),
            Err(Error::Lifecycle(LifecycleError::NoRuntime))
        ));
        assert!(matches!(
            env.destroy(),
            Err(Error::Lifecycle(LifecycleError::NoRuntime))
        ));
        assert_eq!(env.status(), LifecycleStatus::Idle);
    }
}
