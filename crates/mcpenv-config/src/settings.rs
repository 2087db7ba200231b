//! 設定値と上書きの順序
//!
//! デフォルト値、設定ファイル、`MCPENV_*` 環境変数の順に適用する。

use crate::error::{ConfigError, Result};
use crate::find_settings_file;
use crate::parser::parse_settings;
use kdl::KdlDocument;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 遅延の上限
pub const MAX_DELAY: Duration = Duration::from_secs(600);

/// 上書き用の環境変数
pub const ENV_PLANNING_DELAY_MS: &str = "MCPENV_PLANNING_DELAY_MS";
pub const ENV_APPLYING_DELAY_MS: &str = "MCPENV_APPLYING_DELAY_MS";
pub const ENV_DESTROYING_DELAY_MS: &str = "MCPENV_DESTROYING_DELAY_MS";
pub const ENV_RESET_DELAY_MS: &str = "MCPENV_RESET_DELAY_MS";
pub const ENV_NOTIFICATION_TTL_MS: &str = "MCPENV_NOTIFICATION_TTL_MS";
pub const ENV_DEFAULT_NAME: &str = "MCPENV_DEFAULT_NAME";
pub const ENV_DEFAULT_PROVIDER: &str = "MCPENV_DEFAULT_PROVIDER";
pub const ENV_DEFAULT_REGION: &str = "MCPENV_DEFAULT_REGION";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub lifecycle: LifecycleSettings,
    pub notifications: NotificationSettings,
    pub defaults: EnvironmentDefaults,
}

/// シミュレーションの各ステージの所要時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// planning → applying
    pub planning_delay: Duration,
    /// applying → deployed
    pub applying_delay: Duration,
    /// destroying → destroyed
    pub destroying_delay: Duration,
    /// destroyed → idle
    pub reset_delay: Duration,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            planning_delay: Duration::from_millis(1500),
            applying_delay: Duration::from_millis(2000),
            destroying_delay: Duration::from_millis(1500),
            reset_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    /// 通知の表示時間
    pub dismiss_after: Duration,
    /// 同時に表示する通知の上限。超えた分は古い順に消える
    pub max_visible: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            dismiss_after: Duration::from_millis(4000),
            max_visible: 5,
        }
    }
}

/// 新しい環境の初期値
///
/// プロバイダー名の検証はモデル側で行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDefaults {
    pub name: String,
    pub provider: String,
    pub region: String,
}

impl Default for EnvironmentDefaults {
    fn default() -> Self {
        Self {
            name: "mcp-demo".to_string(),
            provider: "aws".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

impl Settings {
    /// 設定ファイルを探して読み込み、環境変数で上書きする
    ///
    /// 設定ファイルがない場合はデフォルト値を使う。
    pub fn load() -> Result<Self> {
        let mut settings = match find_settings_file() {
            Ok(path) => Self::from_file(&path)?,
            Err(ConfigError::SettingsFileNotFound) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Loading settings");
        Self::from_kdl_str(&content)
    }

    pub fn from_kdl_str(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse()?;
        parse_settings(&doc)
    }

    /// `MCPENV_*` 環境変数で現在の値を上書き
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        let lifecycle = &mut self.lifecycle;
        for (key, slot) in [
            (ENV_PLANNING_DELAY_MS, &mut lifecycle.planning_delay),
            (ENV_APPLYING_DELAY_MS, &mut lifecycle.applying_delay),
            (ENV_DESTROYING_DELAY_MS, &mut lifecycle.destroying_delay),
            (ENV_RESET_DELAY_MS, &mut lifecycle.reset_delay),
            (ENV_NOTIFICATION_TTL_MS, &mut self.notifications.dismiss_after),
        ] {
            if let Ok(raw) = std::env::var(key) {
                *slot = parse_delay(key, &raw)?;
                debug!(key, ms = slot.as_millis() as u64, "Delay overridden from environment");
            }
        }

        for (key, slot) in [
            (ENV_DEFAULT_NAME, &mut self.defaults.name),
            (ENV_DEFAULT_PROVIDER, &mut self.defaults.provider),
            (ENV_DEFAULT_REGION, &mut self.defaults.region),
        ] {
            if let Ok(value) = std::env::var(key) {
                *slot = value;
            }
        }

        Ok(())
    }
}

/// ミリ秒の文字列を遅延としてパース
pub(crate) fn parse_delay(key: &str, raw: &str) -> Result<Duration> {
    let ms: i128 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}' はミリ秒の数値ではありません", raw),
    })?;
    delay_from_millis(key, ms)
}

pub(crate) fn delay_from_millis(key: &str, ms: i128) -> Result<Duration> {
    if ms < 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "負の値は指定できません".to_string(),
        });
    }
    let delay = u64::try_from(ms)
        .map(Duration::from_millis)
        .unwrap_or(Duration::MAX);
    if delay > MAX_DELAY {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} ms 以下で指定してください", MAX_DELAY.as_millis()),
        });
    }
    Ok(delay)
}
