//! 設定ファイルのパーサー
//!
//! ```kdl
//! lifecycle {
//!     planning_delay_ms 1500
//!     applying_delay_ms 2000
//!     destroying_delay_ms 1500
//!     reset_delay_ms 1000
//! }
//! notifications {
//!     dismiss_after_ms 4000
//!     max_visible 5
//! }
//! defaults {
//!     name "mcp-demo"
//!     provider "aws"
//!     region "us-east-1"
//! }
//! ```

use crate::error::{ConfigError, Result};
use crate::settings::{
    EnvironmentDefaults, LifecycleSettings, NotificationSettings, Settings, delay_from_millis,
};
use kdl::{KdlDocument, KdlNode};
use std::time::Duration;
use tracing::warn;

pub(crate) fn parse_settings(doc: &KdlDocument) -> Result<Settings> {
    let mut settings = Settings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "lifecycle" => parse_lifecycle(node, &mut settings.lifecycle)?,
            "notifications" => parse_notifications(node, &mut settings.notifications)?,
            "defaults" => parse_defaults(node, &mut settings.defaults)?,
            other => warn!(node = other, "Ignoring unknown settings node"),
        }
    }

    Ok(settings)
}

fn parse_lifecycle(node: &KdlNode, lifecycle: &mut LifecycleSettings) -> Result<()> {
    for child in children(node) {
        let key = child.name().value();
        let slot = match key {
            "planning_delay_ms" => &mut lifecycle.planning_delay,
            "applying_delay_ms" => &mut lifecycle.applying_delay,
            "destroying_delay_ms" => &mut lifecycle.destroying_delay,
            "reset_delay_ms" => &mut lifecycle.reset_delay,
            other => {
                warn!(key = other, "Ignoring unknown lifecycle setting");
                continue;
            }
        };
        *slot = delay_arg(child, "lifecycle")?;
    }
    Ok(())
}

fn parse_notifications(node: &KdlNode, notifications: &mut NotificationSettings) -> Result<()> {
    for child in children(node) {
        match child.name().value() {
            "dismiss_after_ms" => {
                notifications.dismiss_after = delay_arg(child, "notifications")?;
            }
            "max_visible" => {
                let value = integer_arg(child, "notifications")?;
                notifications.max_visible = usize::try_from(value)
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "notifications.max_visible".to_string(),
                        message: "1以上の整数を指定してください".to_string(),
                    })?;
            }
            other => warn!(key = other, "Ignoring unknown notifications setting"),
        }
    }
    Ok(())
}

fn parse_defaults(node: &KdlNode, defaults: &mut EnvironmentDefaults) -> Result<()> {
    for child in children(node) {
        let slot = match child.name().value() {
            "name" => &mut defaults.name,
            "provider" => &mut defaults.provider,
            "region" => &mut defaults.region,
            other => {
                warn!(key = other, "Ignoring unknown defaults setting");
                continue;
            }
        };
        *slot = string_arg(child, "defaults")?;
    }
    Ok(())
}

fn children(node: &KdlNode) -> impl Iterator<Item = &KdlNode> {
    node.children().into_iter().flat_map(|doc| doc.nodes())
}

fn qualified(section: &str, node: &KdlNode) -> String {
    format!("{}.{}", section, node.name().value())
}

fn integer_arg(node: &KdlNode, section: &str) -> Result<i128> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_integer())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: qualified(section, node),
            message: "整数の引数が必要です".to_string(),
        })
}

fn delay_arg(node: &KdlNode, section: &str) -> Result<Duration> {
    let ms = integer_arg(node, section)?;
    delay_from_millis(&qualified(section, node), ms)
}

fn string_arg(node: &KdlNode, section: &str) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: qualified(section, node),
            message: "文字列の引数が必要です".to_string(),
        })
}
