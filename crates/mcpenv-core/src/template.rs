//! 環境ドキュメントのレンダリング
//!
//! 設定を IaC ツールに渡すためのドキュメントに変換する:
//!
//! ```text
//! apiVersion: mcp/v1
//! kind: Environment
//! metadata: { name, tags }
//! spec: <EnvironmentConfig>
//! ```

use crate::error::Result;
use crate::model::{EnvironmentConfig, Tags};
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "mcp/v1";
pub const KIND: &str = "Environment";

/// エクスポート用の環境ドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDocument {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub tags: Tags,
}

impl EnvironmentDocument {
    /// `config` からドキュメントを生成
    pub fn render(config: &EnvironmentConfig) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata {
                name: config.name.clone(),
                tags: config.tags.clone(),
            },
            spec: config.clone(),
        }
    }

    /// プレビュー用の整形済み JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
