//! 環境設定
//!
//! プロビジョニング前にユーザーが編集する、環境のあるべき状態。
//! フィールド名はプレビューの形式に合わせて camelCase でシリアライズされる
//! （`loadBalancer`, `publicSubnets` など）。

use super::kinds::{DatabaseEngine, DatabaseSize, DatabaseTier, Exposure, Orchestrator, Provider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// パブリックサブネット数の許容範囲
pub const PUBLIC_SUBNETS: RangeInclusive<u32> = 1..=6;
/// プライベートサブネット数の許容範囲
pub const PRIVATE_SUBNETS: RangeInclusive<u32> = 0..=6;
/// ノード数の許容範囲
pub const NODE_COUNT: RangeInclusive<u32> = 1..=50;

/// タグ。出力を決定的にするため順序付きマップを使う
pub type Tags = BTreeMap<String, String>;

/// 環境定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// 環境名（mcp-demo など）
    pub name: String,
    pub provider: Provider,
    /// リージョン（us-east-1, East US 2 など）。自由入力
    pub region: String,
    pub network: NetworkConfig,
    pub compute: ComputeConfig,
    pub database: DatabaseConfig,
    pub load_balancer: LoadBalancerConfig,
    pub options: Options,
    #[serde(default)]
    pub tags: Tags,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let mut tags = Tags::new();
        tags.insert("environment".to_string(), "demo".to_string());
        tags.insert("managed-by".to_string(), "mcpenv".to_string());

        Self {
            name: "mcp-demo".to_string(),
            provider: Provider::Aws,
            region: "us-east-1".to_string(),
            network: NetworkConfig::default(),
            compute: ComputeConfig::default(),
            database: DatabaseConfig::default(),
            load_balancer: LoadBalancerConfig::default(),
            options: Options::default(),
            tags,
        }
    }
}

/// ネットワーク構成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// アドレス空間（10.0.0.0/16 など）
    pub cidr: String,
    pub public_subnets: u32,
    pub private_subnets: u32,
}

impl NetworkConfig {
    pub fn total_subnets(&self) -> u32 {
        self.public_subnets + self.private_subnets
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            cidr: "10.0.0.0/16".to_string(),
            public_subnets: 2,
            private_subnets: 2,
        }
    }
}

/// コンピュート構成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeConfig {
    pub orchestrator: Orchestrator,
    /// インスタンスタイプ（t3.medium, e2-standard-4 など）
    pub instance_type: String,
    pub nodes: u32,
    pub autoscaling: bool,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            orchestrator: Orchestrator::Kubernetes,
            instance_type: "t3.medium".to_string(),
            nodes: 3,
            autoscaling: true,
        }
    }
}

/// データベース構成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub engine: DatabaseEngine,
    pub tier: DatabaseTier,
    pub size: DatabaseSize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: DatabaseEngine::Postgres,
            tier: DatabaseTier::Dev,
            size: DatabaseSize::Small,
        }
    }
}

/// コンピュートの前段に置くロードバランサー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    pub exposure: Exposure,
}

impl Default for LoadBalancerConfig {
    fn default() -> Self {
        Self {
            exposure: Exposure::Public,
        }
    }
}

/// 追加機能の有効/無効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub monitoring: bool,
    pub logging: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            monitoring: true,
            logging: true,
        }
    }
}
