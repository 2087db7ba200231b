//! トップレベルフィールドの更新
//!
//! 更新は [`EnvironmentConfig`] のトップレベルフィールドを丸ごと置き換える。
//! フォーム入力は JSON として受け取り、型変換なしでデコードする
//! （`"3"` は数値として扱わない）。

use super::config::{
    ComputeConfig, DatabaseConfig, EnvironmentConfig, LoadBalancerConfig, NetworkConfig, Options,
    Tags,
};
use super::kinds::Provider;
use crate::error::ValidationError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// 環境設定のトップレベルフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Provider,
    Region,
    Network,
    Compute,
    Database,
    LoadBalancer,
    Options,
    Tags,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Name,
        Field::Provider,
        Field::Region,
        Field::Network,
        Field::Compute,
        Field::Database,
        Field::LoadBalancer,
        Field::Options,
        Field::Tags,
    ];

    /// ドキュメント上のフィールド名
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Provider => "provider",
            Field::Region => "region",
            Field::Network => "network",
            Field::Compute => "compute",
            Field::Database => "database",
            Field::LoadBalancer => "loadBalancer",
            Field::Options => "options",
            Field::Tags => "tags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ドキュメント表記と snake_case の両方を受け付ける
        match s {
            "name" => Ok(Field::Name),
            "provider" => Ok(Field::Provider),
            "region" => Ok(Field::Region),
            "network" => Ok(Field::Network),
            "compute" => Ok(Field::Compute),
            "database" => Ok(Field::Database),
            "loadBalancer" | "load_balancer" => Ok(Field::LoadBalancer),
            "options" => Ok(Field::Options),
            "tags" => Ok(Field::Tags),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// トップレベルフィールドの新しい値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    Name(String),
    Provider(Provider),
    Region(String),
    Network(NetworkConfig),
    Compute(ComputeConfig),
    Database(DatabaseConfig),
    LoadBalancer(LoadBalancerConfig),
    Options(Options),
    Tags(Tags),
}

impl ConfigUpdate {
    pub fn field(&self) -> Field {
        match self {
            ConfigUpdate::Name(_) => Field::Name,
            ConfigUpdate::Provider(_) => Field::Provider,
            ConfigUpdate::Region(_) => Field::Region,
            ConfigUpdate::Network(_) => Field::Network,
            ConfigUpdate::Compute(_) => Field::Compute,
            ConfigUpdate::Database(_) => Field::Database,
            ConfigUpdate::LoadBalancer(_) => Field::LoadBalancer,
            ConfigUpdate::Options(_) => Field::Options,
            ConfigUpdate::Tags(_) => Field::Tags,
        }
    }

    /// `field` のフォーム入力をデコード
    ///
    /// タグはオブジェクトか `[key, value]` のリストを受け付ける。
    /// リスト形式ではキーの重複をエラーにする。
    pub fn from_json(field: Field, value: serde_json::Value) -> Result<Self, ValidationError> {
        let update = match field {
            Field::Name => ConfigUpdate::Name(decode(field, value)?),
            Field::Provider => {
                let raw: String = decode(field, value)?;
                ConfigUpdate::Provider(raw.parse()?)
            }
            Field::Region => ConfigUpdate::Region(decode(field, value)?),
            Field::Network => ConfigUpdate::Network(decode(field, value)?),
            Field::Compute => ConfigUpdate::Compute(decode(field, value)?),
            Field::Database => ConfigUpdate::Database(decode(field, value)?),
            Field::LoadBalancer => ConfigUpdate::LoadBalancer(decode(field, value)?),
            Field::Options => ConfigUpdate::Options(decode(field, value)?),
            Field::Tags => ConfigUpdate::Tags(decode_tags(value)?),
        };
        Ok(update)
    }

    /// `config` に値を書き込み、変更があったかを返す
    pub(crate) fn apply_to(self, config: &mut EnvironmentConfig) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match self {
            ConfigUpdate::Name(v) => replace(&mut config.name, v),
            ConfigUpdate::Provider(v) => replace(&mut config.provider, v),
            ConfigUpdate::Region(v) => replace(&mut config.region, v),
            ConfigUpdate::Network(v) => replace(&mut config.network, v),
            ConfigUpdate::Compute(v) => replace(&mut config.compute, v),
            ConfigUpdate::Database(v) => replace(&mut config.database, v),
            ConfigUpdate::LoadBalancer(v) => replace(&mut config.load_balancer, v),
            ConfigUpdate::Options(v) => replace(&mut config.options, v),
            ConfigUpdate::Tags(v) => replace(&mut config.tags, v),
        }
    }
}

fn decode<T: DeserializeOwned>(
    field: Field,
    value: serde_json::Value,
) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::Malformed {
        field: field.as_str(),
        message: e.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Map(Tags),
    Pairs(Vec<(String, String)>),
}

fn decode_tags(value: serde_json::Value) -> Result<Tags, ValidationError> {
    match decode::<RawTags>(Field::Tags, value)? {
        RawTags::Map(tags) => Ok(tags),
        RawTags::Pairs(pairs) => tags_from_pairs(pairs),
    }
}

/// キーの重複を拒否してタグを組み立てる
pub fn tags_from_pairs<I, K, V>(pairs: I) -> Result<Tags, ValidationError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut tags = Tags::new();
    for (key, value) in pairs {
        let key = key.into();
        if tags.contains_key(&key) {
            return Err(ValidationError::DuplicateTagKey(key));
        }
        tags.insert(key, value.into());
    }
    Ok(tags)
}
