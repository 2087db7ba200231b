//! 環境設定のバリデーション
//!
//! すべてのチェックは型付きの [`ValidationError`] を返す。値の丸めや型変換は
//! 行わない。

use crate::error::ValidationError;
use crate::model::{
    ComputeConfig, EnvironmentConfig, NODE_COUNT, NetworkConfig, PRIVATE_SUBNETS, PUBLIC_SUBNETS,
    Tags,
};
use regex::Regex;
use std::net::IpAddr;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// タグキーの最大長
pub const MAX_TAG_KEY_LEN: usize = 128;
/// タグ値の最大長
pub const MAX_TAG_VALUE_LEN: usize = 256;

/// IPv4 ネットワークから切り出すサブネットの最小プレフィックス
const MIN_SUBNET_PREFIX_V4: u8 = 28;
const MIN_SUBNET_PREFIX_V6: u8 = 64;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex"));

static TAG_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:/=+@-]*$").expect("valid regex"));

/// 設定全体を検証
pub fn validate_config(config: &EnvironmentConfig) -> Result<(), ValidationError> {
    validate_name(&config.name)?;
    validate_required("region", &config.region)?;
    validate_network(&config.network)?;
    validate_compute(&config.compute)?;
    validate_tags(&config.tags)
}

/// 環境名はリソース名のプレフィックスにもなるため DNS ラベルの規則に従う
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    if !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// 空でない自由入力の文字列 (リージョンなど)。空白のみは空とみなす
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// 空白を含まない識別子 (インスタンスタイプなど)
pub fn validate_token(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::Whitespace {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(*range.start()),
            max: i64::from(*range.end()),
        })
    }
}

pub fn validate_network(network: &NetworkConfig) -> Result<(), ValidationError> {
    check_range(
        "network.publicSubnets",
        network.public_subnets,
        &PUBLIC_SUBNETS,
    )?;
    check_range(
        "network.privateSubnets",
        network.private_subnets,
        &PRIVATE_SUBNETS,
    )?;

    let (addr, prefix) = parse_cidr(&network.cidr)?;

    // サブネットごとに 2 のべき乗サイズの領域が必要
    let subnets = network.total_subnets();
    let extra_bits = subnets.next_power_of_two().trailing_zeros() as u8;
    let smallest = match addr {
        IpAddr::V4(_) => MIN_SUBNET_PREFIX_V4,
        IpAddr::V6(_) => MIN_SUBNET_PREFIX_V6,
    };
    if prefix + extra_bits > smallest {
        return Err(ValidationError::SubnetsExceedCidr {
            cidr: network.cidr.clone(),
            prefix,
            subnets,
        });
    }

    Ok(())
}

pub fn validate_compute(compute: &ComputeConfig) -> Result<(), ValidationError> {
    validate_token("compute.instanceType", &compute.instance_type)?;
    check_range("compute.nodes", compute.nodes, &NODE_COUNT)
}

/// `addr/prefix` をパースする。ホスト部はゼロでなければならない
pub fn parse_cidr(cidr: &str) -> Result<(IpAddr, u8), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidCidr {
        value: cidr.to_string(),
        reason: reason.to_string(),
    };

    let (addr, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| invalid("プレフィックス長がありません"))?;
    let addr: IpAddr = addr
        .parse()
        .map_err(|_| invalid("IP アドレスとして解釈できません"))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| invalid("プレフィックス長が数値ではありません"))?;

    let host_bits_set = match addr {
        IpAddr::V4(v4) => {
            if prefix > 32 {
                return Err(invalid("プレフィックス長が 32 を超えています"));
            }
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            u32::from(v4) & !mask != 0
        }
        IpAddr::V6(v6) => {
            if prefix > 128 {
                return Err(invalid("プレフィックス長が 128 を超えています"));
            }
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            u128::from(v6) & !mask != 0
        }
    };
    if host_bits_set {
        return Err(invalid("ホスト部のビットが立っています"));
    }

    Ok((addr, prefix))
}

pub fn validate_tag(key: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidTagKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("キーが空です"));
    }
    if key.len() > MAX_TAG_KEY_LEN {
        return Err(invalid("キーが 128 文字を超えています"));
    }
    if key.to_ascii_lowercase().starts_with("aws:") {
        return Err(invalid("'aws:' プレフィックスは予約されています"));
    }
    if !TAG_KEY_RE.is_match(key) {
        return Err(invalid(
            "英数字と _ . : / = + @ - のみ使用できます (先頭は英数字)",
        ));
    }

    let len = value.chars().count();
    if len > MAX_TAG_VALUE_LEN {
        return Err(ValidationError::TagValueTooLong {
            key: key.to_string(),
            len,
            max: MAX_TAG_VALUE_LEN,
        });
    }
    Ok(())
}

pub fn validate_tags(tags: &Tags) -> Result<(), ValidationError> {
    tags.iter().try_for_each(|(k, v)| validate_tag(k, v))
}
