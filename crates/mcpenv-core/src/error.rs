use thiserror::Error;

/// 設定変更の拒否理由
///
/// これらのエラーが返った場合、モデルは変更されない。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} は {min} から {max} の範囲で指定してください (指定値: {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} は空にできません")]
    Empty { field: &'static str },

    #[error(
        "無効な環境名: '{0}'\nヒント: 英小文字・数字・'-' のみ使用できます (最大63文字)"
    )]
    InvalidName(String),

    #[error("無効な {field}: '{value}' (空白は使用できません)")]
    Whitespace { field: &'static str, value: String },

    #[error("無効なCIDRブロック: '{value}'\n理由: {reason}")]
    InvalidCidr { value: String, reason: String },

    #[error("CIDRブロック '{cidr}' (/{prefix}) に {subnets} 個のサブネットを確保できません")]
    SubnetsExceedCidr {
        cidr: String,
        prefix: u8,
        subnets: u32,
    },

    #[error("無効なタグキー: '{key}'\n理由: {reason}")]
    InvalidTagKey { key: String, reason: String },

    #[error("タグ '{key}' の値が長すぎます ({len} > {max} 文字)")]
    TagValueTooLong { key: String, len: usize, max: usize },

    #[error("タグキーが重複しています: {0}")]
    DuplicateTagKey(String),

    #[error("不明なフィールド: {0}")]
    UnknownField(String),

    #[error("不明な {field}: '{value}' (指定可能な値: {expected})")]
    UnknownVariant {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{field} の値が不正です: {message}")]
    Malformed { field: &'static str, message: String },
}

/// ドキュメントの出力時に発生するエラー
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAMLエラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
