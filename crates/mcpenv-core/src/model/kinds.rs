//! 環境設定で使う選択肢の定義

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 小文字でシリアライズされる列挙型を定義する
///
/// `as_str`, `Display`, `FromStr` と受け付ける値の一覧を生成します。
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// 受け付けるすべての値（宣言順）
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            const EXPECTED: &'static str = concat!($($text, " "),+);

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $( $text => Ok($name::$variant), )+
                    other => Err(ValidationError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                        expected: $name::EXPECTED.trim_end(),
                    }),
                }
            }
        }
    };
}

closed_set! {
    /// 環境を構築するクラウド（またはクラスタ）
    Provider, "provider" {
        Aws => "aws",
        Gcp => "gcp",
        Azure => "azure",
        Kubernetes => "kubernetes",
    }
}

closed_set! {
    /// コンピュートの実行方式
    Orchestrator, "compute.orchestrator" {
        Kubernetes => "kubernetes",
        Vm => "vm",
    }
}

closed_set! {
    /// マネージドデータベースのエンジン
    DatabaseEngine, "database.engine" {
        Postgres => "postgres",
        Mysql => "mysql",
    }
}

closed_set! {
    /// データベースのサービスティア
    DatabaseTier, "database.tier" {
        Dev => "dev",
        Prod => "prod",
    }
}

closed_set! {
    /// データベースのインスタンスサイズ
    DatabaseSize, "database.size" {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

closed_set! {
    /// ロードバランサーの公開範囲
    Exposure, "loadBalancer.exposure" {
        /// インターネットから到達可能
        Public => "public",
        /// ネットワーク内部からのみ到達可能
        Private => "private",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("aws".parse::<Provider>().unwrap(), Provider::Aws);
        assert_eq!(" GCP ".parse::<Provider>().unwrap(), Provider::Gcp);
        assert_eq!(
            "kubernetes".parse::<Provider>().unwrap(),
            Provider::Kubernetes
        );
    }

    #[test]
    fn test_unknown_variant_lists_choices() {
        let err = "digitalocean".parse::<Provider>().unwrap_err();
        match err {
            ValidationError::UnknownVariant {
                field,
                value,
                expected,
            } => {
                assert_eq!(field, "provider");
                assert_eq!(value, "digitalocean");
                assert_eq!(expected, "aws gcp azure kubernetes");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&DatabaseSize::Medium).unwrap();
        assert_eq!(json, "\"medium\"");

        let exposure: Exposure = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(exposure, Exposure::Private);

        assert!(serde_json::from_str::<Orchestrator>("\"nomad\"").is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for provider in Provider::ALL {
            assert_eq!(provider.to_string(), provider.as_str());
        }
        assert_eq!(Orchestrator::ALL.len(), 2);
    }
}
