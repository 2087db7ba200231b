//! トレーシングの初期化

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` より優先されるフィルタ変数
pub const LOG_ENV: &str = "MCPENV_LOG";

/// `info` レベルでサブスクライバーを登録
///
/// グローバルなサブスクライバーが登録済みの場合は `false` を返す。
pub fn init_tracing() -> bool {
    init_tracing_with("info")
}

/// サブスクライバーを登録
///
/// `MCPENV_LOG` も `RUST_LOG` も未設定なら `default_directive` を使う。
pub fn init_tracing_with(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_tracing_with("debug");
        assert!(!init_tracing());
    }
}
