use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("設定エラー: {0}")]
    Config(#[from] mcpenv_config::ConfigError),

    #[error("無効な環境設定: {0}")]
    Validation(#[from] mcpenv_core::ValidationError),

    #[error("ドキュメント出力エラー: {0}")]
    Model(#[from] mcpenv_core::ModelError),

    #[error("ライフサイクルエラー: {0}")]
    Lifecycle(#[from] mcpenv_lifecycle::LifecycleError),
}

pub type Result<T> = std::result::Result<T, Error>;
