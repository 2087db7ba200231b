use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: mcpenv.local.kdl, .mcpenv.local.kdl, mcpenv.kdl, .mcpenv.kdl\n\
        - ./.mcpenv/ ディレクトリ\n\
        - ~/.config/mcpenv/mcpenv.kdl\n\
        または MCPENV_SETTINGS_PATH 環境変数で直接指定できます"
    )]
    SettingsFileNotFound,

    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {path}\n理由: {message}")]
    Read { path: PathBuf, message: String },

    #[error("無効な設定値: {key}\n理由: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
