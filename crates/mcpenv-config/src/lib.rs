//! mcpenv 設定
//!
//! `mcpenv.kdl` 設定ファイル（ステージの遅延、通知、環境の初期値）を探して読み込み、
//! `MCPENV_*` 環境変数で上書きします。

pub mod error;
mod parser;
pub mod settings;

pub use error::*;
pub use settings::*;

use std::path::PathBuf;

/// 設定ファイルを直接指定する環境変数
pub const SETTINGS_PATH_ENV: &str = "MCPENV_SETTINGS_PATH";

const CANDIDATES: [&str; 4] = [
    "mcpenv.local.kdl",
    ".mcpenv.local.kdl",
    "mcpenv.kdl",
    ".mcpenv.kdl",
];

/// mcpenv の設定ディレクトリを取得（なければ作成）
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("mcpenv");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// 設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 MCPENV_SETTINGS_PATH (直接パス指定)
/// 2. カレントディレクトリ: mcpenv.local.kdl, .mcpenv.local.kdl, mcpenv.kdl, .mcpenv.kdl
/// 3. ./.mcpenv/ ディレクトリ内: 同様の順序
/// 4. ~/.config/mcpenv/mcpenv.kdl (グローバル設定)
pub fn find_settings_file() -> Result<PathBuf> {
    if let Ok(settings_path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(settings_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(path = %path.display(), "{} points at a missing file", SETTINGS_PATH_ENV);
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let local_dir = current_dir.join(".mcpenv");
    if local_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = local_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("mcpenv").join("mcpenv.kdl");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::SettingsFileNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::time::Duration;

    /// カレントディレクトリを `dir` に切り替えて `f` を実行
    fn in_dir<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        let result = f();
        std::env::set_current_dir(original_dir).unwrap();
        result
    }

    #[test]
    #[serial]
    fn test_find_settings_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("mcpenv.kdl"), "// test").unwrap();

        let found = temp_env::with_var_unset(SETTINGS_PATH_ENV, || {
            in_dir(temp_dir.path(), find_settings_file)
        })
        .unwrap();
        assert!(found.ends_with("mcpenv.kdl"));
    }

    #[test]
    #[serial]
    fn test_local_file_has_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("mcpenv.kdl"), "// shared").unwrap();
        fs::write(temp_dir.path().join(".mcpenv.local.kdl"), "// local").unwrap();

        let found = temp_env::with_var_unset(SETTINGS_PATH_ENV, || {
            in_dir(temp_dir.path(), find_settings_file)
        })
        .unwrap();
        assert!(found.ends_with(".mcpenv.local.kdl"));
    }

    #[test]
    #[serial]
    fn test_find_settings_in_dot_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dot_dir = temp_dir.path().join(".mcpenv");
        fs::create_dir(&dot_dir).unwrap();
        fs::write(dot_dir.join("mcpenv.kdl"), "// nested").unwrap();

        let found = temp_env::with_var_unset(SETTINGS_PATH_ENV, || {
            in_dir(temp_dir.path(), find_settings_file)
        })
        .unwrap();
        assert!(found.ends_with(".mcpenv/mcpenv.kdl"));
    }

    #[test]
    #[serial]
    fn test_env_var_path_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("custom.kdl");
        fs::write(&custom, "// custom").unwrap();

        let found = temp_env::with_var(SETTINGS_PATH_ENV, Some(&custom), find_settings_file)
            .unwrap();
        assert_eq!(found, custom);
    }

    #[test]
    #[serial]
    fn test_load_from_env_path_then_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("custom.kdl");
        fs::write(
            &custom,
            "lifecycle {\n    planning_delay_ms 10\n    applying_delay_ms 20\n}\n",
        )
        .unwrap();

        let settings = temp_env::with_vars(
            [
                (SETTINGS_PATH_ENV, Some(custom.as_os_str())),
                (ENV_APPLYING_DELAY_MS, Some(std::ffi::OsStr::new("5"))),
            ],
            Settings::load,
        )
        .unwrap();

        assert_eq!(settings.lifecycle.planning_delay, Duration::from_millis(10));
        assert_eq!(settings.lifecycle.applying_delay, Duration::from_millis(5));
    }

    #[test]
    #[serial]
    fn test_load_reports_bad_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("broken.kdl");
        fs::write(&custom, "lifecycle {").unwrap();

        let result = temp_env::with_var(SETTINGS_PATH_ENV, Some(&custom), Settings::load);
        assert!(matches!(result, Err(ConfigError::KdlParse(_))));
    }
}
