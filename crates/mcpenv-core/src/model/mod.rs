//! モデル定義
//!
//! 環境設定のデータモデルを定義します。
//! 各モデルは関心ごとにモジュールに分離されています。

mod config;
mod kinds;
mod update;

// Re-exports
pub use config::*;
pub use kinds::*;
pub use update::*;
