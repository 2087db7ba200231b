//! mcpenv コア
//!
//! 環境設定モデル（プロバイダー、ネットワーク、コンピュート、データベース、
//! ロードバランサー、オプション、タグ）と、そのバリデーション、
//! `mcp/v1` ドキュメントへのレンダリングを提供します。
//!
//! ```
//! use mcpenv_core::{ConfigUpdate, EnvironmentModel, Provider};
//!
//! let mut model = EnvironmentModel::default();
//! model.update(ConfigUpdate::Provider(Provider::Gcp)).unwrap();
//! model.update_tag("team", "platform").unwrap();
//!
//! assert_eq!(model.document().spec.provider, Provider::Gcp);
//! assert_eq!(model.document().metadata.name, "mcp-demo");
//! ```

pub mod error;
pub mod model;
pub mod store;
pub mod template;
pub mod validate;

// Re-exports
pub use error::{ModelError, Result, ValidationError};
pub use model::*;
pub use store::{Change, EnvironmentModel};
pub use template::{API_VERSION, EnvironmentDocument, KIND, Metadata};
