//! 環境モデル
//!
//! 現在の設定とレンダリング済みドキュメントを保持する。
//! 変更は検証後にリビジョンを進め、その場でドキュメントを再レンダリングするため、
//! [`EnvironmentModel::document`] が設定より古くなることはない。

use crate::error::ValidationError;
use crate::model::{ConfigUpdate, EnvironmentConfig, Field, Tags};
use crate::template::EnvironmentDocument;
use crate::validate::{validate_config, validate_tag};
use tracing::debug;

/// 変更の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// 値が変わり、このリビジョンに進んだ
    Applied { revision: u64 },
    /// 同じ値が設定済み
    Unchanged,
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied { .. })
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentModel {
    config: EnvironmentConfig,
    revision: u64,
    document: EnvironmentDocument,
}

impl EnvironmentModel {
    /// 初期設定を検証してモデルを作成
    pub fn new(config: EnvironmentConfig) -> Result<Self, ValidationError> {
        validate_config(&config)?;
        let document = EnvironmentDocument::render(&config);
        Ok(Self {
            config,
            revision: 0,
            document,
        })
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn tags(&self) -> &Tags {
        &self.config.tags
    }

    /// 作成以降に受け付けた変更の数
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// 現在のリビジョンのドキュメント
    pub fn document(&self) -> &EnvironmentDocument {
        &self.document
    }

    /// トップレベルフィールドを置き換える
    ///
    /// 変更後の設定全体を検証し、エラー時はモデルを変更しない。
    pub fn update(&mut self, update: ConfigUpdate) -> Result<Change, ValidationError> {
        let field = update.field();
        let mut candidate = self.config.clone();
        if !update.apply_to(&mut candidate) {
            debug!(%field, "update left configuration unchanged");
            return Ok(Change::Unchanged);
        }

        validate_config(&candidate)?;
        Ok(self.commit(candidate, field))
    }

    /// フォーム入力からトップレベルフィールドを置き換える
    pub fn update_field(
        &mut self,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Change, ValidationError> {
        let field: Field = field.parse()?;
        self.update(ConfigUpdate::from_json(field, value)?)
    }

    /// タグを追加または上書きする。削除はしない
    pub fn update_tag(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Change, ValidationError> {
        let key = key.into();
        let value = value.into();
        validate_tag(&key, &value)?;

        if self.config.tags.get(&key) == Some(&value) {
            return Ok(Change::Unchanged);
        }

        let mut candidate = self.config.clone();
        candidate.tags.insert(key, value);
        Ok(self.commit(candidate, Field::Tags))
    }

    fn commit(&mut self, config: EnvironmentConfig, field: Field) -> Change {
        self.config = config;
        self.revision += 1;
        self.document = EnvironmentDocument::render(&self.config);
        debug!(%field, revision = self.revision, "configuration updated");
        Change::Applied {
            revision: self.revision,
        }
    }
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        let config = EnvironmentConfig::default();
        let document = EnvironmentDocument::render(&config);
        Self {
            config,
            revision: 0,
            document,
        }
    }
}
