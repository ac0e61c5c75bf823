// 設定ファイル管理
//
// プロジェクトの設定ファイル（YAML形式）の読み込み、検証を行います。
// 入力スナップショット、ジェネレーターの出力先、正規化ポリシーを保持します。

use crate::core::error::IoError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 未解決リレーションの扱い
///
/// 明示的な設定にも外部キーにもフィールドが見つからない単数リレーションを
/// 警告付きで出力するか、エラーとして扱うかを決定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedRelationPolicy {
    /// 空のフィールドリストで出力し、警告を記録
    #[default]
    Warn,
    /// 正規化を中断
    Error,
}

impl std::fmt::Display for UnresolvedRelationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedRelationPolicy::Warn => write!(f, "warn"),
            UnresolvedRelationPolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for UnresolvedRelationPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "warn" => Ok(UnresolvedRelationPolicy::Warn),
            "error" => Ok(UnresolvedRelationPolicy::Error),
            other => Err(anyhow!(
                "Unsupported unresolved relation policy: {}. Please specify one of: warn, error.",
                other
            )),
        }
    }
}

/// プロジェクト設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// スキーマグラフのスナップショット
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Prisma出力の先頭に置くテンプレート
    #[serde(default)]
    pub base_prelude: Option<PathBuf>,

    /// ジェネレーターの出力先
    #[serde(default)]
    pub outputs: OutputConfig,

    /// 未解決リレーションの扱い
    #[serde(default)]
    pub unresolved_relations: UnresolvedRelationPolicy,
}

fn default_input() -> PathBuf {
    PathBuf::from(crate::core::naming::DEFAULT_GRAPH_FILE)
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// 既定値で設定を作成
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            input: default_input(),
            base_prelude: None,
            outputs: OutputConfig::default(),
            unresolved_relations: UnresolvedRelationPolicy::default(),
        }
    }

    /// 設定ファイルを読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).map_err(|e| IoError::FileRead {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;

        let config: Config = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        if self.input.as_os_str().is_empty() {
            return Err(anyhow!("Input snapshot path is not specified"));
        }

        Ok(())
    }

    /// YAML文字列に変換
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).with_context(|| "Failed to serialize config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}

/// ジェネレーターの出力先
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prismaスキーマの出力先
    #[serde(default = "default_prisma_output")]
    pub prisma: PathBuf,

    /// 型定義の出力先
    #[serde(default = "default_types_output")]
    pub types: PathBuf,
}

fn default_prisma_output() -> PathBuf {
    PathBuf::from(crate::core::naming::DEFAULT_PRISMA_OUTPUT)
}

fn default_types_output() -> PathBuf {
    PathBuf::from(crate::core::naming::DEFAULT_TYPES_OUTPUT)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prisma: default_prisma_output(),
            types: default_types_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "warn".parse::<UnresolvedRelationPolicy>().unwrap(),
            UnresolvedRelationPolicy::Warn
        );
        assert_eq!(
            "error".parse::<UnresolvedRelationPolicy>().unwrap(),
            UnresolvedRelationPolicy::Error
        );
        assert!("ignore".parse::<UnresolvedRelationPolicy>().is_err());
        assert_eq!(UnresolvedRelationPolicy::Error.to_string(), "error");
    }

    #[test]
    fn test_config_defaults_from_minimal_yaml() {
        let config: Config = "version: \"1.0\"\n".parse().unwrap();
        assert_eq!(config.input, PathBuf::from("schema/graph.yaml"));
        assert_eq!(config.outputs.prisma, PathBuf::from("generated/schema.prisma"));
        assert_eq!(config.unresolved_relations, UnresolvedRelationPolicy::Warn);
        assert!(config.base_prelude.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_rejects_empty_version() {
        let mut config = Config::new();
        config.version = String::new();
        assert!(config.validate().is_err());
    }
}
